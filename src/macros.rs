//! # Internal Macros
//!
//! Structural validation shorthand used throughout the tree reader, the
//! diagnostics walker, and column decoders.

/// Bails with a [`TreeError::Structural`](crate::error::TreeError) when the
/// condition does not hold.
///
/// Structural errors indicate a malformed or truncated input stream, as
/// opposed to I/O errors (propagated unchanged) or state-misuse errors
/// (operating a closed writer/reader).
#[macro_export]
macro_rules! tree_ensure {
    ($cond:expr, $($arg:tt)*) => {
        if !$cond {
            ::eyre::bail!($crate::error::TreeError::Structural(format!($($arg)*)));
        }
    };
}
