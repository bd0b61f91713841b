//! # Error Taxonomy
//!
//! The BSOA core distinguishes three failure classes on the serialization
//! path, all propagated through [`eyre::Report`]:
//!
//! | Class | Variant | Meaning |
//! |-------|---------|---------|
//! | Structural | [`TreeError::Structural`], [`TreeError::UnexpectedRoot`] | The input stream is malformed, truncated, or from an incompatible schema |
//! | State misuse | [`TreeError::InvalidState`], [`TreeError::UnbalancedNode`] | A writer/reader was operated after close, or node bookkeeping was violated |
//! | I/O | `std::io::Error` | Propagated unchanged from the underlying stream |
//!
//! Callers that need to branch on the class downcast the report:
//!
//! ```ignore
//! match Company::read_bsoa(path) {
//!     Err(e) if e.downcast_ref::<TreeError>().is_some() => { /* corrupt file */ }
//!     Err(e) => { /* I/O */ }
//!     Ok(company) => { /* ... */ }
//! }
//! ```
//!
//! Index/range violations are programming errors, not recoverable
//! conditions; they panic with slice-indexing semantics rather than
//! appearing in this taxonomy.

use thiserror::Error;

/// Errors raised by the binary tree protocol and the structures that decode
/// from it. Structural variants mean the stream is bad; state variants mean
/// the caller misused a writer or reader.
#[derive(Debug, Error)]
pub enum TreeError {
    /// The stream is malformed or truncated: a declared length exceeds the
    /// remaining bytes, a name fails validation, a column payload does not
    /// match its row count, and so on.
    #[error("malformed tree section: {0}")]
    Structural(String),

    /// The root section exists and is well-formed but names a different
    /// schema than the reader expects.
    #[error("root section is '{found}', expected '{expected}'")]
    UnexpectedRoot {
        expected: &'static str,
        found: String,
    },

    /// An operation was attempted in a state that forbids it, e.g. writing
    /// into a closed writer or reading from a closed reader.
    #[error("{op}: {endpoint} is {state}")]
    InvalidState {
        endpoint: &'static str,
        op: &'static str,
        state: &'static str,
    },

    /// A node was closed with a different number of children than declared,
    /// or a section was written past its parent's declared child count.
    #[error("node '{name}' declared {declared} children, {written} written")]
    UnbalancedNode {
        name: String,
        declared: u64,
        written: u64,
    },
}

impl TreeError {
    /// True for the variants that indicate corrupt or incompatible input
    /// (as opposed to caller misuse of a writer/reader).
    pub fn is_structural(&self) -> bool {
        matches!(self, TreeError::Structural(_) | TreeError::UnexpectedRoot { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn structural_classification() {
        assert!(TreeError::Structural("truncated".into()).is_structural());
        assert!(TreeError::UnexpectedRoot {
            expected: "CompanyDatabase",
            found: "Other".into()
        }
        .is_structural());
        assert!(!TreeError::InvalidState {
            endpoint: "tree writer",
            op: "leaf",
            state: "closed"
        }
        .is_structural());
    }

    #[test]
    fn messages_name_the_failure() {
        let e = TreeError::UnbalancedNode {
            name: "Team".into(),
            declared: 5,
            written: 3,
        };
        let msg = e.to_string();
        assert!(msg.contains("Team"));
        assert!(msg.contains('5'));
        assert!(msg.contains('3'));
    }
}
