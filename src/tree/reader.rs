//! # Tree Reader
//!
//! Mirror of the writer's state machine over a caller-owned stream:
//!
//! ```text
//! Unopened --first read--> Reading --close()--> Closed
//! ```
//!
//! The core correctness property is exact consumption: reading or skipping
//! a section consumes precisely its declared extent, leaving the stream
//! positioned at the next sibling or parent boundary. The diagnostics
//! walker depends on this to attribute byte ranges without decoding leaves.
//!
//! A declared length that outruns the stream is a structural error, never a
//! partial result. Leaf payloads are read in bounded chunks so a corrupt
//! length header cannot force a giant allocation before the truncation is
//! detected.

use std::io::Read;

use eyre::{bail, Result};

use crate::config::{
    FORMAT_MAGIC, FORMAT_VERSION, KIND_LEAF, KIND_NODE, LEAF_READ_CHUNK, MAX_SECTION_NAME_LEN,
    MAX_TREE_DEPTH,
};
use crate::encoding::varint::read_varint;
use crate::error::TreeError;
use crate::tree_ensure;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReaderState {
    Unopened,
    Reading,
    Closed,
}

/// Header of one section: what it is called and how much of the stream it
/// claims. Reading a header leaves the stream positioned at the section
/// body (leaf payload or first child).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionHeader {
    Node { name: String, children: u64 },
    Leaf { name: String, len: u64 },
}

impl SectionHeader {
    pub fn name(&self) -> &str {
        match self {
            SectionHeader::Node { name, .. } | SectionHeader::Leaf { name, .. } => name,
        }
    }
}

/// Streaming reader for the binary tree format.
pub struct TreeReader<'a> {
    input: &'a mut dyn Read,
    state: ReaderState,
    offset: u64,
}

impl<'a> TreeReader<'a> {
    pub fn new(input: &'a mut dyn Read) -> Self {
        Self {
            input,
            state: ReaderState::Unopened,
            offset: 0,
        }
    }

    /// Bytes consumed from the stream so far, including the format header.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Validates the magic/version header. Called implicitly by the first
    /// section read; exposed so callers can record the post-header offset.
    pub fn open(&mut self) -> Result<()> {
        self.ensure_readable("open")
    }

    /// Reads the next section header.
    pub fn read_header(&mut self) -> Result<SectionHeader> {
        self.ensure_readable("read_header")?;

        let (name_len, _) = self.next_varint()?;
        tree_ensure!(
            name_len > 0 && name_len <= MAX_SECTION_NAME_LEN,
            "section name length {name_len} out of range"
        );
        let mut name_bytes = vec![0u8; name_len as usize];
        self.fill(&mut name_bytes, "section name")?;
        let name = match String::from_utf8(name_bytes) {
            Ok(name) => name,
            Err(_) => bail!(TreeError::Structural("section name is not UTF-8".into())),
        };

        let mut kind = [0u8; 1];
        self.fill(&mut kind, "section kind")?;
        match kind[0] {
            KIND_LEAF => {
                let (len, _) = self.next_varint()?;
                Ok(SectionHeader::Leaf { name, len })
            }
            KIND_NODE => {
                let (children, _) = self.next_varint()?;
                Ok(SectionHeader::Node { name, children })
            }
            other => bail!(TreeError::Structural(format!(
                "unknown section kind {other} in section '{name}'"
            ))),
        }
    }

    /// Reads the root section header, which must be a node named `expected`.
    /// Returns its child count.
    pub fn expect_root(&mut self, expected: &'static str) -> Result<u64> {
        match self.read_header()? {
            SectionHeader::Node { name, children } if name == expected => Ok(children),
            SectionHeader::Node { name, .. } => bail!(TreeError::UnexpectedRoot {
                expected,
                found: name,
            }),
            SectionHeader::Leaf { name, .. } => bail!(TreeError::Structural(format!(
                "root section '{name}' is a leaf, expected node '{expected}'"
            ))),
        }
    }

    /// Reads a leaf payload of the declared length.
    pub fn read_leaf(&mut self, len: u64) -> Result<Vec<u8>> {
        self.ensure_readable("read_leaf")?;
        let total = len as usize;
        let mut out = Vec::with_capacity(total.min(LEAF_READ_CHUNK));
        while out.len() < total {
            let chunk = (total - out.len()).min(LEAF_READ_CHUNK);
            let start = out.len();
            out.resize(start + chunk, 0);
            let read_into = &mut out[start..];
            match self.input.read_exact(read_into) {
                Ok(()) => self.offset += chunk as u64,
                Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                    bail!(TreeError::Structural(format!(
                        "leaf declared {len} bytes, stream ended early"
                    )))
                }
                Err(e) => return Err(e.into()),
            }
        }
        Ok(out)
    }

    /// Discards a leaf payload of the declared length without decoding it.
    pub fn skip_leaf(&mut self, len: u64) -> Result<()> {
        self.ensure_readable("skip_leaf")?;
        let copied = std::io::copy(
            &mut Read::take(&mut *self.input, len),
            &mut std::io::sink(),
        )?;
        self.offset += copied;
        tree_ensure!(
            copied == len,
            "leaf declared {len} bytes, stream ended after {copied}"
        );
        Ok(())
    }

    /// Consumes an entire section (and, for nodes, all descendants) without
    /// interpreting any payload. This is how readers tolerate sections they
    /// do not recognize.
    pub fn skip_section(&mut self, header: &SectionHeader) -> Result<()> {
        self.skip_section_at(header, 0)
    }

    fn skip_section_at(&mut self, header: &SectionHeader, depth: usize) -> Result<()> {
        tree_ensure!(
            depth <= MAX_TREE_DEPTH,
            "section nesting exceeds {MAX_TREE_DEPTH} levels"
        );
        match header {
            SectionHeader::Leaf { len, .. } => self.skip_leaf(*len),
            SectionHeader::Node { children, .. } => {
                for _ in 0..*children {
                    let child = self.read_header()?;
                    self.skip_section_at(&child, depth + 1)?;
                }
                Ok(())
            }
        }
    }

    /// Transitions to `Closed`. Idempotent; any further read fails.
    pub fn close(&mut self) -> Result<()> {
        self.state = ReaderState::Closed;
        Ok(())
    }

    fn ensure_readable(&mut self, op: &'static str) -> Result<()> {
        match self.state {
            ReaderState::Closed => bail!(TreeError::InvalidState {
                endpoint: "tree reader",
                op,
                state: "closed",
            }),
            ReaderState::Reading => Ok(()),
            ReaderState::Unopened => {
                let mut header = [0u8; 5];
                self.fill(&mut header, "format header")?;
                tree_ensure!(
                    &header[..4] == FORMAT_MAGIC,
                    "bad magic {:?}, not a bsoa stream",
                    &header[..4]
                );
                tree_ensure!(
                    header[4] == FORMAT_VERSION,
                    "unsupported format version {}",
                    header[4]
                );
                self.state = ReaderState::Reading;
                Ok(())
            }
        }
    }

    fn next_varint(&mut self) -> Result<(u64, usize)> {
        let (value, read) = read_varint(&mut *self.input)?;
        self.offset += read as u64;
        Ok((value, read))
    }

    fn fill(&mut self, buf: &mut [u8], what: &str) -> Result<()> {
        match self.input.read_exact(buf) {
            Ok(()) => {
                self.offset += buf.len() as u64;
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                bail!(TreeError::Structural(format!("stream ended inside {what}")))
            }
            Err(e) => Err(e.into()),
        }
    }
}
