//! # Tree Writer
//!
//! Emits the named, length-prefixed section format over a caller-owned
//! stream. The writer wraps but does not own the stream: callers open it,
//! perform the full write, then [`close`](TreeWriter::close) it; dropping
//! the writer releases only its own bookkeeping.
//!
//! ## State Machine
//!
//! ```text
//! Unopened --first write--> Writing --close()--> Closed
//! ```
//!
//! The magic/version header is emitted lazily on the first section write.
//! Writing into a closed writer is a state-misuse error. Node bookkeeping
//! is validated eagerly: a section written past its parent's declared child
//! count, or an `end_node` before the declared children arrive, fails with
//! [`TreeError::UnbalancedNode`] instead of silently corrupting the stream.

use std::io::Write;

use eyre::{bail, Result};

use crate::config::{
    FORMAT_MAGIC, FORMAT_VERSION, KIND_LEAF, KIND_NODE, MAX_SECTION_NAME_LEN, MAX_VARINT_LEN,
};
use crate::encoding::encode_varint;
use crate::error::TreeError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WriterState {
    Unopened,
    Writing,
    Closed,
}

#[derive(Debug)]
struct OpenNode {
    name: String,
    declared: u64,
    written: u64,
}

/// Streaming writer for the binary tree format.
pub struct TreeWriter<'a> {
    out: &'a mut dyn Write,
    state: WriterState,
    stack: Vec<OpenNode>,
    root_written: bool,
    bytes_written: u64,
}

impl<'a> TreeWriter<'a> {
    pub fn new(out: &'a mut dyn Write) -> Self {
        Self {
            out,
            state: WriterState::Unopened,
            stack: Vec::new(),
            root_written: false,
            bytes_written: 0,
        }
    }

    /// Total bytes emitted so far, including the format header.
    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    /// Opens a named interior node that will contain exactly `children`
    /// sections. Must be balanced by [`end_node`](Self::end_node).
    pub fn begin_node(&mut self, name: &str, children: u64) -> Result<()> {
        self.begin_section(name, "begin_node")?;
        self.emit(&[KIND_NODE])?;
        self.emit_varint(children)?;
        self.stack.push(OpenNode {
            name: name.to_owned(),
            declared: children,
            written: 0,
        });
        Ok(())
    }

    /// Writes a named leaf section with an opaque payload.
    pub fn leaf(&mut self, name: &str, bytes: &[u8]) -> Result<()> {
        self.begin_section(name, "leaf")?;
        self.emit(&[KIND_LEAF])?;
        self.emit_varint(bytes.len() as u64)?;
        self.emit(bytes)
    }

    /// Closes the innermost open node, verifying its declared child count.
    pub fn end_node(&mut self) -> Result<()> {
        if self.state == WriterState::Closed {
            bail!(self.state_error("end_node", "closed"));
        }
        let node = match self.stack.pop() {
            Some(node) => node,
            None => bail!(self.state_error("end_node", "not inside a node")),
        };
        if node.written != node.declared {
            bail!(TreeError::UnbalancedNode {
                name: node.name,
                declared: node.declared,
                written: node.written,
            });
        }
        Ok(())
    }

    /// Flushes the stream and transitions to `Closed`. Idempotent; any
    /// further section write fails. Closing with an open node is an error.
    pub fn close(&mut self) -> Result<()> {
        if self.state == WriterState::Closed {
            return Ok(());
        }
        if let Some(node) = self.stack.pop() {
            bail!(TreeError::UnbalancedNode {
                name: node.name,
                declared: node.declared,
                written: node.written,
            });
        }
        self.open_if_needed()?;
        self.out.flush()?;
        self.state = WriterState::Closed;
        Ok(())
    }

    fn begin_section(&mut self, name: &str, op: &'static str) -> Result<()> {
        if self.state == WriterState::Closed {
            bail!(self.state_error(op, "closed"));
        }
        self.open_if_needed()?;

        if name.is_empty() || name.len() as u64 > MAX_SECTION_NAME_LEN {
            bail!("invalid section name ({} bytes): {:?}", name.len(), name);
        }

        match self.stack.last_mut() {
            Some(parent) => {
                if parent.written == parent.declared {
                    bail!(TreeError::UnbalancedNode {
                        name: parent.name.clone(),
                        declared: parent.declared,
                        written: parent.written + 1,
                    });
                }
                parent.written += 1;
            }
            None => {
                if self.root_written {
                    bail!(self.state_error(op, "root section already complete"));
                }
                self.root_written = true;
            }
        }

        self.emit_varint(name.len() as u64)?;
        self.emit(name.as_bytes())
    }

    fn open_if_needed(&mut self) -> Result<()> {
        if self.state == WriterState::Unopened {
            self.emit(FORMAT_MAGIC)?;
            self.emit(&[FORMAT_VERSION])?;
            self.state = WriterState::Writing;
        }
        Ok(())
    }

    fn emit(&mut self, bytes: &[u8]) -> Result<()> {
        self.out.write_all(bytes)?;
        self.bytes_written += bytes.len() as u64;
        Ok(())
    }

    fn emit_varint(&mut self, value: u64) -> Result<()> {
        let mut scratch = [0u8; MAX_VARINT_LEN];
        let n = encode_varint(value, &mut scratch);
        self.emit(&scratch[..n])
    }

    fn state_error(&self, op: &'static str, state: &'static str) -> TreeError {
        TreeError::InvalidState {
            endpoint: "tree writer",
            op,
            state,
        }
    }
}
