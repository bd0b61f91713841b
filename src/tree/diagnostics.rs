//! # Tree Diagnostics
//!
//! Structural statistics for a serialized stream, computed by walking the
//! self-describing section tree without decoding a single leaf. Used to
//! validate that a persisted file has the expected shape — spotting
//! truncated or bloated sections — at a fraction of the cost of
//! materializing the object graph.
//!
//! The walk tolerates any well-formed structure, including sections it has
//! never heard of. Malformed extents (a leaf length or child count that
//! outruns the stream) surface as structural errors from the underlying
//! [`TreeReader`].

use std::fmt;
use std::io::Read;

use eyre::Result;

use crate::config::MAX_TREE_DEPTH;
use crate::tree::reader::{SectionHeader, TreeReader};
use crate::tree_ensure;

/// Shape record for one section: name, nesting depth, the byte range it
/// occupies (header included), and its child count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionStats {
    pub name: String,
    pub depth: usize,
    pub start: u64,
    pub end: u64,
    pub child_count: u64,
    pub is_leaf: bool,
}

impl SectionStats {
    pub fn byte_len(&self) -> u64 {
        self.end - self.start
    }
}

/// Structural summary of one serialized tree, in depth-first preorder.
#[derive(Debug, Clone, Default)]
pub struct TreeDiagnostics {
    sections: Vec<SectionStats>,
    total_bytes: u64,
}

impl TreeDiagnostics {
    /// Walks the stream behind `reader` and records every section.
    pub fn read(reader: &mut TreeReader) -> Result<TreeDiagnostics> {
        reader.open()?;
        let mut sections = Vec::new();
        walk(reader, 0, &mut sections)?;
        Ok(TreeDiagnostics {
            sections,
            total_bytes: reader.offset(),
        })
    }

    /// Convenience wrapper constructing the reader internally.
    pub fn read_from(input: &mut dyn Read) -> Result<TreeDiagnostics> {
        let mut reader = TreeReader::new(input);
        let result = Self::read(&mut reader);
        reader.close()?;
        result
    }

    /// All sections in depth-first preorder; the root is first.
    pub fn sections(&self) -> &[SectionStats] {
        &self.sections
    }

    pub fn root(&self) -> Option<&SectionStats> {
        self.sections.first()
    }

    /// First section with the given name, searching preorder.
    pub fn section(&self, name: &str) -> Option<&SectionStats> {
        self.sections.iter().find(|s| s.name == name)
    }

    /// Sections at one nesting depth. Depth 1 is the set of tables in a
    /// database stream.
    pub fn at_depth(&self, depth: usize) -> impl Iterator<Item = &SectionStats> {
        self.sections.iter().filter(move |s| s.depth == depth)
    }

    /// Total bytes consumed from the stream, format header included.
    pub fn total_bytes(&self) -> u64 {
        self.total_bytes
    }
}

fn walk(reader: &mut TreeReader, depth: usize, out: &mut Vec<SectionStats>) -> Result<()> {
    tree_ensure!(
        depth <= MAX_TREE_DEPTH,
        "section nesting exceeds {MAX_TREE_DEPTH} levels"
    );

    let start = reader.offset();
    let header = reader.read_header()?;
    let slot = out.len();
    out.push(SectionStats {
        name: header.name().to_owned(),
        depth,
        start,
        end: start,
        child_count: 0,
        is_leaf: matches!(header, SectionHeader::Leaf { .. }),
    });

    match header {
        SectionHeader::Leaf { len, .. } => {
            reader.skip_leaf(len)?;
        }
        SectionHeader::Node { children, .. } => {
            out[slot].child_count = children;
            for _ in 0..children {
                walk(reader, depth + 1, out)?;
            }
        }
    }
    out[slot].end = reader.offset();
    Ok(())
}

impl fmt::Display for TreeDiagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for s in &self.sections {
            let indent = s.depth * 2;
            if s.is_leaf {
                writeln!(
                    f,
                    "{:indent$}{} [{}..{}) {} bytes",
                    "",
                    s.name,
                    s.start,
                    s.end,
                    s.byte_len()
                )?;
            } else {
                writeln!(
                    f,
                    "{:indent$}{} [{}..{}) {} bytes, {} children",
                    "",
                    s.name,
                    s.start,
                    s.end,
                    s.byte_len(),
                    s.child_count
                )?;
            }
        }
        writeln!(f, "total: {} bytes", self.total_bytes)
    }
}
