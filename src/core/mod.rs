//! Core value types for two-site operational transformation.
//!
//! - [`Operation`] - A single edit over a character range
//! - [`OperationKind`] - Insertion, deletion or replacement, derived from shape
//! - [`SiteRole`] - Owner or participant; the owner wins position ties
//! - [`CausalCounters`] and [`UpdateMessage`] - An operation as exchanged
//!   between sites, see [`counters`]

use serde::{Deserialize, Serialize};
use std::fmt;

pub mod counters;

pub use counters::{CausalCounters, UpdateMessage};

/// An edit: remove `length` characters at `offset`, then insert `text` there.
///
/// Offsets and lengths count Unicode scalar values, not bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Operation {
    offset: usize,
    length: usize,
    text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OperationError {
    #[error("operation at {offset} removing {length} chars exceeds document length {document_len}")]
    OutOfBounds {
        offset: usize,
        length: usize,
        document_len: usize,
    },
}

impl Operation {
    pub fn new(offset: usize, length: usize, text: impl Into<String>) -> Self {
        Self {
            offset,
            length,
            text: text.into(),
        }
    }

    pub fn insert(offset: usize, text: impl Into<String>) -> Self {
        Self::new(offset, 0, text)
    }

    pub fn delete(offset: usize, length: usize) -> Self {
        Self::new(offset, length, String::new())
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn length(&self) -> usize {
        self.length
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Number of characters inserted.
    pub fn text_len(&self) -> usize {
        self.text.chars().count()
    }

    /// Exclusive end of the removed span.
    pub fn end(&self) -> usize {
        self.offset.saturating_add(self.length)
    }

    pub fn kind(&self) -> OperationKind {
        OperationKind::classify(self)
    }

    /// Change in document length caused by applying this operation.
    pub fn len_delta(&self) -> isize {
        self.text_len() as isize - self.length as isize
    }

    /// Document length after applying this operation to a document of `document_len` chars.
    pub fn resulting_len(&self, document_len: usize) -> usize {
        document_len - self.length + self.text_len()
    }

    pub fn fits(&self, document_len: usize) -> bool {
        self.end() <= document_len
    }

    /// Splice this operation into `document`.
    pub fn apply_to(&self, document: &str) -> Result<String, OperationError> {
        let document_len = document.chars().count();
        if !self.fits(document_len) {
            return Err(OperationError::OutOfBounds {
                offset: self.offset,
                length: self.length,
                document_len,
            });
        }

        let start = byte_index(document, self.offset);
        let end = byte_index(document, self.offset + self.length);
        let mut out = String::with_capacity(document.len() - (end - start) + self.text.len());
        out.push_str(&document[..start]);
        out.push_str(&self.text);
        out.push_str(&document[end..]);
        Ok(out)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "offset={};length={};text={:?}",
            self.offset, self.length, self.text
        )
    }
}

fn byte_index(s: &str, char_index: usize) -> usize {
    s.char_indices()
        .nth(char_index)
        .map(|(idx, _)| idx)
        .unwrap_or(s.len())
}

/// Shape of an operation. Selects which transform rule applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperationKind {
    Insertion,
    Deletion,
    Replacement,
}

impl OperationKind {
    /// Zero length wins over empty text, so an empty edit is an insertion.
    pub fn classify(op: &Operation) -> Self {
        if op.length == 0 {
            OperationKind::Insertion
        } else if op.text.is_empty() {
            OperationKind::Deletion
        } else {
            OperationKind::Replacement
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            OperationKind::Insertion => 0,
            OperationKind::Deletion => 1,
            OperationKind::Replacement => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SiteRole {
    Owner,
    Participant,
}

impl SiteRole {
    pub fn other(self) -> Self {
        match self {
            SiteRole::Owner => SiteRole::Participant,
            SiteRole::Participant => SiteRole::Owner,
        }
    }
}

impl fmt::Display for SiteRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SiteRole::Owner => f.write_str("owner"),
            SiteRole::Participant => f.write_str("participant"),
        }
    }
}
