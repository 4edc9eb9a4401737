//! Multi-document clause corpus and its file map.
//!
//! Documents are segmented and appended in order; each one owns a
//! half-open range of clause indices. Ranges are only created by
//! [`Corpus::add_document`], so they are always disjoint, consecutive and
//! together cover `0..corpus.len()`.

use std::ops::Range;

use serde::{Deserialize, Serialize};

use super::segment::segment;

/// Clause range owned by one source document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRange {
    /// Document name (usually the file name).
    pub name: String,
    /// First clause index (inclusive).
    pub start: usize,
    /// One past the last clause index.
    pub end: usize,
}

impl FileRange {
    /// Returns `true` if `index` lies in this range.
    #[must_use]
    pub const fn contains(&self, index: usize) -> bool {
        self.start <= index && index < self.end
    }

    /// Number of clauses in the range.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.end - self.start
    }

    /// Returns `true` if the document produced no clauses.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Ordered mapping from clause indices to source documents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileMap {
    ranges: Vec<FileRange>,
}

impl FileMap {
    /// All ranges in insertion order.
    #[must_use]
    pub fn ranges(&self) -> &[FileRange] {
        &self.ranges
    }

    /// Name of the document that owns clause `index`.
    #[must_use]
    pub fn source_of(&self, index: usize) -> Option<&str> {
        self.ranges
            .iter()
            .find(|r| r.contains(index))
            .map(|r| r.name.as_str())
    }

    /// Number of documents recorded.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.ranges.len()
    }

    /// Returns `true` if no documents were recorded.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// End of the last range (equals the covered clause count).
    fn covered(&self) -> usize {
        self.ranges.last().map_or(0, |r| r.end)
    }
}

/// Clauses from one or more documents plus their file map.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    clauses: Vec<String>,
    file_map: FileMap,
}

impl Corpus {
    /// Creates an empty corpus.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Segments `text` and appends its clauses under `name`.
    ///
    /// Returns the clause range assigned to the document (empty if the
    /// text produced no clauses).
    pub fn add_document(&mut self, name: impl Into<String>, text: &str) -> Range<usize> {
        let start = self.file_map.covered();
        self.clauses.extend(segment(text));
        let end = self.clauses.len();

        let name = name.into();
        tracing::debug!(document = %name, start, end, "added document to corpus");
        self.file_map.ranges.push(FileRange { name, start, end });
        start..end
    }

    /// All clauses in corpus order.
    #[must_use]
    pub fn clauses(&self) -> &[String] {
        &self.clauses
    }

    /// The file map covering every clause.
    #[must_use]
    pub const fn file_map(&self) -> &FileMap {
        &self.file_map
    }

    /// Number of clauses.
    #[must_use]
    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    /// Returns `true` if the corpus holds no clauses.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Splits the corpus into its clauses and file map.
    #[must_use]
    pub fn into_parts(self) -> (Vec<String>, FileMap) {
        (self.clauses, self.file_map)
    }
}
