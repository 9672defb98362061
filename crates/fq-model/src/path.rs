//! Firestore resource paths.
//!
//! A path is a `/`-separated list of segments that alternate between
//! collection ids and document ids, starting with a collection:
//! `users` is a collection, `users/alice` a document, `users/alice/posts`
//! a subcollection. An odd segment count therefore names a collection and an
//! even count names a document.

use std::fmt;
use std::str::FromStr;

/// Errors produced when parsing a Firestore path.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    /// The path has no content.
    #[error("path must not be empty")]
    Empty,

    /// The path contains an empty segment (leading, trailing or double `/`).
    #[error("invalid path {path:?}: empty segment")]
    EmptySegment {
        /// The offending path.
        path: String,
    },
}

/// A parsed path that names either a collection or a single document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FirestorePath {
    /// Odd number of segments.
    Collection(CollectionPath),
    /// Even number of segments.
    Document(DocumentPath),
}

impl FirestorePath {
    /// Parse a `/`-separated path.
    ///
    /// # Errors
    ///
    /// Returns [`PathError`] if the path is empty or has an empty segment.
    pub fn parse(path: &str) -> Result<Self, PathError> {
        if path.is_empty() {
            return Err(PathError::Empty);
        }
        let segments: Vec<String> = path.split('/').map(str::to_owned).collect();
        if segments.iter().any(String::is_empty) {
            return Err(PathError::EmptySegment {
                path: path.to_owned(),
            });
        }
        if segments.len() % 2 == 1 {
            Ok(Self::Collection(CollectionPath { segments }))
        } else {
            Ok(Self::Document(DocumentPath { segments }))
        }
    }
}

impl FromStr for FirestorePath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for FirestorePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Collection(c) => c.fmt(f),
            Self::Document(d) => d.fmt(f),
        }
    }
}

/// Path to a collection (odd number of segments).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CollectionPath {
    segments: Vec<String>,
}

impl CollectionPath {
    /// The last segment: the collection id.
    #[must_use]
    pub fn collection_id(&self) -> &str {
        self.segments.last().map_or("", String::as_str)
    }

    /// The document that owns this collection, or `None` for a root
    /// collection.
    #[must_use]
    pub fn parent(&self) -> Option<DocumentPath> {
        if self.segments.len() < 3 {
            return None;
        }
        Some(DocumentPath {
            segments: self.segments[..self.segments.len() - 1].to_vec(),
        })
    }

    /// The path of the document with `id` inside this collection.
    #[must_use]
    pub fn doc(&self, id: &str) -> DocumentPath {
        let mut segments = self.segments.clone();
        segments.push(id.to_owned());
        DocumentPath { segments }
    }

    /// Whether `doc` lives directly in this collection.
    #[must_use]
    pub fn contains(&self, doc: &DocumentPath) -> bool {
        doc.segments.len() == self.segments.len() + 1 && doc.segments.starts_with(&self.segments)
    }
}

impl fmt::Display for CollectionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("/"))
    }
}

/// Path to a single document (even number of segments).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentPath {
    segments: Vec<String>,
}

impl DocumentPath {
    /// The last segment: the document id.
    #[must_use]
    pub fn id(&self) -> &str {
        self.segments.last().map_or("", String::as_str)
    }

    /// Path segments, alternating collection and document ids.
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// The collection holding this document.
    #[must_use]
    pub fn parent(&self) -> CollectionPath {
        CollectionPath {
            segments: self.segments[..self.segments.len() - 1].to_vec(),
        }
    }
}

impl fmt::Display for DocumentPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("/"))
    }
}
