// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Error taxonomy for import, export and analytics

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for the import entry points.
pub type ImportResult<T> = Result<T, ImportError>;

/// The file behind an import could not be turned into a byte region.
#[derive(Debug, Error)]
pub enum ResourceError {
    #[error("file not found: {}", .path.display())]
    NotFound { path: PathBuf },

    #[error("file is unreadable: {}: {source}", .path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("file is empty: {}", .path.display())]
    Empty { path: PathBuf },
}

impl ResourceError {
    /// Classify an I/O failure on `path`.
    pub fn from_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            ResourceError::NotFound { path }
        } else {
            ResourceError::Unreadable { path, source }
        }
    }
}

/// Structural problems that make a whole file unusable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("PLY header is not terminated by an `end_header` line")]
    MissingEndHeader,

    #[error("PLY header does not declare `element vertex <n>`")]
    VertexCountMissing,
}

/// Which kind of line a [`PartialParseError`] was found on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Vertex,
    Normal,
    Face,
    Point,
}

impl fmt::Display for LineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LineKind::Vertex => "vertex",
            LineKind::Normal => "normal",
            LineKind::Face => "face",
            LineKind::Point => "point",
        };
        f.write_str(name)
    }
}

/// A malformed line. Recovered where it is found and never propagated
/// past the scanner that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed {kind} line at byte {offset}: {reason}")]
pub struct PartialParseError {
    /// Absolute byte offset of the line start within the imported file.
    pub offset: usize,
    pub kind: LineKind,
    pub reason: &'static str,
}

/// Analytics invoked on input they cannot work with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GeometryError {
    #[error("input point set is empty")]
    EmptyInput,

    #[error("need at least {required} points, got {actual}")]
    InsufficientPoints { required: usize, actual: usize },

    #[error("convex hull is degenerate")]
    DegenerateHull,
}

/// Failure of a whole import call.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error(transparent)]
    Resource(#[from] ResourceError),

    #[error(transparent)]
    Format(#[from] FormatError),

    #[error("worker for chunk {chunk} failed: {message}")]
    WorkerFailed { chunk: usize, message: String },

    #[error("failed to build import thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Failure while writing geometry to disk.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("{} has invalid extension, expected .{expected}", .path.display())]
    InvalidExtension { path: PathBuf, expected: &'static str },

    #[error("nothing to export: {0}")]
    NothingToWrite(&'static str),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
