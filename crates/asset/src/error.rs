//! Loader error taxonomy.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Container-level load failures. Content-level anomalies (malformed
/// lines, oversized polygons, absent attribute layers) are tolerated by
/// the loaders and never surface here.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Source file could not be opened.
    #[error("cannot open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// I/O failure while reading an already-open source.
    #[error("read failed: {0}")]
    Read(#[from] io::Error),

    /// File extension is missing or names no known importer.
    #[error("unsupported model format (expected .obj or .scn): {path}")]
    UnsupportedFormat { path: PathBuf },

    /// Scene file does not start with the expected signature.
    #[error("not a scene file (bad magic {found:?})")]
    BadMagic { found: [u8; 4] },

    /// Scene file uses a container version this importer does not know.
    #[error("unsupported scene format version {0}")]
    UnsupportedVersion(u32),

    /// Scene payload ended before a record was complete.
    #[error("scene file truncated at offset {offset}")]
    Truncated { offset: usize },

    /// A mapping/reference mode byte holds an unknown value.
    #[error("invalid {what} tag {value} at offset {offset}")]
    InvalidTag {
        what: &'static str,
        value: u8,
        offset: usize,
    },
}

pub type LoadResult<T> = Result<T, LoadError>;
