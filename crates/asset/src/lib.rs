//! Mesh ingestion: geometry pools and faces, the text geometry parser,
//! the binary scene-graph importer, and the current-document state they
//! all feed.

pub mod document;
pub mod error;
pub mod mesh;
pub mod obj;
pub mod scene;

pub use document::{LoadSummary, ModelDocument};
pub use error::{LoadError, LoadResult};
pub use mesh::{Corner, Face, Mesh};
