//! # graph-archive
//!
//! Persistence for sampling graphs: save an in-memory graph (topology plus
//! optional type tables and node/edge attributes) into a portable archive
//! and reconstruct the same logical state on load.
//!
//! ## Modules
//!
//! - [`util`] - Basic types (DataType, Shape, POD elements, errors)
//! - [`value`] - Typed values stored in archives
//! - [`archive`] - Ordered key-addressed archive and its binary format
//! - [`graph`] - The sampling graph and its Save/Load codec
//! - [`serialize`] - Entry functions (`serialize`, `deserialize`, `get_value`)
//!
//! ## Example
//!
//! ```ignore
//! use graph_archive::prelude::*;
//!
//! let graph = SamplingGraph::from_edges(3, &[(0, 1), (1, 2), (2, 0)])?;
//! let bytes = serialize(&graph)?;
//! assert_eq!(deserialize(&bytes)?, graph);
//!
//! let version = get_value(&bytes, "version")?;
//! assert_eq!(version.as_int()?, 1);
//! ```

pub mod util;
pub mod value;
pub mod archive;
pub mod graph;
pub mod serialize;

// Re-export commonly used types
pub use util::{DataType, Error, Result};
pub use archive::{Archive, ReadOptions, WriteOptions};
pub use graph::SamplingGraph;
pub use serialize::{
    deserialize, deserialize_file, get_value, get_value_from_file, serialize, serialize_to_file,
    serialize_with, Persist,
};

/// Library version with build date, for diagnostics.
pub fn library_version() -> String {
    format!(
        "graph-archive {} (built {})",
        env!("CARGO_PKG_VERSION"),
        option_env!("GRAPH_ARCHIVE_BUILD_DATE").unwrap_or("unknown")
    )
}

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::util::{ArchivePod, Bool, DataType, Error, Result, Shape};
    pub use crate::value::{NumericArray, Record, TypedValue, ValueKind};
    pub use crate::archive::{Archive, Mode, ReadOptions, WriteOptions};
    pub use crate::graph::{AttributeTable, SamplingGraph, TypeIdMap};
    pub use crate::serialize::*;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_version() {
        let version = library_version();
        assert!(version.starts_with("graph-archive "));
        assert!(version.contains(env!("CARGO_PKG_VERSION")));
        assert!(version.contains("(built "));
    }
}
