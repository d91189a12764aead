//! Utility types shared by the archive and the graph codec.
//!
//! - [`DataType`] - element types of numeric arrays
//! - [`ArchivePod`] - Rust element types that map onto a [`DataType`]
//! - [`Shape`] - array dimensions
//! - [`Error`] / [`Result`] - error handling

mod data_type;
mod error;
mod pod;
mod shape;

pub use data_type::*;
pub use error::*;
pub use pod::*;
pub use shape::*;
