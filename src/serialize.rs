//! Entry points for saving and loading objects through archives.
//!
//! [`Persist`] is the Save/Load pair an object implements. The free
//! functions wrap it for the common cases: chaining into an open archive,
//! serializing to bytes or a file, and peeking at one key without loading
//! the whole object.

use std::mem;
use std::path::Path;

use tracing::debug;

use crate::archive::{Archive, ReadOptions, WriteOptions};
use crate::graph::SamplingGraph;
use crate::util::Result;
use crate::value::TypedValue;

/// An object that can be written to and restored from an [`Archive`].
pub trait Persist: Sized {
    /// Write the object's entries into the current scope of `archive`.
    fn save(&self, archive: &mut Archive) -> Result<()>;

    /// Reconstruct an object from the current scope of `archive`.
    fn load(archive: &mut Archive) -> Result<Self>;

    /// Load into an existing value. `self` is replaced only if the load
    /// succeeds.
    fn load_into(&mut self, archive: &mut Archive) -> Result<()> {
        let mut fresh = Self::load(archive)?;
        mem::swap(self, &mut fresh);
        Ok(())
    }
}

/// Save `value` into `archive` and return the archive for chaining.
pub fn write<'a, T: Persist>(archive: &'a mut Archive, value: &T) -> Result<&'a mut Archive> {
    value.save(archive)?;
    Ok(archive)
}

/// Load `archive` into `value` and return the archive for chaining.
pub fn read<'a, T: Persist>(archive: &'a mut Archive, value: &mut T) -> Result<&'a mut Archive> {
    value.load_into(archive)?;
    Ok(archive)
}

/// Read the raw value stored under `key` in the current scope.
pub fn read_value(archive: &Archive, key: &str) -> Result<TypedValue> {
    archive.read(key)
}

/// Serialize a graph into archive bytes.
pub fn serialize(graph: &SamplingGraph) -> Result<Vec<u8>> {
    serialize_with(graph, WriteOptions::default())
}

/// Serialize a graph into archive bytes with write options.
pub fn serialize_with(graph: &SamplingGraph, options: WriteOptions) -> Result<Vec<u8>> {
    let mut archive = Archive::writer_with(options);
    write(&mut archive, graph)?;
    archive.into_bytes()
}

/// Serialize a graph into the file at `path`, replacing it atomically.
pub fn serialize_to_file(graph: &SamplingGraph, path: impl AsRef<Path>) -> Result<()> {
    serialize_to_file_with(graph, path, WriteOptions::default())
}

/// [`serialize_to_file`] with write options.
pub fn serialize_to_file_with(
    graph: &SamplingGraph,
    path: impl AsRef<Path>,
    options: WriteOptions,
) -> Result<()> {
    let path = path.as_ref();
    let mut archive = Archive::writer_with(options);
    write(&mut archive, graph)?;
    archive.save(path)?;
    debug!("Serialized graph to {}", path.display());
    Ok(())
}

/// Reconstruct a graph from archive bytes.
pub fn deserialize(data: &[u8]) -> Result<SamplingGraph> {
    let mut archive = Archive::from_bytes(data)?;
    SamplingGraph::load(&mut archive)
}

/// Reconstruct a graph from an archive file.
pub fn deserialize_file(path: impl AsRef<Path>) -> Result<SamplingGraph> {
    deserialize_file_with(path, ReadOptions::default())
}

/// [`deserialize_file`] with read options.
pub fn deserialize_file_with(path: impl AsRef<Path>, options: ReadOptions) -> Result<SamplingGraph> {
    let mut archive = Archive::open_with(path, options)?;
    SamplingGraph::load(&mut archive)
}

/// Read one top-level value from archive bytes without loading a graph.
pub fn get_value(data: &[u8], key: &str) -> Result<TypedValue> {
    Archive::from_bytes(data)?.read(key)
}

/// Read one top-level value from an archive file without loading a graph.
pub fn get_value_from_file(path: impl AsRef<Path>, key: &str) -> Result<TypedValue> {
    Archive::open(path)?.read(key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::keys;
    use crate::util::Error;

    fn triangle() -> SamplingGraph {
        SamplingGraph::from_edges(3, &[(0, 1), (1, 2), (2, 0)]).unwrap()
    }

    #[test]
    fn test_write_read_chain() -> Result<()> {
        let graph = triangle();
        let mut out = Archive::writer();
        write(&mut out, &graph)?.write("note", "extra")?;
        let mut input = Archive::from_bytes(&out.into_bytes()?)?;

        let mut loaded = SamplingGraph::new(vec![0], vec![])?;
        let note = read(&mut input, &mut loaded)?.read("note")?;
        assert_eq!(loaded, graph);
        assert_eq!(note.as_str()?, "extra");
        Ok(())
    }

    #[test]
    fn test_failed_read_leaves_target() -> Result<()> {
        let mut out = Archive::writer();
        out.write(keys::VERSION, 7i64)?;
        let mut input = Archive::from_bytes(&out.into_bytes()?)?;

        let mut target = triangle();
        let err = read(&mut input, &mut target).unwrap_err();
        assert!(matches!(err, Error::UnsupportedVersion(7)));
        assert_eq!(target, triangle());
        Ok(())
    }

    #[test]
    fn test_read_value() -> Result<()> {
        let archive = Archive::from_bytes(&serialize(&triangle())?)?;
        assert_eq!(read_value(&archive, keys::VERSION)?, TypedValue::Int(1));
        assert!(matches!(
            read_value(&archive, keys::TYPE_PER_EDGE),
            Err(Error::KeyNotFound(_))
        ));
        Ok(())
    }

    #[test]
    fn test_get_value_without_full_load() -> Result<()> {
        let bytes = serialize(&triangle())?;
        let offsets = get_value(&bytes, keys::ROW_OFFSETS)?;
        assert_eq!(offsets.as_array()?.to_vec::<i64>()?, vec![0, 1, 2, 3]);
        Ok(())
    }

    #[test]
    fn test_serialize_is_deterministic() -> Result<()> {
        assert_eq!(serialize(&triangle())?, serialize(&triangle())?);
        Ok(())
    }
}
