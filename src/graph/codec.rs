//! Save/Load of [`SamplingGraph`] through an [`Archive`].
//!
//! Save writes `version`, the topology arrays, then each optional field only
//! if it is set. Load mirrors that sequence and checks key presence before
//! reading any optional field.

use tracing::debug;

use super::{AttributeTable, SamplingGraph, TypeIdMap};
use crate::archive::Archive;
use crate::serialize::Persist;
use crate::util::{ArchivePod, Error, Result};
use crate::value::{NumericArray, Record};

/// Current graph snapshot schema version.
pub const SCHEMA_VERSION: i64 = 1;

/// Archive keys of a graph snapshot.
pub mod keys {
    pub const VERSION: &str = "version";
    pub const ROW_OFFSETS: &str = "row_offsets";
    pub const COL_INDICES: &str = "col_indices";
    pub const NODE_TYPE_OFFSET: &str = "node_type_offset";
    pub const TYPE_PER_EDGE: &str = "type_per_edge";
    pub const NODE_TYPE_TO_ID: &str = "node_type_to_id";
    pub const EDGE_TYPE_TO_ID: &str = "edge_type_to_id";
    pub const NODE_ATTRIBUTES: &str = "node_attributes";
    pub const EDGE_ATTRIBUTES: &str = "edge_attributes";
}

impl Persist for SamplingGraph {
    fn save(&self, archive: &mut Archive) -> Result<()> {
        debug!(
            "Saving sampling graph: {} nodes, {} edges",
            self.num_nodes(),
            self.num_edges()
        );

        archive.write(keys::VERSION, SCHEMA_VERSION)?;
        archive.write(keys::ROW_OFFSETS, NumericArray::from_slice(&self.row_offsets))?;
        archive.write(keys::COL_INDICES, NumericArray::from_slice(&self.col_indices))?;

        if let Some(offsets) = &self.node_type_offset {
            archive.write(keys::NODE_TYPE_OFFSET, NumericArray::from_slice(offsets))?;
        }
        if let Some(types) = &self.type_per_edge {
            archive.write(keys::TYPE_PER_EDGE, NumericArray::from_slice(types))?;
        }
        if let Some(map) = &self.node_type_to_id {
            write_type_ids(archive, keys::NODE_TYPE_TO_ID, map)?;
        }
        if let Some(map) = &self.edge_type_to_id {
            write_type_ids(archive, keys::EDGE_TYPE_TO_ID, map)?;
        }
        if let Some(table) = &self.node_attributes {
            write_table(archive, keys::NODE_ATTRIBUTES, table)?;
        }
        if let Some(table) = &self.edge_attributes {
            write_table(archive, keys::EDGE_ATTRIBUTES, table)?;
        }
        Ok(())
    }

    fn load(archive: &mut Archive) -> Result<Self> {
        let version = archive.read(keys::VERSION)?.as_int()?;
        if version != SCHEMA_VERSION {
            return Err(Error::UnsupportedVersion(version));
        }

        let row_offsets = read_vec::<i64>(archive, keys::ROW_OFFSETS)?;
        let col_indices = read_vec::<i64>(archive, keys::COL_INDICES)?;
        let mut graph = SamplingGraph::new(row_offsets, col_indices)?;

        if archive.contains(keys::NODE_TYPE_OFFSET) {
            graph.node_type_offset = Some(read_vec(archive, keys::NODE_TYPE_OFFSET)?);
        }
        if archive.contains(keys::TYPE_PER_EDGE) {
            graph.type_per_edge = Some(read_vec(archive, keys::TYPE_PER_EDGE)?);
        }
        if archive.contains(keys::NODE_TYPE_TO_ID) {
            graph.node_type_to_id = Some(read_type_ids(archive, keys::NODE_TYPE_TO_ID)?);
        }
        if archive.contains(keys::EDGE_TYPE_TO_ID) {
            graph.edge_type_to_id = Some(read_type_ids(archive, keys::EDGE_TYPE_TO_ID)?);
        }
        if archive.contains(keys::NODE_ATTRIBUTES) {
            graph.node_attributes = Some(read_table(archive, keys::NODE_ATTRIBUTES, "node")?);
        }
        if archive.contains(keys::EDGE_ATTRIBUTES) {
            graph.edge_attributes = Some(read_table(archive, keys::EDGE_ATTRIBUTES, "edge")?);
        }

        graph.validate()?;
        debug!(
            "Loaded sampling graph: {} nodes, {} edges{}",
            graph.num_nodes(),
            graph.num_edges(),
            if graph.is_heterogeneous() { " (heterogeneous)" } else { "" }
        );
        Ok(graph)
    }
}

fn write_type_ids(archive: &mut Archive, key: &str, map: &TypeIdMap) -> Result<()> {
    archive.scoped(key, |ar| {
        for (name, &id) in map {
            ar.write(name.as_str(), id)?;
        }
        Ok(())
    })
}

fn write_table(archive: &mut Archive, key: &str, table: &AttributeTable) -> Result<()> {
    archive.scoped(key, |ar| {
        for (name, column) in table.iter() {
            ar.write(name, column.clone())?;
        }
        Ok(())
    })
}

/// Read a rank-1 array of `T` stored under `key`.
fn read_vec<T: ArchivePod>(archive: &Archive, key: &str) -> Result<Vec<T>> {
    let value = archive.read(key)?;
    let kind = value.kind();
    let array = value
        .into_array()
        .map_err(|_| Error::schema(format!("{} must be an array, got {}", key, kind)))?;

    if array.dtype() != T::DATA_TYPE || array.shape().rank() != 1 {
        return Err(Error::schema(format!(
            "{} must be a rank-1 {} array, got {} {}",
            key,
            T::DATA_TYPE,
            array.dtype(),
            array.shape()
        )));
    }
    array.to_vec()
}

/// Entries of the scope `key`, in write order.
fn read_scope(archive: &mut Archive, key: &str) -> Result<Record> {
    archive.scoped(key, |ar| {
        let names: Vec<String> = ar.keys().map(str::to_string).collect();
        let mut record = Record::new();
        for name in names {
            let value = ar.read(&name)?;
            record.insert(name, value)?;
        }
        Ok(record)
    })
}

fn read_type_ids(archive: &mut Archive, key: &str) -> Result<TypeIdMap> {
    let mut map = TypeIdMap::new();
    for (name, value) in read_scope(archive, key)? {
        let id = value.as_int().map_err(|_| {
            Error::schema(format!("{}: id of {:?} is a {}, not an int", key, name, value.kind()))
        })?;
        map.insert(name, id);
    }
    Ok(map)
}

fn read_table(archive: &mut Archive, key: &str, what: &str) -> Result<AttributeTable> {
    AttributeTable::from_record(read_scope(archive, key)?, what)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::TypedValue;

    fn toy_graph() -> SamplingGraph {
        SamplingGraph::from_edges(3, &[(0, 1), (1, 2), (2, 0)]).unwrap()
    }

    fn saved(graph: &SamplingGraph) -> Archive {
        let mut archive = Archive::writer();
        graph.save(&mut archive).unwrap();
        Archive::from_bytes(&archive.into_bytes().unwrap()).unwrap()
    }

    #[test]
    fn test_minimal_keys() {
        let mut out = Archive::writer();
        toy_graph().save(&mut out).unwrap();
        assert_eq!(
            out.keys().collect::<Vec<_>>(),
            vec![keys::VERSION, keys::ROW_OFFSETS, keys::COL_INDICES]
        );
    }

    #[test]
    fn test_type_ids_saved_as_scope() {
        let map: TypeIdMap = [("n0".to_string(), 0)].into_iter().collect();
        let graph = toy_graph().with_node_type_to_id(map).unwrap();
        let archive = saved(&graph);
        let record = archive.read(keys::NODE_TYPE_TO_ID).unwrap().into_record().unwrap();
        assert_eq!(record.get("n0"), Some(&TypedValue::Int(0)));
    }

    #[test]
    fn test_wrong_dtype_is_schema_violation() {
        let mut out = Archive::writer();
        out.write(keys::VERSION, SCHEMA_VERSION).unwrap();
        out.write(keys::ROW_OFFSETS, NumericArray::from_slice(&[0i32, 1])).unwrap();
        out.write(keys::COL_INDICES, NumericArray::from_slice(&[0i64])).unwrap();
        let mut archive = Archive::from_bytes(&out.into_bytes().unwrap()).unwrap();
        assert!(matches!(
            SamplingGraph::load(&mut archive),
            Err(Error::SchemaViolation(_))
        ));
    }

    #[test]
    fn test_non_array_topology_is_schema_violation() {
        let mut out = Archive::writer();
        out.write(keys::VERSION, SCHEMA_VERSION).unwrap();
        out.write(keys::ROW_OFFSETS, "0,1").unwrap();
        out.write(keys::COL_INDICES, NumericArray::from_slice(&[0i64])).unwrap();
        let mut archive = Archive::from_bytes(&out.into_bytes().unwrap()).unwrap();
        assert!(matches!(
            SamplingGraph::load(&mut archive),
            Err(Error::SchemaViolation(_))
        ));
    }

    #[test]
    fn test_non_int_version_is_type_mismatch() {
        let mut out = Archive::writer();
        out.write(keys::VERSION, "1").unwrap();
        let mut archive = Archive::from_bytes(&out.into_bytes().unwrap()).unwrap();
        assert!(matches!(
            SamplingGraph::load(&mut archive),
            Err(Error::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_bad_type_id_value() {
        let mut out = Archive::writer();
        toy_graph().save(&mut out).unwrap();
        out.enter_scope(keys::EDGE_TYPE_TO_ID).unwrap();
        out.write("cites", 0.5f64).unwrap();
        out.leave_scope().unwrap();
        let mut archive = Archive::from_bytes(&out.into_bytes().unwrap()).unwrap();
        assert!(matches!(
            SamplingGraph::load(&mut archive),
            Err(Error::SchemaViolation(_))
        ));
        assert_eq!(archive.depth(), 0);
    }

    #[test]
    fn test_default_graph_roundtrip() {
        let empty = SamplingGraph::default();
        assert_eq!(empty.num_nodes(), 0);
        assert_eq!(empty.num_edges(), 0);

        let mut archive = saved(&empty);
        assert_eq!(SamplingGraph::load(&mut archive).unwrap(), empty);
    }
}
