//! Sampling graph in compressed sparse form.
//!
//! The neighbors of node `v` are
//! `col_indices[row_offsets[v]..row_offsets[v + 1]]`. Heterogeneous graphs
//! carry node types as contiguous ranges (`node_type_offset`) and edge types
//! as a parallel array (`type_per_edge`), with optional name→id tables.
//! Node and edge attribute tables are optional as well; absence is `None`,
//! which is distinct from an empty table.

mod attributes;
mod codec;

pub use attributes::AttributeTable;
pub use codec::{keys, SCHEMA_VERSION};

use std::collections::BTreeMap;

use crate::util::{Error, Result};

/// Mapping from type name to type id.
pub type TypeIdMap = BTreeMap<String, i64>;

/// A directed graph used for neighbor sampling.
///
/// The default value is the empty graph: no nodes, no edges, no optional
/// fields.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SamplingGraph {
    row_offsets: Vec<i64>,
    col_indices: Vec<i64>,
    node_type_offset: Option<Vec<i64>>,
    type_per_edge: Option<Vec<u8>>,
    node_type_to_id: Option<TypeIdMap>,
    edge_type_to_id: Option<TypeIdMap>,
    node_attributes: Option<AttributeTable>,
    edge_attributes: Option<AttributeTable>,
}

impl Default for SamplingGraph {
    fn default() -> Self {
        Self {
            row_offsets: vec![0],
            col_indices: Vec::new(),
            node_type_offset: None,
            type_per_edge: None,
            node_type_to_id: None,
            edge_type_to_id: None,
            node_attributes: None,
            edge_attributes: None,
        }
    }
}

impl SamplingGraph {
    /// Create a graph from its offset and index arrays.
    ///
    /// Fails with `SchemaViolation` if the arrays are not a valid
    /// compressed sparse representation.
    pub fn new(row_offsets: Vec<i64>, col_indices: Vec<i64>) -> Result<Self> {
        let graph = Self {
            row_offsets,
            col_indices,
            ..Self::default()
        };
        graph.validate_topology()?;
        Ok(graph)
    }

    /// Create a graph with `num_nodes` nodes from `(src, dst)` pairs.
    ///
    /// Edges keep their relative order within each source node.
    pub fn from_edges(num_nodes: usize, edges: &[(i64, i64)]) -> Result<Self> {
        let in_range = |v: i64| v >= 0 && (v as u64) < num_nodes as u64;

        let mut row_offsets = vec![0i64; num_nodes + 1];
        for &(src, dst) in edges {
            if !in_range(src) || !in_range(dst) {
                return Err(Error::schema(format!(
                    "edge ({}, {}) outside of {} nodes",
                    src, dst, num_nodes
                )));
            }
            row_offsets[src as usize + 1] += 1;
        }
        for i in 1..row_offsets.len() {
            row_offsets[i] += row_offsets[i - 1];
        }

        let mut next = row_offsets[..num_nodes].to_vec();
        let mut col_indices = vec![0i64; edges.len()];
        for &(src, dst) in edges {
            let slot = &mut next[src as usize];
            col_indices[*slot as usize] = dst;
            *slot += 1;
        }

        Self::new(row_offsets, col_indices)
    }

    pub fn with_node_type_offset(mut self, offsets: Vec<i64>) -> Result<Self> {
        self.node_type_offset = Some(offsets);
        self.validate()?;
        Ok(self)
    }

    pub fn with_type_per_edge(mut self, types: Vec<u8>) -> Result<Self> {
        self.type_per_edge = Some(types);
        self.validate()?;
        Ok(self)
    }

    pub fn with_node_type_to_id(mut self, map: TypeIdMap) -> Result<Self> {
        self.node_type_to_id = Some(map);
        self.validate()?;
        Ok(self)
    }

    pub fn with_edge_type_to_id(mut self, map: TypeIdMap) -> Result<Self> {
        self.edge_type_to_id = Some(map);
        self.validate()?;
        Ok(self)
    }

    pub fn with_node_attributes(mut self, table: AttributeTable) -> Result<Self> {
        self.node_attributes = Some(table);
        self.validate()?;
        Ok(self)
    }

    pub fn with_edge_attributes(mut self, table: AttributeTable) -> Result<Self> {
        self.edge_attributes = Some(table);
        self.validate()?;
        Ok(self)
    }

    /// Number of nodes.
    #[inline]
    pub fn num_nodes(&self) -> usize {
        self.row_offsets.len().saturating_sub(1)
    }

    /// Number of edges.
    #[inline]
    pub fn num_edges(&self) -> usize {
        self.col_indices.len()
    }

    #[inline]
    pub fn row_offsets(&self) -> &[i64] {
        &self.row_offsets
    }

    #[inline]
    pub fn col_indices(&self) -> &[i64] {
        &self.col_indices
    }

    pub fn node_type_offset(&self) -> Option<&[i64]> {
        self.node_type_offset.as_deref()
    }

    pub fn type_per_edge(&self) -> Option<&[u8]> {
        self.type_per_edge.as_deref()
    }

    pub fn node_type_to_id(&self) -> Option<&TypeIdMap> {
        self.node_type_to_id.as_ref()
    }

    pub fn edge_type_to_id(&self) -> Option<&TypeIdMap> {
        self.edge_type_to_id.as_ref()
    }

    pub fn node_attributes(&self) -> Option<&AttributeTable> {
        self.node_attributes.as_ref()
    }

    pub fn edge_attributes(&self) -> Option<&AttributeTable> {
        self.edge_attributes.as_ref()
    }

    /// True if node or edge types are present.
    pub fn is_heterogeneous(&self) -> bool {
        self.node_type_offset.is_some() || self.type_per_edge.is_some()
    }

    /// Neighbors of `node`, or `None` if it does not exist.
    pub fn neighbors(&self, node: usize) -> Option<&[i64]> {
        if node >= self.num_nodes() {
            return None;
        }
        let start = self.row_offsets[node] as usize;
        let end = self.row_offsets[node + 1] as usize;
        Some(&self.col_indices[start..end])
    }

    /// All edges as `(src, dst)` pairs in storage order.
    pub fn edges(&self) -> impl Iterator<Item = (i64, i64)> + '_ {
        self.row_offsets.windows(2).enumerate().flat_map(move |(src, w)| {
            self.col_indices[w[0] as usize..w[1] as usize]
                .iter()
                .map(move |&dst| (src as i64, dst))
        })
    }

    /// Check the offset/index arrays.
    pub(crate) fn validate_topology(&self) -> Result<()> {
        check_offsets(&self.row_offsets, self.col_indices.len(), "row_offsets")?;

        let num_nodes = self.num_nodes();
        if let Some(i) = self
            .col_indices
            .iter()
            .position(|&v| v < 0 || v as u64 >= num_nodes as u64)
        {
            return Err(Error::schema(format!(
                "col_indices[{}] = {} outside of {} nodes",
                i, self.col_indices[i], num_nodes
            )));
        }
        Ok(())
    }

    /// Check every field and the consistency between fields.
    pub(crate) fn validate(&self) -> Result<()> {
        self.validate_topology()?;
        let num_nodes = self.num_nodes();
        let num_edges = self.num_edges();

        if let Some(map) = &self.node_type_to_id {
            check_type_ids(map, "node_type_to_id")?;
        }
        if let Some(map) = &self.edge_type_to_id {
            check_type_ids(map, "edge_type_to_id")?;
        }

        if let Some(offsets) = &self.node_type_offset {
            check_offsets(offsets, num_nodes, "node_type_offset")?;
            if let Some(map) = &self.node_type_to_id {
                if offsets.len() != map.len() + 1 {
                    return Err(Error::schema(format!(
                        "node_type_offset has {} entries for {} node types",
                        offsets.len(),
                        map.len()
                    )));
                }
            }
        }

        if let Some(types) = &self.type_per_edge {
            if types.len() != num_edges {
                return Err(Error::schema(format!(
                    "type_per_edge has {} entries for {} edges",
                    types.len(),
                    num_edges
                )));
            }
            if let Some(map) = &self.edge_type_to_id {
                if let Some(&t) = types.iter().find(|&&t| t as usize >= map.len()) {
                    return Err(Error::schema(format!(
                        "edge type {} outside of {} edge types",
                        t,
                        map.len()
                    )));
                }
            }
        }

        if let Some(table) = &self.node_attributes {
            table.check_rows(num_nodes, "node")?;
        }
        if let Some(table) = &self.edge_attributes {
            table.check_rows(num_edges, "edge")?;
        }
        Ok(())
    }
}

/// Offsets must start at 0, never decrease and end at `total`.
fn check_offsets(offsets: &[i64], total: usize, what: &str) -> Result<()> {
    let (first, last) = match (offsets.first(), offsets.last()) {
        (Some(&f), Some(&l)) => (f, l),
        _ => return Err(Error::schema(format!("{} is empty", what))),
    };
    if first != 0 {
        return Err(Error::schema(format!("{} starts at {}, expected 0", what, first)));
    }
    if let Some(i) = offsets.windows(2).position(|w| w[1] < w[0]) {
        return Err(Error::schema(format!(
            "{} decreases at index {} ({} -> {})",
            what,
            i + 1,
            offsets[i],
            offsets[i + 1]
        )));
    }
    if last < 0 || last as u64 != total as u64 {
        return Err(Error::schema(format!(
            "{} ends at {}, expected {}",
            what, last, total
        )));
    }
    Ok(())
}

/// Ids must be exactly `0..map.len()`.
fn check_type_ids(map: &TypeIdMap, what: &str) -> Result<()> {
    let mut seen = vec![false; map.len()];
    for (name, &id) in map {
        let slot = usize::try_from(id).ok().and_then(|i| seen.get_mut(i));
        let Some(slot) = slot else {
            return Err(Error::schema(format!(
                "{}: id {} of {:?} outside of 0..{}",
                what,
                id,
                name,
                map.len()
            )));
        };
        if *slot {
            return Err(Error::schema(format!("{}: id {} of {:?} is repeated", what, id, name)));
        }
        *slot = true;
    }
    Ok(())
}
