//! Per-node and per-edge attribute tables.

use crate::util::{Error, Result};
use crate::value::{NumericArray, Record};

/// Named attribute columns, in insertion order.
///
/// Every column's leading dimension is the number of nodes (or edges) of the
/// graph it is attached to; [`SamplingGraph`](super::SamplingGraph) checks
/// that when the table is attached or loaded.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AttributeTable {
    columns: Vec<(String, NumericArray)>,
}

impl AttributeTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a column. Fails with `DuplicateKey` if `name` exists.
    pub fn insert(&mut self, name: impl Into<String>, column: NumericArray) -> Result<()> {
        let name = name.into();
        if self.get(&name).is_some() {
            return Err(Error::DuplicateKey(name));
        }
        self.columns.push((name, column));
        Ok(())
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with(mut self, name: impl Into<String>, column: NumericArray) -> Result<Self> {
        self.insert(name, column)?;
        Ok(self)
    }

    pub fn get(&self, name: &str) -> Option<&NumericArray> {
        self.columns.iter().find(|(n, _)| n == name).map(|(_, c)| c)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.columns.iter().map(|(n, _)| n.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &NumericArray)> + '_ {
        self.columns.iter().map(|(n, c)| (n.as_str(), c))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Check that every column has `rows` entries along its first axis.
    pub(crate) fn check_rows(&self, rows: usize, what: &str) -> Result<()> {
        for (name, column) in self.iter() {
            if column.leading_dim() != Some(rows) {
                return Err(Error::schema(format!(
                    "{} attribute {:?} has shape {}, expected {} rows",
                    what,
                    name,
                    column.shape(),
                    rows
                )));
            }
        }
        Ok(())
    }

    /// Rebuild a table from a record of arrays.
    pub(crate) fn from_record(record: Record, what: &str) -> Result<Self> {
        let mut table = Self::new();
        for (name, value) in record {
            let kind = value.kind();
            let column = value.into_array().map_err(|_| {
                Error::schema(format!("{} attribute {:?} is a {}, not an array", what, name, kind))
            })?;
            table.insert(name, column)?;
        }
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::TypedValue;

    #[test]
    fn test_insert_and_lookup() {
        let table = AttributeTable::new()
            .with("feat", NumericArray::from_slice_with_shape(&[0f32; 6], (3, 2)).unwrap())
            .unwrap()
            .with("label", NumericArray::from_slice(&[0i64, 1, 1]))
            .unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.names().collect::<Vec<_>>(), vec!["feat", "label"]);
        assert!(table.get("label").is_some());
        assert!(table.check_rows(3, "node").is_ok());
        assert!(matches!(table.check_rows(4, "node"), Err(Error::SchemaViolation(_))));
    }

    #[test]
    fn test_duplicate_column() {
        let mut table = AttributeTable::new();
        table.insert("w", NumericArray::from_slice(&[1.0f64])).unwrap();
        assert!(matches!(
            table.insert("w", NumericArray::from_slice(&[2.0f64])),
            Err(Error::DuplicateKey(_))
        ));
    }

    #[test]
    fn test_scalar_column_has_no_rows() {
        let table = AttributeTable::new().with("bias", NumericArray::scalar(1.0f32)).unwrap();
        assert!(table.check_rows(1, "edge").is_err());
    }

    #[test]
    fn test_record_conversion() {
        let table = AttributeTable::new()
            .with("w", NumericArray::from_slice(&[0.5f32, 0.25]))
            .unwrap();
        let record = Record::from_entries([("w", NumericArray::from_slice(&[0.5f32, 0.25]))]).unwrap();
        assert_eq!(AttributeTable::from_record(record, "edge").unwrap(), table);

        let bad = Record::from_entries([("w", TypedValue::Int(3))]).unwrap();
        assert!(matches!(
            AttributeTable::from_record(bad, "edge"),
            Err(Error::SchemaViolation(_))
        ));
    }
}
