//! Generic column-oriented table.
//!
//! `Table` is the intermediate representation between a model and a writer:
//! models convert themselves into a `Table` through [`ToTable`], and the
//! writers in [`crate::output`] turn a `Table` into markup.
//!
//! Each column carries an optional unit and an optional display-format
//! annotation. The annotation is presentation only; it never changes the
//! stored values.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CosmotexError;
use crate::Result;

/// A single cell value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Missing value, written as an empty cell
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    /// Fixed-length vector quantity (e.g. neutrino masses)
    List(Vec<f64>),
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<Option<f64>> for Value {
    fn from(v: Option<f64>) -> Self {
        v.map_or(Value::Null, Value::Float)
    }
}

impl From<Vec<f64>> for Value {
    fn from(v: Vec<f64>) -> Self {
        Value::List(v)
    }
}

/// Format a float so that it reads back as a float.
///
/// Uses the shortest round-trip representation and appends `.0` to
/// integral values, so `70.0` is written as `70.0` rather than `70`.
pub fn format_float(v: f64) -> String {
    let s = v.to_string();
    if !v.is_finite() || s.contains(|c: char| matches!(c, '.' | 'e' | 'E')) {
        s
    } else {
        format!("{s}.0")
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Bool(true) => f.write_str("True"),
            Value::Bool(false) => f.write_str("False"),
            Value::Int(v) => write!(f, "{v}"),
            Value::Float(v) => f.write_str(&format_float(*v)),
            Value::Text(s) => f.write_str(s),
            Value::List(items) => {
                let parts: Vec<String> = items.iter().map(|v| format_float(*v)).collect();
                write!(f, "[{}]", parts.join(", "))
            }
        }
    }
}

/// A named column of values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    /// Column name, used for lookups and as the default header
    pub name: String,
    /// LaTeX unit expression, without math delimiters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    /// Display-format annotation: a LaTeX math label used for the header
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    /// Cell values, one per row
    pub values: Vec<Value>,
}

impl Column {
    /// Create a column with no unit and no display format.
    pub fn new(name: impl Into<String>, values: Vec<Value>) -> Self {
        Self {
            name: name.into(),
            unit: None,
            format: None,
            values,
        }
    }

    /// Builder: set the unit.
    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    /// Builder: set the display-format annotation.
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    /// Number of values in this column.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True if the column holds no values.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Ordered collection of equal-length columns.
///
/// Deserialization goes through [`Table::from_columns`], so decoded tables
/// hold the same invariants as built ones.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawTable")]
pub struct Table {
    columns: Vec<Column>,
}

/// Unchecked wire form of [`Table`].
#[derive(Deserialize)]
struct RawTable {
    columns: Vec<Column>,
}

impl TryFrom<RawTable> for Table {
    type Error = CosmotexError;

    fn try_from(raw: RawTable) -> Result<Self> {
        Table::from_columns(raw.columns)
    }
}

impl Table {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from columns, checking names and lengths.
    pub fn from_columns(columns: Vec<Column>) -> Result<Self> {
        let mut table = Self::new();
        for column in columns {
            table.push_column(column)?;
        }
        Ok(table)
    }

    /// Append a column.
    ///
    /// Fails if a column with the same name exists or if the length
    /// differs from the columns already present.
    pub fn push_column(&mut self, column: Column) -> Result<()> {
        if self.column(&column.name).is_some() {
            return Err(CosmotexError::Conversion(format!(
                "duplicate column '{}'",
                column.name
            )));
        }
        if let Some(first) = self.columns.first() {
            if first.len() != column.len() {
                return Err(CosmotexError::Conversion(format!(
                    "column '{}' has {} rows, expected {}",
                    column.name,
                    column.len(),
                    first.len()
                )));
            }
        }
        self.columns.push(column);
        Ok(())
    }

    /// All columns in order.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Look up a column by name.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Columns for in-crate annotation. Callers must not change lengths.
    pub(crate) fn columns_mut(&mut self) -> &mut [Column] {
        &mut self.columns
    }

    /// Column names in order.
    pub fn colnames(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Number of rows (0 for a table without columns).
    pub fn num_rows(&self) -> usize {
        self.columns.first().map_or(0, Column::len)
    }

    /// Number of columns.
    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }
}

/// Conversion of a model into a generic table.
pub trait ToTable {
    /// Build a fresh table from this value.
    fn to_table(&self) -> Result<Table>;
}

impl ToTable for Table {
    fn to_table(&self) -> Result<Table> {
        Ok(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_table() -> Table {
        Table::from_columns(vec![
            Column::new("name", vec!["A".into(), "B".into()]),
            Column::new("H0", vec![67.4.into(), 70.1.into()]),
        ])
        .unwrap()
    }

    #[test]
    fn test_colnames_and_shape() {
        let table = sample_table();
        assert_eq!(table.colnames(), vec!["name", "H0"]);
        assert_eq!(table.num_rows(), 2);
        assert_eq!(table.num_columns(), 2);
    }

    #[test]
    fn test_push_column_rejects_length_mismatch() {
        let mut table = sample_table();
        let err = table
            .push_column(Column::new("Om0", vec![0.3.into()]))
            .unwrap_err();
        assert!(matches!(err, CosmotexError::Conversion(_)));
        assert_eq!(table.num_columns(), 2);
    }

    #[test]
    fn test_push_column_rejects_duplicate() {
        let mut table = sample_table();
        let err = table
            .push_column(Column::new("H0", vec![1.0.into(), 2.0.into()]))
            .unwrap_err();
        assert!(matches!(err, CosmotexError::Conversion(_)));
    }

    #[test]
    fn test_format_float_keeps_decimal_point() {
        assert_eq!(format_float(70.0), "70.0");
        assert_eq!(format_float(67.4), "67.4");
        assert_eq!(format_float(0.0), "0.0");
        assert_eq!(format_float(-1.0), "-1.0");
        assert_eq!(format_float(f64::INFINITY), "inf");
    }

    #[test]
    fn test_value_display() {
        assert_eq!(Value::Null.to_string(), "");
        assert_eq!(Value::Bool(true).to_string(), "True");
        assert_eq!(Value::Int(3).to_string(), "3");
        assert_eq!(Value::List(vec![0.0, 0.06]).to_string(), "[0.0, 0.06]");
    }

    #[test]
    fn test_deserialize_checks_column_lengths() {
        let ragged = r#"{"columns":[{"name":"a","values":[1.0,2.0]},{"name":"H0","values":[1.0]}]}"#;
        let err = serde_json::from_str::<Table>(ragged).unwrap_err();
        assert!(err.to_string().contains("column 'H0' has 1 rows, expected 2"));

        let duplicate = r#"{"columns":[{"name":"a","values":[1]},{"name":"a","values":[2]}]}"#;
        assert!(serde_json::from_str::<Table>(duplicate).is_err());
    }

    #[test]
    fn test_serde_round_trip_keeps_shape() {
        let table = sample_table();
        let json = serde_json::to_string(&table).unwrap();
        assert!(json.starts_with(r#"{"columns":["#));
        assert_eq!(serde_json::from_str::<Table>(&json).unwrap(), table);
    }

    #[test]
    fn test_table_to_table_is_a_copy() {
        let table = sample_table();
        let copy = table.to_table().unwrap();
        assert_eq!(copy, table);
    }
}
