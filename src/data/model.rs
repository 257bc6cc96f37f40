use std::collections::{BTreeMap, HashSet};
use std::fmt;

// ---------------------------------------------------------------------------
// Value – a single cell in a dataset column
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value mirroring common spreadsheet column types.
/// Labels are used as `BTreeMap` keys by the codec, so `Value` must be `Ord`.
#[derive(Debug, Clone)]
pub enum Value {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

// -- Manual Eq/Ord so a Value can key a BTreeMap --

// Floats compare by `total_cmp`, so `NaN == NaN` and `0.0 != -0.0`, in line
// with `Hash` on the bit pattern.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == std::cmp::Ordering::Equal
    }
}

impl Eq for Value {}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use Value::*;
        fn discriminant(v: &Value) -> u8 {
            match v {
                Null => 0,
                Bool(_) => 1,
                Integer(_) => 2,
                Float(_) => 3,
                String(_) => 4,
            }
        }
        let da = discriminant(self);
        let db = discriminant(other);
        if da != db {
            return da.cmp(&db);
        }
        match (self, other) {
            (Bool(a), Bool(b)) => a.cmp(b),
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            (String(a), String(b)) => a.cmp(b),
            _ => std::cmp::Ordering::Equal,
        }
    }
}

impl std::hash::Hash for Value {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Value::String(s) => s.hash(state),
            Value::Integer(i) => i.hash(state),
            Value::Float(f) => f.to_bits().hash(state),
            Value::Bool(b) => b.hash(state),
            Value::Null => {}
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => write!(f, "{s}"),
            Value::Integer(i) => write!(f, "{i}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Null => write!(f, "<null>"),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl Value {
    /// Interpret the value as an `f64`. Only `Integer` and `Float` qualify.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(v) => Some(*v),
            Value::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

// ---------------------------------------------------------------------------
// Row – one record of a dataset
// ---------------------------------------------------------------------------

/// Column name → cell value.
pub type Row = BTreeMap<String, Value>;

static NULL: Value = Value::Null;

// ---------------------------------------------------------------------------
// Dataset – an ordered table of rows
// ---------------------------------------------------------------------------

/// An ordered sequence of rows together with the column schema.
///
/// Column names keep the order in which they were first seen, so a dataset
/// loaded from a CSV file reports its columns in header order. A row that
/// lacks one of the schema columns reads as [`Value::Null`] for it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    /// All rows, in source order.
    pub rows: Vec<Row>,
    /// Ordered list of column names present in at least one row.
    pub column_names: Vec<String>,
}

impl Dataset {
    /// Build the column schema from the loaded rows.
    pub fn from_rows(rows: Vec<Row>) -> Self {
        let mut seen: HashSet<String> = HashSet::new();
        let mut column_names = Vec::new();
        for row in &rows {
            for col in row.keys() {
                if seen.insert(col.clone()) {
                    column_names.push(col.clone());
                }
            }
        }
        Dataset { rows, column_names }
    }

    /// Build a dataset whose schema is given explicitly, in that order.
    ///
    /// Columns that no row carries are still part of the schema.
    pub fn with_columns(column_names: Vec<String>, rows: Vec<Row>) -> Self {
        let mut dataset = Dataset::from_rows(rows);
        let mut ordered = column_names;
        for col in dataset.column_names.drain(..) {
            if !ordered.contains(&col) {
                ordered.push(col);
            }
        }
        dataset.column_names = ordered;
        dataset
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the dataset has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_names.iter().any(|c| c == name)
    }

    /// Cell at `(row, column)`, `Null` when the row lacks the column.
    pub fn value(&self, row: usize, column: &str) -> &Value {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .unwrap_or(&NULL)
    }

    /// All values of one column in row order.
    pub fn column(&self, name: &str) -> Vec<Value> {
        self.rows
            .iter()
            .map(|r| r.get(name).cloned().unwrap_or(Value::Null))
            .collect()
    }

    /// The first `n` rows (all of them when `n >= len`).
    pub fn head(&self, n: usize) -> Dataset {
        Dataset {
            rows: self.rows.iter().take(n).cloned().collect(),
            column_names: self.column_names.clone(),
        }
    }
}
