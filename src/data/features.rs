use ndarray::{Array2, ArrayView1, ArrayView2};

use super::model::{Dataset, Value};
use crate::error::{Error, Result};

// ---------------------------------------------------------------------------
// FeatureMatrix – numeric model input
// ---------------------------------------------------------------------------

/// Row-major `n × d` matrix of feature values plus the column names they came
/// from. Row `i` is the feature vector of dataset row `i`.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureMatrix {
    names: Vec<String>,
    values: Array2<f64>,
}

impl FeatureMatrix {
    pub fn new(names: Vec<String>, values: Array2<f64>) -> Result<Self> {
        if names.len() != values.ncols() {
            return Err(Error::invalid_input(format!(
                "{} feature names for {} columns",
                names.len(),
                values.ncols()
            )));
        }
        Ok(Self { names, values })
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn n_rows(&self) -> usize {
        self.values.nrows()
    }

    pub fn n_features(&self) -> usize {
        self.values.ncols()
    }

    pub fn view(&self) -> ArrayView2<'_, f64> {
        self.values.view()
    }

    /// Feature vector of one row.
    pub fn row(&self, i: usize) -> ArrayView1<'_, f64> {
        self.values.row(i)
    }
}

// ---------------------------------------------------------------------------
// Extraction
// ---------------------------------------------------------------------------

/// Select `columns` from every row of `dataset`, preserving row order.
///
/// Every selected cell must be a finite number. Integers are widened to
/// `f64`; strings, booleans, and nulls are rejected with the offending row and
/// column in the message.
pub fn extract(dataset: &Dataset, columns: &[String]) -> Result<FeatureMatrix> {
    if columns.is_empty() {
        return Err(Error::invalid_input("no feature columns requested"));
    }
    if let Some(missing) = columns.iter().find(|c| !dataset.has_column(c)) {
        return Err(Error::MissingColumn {
            column: missing.clone(),
        });
    }

    let mut values = Array2::<f64>::zeros((dataset.len(), columns.len()));
    for (i, row) in dataset.rows.iter().enumerate() {
        for (j, col) in columns.iter().enumerate() {
            let cell = row.get(col).unwrap_or(&Value::Null);
            values[(i, j)] = numeric_cell(cell, i, col)?;
        }
    }

    FeatureMatrix::new(columns.to_vec(), values)
}

fn numeric_cell(cell: &Value, row: usize, col: &str) -> Result<f64> {
    match cell.as_f64() {
        Some(v) if v.is_finite() => Ok(v),
        Some(v) => Err(Error::invalid_input(format!(
            "row {row}, column '{col}': {v} is not finite"
        ))),
        None if cell.is_null() => Err(Error::invalid_input(format!(
            "row {row}, column '{col}': value is missing"
        ))),
        None => Err(Error::invalid_input(format!(
            "row {row}, column '{col}': '{cell}' is not numeric"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Row;

    fn columns() -> Vec<String> {
        vec!["Quantity".to_string(), "TotalSalesValues".to_string()]
    }

    fn sale(quantity: Value, total: Value) -> Row {
        let mut row = Row::new();
        row.insert("Quantity".into(), quantity);
        row.insert("TotalSalesValues".into(), total);
        row.insert("ProductID".into(), Value::from("PR6112"));
        row
    }

    #[test]
    fn keeps_row_order_and_count() {
        let ds = Dataset::from_rows(vec![
            sale(Value::Integer(3), Value::Float(30.5)),
            sale(Value::Integer(1), Value::Integer(100)),
            sale(Value::Float(7.0), Value::Integer(0)),
        ]);
        let features = extract(&ds, &columns()).unwrap();
        assert_eq!(features.n_rows(), ds.len());
        assert_eq!(features.n_features(), 2);
        assert_eq!(features.names(), columns().as_slice());
        assert_eq!(features.row(0).to_vec(), vec![3.0, 30.5]);
        assert_eq!(features.row(1).to_vec(), vec![1.0, 100.0]);
        assert_eq!(features.row(2).to_vec(), vec![7.0, 0.0]);
    }

    #[test]
    fn column_order_follows_request() {
        let ds = Dataset::from_rows(vec![sale(Value::Integer(2), Value::Integer(40))]);
        let reversed = vec!["TotalSalesValues".to_string(), "Quantity".to_string()];
        let features = extract(&ds, &reversed).unwrap();
        assert_eq!(features.row(0).to_vec(), vec![40.0, 2.0]);
    }

    #[test]
    fn missing_total_sales_column() {
        let mut row = Row::new();
        row.insert("Quantity".into(), Value::Integer(1));
        let ds = Dataset::from_rows(vec![row]);
        assert_eq!(
            extract(&ds, &columns()).unwrap_err(),
            Error::MissingColumn {
                column: "TotalSalesValues".into()
            }
        );
    }

    #[test]
    fn rejects_non_numeric_and_missing_cells() {
        let text = Dataset::from_rows(vec![sale(Value::Integer(1), Value::from("lots"))]);
        assert!(matches!(extract(&text, &columns()), Err(Error::InvalidInput(_))));

        let null = Dataset::from_rows(vec![sale(Value::Null, Value::Integer(5))]);
        assert!(matches!(extract(&null, &columns()), Err(Error::InvalidInput(_))));

        let nan = Dataset::from_rows(vec![sale(Value::Integer(1), Value::Float(f64::NAN))]);
        assert!(matches!(extract(&nan, &columns()), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn ragged_row_reads_as_missing() {
        let mut short = Row::new();
        short.insert("Quantity".into(), Value::Integer(1));
        let ds = Dataset::from_rows(vec![sale(Value::Integer(1), Value::Integer(2)), short]);
        let err = extract(&ds, &columns()).unwrap_err();
        assert_eq!(
            err,
            Error::InvalidInput("row 1, column 'TotalSalesValues': value is missing".into())
        );
    }

    #[test]
    fn empty_dataset_gives_empty_matrix() {
        let ds = Dataset::with_columns(columns(), Vec::new());
        let features = extract(&ds, &columns()).unwrap();
        assert_eq!(features.n_rows(), 0);
        assert_eq!(features.n_features(), 2);
    }

    #[test]
    fn no_columns_is_invalid() {
        let ds = Dataset::from_rows(vec![sale(Value::Integer(1), Value::Integer(2))]);
        assert!(matches!(extract(&ds, &[]), Err(Error::InvalidInput(_))));
    }
}
