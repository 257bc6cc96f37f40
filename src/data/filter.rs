use super::model::{Dataset, Value};

// ---------------------------------------------------------------------------
// Row selection
// ---------------------------------------------------------------------------

/// Derive the labeled training subset: the first `limit` rows, or every row
/// when `limit` is `None`.
pub fn training_subset(dataset: &Dataset, limit: Option<usize>) -> Dataset {
    match limit {
        Some(n) if n < dataset.len() => dataset.head(n),
        _ => dataset.clone(),
    }
}

/// Indices of rows whose `column` is null or absent.
pub fn missing_indices(dataset: &Dataset, column: &str) -> Vec<usize> {
    dataset
        .rows
        .iter()
        .enumerate()
        .filter(|(_, row)| row.get(column).map_or(true, Value::is_null))
        .map(|(i, _)| i)
        .collect()
}
