use std::fmt::Write as _;
use std::path::Path;

use anyhow::{Context, Result, bail};

use crate::data::model::{Dataset, Value};
use crate::pipeline::Predictions;

/// Column appended to the test rows holding the raw regression score.
pub const SCORE_COLUMN: &str = "score";

/// Human-readable per-label breakdown of a prediction run.
pub fn summarize(predictions: &Predictions) -> String {
    let total = predictions.len();
    let mut out = format!("{total} predictions\n");
    for (label, count) in predictions.counts() {
        let share = if total == 0 {
            0.0
        } else {
            100.0 * count as f64 / total as f64
        };
        let _ = writeln!(out, "  {label:<16} {count:>8}  ({share:5.1}%)");
    }
    out
}

/// Write the test rows back out with the predicted label in `label_column`
/// and the raw score in [`SCORE_COLUMN`].
pub fn write_predictions_csv(
    path: &Path,
    test: &Dataset,
    predictions: &Predictions,
    label_column: &str,
) -> Result<()> {
    if test.len() != predictions.len() {
        bail!(
            "{} test rows but {} predictions",
            test.len(),
            predictions.len()
        );
    }

    let mut headers: Vec<&str> = test
        .column_names
        .iter()
        .map(String::as_str)
        .filter(|c| *c != label_column && *c != SCORE_COLUMN)
        .collect();
    let data_columns = headers.len();
    headers.push(label_column);
    headers.push(SCORE_COLUMN);

    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;
    writer.write_record(&headers).context("writing CSV header")?;

    for (i, (label, score)) in predictions
        .labels
        .iter()
        .zip(&predictions.scores)
        .enumerate()
    {
        let mut record: Vec<String> = headers[..data_columns]
            .iter()
            .map(|col| cell_text(test.value(i, col)))
            .collect();
        record.push(cell_text(label));
        record.push(score.to_string());
        writer
            .write_record(&record)
            .with_context(|| format!("writing CSV row {i}"))?;
    }
    writer.flush().context("flushing CSV")?;

    log::info!("Wrote {} predictions to {}", predictions.len(), path.display());
    Ok(())
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
