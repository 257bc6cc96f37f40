use std::collections::{BTreeMap, BTreeSet};

use crate::data::model::Value;
use crate::error::{Error, Result};

// ---------------------------------------------------------------------------
// Label codec: categorical label ↔ dense integer code
// ---------------------------------------------------------------------------

/// Maps the distinct labels of a training column to codes `0..K-1`.
///
/// Codes follow ascending [`Value`] order of the distinct labels, so string
/// labels are numbered lexicographically (`"No"` → 0, `"Yes"` → 1) regardless
/// of the order in which rows arrive. The mapping is fixed once fitted.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelCodec {
    codes: BTreeMap<Value, usize>,
    classes: Vec<Value>,
}

impl LabelCodec {
    /// Fit the codec on a label column.
    pub fn fit(labels: &[Value]) -> Result<Self> {
        if labels.is_empty() {
            return Err(Error::invalid_input("cannot fit a label codec on zero labels"));
        }
        if let Some(i) = labels.iter().position(Value::is_null) {
            return Err(Error::invalid_input(format!("label at row {i} is null")));
        }

        let distinct: BTreeSet<&Value> = labels.iter().collect();
        let classes: Vec<Value> = distinct.into_iter().cloned().collect();
        let codes = classes
            .iter()
            .enumerate()
            .map(|(code, label)| (label.clone(), code))
            .collect();

        Ok(LabelCodec { codes, classes })
    }

    /// Number of distinct labels `K`.
    pub fn n_classes(&self) -> usize {
        self.classes.len()
    }

    /// Labels in code order.
    pub fn classes(&self) -> &[Value] {
        &self.classes
    }

    pub fn code_of(&self, label: &Value) -> Option<usize> {
        self.codes.get(label).copied()
    }

    pub fn label_of(&self, code: usize) -> Option<&Value> {
        self.classes.get(code)
    }

    /// Encode each label through the fitted mapping.
    pub fn encode(&self, labels: &[Value]) -> Result<Vec<usize>> {
        labels
            .iter()
            .map(|label| {
                self.code_of(label).ok_or_else(|| Error::UnknownLabel {
                    label: label.clone(),
                })
            })
            .collect()
    }

    /// Map each code back to its label.
    pub fn decode(&self, codes: &[i64]) -> Result<Vec<Value>> {
        codes
            .iter()
            .map(|&code| {
                usize::try_from(code)
                    .ok()
                    .and_then(|c| self.label_of(c))
                    .cloned()
                    .ok_or(Error::InvalidCode {
                        code: code as f64,
                        n_classes: self.n_classes(),
                    })
            })
            .collect()
    }
}
