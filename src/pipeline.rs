use std::collections::BTreeMap;

use ndarray::Array1;

use crate::codec::LabelCodec;
use crate::config::PipelineConfig;
use crate::data::features::extract;
use crate::data::filter::{missing_indices, training_subset};
use crate::data::model::{Dataset, Value};
use crate::error::{DatasetRole, Error, PipelineError, Stage, Step};
use crate::regression::{LinearModel, LinearRegression, decode_predictions, predict};

// ---------------------------------------------------------------------------
// Predictions – the pipeline's output
// ---------------------------------------------------------------------------

/// One predicted label per test row, in test-row order, alongside the raw
/// regression score it was decoded from.
#[derive(Debug, Clone, PartialEq)]
pub struct Predictions {
    pub labels: Vec<Value>,
    pub scores: Vec<f64>,
}

impl Predictions {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Number of rows predicted for each label.
    pub fn counts(&self) -> BTreeMap<Value, usize> {
        let mut counts = BTreeMap::new();
        for label in &self.labels {
            *counts.entry(label.clone()).or_insert(0) += 1;
        }
        counts
    }
}

// ---------------------------------------------------------------------------
// Pipeline state
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
enum State {
    #[default]
    Idle,
    Prepared {
        training: Dataset,
        test: Dataset,
    },
    Trained {
        test: Dataset,
    },
    Scored {
        predictions: Predictions,
    },
    Done,
    Failed,
}

impl State {
    fn stage(&self) -> Stage {
        match self {
            State::Idle => Stage::Idle,
            State::Prepared { .. } => Stage::Prepared,
            State::Trained { .. } => Stage::Trained,
            State::Scored { .. } => Stage::Scored,
            State::Done => Stage::Done,
            State::Failed => Stage::Failed,
        }
    }
}

/// Single-pass train-then-score run over one training and one test dataset.
///
/// ```text
/// Idle ─prepare→ Prepared ─train→ Trained ─score→ Scored ─finish→ Done
///   └──────────────┴─────────────────┴──────────────┴──→ Failed
/// ```
///
/// The codec and model are owned by the pipeline and fitted exactly once, on
/// the training data; scoring reuses the same codec. Any failure moves the
/// pipeline to `Failed` and no predictions are returned.
#[derive(Debug)]
pub struct Pipeline {
    config: PipelineConfig,
    state: State,
    codec: Option<LabelCodec>,
    model: Option<LinearModel>,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            state: State::Idle,
            codec: None,
            model: None,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn stage(&self) -> Stage {
        self.state.stage()
    }

    /// The label codec, once `train` has succeeded.
    pub fn codec(&self) -> Option<&LabelCodec> {
        self.codec.as_ref()
    }

    /// The fitted model, once `train` has succeeded.
    pub fn model(&self) -> Option<&LinearModel> {
        self.model.as_ref()
    }

    /// Drive every step and return the predictions.
    pub fn run(
        &mut self,
        training: Dataset,
        test: Dataset,
    ) -> Result<Predictions, PipelineError> {
        self.prepare(training, test)?;
        self.train()?;
        self.score()?;
        self.finish()
    }

    /// `Idle → Prepared`: validate the config and both datasets, then derive
    /// the training subset.
    pub fn prepare(&mut self, training: Dataset, test: Dataset) -> Result<(), PipelineError> {
        self.require_stage(Stage::Idle, Step::Prepare)?;

        if let Err(err) = self.config.validate() {
            return Err(self.fail(Step::Prepare, Error::invalid_input(err.to_string())));
        }

        let checked = self
            .check_dataset(&training, DatasetRole::Training)
            .and_then(|_| self.check_dataset(&test, DatasetRole::Test));
        if let Err(err) = checked {
            return Err(self.fail(Step::Prepare, err));
        }

        // Rows past the subset never reach the codec, so only their head is
        // checked for labels.
        let training = training_subset(&training, self.config.training_limit());
        if let Err(err) = self.check_labels(&training) {
            return Err(self.fail(Step::Prepare, err));
        }

        log::info!(
            "Prepared {} training rows and {} test rows",
            training.len(),
            test.len()
        );
        self.state = State::Prepared { training, test };
        Ok(())
    }

    /// `Prepared → Trained`: fit the label codec and the regression model.
    pub fn train(&mut self) -> Result<(), PipelineError> {
        let (training, test) = match std::mem::take(&mut self.state) {
            State::Prepared { training, test } => (training, test),
            other => return Err(self.restore(other, Stage::Prepared, Step::Train)),
        };

        match self.fit_models(&training) {
            Ok((codec, model)) => {
                log::info!(
                    "Trained on {} rows: {} classes, weights={}, bias={:.6}",
                    training.len(),
                    codec.n_classes(),
                    model.weights(),
                    model.bias()
                );
                self.codec = Some(codec);
                self.model = Some(model);
                self.state = State::Trained { test };
                Ok(())
            }
            Err(err) => Err(self.fail(Step::Train, err)),
        }
    }

    /// `Trained → Scored`: score the test rows with the fitted codec and model.
    pub fn score(&mut self) -> Result<(), PipelineError> {
        let test = match std::mem::take(&mut self.state) {
            State::Trained { test } => test,
            other => return Err(self.restore(other, Stage::Trained, Step::Score)),
        };

        match self.score_rows(&test) {
            Ok(predictions) => {
                log::info!("Scored {} test rows", predictions.len());
                self.state = State::Scored { predictions };
                Ok(())
            }
            Err(err) => Err(self.fail(Step::Score, err)),
        }
    }

    /// `Scored → Done`: hand the predictions to the caller.
    pub fn finish(&mut self) -> Result<Predictions, PipelineError> {
        match std::mem::replace(&mut self.state, State::Done) {
            State::Scored { predictions } => Ok(predictions),
            other => Err(self.restore(other, Stage::Scored, Step::Finish)),
        }
    }

    // -- steps --

    fn check_dataset(&self, dataset: &Dataset, role: DatasetRole) -> Result<(), Error> {
        let wrap = |err| Error::ingestion(role, err);

        if dataset.is_empty() {
            return Err(wrap(Error::invalid_input("dataset has no rows")));
        }
        if let Some(col) = self
            .config
            .feature_columns
            .iter()
            .find(|c| !dataset.has_column(c))
        {
            return Err(wrap(Error::MissingColumn { column: col.clone() }));
        }
        if role == DatasetRole::Training {
            let label = &self.config.label_column;
            if !dataset.has_column(label) {
                return Err(wrap(Error::MissingColumn {
                    column: label.clone(),
                }));
            }
        }
        Ok(())
    }

    fn check_labels(&self, training: &Dataset) -> Result<(), Error> {
        let label = &self.config.label_column;
        match missing_indices(training, label).first() {
            Some(&row) => Err(Error::ingestion(
                DatasetRole::Training,
                Error::invalid_input(format!("row {row} has no '{label}' label")),
            )),
            None => Ok(()),
        }
    }

    fn fit_models(&self, training: &Dataset) -> Result<(LabelCodec, LinearModel), Error> {
        let labels = training.column(&self.config.label_column);
        let codec = LabelCodec::fit(&labels)?;
        let targets: Array1<f64> = codec
            .encode(&labels)?
            .into_iter()
            .map(|code| code as f64)
            .collect();

        let features = extract(training, &self.config.feature_columns)?;
        let model = LinearRegression::new(self.config.trainer).fit(&features, targets.view())?;
        Ok((codec, model))
    }

    fn score_rows(&self, test: &Dataset) -> Result<Predictions, Error> {
        let (Some(codec), Some(model)) = (&self.codec, &self.model) else {
            return Err(Error::OutOfOrder {
                expected: Stage::Trained,
                actual: self.stage(),
            });
        };

        let features = extract(test, &self.config.feature_columns)?;
        let scores = predict(model, &features)?.to_vec();
        let decoded = decode_predictions(&scores, codec, self.config.rounding)?;
        if decoded.clamped > 0 {
            log::warn!(
                "{} of {} scores fell outside the label range and were clamped",
                decoded.clamped,
                scores.len()
            );
        }

        Ok(Predictions {
            labels: decoded.labels,
            scores,
        })
    }

    // -- state helpers --

    fn require_stage(&self, expected: Stage, step: Step) -> Result<(), PipelineError> {
        let actual = self.stage();
        if actual == expected {
            Ok(())
        } else {
            Err(PipelineError::new(step, Error::OutOfOrder { expected, actual }))
        }
    }

    /// Put back a state that a step could not consume and report it.
    fn restore(&mut self, state: State, expected: Stage, step: Step) -> PipelineError {
        let actual = state.stage();
        self.state = state;
        PipelineError::new(step, Error::OutOfOrder { expected, actual })
    }

    fn fail(&mut self, step: Step, err: Error) -> PipelineError {
        log::error!("Pipeline failed during {step}: {err}");
        self.state = State::Failed;
        PipelineError::new(step, err)
    }
}
