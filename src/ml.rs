//! Train, predict and evaluate against the artifacts named by [`AppConfig`].
//!
//! `predict` and `evaluate` report every failure through the [`EventLog`]
//! before returning it, so a caller that only checks `is_err()` still leaves
//! a trace in the log file.

use crate::config::AppConfig;
use crate::encoder::LabelEncoder;
use crate::error::PredictionError;
use crate::logging::EventLog;
use crate::metrics::{self, ConfusionMatrix};
use crate::model::MlModel;
use anyhow::Result;
use ndarray::{Array1, Array2};

#[derive(Debug, Clone)]
pub struct Evaluation {
    pub confusion: ConfusionMatrix,
    pub accuracy: f64,
    pub report: String,
}

pub struct HeartModel<'a, L: EventLog> {
    cfg: &'a AppConfig,
    log: L,
}

impl<'a, L: EventLog> HeartModel<'a, L> {
    pub fn new(cfg: &'a AppConfig, log: L) -> Self {
        Self { cfg, log }
    }

    /// Fits and persists the model. Errors are returned untouched.
    pub fn train_model(&self, x_train: Array2<f64>, y_train: Array1<usize>) -> Result<MlModel> {
        let n = x_train.nrows();
        let model = MlModel::train(x_train, y_train, self.cfg.max_iterations)?;
        model.save(&self.cfg.model_path)?;
        log::debug!("Fitted on {} samples with {} features", n, model.n_features());
        self.log.info(&format!(
            "Model trained and saved at {}",
            self.cfg.model_path.display()
        ));
        Ok(model)
    }

    /// Decoded label per row of `x_val`.
    pub fn predict(&self, x_val: &Array2<f64>) -> Result<Vec<String>, PredictionError> {
        self.try_predict(x_val).map_err(|e| {
            if e.is_not_found() {
                self.log.error(&format!("Model or label encoder file not found: {e}"));
            } else {
                self.log.error(&format!("Error during prediction: {e}"));
            }
            e
        })
    }

    fn try_predict(&self, x_val: &Array2<f64>) -> Result<Vec<String>, PredictionError> {
        let model = MlModel::load(&self.cfg.model_path)?;
        let encoder = LabelEncoder::load(&self.cfg.label_encoder_path)?;
        let codes = model.predict(x_val)?;
        encoder.inverse_transform(&codes)
    }

    /// A failed `predict` is returned as-is; it has already been logged.
    pub fn evaluate(
        &self,
        x_val: &Array2<f64>,
        y_val: &Array1<usize>,
    ) -> Result<Evaluation, PredictionError> {
        let preds = self.predict(x_val)?;
        self.score(&preds, y_val).map_err(|e| {
            self.log.error(&format!("Error during evaluation: {e}"));
            e
        })
    }

    fn score(&self, preds: &[String], y_val: &Array1<usize>) -> Result<Evaluation, PredictionError> {
        let encoder = LabelEncoder::load(&self.cfg.label_encoder_path)?;
        let truth = encoder.inverse_transform(&y_val.to_vec())?;
        if truth.len() != preds.len() {
            return Err(PredictionError::inference(format!(
                "{} labels for {} predictions",
                truth.len(),
                preds.len()
            )));
        }
        if truth.is_empty() {
            return Err(PredictionError::inference("nothing to evaluate"));
        }

        let evaluation = Evaluation {
            accuracy: metrics::accuracy(&truth, preds),
            confusion: metrics::confusion_matrix(&truth, preds),
            report: metrics::classification_report(&truth, preds),
        };
        self.log.info("Evaluation complete.");
        Ok(evaluation)
    }
}
