use crate::artifact;
use crate::error::PredictionError;
use anyhow::Result;

use linfa::prelude::*;
use linfa_logistic::LogisticRegression;
use ndarray::{Array1, Array2, ArrayView1};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Fitted binary logistic regression over encoded class codes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MlModel {
    intercept: f64,
    weights: Vec<f64>,
    positive_class: usize,
    negative_class: usize,
}

impl MlModel {
    /// `y` holds label-encoder codes; exactly two distinct codes are expected.
    pub fn train(x: Array2<f64>, y: Array1<usize>, max_iterations: u64) -> Result<Self> {
        let ds = Dataset::new(x, y);
        let fitted = LogisticRegression::default()
            .max_iterations(max_iterations)
            .fit(&ds)?;
        let labels = fitted.labels();
        Ok(Self {
            intercept: fitted.intercept(),
            weights: fitted.params().to_vec(),
            positive_class: labels.pos.class,
            negative_class: labels.neg.class,
        })
    }

    pub fn n_features(&self) -> usize {
        self.weights.len()
    }

    /// Probability of the positive class for one sample.
    pub fn probability(&self, features: ArrayView1<f64>) -> f64 {
        let z = self.intercept
            + self
                .weights
                .iter()
                .zip(features.iter())
                .map(|(w, x)| w * x)
                .sum::<f64>();
        1.0 / (1.0 + (-z).exp())
    }

    /// Class code per row.
    pub fn predict(&self, x: &Array2<f64>) -> Result<Vec<usize>, PredictionError> {
        if x.ncols() != self.n_features() {
            return Err(PredictionError::inference(format!(
                "expected {} features, got {}",
                self.n_features(),
                x.ncols()
            )));
        }
        if x.nrows() == 0 {
            return Err(PredictionError::inference("no rows to predict"));
        }
        if let Some(((row, col), _)) = x.indexed_iter().find(|(_, v)| !v.is_finite()) {
            return Err(PredictionError::inference(format!(
                "row {} feature {} is not a finite number",
                row + 1,
                col
            )));
        }
        Ok(x.rows()
            .into_iter()
            .map(|row| {
                if self.probability(row) >= 0.5 {
                    self.positive_class
                } else {
                    self.negative_class
                }
            })
            .collect())
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        artifact::save(self, path)
    }

    pub fn load(path: &Path) -> Result<Self, PredictionError> {
        artifact::load(path)
    }
}
