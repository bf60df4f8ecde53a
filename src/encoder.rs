use crate::artifact;
use crate::error::PredictionError;
use anyhow::{bail, Result};
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;

/// Maps class labels to codes; a code is the label's index in sorted order.
/// Labels that all parse as numbers sort by value, otherwise as strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelEncoder {
    classes: Vec<String>,
}

impl LabelEncoder {
    pub fn fit<S: AsRef<str>>(labels: &[S]) -> Self {
        let distinct: BTreeSet<&str> = labels.iter().map(AsRef::as_ref).collect();
        let mut classes: Vec<String> = distinct.into_iter().map(str::to_owned).collect();
        let numeric: Option<Vec<f64>> = classes.iter().map(|c| c.trim().parse().ok()).collect();
        if let Some(values) = numeric {
            let mut pairs: Vec<(f64, String)> = values.into_iter().zip(classes).collect();
            pairs.sort_by(|a, b| a.0.total_cmp(&b.0).then_with(|| a.1.cmp(&b.1)));
            classes = pairs.into_iter().map(|(_, c)| c).collect();
        }
        Self { classes }
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn transform<S: AsRef<str>>(&self, labels: &[S]) -> Result<Array1<usize>> {
        labels
            .iter()
            .map(|label| {
                let label = label.as_ref();
                match self.classes.iter().position(|c| c == label) {
                    Some(code) => Ok(code),
                    None => bail!("label '{}' was not seen when the encoder was fitted", label),
                }
            })
            .collect()
    }

    pub fn inverse_transform(&self, codes: &[usize]) -> Result<Vec<String>, PredictionError> {
        codes
            .iter()
            .map(|&code| {
                self.classes.get(code).cloned().ok_or_else(|| {
                    PredictionError::inference(format!(
                        "code {} is outside the encoder's {} classes",
                        code,
                        self.classes.len()
                    ))
                })
            })
            .collect()
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        artifact::save(self, path)
    }

    pub fn load(path: &Path) -> Result<Self, PredictionError> {
        artifact::load(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_follow_sorted_order() {
        let enc = LabelEncoder::fit(&["presence", "absence", "presence"]);
        assert_eq!(enc.classes(), ["absence", "presence"]);

        let codes = enc.transform(&["presence", "absence"]).unwrap();
        assert_eq!(codes.to_vec(), vec![1, 0]);
        assert_eq!(enc.inverse_transform(&[0, 1, 1]).unwrap(), vec!["absence", "presence", "presence"]);
    }

    #[test]
    fn numeric_labels_sort_by_value() {
        let enc = LabelEncoder::fit(&["10", "2", "1", "2"]);
        assert_eq!(enc.classes(), ["1", "2", "10"]);
        assert_eq!(enc.transform(&["10", "1"]).unwrap().to_vec(), vec![2, 0]);

        let mixed = LabelEncoder::fit(&["10", "2", "x"]);
        assert_eq!(mixed.classes(), ["10", "2", "x"]);
    }

    #[test]
    fn unseen_label_is_rejected() {
        let enc = LabelEncoder::fit(&["0", "1"]);
        assert!(enc.transform(&["2"]).is_err());
    }

    #[test]
    fn out_of_range_code_is_inference_failure() {
        let enc = LabelEncoder::fit(&["0", "1"]);
        let err = enc.inverse_transform(&[0, 5]).unwrap_err();
        assert!(matches!(err, PredictionError::InferenceFailed(_)));
    }

    #[test]
    fn survives_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("heart_label_encoder.pkl");
        let enc = LabelEncoder::fit(&["no", "yes"]);
        enc.save(&path).unwrap();
        assert_eq!(LabelEncoder::load(&path).unwrap(), enc);
    }
}
