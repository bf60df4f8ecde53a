use anyhow::{anyhow, bail, Context, Result};
use ndarray::Array2;
use std::path::Path;

/// Numeric feature matrix plus the raw label column, when present.
#[derive(Debug, Clone)]
pub struct Table {
    pub feature_names: Vec<String>,
    pub records: Array2<f64>,
    pub targets: Option<Vec<String>>,
}

impl Table {
    /// Every column other than `target_column` must be numeric.
    pub fn from_csv(path: &Path, target_column: &str) -> Result<Self> {
        let rdr = csv::Reader::from_path(path)
            .with_context(|| format!("opening {}", path.display()))?;
        Self::from_reader(rdr, target_column)
            .with_context(|| format!("reading {}", path.display()))
    }

    pub fn from_reader<R: std::io::Read>(mut rdr: csv::Reader<R>, target_column: &str) -> Result<Self> {
        let headers = rdr.headers()?.clone();
        let target_idx = headers.iter().position(|h| h.trim() == target_column);
        let feature_names: Vec<String> = headers
            .iter()
            .enumerate()
            .filter(|(i, _)| Some(*i) != target_idx)
            .map(|(_, h)| h.trim().to_string())
            .collect();

        let mut values = Vec::new();
        let mut targets = Vec::new();
        let mut n_rows = 0;
        for (row, record) in rdr.records().enumerate() {
            let record = record?;
            if record.len() != headers.len() {
                bail!("row {} has {} fields, expected {}", row + 1, record.len(), headers.len());
            }
            for (col, field) in record.iter().enumerate() {
                if Some(col) == target_idx {
                    targets.push(field.trim().to_string());
                    continue;
                }
                let value: f64 = field.trim().parse().map_err(|_| {
                    anyhow!("row {} column '{}': '{}' is not numeric", row + 1, &headers[col], field)
                })?;
                values.push(value);
            }
            n_rows += 1;
        }

        let records = Array2::from_shape_vec((n_rows, feature_names.len()), values)?;
        Ok(Self {
            feature_names,
            records,
            targets: target_idx.map(|_| targets),
        })
    }

    pub fn n_rows(&self) -> usize {
        self.records.nrows()
    }

    pub fn require_targets(&self, target_column: &str) -> Result<&[String]> {
        self.targets
            .as_deref()
            .ok_or_else(|| anyhow!("label column '{}' is missing", target_column))
    }
}
