//! Classification metrics over decoded labels.

use ndarray::Array2;
use std::collections::BTreeSet;
use std::fmt::Write;

/// `truth` and `predicted` must have the same length.
pub fn accuracy<S: AsRef<str>>(truth: &[S], predicted: &[S]) -> f64 {
    debug_assert_eq!(truth.len(), predicted.len());
    if truth.is_empty() {
        return 0.0;
    }
    let hits = truth
        .iter()
        .zip(predicted)
        .filter(|&(t, p)| t.as_ref() == p.as_ref())
        .count();
    hits as f64 / truth.len() as f64
}

/// Sorted union of the labels seen in either input.
pub fn unique_labels<S: AsRef<str>>(truth: &[S], predicted: &[S]) -> Vec<String> {
    let set: BTreeSet<&str> = truth.iter().chain(predicted).map(AsRef::as_ref).collect();
    set.into_iter().map(str::to_owned).collect()
}

/// Rows are true labels, columns predicted labels, both in `unique_labels` order.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfusionMatrix {
    pub labels: Vec<String>,
    pub counts: Array2<usize>,
}

impl ConfusionMatrix {
    fn index(&self, label: &str) -> usize {
        // labels is the sorted union, so every observed label is present
        self.labels
            .binary_search_by(|l| l.as_str().cmp(label))
            .unwrap_or_default()
    }

    pub fn true_positives(&self, class: usize) -> usize {
        self.counts[[class, class]]
    }

    /// Samples whose true label is `class`.
    pub fn support(&self, class: usize) -> usize {
        self.counts.row(class).sum()
    }

    /// Samples predicted as `class`.
    pub fn predicted(&self, class: usize) -> usize {
        self.counts.column(class).sum()
    }

    pub fn to_rows(&self) -> Vec<Vec<usize>> {
        self.counts.rows().into_iter().map(|r| r.to_vec()).collect()
    }
}

pub fn confusion_matrix<S: AsRef<str>>(truth: &[S], predicted: &[S]) -> ConfusionMatrix {
    let labels = unique_labels(truth, predicted);
    let n = labels.len();
    let mut cm = ConfusionMatrix {
        labels,
        counts: Array2::zeros((n, n)),
    };
    for (t, p) in truth.iter().zip(predicted) {
        let (i, j) = (cm.index(t.as_ref()), cm.index(p.as_ref()));
        cm.counts[[i, j]] += 1;
    }
    cm
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}

fn f1(precision: f64, recall: f64) -> f64 {
    if precision + recall == 0.0 {
        0.0
    } else {
        2.0 * precision * recall / (precision + recall)
    }
}

/// Per-label precision/recall/f1/support table with accuracy and averages.
pub fn classification_report<S: AsRef<str>>(truth: &[S], predicted: &[S]) -> String {
    let cm = confusion_matrix(truth, predicted);
    let total = truth.len();
    let width = cm
        .labels
        .iter()
        .map(String::len)
        .chain(std::iter::once("weighted avg".len()))
        .max()
        .unwrap_or_default();

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:>width$} {:>9} {:>9} {:>9} {:>9}\n",
        "", "precision", "recall", "f1-score", "support"
    );

    let (mut macro_p, mut macro_r, mut macro_f) = (0.0, 0.0, 0.0);
    let (mut weighted_p, mut weighted_r, mut weighted_f) = (0.0, 0.0, 0.0);
    for (class, label) in cm.labels.iter().enumerate() {
        let support = cm.support(class);
        let p = ratio(cm.true_positives(class), cm.predicted(class));
        let r = ratio(cm.true_positives(class), support);
        let f = f1(p, r);
        let _ = writeln!(out, "{label:>width$} {p:>9.2} {r:>9.2} {f:>9.2} {support:>9}");

        macro_p += p;
        macro_r += r;
        macro_f += f;
        let w = support as f64;
        weighted_p += p * w;
        weighted_r += r * w;
        weighted_f += f * w;
    }

    let n_labels = cm.labels.len().max(1) as f64;
    let denom = total.max(1) as f64;
    let acc = accuracy(truth, predicted);
    let _ = writeln!(out);
    let _ = writeln!(out, "{:>width$} {:>9} {:>9} {acc:>9.2} {total:>9}", "accuracy", "", "");
    let _ = writeln!(
        out,
        "{:>width$} {:>9.2} {:>9.2} {:>9.2} {total:>9}",
        "macro avg",
        macro_p / n_labels,
        macro_r / n_labels,
        macro_f / n_labels
    );
    let _ = writeln!(
        out,
        "{:>width$} {:>9.2} {:>9.2} {:>9.2} {total:>9}",
        "weighted avg",
        weighted_p / denom,
        weighted_r / denom,
        weighted_f / denom
    );
    out
}
