// ============================================================
// Layer 6 — Evaluation Metrics
// ============================================================
// Turns predicted probabilities + true labels into the numbers
// the evaluation stage logs and compares:
//
//   - loss:      mean binary cross-entropy
//   - accuracy:  fraction of rows whose thresholded prediction
//                matches the label
//   - confusion: 2×2 counts, rows = true label, cols = predicted
//
//                 pred 0   pred 1
//     true 0  [[   tn,      fp  ],
//     true 1   [   fn,      tp  ]]
//
// A probability p is class 1 when p >= 0.5, class 0 otherwise.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::constants::PREDICTION_THRESHOLD;

/// Keeps log() finite for probabilities of exactly 0 or 1
const EPSILON: f64 = 1e-7;

/// Map a probability to a 0/1 class.
pub fn threshold(probability: f32) -> u8 {
    if probability < PREDICTION_THRESHOLD { 0 } else { 1 }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfusionMatrix {
    /// counts[true_label][predicted_label]
    pub counts: [[usize; 2]; 2],
}

impl ConfusionMatrix {
    pub fn from_labels(truth: &[u8], predicted: &[u8]) -> Self {
        let mut counts = [[0usize; 2]; 2];
        for (&t, &p) in truth.iter().zip(predicted) {
            counts[t.min(1) as usize][p.min(1) as usize] += 1;
        }
        Self { counts }
    }

    pub fn total(&self) -> usize {
        self.counts.iter().flatten().sum()
    }

    pub fn correct(&self) -> usize {
        self.counts[0][0] + self.counts[1][1]
    }
}

impl fmt::Display for ConfusionMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [[tn, fp], [fn_, tp]] = self.counts;
        write!(f, "[[{tn} {fp}] [{fn_} {tp}]]")
    }
}

/// Everything one scoring pass produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub loss:      f64,
    pub accuracy:  f64,
    pub confusion: ConfusionMatrix,
}

impl EvaluationReport {
    /// `labels` and `probabilities` must be the same length and non-empty.
    pub fn from_predictions(labels: &[u8], probabilities: &[f32]) -> Self {
        let predicted: Vec<u8> = probabilities.iter().map(|&p| threshold(p)).collect();
        let confusion = ConfusionMatrix::from_labels(labels, &predicted);

        let n = confusion.total().max(1) as f64;
        let loss = labels
            .iter()
            .zip(probabilities)
            .map(|(&y, &p)| {
                let p = (p as f64).clamp(EPSILON, 1.0 - EPSILON);
                if y == 1 { -p.ln() } else { -(1.0 - p).ln() }
            })
            .sum::<f64>()
            / n;

        let accuracy = confusion.correct() as f64 / n;
        Self { loss, accuracy, confusion }
    }
}
