use serde::{Deserialize, Serialize};

/// Per-column standardization fitted on the training matrix. The fitted
/// means and stds travel with the model artifact; inference must apply the
/// identical transform or predictions are silently wrong.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Scaler {
    pub means: Vec<f64>,
    pub stds: Vec<f64>,
}

impl Scaler {
    pub fn fit(matrix: &[Vec<f64>], columns: usize) -> Self {
        let mut means = vec![0.0; columns];
        let mut stds = vec![1.0; columns];
        if matrix.is_empty() {
            return Self { means, stds };
        }

        let n = matrix.len() as f64;
        for row in matrix {
            for (i, v) in row.iter().enumerate().take(columns) {
                means[i] += v;
            }
        }
        for m in &mut means {
            *m /= n;
        }

        let mut var = vec![0.0; columns];
        for row in matrix {
            for (i, v) in row.iter().enumerate().take(columns) {
                let d = v - means[i];
                var[i] += d * d;
            }
        }
        for (s, v) in stds.iter_mut().zip(var) {
            *s = (v / n).sqrt().max(1e-6);
        }

        Self { means, stds }
    }

    pub fn len(&self) -> usize {
        self.means.len()
    }

    pub fn is_empty(&self) -> bool {
        self.means.is_empty()
    }

    pub fn transform(&self, row: &[f64]) -> Vec<f64> {
        row.iter()
            .enumerate()
            .map(|(i, v)| {
                let mean = self.means.get(i).copied().unwrap_or(0.0);
                let std = self.stds.get(i).copied().unwrap_or(1.0).max(1e-6);
                (v - mean) / std
            })
            .collect()
    }

    pub fn transform_matrix(&self, matrix: &[Vec<f64>]) -> Vec<Vec<f64>> {
        matrix.iter().map(|row| self.transform(row)).collect()
    }
}
