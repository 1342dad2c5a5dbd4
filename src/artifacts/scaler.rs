//! Fitted standardization scaler.

use std::fs;
use std::path::Path;

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::Error;

/// Standard scaler fitted on the assembled feature schema.
///
/// Applies `(x - mean) / scale` per column. The column count is a hard
/// contract: a matrix with a different width than the fitted schema is
/// rejected, never silently truncated or padded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandardScaler {
    /// Fitted column names, in schema order.
    columns: Vec<String>,
    mean: Vec<f32>,
    scale: Vec<f32>,
}

impl StandardScaler {
    /// Create a scaler from fitted parameters.
    pub fn new(columns: Vec<String>, mean: Vec<f32>, scale: Vec<f32>) -> Self {
        Self {
            columns,
            mean,
            scale,
        }
    }

    /// Load fitted parameters from a JSON file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let text = fs::read_to_string(path)?;
        let scaler: StandardScaler = serde_json::from_str(&text)?;
        scaler.validate()?;
        Ok(scaler)
    }

    /// Check that the fitted parameter vectors agree in length.
    pub fn validate(&self) -> Result<(), Error> {
        if self.columns.len() != self.mean.len() || self.mean.len() != self.scale.len() {
            return Err(Error::Artifact(format!(
                "scaler parameter lengths disagree: {} columns, {} means, {} scales",
                self.columns.len(),
                self.mean.len(),
                self.scale.len()
            )));
        }
        Ok(())
    }

    /// Number of columns in the fitted schema.
    pub fn len(&self) -> usize {
        self.mean.len()
    }

    /// Whether the fitted schema is empty.
    pub fn is_empty(&self) -> bool {
        self.mean.is_empty()
    }

    /// Fitted column names, in schema order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Standardize a matrix. Fails with [`Error::ShapeMismatch`] when the
    /// column count differs from the fitted schema.
    pub fn transform(&self, matrix: &Array2<f32>) -> Result<Array2<f32>, Error> {
        if matrix.ncols() != self.len() {
            return Err(Error::ShapeMismatch {
                expected: self.len(),
                actual: matrix.ncols(),
            });
        }

        let mut scaled = matrix.clone();
        for ((_, col), value) in scaled.indexed_iter_mut() {
            // Constant columns are stored with scale 0 and pass through
            // centered only, matching fit-time behavior.
            let scale = if self.scale[col] == 0.0 {
                1.0
            } else {
                self.scale[col]
            };
            *value = (*value - self.mean[col]) / scale;
        }
        Ok(scaled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn scaler() -> StandardScaler {
        StandardScaler::new(
            vec!["a".to_string(), "b".to_string()],
            vec![1.0, 10.0],
            vec![2.0, 5.0],
        )
    }

    #[test]
    fn test_transform() {
        let scaled = scaler().transform(&array![[3.0, 20.0], [1.0, 5.0]]).unwrap();
        assert_eq!(scaled, array![[1.0, 2.0], [0.0, -1.0]]);
    }

    #[test]
    fn test_transform_zero_scale_passes_centered() {
        let scaler = StandardScaler::new(vec!["a".to_string()], vec![4.0], vec![0.0]);
        let scaled = scaler.transform(&array![[6.0]]).unwrap();
        assert_eq!(scaled, array![[2.0]]);
    }

    #[test]
    fn test_transform_shape_mismatch() {
        let err = scaler().transform(&array![[1.0, 2.0, 3.0]]).unwrap_err();
        assert!(matches!(
            err,
            Error::ShapeMismatch {
                expected: 2,
                actual: 3
            }
        ));
    }

    #[test]
    fn test_validate_rejects_disagreeing_lengths() {
        let scaler = StandardScaler::new(vec!["a".to_string()], vec![0.0, 1.0], vec![1.0]);
        assert!(matches!(scaler.validate(), Err(Error::Artifact(_))));
    }

    #[test]
    fn test_from_json() {
        let scaler: StandardScaler = serde_json::from_str(
            r#"{"columns":["x","y"],"mean":[0.5,1.5],"scale":[1.0,3.0]}"#,
        )
        .unwrap();
        assert_eq!(scaler.len(), 2);
        assert_eq!(scaler.columns(), &["x", "y"]);
    }
}
