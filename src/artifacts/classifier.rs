//! Classifier capability and its ONNX-backed implementation.

use std::path::Path;
use std::sync::Mutex;

use ndarray::Array2;
use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::value::Tensor;

use crate::Error;

/// An opaque binary classifier over the scaled feature matrix.
///
/// Implementations must be pure: the same matrix always produces the same
/// probabilities, and no call mutates observable state.
pub trait Classifier: Send + Sync {
    /// Short name for logs and error messages.
    fn name(&self) -> &str;

    /// One probability in [0, 1] per input row.
    fn predict(&self, features: &Array2<f32>) -> Result<Vec<f32>, Error>;
}

/// Classifier backed by an ONNX model file.
///
/// The model takes a single float input of shape `(rows, features)` and
/// produces a float output whose first value per row is the probability.
pub struct OnnxClassifier {
    name: String,
    // Sessions need &mut to run; the mutex keeps the classifier shareable.
    session: Mutex<Session>,
}

impl OnnxClassifier {
    /// Load a model from a file.
    pub fn from_file<P: AsRef<Path>>(name: &str, path: P) -> Result<Self, Error> {
        let path = path.as_ref();
        log::info!("loading {} model from {}", name, path.display());

        let session = Session::builder()?
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .commit_from_file(path)?;

        Ok(Self {
            name: name.to_string(),
            session: Mutex::new(session),
        })
    }
}

impl Classifier for OnnxClassifier {
    fn name(&self) -> &str {
        &self.name
    }

    fn predict(&self, features: &Array2<f32>) -> Result<Vec<f32>, Error> {
        let n_rows = features.nrows();
        if n_rows == 0 {
            return Ok(Vec::new());
        }

        let mut session = self
            .session
            .lock()
            .map_err(|_| Error::Inference(format!("{}: session mutex poisoned", self.name)))?;

        let output_name = session
            .outputs()
            .first()
            .map(|o| o.name().to_string())
            .ok_or_else(|| Error::Inference(format!("{}: model has no output", self.name)))?;

        let tensor = Tensor::from_array(features.clone())?;
        let outputs = session.run(ort::inputs![tensor])?;

        let probs_arr = outputs
            .get(output_name.as_str())
            .ok_or_else(|| Error::Inference(format!("{}: missing model output", self.name)))?
            .try_extract_array::<f32>()?;
        let flat: Vec<f32> = probs_arr.iter().copied().collect();

        if flat.len() < n_rows {
            return Err(Error::Inference(format!(
                "{}: output has {} values for {} rows",
                self.name,
                flat.len(),
                n_rows
            )));
        }

        // Output shape is (rows, k); the probability is the first value of
        // each row.
        let stride = flat.len() / n_rows;
        Ok((0..n_rows).map(|row| flat[row * stride]).collect())
    }
}
