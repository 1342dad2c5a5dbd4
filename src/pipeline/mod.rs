//! The inference pipeline.
//!
//! One prediction request runs the full pass: normalize, encode, assemble,
//! scale, then fan the identical scaled matrix out to the three classifiers.
//! All three always run regardless of which label the caller will read; the
//! cost of a request is dominated by artifact loading, not inference. Any
//! step failure aborts the request with no partial result.
//!
//! # Example
//!
//! ```no_run
//! use fresa::{Artifacts, Frame, Pipeline, UserInputs};
//!
//! let pipeline = Pipeline::new(Artifacts::load("artifacts").unwrap());
//! let frame = Frame::from_csv_str("x1,Machining_Process\n1.5,Layer1\n").unwrap();
//! let inputs = UserInputs { feed_rate: 6.0, clamp_pressure: 4.0 };
//!
//! let prediction = pipeline.predict(&frame, &inputs).unwrap();
//! println!("tool condition score: {}", prediction.tool_condition);
//! ```

mod assemble;
mod encode;
mod normalize;
mod scale;

pub use assemble::assemble;
pub use encode::encode_process;
pub use normalize::{normalize, EXCLUDED_COLUMNS};
pub use scale::{scale, to_matrix};

use ndarray::Array2;

use crate::artifacts::{Artifacts, Classifier};
use crate::table::Frame;
use crate::{Error, UserInputs};

/// Name of the categorical machining-process column.
pub const PROCESS_COLUMN: &str = "Machining_Process";
/// Name of the operator feed rate column.
pub const FEED_RATE_COLUMN: &str = "feedrate";
/// Name of the operator clamp pressure column.
pub const CLAMP_PRESSURE_COLUMN: &str = "clamp_pressure";

/// Raw classifier probabilities for one record, all in [0, 1].
///
/// The three scores are independent; see [`crate::verdict`] for the
/// threshold rules that turn them into labels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    pub tool_condition: f32,
    pub machining_finalized: f32,
    pub visual_inspection: f32,
}

/// The pipeline: a stateless pass over an immutable artifact context.
pub struct Pipeline {
    artifacts: Artifacts,
}

impl Pipeline {
    /// Create a pipeline over loaded artifacts.
    pub fn new(artifacts: Artifacts) -> Self {
        Self { artifacts }
    }

    /// The injected artifact context.
    pub fn artifacts(&self) -> &Artifacts {
        &self.artifacts
    }

    /// Run one prediction over the uploaded frame and operator inputs.
    ///
    /// The upload may carry any number of rows; the prediction reads the
    /// first record, the request contract of the submitting caller.
    pub fn predict(&self, frame: &Frame, inputs: &UserInputs) -> Result<Prediction, Error> {
        let mut frame = frame.clone();

        normalize(&mut frame);
        encode_process(&mut frame, &self.artifacts.encoder)?;
        assemble(&mut frame, inputs);

        let scaled = scale(&frame, &self.artifacts.scaler)?;
        log::debug!(
            "scaled matrix: {} rows x {} columns",
            scaled.nrows(),
            scaled.ncols()
        );

        Ok(Prediction {
            tool_condition: first_probability(&*self.artifacts.tool_condition, &scaled)?,
            machining_finalized: first_probability(&*self.artifacts.machining_finalized, &scaled)?,
            visual_inspection: first_probability(&*self.artifacts.visual_inspection, &scaled)?,
        })
    }
}

fn first_probability(classifier: &dyn Classifier, scaled: &Array2<f32>) -> Result<f32, Error> {
    let probabilities = classifier.predict(scaled)?;
    probabilities
        .first()
        .copied()
        .ok_or_else(|| Error::Inference(format!("{} returned no output", classifier.name())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::{ProcessEncoder, StandardScaler};
    use std::sync::{Arc, Mutex};

    struct Fixed {
        name: &'static str,
        probability: f32,
    }

    impl Classifier for Fixed {
        fn name(&self) -> &str {
            self.name
        }

        fn predict(&self, features: &Array2<f32>) -> Result<Vec<f32>, Error> {
            Ok(vec![self.probability; features.nrows()])
        }
    }

    /// Returns a fixed probability and records the matrix it was given.
    struct Probe {
        probability: f32,
        seen: Arc<Mutex<Option<Array2<f32>>>>,
    }

    impl Classifier for Probe {
        fn name(&self) -> &str {
            "probe"
        }

        fn predict(&self, features: &Array2<f32>) -> Result<Vec<f32>, Error> {
            *self.seen.lock().unwrap() = Some(features.clone());
            Ok(vec![self.probability; features.nrows()])
        }
    }

    struct Failing;

    impl Classifier for Failing {
        fn name(&self) -> &str {
            "failing"
        }

        fn predict(&self, _features: &Array2<f32>) -> Result<Vec<f32>, Error> {
            Err(Error::Inference("failing: model exploded".to_string()))
        }
    }

    /// One probability per row, equal to the row index; exposes which row
    /// the pipeline reads.
    struct RowIndex;

    impl Classifier for RowIndex {
        fn name(&self) -> &str {
            "row_index"
        }

        fn predict(&self, features: &Array2<f32>) -> Result<Vec<f32>, Error> {
            Ok((0..features.nrows()).map(|row| row as f32).collect())
        }
    }

    fn encoder() -> ProcessEncoder {
        ProcessEncoder::new(vec![
            "Prep".to_string(),
            "Layer1".to_string(),
            "Layer2".to_string(),
        ])
    }

    /// Identity scaler over the given schema, so classifiers see raw values.
    fn identity_scaler(columns: &[&str]) -> StandardScaler {
        StandardScaler::new(
            columns.iter().map(|c| c.to_string()).collect(),
            vec![0.0; columns.len()],
            vec![1.0; columns.len()],
        )
    }

    fn artifacts(columns: &[&str], probabilities: (f32, f32, f32)) -> Artifacts {
        Artifacts {
            encoder: encoder(),
            scaler: identity_scaler(columns),
            tool_condition: Box::new(Fixed {
                name: "tool_condition",
                probability: probabilities.0,
            }),
            machining_finalized: Box::new(Fixed {
                name: "machining_finalized",
                probability: probabilities.1,
            }),
            visual_inspection: Box::new(Fixed {
                name: "passed_visual_inspection",
                probability: probabilities.2,
            }),
        }
    }

    const INPUTS: UserInputs = UserInputs {
        feed_rate: 50.0,
        clamp_pressure: 3.0,
    };

    #[test]
    fn test_predict_end_to_end() {
        let pipeline = Pipeline::new(artifacts(
            &["x1", "Machining_Process", "feedrate", "clamp_pressure"],
            (0.7, 0.2, 0.8),
        ));
        let frame = Frame::from_csv_str("x1,Machining_Process\n12.5,Layer1\n").unwrap();

        let prediction = pipeline.predict(&frame, &INPUTS).unwrap();
        assert_eq!(prediction.tool_condition, 0.7);
        assert_eq!(prediction.machining_finalized, 0.2);
        assert_eq!(prediction.visual_inspection, 0.8);
    }

    #[test]
    fn test_classifiers_see_assembled_matrix() {
        let seen = Arc::new(Mutex::new(None));
        let mut artifacts = artifacts(
            &["x1", "Machining_Process", "feedrate", "clamp_pressure"],
            (0.5, 0.5, 0.5),
        );
        artifacts.tool_condition = Box::new(Probe {
            probability: 0.5,
            seen: Arc::clone(&seen),
        });
        let pipeline = Pipeline::new(artifacts);

        let frame = Frame::from_csv_str(
            "x1,Machining_Process,tool_condition,feedrate\n12.5,Layer2,worn,999\n",
        )
        .unwrap();
        pipeline.predict(&frame, &INPUTS).unwrap();

        let matrix = seen.lock().unwrap().clone().unwrap();
        // Excluded columns are gone, the process phase is encoded, and the
        // operator inputs replaced the uploaded feedrate.
        assert_eq!(matrix, ndarray::array![[12.5, 2.0, 50.0, 3.0]]);
    }

    #[test]
    fn test_missing_process_column_still_predicts() {
        let pipeline = Pipeline::new(artifacts(
            &["x1", "feedrate", "clamp_pressure"],
            (0.9, 0.1, 0.1),
        ));
        let frame = Frame::from_csv_str("x1\n1.0\n").unwrap();

        let prediction = pipeline.predict(&frame, &INPUTS).unwrap();
        assert_eq!(prediction.tool_condition, 0.9);
    }

    #[test]
    fn test_predict_is_deterministic() {
        let pipeline = Pipeline::new(artifacts(
            &["x1", "Machining_Process", "feedrate", "clamp_pressure"],
            (0.7, 0.2, 0.8),
        ));
        let frame = Frame::from_csv_str("x1,Machining_Process\n12.5,Layer1\n").unwrap();

        let first = pipeline.predict(&frame, &INPUTS).unwrap();
        let second = pipeline.predict(&frame, &INPUTS).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_shape_mismatch_aborts_before_inference() {
        let seen = Arc::new(Mutex::new(None));
        let mut artifacts = artifacts(
            &["x1", "x2", "Machining_Process", "feedrate", "clamp_pressure"],
            (0.5, 0.5, 0.5),
        );
        artifacts.tool_condition = Box::new(Probe {
            probability: 0.5,
            seen: Arc::clone(&seen),
        });
        let pipeline = Pipeline::new(artifacts);

        // Assembles to 4 columns against a 5-column schema.
        let frame = Frame::from_csv_str("x1,Machining_Process\n1,Layer1\n").unwrap();
        let err = pipeline.predict(&frame, &INPUTS).unwrap_err();
        assert!(matches!(err, Error::ShapeMismatch { expected: 5, actual: 4 }));
        assert!(seen.lock().unwrap().is_none());
    }

    #[test]
    fn test_classifier_failure_aborts_request() {
        let mut artifacts = artifacts(
            &["x1", "feedrate", "clamp_pressure"],
            (0.5, 0.5, 0.5),
        );
        artifacts.machining_finalized = Box::new(Failing);
        let pipeline = Pipeline::new(artifacts);

        let frame = Frame::from_csv_str("x1\n1\n").unwrap();
        let err = pipeline.predict(&frame, &INPUTS).unwrap_err();
        assert!(matches!(err, Error::Inference(_)));
    }

    #[test]
    fn test_multi_row_upload_reads_first_record() {
        let mut artifacts = artifacts(
            &["x1", "feedrate", "clamp_pressure"],
            (0.5, 0.5, 0.5),
        );
        artifacts.tool_condition = Box::new(RowIndex);
        let pipeline = Pipeline::new(artifacts);

        let frame = Frame::from_csv_str("x1\n1\n2\n3\n").unwrap();
        let prediction = pipeline.predict(&frame, &INPUTS).unwrap();
        assert_eq!(prediction.tool_condition, 0.0);
    }

    #[test]
    fn test_unknown_process_value_fails_request() {
        let pipeline = Pipeline::new(artifacts(
            &["x1", "Machining_Process", "feedrate", "clamp_pressure"],
            (0.5, 0.5, 0.5),
        ));
        let frame = Frame::from_csv_str("x1,Machining_Process\n1,Unheard\n").unwrap();

        let err = pipeline.predict(&frame, &INPUTS).unwrap_err();
        assert!(matches!(err, Error::UnknownCategory(_)));
    }
}
