//! Fresa - CNC milling outcome classifier
//!
//! Classifies the outcome of a CNC milling run (tool wear, job completion,
//! visual inspection) from sensor telemetry using three pre-trained binary
//! classifiers behind a deterministic preprocessing pipeline.
//!
//! # Architecture
//!
//! One prediction is a single pass through six steps:
//! 1. Schema normalization (drop label columns, first numeric coercion)
//! 2. Categorical encoding of the machining process phase
//! 3. Feature assembly (operator inputs appended as columns)
//! 4. Standardization with the fitted scaler (second coercion, 0-fill)
//! 5. Fan-out to the three classifiers
//! 6. Threshold decoding into human-facing labels
//!
//! The encoder, scaler, and classifiers are externally trained artifacts
//! loaded once at startup and never mutated.
//!
//! # Example
//!
//! ```no_run
//! use fresa::{Artifacts, Frame, Pipeline, Task, UserInputs, Verdict};
//!
//! let artifacts = Artifacts::load("artifacts").unwrap();
//! let pipeline = Pipeline::new(artifacts);
//!
//! let frame = Frame::from_csv_path("experiment_01.csv").unwrap();
//! let inputs = UserInputs {
//!     feed_rate: 50.0,
//!     clamp_pressure: 3.0,
//! };
//!
//! let prediction = pipeline.predict(&frame, &inputs).unwrap();
//! let verdict = Verdict::from_prediction(&prediction, Task::All);
//! println!("{}", verdict);
//! ```

pub use error::Error;

// Externally trained artifacts (encoder, scaler, classifiers)
pub mod artifacts;

// The inference pipeline
pub mod pipeline;

// Tabular sensor data model and CSV parsing
pub mod table;

// Threshold decoding of probabilities into labels
pub mod verdict;

pub use artifacts::{Artifacts, Classifier, OnnxClassifier, ProcessEncoder, StandardScaler};
pub use pipeline::{Pipeline, Prediction};
pub use table::{Cell, Frame};
pub use verdict::{CompletionStatus, InspectionStatus, Task, ToolCondition, Verdict};

mod error {
    use std::fmt;

    #[derive(Debug)]
    pub enum Error {
        Io(std::io::Error),
        /// Malformed delimited upload.
        Parse(String),
        /// An artifact failed to load at startup.
        Artifact(String),
        /// The fitted encoder has no index for a process value.
        UnknownCategory(String),
        /// Assembled feature count does not match the fitted schema.
        ShapeMismatch { expected: usize, actual: usize },
        Shape(ndarray::ShapeError),
        Ort(ort::Error),
        Json(serde_json::Error),
        /// A classifier invocation failed.
        Inference(String),
    }

    impl fmt::Display for Error {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                Error::Io(e) => write!(f, "IO error: {}", e),
                Error::Parse(e) => write!(f, "Parse error: {}", e),
                Error::Artifact(e) => write!(f, "Artifact error: {}", e),
                Error::UnknownCategory(e) => write!(f, "Unknown category: {}", e),
                Error::ShapeMismatch { expected, actual } => write!(
                    f,
                    "Shape mismatch: scaler was fitted on {} columns, got {}",
                    expected, actual
                ),
                Error::Shape(e) => write!(f, "Shape error: {}", e),
                Error::Ort(e) => write!(f, "ORT error: {}", e),
                Error::Json(e) => write!(f, "JSON error: {}", e),
                Error::Inference(e) => write!(f, "Inference error: {}", e),
            }
        }
    }

    impl std::error::Error for Error {}

    impl From<std::io::Error> for Error {
        fn from(e: std::io::Error) -> Self {
            Error::Io(e)
        }
    }

    impl From<ndarray::ShapeError> for Error {
        fn from(e: ndarray::ShapeError) -> Self {
            Error::Shape(e)
        }
    }

    impl From<ort::Error> for Error {
        fn from(e: ort::Error) -> Self {
            Error::Ort(e)
        }
    }

    impl From<serde_json::Error> for Error {
        fn from(e: serde_json::Error) -> Self {
            Error::Json(e)
        }
    }
}

/// Operator-entered inputs appended to every record.
///
/// These are canonical: same-named columns in the upload are always
/// overwritten with these values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UserInputs {
    /// Feed rate in mm/min, >= 0.
    pub feed_rate: f32,
    /// Clamp pressure in psi, >= 0.
    pub clamp_pressure: f32,
}
