//! Externally trained artifacts: encoder, scaler, and the three classifiers.
//!
//! All five are loaded once at process start and held read-only for the
//! process lifetime. Any load failure is fatal; there is no partial mode
//! where a subset of artifacts serves predictions. The loaded [`Artifacts`]
//! context is a plain struct injected into the pipeline, so tests can
//! substitute mock classifiers at the [`Classifier`] seam.

mod classifier;
mod encoder;
mod scaler;

pub use classifier::{Classifier, OnnxClassifier};
pub use encoder::ProcessEncoder;
pub use scaler::StandardScaler;

use std::path::Path;

use crate::Error;

/// Encoder parameter file inside the artifact directory.
pub const ENCODER_FILE: &str = "encoder.json";
/// Scaler parameter file inside the artifact directory.
pub const SCALER_FILE: &str = "scaler.json";
/// Tool condition model file inside the artifact directory.
pub const TOOL_CONDITION_FILE: &str = "tool_condition.onnx";
/// Machining completion model file inside the artifact directory.
pub const MACHINING_FINALIZED_FILE: &str = "machining_finalized.onnx";
/// Visual inspection model file inside the artifact directory.
pub const VISUAL_INSPECTION_FILE: &str = "passed_visual_inspection.onnx";

/// The five fitted artifacts a prediction needs.
pub struct Artifacts {
    pub encoder: ProcessEncoder,
    pub scaler: StandardScaler,
    pub tool_condition: Box<dyn Classifier>,
    pub machining_finalized: Box<dyn Classifier>,
    pub visual_inspection: Box<dyn Classifier>,
}

impl std::fmt::Debug for Artifacts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Artifacts")
            .field("tool_condition", &self.tool_condition.name())
            .field("machining_finalized", &self.machining_finalized.name())
            .field("visual_inspection", &self.visual_inspection.name())
            .finish()
    }
}

impl Artifacts {
    /// Load all five artifacts from a directory. Fails on the first missing
    /// or malformed artifact.
    pub fn load<P: AsRef<Path>>(dir: P) -> Result<Self, Error> {
        let dir = dir.as_ref();
        log::info!("loading artifacts from {}", dir.display());

        let encoder = ProcessEncoder::from_path(dir.join(ENCODER_FILE))
            .map_err(|e| Error::Artifact(format!("{}: {}", ENCODER_FILE, e)))?;
        let scaler = StandardScaler::from_path(dir.join(SCALER_FILE))
            .map_err(|e| Error::Artifact(format!("{}: {}", SCALER_FILE, e)))?;

        let tool_condition = load_model(dir, "tool_condition", TOOL_CONDITION_FILE)?;
        let machining_finalized =
            load_model(dir, "machining_finalized", MACHINING_FINALIZED_FILE)?;
        let visual_inspection =
            load_model(dir, "passed_visual_inspection", VISUAL_INSPECTION_FILE)?;

        log::info!(
            "artifacts ready: {} process classes, {} feature columns",
            encoder.classes().len(),
            scaler.len()
        );

        Ok(Self {
            encoder,
            scaler,
            tool_condition,
            machining_finalized,
            visual_inspection,
        })
    }
}

fn load_model(dir: &Path, name: &str, file: &str) -> Result<Box<dyn Classifier>, Error> {
    let classifier = OnnxClassifier::from_file(name, dir.join(file))
        .map_err(|e| Error::Artifact(format!("{}: {}", file, e)))?;
    Ok(Box::new(classifier))
}
