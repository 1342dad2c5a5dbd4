//! Fitted categorical encoder for the machining process phase.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::Error;

/// Label encoder fitted on the machining-process vocabulary.
///
/// Classes are stored in fit-time order; [`ProcessEncoder::transform`] maps
/// each value to its class index, the encoding the classifiers were trained
/// on. Values outside the vocabulary cannot be encoded and fail the request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessEncoder {
    classes: Vec<String>,
}

impl ProcessEncoder {
    /// Create an encoder from an ordered class vocabulary.
    pub fn new(classes: Vec<String>) -> Self {
        Self { classes }
    }

    /// Load fitted parameters from a JSON file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let text = fs::read_to_string(path)?;
        let encoder: ProcessEncoder = serde_json::from_str(&text)?;
        Ok(encoder)
    }

    /// The fitted vocabulary, in index order.
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Encode a single value to its class index.
    pub fn encode(&self, value: &str) -> Result<f32, Error> {
        self.classes
            .iter()
            .position(|c| c == value)
            .map(|i| i as f32)
            .ok_or_else(|| Error::UnknownCategory(value.to_string()))
    }

    /// Encode a column of values.
    pub fn transform(&self, values: &[&str]) -> Result<Vec<f32>, Error> {
        values.iter().map(|v| self.encode(v)).collect()
    }
}
