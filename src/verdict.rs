//! Threshold decoding of classifier probabilities into labels.
//!
//! The three classifiers were trained with different positive classes, so
//! the thresholds have asymmetric polarity: tool condition reads high
//! scores as good, the other two read low scores as good. The direction is
//! part of the trained contract and must match the artifacts exactly.

use std::fmt;

use crate::pipeline::Prediction;

/// Which label(s) the caller wants reported.
///
/// The fan-out always computes all three probabilities; the task only
/// selects what the decoder reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    ToolCondition,
    Completion,
    Inspection,
    All,
}

impl Task {
    /// Get the string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Task::ToolCondition => "tool",
            Task::Completion => "completion",
            Task::Inspection => "inspection",
            Task::All => "all",
        }
    }

    /// Parse from string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "tool" | "tool-condition" => Some(Task::ToolCondition),
            "completion" | "machining" => Some(Task::Completion),
            "inspection" | "visual" => Some(Task::Inspection),
            "all" => Some(Task::All),
            _ => None,
        }
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Predicted wear state of the cutting tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolCondition {
    Unworn,
    Worn,
}

impl ToolCondition {
    /// Decode from the tool condition probability. High scores are good;
    /// exactly 0.5 is Worn.
    pub fn from_probability(p: f32) -> Self {
        if p > 0.5 {
            ToolCondition::Unworn
        } else {
            ToolCondition::Worn
        }
    }

    /// Get the string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            ToolCondition::Unworn => "Unworn",
            ToolCondition::Worn => "Worn",
        }
    }
}

impl fmt::Display for ToolCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Predicted completion state of the machining job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionStatus {
    Completed,
    Incomplete,
}

impl CompletionStatus {
    /// Decode from the completion probability. Low scores are good;
    /// exactly 0.5 is Incomplete.
    pub fn from_probability(p: f32) -> Self {
        if p < 0.5 {
            CompletionStatus::Completed
        } else {
            CompletionStatus::Incomplete
        }
    }

    /// Get the string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            CompletionStatus::Completed => "Completed",
            CompletionStatus::Incomplete => "Incomplete",
        }
    }
}

impl fmt::Display for CompletionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Predicted visual inspection outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InspectionStatus {
    Passed,
    Failed,
}

impl InspectionStatus {
    /// Decode from the inspection probability. Low scores are good;
    /// exactly 0.5 is Failed.
    pub fn from_probability(p: f32) -> Self {
        if p < 0.5 {
            InspectionStatus::Passed
        } else {
            InspectionStatus::Failed
        }
    }

    /// Get the string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            InspectionStatus::Passed => "Passed",
            InspectionStatus::Failed => "Failed",
        }
    }
}

impl fmt::Display for InspectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The decoded labels a request reports. Fields not covered by the
/// requested task are `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Verdict {
    pub tool_condition: Option<ToolCondition>,
    pub completion: Option<CompletionStatus>,
    pub inspection: Option<InspectionStatus>,
}

impl Verdict {
    /// Decode the requested label(s) from a prediction.
    pub fn from_prediction(prediction: &Prediction, task: Task) -> Self {
        let all = task == Task::All;
        Verdict {
            tool_condition: (all || task == Task::ToolCondition)
                .then(|| ToolCondition::from_probability(prediction.tool_condition)),
            completion: (all || task == Task::Completion)
                .then(|| CompletionStatus::from_probability(prediction.machining_finalized)),
            inspection: (all || task == Task::Inspection)
                .then(|| InspectionStatus::from_probability(prediction.visual_inspection)),
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if let Some(label) = self.tool_condition {
            parts.push(format!("tool_condition={}", label));
        }
        if let Some(label) = self.completion {
            parts.push(format!("machining_finalized={}", label));
        }
        if let Some(label) = self.inspection {
            parts.push(format!("passed_visual_inspection={}", label));
        }
        write!(f, "{}", parts.join(" "))
    }
}
