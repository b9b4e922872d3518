use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier of a task within a simulation, e.g. `task1`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub String);

impl TaskId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TaskId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Persistence key for everything a learner produces in one simulation run.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SessionKey {
    pub user_id: String,
    pub simulation_id: String,
    pub session_id: String,
}

impl SessionKey {
    pub fn new(
        user_id: impl Into<String>,
        simulation_id: impl Into<String>,
        session_id: impl Into<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            simulation_id: simulation_id.into(),
            session_id: session_id.into(),
        }
    }
}

/// Raw field values collected by the UI on submit. Every key is optional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskSubmission {
    pub task_id: TaskId,
    #[serde(default)]
    pub fields: BTreeMap<String, String>,
    #[serde(default)]
    pub selections: BTreeMap<String, Vec<String>>,
}

impl TaskSubmission {
    pub fn new(task_id: impl Into<String>) -> Self {
        Self {
            task_id: TaskId(task_id.into()),
            fields: BTreeMap::new(),
            selections: BTreeMap::new(),
        }
    }

    pub fn with_field(mut self, key: &str, value: impl Into<String>) -> Self {
        self.fields.insert(key.to_string(), value.into());
        self
    }

    pub fn with_selection<I, S>(mut self, key: &str, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.selections
            .insert(key.to_string(), values.into_iter().map(Into::into).collect());
        self
    }

    /// Trimmed free-text value; blank and missing both normalise to `None`.
    pub fn text(&self, key: &str) -> Option<String> {
        self.fields.get(key).and_then(|value| normalize_text(value))
    }

    /// Selected items with blanks removed.
    pub fn list(&self, key: &str) -> Vec<String> {
        self.selections
            .get(key)
            .map(|values| values.iter().filter_map(|value| normalize_text(value)).collect())
            .unwrap_or_default()
    }

    /// Single-choice selection, lowercased for enum matching.
    pub fn choice(&self, key: &str) -> Option<String> {
        self.list(key)
            .into_iter()
            .next()
            .map(|value| value.to_ascii_lowercase())
    }

    pub fn has_text(&self) -> bool {
        self.fields.values().any(|value| normalize_text(value).is_some())
    }

    pub fn total_text_len(&self) -> usize {
        self.fields
            .values()
            .map(|value| value.trim().chars().count())
            .sum()
    }
}

pub(crate) fn normalize_text(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Outcome of scoring one submission. Stored verbatim next to the submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub score: u8,
    pub breakdown: BTreeMap<String, f32>,
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl ValidationResult {
    /// Clamps any externally produced score back into 0..=100.
    pub fn clamped(mut self) -> Self {
        self.score = self.score.min(100);
        self
    }
}

/// Which scoring path produced a stored result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreSource {
    RuleBased,
    Assisted,
    Fallback,
}

impl ScoreSource {
    pub const fn label(self) -> &'static str {
        match self {
            Self::RuleBased => "rule-based",
            Self::Assisted => "assisted",
            Self::Fallback => "fallback",
        }
    }
}

/// Submission plus the result it earned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionRecord {
    pub submission: TaskSubmission,
    pub result: ValidationResult,
    pub source: ScoreSource,
    pub submitted_at: DateTime<Utc>,
}
