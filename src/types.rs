//! Core types for camb-sdk

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;

/// Identifier of an asynchronous server-side task
///
/// The API hands these out as integers for some endpoints and strings for
/// others, so the id is kept as an opaque string and accepts either on input.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(#[serde(deserialize_with = "string_or_number")] String);

impl TaskId {
    /// Create a new TaskId
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the raw id
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TaskId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for TaskId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<i64> for TaskId {
    fn from(id: i64) -> Self {
        Self(id.to_string())
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of a finished run, used to fetch a task's result
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunId(#[serde(deserialize_with = "string_or_number")] String);

impl RunId {
    /// Create a new RunId
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the raw id
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<i64> for RunId {
    fn from(id: i64) -> Self {
        Self(id.to_string())
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Str(String),
        Int(i64),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Str(s) => s,
        Raw::Int(n) => n.to_string(),
    })
}

/// Status of a remote task as reported by a status check
///
/// Only [`TaskStatus::Success`] and [`TaskStatus::Failed`] are terminal.
/// Labels this crate does not know are kept verbatim in
/// [`TaskStatus::Unknown`] and treated as still pending.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TaskStatus {
    /// Queued or running
    Pending,
    /// Finished successfully; the result can be fetched
    Success,
    /// Finished with an error
    Failed,
    /// Any other label reported by the service
    Unknown(String),
}

impl TaskStatus {
    /// Wire label for this status
    pub fn as_str(&self) -> &str {
        match self {
            TaskStatus::Pending => "PENDING",
            TaskStatus::Success => "SUCCESS",
            TaskStatus::Failed => "FAILED",
            TaskStatus::Unknown(label) => label,
        }
    }

    /// True for states after which no further transitions occur
    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskStatus::Success | TaskStatus::Failed)
    }
}

impl From<&str> for TaskStatus {
    fn from(label: &str) -> Self {
        match label {
            "PENDING" => TaskStatus::Pending,
            "SUCCESS" => TaskStatus::Success,
            "FAILED" => TaskStatus::Failed,
            other => TaskStatus::Unknown(other.to_string()),
        }
    }
}

impl FromStr for TaskStatus {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(TaskStatus::from(s))
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for TaskStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for TaskStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        Ok(TaskStatus::from(label.as_str()))
    }
}

/// Anything a status check can return that carries a [`TaskStatus`]
pub trait StatusReport {
    /// The reported status
    fn status(&self) -> &TaskStatus;
}

impl StatusReport for TaskStatus {
    fn status(&self) -> &TaskStatus {
        self
    }
}

/// Payload returned by the task status endpoints
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskStatusResponse {
    /// Current status
    pub status: TaskStatus,

    /// Run to fetch results from, present once the task succeeded
    #[serde(default, alias = "runId", skip_serializing_if = "Option::is_none")]
    pub run_id: Option<RunId>,
}

impl StatusReport for TaskStatusResponse {
    fn status(&self) -> &TaskStatus {
        &self.status
    }
}

/// Payload returned by task-creation endpoints
#[derive(Clone, Debug, Deserialize)]
pub(crate) struct TaskCreated {
    #[serde(alias = "taskId")]
    pub task_id: TaskId,
}

/// Kind of asynchronous task, selecting the status endpoint to poll
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TaskKind {
    /// Sound effect or music generation from a prompt
    TextToAudio,
    /// End-to-end video dubbing
    Dubbing,
}

impl TaskKind {
    /// Path prefix of the status endpoint for this kind
    pub(crate) fn status_path(&self) -> &'static str {
        match self {
            TaskKind::TextToAudio => "text-to-sound",
            TaskKind::Dubbing => "end-to-end-dubbing",
        }
    }
}

impl std::fmt::Display for TaskKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskKind::TextToAudio => write!(f, "text-to-audio"),
            TaskKind::Dubbing => write!(f, "dubbing"),
        }
    }
}
