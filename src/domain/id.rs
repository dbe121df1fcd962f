//! Opaque task identifiers
//!
//! Callers identify tasks with either JSON integers (`1`, `42`) or strings
//! (`"api-auth"`). The two forms never compare equal: `1` and `"1"` are
//! different tasks, matching how the wire documents are written.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum IdError {
    #[error("Task ID must not be empty")]
    Empty,
}

/// Identifier of a task within a single request
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "RawTaskId", into = "RawTaskId")]
pub enum TaskId {
    Number(i64),
    Text(String),
}

/// Wire form of a task ID before validation
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RawTaskId {
    Number(i64),
    Text(String),
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskId::Number(n) => f.pad(&n.to_string()),
            TaskId::Text(s) => f.pad(s),
        }
    }
}

impl From<i64> for TaskId {
    fn from(n: i64) -> Self {
        TaskId::Number(n)
    }
}

impl From<&str> for TaskId {
    fn from(s: &str) -> Self {
        TaskId::Text(s.to_string())
    }
}

impl TryFrom<RawTaskId> for TaskId {
    type Error = IdError;

    fn try_from(raw: RawTaskId) -> Result<Self, Self::Error> {
        match raw {
            RawTaskId::Number(n) => Ok(TaskId::Number(n)),
            RawTaskId::Text(s) if s.trim().is_empty() => Err(IdError::Empty),
            RawTaskId::Text(s) => Ok(TaskId::Text(s)),
        }
    }
}

impl From<TaskId> for RawTaskId {
    fn from(id: TaskId) -> Self {
        match id {
            TaskId::Number(n) => RawTaskId::Number(n),
            TaskId::Text(s) => RawTaskId::Text(s),
        }
    }
}
