//! Request and response documents
//!
//! A request is either an object `{"tasks": [...], "strategy": "..."}` or a
//! bare array of tasks. Responses mirror the Analyze/Suggest contract:
//! `{"tasks": [...]}`, `{"suggestions": [...]}` or `{"error": "..."}`.

use serde::Serialize;
use thiserror::Error;

use super::rank::{RankError, Ranking};
use crate::domain::{CycleCheck, ScoredTask, SkippedTask, Task, TaskId};

#[derive(Debug, Error)]
pub enum RequestError {
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid task at index {index}: {source}")]
    Task {
        index: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid request: {0}")]
    Shape(String),
}

/// A parsed scoring request
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RankRequest {
    pub tasks: Vec<Task>,
    /// Strategy name exactly as the caller wrote it
    pub strategy: Option<String>,
}

impl RankRequest {
    /// Parses a request document
    pub fn from_json(input: &str) -> Result<Self, RequestError> {
        let value: serde_json::Value = serde_json::from_str(input)?;
        Self::from_value(value)
    }

    pub fn from_value(value: serde_json::Value) -> Result<Self, RequestError> {
        match value {
            serde_json::Value::Array(items) => Ok(Self {
                tasks: parse_tasks(items)?,
                strategy: None,
            }),
            serde_json::Value::Object(mut obj) => {
                let tasks = match obj.remove("tasks") {
                    None | Some(serde_json::Value::Null) => Vec::new(),
                    Some(serde_json::Value::Array(items)) => parse_tasks(items)?,
                    Some(_) => {
                        return Err(RequestError::Shape("'tasks' must be an array".to_string()))
                    }
                };
                let strategy = match obj.remove("strategy") {
                    None | Some(serde_json::Value::Null) => None,
                    Some(serde_json::Value::String(s)) => Some(s),
                    Some(_) => {
                        return Err(RequestError::Shape(
                            "'strategy' must be a string".to_string(),
                        ))
                    }
                };
                Ok(Self { tasks, strategy })
            }
            _ => Err(RequestError::Shape(
                "expected an object with a 'tasks' array or an array of tasks".to_string(),
            )),
        }
    }
}

fn parse_tasks(items: Vec<serde_json::Value>) -> Result<Vec<Task>, RequestError> {
    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            serde_json::from_value(item).map_err(|source| RequestError::Task { index, source })
        })
        .collect()
}

/// Successful Analyze response
#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub tasks: Vec<ScoredTask>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<SkippedTask>,
}

impl From<Ranking> for AnalyzeResponse {
    fn from(ranking: Ranking) -> Self {
        Self {
            tasks: ranking.tasks,
            skipped: ranking.skipped,
        }
    }
}

/// Successful Suggest response
#[derive(Debug, Serialize)]
pub struct SuggestResponse {
    pub suggestions: Vec<ScoredTask>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<SkippedTask>,
}

impl From<Ranking> for SuggestResponse {
    fn from(ranking: Ranking) -> Self {
        Self {
            suggestions: ranking.tasks,
            skipped: ranking.skipped,
        }
    }
}

/// Analyze and Suggest over the same request
#[derive(Debug, Serialize)]
pub struct PlanResponse {
    pub tasks: Vec<ScoredTask>,
    pub suggestions: Vec<ScoredTask>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<SkippedTask>,
}

/// Result of a standalone cycle check
#[derive(Debug, Serialize)]
pub struct CheckResponse {
    pub circular: bool,
    pub mode: CycleCheck,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub cycle: Vec<TaskId>,
}

/// Request-level failure
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl From<&RankError> for ErrorResponse {
    fn from(err: &RankError) -> Self {
        Self {
            error: err.to_string(),
        }
    }
}
