//! Task domain model
//!
//! Tasks arrive from the caller as JSON records. They are parsed into a
//! typed [`Task`] once at the boundary; scoring only ever sees typed values.
//! The engine never changes a task, it wraps it in a [`ScoredTask`] that
//! carries the two derived fields.

use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use thiserror::Error;

use super::id::TaskId;

/// Wire format for due dates
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Valid importance range, inclusive
pub const IMPORTANCE_RANGE: std::ops::RangeInclusive<i64> = 1..=10;

/// Importance assumed when a record omits it
pub const DEFAULT_IMPORTANCE: i64 = 5;

#[derive(Debug, Error, PartialEq)]
pub enum TaskError {
    #[error("Unparseable due date '{0}': expected YYYY-MM-DD")]
    UnparseableDueDate(String),

    #[error("Invalid {field}: {raw}")]
    InvalidField { field: &'static str, raw: String },
}

/// Due date of a task as supplied by the caller
///
/// A missing date is a valid (if unscoreable) record; an unparseable one is
/// kept verbatim so the orchestrator can report it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DueDate {
    #[default]
    Missing,
    On(NaiveDate),
    Unparseable(String),
}

impl DueDate {
    /// Parses an ISO `YYYY-MM-DD` string; the empty string counts as missing
    pub fn parse(s: &str) -> Self {
        if s.is_empty() {
            return DueDate::Missing;
        }
        match NaiveDate::parse_from_str(s, DATE_FORMAT) {
            Ok(date) => DueDate::On(date),
            Err(_) => DueDate::Unparseable(s.to_string()),
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, DueDate::Missing)
    }

    /// Returns the calendar date, `None` when missing
    pub fn date(&self) -> Result<Option<NaiveDate>, TaskError> {
        match self {
            DueDate::Missing => Ok(None),
            DueDate::On(date) => Ok(Some(*date)),
            DueDate::Unparseable(raw) => Err(TaskError::UnparseableDueDate(raw.clone())),
        }
    }
}

impl From<NaiveDate> for DueDate {
    fn from(date: NaiveDate) -> Self {
        DueDate::On(date)
    }
}

impl Serialize for DueDate {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            DueDate::Missing => serializer.serialize_none(),
            DueDate::On(date) => serializer.serialize_str(&date.format(DATE_FORMAT).to_string()),
            DueDate::Unparseable(raw) => serializer.serialize_str(raw),
        }
    }
}

impl<'de> Deserialize<'de> for DueDate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // Any JSON value is accepted here; shape problems surface per task
        // during scoring instead of failing the whole request.
        let value = Option::<serde_json::Value>::deserialize(deserializer)?;
        Ok(match value {
            None | Some(serde_json::Value::Null) => DueDate::Missing,
            Some(serde_json::Value::String(s)) => DueDate::parse(&s),
            Some(other) => DueDate::Unparseable(other.to_string()),
        })
    }
}

/// A numeric task field as the caller sent it
///
/// A value of the wrong JSON type is kept verbatim; the task is then skipped
/// at scoring time while the rest of the request is still ranked.
#[derive(Debug, Clone, PartialEq)]
pub enum Lenient<T> {
    Valid(T),
    Invalid(serde_json::Value),
}

impl<T: Copy> Lenient<T> {
    /// Returns the value, or an error naming `field` if it was wrongly typed
    pub fn get(&self, field: &'static str) -> Result<T, TaskError> {
        match self {
            Lenient::Valid(value) => Ok(*value),
            Lenient::Invalid(raw) => Err(TaskError::InvalidField {
                field,
                raw: raw.to_string(),
            }),
        }
    }
}

impl<T: fmt::Display> fmt::Display for Lenient<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Lenient::Valid(value) => value.fmt(f),
            Lenient::Invalid(raw) => write!(f, "{}", raw),
        }
    }
}

impl<T: Serialize> Serialize for Lenient<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Lenient::Valid(value) => value.serialize(serializer),
            Lenient::Invalid(raw) => raw.serialize(serializer),
        }
    }
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for Lenient<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = serde_json::Value::deserialize(deserializer)?;
        Ok(match serde_json::from_value(raw.clone()) {
            Ok(value) => Lenient::Valid(value),
            Err(_) => Lenient::Invalid(raw),
        })
    }
}

fn default_importance() -> Lenient<i64> {
    Lenient::Valid(DEFAULT_IMPORTANCE)
}

fn default_hours() -> Lenient<f64> {
    Lenient::Valid(0.0)
}

/// Bulk imports may omit IDs; those tasks share ID `0`
fn missing_id() -> TaskId {
    TaskId::Number(0)
}

/// A task record within one scoring request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    #[serde(default = "missing_id")]
    pub id: TaskId,

    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub due_date: DueDate,

    #[serde(default = "default_hours")]
    pub estimated_hours: Lenient<f64>,

    #[serde(default = "default_importance")]
    pub importance: Lenient<i64>,

    #[serde(default)]
    pub dependencies: Vec<TaskId>,

    /// Caller fields the engine does not interpret, echoed back unchanged
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Task {
    /// Creates a task with no due date, zero effort and default importance
    pub fn new(id: impl Into<TaskId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            due_date: DueDate::Missing,
            estimated_hours: default_hours(),
            importance: default_importance(),
            dependencies: Vec::new(),
            extra: serde_json::Map::new(),
        }
    }

    pub fn with_due_date(mut self, date: NaiveDate) -> Self {
        self.due_date = DueDate::On(date);
        self
    }

    pub fn with_hours(mut self, hours: f64) -> Self {
        self.estimated_hours = Lenient::Valid(hours);
        self
    }

    pub fn with_importance(mut self, importance: i64) -> Self {
        self.importance = Lenient::Valid(importance);
        self
    }

    pub fn with_dependency(mut self, id: impl Into<TaskId>) -> Self {
        self.dependencies.push(id.into());
        self
    }

    pub fn importance(&self) -> Result<i64, TaskError> {
        self.importance.get("importance")
    }

    pub fn estimated_hours(&self) -> Result<f64, TaskError> {
        self.estimated_hours.get("estimated_hours")
    }

    /// Returns true if this task lists `id` as a dependency
    pub fn depends_on(&self, id: &TaskId) -> bool {
        self.dependencies.contains(id)
    }

    /// Whole days from `today` until the due date (negative when overdue)
    pub fn days_until_due(&self, today: NaiveDate) -> Result<Option<i64>, TaskError> {
        Ok(self
            .due_date
            .date()?
            .map(|due| due.signed_duration_since(today).num_days()))
    }
}

/// A task with its computed priority attached
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredTask {
    #[serde(flatten)]
    pub task: Task,
    pub priority_score: f64,
    pub priority_explanation: String,
}

impl ScoredTask {
    pub fn new(mut task: Task, priority_score: f64, priority_explanation: String) -> Self {
        // Stale derived fields from the caller would collide with ours
        task.extra.remove("priority_score");
        task.extra.remove("priority_explanation");
        Self {
            task,
            priority_score,
            priority_explanation,
        }
    }

    pub fn level(&self) -> PriorityLevel {
        PriorityLevel::from_score(self.priority_score)
    }
}

/// A task the orchestrator could not score
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedTask {
    pub id: TaskId,
    pub reason: String,
}

/// Display band for a priority score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PriorityLevel {
    High,   // >= 70
    Medium, // >= 40
    Low,    // < 40
}

impl PriorityLevel {
    pub fn from_score(score: f64) -> Self {
        if score >= 70.0 {
            PriorityLevel::High
        } else if score >= 40.0 {
            PriorityLevel::Medium
        } else {
            PriorityLevel::Low
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PriorityLevel::High => "HIGH",
            PriorityLevel::Medium => "MEDIUM",
            PriorityLevel::Low => "LOW",
        }
    }
}
