//! Domain models for taskrank
//!
//! Contains the task record, strategies and the dependency graph, without
//! any I/O concerns.

mod id;
mod task;
mod strategy;
mod graph;

pub use id::{IdError, TaskId};
pub use task::{
    DueDate, Lenient, PriorityLevel, ScoredTask, SkippedTask, Task, TaskError, DATE_FORMAT,
    DEFAULT_IMPORTANCE, IMPORTANCE_RANGE,
};
pub use strategy::Strategy;
pub use graph::{detect_cycle, CycleCheck, DependencyGraph};
