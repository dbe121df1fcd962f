//! taskrank - score and rank tasks by computed priority
//!
//! A task's priority comes from its due date, effort estimate, importance
//! and how many other tasks it blocks, weighed by a selectable strategy.
//! The [`engine`] is pure: callers hand it a task list, a strategy and the
//! evaluation date, and get back ranked tasks with explanations.

pub mod domain;
pub mod engine;
pub mod config;
pub mod cli;

pub use domain::{CycleCheck, ScoredTask, Strategy, Task, TaskId};
pub use engine::{analyze, suggest, RankError, Ranking};
