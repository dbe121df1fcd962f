//! Request orchestration
//!
//! Runs the pipeline for one request: validate, optionally gate on
//! dependency cycles, score every task, sort by score and optionally
//! truncate. Tasks that cannot be scored are reported, not dropped silently.

use chrono::NaiveDate;
use thiserror::Error;

use super::explain::explain;
use super::scoring::score;
use crate::domain::{
    CycleCheck, DependencyGraph, ScoredTask, SkippedTask, Strategy, Task, TaskId,
};

/// Number of suggestions returned when no limit is configured
pub const DEFAULT_SUGGESTION_LIMIT: usize = 3;

/// Request-level failures; no task is scored when one of these is returned
#[derive(Debug, Error, PartialEq)]
pub enum RankError {
    #[error("No tasks provided")]
    NoTasks,

    #[error("Circular dependencies detected")]
    CircularDependencies(Vec<TaskId>),
}

/// Result of scoring a single task
#[derive(Debug, Clone, PartialEq)]
pub enum TaskOutcome {
    Scored(ScoredTask),
    Skipped(SkippedTask),
}

/// Settings for one ranking run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankOptions {
    pub strategy: Strategy,
    pub today: NaiveDate,
    /// Reject the request if the check finds a cycle; `None` skips it
    pub cycle_check: Option<CycleCheck>,
    /// Keep only the top `n` tasks
    pub limit: Option<usize>,
}

impl RankOptions {
    /// Options for Analyze: cycle-checked, full list
    pub fn analyze(strategy: Strategy, today: NaiveDate) -> Self {
        Self {
            strategy,
            today,
            cycle_check: Some(CycleCheck::Mutual),
            limit: None,
        }
    }

    /// Options for Suggest: no cycle check, top three
    pub fn suggest(strategy: Strategy, today: NaiveDate) -> Self {
        Self {
            strategy,
            today,
            cycle_check: None,
            limit: Some(DEFAULT_SUGGESTION_LIMIT),
        }
    }

    pub fn with_cycle_check(mut self, check: Option<CycleCheck>) -> Self {
        self.cycle_check = check;
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Scored tasks in descending score order, plus the ones that were skipped
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ranking {
    pub tasks: Vec<ScoredTask>,
    pub skipped: Vec<SkippedTask>,
}

impl Ranking {
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

/// Scores one task against the request's task set
pub fn score_task(
    task: &Task,
    all_tasks: &[Task],
    strategy: Strategy,
    today: NaiveDate,
) -> TaskOutcome {
    match score(task, all_tasks, strategy, today) {
        Ok(priority_score) => {
            let explanation = explain(task, strategy, today);
            tracing::debug!(id = %task.id, score = priority_score, "scored task");
            TaskOutcome::Scored(ScoredTask::new(task.clone(), priority_score, explanation))
        }
        Err(e) => {
            tracing::debug!(id = %task.id, error = %e, "skipping task");
            TaskOutcome::Skipped(SkippedTask {
                id: task.id.clone(),
                reason: e.to_string(),
            })
        }
    }
}

/// Runs the full pipeline over `tasks`
pub fn rank(tasks: &[Task], options: &RankOptions) -> Result<Ranking, RankError> {
    if tasks.is_empty() {
        return Err(RankError::NoTasks);
    }

    if let Some(check) = options.cycle_check {
        let graph = DependencyGraph::from_tasks(tasks);
        if let Some(cycle) = graph.find_cycle(check) {
            tracing::debug!(mode = check.as_str(), ?cycle, "dependency cycle found");
            return Err(RankError::CircularDependencies(cycle));
        }
    }

    let mut ranking = Ranking::default();
    for task in tasks {
        match score_task(task, tasks, options.strategy, options.today) {
            TaskOutcome::Scored(scored) => ranking.tasks.push(scored),
            TaskOutcome::Skipped(skipped) => ranking.skipped.push(skipped),
        }
    }

    // Stable: equal scores keep their input order
    ranking
        .tasks
        .sort_by(|a, b| b.priority_score.total_cmp(&a.priority_score));

    if let Some(limit) = options.limit {
        ranking.tasks.truncate(limit);
    }

    tracing::debug!(
        strategy = %options.strategy,
        scored = ranking.tasks.len(),
        skipped = ranking.skipped.len(),
        "ranking complete"
    );

    Ok(ranking)
}

/// Analyze: reject mutual dependencies, return every task by score
pub fn analyze(tasks: &[Task], strategy: Strategy, today: NaiveDate) -> Result<Ranking, RankError> {
    rank(tasks, &RankOptions::analyze(strategy, today))
}

/// Suggest: the top three tasks by score, without a cycle check
pub fn suggest(tasks: &[Task], strategy: Strategy, today: NaiveDate) -> Result<Ranking, RankError> {
    rank(tasks, &RankOptions::suggest(strategy, today))
}
