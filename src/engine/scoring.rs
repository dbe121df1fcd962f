//! Priority scoring formulas
//!
//! [`score`] is a pure function of the task, the request's task set, the
//! strategy and the evaluation date. Nothing here reads the clock.

use chrono::NaiveDate;

use crate::domain::{Strategy, Task, TaskError, IMPORTANCE_RANGE};

/// Computes the priority score of `task`
///
/// A wrongly typed importance or effort fails the task. Otherwise tasks
/// without a due date, or with importance outside 1..=10, score `0`.
/// That guard runs before the due date is parsed, so an unparseable date
/// only fails a task that would otherwise be scored.
pub fn score(
    task: &Task,
    all_tasks: &[Task],
    strategy: Strategy,
    today: NaiveDate,
) -> Result<f64, TaskError> {
    let importance = task.importance()?;
    let estimated_hours = task.estimated_hours()?;
    if task.due_date.is_missing() || !IMPORTANCE_RANGE.contains(&importance) {
        return Ok(0.0);
    }

    let Some(days_until_due) = task.days_until_due(today)? else {
        return Ok(0.0);
    };
    let importance = importance as f64;

    let total = match strategy {
        Strategy::FastestWins => fastest_wins(estimated_hours, importance),
        Strategy::HighImpact => high_impact(importance),
        Strategy::DeadlineDriven => deadline_driven(days_until_due, importance),
        Strategy::SmartBalance => smart_balance(
            days_until_due,
            importance,
            estimated_hours,
            blocked_count(task, all_tasks),
        ),
    };

    Ok(total)
}

/// Number of tasks in `all_tasks` that list `task` as a dependency
pub fn blocked_count(task: &Task, all_tasks: &[Task]) -> usize {
    all_tasks.iter().filter(|t| t.depends_on(&task.id)).count()
}

fn fastest_wins(estimated_hours: f64, importance: f64) -> f64 {
    let effort = (50.0 - estimated_hours * 5.0).max(0.0);
    effort + importance * 5.0
}

fn high_impact(importance: f64) -> f64 {
    importance * 10.0
}

fn deadline_driven(days_until_due: i64, importance: f64) -> f64 {
    let urgency = match days_until_due {
        d if d < 0 => 100.0,
        0 => 90.0,
        1..=3 => 70.0,
        4..=7 => 50.0,
        d => (40 - d).max(0) as f64,
    };
    urgency + importance * 2.0
}

fn smart_balance(
    days_until_due: i64,
    importance: f64,
    estimated_hours: f64,
    blocked_count: usize,
) -> f64 {
    // Urgency: 0-40
    let urgency = match days_until_due {
        d if d < 0 => 40.0,
        0 => 35.0,
        1..=3 => 30.0,
        4..=7 => 20.0,
        d => (15.0 - d as f64 * 0.5).max(0.0),
    };

    // Importance: 0-35
    let importance = importance * 3.5;

    // Effort: 0-15, quick wins get the bonus
    let effort = if estimated_hours <= 2.0 {
        15.0
    } else if estimated_hours <= 4.0 {
        10.0
    } else if estimated_hours <= 8.0 {
        5.0
    } else {
        2.0
    };

    // Dependency: 0-10
    let dependency = (blocked_count * 5).min(10) as f64;

    round2(urgency + importance + effort + dependency)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
