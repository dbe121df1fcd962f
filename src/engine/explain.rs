//! Human-readable reasons behind a score
//!
//! Explanations are derived from the task itself rather than from the score
//! breakdown, so every strategy shares the same tag vocabulary.

use chrono::NaiveDate;

use crate::domain::{Strategy, Task};

/// Joins reason tags in an explanation
pub const SEPARATOR: &str = " • ";

/// Tag used when nothing else applies
pub const BALANCED: &str = "Balanced priority";

/// Builds the explanation string for `task`
pub fn explain(task: &Task, strategy: Strategy, today: NaiveDate) -> String {
    reasons(task, strategy, today).join(SEPARATOR)
}

/// Returns the reason tags for `task`, in display order
pub fn reasons(task: &Task, strategy: Strategy, today: NaiveDate) -> Vec<&'static str> {
    let mut reasons = Vec::new();

    // A missing or bad date contributes no tag
    match task.days_until_due(today).ok().flatten() {
        Some(d) if d < 0 => reasons.push("OVERDUE"),
        Some(0) => reasons.push("Due today"),
        Some(1..=3) => reasons.push("Due very soon"),
        _ => {}
    }

    match task.importance() {
        Ok(i) if i >= 8 => reasons.push("High importance"),
        Ok(i) if i <= 3 => reasons.push("Low importance"),
        _ => {}
    }

    if task.estimated_hours().is_ok_and(|h| h <= 2.0) {
        reasons.push("Quick win");
    }

    if let Some(tag) = strategy.explanation_tag() {
        reasons.push(tag);
    }

    if reasons.is_empty() {
        reasons.push(BALANCED);
    }

    reasons
}
