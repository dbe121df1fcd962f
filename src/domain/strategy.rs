//! Scoring strategies
//!
//! A strategy selects which formula turns a task into a priority score.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Named scoring formula
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
#[value(rename_all = "snake_case")]
pub enum Strategy {
    /// Weighs urgency, importance, effort and blocking together
    #[default]
    SmartBalance,
    /// Favors low-effort tasks
    FastestWins,
    /// Ranks by importance alone
    HighImpact,
    /// Ranks by how soon the task is due
    DeadlineDriven,
}

impl Strategy {
    pub const ALL: [Strategy; 4] = [
        Strategy::SmartBalance,
        Strategy::FastestWins,
        Strategy::HighImpact,
        Strategy::DeadlineDriven,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::SmartBalance => "smart_balance",
            Strategy::FastestWins => "fastest_wins",
            Strategy::HighImpact => "high_impact",
            Strategy::DeadlineDriven => "deadline_driven",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Strategy::SmartBalance => "Balance urgency, importance, effort and blocked work",
            Strategy::FastestWins => "Prioritize low-effort tasks",
            Strategy::HighImpact => "Prioritize importance over everything",
            Strategy::DeadlineDriven => "Prioritize by due date",
        }
    }

    /// Reason tag this strategy contributes to explanations
    pub fn explanation_tag(&self) -> Option<&'static str> {
        match self {
            Strategy::SmartBalance => None,
            Strategy::FastestWins => Some("Low effort prioritized"),
            Strategy::HighImpact => Some("Impact prioritized"),
            Strategy::DeadlineDriven => Some("Deadline prioritized"),
        }
    }

    /// Looks up a strategy by its wire name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == name)
    }

    /// Resolves a caller-supplied name, falling back to `smart_balance`
    pub fn from_name_or_default(name: &str) -> Self {
        Self::from_name(name).unwrap_or_else(|| {
            tracing::warn!(strategy = name, "unknown strategy, using smart_balance");
            Strategy::default()
        })
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
