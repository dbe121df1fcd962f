//! # Scoring Engine
//!
//! Pure scoring and ranking logic. No I/O, no clock: the evaluation date is
//! always passed in.
//!
//! ## Pipeline
//!
//! | Step | Function | Notes |
//! |------|----------|-------|
//! | Validate | [`rank`] | empty request → [`RankError::NoTasks`] |
//! | Cycle gate | [`rank`] | Analyze only, by default |
//! | Score | [`score`] | one call per task |
//! | Explain | [`explain`] | reason tags joined with [`SEPARATOR`] |
//! | Sort / truncate | [`rank`] | descending, stable |
//!
//! ## Strategies
//!
//! - `smart_balance` - urgency + importance + effort + blocked work
//! - `fastest_wins` - low effort first
//! - `high_impact` - importance only
//! - `deadline_driven` - due date first

mod scoring;
mod explain;
mod rank;
mod wire;

pub use scoring::{blocked_count, score};
pub use explain::{explain, reasons, BALANCED, SEPARATOR};
pub use rank::{
    analyze, rank, score_task, suggest, RankError, RankOptions, Ranking, TaskOutcome,
    DEFAULT_SUGGESTION_LIMIT,
};
pub use wire::{
    AnalyzeResponse, CheckResponse, ErrorResponse, PlanResponse, RankRequest, RequestError,
    SuggestResponse,
};
