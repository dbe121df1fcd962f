//! # Command-Line Interface
//!
//! Reads a scoring request, runs it through the engine and prints the
//! result.
//!
//! ## Commands
//!
//! | Command | Purpose |
//! |---------|---------|
//! | `analyze` | Rank every task (rejects circular dependencies) |
//! | `suggest` | Top tasks to work on next |
//! | `plan` | Suggestions plus the full ranking |
//! | `check` | Cycle check only |
//! | `strategies` | List scoring strategies |
//!
//! ## Input
//!
//! Commands take a JSON file argument, or read stdin when it is omitted or
//! `-`. Both `{"tasks": [...], "strategy": "..."}` and a bare task array
//! are accepted.
//!
//! ## Output Formats
//!
//! All commands support `--format` flag:
//! - `text` (default) - Human-readable output
//! - `json` - The response document
//!
//! ## Verbose Mode
//!
//! Use `--verbose` (or `-v`) for debug logging on stderr; `RUST_LOG`
//! overrides the filter:
//! ```bash
//! taskrank --verbose analyze tasks.json
//! ```
//!
//! ## Entry Point
//!
//! Call [`run()`] to parse arguments and execute the appropriate command.

mod app;
mod output;
mod rank_cmd;

pub use app::{run, Cli, Commands, RequestArgs};
pub use output::{Output, OutputFormat};
