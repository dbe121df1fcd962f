//! Ranking commands (analyze, suggest, plan, check, strategies)

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};

use super::app::RequestArgs;
use super::output::Output;
use crate::config::Config;
use crate::domain::{CycleCheck, DependencyGraph, ScoredTask, SkippedTask, Strategy};
use crate::engine::{
    rank, AnalyzeResponse, CheckResponse, PlanResponse, RankRequest, SuggestResponse,
};

/// Reads a request from a file, or stdin for `None` / `-`
fn read_request(file: Option<&Path>) -> Result<RankRequest> {
    let (content, source) = match file {
        Some(path) if path != Path::new("-") => (
            std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read request: {}", path.display()))?,
            path.display().to_string(),
        ),
        _ => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read request from stdin")?;
            (buf, "stdin".to_string())
        }
    };

    let request = RankRequest::from_json(&content)
        .with_context(|| format!("Failed to parse request from {}", source))?;
    tracing::debug!(source = %source, tasks = request.tasks.len(), "read request");
    Ok(request)
}

fn check_limit(limit: Option<usize>) -> Result<()> {
    if limit == Some(0) {
        anyhow::bail!("--limit must be at least 1");
    }
    Ok(())
}

/// Score every task and list them by priority
pub fn analyze(
    output: &Output,
    config: &Config,
    args: &RequestArgs,
    cycle_check: Option<CycleCheck>,
) -> Result<()> {
    let request = read_request(args.file.as_deref())?;
    let strategy = config.resolve_strategy(args.strategy, request.strategy.as_deref());
    let today = args.today();
    output.verbose_ctx("analyze", &format!("strategy={}, today={}", strategy, today));

    let mut options = config.analyze_options(strategy, today);
    if let Some(check) = cycle_check {
        options = options.with_cycle_check(Some(check));
    }

    let ranking = rank(&request.tasks, &options)?;

    if output.is_json() {
        output.data(&AnalyzeResponse::from(ranking));
    } else {
        println!(
            "Ranked tasks ({}) using {} as of {}:",
            ranking.len(),
            strategy,
            today
        );
        print_table(&ranking.tasks);
        print_skipped(&ranking.skipped);
    }

    Ok(())
}

/// Show the top tasks to work on next
pub fn suggest(
    output: &Output,
    config: &Config,
    args: &RequestArgs,
    limit: Option<usize>,
) -> Result<()> {
    check_limit(limit)?;
    let request = read_request(args.file.as_deref())?;
    let strategy = config.resolve_strategy(args.strategy, request.strategy.as_deref());
    let today = args.today();
    output.verbose_ctx("suggest", &format!("strategy={}, today={}", strategy, today));

    let mut options = config.suggest_options(strategy, today);
    if let Some(limit) = limit {
        options = options.with_limit(limit);
    }

    let ranking = rank(&request.tasks, &options)?;

    if output.is_json() {
        output.data(&SuggestResponse::from(ranking));
    } else {
        print_suggestions(&ranking.tasks);
        print_skipped(&ranking.skipped);
    }

    Ok(())
}

/// Show suggestions followed by the full ranking
pub fn plan(
    output: &Output,
    config: &Config,
    args: &RequestArgs,
    limit: Option<usize>,
) -> Result<()> {
    check_limit(limit)?;
    let request = read_request(args.file.as_deref())?;
    let strategy = config.resolve_strategy(args.strategy, request.strategy.as_deref());
    let today = args.today();
    output.verbose_ctx("plan", &format!("strategy={}, today={}", strategy, today));

    // Analyze gates the whole plan on cycles; suggestions are its top tasks
    let ranking = rank(&request.tasks, &config.analyze_options(strategy, today))?;
    let limit = limit.unwrap_or(config.suggestion_limit);
    let suggestions: Vec<ScoredTask> = ranking.tasks.iter().take(limit).cloned().collect();

    if output.is_json() {
        output.data(&PlanResponse {
            tasks: ranking.tasks,
            suggestions,
            skipped: ranking.skipped,
        });
    } else {
        print_suggestions(&suggestions);
        println!();
        println!("All tasks ({}) using {} as of {}:", ranking.len(), strategy, today);
        print_table(&ranking.tasks);
        print_skipped(&ranking.skipped);
    }

    Ok(())
}

/// Check a request for circular dependencies without scoring
pub fn check(
    output: &Output,
    config: &Config,
    file: Option<&Path>,
    cycle_check: Option<CycleCheck>,
) -> Result<()> {
    let request = read_request(file)?;
    let mode = cycle_check.unwrap_or(config.cycle_check);
    let graph = DependencyGraph::from_tasks(&request.tasks);
    let cycle = graph.find_cycle(mode);
    output.verbose_ctx(
        "check",
        &format!(
            "mode={}, tasks={}, cycle={:?}",
            mode.as_str(),
            request.tasks.len(),
            cycle
        ),
    );

    if output.is_json() {
        output.data(&CheckResponse {
            circular: cycle.is_some(),
            mode,
            cycle: cycle.unwrap_or_default(),
        });
    } else {
        match cycle {
            Some(ids) => {
                let ids: Vec<String> = ids.iter().map(|id| id.to_string()).collect();
                println!(
                    "Circular dependencies detected ({} check): {}",
                    mode.as_str(),
                    ids.join(", ")
                );
            }
            None => println!("No circular dependencies ({} check).", mode.as_str()),
        }
    }

    Ok(())
}

/// List the available scoring strategies
pub fn strategies(output: &Output, config: &Config) {
    if output.is_json() {
        let items: Vec<_> = Strategy::ALL
            .iter()
            .map(|s| {
                serde_json::json!({
                    "name": s.as_str(),
                    "description": s.description(),
                    "default": *s == config.default_strategy,
                })
            })
            .collect();
        output.data(&items);
    } else {
        println!("{:<18} DESCRIPTION", "STRATEGY");
        println!("{}", "-".repeat(70));
        for s in Strategy::ALL {
            let marker = if s == config.default_strategy { " (default)" } else { "" };
            println!("{:<18} {}{}", s.as_str(), s.description(), marker);
        }
    }
}

fn print_table(tasks: &[ScoredTask]) {
    if tasks.is_empty() {
        println!("No tasks could be scored.");
        return;
    }

    println!("{:<4} {:>7} {:<7} {:<12} TITLE", "#", "SCORE", "LEVEL", "ID");
    println!("{}", "-".repeat(70));
    for (i, scored) in tasks.iter().enumerate() {
        println!(
            "{:<4} {:>7.2} {:<7} {:<12} {}",
            i + 1,
            scored.priority_score,
            scored.level().label(),
            scored.task.id,
            scored.task.title
        );
        println!("{:<34}{}", "", scored.priority_explanation);
    }
}

fn print_suggestions(tasks: &[ScoredTask]) {
    if tasks.is_empty() {
        println!("No suggestions.");
        return;
    }

    println!("Top {} recommendation(s):", tasks.len());
    for (i, scored) in tasks.iter().enumerate() {
        println!(
            "  #{}: {} [{}] score {:.2}, due {}, {}h",
            i + 1,
            scored.task.title,
            scored.task.id,
            scored.priority_score,
            due_label(scored),
            scored.task.estimated_hours
        );
        println!("      Why: {}", scored.priority_explanation);
    }
}

fn due_label(scored: &ScoredTask) -> String {
    match scored.task.due_date.date() {
        Ok(Some(date)) => date.to_string(),
        _ => "-".to_string(),
    }
}

fn print_skipped(skipped: &[SkippedTask]) {
    if skipped.is_empty() {
        return;
    }

    println!();
    println!("Skipped {} task(s):", skipped.len());
    for task in skipped {
        println!("  {}: {}", task.id, task.reason);
    }
}

