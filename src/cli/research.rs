//! Research and health commands.

use color_eyre::Result;

use super::args::ResearchArgs;
use crate::cli_output::{self, icons};
use crate::config::ClientConfig;
use crate::error::ErrorCategory;
use crate::models::{ResearchDepth, SessionSnapshot, Stage};
use crate::session::SessionController;

/// Exit status after Ctrl+C.
pub const EXIT_INTERRUPTED: i32 = 130;

/// Exit status when the session failed or ended without a report.
pub const EXIT_FAILED: i32 = 1;

/// Something new to print since the previous snapshot.
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressLine {
    Stage(Stage),
    Log(String),
}

/// Tracks what has been printed so each snapshot only prints the delta.
#[derive(Debug, Default)]
pub struct ProgressTracker {
    stage: Option<Stage>,
    printed_log: usize,
}

impl ProgressTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lines that appeared since the last call.
    pub fn advance(&mut self, snapshot: &SessionSnapshot) -> Vec<ProgressLine> {
        let mut lines = Vec::new();
        let stage = snapshot.state.stage;

        if stage.is_working() && self.stage != Some(stage) {
            self.stage = Some(stage);
            lines.push(ProgressLine::Stage(stage));
        }

        // The log only grows within a session; a shorter one means a reset
        if snapshot.state.log.len() < self.printed_log {
            self.printed_log = 0;
        }
        lines.extend(
            snapshot.state.log[self.printed_log..]
                .iter()
                .cloned()
                .map(ProgressLine::Log),
        );
        self.printed_log = snapshot.state.log.len();

        lines
    }
}

const RETRY_HINT: &str = "Run the same command again to retry";

/// Recovery suggestions printed under a failure.
fn troubleshoot_lines(category: ErrorCategory, retryable: bool) -> Vec<&'static str> {
    let mut lines = vec![category.recovery_hint()];
    if retryable {
        lines.push(RETRY_HINT);
    }
    lines
}

fn load_config(base_url: Option<&str>) -> Result<ClientConfig> {
    let config = ClientConfig::load()?;
    Ok(match base_url {
        Some(url) => config.with_base_url(url)?,
        None => config,
    })
}

/// Run one research session in the foreground and return the exit status.
pub async fn run_research(args: &ResearchArgs) -> Result<i32> {
    let config = load_config(args.base_url.as_deref())?;
    let controller = SessionController::from_config(&config)?;
    let mut updates = controller.subscribe();

    controller.start(&args.topic, args.depth).await?;

    let depth = ResearchDepth::try_from(args.depth)
        .map(|d| d.to_string())
        .unwrap_or_else(|_| args.depth.to_string());
    cli_output::print_header(
        "MARKETLENS RESEARCH",
        &[
            ("Topic", args.topic.trim()),
            ("Depth", depth.as_str()),
            ("Backend", config.base_url.as_str()),
        ],
    );

    let mut tracker = ProgressTracker::new();
    let snapshot = loop {
        let snapshot = updates.borrow_and_update().clone();
        for line in tracker.advance(&snapshot) {
            match line {
                ProgressLine::Stage(stage) => cli_output::print_stage(stage),
                ProgressLine::Log(text) => cli_output::print_log_line(&text),
            }
        }
        if !snapshot.busy {
            break snapshot;
        }

        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    break snapshot;
                }
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Interrupted, cancelling research session");
                controller.reset().await;
                println!();
                cli_output::print_footer_warning("RESEARCH CANCELLED");
                return Ok(EXIT_INTERRUPTED);
            }
        }
    };

    Ok(finish(&snapshot))
}

fn finish(snapshot: &SessionSnapshot) -> i32 {
    let state = &snapshot.state;
    match state.stage {
        Stage::Complete => {
            match state.parsed_report() {
                Some(report) => cli_output::print_report(&report),
                None => cli_output::print_step_line(icons::WARNING, "No report was returned"),
            }
            if let Some(sources) = &state.sources {
                cli_output::print_sources(sources);
            }
            println!();
            cli_output::print_footer_success("RESEARCH COMPLETE");
            0
        }
        Stage::Error => {
            let message = state
                .error_message
                .as_deref()
                .unwrap_or("Research failed");
            if let Some(category) = snapshot.error_category {
                let lines = troubleshoot_lines(category, category.is_retryable());
                cli_output::print_troubleshoot(&lines);
            }
            println!();
            cli_output::print_footer_failure(&format!("RESEARCH FAILED: {}", message));
            EXIT_FAILED
        }
        _ => {
            println!();
            cli_output::print_footer_warning("Stream ended before the report was finished");
            EXIT_FAILED
        }
    }
}

/// Query the backend health endpoint and return the exit status.
pub async fn run_health(base_url: Option<&str>) -> Result<i32> {
    let config = load_config(base_url)?;
    let controller = SessionController::from_config(&config)?;

    match controller.health_check().await {
        Ok(health) if health.is_healthy() => {
            let model = health.model.as_deref().unwrap_or("unknown model");
            cli_output::print_step_line(
                icons::SUCCESS,
                &format!("{} is healthy ({})", config.base_url, model),
            );
            Ok(0)
        }
        Ok(health) => {
            cli_output::print_step_line(
                icons::WARNING,
                &format!("{} reported status '{}'", config.base_url, health.status),
            );
            Ok(EXIT_FAILED)
        }
        Err(e) => {
            cli_output::print_step_line(icons::FAILURE, &e.user_message());
            cli_output::print_troubleshoot(&troubleshoot_lines(e.category(), e.is_retryable()));
            Ok(EXIT_FAILED)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SessionState;

    fn snapshot(stage: Stage, log: &[&str]) -> SessionSnapshot {
        SessionSnapshot {
            state: SessionState {
                stage,
                log: log.iter().map(|s| s.to_string()).collect(),
                ..SessionState::default()
            },
            busy: !stage.is_terminal(),
            ..SessionSnapshot::default()
        }
    }

    #[test]
    fn test_tracker_prints_only_new_lines() {
        let mut tracker = ProgressTracker::new();

        assert_eq!(
            tracker.advance(&snapshot(Stage::Planning, &[])),
            vec![ProgressLine::Stage(Stage::Planning)]
        );
        assert_eq!(
            tracker.advance(&snapshot(Stage::Planning, &["a"])),
            vec![ProgressLine::Log("a".to_string())]
        );
        assert_eq!(
            tracker.advance(&snapshot(Stage::Researching, &["a", "b"])),
            vec![
                ProgressLine::Stage(Stage::Researching),
                ProgressLine::Log("b".to_string())
            ]
        );
        assert!(tracker
            .advance(&snapshot(Stage::Researching, &["a", "b"]))
            .is_empty());
    }

    #[test]
    fn test_tracker_ignores_terminal_stage() {
        let mut tracker = ProgressTracker::new();
        tracker.advance(&snapshot(Stage::Writing, &[]));
        assert!(tracker.advance(&snapshot(Stage::Complete, &[])).is_empty());
    }

    #[test]
    fn test_tracker_restarts_after_shorter_log() {
        let mut tracker = ProgressTracker::new();
        tracker.advance(&snapshot(Stage::Planning, &["a", "b"]));
        assert_eq!(
            tracker.advance(&snapshot(Stage::Planning, &["c"])),
            vec![ProgressLine::Log("c".to_string())]
        );
    }

    #[test]
    fn test_troubleshoot_lines() {
        assert_eq!(
            troubleshoot_lines(ErrorCategory::Server, true),
            vec![ErrorCategory::Server.recovery_hint(), RETRY_HINT]
        );
        assert_eq!(
            troubleshoot_lines(ErrorCategory::Client, false),
            vec![ErrorCategory::Client.recovery_hint()]
        );
    }

    #[test]
    fn test_finish_error_with_category() {
        let mut failed = snapshot(Stage::Error, &["started"]);
        failed.state.error_message = Some("quota exceeded".to_string());
        failed.last_error = failed.state.error_message.clone();
        failed.error_category = Some(ErrorCategory::Server);
        assert_eq!(finish(&failed), EXIT_FAILED);
    }

    #[test]
    fn test_finish_exit_codes() {
        assert_eq!(finish(&snapshot(Stage::Complete, &[])), 0);
        assert_eq!(finish(&snapshot(Stage::Error, &[])), EXIT_FAILED);
        assert_eq!(finish(&snapshot(Stage::Writing, &[])), EXIT_FAILED);
    }
}
