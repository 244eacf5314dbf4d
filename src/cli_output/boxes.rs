//! Simple line-based CLI output utilities.

use crate::models::{ParsedReport, Source, Stage};

/// Line width for separators.
const LINE_WIDTH: usize = 60;

/// Print the main header.
///
/// ```text
/// MARKETLENS RESEARCH
/// ════════════════════════════════════════════════════════════
///   Topic: electric cargo bikes
///   Depth: Deep (2)
/// ```
pub fn print_header(title: &str, fields: &[(&str, &str)]) {
    println!();
    println!("{}", title);
    println!("{}", "═".repeat(LINE_WIDTH));
    for (label, value) in fields {
        println!("  {}: {}", label, value);
    }
    println!();
}

/// Print a stage transition.
///
/// ```text
/// [2/3] Gathering sources
/// ────────────────────────────────────────────────────────────
/// ```
pub fn print_stage(stage: Stage) {
    println!("[{}/3] {}", stage.progress_step(), stage.label());
    println!("{}", "─".repeat(LINE_WIDTH));
}

/// Print a line within a step.
///
/// ```text
///   ✓ Backend healthy
/// ```
pub fn print_step_line(icon: &str, message: &str) {
    println!("  {} {}", icon, message);
}

/// Print one backend log line.
pub fn print_log_line(line: &str) {
    println!("  {} {}", icons::LOG, line);
}

/// Print troubleshooting lines.
pub fn print_troubleshoot(lines: &[&str]) {
    println!();
    for line in lines {
        println!("    {}", line);
    }
}

/// Print the finished report: metadata summary, then the markdown body.
pub fn print_report(report: &ParsedReport) {
    println!();
    println!("{}", "═".repeat(LINE_WIDTH));
    if let Some(metadata) = &report.metadata {
        println!("{}", metadata.title);
        for metric in &metadata.key_metrics {
            println!("  {}: {}", metric.label, metric.value);
        }
        if let Some(url) = &metadata.dashboard_url {
            println!("  Dashboard: {}", url);
        }
        println!("{}", "─".repeat(LINE_WIDTH));
    }
    println!("{}", report.text);
}

/// Print the cited sources.
pub fn print_sources(sources: &[Source]) {
    if sources.is_empty() {
        return;
    }
    println!();
    println!("SOURCES");
    println!("{}", "─".repeat(LINE_WIDTH));
    for (i, source) in sources.iter().enumerate() {
        println!("  {}. {} <{}>", i + 1, source.title, source.url);
    }
}

/// Print the success footer.
pub fn print_footer_success(message: &str) {
    println!("{}", "═".repeat(LINE_WIDTH));
    println!("{} {}", icons::SUCCESS, message);
    println!("{}", "═".repeat(LINE_WIDTH));
}

/// Print the warning footer.
pub fn print_footer_warning(message: &str) {
    println!("{}", "═".repeat(LINE_WIDTH));
    println!("{} {}", icons::WARNING, message);
    println!("{}", "═".repeat(LINE_WIDTH));
}

/// Print the failure footer.
pub fn print_footer_failure(message: &str) {
    println!("{}", "═".repeat(LINE_WIDTH));
    println!("{} {}", icons::FAILURE, message);
    println!("{}", "═".repeat(LINE_WIDTH));
}

/// Status icons
pub mod icons {
    pub const SUCCESS: &str = "✓";
    pub const FAILURE: &str = "✗";
    pub const WARNING: &str = "⚠";
    pub const LOG: &str = "·";
}
