//! Terminal display logic for domain-scout CLI.
//!
//! This module handles the human-readable output: colored result lines,
//! grouped output, spinner animation, headers, and summaries. Uses only the
//! `console` crate.

use console::{pad_str, style, Alignment, Term};
use domain_scout_lib::{DomainResult, LookupConfig, Summary, UpstreamFlavor};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::Mode;

// ── Spinner ──────────────────────────────────────────────────────────────────

const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// An async braille-dot spinner that writes to stderr so stdout stays clean.
pub struct Spinner {
    running: Arc<AtomicBool>,
    handle: Option<tokio::task::JoinHandle<()>>,
}

impl Spinner {
    /// Start a new spinner with the given message (e.g. "Searching 'idea'...").
    pub fn start(message: String) -> Self {
        let running = Arc::new(AtomicBool::new(true));
        let running_clone = running.clone();

        let handle = tokio::spawn(async move {
            let term = Term::stderr();
            let mut idx = 0usize;
            while running_clone.load(Ordering::Relaxed) {
                let frame = SPINNER_FRAMES[idx % SPINNER_FRAMES.len()];
                let _ = term.clear_line();
                let _ = term.write_str(&format!("{} {}", style(frame).cyan(), message));
                idx += 1;
                tokio::time::sleep(Duration::from_millis(80)).await;
            }
            let _ = term.clear_line();
        });

        Self {
            running,
            handle: Some(handle),
        }
    }

    /// Stop the spinner and clear the line.
    pub async fn stop(mut self) {
        self.running.store(false, Ordering::Relaxed);
        if let Some(h) = self.handle.take() {
            let _ = h.await;
        }
    }
}

// ── Header ───────────────────────────────────────────────────────────────────

/// Print a styled header describing the run (verbose mode).
pub fn print_header(query: &str, mode: Mode, config: &LookupConfig) {
    println!(
        "{} {} {}",
        style("domain-scout").bold(),
        style(format!("v{}", env!("CARGO_PKG_VERSION"))).dim(),
        style(format!("· {} '{}'", mode.progress_label(), query)).dim(),
    );

    let mut meta_parts = vec![format!("{} TLDs", config.tlds.len())];
    if config.flavor == UpstreamFlavor::Proxy {
        meta_parts.push(format!("Proxy: {}", config.endpoint));
    }
    if mode == Mode::Search || mode == Mode::Expand {
        meta_parts.push(format!("Delay: {}ms", config.request_delay.as_millis()));
    }
    meta_parts.push(if config.cache_enabled {
        "Cache: on".to_string()
    } else {
        "Cache: off".to_string()
    });

    println!("{}", style(meta_parts.join(" | ")).dim());
    println!();
}

// ── Result lines ─────────────────────────────────────────────────────────────

/// Format and print a single domain result with colors and alignment.
pub fn print_result(result: &DomainResult, debug: bool) {
    let padded_domain = pad_str(&result.domain, 30, Alignment::Left, Some(".."));

    match result.summary {
        Summary::Available => println!(
            "  {}  {}",
            style(&padded_domain).white(),
            style("AVAILABLE").green().bold(),
        ),
        Summary::Unavailable => println!(
            "  {}  {}  {}",
            style(&padded_domain).white(),
            style("TAKEN").red().bold(),
            style(&result.status).dim(),
        ),
        Summary::Unknown => println!(
            "  {}  {}  {}",
            style(&padded_domain).white(),
            style("UNKNOWN").yellow(),
            style(brief_error(result)).dim(),
        ),
    }

    if debug {
        if let Some(error) = &result.error {
            println!("    {} {}", style("└─").dim(), style(error).dim());
        }
    }
}

/// Print results grouped by summary: Available, Taken, Unknown.
/// Empty sections are omitted entirely.
pub fn print_grouped_results(results: &[DomainResult], debug: bool) {
    let sections = [
        (Summary::Available, "Available"),
        (Summary::Unavailable, "Taken"),
        (Summary::Unknown, "Unknown"),
    ];

    for (summary, title) in sections {
        let group: Vec<&DomainResult> = results.iter().filter(|r| r.summary == summary).collect();
        if group.is_empty() {
            continue;
        }

        let heading = format!("── {} ({}) ", title, group.len());
        let rule = "─".repeat(48usize.saturating_sub(heading.chars().count()));
        let (heading, rule) = match summary {
            Summary::Available => (style(heading).green().bold(), style(rule).green().dim()),
            Summary::Unavailable => (style(heading).red().bold(), style(rule).red().dim()),
            Summary::Unknown => (style(heading).yellow().bold(), style(rule).yellow().dim()),
        };
        println!("  {}{}", heading, rule);

        for r in group {
            let padded = pad_str(&r.domain, 30, Alignment::Left, Some(".."));
            match r.summary {
                Summary::Unknown => {
                    println!("    {}  {}", style(&padded).white(), style(brief_error(r)).dim())
                }
                _ => println!("    {}  {}", style(&padded).white(), style(&r.status).dim()),
            }
            if debug {
                if let Some(error) = &r.error {
                    println!("      {} {}", style("└─").dim(), style(error).dim());
                }
            }
        }
        println!();
    }
}

pub fn print_no_results(available_only: bool) {
    if available_only {
        println!("  {}", style("No available domains found").yellow());
    } else {
        println!("  {}", style("No results").yellow());
    }
}

// ── Summary ──────────────────────────────────────────────────────────────────

/// Print the final summary bar with colored counts.
pub fn print_summary(
    total: usize,
    available: usize,
    unavailable: usize,
    unknown: usize,
    duration: Duration,
) {
    println!(
        "  {}",
        style("────────────────────────────────────────────────────").dim()
    );
    println!(
        "  {} domain{} in {:.1}s  {}  {}  {}  {}  {}  {}",
        style(total).bold(),
        if total == 1 { "" } else { "s" },
        duration.as_secs_f64(),
        style("|").dim(),
        style(format!("{} available", available)).green(),
        style("|").dim(),
        style(format!("{} unavailable", unavailable)).red(),
        style("|").dim(),
        style(format!("{} unknown", unknown)).yellow(),
    );
}

pub fn print_export_notice(path: &str, lines: usize) {
    println!(
        "  {} {} ({} line{})",
        style("Exported to").dim(),
        style(path).cyan(),
        lines,
        if lines == 1 { "" } else { "s" },
    );
}

// ── Helpers ──────────────────────────────────────────────────────────────────

/// Extract a brief reason from a result with unknown summary.
fn brief_error(result: &DomainResult) -> &'static str {
    match &result.error {
        Some(msg) => {
            let m = msg.to_lowercase();
            if m.contains("timeout") || m.contains("timed out") {
                "(timeout)"
            } else if m.contains("rate limit") || m.contains("429") {
                "(rate limited)"
            } else if m.contains("network") || m.contains("connect") {
                "(network error)"
            } else if m.contains("parse") || m.contains("json") {
                "(parsing error)"
            } else {
                "(error)"
            }
        }
        None => "(unknown status)",
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_brief_error_timeout() {
        let r = DomainResult::placeholder("a.com", "status lookup timed out after 10s");
        assert_eq!(brief_error(&r), "(timeout)");
    }

    #[test]
    fn test_brief_error_network() {
        let r = DomainResult::placeholder("a.com", "Network error: connection refused");
        assert_eq!(brief_error(&r), "(network error)");
    }

    #[test]
    fn test_brief_error_rate_limited() {
        let r = DomainResult::placeholder("a.com", "upstream returned 429");
        assert_eq!(brief_error(&r), "(rate limited)");
    }

    #[test]
    fn test_brief_error_unknown_status() {
        let r = DomainResult::unchecked("a.com", "com");
        assert_eq!(brief_error(&r), "(unknown status)");
    }
}
