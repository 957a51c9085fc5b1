use anyhow::{Context, Result};
use crossterm::style::Stylize;
use std::path::Path;
use std::time::Instant;
use tracing::debug;

use crate::api_client::{ApiClient, Endpoint, HitsRequest};
use crate::config::config::{DisplayConfig, HitsConfig};
use crate::display;
use crate::history::QueryHistory;

/// The phrases the harness has always shipped with. They exercise plain
/// terms, the backend's field syntax (parti:, år:, författare:) and its
/// wildcard support.
pub const DEFAULT_PHRASES: [&str; 4] = [
    "asdf",
    "asdf,qwer,zxcv parti:(m,s) år:(1995-2000)",
    "mer .* till författare:(anders borg)",
    "mer pengar till .*",
];

pub fn default_phrases() -> Vec<String> {
    DEFAULT_PHRASES.iter().map(|s| s.to_string()).collect()
}

/// Read probe phrases from a file, one per line. Blank lines and lines
/// starting with '#' are skipped; order is preserved.
pub fn load_phrases(path: &Path) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Cannot read phrase file {}", path.display()))?;

    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect())
}

/// The fixed probe order for a sweep: per phrase a search, a timeline
/// search and a hits page, then the three phrase-less endpoints once.
pub fn sweep_plan(phrases: &[String], hits: &HitsConfig) -> Vec<Endpoint> {
    let mut plan = Vec::with_capacity(phrases.len() * 3 + 3);

    for phrase in phrases {
        plan.push(Endpoint::search(phrase));
        plan.push(Endpoint::timeline_search(phrase));
        plan.push(Endpoint::hits(&HitsRequest {
            search_phrase: phrase.clone(),
            start_date: hits.start_date,
            end_date: hits.end_date,
            from_index: hits.from_index,
            query_mode: hits.query_mode.clone(),
        }));
    }

    plan.push(Endpoint::timeline_total());
    plan.push(Endpoint::latest_queries());
    plan.push(Endpoint::top_queries());

    plan
}

/// Outcome of one probe in a sweep.
#[derive(Debug, Clone)]
pub struct ProbeOutcome {
    /// Human-readable request line, e.g. "GET /motioner?searchPhrase=asdf"
    pub request: String,
    pub phrase: Option<String>,
    pub success: bool,
    pub duration_ms: u64,
    /// Error text for failed probes
    pub error: Option<String>,
}

#[derive(Debug, Default)]
pub struct SmokeReport {
    pub outcomes: Vec<ProbeOutcome>,
}

impl SmokeReport {
    pub fn passed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.success).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.passed()
    }

    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }

    pub fn push(&mut self, outcome: ProbeOutcome) {
        self.outcomes.push(outcome);
    }
}

/// Execute a sweep sequentially. A failed probe is recorded and the sweep
/// moves on, mirroring how the hand-run harness just logged errors.
pub fn run_sweep(
    client: &ApiClient,
    plan: &[Endpoint],
    display_cfg: &DisplayConfig,
    mut history: Option<&mut QueryHistory>,
) -> SmokeReport {
    let mut report = SmokeReport::default();

    for endpoint in plan {
        let request = endpoint.describe();
        if display_cfg.color {
            println!("{}", request.as_str().cyan());
        } else {
            println!("{}", request);
        }

        let started = Instant::now();
        let result = client.get(endpoint);
        let duration_ms = started.elapsed().as_millis() as u64;

        let (success, error) = match &result {
            Ok(body) => {
                display::display_response(body, display_cfg);
                (true, None)
            }
            Err(e) => {
                display::display_error(&e.to_string(), display_cfg.color);
                (false, Some(e.to_string()))
            }
        };

        if let (Some(history), Some(phrase)) = (history.as_deref_mut(), endpoint.phrase()) {
            if let Err(e) = history.record(phrase, endpoint.path(), success, Some(duration_ms)) {
                debug!(target: "history", "could not record entry: {}", e);
            }
        }

        report.push(ProbeOutcome {
            request,
            phrase: endpoint.phrase().map(str::to_string),
            success,
            duration_ms,
            error,
        });
        println!();
    }

    report
}

/// Print the pass/fail summary the way the sweep log ends.
pub fn print_summary(report: &SmokeReport, color: bool) {
    let line = format!(
        "{} probes: {} passed, {} failed",
        report.outcomes.len(),
        report.passed(),
        report.failed()
    );

    if !color {
        println!("{}", line);
    } else if report.is_success() {
        println!("{}", line.green());
    } else {
        println!("{}", line.red());
    }

    for outcome in report.outcomes.iter().filter(|o| !o.success) {
        let detail = format!(
            "  FAILED {} ({} ms): {}",
            outcome.request,
            outcome.duration_ms,
            outcome.error.as_deref().unwrap_or("unknown error")
        );
        if color {
            println!("{}", detail.as_str().red());
        } else {
            println!("{}", detail);
        }
    }
}
