//! CLI output formatting for both tools.
//!
//! Each tool has a `format_*` function returning `Vec<String>` for
//! testability and a `print_*` wrapper that writes to the terminal. Format
//! functions are pure: no I/O, no side effects.
//!
//! # Output Format
//!
//! ## Deploy
//!
//! ```text
//! ==> Deploying /site/dist → alice@example.net:/home/alice/domains/example.com/public_html/
//!     Auth: key file /home/alice/.ssh/id_ed25519
//!     CDN purge: enabled (zone 0123abcd)
//! ==> [1/6] archive
//!     ok: 42 files from /site/dist (183204 bytes)
//! ==> [2/6] ensure remote directory
//!     ok
//! ...
//! ==> [6/6] purge CDN cache
//!     skipped: CF_API_KEY/CF_EMAIL/CF_ZONE_ID not set
//! ==> Deployment complete (1 warning)
//! ```
//!
//! Warnings go to stderr prefixed with `warning:`.
//!
//! ## Dashboard
//!
//! ```text
//! todo/en  English      audio 11/11  pdf 11/11  full book: audio, pdf
//! todo/pt  Português    media.json not found (packages/todo/i18n/pt/media.json)
//!
//! Dashboard written to /repo/qa-dashboard.html (1 language without manifest)
//! ```

use crate::dashboard::{Availability, DashboardReport};
use crate::deploy::{AuthMethod, DeployEvent, Step, StepOutcome};

// ============================================================================
// Shared helpers
// ============================================================================

fn plural(count: usize, word: &str) -> String {
    if count == 1 {
        format!("{count} {word}")
    } else {
        format!("{count} {word}s")
    }
}

fn step_position(step: Step) -> usize {
    Step::ALL.iter().position(|s| *s == step).unwrap_or(0) + 1
}

/// `error: <message>`, as printed for fatal errors.
pub fn format_error(error: &dyn std::error::Error) -> String {
    format!("error: {error}")
}

pub fn format_warning(message: &str) -> String {
    format!("warning: {message}")
}

// ============================================================================
// Deploy
// ============================================================================

/// Whether an event belongs on stderr.
pub fn is_warning_event(event: &DeployEvent<'_>) -> bool {
    matches!(
        event,
        DeployEvent::ConfigWarning(_)
            | DeployEvent::CleanupFailed(_)
            | DeployEvent::StepFinished(_, StepOutcome::Warning(_))
    )
}

pub fn format_deploy_event(event: &DeployEvent<'_>) -> Vec<String> {
    match event {
        DeployEvent::Started { config } => {
            let auth = match &config.auth {
                AuthMethod::KeyFile(path) => format!("key file {}", path.display()),
                AuthMethod::Password(_) => "password (sshpass)".to_string(),
            };
            let cdn = match &config.cdn {
                Some(cdn) => format!("enabled (zone {})", cdn.zone_id),
                None => "disabled".to_string(),
            };
            vec![
                format!(
                    "==> Deploying {} → {}:{}",
                    config.local_dir.display(),
                    config.destination(),
                    config.remote_dir
                ),
                format!("    Auth: {auth}"),
                format!("    CDN purge: {cdn}"),
            ]
        }
        DeployEvent::ConfigWarning(message) => vec![format_warning(message)],
        DeployEvent::StepStarted(step) => {
            vec![format!(
                "==> [{}/{}] {}",
                step_position(*step),
                Step::ALL.len(),
                step
            )]
        }
        DeployEvent::StepFinished(step, outcome) => match outcome {
            StepOutcome::Ok(None) => vec!["    ok".to_string()],
            StepOutcome::Ok(Some(detail)) => vec![format!("    ok: {detail}")],
            StepOutcome::Warning(message) => {
                vec![format_warning(&format!("{step} failed (non-blocking): {message}"))]
            }
            StepOutcome::Skipped(reason) => vec![format!("    skipped: {reason}")],
            // The error itself is reported once, by the caller.
            StepOutcome::Fatal(_) => vec!["    failed".to_string()],
        },
        DeployEvent::CleanupFailed(err) => {
            vec![format_warning(&format!("could not remove local archive: {err}"))]
        }
        DeployEvent::Finished(report) => {
            if report.warnings.is_empty() {
                vec!["==> Deployment complete".to_string()]
            } else {
                vec![format!(
                    "==> Deployment complete ({})",
                    plural(report.warnings.len(), "warning")
                )]
            }
        }
    }
}

pub fn print_deploy_event(event: &DeployEvent<'_>) {
    let warning = is_warning_event(event);
    for line in format_deploy_event(event) {
        if warning {
            eprintln!("{line}");
        } else {
            println!("{line}");
        }
    }
}

// ============================================================================
// Dashboard
// ============================================================================

pub fn format_dashboard_report(report: &DashboardReport) -> Vec<String> {
    let mut lines = Vec::new();
    let label_width = report
        .languages
        .iter()
        .map(|l| l.label.chars().count())
        .max()
        .unwrap_or(0);

    for status in &report.languages {
        let key = format!("{}/{}", status.project_id, status.language);
        let padding = " ".repeat(label_width - status.label.chars().count());
        let detail = match &status.availability {
            Availability::Missing { manifest } => {
                format!("media.json not found ({})", manifest.display())
            }
            Availability::Found {
                chapters,
                audio,
                pdf,
                full_audio,
                full_pdf,
            } => {
                let full: Vec<&str> = [(*full_audio, "audio"), (*full_pdf, "pdf")]
                    .into_iter()
                    .filter_map(|(present, name)| present.then_some(name))
                    .collect();
                let full = if full.is_empty() {
                    "none".to_string()
                } else {
                    full.join(", ")
                };
                format!("audio {audio}/{chapters}  pdf {pdf}/{chapters}  full book: {full}")
            }
        };
        lines.push(format!("{key}  {}{padding}  {detail}", status.label));
    }

    let missing = report
        .languages
        .iter()
        .filter(|l| matches!(l.availability, Availability::Missing { .. }))
        .count();
    lines.push(String::new());
    if missing == 0 {
        lines.push(format!("Dashboard written to {}", report.output.display()));
    } else {
        lines.push(format!(
            "Dashboard written to {} ({} without manifest)",
            report.output.display(),
            plural(missing, "language")
        ));
    }
    lines
}

pub fn print_dashboard_report(report: &DashboardReport) {
    for line in format_dashboard_report(report) {
        println!("{line}");
    }
}

// ============================================================================
// Tests
// ============================================================================
