//! Deploy orchestrator.
//!
//! Ships a local build directory to a shared host in six sequential steps:
//!
//! ```text
//! 1. archive       dist/ → ./deploy.zip            (fatal on failure)
//! 2. remote dir    ssh mkdir -p                    (fatal)
//! 3. upload        scp deploy.zip                  (fatal)
//! 4. extract       ssh unzip -o && rm deploy.zip   (fatal)
//! 5. permissions   ssh chmod 644 *.html */*.html   (best effort)
//! 6. purge         Cloudflare purge_everything     (best effort, optional)
//! ```
//!
//! Each step produces a [`StepOutcome`]. A `Fatal` outcome stops the run;
//! warnings and skips are collected into the [`DeployReport`]. Whatever
//! happens, the local archive is removed before [`deploy_with`] returns.
//!
//! Configuration is validated up front by [`DeployConfig::from_lookup`], so
//! an incomplete environment never gets as far as packaging or ssh.

pub mod archive;
pub mod config;
pub mod purge;
pub mod remote;
pub mod runner;

pub use archive::{ArchiveError, ArchiveSummary};
pub use config::{AuthMethod, CdnCredentials, ConfigError, DeployConfig};
pub use purge::{CachePurger, CloudflarePurger, PurgeError};
pub use runner::{CommandRunner, CommandSpec, RunnerError, SystemRunner};

use remote::RemoteHost;
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DeployError {
    #[error("packaging failed: {0}")]
    Archive(#[from] ArchiveError),
    #[error("{step} failed: {message}")]
    Command { step: Step, message: String },
    #[error("{step} failed: {source}")]
    Spawn {
        step: Step,
        #[source]
        source: RunnerError,
    },
}

/// The stages of a deploy, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Archive,
    EnsureRemoteDir,
    Upload,
    Extract,
    FixPermissions,
    PurgeCache,
}

impl Step {
    pub const ALL: [Step; 6] = [
        Step::Archive,
        Step::EnsureRemoteDir,
        Step::Upload,
        Step::Extract,
        Step::FixPermissions,
        Step::PurgeCache,
    ];

    /// Whether a failure of this step aborts the deploy. Permissions and
    /// cache purge don't decide whether the new content is live.
    pub fn is_required(self) -> bool {
        !matches!(self, Step::FixPermissions | Step::PurgeCache)
    }

    pub fn label(self) -> &'static str {
        match self {
            Step::Archive => "archive",
            Step::EnsureRemoteDir => "ensure remote directory",
            Step::Upload => "upload",
            Step::Extract => "extract",
            Step::FixPermissions => "fix permissions",
            Step::PurgeCache => "purge CDN cache",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Result of a single step, tagged with how the orchestrator must react.
#[derive(Debug)]
pub enum StepOutcome {
    /// Step succeeded, with an optional detail line.
    Ok(Option<String>),
    /// Best-effort step failed; the run continues.
    Warning(String),
    /// Step intentionally not run.
    Skipped(String),
    /// Required step failed; the run stops.
    Fatal(DeployError),
}

/// Progress notifications for the caller, in order of occurrence.
#[derive(Debug)]
pub enum DeployEvent<'a> {
    Started { config: &'a DeployConfig },
    ConfigWarning(&'a str),
    StepStarted(Step),
    StepFinished(Step, &'a StepOutcome),
    CleanupFailed(&'a std::io::Error),
    Finished(&'a DeployReport),
}

/// Summary of a deploy that ran to completion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeployReport {
    pub archive: Option<ArchiveSummary>,
    pub completed: Vec<Step>,
    pub warnings: Vec<String>,
    pub skipped: Vec<String>,
}

/// Deploy with real `ssh`/`scp` and the Cloudflare API.
pub fn deploy<F>(config: &DeployConfig, on_event: F) -> Result<DeployReport, DeployError>
where
    F: FnMut(&DeployEvent<'_>),
{
    deploy_with(&SystemRunner, &CloudflarePurger::new(), config, on_event)
}

/// Deploy through the given runner and purger (allows testing with mocks).
///
/// The local archive is removed after the steps run, on success and on
/// failure alike. A failed removal is reported as an event and never
/// replaces the step error.
pub fn deploy_with<R, P, F>(
    runner: &R,
    purger: &P,
    config: &DeployConfig,
    mut on_event: F,
) -> Result<DeployReport, DeployError>
where
    R: CommandRunner,
    P: CachePurger,
    F: FnMut(&DeployEvent<'_>),
{
    on_event(&DeployEvent::Started { config });
    for warning in config.warnings() {
        on_event(&DeployEvent::ConfigWarning(&warning));
    }

    let result = run_steps(runner, purger, config, &mut on_event);

    let archive_path = config.archive_path();
    match archive::remove_archive(&archive_path) {
        Ok(removed) => {
            tracing::debug!(archive = %archive_path.display(), removed, "cleanup");
        }
        Err(e) => {
            tracing::warn!(archive = %archive_path.display(), error = %e, "could not remove archive");
            on_event(&DeployEvent::CleanupFailed(&e));
        }
    }

    if let Ok(report) = &result {
        on_event(&DeployEvent::Finished(report));
    }
    result
}

fn run_steps<R, P, F>(
    runner: &R,
    purger: &P,
    config: &DeployConfig,
    on_event: &mut F,
) -> Result<DeployReport, DeployError>
where
    R: CommandRunner,
    P: CachePurger,
    F: FnMut(&DeployEvent<'_>),
{
    let remote = RemoteHost::new(config);
    let mut report = DeployReport::default();

    for step in Step::ALL {
        on_event(&DeployEvent::StepStarted(step));
        let outcome = match step {
            Step::Archive => archive_step(config, &mut report),
            Step::EnsureRemoteDir => command_step(runner, step, &remote.mkdir()),
            Step::Upload => command_step(runner, step, &remote.upload_archive()),
            Step::Extract => command_step(runner, step, &remote.extract_archive()),
            Step::FixPermissions => command_step(runner, step, &remote.fix_permissions()),
            Step::PurgeCache => purge_step(purger, config),
        };
        on_event(&DeployEvent::StepFinished(step, &outcome));

        match outcome {
            StepOutcome::Ok(_) => report.completed.push(step),
            StepOutcome::Warning(message) => {
                tracing::warn!(%step, %message, "best-effort step failed");
                report.warnings.push(format!("{step}: {message}"));
            }
            StepOutcome::Skipped(reason) => report.skipped.push(format!("{step}: {reason}")),
            StepOutcome::Fatal(err) => return Err(err),
        }
    }

    Ok(report)
}

fn archive_step(config: &DeployConfig, report: &mut DeployReport) -> StepOutcome {
    match archive::create_archive(&config.local_dir, &config.archive_path()) {
        Ok(summary) => {
            let detail = format!(
                "{} files from {} ({} bytes)",
                summary.files,
                config.local_dir.display(),
                summary.bytes
            );
            report.archive = Some(summary);
            StepOutcome::Ok(Some(detail))
        }
        Err(e) => StepOutcome::Fatal(e.into()),
    }
}

/// Run one remote command and classify the result by the step's policy.
fn command_step<R: CommandRunner>(runner: &R, step: Step, spec: &CommandSpec) -> StepOutcome {
    let failure = match runner.run(spec) {
        Ok(output) if output.success() => return StepOutcome::Ok(None),
        Ok(output) => DeployError::Command {
            step,
            message: output.failure_message(),
        },
        Err(source) => DeployError::Spawn { step, source },
    };

    if step.is_required() {
        StepOutcome::Fatal(failure)
    } else {
        StepOutcome::Warning(failure.to_string())
    }
}

fn purge_step<P: CachePurger>(purger: &P, config: &DeployConfig) -> StepOutcome {
    let Some(credentials) = &config.cdn else {
        return StepOutcome::Skipped("CF_API_KEY/CF_EMAIL/CF_ZONE_ID not set".to_string());
    };
    match purger.purge_everything(credentials) {
        Ok(response) if response.success => StepOutcome::Ok(Some("cache purged".to_string())),
        Ok(response) => StepOutcome::Warning(format!(
            "Cloudflare rejected the purge: {}",
            serde_json::Value::Array(response.errors)
        )),
        Err(e) => StepOutcome::Warning(e.to_string()),
    }
}
