use clap::{Parser, Subcommand};
use site_ops::dashboard::{self, projects};
use site_ops::{deploy, output};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "site-ops")]
#[command(about = "Deploy static site builds and render media QA dashboards")]
#[command(long_about = "\
Deploy static site builds and render media QA dashboards

deploy reads its settings from the environment (a .env file in the current
directory is loaded first; variables already set take precedence):

  UPLOAD_HOST, UPLOAD_USER, UPLOAD_PORT   remote endpoint (required)
  UPLOAD_KEY_PATH                         private key (recommended)
  UPLOAD_PASS                             password fallback, needs sshpass
  REMOTE_DIR                              remote path; or set DOMAIN to use
                                          /home/$UPLOAD_USER/domains/$DOMAIN/public_html/
  CF_API_KEY, CF_EMAIL, CF_ZONE_ID        purge the Cloudflare cache afterwards

dashboard reads packages/<project>/i18n/<lang>/media.json under --root and
writes qa-dashboard.html there.

Set SITE_OPS_LOG=debug to see every command that runs.")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Zip a build directory, upload it over SSH and unpack it remotely
    Deploy {
        /// Directory to deploy [default: ./dist]
        dir: Option<PathBuf>,
    },
    /// Render the media QA dashboard
    Dashboard {
        /// Workspace root containing packages/
        #[arg(long, default_value = ".")]
        root: PathBuf,

        /// Output file [default: <root>/qa-dashboard.html]
        #[arg(long)]
        output: Option<PathBuf>,

        /// Project list (TOML) [default: <root>/qa-projects.toml, else built-in]
        #[arg(long)]
        projects: Option<PathBuf>,
    },
    /// Print the built-in project list as TOML
    GenConfig,
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = match cli.command {
        Command::Deploy { dir } => run_deploy(dir.as_deref()),
        Command::Dashboard {
            root,
            output,
            projects,
        } => run_dashboard(&root, output, projects.as_deref()),
        Command::GenConfig => projects::stock_projects_toml()
            .map(|toml| print!("{toml}"))
            .map_err(Into::into),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", output::format_error(e.as_ref()));
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_env("SITE_OPS_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run_deploy(dir: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let work_dir = std::env::current_dir()?;
    match dotenvy::from_path(work_dir.join(".env")) {
        Ok(()) => tracing::debug!("loaded .env"),
        Err(e) if e.not_found() => {}
        Err(e) => return Err(e.into()),
    }

    let config = deploy::DeployConfig::from_env(&work_dir, dir)?;
    deploy::deploy(&config, output::print_deploy_event)?;
    Ok(())
}

fn run_dashboard(
    root: &Path,
    output_path: Option<PathBuf>,
    projects_path: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let projects = match projects_path {
        Some(path) => projects::load_projects(path)?,
        None => projects::load_projects_or_default(&root.join(dashboard::PROJECTS_FILE))?,
    };
    let output_path = output_path.unwrap_or_else(|| root.join(dashboard::OUTPUT_FILE));

    let report = dashboard::generate(root, &output_path, &projects, &dashboard::timestamp_now())?;
    output::print_dashboard_report(&report);
    Ok(())
}
