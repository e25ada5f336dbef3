//! Deploy configuration resolved from environment variables.
//!
//! The orchestrator never reads the process environment itself. Instead
//! [`DeployConfig::from_lookup`] receives a lookup function once at startup
//! and produces an immutable value object that is passed to every step.
//!
//! ## Variables
//!
//! ```text
//! UPLOAD_HOST, UPLOAD_USER, UPLOAD_PORT   remote endpoint (required)
//! UPLOAD_KEY_PATH                         private key (preferred auth)
//! UPLOAD_PASS                             password fallback (via sshpass)
//! REMOTE_DIR                              explicit remote path
//! DOMAIN                                  derives REMOTE_DIR when unset
//! CF_API_KEY, CF_EMAIL, CF_ZONE_ID        Cloudflare purge, all-or-nothing
//! ```
//!
//! Empty values count as unset, so `UPLOAD_PASS=` in a `.env` file does not
//! enable password auth.

use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the archive, both locally (in the working directory) and remotely.
pub const ARCHIVE_NAME: &str = "deploy.zip";

/// Local build output used when no directory argument is given.
pub const DEFAULT_LOCAL_DIR: &str = "dist";

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error(
        "missing SSH credentials: {0} is not set (UPLOAD_HOST, UPLOAD_USER and UPLOAD_PORT are required)"
    )]
    MissingEndpoint(&'static str),
    #[error("UPLOAD_PORT must be a port number, got {0:?}")]
    InvalidPort(String),
    #[error("no SSH auth method configured: set UPLOAD_KEY_PATH (recommended) or UPLOAD_PASS")]
    NoAuthMethod,
    #[error("REMOTE_DIR not set and cannot be derived (set REMOTE_DIR or DOMAIN)")]
    MissingRemoteDir,
}

/// How ssh and scp authenticate against the remote host.
#[derive(Clone, PartialEq, Eq)]
pub enum AuthMethod {
    KeyFile(PathBuf),
    Password(String),
}

impl fmt::Debug for AuthMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthMethod::KeyFile(path) => f.debug_tuple("KeyFile").field(path).finish(),
            AuthMethod::Password(_) => f.write_str("Password(***)"),
        }
    }
}

/// Cloudflare credentials. Only constructed when all three values are present.
#[derive(Clone, PartialEq, Eq)]
pub struct CdnCredentials {
    pub api_key: String,
    pub email: String,
    pub zone_id: String,
}

impl fmt::Debug for CdnCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CdnCredentials")
            .field("api_key", &"***")
            .field("email", &self.email)
            .field("zone_id", &self.zone_id)
            .finish()
    }
}

/// Everything one deploy run needs, resolved up front.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployConfig {
    pub host: String,
    pub user: String,
    pub port: u16,
    pub auth: AuthMethod,
    /// Absolute destination on the remote host.
    pub remote_dir: String,
    /// Directory whose contents get deployed.
    pub local_dir: PathBuf,
    /// Directory the local archive is written into.
    pub work_dir: PathBuf,
    pub cdn: Option<CdnCredentials>,
}

impl DeployConfig {
    /// Resolve configuration from the real process environment.
    pub fn from_env(work_dir: &Path, local_dir: Option<&Path>) -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok(), work_dir, local_dir)
    }

    /// Resolve configuration through `lookup`, validating before anything
    /// touches the filesystem or network.
    ///
    /// Validation order: endpoint, auth method, remote directory.
    pub fn from_lookup<F>(
        lookup: F,
        work_dir: &Path,
        local_dir: Option<&Path>,
    ) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let host = get("UPLOAD_HOST").ok_or(ConfigError::MissingEndpoint("UPLOAD_HOST"))?;
        let user = get("UPLOAD_USER").ok_or(ConfigError::MissingEndpoint("UPLOAD_USER"))?;
        let raw_port = get("UPLOAD_PORT").ok_or(ConfigError::MissingEndpoint("UPLOAD_PORT"))?;
        let port = raw_port
            .trim()
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort(raw_port.clone()))?;

        let auth = match (get("UPLOAD_KEY_PATH"), get("UPLOAD_PASS")) {
            (Some(key), _) => AuthMethod::KeyFile(PathBuf::from(key)),
            (None, Some(pass)) => AuthMethod::Password(pass),
            (None, None) => return Err(ConfigError::NoAuthMethod),
        };

        let remote_dir = match (get("REMOTE_DIR"), get("DOMAIN")) {
            (Some(dir), _) => dir,
            (None, Some(domain)) => derive_remote_dir(&user, &domain),
            (None, None) => return Err(ConfigError::MissingRemoteDir),
        };

        let cdn = match (get("CF_API_KEY"), get("CF_EMAIL"), get("CF_ZONE_ID")) {
            (Some(api_key), Some(email), Some(zone_id)) => Some(CdnCredentials {
                api_key,
                email,
                zone_id,
            }),
            _ => None,
        };

        let local_dir = match local_dir {
            Some(dir) if dir.is_absolute() => dir.to_path_buf(),
            Some(dir) => work_dir.join(dir),
            None => work_dir.join(DEFAULT_LOCAL_DIR),
        };

        Ok(Self {
            host,
            user,
            port,
            auth,
            remote_dir,
            local_dir,
            work_dir: work_dir.to_path_buf(),
            cdn,
        })
    }

    /// Non-fatal configuration concerns, reported before the run starts.
    pub fn warnings(&self) -> Vec<String> {
        match self.auth {
            AuthMethod::Password(_) => vec![
                "using password auth (sshpass); migrate to SSH keys: set UPLOAD_KEY_PATH and remove UPLOAD_PASS"
                    .to_string(),
            ],
            AuthMethod::KeyFile(_) => Vec::new(),
        }
    }

    /// `user@host` as ssh expects it.
    pub fn destination(&self) -> String {
        format!("{}@{}", self.user, self.host)
    }

    /// Local path of the transient archive.
    pub fn archive_path(&self) -> PathBuf {
        self.work_dir.join(ARCHIVE_NAME)
    }

    /// Remote path of the uploaded archive.
    pub fn remote_archive_path(&self) -> String {
        if self.remote_dir.ends_with('/') {
            format!("{}{}", self.remote_dir, ARCHIVE_NAME)
        } else {
            format!("{}/{}", self.remote_dir, ARCHIVE_NAME)
        }
    }
}

/// Hosting-panel layout: `/home/{user}/domains/{domain}/public_html/`.
pub fn derive_remote_dir(user: &str, domain: &str) -> String {
    format!("/home/{user}/domains/{domain}/public_html/")
}
