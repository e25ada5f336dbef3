//! ssh/scp command construction.
//!
//! Builds [`CommandSpec`]s for the remote half of a deploy. Key auth passes
//! `-i KEY`; password auth wraps the program in `sshpass -e` and hands the
//! secret over in the child's `SSHPASS` variable.

use super::config::{AuthMethod, DeployConfig, ARCHIVE_NAME};
use super::runner::CommandSpec;
use std::path::Path;

const HOST_KEY_OPTION: &str = "StrictHostKeyChecking=accept-new";

/// Quote a string for a POSIX shell using single quotes.
pub fn shell_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}

/// Builder for commands against one remote endpoint.
pub struct RemoteHost<'a> {
    config: &'a DeployConfig,
}

impl<'a> RemoteHost<'a> {
    pub fn new(config: &'a DeployConfig) -> Self {
        Self { config }
    }

    /// `ssh -p PORT [-i KEY] -o ... user@host "<command>"`
    pub fn ssh(&self, remote_command: &str) -> CommandSpec {
        self.wrap("ssh", "-p")
            .arg(self.config.destination())
            .arg(remote_command)
    }

    /// `scp -P PORT [-i KEY] -o ... <local> user@host:<remote>`
    pub fn scp_upload(&self, local: &Path, remote: &str) -> CommandSpec {
        self.wrap("scp", "-P")
            .arg(local.display().to_string())
            .arg(format!("{}:{}", self.config.destination(), remote))
    }

    pub fn mkdir(&self) -> CommandSpec {
        self.ssh(&format!("mkdir -p {}", shell_quote(&self.config.remote_dir)))
    }

    pub fn upload_archive(&self) -> CommandSpec {
        self.scp_upload(
            &self.config.archive_path(),
            &self.config.remote_archive_path(),
        )
    }

    /// Unpack over existing files, then drop the uploaded archive.
    pub fn extract_archive(&self) -> CommandSpec {
        self.ssh(&format!(
            "cd {dir} && unzip -o {ARCHIVE_NAME} && rm {ARCHIVE_NAME}",
            dir = shell_quote(&self.config.remote_dir)
        ))
    }

    /// `chmod 644` on HTML files at the top level and one directory deep.
    /// Missing matches are swallowed on the remote side.
    pub fn fix_permissions(&self) -> CommandSpec {
        let dir = shell_quote(&with_trailing_slash(&self.config.remote_dir));
        self.ssh(&format!(
            "chmod 644 {dir}*.html {dir}*/*.html 2>/dev/null || true"
        ))
    }

    fn wrap(&self, program: &str, port_flag: &str) -> CommandSpec {
        let base = match &self.config.auth {
            AuthMethod::KeyFile(_) => CommandSpec::new(program),
            AuthMethod::Password(secret) => CommandSpec::new("sshpass")
                .env("SSHPASS", secret.as_str())
                .args(["-e", program]),
        };
        let base = base.args([port_flag.to_string(), self.config.port.to_string()]);
        let base = match &self.config.auth {
            AuthMethod::KeyFile(key) => base.arg("-i").arg(key.display().to_string()),
            AuthMethod::Password(_) => base,
        };
        base.args(["-o", HOST_KEY_OPTION])
    }
}

fn with_trailing_slash(dir: &str) -> String {
    if dir.ends_with('/') {
        dir.to_string()
    } else {
        format!("{dir}/")
    }
}
