//! Shared test utilities for the site-ops test suite.
//!
//! Fixture builders for both tools: deploy configurations with key or
//! password auth, a small build directory to package, and dashboard
//! projects/manifests written into a temp root.

use std::collections::HashMap;
use std::path::Path;

use crate::dashboard::{Language, MediaManifest, Project};
use crate::deploy::config::{AuthMethod, DeployConfig};

// =========================================================================
// Deploy fixtures
// =========================================================================

/// Environment lookup backed by a fixed list of variables.
pub fn env_lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> + use<> {
    let map: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

/// Config deploying `<work_dir>/dist` to `alice@example.net:65002` with a key.
pub fn key_config(work_dir: impl AsRef<Path>) -> DeployConfig {
    let work_dir = work_dir.as_ref();
    DeployConfig {
        host: "example.net".into(),
        user: "alice".into(),
        port: 65002,
        auth: AuthMethod::KeyFile("/keys/id_ed25519".into()),
        remote_dir: "/home/alice/domains/example.com/public_html/".into(),
        local_dir: work_dir.join("dist"),
        work_dir: work_dir.to_path_buf(),
        cdn: None,
    }
}

/// Same as [`key_config`] but authenticating with the password `secret`.
pub fn password_config(work_dir: impl AsRef<Path>) -> DeployConfig {
    DeployConfig {
        auth: AuthMethod::Password("secret".into()),
        ..key_config(work_dir)
    }
}

/// Write a three-file static site into `dir`.
pub fn write_site(dir: &Path) {
    for (relative, content) in [
        ("index.html", "<h1>home</h1>"),
        ("ch1/index.html", "<h1>chapter 1</h1>"),
        ("assets/site.css", "body { margin: 0 }"),
    ] {
        let path = dir.join(relative);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }
}

// =========================================================================
// Dashboard fixtures
// =========================================================================

/// Project `proj` with a single Spanish language under `/es`.
pub fn sample_project(chapters: u32) -> Project {
    Project {
        id: "proj".into(),
        name: "Proj - Sample Book".into(),
        domain: "https://proj.example.com".into(),
        static_base: "https://static.example.com/proj".into(),
        chapters,
        languages: vec![Language {
            code: "es".into(),
            label: "Español".into(),
            prefix: "/es".into(),
        }],
    }
}

/// Full-book PDF only; chapter 2 has a PDF, chapter 3 has both.
pub fn sample_manifest() -> MediaManifest {
    MediaManifest::parse(
        r#"{
            "all": {"pdf": "/full/book.pdf"},
            "2": {"pdf": "/ch2.pdf"},
            "3": {"audio": "/ch3/audio.mp3", "pdf": "/ch3/book.pdf"}
        }"#,
    )
    .unwrap()
}

/// Write `content` as the manifest for `project`/`lang` under `root`.
pub fn write_manifest(root: &Path, project: &str, lang: &str, content: &str) {
    let path = crate::dashboard::manifest::manifest_path(root, project, lang);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
}
