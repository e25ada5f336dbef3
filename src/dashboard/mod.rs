//! QA dashboard generation.
//!
//! Walks every project and language, loads the language's `media.json`, and
//! writes one self-contained HTML page listing, per chapter, the web page,
//! the audio download and the PDF download.
//!
//! ## Inputs
//!
//! ```text
//! <root>/
//! ├── qa-projects.toml                     # optional project list override
//! └── packages/
//!     └── <project>/i18n/<lang>/media.json # one manifest per language
//! ```
//!
//! ## Failure Policy
//!
//! A language without `media.json` is normal: it gets a "configuration not
//! found" notice and generation continues. A manifest that exists but isn't
//! valid JSON aborts the whole run before anything is written.

pub mod manifest;
pub mod projects;
pub mod render;

pub use manifest::{ManifestError, MediaEntry, MediaManifest};
pub use projects::{Language, Project, ProjectsConfig, ProjectsError};

use render::{LanguageSection, ProjectSection};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default output file name, relative to the root.
pub const OUTPUT_FILE: &str = "qa-dashboard.html";

/// Optional project list looked up in the root.
pub const PROJECTS_FILE: &str = "qa-projects.toml";

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error(transparent)]
    Manifest(#[from] ManifestError),
    #[error(transparent)]
    Projects(#[from] ProjectsError),
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Per-language result, for the CLI summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Availability {
    Missing { manifest: PathBuf },
    Found {
        chapters: u32,
        audio: usize,
        pdf: usize,
        full_audio: bool,
        full_pdf: bool,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageStatus {
    pub project_id: String,
    pub language: String,
    pub label: String,
    pub availability: Availability,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardReport {
    pub output: PathBuf,
    pub languages: Vec<LanguageStatus>,
}

/// Render the dashboard for `projects` and write it to `output`,
/// overwriting any previous file.
///
/// All manifests are loaded before the file is touched, so a malformed
/// manifest leaves an existing dashboard intact.
pub fn generate(
    root: &Path,
    output: &Path,
    projects: &ProjectsConfig,
    generated_at: &str,
) -> Result<DashboardReport, DashboardError> {
    let mut sections = Vec::with_capacity(projects.projects.len());
    let mut statuses = Vec::new();

    for project in &projects.projects {
        let mut languages = Vec::with_capacity(project.languages.len());
        for language in &project.languages {
            let path = manifest::manifest_path(root, &project.id, &language.code);
            let manifest = manifest::load_manifest(&path)?;
            if manifest.is_none() {
                tracing::warn!(project = %project.id, lang = %language.code, path = %path.display(), "media manifest not found");
            }
            statuses.push(LanguageStatus {
                project_id: project.id.clone(),
                language: language.code.clone(),
                label: language.label.clone(),
                availability: availability(project, manifest.as_ref(), path),
            });
            languages.push(LanguageSection { language, manifest });
        }
        sections.push(ProjectSection { project, languages });
    }

    let html = render::render_dashboard(&sections, generated_at).into_string();
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| DashboardError::Write {
            path: output.to_path_buf(),
            source,
        })?;
    }
    fs::write(output, html).map_err(|source| DashboardError::Write {
        path: output.to_path_buf(),
        source,
    })?;

    Ok(DashboardReport {
        output: output.to_path_buf(),
        languages: statuses,
    })
}

/// Current UTC time in the footer format (RFC 3339, milliseconds, `Z`).
pub fn timestamp_now() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

fn availability(project: &Project, manifest: Option<&MediaManifest>, path: PathBuf) -> Availability {
    let Some(manifest) = manifest else {
        return Availability::Missing { manifest: path };
    };
    let in_range = |chapter: &&u32| (1..=project.chapters).contains(*chapter);
    let entries: Vec<&MediaEntry> = manifest
        .chapters
        .iter()
        .filter(|(chapter, _)| in_range(chapter))
        .map(|(_, entry)| entry)
        .collect();
    Availability::Found {
        chapters: project.chapters,
        audio: entries.iter().filter(|e| e.audio.is_some()).count(),
        pdf: entries.iter().filter(|e| e.pdf.is_some()).count(),
        full_audio: manifest.full_book.audio.is_some(),
        full_pdf: manifest.full_book.pdf.is_some(),
    }
}
