//! Per-language media manifests (`media.json`).
//!
//! Each book package records which downloads exist for a language:
//!
//! ```json
//! {
//!   "all": { "audio": "/audio/es/libro-completo.mp3", "pdf": "/pdf/es/libro.pdf" },
//!   "1":   { "audio": "/audio/es/ch1.mp3", "pdf": "/pdf/es/ch1.pdf" },
//!   "2":   { "pdf": "/pdf/es/ch2.pdf" }
//! }
//! ```
//!
//! Keys are chapter numbers as strings plus the reserved `all` key for
//! whole-book downloads. Missing keys, `null` entries, and missing or empty
//! fields all mean the resource doesn't exist yet. Keys that are neither
//! (including `"03"` or `" 3"`) are ignored, as are extra fields inside an
//! entry. Anything that isn't an object of objects is a parse error.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Reserved manifest key for whole-book resources.
pub const FULL_BOOK_KEY: &str = "all";

#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed manifest {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Downloads available for one chapter (or the whole book).
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct MediaEntry {
    #[serde(default)]
    pub audio: Option<String>,
    #[serde(default)]
    pub pdf: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MediaManifest {
    pub full_book: MediaEntry,
    pub chapters: BTreeMap<u32, MediaEntry>,
}

impl MediaEntry {
    fn drop_empty_paths(self) -> Self {
        let present = |path: Option<String>| path.filter(|p| !p.trim().is_empty());
        Self {
            audio: present(self.audio),
            pdf: present(self.pdf),
        }
    }
}

impl MediaManifest {
    /// Parse manifest JSON. Only structural validity is checked.
    pub fn parse(content: &str) -> Result<Self, serde_json::Error> {
        let raw: BTreeMap<String, Option<MediaEntry>> = serde_json::from_str(content)?;
        let mut manifest = MediaManifest::default();
        for (key, entry) in raw {
            let entry = entry.map(MediaEntry::drop_empty_paths).unwrap_or_default();
            if key == FULL_BOOK_KEY {
                manifest.full_book = entry;
            } else if let Some(chapter) = chapter_number(&key) {
                manifest.chapters.insert(chapter, entry);
            } else {
                tracing::debug!(%key, "ignoring manifest key");
            }
        }
        Ok(manifest)
    }

    /// Entry for a chapter; absent chapters have no resources.
    pub fn chapter(&self, chapter: u32) -> MediaEntry {
        self.chapters.get(&chapter).cloned().unwrap_or_default()
    }
}

/// Chapter keys are canonical decimal numbers; `"3"` matches, `"03"` doesn't.
fn chapter_number(key: &str) -> Option<u32> {
    key.parse::<u32>().ok().filter(|n| n.to_string() == key)
}

/// `<root>/packages/<project>/i18n/<lang>/media.json`
pub fn manifest_path(root: &Path, project_id: &str, lang_code: &str) -> PathBuf {
    root.join("packages")
        .join(project_id)
        .join("i18n")
        .join(lang_code)
        .join("media.json")
}

/// Load a manifest. `Ok(None)` when the file doesn't exist; read failures
/// other than "not found" and malformed JSON are errors.
pub fn load_manifest(path: &Path) -> Result<Option<MediaManifest>, ManifestError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(ManifestError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    MediaManifest::parse(&content)
        .map(Some)
        .map_err(|source| ManifestError::Parse {
            path: path.to_path_buf(),
            source,
        })
}
