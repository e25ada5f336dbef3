//! Project definitions for the QA dashboard.
//!
//! The built-in list covers the eluno.org book sites. A TOML file with the
//! same shape can replace it:
//!
//! ```toml
//! [[project]]
//! id = "todo"
//! name = "TODO - La Ley del Uno"
//! domain = "https://todo.eluno.org"
//! static_base = "https://static.eluno.org/todo"
//! chapters = 11
//!
//! [[project.languages]]
//! code = "en"
//! label = "English"
//! prefix = ""           # served from the site root
//!
//! [[project.languages]]
//! code = "es"
//! label = "Español"
//! prefix = "/es"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProjectsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    TomlSer(#[from] toml::ser::Error),
    #[error("Project validation error: {0}")]
    Validation(String),
}

/// One site language and where its pages live under the domain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Language {
    pub code: String,
    pub label: String,
    /// Path prefix for this language's pages, `""` for the site root.
    #[serde(default)]
    pub prefix: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Project {
    /// Package directory name; also the HTML anchor.
    pub id: String,
    pub name: String,
    /// Base URL of the web pages, no trailing slash.
    pub domain: String,
    /// Base URL that manifest paths are appended to.
    pub static_base: String,
    pub chapters: u32,
    pub languages: Vec<Language>,
}

impl Project {
    /// Landing page for a language: `domain + prefix + "/"`.
    pub fn landing_url(&self, language: &Language) -> String {
        format!("{}{}/", self.domain, language.prefix)
    }

    /// Web page for a chapter: `domain + prefix + "/ch{n}/"`.
    pub fn chapter_url(&self, language: &Language, chapter: u32) -> String {
        format!("{}{}/ch{}/", self.domain, language.prefix, chapter)
    }

    /// Download URL for a manifest path. Plain concatenation, the path is
    /// used verbatim.
    pub fn asset_url(&self, relative: &str) -> String {
        format!("{}{}", self.static_base, relative)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectsConfig {
    #[serde(rename = "project")]
    pub projects: Vec<Project>,
}

impl ProjectsConfig {
    pub fn validate(&self) -> Result<(), ProjectsError> {
        if self.projects.is_empty() {
            return Err(ProjectsError::Validation(
                "at least one [[project]] is required".into(),
            ));
        }
        let mut seen = HashSet::new();
        for project in &self.projects {
            if project.id.trim().is_empty() {
                return Err(ProjectsError::Validation("project id must not be empty".into()));
            }
            if !seen.insert(project.id.as_str()) {
                return Err(ProjectsError::Validation(format!(
                    "duplicate project id '{}'",
                    project.id
                )));
            }
            if project.chapters == 0 {
                return Err(ProjectsError::Validation(format!(
                    "project '{}': chapters must be at least 1",
                    project.id
                )));
            }
            if project.languages.is_empty() {
                return Err(ProjectsError::Validation(format!(
                    "project '{}': at least one language is required",
                    project.id
                )));
            }
            if let Some(lang) = project.languages.iter().find(|l| l.code.trim().is_empty()) {
                return Err(ProjectsError::Validation(format!(
                    "project '{}': language '{}' has an empty code",
                    project.id, lang.label
                )));
            }
        }
        Ok(())
    }

    pub fn from_toml(content: &str) -> Result<Self, ProjectsError> {
        let config: ProjectsConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }
}

fn lang(code: &str, label: &str, prefix: &str) -> Language {
    Language {
        code: code.into(),
        label: label.into(),
        prefix: prefix.into(),
    }
}

fn project(id: &str, name: &str, domain: &str, chapters: u32, languages: Vec<Language>) -> Project {
    Project {
        id: id.into(),
        name: name.into(),
        domain: domain.into(),
        static_base: format!("https://static.eluno.org/{id}"),
        chapters,
        languages,
    }
}

impl Default for ProjectsConfig {
    fn default() -> Self {
        let es = |prefix| lang("es", "Español", prefix);
        let en = |prefix| lang("en", "English", prefix);
        let pt = |prefix| lang("pt", "Português", prefix);
        Self {
            projects: vec![
                project(
                    "eluno",
                    "EL UNO - Reinterpretación Narrativa",
                    "https://eluno.org",
                    16,
                    vec![es("/es"), en("/en"), pt("/pt")],
                ),
                project(
                    "todo",
                    "TODO - La Ley del Uno",
                    "https://todo.eluno.org",
                    11,
                    vec![en(""), es("/es"), pt("/pt")],
                ),
                project(
                    "sanacion",
                    "SANACIÓN - Libro Sanación",
                    "https://sanacion.eluno.org",
                    11,
                    vec![en(""), es("/es")],
                ),
                project(
                    "jesus",
                    "JESÚS - El Camino del Amor",
                    "https://jesus.eluno.org",
                    11,
                    vec![es(""), en("/en"), pt("/pt")],
                ),
            ],
        }
    }
}

/// Load the project list from an explicit file.
pub fn load_projects(path: &Path) -> Result<ProjectsConfig, ProjectsError> {
    let content = fs::read_to_string(path)?;
    ProjectsConfig::from_toml(&content)
}

/// Load `path` if it exists, otherwise fall back to the built-in list.
pub fn load_projects_or_default(path: &Path) -> Result<ProjectsConfig, ProjectsError> {
    if path.exists() {
        load_projects(path)
    } else {
        Ok(ProjectsConfig::default())
    }
}

/// The built-in project list as TOML, ready to be edited and saved.
pub fn stock_projects_toml() -> Result<String, ProjectsError> {
    Ok(toml::to_string_pretty(&ProjectsConfig::default())?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_projects_are_valid() {
        let config = ProjectsConfig::default();
        config.validate().unwrap();
        let ids: Vec<&str> = config.projects.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["eluno", "todo", "sanacion", "jesus"]);
        assert_eq!(config.projects[0].chapters, 16);
    }

    #[test]
    fn jesus_serves_spanish_from_root() {
        let config = ProjectsConfig::default();
        let jesus = config.projects.iter().find(|p| p.id == "jesus").unwrap();
        assert_eq!(jesus.languages[0].code, "es");
        assert_eq!(jesus.languages[0].prefix, "");
    }

    #[test]
    fn stock_toml_parses_back_to_defaults() {
        let toml = stock_projects_toml().unwrap();
        let parsed = ProjectsConfig::from_toml(&toml).unwrap();
        assert_eq!(parsed, ProjectsConfig::default());
    }

    #[test]
    fn parse_minimal_project() {
        let toml = r#"
            [[project]]
            id = "demo"
            name = "Demo"
            domain = "https://demo.example.com"
            static_base = "https://static.example.com/demo"
            chapters = 3

            [[project.languages]]
            code = "en"
            label = "English"
        "#;
        let config = ProjectsConfig::from_toml(toml).unwrap();
        assert_eq!(config.projects.len(), 1);
        assert_eq!(config.projects[0].languages[0].prefix, "");
    }

    #[test]
    fn unknown_key_rejected() {
        let toml = r#"
            [[project]]
            id = "demo"
            name = "Demo"
            domain = "https://demo.example.com"
            static_base = "https://static.example.com/demo"
            chapters = 3
            chapter_count = 3
            languages = []
        "#;
        assert!(matches!(
            ProjectsConfig::from_toml(toml),
            Err(ProjectsError::Toml(_))
        ));
    }

    #[test]
    fn zero_chapters_rejected() {
        let mut config = ProjectsConfig::default();
        config.projects[1].chapters = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("'todo'"));
    }

    #[test]
    fn duplicate_ids_rejected() {
        let mut config = ProjectsConfig::default();
        config.projects[1].id = "eluno".into();
        assert!(config.validate().unwrap_err().to_string().contains("duplicate"));
    }

    #[test]
    fn project_without_languages_rejected() {
        let mut config = ProjectsConfig::default();
        config.projects[2].languages.clear();
        assert!(matches!(
            config.validate(),
            Err(ProjectsError::Validation(_))
        ));
    }

    #[test]
    fn empty_list_rejected() {
        let config = ProjectsConfig { projects: vec![] };
        assert!(config.validate().is_err());
    }

    #[test]
    fn urls_are_concatenated_verbatim() {
        let project = project("proj", "P", "https://example.com", 1, vec![lang("es", "Español", "/es")]);
        let es = &project.languages[0];
        assert_eq!(project.landing_url(es), "https://example.com/es/");
        assert_eq!(project.chapter_url(es, 7), "https://example.com/es/ch7/");
        assert_eq!(
            project.asset_url("/proj/audio.mp3"),
            "https://static.eluno.org/proj/proj/audio.mp3"
        );
        assert_eq!(
            project.asset_url("//double.pdf"),
            "https://static.eluno.org/proj//double.pdf"
        );
    }

    #[test]
    fn load_or_default_without_file() {
        let tmp = TempDir::new().unwrap();
        let config = load_projects_or_default(&tmp.path().join("qa-projects.toml")).unwrap();
        assert_eq!(config, ProjectsConfig::default());
    }

    #[test]
    fn load_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("qa-projects.toml");
        std::fs::write(&path, "[[project]\nid = ").unwrap();
        assert!(matches!(load_projects(&path), Err(ProjectsError::Toml(_))));
    }
}
