//! HTML rendering for the QA dashboard.
//!
//! Uses [maud](https://maud.lambda.xyz/) templates, so project names and
//! manifest paths are escaped automatically. The stylesheet is embedded at
//! compile time from `static/dashboard.css`.

use super::manifest::{MediaEntry, MediaManifest};
use super::projects::{Language, Project};
use maud::{DOCTYPE, Markup, PreEscaped, html};

const CSS: &str = include_str!("../../static/dashboard.css");

/// Everything needed to render one language block.
#[derive(Debug, Clone)]
pub struct LanguageSection<'a> {
    pub language: &'a Language,
    /// `None` when the language has no `media.json`.
    pub manifest: Option<MediaManifest>,
}

#[derive(Debug, Clone)]
pub struct ProjectSection<'a> {
    pub project: &'a Project,
    pub languages: Vec<LanguageSection<'a>>,
}

#[derive(Clone, Copy)]
enum ResourceKind {
    Audio,
    Pdf,
}

impl ResourceKind {
    fn class(self) -> &'static str {
        match self {
            ResourceKind::Audio => "resource-link",
            ResourceKind::Pdf => "resource-link pdf",
        }
    }
}

// ============================================================================
// HTML Components
// ============================================================================

fn base_document(title: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                style { (PreEscaped(CSS)) }
            }
            body {
                div.container {
                    (content)
                }
            }
        }
    }
}

/// A download link, or the neutral marker when the resource is missing.
fn resource(url: Option<String>, kind: ResourceKind, label: &str, missing: &str) -> Markup {
    html! {
        @if let Some(url) = url {
            a class=(kind.class()) href=(url) target="_blank" { (label) }
        } @else {
            span.status-missing { (missing) }
        }
    }
}

fn toc(sections: &[ProjectSection<'_>]) -> Markup {
    html! {
        nav.toc {
            @for section in sections {
                a href={ "#" (section.project.id) } { (section.project.name) }
            }
        }
    }
}

// ============================================================================
// Sections
// ============================================================================

fn render_full_book(project: &Project, entry: &MediaEntry) -> Markup {
    let audio = entry.audio.as_deref().map(|p| project.asset_url(p));
    let pdf = entry.pdf.as_deref().map(|p| project.asset_url(p));
    html! {
        div.full-resources {
            strong { "Full book downloads:" }
            (resource(audio, ResourceKind::Audio, "🔊 Full audiobook (MP3)", "No full audiobook"))
            (resource(pdf, ResourceKind::Pdf, "📄 Full book (PDF)", "No full PDF"))
        }
    }
}

fn render_chapter_row(project: &Project, language: &Language, chapter: u32, entry: &MediaEntry) -> Markup {
    let audio = entry.audio.as_deref().map(|p| project.asset_url(p));
    let pdf = entry.pdf.as_deref().map(|p| project.asset_url(p));
    html! {
        tr.chapter-row data-chapter=(chapter) {
            td { strong { (chapter) } }
            td {
                a href=(project.chapter_url(language, chapter)) target="_blank" { "Open page" }
            }
            td.audio { (resource(audio, ResourceKind::Audio, "🔊 Download MP3", "-")) }
            td.pdf { (resource(pdf, ResourceKind::Pdf, "📄 Download PDF", "-")) }
        }
    }
}

/// One language: heading, landing link, full-book block, chapter table.
/// Chapters are always listed `1..=project.chapters`, whatever the
/// manifest covers.
pub fn render_language(project: &Project, section: &LanguageSection<'_>) -> Markup {
    let language = section.language;
    let Some(manifest) = &section.manifest else {
        return html! {
            p.config-missing { "⚠️ Configuration not found for " (language.label) }
        };
    };

    html! {
        h3 { (language.label) " (" (language.code) ")" }
        p {
            strong { "Landing: " }
            a href=(project.landing_url(language)) target="_blank" { (project.landing_url(language)) }
        }
        @if manifest.full_book.audio.is_some() || manifest.full_book.pdf.is_some() {
            (render_full_book(project, &manifest.full_book))
        }
        table {
            thead {
                tr {
                    th width="8%" { "Ch" }
                    th width="32%" { "Web page" }
                    th width="30%" { "Audio (MP3)" }
                    th width="30%" { "PDF" }
                }
            }
            tbody {
                @for chapter in 1..=project.chapters {
                    (render_chapter_row(project, language, chapter, &manifest.chapter(chapter)))
                }
            }
        }
    }
}

pub fn render_project(section: &ProjectSection<'_>) -> Markup {
    let project = section.project;
    html! {
        section.project id=(project.id) {
            h2 { (project.name) }
            p {
                strong { "Main URL: " }
                a href=(project.domain) target="_blank" { (project.domain) }
            }
            @for language in &section.languages {
                (render_language(project, language))
            }
        }
    }
}

/// The complete dashboard document.
pub fn render_dashboard(sections: &[ProjectSection<'_>], generated_at: &str) -> Markup {
    let content = html! {
        h1 { "🔍 QA Dashboard" }
        p { "Check links and downloadable resources across every book site by hand." }
        (toc(sections))
        @for section in sections {
            (render_project(section))
        }
        footer.generated { "Generated automatically • " (generated_at) }
    };
    base_document("QA Dashboard", content)
}
