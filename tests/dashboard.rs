//! End-to-end dashboard generation against the fixture packages.
//!
//! `fixtures/packages/` holds manifests for `todo` (en, es) and `jesus` (es).
//! Every other language of the built-in project list has no manifest.

use site_ops::dashboard::{self, Availability, ProjectsConfig};
use std::path::Path;
use tempfile::TempDir;

fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());
        if src_path.is_dir() {
            std::fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

/// The HTML between a project's opening `<section ... id="...">` and the
/// next section.
fn project_section<'a>(html: &'a str, id: &str) -> &'a str {
    let marker = format!(r#"id="{id}""#);
    let start = html.find(&marker).unwrap_or_else(|| panic!("no section {id}"));
    let rest = &html[start..];
    let end = rest.find("</section>").unwrap();
    &rest[..end]
}

fn generate(root: &Path) -> (String, dashboard::DashboardReport) {
    let output = root.join(dashboard::OUTPUT_FILE);
    let report = dashboard::generate(
        root,
        &output,
        &ProjectsConfig::default(),
        "2026-10-18T00:00:00.000Z",
    )
    .unwrap();
    (std::fs::read_to_string(&output).unwrap(), report)
}

#[test]
fn every_project_is_linked_from_the_toc() {
    let tmp = setup_fixtures();
    let (html, _) = generate(tmp.path());
    for id in ["eluno", "todo", "sanacion", "jesus"] {
        assert!(html.contains(&format!(r##"href="#{id}""##)), "toc entry for {id}");
        assert!(html.contains(&format!(r#"id="{id}""#)), "section for {id}");
    }
    assert!(html.contains("2026-10-18T00:00:00.000Z"));
}

#[test]
fn todo_lists_eleven_chapters_per_language_with_manifest() {
    let tmp = setup_fixtures();
    let (html, _) = generate(tmp.path());
    let todo = project_section(&html, "todo");
    // en and es have manifests, pt doesn't.
    assert_eq!(todo.matches(r#"class="chapter-row""#).count(), 22);
    assert!(todo.contains("Configuration not found for Português"));
}

#[test]
fn english_root_language_has_no_prefix() {
    let tmp = setup_fixtures();
    let (html, _) = generate(tmp.path());
    let todo = project_section(&html, "todo");
    assert!(todo.contains(r#"href="https://todo.eluno.org/ch1/""#));
    assert!(todo.contains(r#"href="https://todo.eluno.org/es/ch11/""#));
}

#[test]
fn download_links_use_static_base() {
    let tmp = setup_fixtures();
    let (html, _) = generate(tmp.path());
    assert!(html.contains(
        r#"href="https://static.eluno.org/todo/audio/en/the-law-of-one-complete.mp3""#
    ));
    assert!(html.contains(r#"href="https://static.eluno.org/todo/pdf/es/cap1.pdf""#));
    assert!(html.contains(r#"href="https://static.eluno.org/jesus/pdf/es/el-camino-del-amor.pdf""#));
}

#[test]
fn projects_without_any_manifest_still_render() {
    let tmp = setup_fixtures();
    let (html, report) = generate(tmp.path());
    let eluno = project_section(&html, "eluno");
    assert_eq!(eluno.matches("Configuration not found").count(), 3);
    assert!(!eluno.contains("<table"));

    let missing = report
        .languages
        .iter()
        .filter(|l| matches!(l.availability, Availability::Missing { .. }))
        .count();
    // eluno 3 + todo/pt + sanacion 2 + jesus en/pt
    assert_eq!(missing, 8);
}

#[test]
fn report_counts_fixture_resources() {
    let tmp = setup_fixtures();
    let (_, report) = generate(tmp.path());
    let todo_en = report
        .languages
        .iter()
        .find(|l| l.project_id == "todo" && l.language == "en")
        .unwrap();
    assert_eq!(
        todo_en.availability,
        Availability::Found {
            chapters: 11,
            audio: 3,
            pdf: 3,
            full_audio: true,
            full_pdf: true,
        }
    );
}

#[test]
fn malformed_manifest_fails_the_run() {
    let tmp = setup_fixtures();
    std::fs::write(
        tmp.path().join("packages/jesus/i18n/es/media.json"),
        r#"{"all": "#,
    )
    .unwrap();
    let output = tmp.path().join(dashboard::OUTPUT_FILE);
    let err = dashboard::generate(tmp.path(), &output, &ProjectsConfig::default(), "ts")
        .unwrap_err();
    assert!(err.to_string().contains("packages/jesus/i18n/es/media.json"));
    assert!(!output.exists());
}
