//! End-to-end builds through the public `generate::build` API.
//!
//! Each test lays out a small project in a temp directory (or copies
//! `fixtures/site`), builds it, and inspects the written files.

use std::fs;
use std::path::Path;
use studiogen::config::{self, SitePaths};
use studiogen::generate::{self, BuildReport, GenerateError};
use tempfile::TempDir;

const TEMPLATES: &[(&str, &str)] = &[
    (
        "index.html",
        "<title>{{title}}</title>{{header}}{{menu}}<main>\
         {{#each sections}}<section id=\"{{id}}\" class=\"{{background}}\">{{content}}</section>{{/each}}\
         </main>{{footer}}",
    ),
    ("header.html", "<header class=\"site-header\">{{site_title}}</header>"),
    ("menu.html", "<nav class=\"site-menu\">{{#if isProject}}<a href=\"/\">Home</a>{{/if}}</nav>"),
    ("footer.html", "<footer class=\"site-footer\"></footer>"),
    (
        "entry.html",
        "<h1>{{title}}</h1>{{release_date}}{{store}}{{description}}{{media}}{{content}}",
    ),
    ("bare.html", "<title>{{title}}</title>{{content}}"),
];

/// Lay out a project with the stock templates and the given content files.
fn project(content: &[(&str, &str)]) -> TempDir {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();
    for (name, text) in TEMPLATES {
        write(&root.join("src/templates").join(name), text);
    }
    for (rel, text) in content {
        write(&root.join("src/content").join(rel), text);
    }
    tmp
}

fn write(path: &Path, text: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, text).unwrap();
}

fn build(root: &Path) -> (SitePaths, Result<BuildReport, GenerateError>) {
    let site_config = config::load_config(root).unwrap();
    let paths = site_config.resolve_paths(root, None);
    let result = generate::build(&site_config, &paths);
    (paths, result)
}

fn read(paths: &SitePaths, rel: &str) -> String {
    fs::read_to_string(paths.output.join(rel))
        .unwrap_or_else(|e| panic!("cannot read {rel}: {e}"))
}

fn copy_dir(src: &Path, dst: &Path) {
    for entry in fs::read_dir(src).unwrap() {
        let entry = entry.unwrap();
        let target = dst.join(entry.file_name());
        if entry.path().is_dir() {
            fs::create_dir_all(&target).unwrap();
            copy_dir(&entry.path(), &target);
        } else {
            fs::copy(entry.path(), target).unwrap();
        }
    }
}

// =========================================================================
// Scenarios
// =========================================================================

#[test]
fn project_entry_and_home_thumbnail() {
    let tmp = project(&[
        ("index.md", "# Projects\n"),
        (
            "projects/demo.md",
            "---\ntitle: Demo\npreview_image: demo.jpg\n---\nA small demo.",
        ),
    ]);
    let (paths, result) = build(tmp.path());
    result.unwrap();

    let entry = read(&paths, "projects/demo/index.html");
    assert!(entry.contains("<h1>Demo</h1>"));
    assert!(!entry.contains("media-grid"));
    assert!(!entry.contains("store-links"));

    let home = read(&paths, "index.html");
    assert!(home.contains(r#"<div class="projects-grid">"#));
    assert!(home.contains(r#"<a href="/projects/demo/"><img src="/assets/demo.jpg" alt="Demo""#));
}

#[test]
fn home_sections_alternate_with_empty_games_grid() {
    let tmp = project(&[("index.md", "# About\nWe make games.\n\n# Games\n")]);
    let (paths, result) = build(tmp.path());
    result.unwrap();

    let home = read(&paths, "index.html");
    assert!(home.contains(r#"<section id="about" class="light"><h1>About</h1>"#));
    assert!(home.contains(
        r#"<section id="games" class="dark"><h1>Games</h1><div class="games-grid"></div></section>"#
    ));
}

#[test]
fn bare_permalinked_page_has_no_chrome() {
    let tmp = project(&[
        ("index.md", "# About\n"),
        ("legal.md", "---\npermalink: /legal\nno_style: true\n---\nTerms apply."),
    ]);
    let (paths, result) = build(tmp.path());
    result.unwrap();

    let legal = read(&paths, "legal/index.html");
    assert!(legal.contains("<p>Terms apply.</p>"));
    assert!(!legal.contains("site-header"));
    assert!(!legal.contains("site-menu"));
    assert!(!legal.contains("site-footer"));
}

#[test]
fn styled_permalinked_page_keeps_chrome() {
    let tmp = project(&[
        ("index.md", "# About\nHome only.\n"),
        ("misc/press.md", "---\npermalink: /press/kit\ntitle: Press\n---\nLogos."),
    ]);
    let (paths, result) = build(tmp.path());
    result.unwrap();

    let press = read(&paths, "press/kit/index.html");
    assert!(press.contains("site-header"));
    assert!(press.contains(r#"<a href="/">Home</a>"#));
    assert!(press.contains("<main><p>Logos.</p>\n</main>"));
    assert!(!press.contains("Home only."));
}

// =========================================================================
// Properties
// =========================================================================

#[test]
fn permalink_trailing_slash_is_normalized() {
    for permalink in ["/foo/bar", "/foo/bar/"] {
        let tmp = project(&[
            ("index.md", "# About\n"),
            ("page.md", &format!("---\npermalink: {permalink}\n---\nHi")),
        ]);
        let (paths, result) = build(tmp.path());
        let report = result.unwrap();
        assert!(paths.output.join("foo/bar/index.html").is_file());
        assert!(report.pages.iter().any(|p| p.url == "/foo/bar/"));
    }
}

#[test]
fn placeholder_shaped_values_are_not_expanded_again() {
    let tmp = project(&[
        ("index.md", "# About\n"),
        ("projects/odd.md", "---\ntitle: {{title}}\n---\nBody mentions {{content}}."),
    ]);
    let (paths, result) = build(tmp.path());
    result.unwrap();

    let entry = read(&paths, "projects/odd/index.html");
    assert!(entry.starts_with("<h1>{{title}}</h1>"));
    assert!(entry.contains("Body mentions {{content}}."));
}

#[test]
fn repeated_builds_are_identical() {
    let tmp = project(&[
        ("index.md", "# Games\n"),
        ("games/c.md", "---\ntitle: C\n---\n"),
        ("games/a.md", "---\ntitle: A\norder: 5\n---\n"),
        ("games/b.md", "---\ntitle: B\n---\n"),
    ]);
    let (paths, first) = build(tmp.path());
    first.unwrap();
    let before = read(&paths, "index.html");

    let (_, second) = build(tmp.path());
    second.unwrap();
    let after = read(&paths, "index.html");

    assert_eq!(before, after);
    let a = after.find("/games/a/").unwrap();
    let b = after.find("/games/b/").unwrap();
    let c = after.find("/games/c/").unwrap();
    assert!(a < b && b < c);
}

#[test]
fn escaping_permalink_fails_without_writing() {
    let tmp = project(&[
        ("index.md", "# About\n"),
        ("evil.md", "---\npermalink: /../outside\n---\n"),
    ]);
    let (paths, result) = build(tmp.path());
    assert!(matches!(result, Err(GenerateError::InvalidPermalink { .. })));
    assert!(!paths.output.exists());
}

#[test]
fn colliding_permalink_fails_without_writing() {
    let tmp = project(&[
        ("index.md", "# About\n"),
        ("clash.md", "---\npermalink: /index.html\n---\n"),
    ]);
    let (paths, result) = build(tmp.path());
    assert!(matches!(result, Err(GenerateError::PermalinkCollision { .. })));
    assert!(!paths.output.exists());
}

#[test]
fn missing_home_is_fatal() {
    let tmp = project(&[("about.md", "About")]);
    let (_, result) = build(tmp.path());
    assert!(matches!(result, Err(GenerateError::Scan(_))));
}

#[test]
fn output_override_wins() {
    let tmp = project(&[("index.md", "# About\n")]);
    let out = tmp.path().join("public");
    let site_config = config::load_config(tmp.path()).unwrap();
    let paths = site_config.resolve_paths(tmp.path(), Some(out.as_path()));
    generate::build(&site_config, &paths).unwrap();
    assert!(out.join("index.html").is_file());
    assert!(!tmp.path().join("site").exists());
}

// =========================================================================
// Fixture site
// =========================================================================

#[test]
fn fixture_site_builds() {
    let tmp = TempDir::new().unwrap();
    copy_dir(
        &Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/site"),
        tmp.path(),
    );
    let (paths, result) = build(tmp.path());
    let report = result.unwrap();
    assert_eq!(report.pages.len(), 7);

    let home = read(&paths, "index.html");
    assert!(home.contains("<title>Lantern Games</title>"));
    assert!(home.contains(r#"<ul class="contacts">"#));
    assert!(home.contains(r#"<a href="/games/starfall/"><img src="/assets/starfall-cover.jpg""#));

    let starfall = read(&paths, "games/starfall/index.html");
    assert!(starfall.contains(r#"<p class="release-date">Release date: Spring 2025</p>"#));
    assert!(starfall.contains(r#"<img src="/assets/steam.png" alt="Steam" />"#));
    assert!(starfall.contains(r#"data-media-url="https://www.youtube.com/embed/starfall01""#));
    assert!(starfall.contains(r#"<meta property="og:image" content="/assets/starfall-cover.jpg">"#));

    let tideglass = read(&paths, "games/tideglass/index.html");
    assert!(tideglass.contains(r#"data-media-url="https://player.vimeo.com/video/123456""#));

    let press = read(&paths, "press/kit/index.html");
    assert!(press.contains("Logos and screenshots"));
    assert!(press.contains("site-footer"));

    let legal = read(&paths, "legal/index.html");
    assert!(!legal.contains("site-header"));
}
