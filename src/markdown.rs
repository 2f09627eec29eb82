//! Markdown to HTML conversion.
//!
//! Thin layer over [`pulldown_cmark`] configured GFM-style: tables,
//! strikethrough and task lists are on, and single newlines inside a paragraph
//! become `<br />` line breaks.
//!
//! Relative image references are rewritten to live under the site's asset
//! prefix, so content can write `![Steam](steam.png)` and get
//! `/assets/steam.png` in the output.

use pulldown_cmark::{CowStr, Event, Options, Parser, Tag, html};

fn options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_HEADING_ATTRIBUTES
}

/// Convert markdown, pointing relative image sources under `assets_prefix`.
pub fn to_html_with_assets(markdown: &str, assets_prefix: &str) -> String {
    render(markdown, assets_prefix)
}

/// Convert a one-paragraph fragment, dropping the wrapping `<p>`.
pub fn to_inline_html(markdown: &str, assets_prefix: &str) -> String {
    let html = render(markdown, assets_prefix);
    let trimmed = html.trim();
    match trimmed
        .strip_prefix("<p>")
        .and_then(|s| s.strip_suffix("</p>"))
    {
        Some(inner) if !inner.contains("<p>") => inner.to_string(),
        _ => trimmed.to_string(),
    }
}

fn render(markdown: &str, assets_prefix: &str) -> String {
    let parser = Parser::new_ext(markdown, options()).map(|event| match event {
        Event::SoftBreak => Event::HardBreak,
        Event::Start(Tag::Image {
            link_type,
            dest_url,
            title,
            id,
        }) => {
            let dest_url = CowStr::from(resolve_asset(&dest_url, assets_prefix));
            Event::Start(Tag::Image {
                link_type,
                dest_url,
                title,
                id,
            })
        }
        other => other,
    });

    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}

/// Whether `url` already points somewhere on its own (scheme, site-absolute
/// path, fragment or data URI).
pub fn is_absolute_url(url: &str) -> bool {
    url.starts_with('/')
        || url.starts_with('#')
        || url.contains("://")
        || url.starts_with("data:")
        || url.starts_with("mailto:")
}

/// Resolve a bare asset file name under `prefix`; absolute URLs pass through.
pub fn resolve_asset(url: &str, prefix: &str) -> String {
    if url.is_empty() || is_absolute_url(url) {
        url.to_string()
    } else {
        format!("{}{}", prefix, url.trim_start_matches("./"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_basic_markdown() {
        let html =
            to_html_with_assets("# Title\n\nThis is **bold** and *italic*.", "/assets/");
        assert!(html.contains("<h1>Title</h1>"));
        assert!(html.contains("<strong>bold</strong>"));
        assert!(html.contains("<em>italic</em>"));
    }

    #[test]
    fn single_newlines_become_breaks() {
        let html = to_html_with_assets("line one\nline two", "/assets/");
        assert!(html.contains("line one<br />"));
    }

    #[test]
    fn gfm_tables_and_strikethrough() {
        let html =
            to_html_with_assets("| a | b |\n|---|---|\n| 1 | 2 |\n\n~~gone~~", "/assets/");
        assert!(html.contains("<table>"));
        assert!(html.contains("<del>gone</del>"));
    }

    #[test]
    fn relative_images_move_under_assets() {
        let html = to_html_with_assets("![Steam](steam.png)", "/assets/");
        assert!(html.contains(r#"src="/assets/steam.png""#));
    }

    #[test]
    fn absolute_images_are_untouched() {
        let html = to_html_with_assets(
            "![a](https://cdn.example.com/a.png) ![b](/images/b.png)",
            "/assets/",
        );
        assert!(html.contains(r#"src="https://cdn.example.com/a.png""#));
        assert!(html.contains(r#"src="/images/b.png""#));
    }

    #[test]
    fn inline_strips_paragraph() {
        let html = to_inline_html("[![Steam](steam.png)](https://store.example.com)", "/assets/");
        assert_eq!(
            html,
            r#"<a href="https://store.example.com"><img src="/assets/steam.png" alt="Steam" /></a>"#
        );
    }

    #[test]
    fn inline_keeps_multi_paragraph_markup() {
        let html = to_inline_html("one\n\ntwo", "/assets/");
        assert_eq!(html, "<p>one</p>\n<p>two</p>");
    }

    #[test]
    fn resolve_asset_rules() {
        assert_eq!(resolve_asset("demo.jpg", "/assets/"), "/assets/demo.jpg");
        assert_eq!(resolve_asset("./demo.jpg", "/assets/"), "/assets/demo.jpg");
        assert_eq!(resolve_asset("/images/x.png", "/assets/"), "/images/x.png");
        assert_eq!(
            resolve_asset("https://youtu.be/abc", "/assets/"),
            "https://youtu.be/abc"
        );
        assert_eq!(resolve_asset("", "/assets/"), "");
    }
}
