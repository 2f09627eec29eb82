//! Identity rules shared by the scanner, the builders and the writer.
//!
//! - Section ids come from heading text: `"About Us"` → `about`,
//!   `"Our Games"` → `ourgames`.
//! - Collection entries are named after their file stem: `games/starfall.md`
//!   → `starfall`, served at `/games/starfall/`.
//! - Permalinks lose their leading and trailing slashes: `/foo/bar/` →
//!   `foo/bar`, written to `foo/bar/index.html`.

use std::path::Path;

/// Text of a top-level markdown heading (`# Title`), if `line` is one.
pub fn heading_text(line: &str) -> Option<&str> {
    let rest = line.strip_prefix('#')?;
    if rest.starts_with('#') {
        return None;
    }
    let text = rest.strip_prefix([' ', '\t'])?.trim();
    Some(text.trim_end_matches('#').trim_end())
}

/// Section id for a heading: lowercased, a trailing word "us" dropped, and all
/// whitespace removed.
pub fn section_slug(heading: &str) -> String {
    let lower = heading.trim().to_lowercase();
    let base = match lower.strip_suffix("us") {
        Some(head) if head.ends_with(char::is_whitespace) => head,
        _ => lower.as_str(),
    };
    base.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Entry name: the file stem (`starfall.md` → `starfall`).
pub fn entry_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default()
}

/// Parse an `order` value. Absent or non-numeric orders sort last.
pub fn parse_order(value: Option<&str>) -> Option<i64> {
    value.and_then(|v| v.trim().parse().ok())
}

/// Sort key placing unordered entries after every ordered one.
pub fn order_key(order: Option<i64>) -> (bool, i64) {
    match order {
        Some(n) => (false, n),
        None => (true, 0),
    }
}

/// Normalize a declared permalink into a relative output directory.
///
/// Returns `None` for permalinks that point at the site root or try to leave
/// the output directory (`.`/`..` segments).
pub fn normalize_permalink(permalink: &str) -> Option<String> {
    let trimmed = permalink.trim().trim_matches('/');
    if trimmed.is_empty() {
        return None;
    }
    let unsafe_segment = trimmed
        .split(['/', '\\'])
        .any(|seg| seg.is_empty() || seg == "." || seg == "..");
    if unsafe_segment {
        return None;
    }
    Some(trimmed.to_string())
}
