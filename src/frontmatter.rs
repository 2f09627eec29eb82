//! Frontmatter parsing.
//!
//! Content files may open with a metadata block fenced by `---` lines:
//!
//! ```text
//! ---
//! title: "Starfall"
//! order: 2
//! media:
//! - starfall-1.png
//! - https://www.youtube.com/watch?v=abc123
//! ---
//! Markdown body starts here.
//! ```
//!
//! The block is a deliberately small YAML-flavoured subset, parsed line by line:
//!
//! - Blank lines are skipped.
//! - A line starting with `-` is a list item. It is appended to the key that was
//!   most recently declared, so list items must directly follow their key.
//! - Any other line is split on the first `:` into key and value. Both are
//!   trimmed, and one layer of matching single or double quotes is removed from
//!   the value.
//! - Lines that are neither are dropped without an error.
//!
//! The body has its byte-order mark removed and line endings normalized to `\n`
//! before the block is detected, so `\r\n` files parse identically.

use crate::types::ContentRecord;
use serde::Serialize;
use serde::ser::{SerializeMap, Serializer};
use std::fs;
use std::path::Path;

/// Value of a single frontmatter key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FrontmatterValue {
    Scalar(String),
    List(Vec<String>),
}

/// Ordered key/value header of a content file.
///
/// Keys keep their first-declaration order. Re-declaring a key replaces its
/// value in place and makes it the target for following list items.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frontmatter {
    entries: Vec<(String, FrontmatterValue)>,
}

impl Frontmatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Insert or replace a key. Returns the key's position.
    pub fn insert(&mut self, key: impl Into<String>, value: FrontmatterValue) -> usize {
        let key = key.into();
        if let Some(pos) = self.entries.iter().position(|(k, _)| *k == key) {
            self.entries[pos].1 = value;
            pos
        } else {
            self.entries.push((key, value));
            self.entries.len() - 1
        }
    }

    pub fn value(&self, key: &str) -> Option<&FrontmatterValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Non-empty scalar value for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        match self.value(key) {
            Some(FrontmatterValue::Scalar(s)) if !s.is_empty() => Some(s.as_str()),
            _ => None,
        }
    }

    /// List value for `key`. Absent keys and scalar keys yield an empty slice.
    pub fn list(&self, key: &str) -> &[String] {
        match self.value(key) {
            Some(FrontmatterValue::List(items)) => items,
            _ => &[],
        }
    }

    /// Whether `key` holds a truthy scalar (`true`, `yes`, `1`, case-insensitive).
    pub fn flag(&self, key: &str) -> bool {
        self.get(key)
            .map(|v| matches!(v.to_ascii_lowercase().as_str(), "true" | "yes" | "1"))
            .unwrap_or(false)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FrontmatterValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Append a list item to the entry at `pos`.
    ///
    /// An empty scalar (a bare `key:` line) becomes a list. A key that already
    /// carries a non-empty scalar keeps it and the item is dropped, so a key is
    /// never half scalar, half list.
    fn push_item(&mut self, pos: usize, item: String) {
        let value = &mut self.entries[pos].1;
        match value {
            FrontmatterValue::List(items) => items.push(item),
            FrontmatterValue::Scalar(s) if s.is_empty() => {
                *value = FrontmatterValue::List(vec![item]);
            }
            FrontmatterValue::Scalar(_) => {}
        }
    }
}

impl Serialize for Frontmatter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// Remove a byte-order mark and normalize line endings to `\n`.
pub fn normalize(text: &str) -> String {
    text.strip_prefix('\u{feff}')
        .unwrap_or(text)
        .replace("\r\n", "\n")
        .replace('\r', "\n")
}

/// Split raw file text into frontmatter and markdown body.
///
/// Text without a leading `---` fence, or with an opening fence that is never
/// closed, is all body.
pub fn parse(text: &str) -> (Frontmatter, String) {
    let text = normalize(text);
    match split_block(&text) {
        Some((block, body)) => (parse_block(block), body.to_string()),
        None => (Frontmatter::new(), text),
    }
}

/// Locate the fenced block. Returns `(block, body)`.
fn split_block(text: &str) -> Option<(&str, &str)> {
    let rest = text.strip_prefix("---\n")?;

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end_matches('\n') == "---" {
            let block = &rest[..offset];
            let body = &rest[offset + line.len()..];
            return Some((block.strip_suffix('\n').unwrap_or(block), body));
        }
        offset += line.len();
    }
    None
}

/// Parse the lines between the fences.
pub fn parse_block(block: &str) -> Frontmatter {
    let mut frontmatter = Frontmatter::new();
    let mut current: Option<usize> = None;

    for line in block.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        if let Some(item) = trimmed.strip_prefix('-') {
            // Items before any key have nowhere to go
            if let Some(pos) = current {
                frontmatter.push_item(pos, item.trim().to_string());
            }
            continue;
        }

        let Some((key, value)) = trimmed.split_once(':') else {
            continue;
        };
        let key = key.trim();
        if key.is_empty() {
            continue;
        }
        let value = strip_quotes(value.trim());
        current = Some(frontmatter.insert(key, FrontmatterValue::Scalar(value.to_string())));
    }

    frontmatter
}

/// Collect the items of a `key:` list embedded in free text.
///
/// Scans for a line reading `key:` and gathers the `-` lines that follow,
/// stopping at the first line that is neither blank nor a list item. Returns
/// the items and the text with the list (and its key line) removed.
pub fn extract_list(text: &str, key: &str) -> (Vec<String>, String) {
    let mut items = Vec::new();
    let mut remainder = Vec::new();
    let mut in_list = false;
    let mut found = false;

    for line in text.lines() {
        let trimmed = line.trim();
        if !found && trimmed.strip_suffix(':').map(str::trim) == Some(key) {
            found = true;
            in_list = true;
            continue;
        }
        if in_list {
            if let Some(item) = trimmed.strip_prefix('-') {
                items.push(item.trim().to_string());
                continue;
            }
            if trimmed.is_empty() {
                continue;
            }
            in_list = false;
        }
        remainder.push(line);
    }

    (items, remainder.join("\n"))
}

fn strip_quotes(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}

/// Render frontmatter back into its fenced text form.
///
/// `parse(&serialize(&fm)).0 == fm` holds for values without surrounding
/// whitespace. Scalars that would lose a quote layer on parse are wrapped in
/// the other quote style. Keys that cannot be read back (empty, padded with
/// whitespace, containing `:` or starting with `-`) are skipped. Empty lists
/// have no text form and come back as an empty scalar.
pub fn serialize(frontmatter: &Frontmatter) -> String {
    let mut out = String::from("---\n");
    for (key, value) in frontmatter.iter() {
        if !is_writable_key(key) {
            continue;
        }
        match value {
            FrontmatterValue::Scalar(s) => {
                out.push_str(key);
                out.push(':');
                if !s.is_empty() {
                    out.push(' ');
                    out.push_str(&quote_if_needed(s));
                }
                out.push('\n');
            }
            FrontmatterValue::List(items) => {
                out.push_str(key);
                out.push_str(":\n");
                for item in items {
                    out.push_str("- ");
                    out.push_str(item);
                    out.push('\n');
                }
            }
        }
    }
    out.push_str("---\n");
    out
}

fn is_writable_key(key: &str) -> bool {
    !key.is_empty() && key.trim() == key && !key.contains(':') && !key.starts_with('-')
}

fn quote_if_needed(value: &str) -> String {
    if strip_quotes(value).len() == value.len() {
        return value.to_string();
    }
    if value.starts_with('"') {
        format!("'{value}'")
    } else {
        format!("\"{value}\"")
    }
}

/// Read and parse a content file.
pub fn read_record(path: &Path) -> std::io::Result<ContentRecord> {
    let text = fs::read_to_string(path)?;
    let (frontmatter, body) = parse(&text);
    Ok(ContentRecord {
        source_path: path.to_path_buf(),
        frontmatter,
        body,
    })
}
