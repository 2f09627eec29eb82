//! Shared types used across the pipeline stages.
//!
//! The scanner produces these, the page builders consume them, and the
//! console output and `check --json` serialize them.

use crate::frontmatter::Frontmatter;
use serde::Serialize;
use std::path::PathBuf;

/// One parsed content file. Immutable once read.
#[derive(Debug, Clone, Serialize)]
pub struct ContentRecord {
    pub source_path: PathBuf,
    pub frontmatter: Frontmatter,
    /// Markdown with the frontmatter block stripped, `\n` line endings.
    pub body: String,
}

impl ContentRecord {
    /// Frontmatter `title`, or `fallback` when absent.
    pub fn title_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.frontmatter.get("title").unwrap_or(fallback)
    }
}

/// What a content file is, decided once during scanning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ContentCategory {
    /// The home page source (`index.md`).
    Home,
    /// A named page exposed to the home template (`about.md`, `contacts.md`).
    Singleton { name: String },
    /// A file inside a collection directory (`projects/`, `games/`).
    CollectionMember {
        collection: String,
        name: String,
        order: Option<i64>,
    },
    /// A standalone page with a `permalink` key.
    Permalinked { permalink: String, styled: bool },
}

/// A content record with its category.
#[derive(Debug, Clone, Serialize)]
pub struct ClassifiedRecord {
    pub category: ContentCategory,
    pub record: ContentRecord,
}

/// A collection member, ready for grid and detail rendering.
#[derive(Debug, Clone, Copy)]
pub struct CollectionEntry<'a> {
    pub collection: &'a str,
    /// File stem; both the display identity and the URL segment.
    pub name: &'a str,
    pub order: Option<i64>,
    pub record: &'a ContentRecord,
}

impl CollectionEntry<'_> {
    /// Site-absolute URL of the entry's detail page.
    pub fn url(&self) -> String {
        format!("/{}/{}/", self.collection, self.name)
    }
}

/// A permalinked standalone page.
#[derive(Debug, Clone, Copy)]
pub struct SpecialPage<'a> {
    pub permalink: &'a str,
    /// False when the page asked for `no_style`.
    pub styled: bool,
    pub record: &'a ContentRecord,
}

/// Alternating band colour of a home-page section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Background {
    Light,
    Dark,
}

impl Background {
    /// Light for even positions, dark for odd ones.
    pub fn for_position(index: usize) -> Self {
        if index % 2 == 0 {
            Background::Light
        } else {
            Background::Dark
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Background::Light => "light",
            Background::Dark => "dark",
        }
    }
}

/// One heading-delimited block of the home page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    pub id: String,
    pub heading: String,
    pub background: Background,
    /// Final HTML.
    pub content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn background_alternates_from_light() {
        let bands: Vec<&str> = (0..4)
            .map(|i| Background::for_position(i).as_str())
            .collect();
        assert_eq!(bands, vec!["light", "dark", "light", "dark"]);
    }

    #[test]
    fn entry_url_is_clean() {
        let record = ContentRecord {
            source_path: PathBuf::from("projects/demo.md"),
            frontmatter: Frontmatter::new(),
            body: String::new(),
        };
        let entry = CollectionEntry {
            collection: "projects",
            name: "demo",
            order: None,
            record: &record,
        };
        assert_eq!(entry.url(), "/projects/demo/");
    }

    #[test]
    fn category_serializes_with_kind_tag() {
        let category = ContentCategory::Permalinked {
            permalink: "/legal".to_string(),
            styled: false,
        };
        let json = serde_json::to_string(&category).unwrap();
        assert_eq!(json, r#"{"kind":"permalinked","permalink":"/legal","styled":false}"#);
    }
}
