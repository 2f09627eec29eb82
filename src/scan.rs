//! Content classification.
//!
//! First stage of the build. Walks the content directory, parses every markdown
//! file's frontmatter, and decides once what each file is.
//!
//! ## Content Layout
//!
//! ```text
//! content/
//! ├── index.md           # Home; each `# Heading` starts a section
//! ├── about.md           # Singleton (matched by file name)
//! ├── contacts.md        # Singleton
//! ├── legal.md           # Permalinked (has `permalink:`), any name, any depth
//! ├── notes.md           # Nothing matches: ignored, reported as a warning
//! ├── games/             # Collection: every markdown file is one entry
//! │   ├── starfall.md
//! │   └── tideglass.md
//! └── projects/
//!     └── demo.md
//! ```
//!
//! ## Categories
//!
//! The result is an [`Inventory`] of [`ClassifiedRecord`]s, each tagged with a
//! [`ContentCategory`]. Precedence, first match wins:
//!
//! 1. `index.md` at the root is the home page.
//! 2. A root-level file named after a singleton (`about.md`) is that singleton.
//! 3. A markdown file directly inside a collection directory is a member.
//! 4. Any other markdown file with a `permalink` key is a standalone page.
//! 5. Everything else is ignored.
//!
//! ## Ordering
//!
//! The walk is sorted by file name, so classification is deterministic.
//! Collection members are ordered by their `order` key; members without one
//! (or with a non-numeric one) come last, and ties fall back to the file name.
//!
//! ## Home Sections
//!
//! [`split_sections`] cuts the home body at each top-level `# Heading` line
//! (outside fenced code blocks). Text before the first heading belongs to no
//! section and is not rendered.

use crate::config::ContentConfig;
use crate::frontmatter;
use crate::naming;
use crate::types::{ClassifiedRecord, CollectionEntry, ContentCategory, ContentRecord, SpecialPage};
use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::{DirEntry, WalkDir};

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Content directory not found: {0}")]
    MissingContentDir(PathBuf),
    #[error("Home page source not found: {0}")]
    MissingHome(PathBuf),
}

/// Every content file, classified.
#[derive(Debug, Serialize)]
pub struct Inventory {
    pub records: Vec<ClassifiedRecord>,
    /// Files that matched no category, relative to the content root.
    pub ignored: Vec<PathBuf>,
}

impl Inventory {
    pub fn home(&self) -> Option<&ContentRecord> {
        self.records
            .iter()
            .find(|r| r.category == ContentCategory::Home)
            .map(|r| &r.record)
    }

    pub fn singleton(&self, name: &str) -> Option<&ContentRecord> {
        self.records.iter().find_map(|r| match &r.category {
            ContentCategory::Singleton { name: n } if n == name => Some(&r.record),
            _ => None,
        })
    }

    /// Members of `collection`, sorted for display.
    pub fn collection(&self, collection: &str) -> Vec<CollectionEntry<'_>> {
        let mut entries: Vec<CollectionEntry<'_>> = self
            .records
            .iter()
            .filter_map(|r| match &r.category {
                ContentCategory::CollectionMember {
                    collection: c,
                    name,
                    order,
                } if c == collection => Some(CollectionEntry {
                    collection: c,
                    name,
                    order: *order,
                    record: &r.record,
                }),
                _ => None,
            })
            .collect();
        entries.sort_by(|a, b| {
            naming::order_key(a.order)
                .cmp(&naming::order_key(b.order))
                .then_with(|| a.name.cmp(b.name))
        });
        entries
    }

    pub fn special_pages(&self) -> Vec<SpecialPage<'_>> {
        self.records
            .iter()
            .filter_map(|r| match &r.category {
                ContentCategory::Permalinked { permalink, styled } => Some(SpecialPage {
                    permalink,
                    styled: *styled,
                    record: &r.record,
                }),
                _ => None,
            })
            .collect()
    }
}

/// Walk `content_root` and classify every file.
pub fn scan(content_root: &Path, config: &ContentConfig) -> Result<Inventory, ScanError> {
    if !content_root.is_dir() {
        return Err(ScanError::MissingContentDir(content_root.to_path_buf()));
    }

    let mut records = Vec::new();
    let mut ignored = Vec::new();

    let walker = WalkDir::new(content_root)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_hidden(e));

    for entry in walker {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        let rel = path.strip_prefix(content_root).unwrap_or(path).to_path_buf();

        if !is_markdown(path) {
            ignored.push(rel);
            continue;
        }

        let record = frontmatter::read_record(path)?;
        match classify(&rel, &record, config) {
            Some(category) => records.push(ClassifiedRecord { category, record }),
            None => ignored.push(rel),
        }
    }

    let inventory = Inventory { records, ignored };
    if inventory.home().is_none() {
        return Err(ScanError::MissingHome(content_root.join(&config.home)));
    }
    Ok(inventory)
}

/// Decide the category of a markdown file at `rel` (relative to the content root).
pub fn classify(
    rel: &Path,
    record: &ContentRecord,
    config: &ContentConfig,
) -> Option<ContentCategory> {
    let parts: Vec<String> = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy().to_string())
        .collect();

    match parts.as_slice() {
        [file] if *file == config.home => return Some(ContentCategory::Home),
        [_] => {
            let stem = naming::entry_name(rel);
            if config.singletons.contains(&stem) {
                return Some(ContentCategory::Singleton { name: stem });
            }
        }
        [dir, _] if config.collections.contains(dir) => {
            return Some(ContentCategory::CollectionMember {
                collection: dir.clone(),
                name: naming::entry_name(rel),
                order: naming::parse_order(record.frontmatter.get("order")),
            });
        }
        _ => {}
    }

    record
        .frontmatter
        .get("permalink")
        .map(|permalink| ContentCategory::Permalinked {
            permalink: permalink.to_string(),
            styled: !record.frontmatter.flag("no_style"),
        })
}

/// A heading-delimited span of the home page body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionSource {
    pub heading: String,
    pub slug: String,
    /// Markdown after the heading line, up to the next heading.
    pub body: String,
}

impl SectionSource {
    /// The span as markdown, heading included.
    pub fn markdown(&self) -> String {
        format!("# {}\n{}", self.heading, self.body)
    }
}

/// Split the home body into sections at each top-level heading.
pub fn split_sections(body: &str) -> Vec<SectionSource> {
    let mut sections: Vec<SectionSource> = Vec::new();
    let mut in_fence = false;

    for line in body.lines() {
        let trimmed = line.trim_start();
        if trimmed.starts_with("```") || trimmed.starts_with("~~~") {
            in_fence = !in_fence;
        }

        if !in_fence && let Some(heading) = naming::heading_text(line) {
            sections.push(SectionSource {
                heading: heading.to_string(),
                slug: naming::section_slug(heading),
                body: String::new(),
            });
            continue;
        }

        if let Some(section) = sections.last_mut() {
            section.body.push_str(line);
            section.body.push('\n');
        }
    }

    sections
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0 && entry.file_name().to_string_lossy().starts_with('.')
}

fn is_markdown(path: &Path) -> bool {
    path.extension()
        .map(|e| e.eq_ignore_ascii_case("md"))
        .unwrap_or(false)
}
