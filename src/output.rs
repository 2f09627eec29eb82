//! CLI output formatting for the scan and build stages.
//!
//! # Information-First Display
//!
//! Every entity leads with its identity (positional index and title), with
//! the source file shown as an indented `Source:` line underneath. The output
//! reads as a content inventory while still pointing back at the files.
//!
//! # Output Format
//!
//! ## Check (scan)
//!
//! ```text
//! Home
//!     Source: index.md
//!     001 About Us (#about)
//!     002 Games (#games)
//!
//! Singletons
//!     001 about
//!         Source: about.md
//!
//! Collections
//!     games (2 entries)
//!         001 Starfall (order 1)
//!             Source: games/starfall.md
//!         002 Driftwood
//!             Source: games/driftwood.md
//!
//! Pages
//!     001 Legal → /legal (bare)
//!         Source: legal.md
//!
//! Ignored: notes.md
//! ```
//!
//! ## Build
//!
//! ```text
//! Home → index.html
//! games/Starfall → games/starfall/index.html
//! Legal → legal/index.html
//!
//! Ignored: notes.md
//! Generated 3 pages in site
//! ```
//!
//! # Architecture
//!
//! Each stage has a `format_*` function (returns `Vec<String>`) for testability
//! and a `print_*` wrapper that writes to stdout. Format functions are pure:
//! no I/O, no side effects.

use crate::generate::BuildReport;
use crate::scan::{self, Inventory};
use crate::types::ContentCategory;
use std::path::{Path, PathBuf};

// ============================================================================
// Shared helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Path of a content file relative to the content root, for display.
fn display_source(path: &Path, content_root: &Path) -> String {
    path.strip_prefix(content_root)
        .unwrap_or(path)
        .display()
        .to_string()
}

fn ignored_lines(ignored: &[PathBuf]) -> Vec<String> {
    ignored
        .iter()
        .map(|p| format!("Ignored: {}", p.display()))
        .collect()
}

// ============================================================================
// Scan output
// ============================================================================

/// Format the classified content tree.
pub fn format_scan_output(inventory: &Inventory, content_root: &Path) -> Vec<String> {
    let mut lines = Vec::new();

    if let Some(home) = inventory.home() {
        lines.push("Home".to_string());
        lines.push(format!(
            "{}Source: {}",
            indent(1),
            display_source(&home.source_path, content_root)
        ));
        for (i, section) in scan::split_sections(&home.body).iter().enumerate() {
            lines.push(format!(
                "{}{} {} (#{})",
                indent(1),
                format_index(i + 1),
                section.heading,
                section.slug
            ));
        }
    }

    let singletons: Vec<_> = inventory
        .records
        .iter()
        .filter_map(|r| match &r.category {
            ContentCategory::Singleton { name } => Some((name, &r.record)),
            _ => None,
        })
        .collect();
    if !singletons.is_empty() {
        lines.push(String::new());
        lines.push("Singletons".to_string());
        for (i, (name, record)) in singletons.iter().enumerate() {
            lines.push(format!("{}{} {}", indent(1), format_index(i + 1), name));
            lines.push(format!(
                "{}Source: {}",
                indent(2),
                display_source(&record.source_path, content_root)
            ));
        }
    }

    let mut collections: Vec<&str> = Vec::new();
    for r in &inventory.records {
        if let ContentCategory::CollectionMember { collection, .. } = &r.category
            && !collections.contains(&collection.as_str())
        {
            collections.push(collection);
        }
    }
    if !collections.is_empty() {
        lines.push(String::new());
        lines.push("Collections".to_string());
        for collection in collections {
            let entries = inventory.collection(collection);
            let noun = if entries.len() == 1 { "entry" } else { "entries" };
            lines.push(format!("{}{} ({} {})", indent(1), collection, entries.len(), noun));
            for (i, entry) in entries.iter().enumerate() {
                let order = entry
                    .order
                    .map(|n| format!(" (order {n})"))
                    .unwrap_or_default();
                lines.push(format!(
                    "{}{} {}{}",
                    indent(2),
                    format_index(i + 1),
                    entry.record.title_or(entry.name),
                    order
                ));
                lines.push(format!(
                    "{}Source: {}",
                    indent(3),
                    display_source(&entry.record.source_path, content_root)
                ));
            }
        }
    }

    let pages = inventory.special_pages();
    if !pages.is_empty() {
        lines.push(String::new());
        lines.push("Pages".to_string());
        for (i, page) in pages.iter().enumerate() {
            let bare = if page.styled { "" } else { " (bare)" };
            lines.push(format!(
                "{}{} {} \u{2192} {}{}",
                indent(1),
                format_index(i + 1),
                page.record.title_or(page.permalink),
                page.permalink,
                bare
            ));
            lines.push(format!(
                "{}Source: {}",
                indent(2),
                display_source(&page.record.source_path, content_root)
            ));
        }
    }

    if !inventory.ignored.is_empty() {
        lines.push(String::new());
        lines.extend(ignored_lines(&inventory.ignored));
    }

    lines
}

/// Print scan output to stdout.
pub fn print_scan_output(inventory: &Inventory, content_root: &Path) {
    for line in format_scan_output(inventory, content_root) {
        println!("{}", line);
    }
}

// ============================================================================
// Build output
// ============================================================================

/// Format the pages a build wrote.
pub fn format_build_output(report: &BuildReport) -> Vec<String> {
    let mut lines: Vec<String> = report
        .pages
        .iter()
        .map(|page| format!("{} \u{2192} {}", page.label, page.path.display()))
        .collect();

    if !report.ignored.is_empty() {
        lines.push(String::new());
        lines.extend(ignored_lines(&report.ignored));
    }

    let noun = if report.pages.len() == 1 { "page" } else { "pages" };
    lines.push(format!(
        "Generated {} {} in {}",
        report.pages.len(),
        noun,
        report.output_dir.display()
    ));
    lines
}

/// Print build output to stdout.
pub fn print_build_output(report: &BuildReport) {
    for line in format_build_output(report) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================
