//! # Studiogen
//!
//! A small static site generator for a game studio's website. Markdown files
//! with a frontmatter header are the data source, plain HTML files with
//! `{{name}}` placeholders are the templates, and the output is a tree of
//! static pages with clean URLs.
//!
//! # Architecture: Two-Stage Pipeline
//!
//! ```text
//! 1. Scan      src/content/  →  Inventory   (files → classified records)
//! 2. Generate  Inventory     →  site/       (templates + markdown → HTML)
//! ```
//!
//! Scanning decides once what each file is (home page, singleton, collection
//! entry or permalinked page). Generation matches on that category and never
//! looks at file names again.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`frontmatter`] | `---` header parsing and serialization |
//! | [`scan`] | Walks the content directory and classifies every file into an [`scan::Inventory`] |
//! | [`generate`] | Page builders and the `build` pipeline |
//! | [`template`] | `{{name}}`, `{{#each}}` and `{{#if}}` templates, parsed into a node tree |
//! | [`markdown`] | Markdown to HTML via pulldown-cmark, with asset-prefix rewriting |
//! | [`writer`] | Output path rules and file writing |
//! | [`config`] | `site.toml` loading, merging with stock defaults, and validation |
//! | [`types`] | Shared types (`ContentRecord`, `ContentCategory`, `Section`) |
//! | [`naming`] | Section slugs, entry names, `order` values and permalinks |
//! | [`output`] | CLI output formatting for scan and build results |
//!
//! # Design Decisions
//!
//! ## Templates Are Data, Markup Is Code
//!
//! Page layout lives in the site's own HTML templates so it can be edited
//! without rebuilding the tool. The small fragments the builders generate
//! themselves (collection grids, media grids, store links) are written with
//! [Maud](https://maud.lambda.xyz/), so they are escaped and well formed.
//!
//! ## No Re-Entrant Expansion
//!
//! A template is parsed once and rendered by walking its nodes. Substituted
//! values are emitted as-is, so content that happens to contain `{{title}}`
//! stays literal.
//!
//! ## Deterministic Output
//!
//! The content walk is sorted by file name and collection entries sort by
//! `order`, then name. Two builds of the same tree write identical files.

pub mod config;
pub mod frontmatter;
pub mod generate;
pub mod markdown;
pub mod naming;
pub mod output;
pub mod scan;
pub mod template;
pub mod types;
pub mod writer;

#[cfg(test)]
pub(crate) mod test_helpers;
