//! Site configuration module.
//!
//! Handles loading, validating, and merging `site.toml`. The file lives in the
//! project root next to the `src/` tree and is optional: stock defaults are
//! used for anything it does not mention.
//!
//! ## Project Layout
//!
//! ```text
//! my-studio/
//! ├── site.toml                # Optional overrides
//! ├── src/
//! │   ├── content/             # Markdown sources
//! │   │   ├── index.md         # Home page, split into sections by `#` headings
//! │   │   ├── about.md         # Singleton pages
//! │   │   ├── contacts.md
//! │   │   ├── legal.md         # Any page with `permalink:` in its frontmatter
//! │   │   ├── games/           # Collections: one detail page per file
//! │   │   └── projects/
//! │   └── templates/           # HTML templates with {{placeholders}}
//! └── site/                    # Output (generated)
//! ```
//!
//! ## Configuration Options
//!
//! See [`stock_config_toml`] for the documented defaults. Config files are
//! sparse; override only what you need:
//!
//! ```toml
//! [site]
//! title = "Moonlit Games"
//! ```
//!
//! Unknown keys are rejected to catch typos early.
//!
//! The loaded config is immutable. [`SiteConfig::resolve_paths`] turns the
//! relative directories into absolute ones once, and that [`SitePaths`] value
//! is handed to every stage.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the config file in the project root.
pub const CONFIG_FILE: &str = "site.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `site.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Site-wide metadata.
    pub site: SiteMeta,
    /// Source and output directories, relative to the project root.
    pub paths: PathsConfig,
    /// How content files are categorized.
    pub content: ContentConfig,
    /// Template file names inside the templates directory.
    pub templates: TemplatesConfig,
    /// Asset prefix and video embedding rules.
    pub media: MediaConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteMeta {
    /// Home page title.
    pub title: String,
}

impl Default for SiteMeta {
    fn default() -> Self {
        Self {
            title: "Game Studio".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PathsConfig {
    pub content: String,
    pub templates: String,
    pub output: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            content: "src/content".to_string(),
            templates: "src/templates".to_string(),
            output: "site".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ContentConfig {
    /// Home page source file name.
    pub home: String,
    /// File stems exposed to the home template by name.
    pub singletons: Vec<String>,
    /// Directory names whose files each become a detail page.
    pub collections: Vec<String>,
    /// Home section slug that renders a contact list.
    pub contacts_section: String,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            home: "index.md".to_string(),
            singletons: vec!["about".to_string(), "contacts".to_string()],
            collections: vec!["projects".to_string(), "games".to_string()],
            contacts_section: "contacts".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TemplatesConfig {
    pub home: String,
    pub header: String,
    pub menu: String,
    pub footer: String,
    /// Collection entry detail page.
    pub entry: String,
    /// Content-only page for `no_style` permalinked pages.
    pub bare: String,
}

impl Default for TemplatesConfig {
    fn default() -> Self {
        Self {
            home: "index.html".to_string(),
            header: "header.html".to_string(),
            menu: "menu.html".to_string(),
            footer: "footer.html".to_string(),
            entry: "entry.html".to_string(),
            bare: "bare.html".to_string(),
        }
    }
}

/// A video host recognized in `media` lists.
///
/// A media URL containing `marker` is a video; its embeddable form replaces
/// `marker` with `embed`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VideoHost {
    pub marker: String,
    pub embed: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MediaConfig {
    /// URL prefix for bare asset file names.
    pub assets_prefix: String,
    pub video_hosts: Vec<VideoHost>,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            assets_prefix: "/assets/".to_string(),
            video_hosts: vec![
                VideoHost {
                    marker: "youtube.com/watch?v=".to_string(),
                    embed: "youtube.com/embed/".to_string(),
                },
                VideoHost {
                    marker: "youtu.be/".to_string(),
                    embed: "www.youtube.com/embed/".to_string(),
                },
                VideoHost {
                    marker: "vimeo.com/".to_string(),
                    embed: "player.vimeo.com/video/".to_string(),
                },
            ],
        }
    }
}

/// Absolute directories the pipeline reads from and writes to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SitePaths {
    pub content: PathBuf,
    pub templates: PathBuf,
    pub output: PathBuf,
}

impl SiteConfig {
    /// Validate config values are usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let paths = [
            ("paths.content", &self.paths.content),
            ("paths.templates", &self.paths.templates),
            ("paths.output", &self.paths.output),
            ("content.home", &self.content.home),
        ];
        for (key, value) in paths {
            if value.trim().is_empty() {
                return Err(ConfigError::Validation(format!("{key} must not be empty")));
            }
        }
        if Path::new(&self.paths.output) == Path::new(&self.paths.content) {
            return Err(ConfigError::Validation(
                "paths.output must differ from paths.content".into(),
            ));
        }

        let prefix = &self.media.assets_prefix;
        if !prefix.starts_with('/') || !prefix.ends_with('/') {
            return Err(ConfigError::Validation(
                "media.assets_prefix must start and end with '/'".into(),
            ));
        }
        if self.media.video_hosts.iter().any(|h| h.marker.is_empty()) {
            return Err(ConfigError::Validation(
                "media.video_hosts markers must not be empty".into(),
            ));
        }

        let mut names: Vec<&str> = Vec::new();
        for name in self.content.singletons.iter().chain(&self.content.collections) {
            if name.trim().is_empty() {
                return Err(ConfigError::Validation(
                    "content.singletons and content.collections must not contain empty names"
                        .into(),
                ));
            }
            if names.contains(&name.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "content name '{name}' is declared twice"
                )));
            }
            names.push(name);
        }
        Ok(())
    }

    /// Resolve the configured directories against the project root.
    ///
    /// `output_override` (from the command line) wins over `paths.output`.
    pub fn resolve_paths(&self, root: &Path, output_override: Option<&Path>) -> SitePaths {
        SitePaths {
            content: root.join(&self.paths.content),
            templates: root.join(&self.paths.templates),
            output: output_override
                .map(Path::to_path_buf)
                .unwrap_or_else(|| root.join(&self.paths.output)),
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(SiteConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay, arrays included, replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `site.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_config(root: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = root.join(CONFIG_FILE);
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<SiteConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `site.toml` in the project root.
pub fn load_config(root: &Path) -> Result<SiteConfig, ConfigError> {
    let base = stock_defaults_value();
    let overlay = load_raw_config(root)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `site.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Site Configuration
# ==================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys cause an error.

[site]
# Title of the home page.
title = "Game Studio"

# ---------------------------------------------------------------------------
# Directories, relative to the directory holding this file
# ---------------------------------------------------------------------------
[paths]
content = "src/content"
templates = "src/templates"
output = "site"

# ---------------------------------------------------------------------------
# Content categories
# ---------------------------------------------------------------------------
[content]
# Home page source. Each `# Heading` in it becomes a section.
home = "index.md"

# Pages exposed to the home template as {{about}}, {{contacts}}, ...
singletons = ["about", "contacts"]

# Directories whose files each get a page at /<collection>/<name>/.
# A home section whose heading matches a collection renders its grid.
collections = ["projects", "games"]

# Home section rendered as a contact list.
contacts_section = "contacts"

# ---------------------------------------------------------------------------
# Template file names, inside paths.templates
# ---------------------------------------------------------------------------
[templates]
home = "index.html"
header = "header.html"
menu = "menu.html"
footer = "footer.html"
entry = "entry.html"
bare = "bare.html"

# ---------------------------------------------------------------------------
# Media
# ---------------------------------------------------------------------------
[media]
# Bare file names in frontmatter (preview_image, media, store images)
# resolve under this URL prefix.
assets_prefix = "/assets/"

# Media URLs containing `marker` are videos, embedded by replacing
# `marker` with `embed`.
video_hosts = [
    { marker = "youtube.com/watch?v=", embed = "youtube.com/embed/" },
    { marker = "youtu.be/", embed = "www.youtube.com/embed/" },
    { marker = "vimeo.com/", embed = "player.vimeo.com/video/" },
]
"##
}
