//! Output paths and file writing.
//!
//! Every page is written as `index.html` inside its own directory, so URLs stay
//! clean:
//!
//! ```text
//! site/
//! ├── index.html                 # Home
//! ├── games/starfall/index.html  # Collection entry → /games/starfall/
//! ├── projects/demo/index.html
//! └── legal/index.html           # permalink: /legal (or /legal/)
//! ```
//!
//! Writes overwrite unconditionally and create parent directories as needed.

use crate::naming;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Where a rendered page goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageTarget {
    Home,
    Entry { collection: String, name: String },
    /// A normalized permalink: no leading or trailing slash.
    Permalink(String),
}

impl PageTarget {
    /// Target for a declared permalink, or `None` if it is unusable (see
    /// [`naming::normalize_permalink`]).
    pub fn permalink(declared: &str) -> Option<Self> {
        naming::normalize_permalink(declared).map(PageTarget::Permalink)
    }

    /// Path of the page's file, relative to the output root.
    pub fn relative_path(&self) -> PathBuf {
        match self {
            PageTarget::Home => PathBuf::from("index.html"),
            PageTarget::Entry { collection, name } => {
                Path::new(collection).join(name).join("index.html")
            }
            PageTarget::Permalink(path) => path
                .split('/')
                .fold(PathBuf::new(), |acc, seg| acc.join(seg))
                .join("index.html"),
        }
    }

    /// Site-absolute URL the page is served at.
    pub fn url(&self) -> String {
        match self {
            PageTarget::Home => "/".to_string(),
            PageTarget::Entry { collection, name } => format!("/{collection}/{name}/"),
            PageTarget::Permalink(path) => format!("/{path}/"),
        }
    }
}

/// Write `html` for `target` under `output_dir`. Returns the relative path.
pub fn write_page(output_dir: &Path, target: &PageTarget, html: &str) -> io::Result<PathBuf> {
    let rel = target.relative_path();
    let path = output_dir.join(&rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&path, html)?;
    Ok(rel)
}
