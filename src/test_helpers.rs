//! Shared test utilities for the studiogen test suite.
//!
//! Provides fixture setup and lookup helpers that work with scan-phase data
//! structures (`Inventory`, `CollectionEntry`, `SpecialPage`).
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = setup_fixtures();
//! let inventory = scan(&tmp.path().join("src/content"), &ContentConfig::default()).unwrap();
//!
//! assert_eq!(entry_names(&inventory, "games"), vec!["starfall", "tideglass", "driftwood"]);
//! let about = find_singleton(&inventory, "about");
//! ```

use std::path::Path;
use tempfile::TempDir;

use crate::scan::Inventory;
use crate::types::{ContentCategory, ContentRecord, SpecialPage};

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy the `fixtures/site/` project to a temp directory and return it.
///
/// Tests get an isolated copy they can mutate without affecting other tests
/// or the source fixtures.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/site");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            std::fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

// =========================================================================
// Inventory lookups; panics with a clear message on miss
// =========================================================================

/// Find a singleton record by name. Panics if not found.
pub fn find_singleton<'a>(inventory: &'a Inventory, name: &str) -> &'a ContentRecord {
    inventory.singleton(name).unwrap_or_else(|| {
        let names: Vec<&str> = inventory
            .records
            .iter()
            .filter_map(|r| match &r.category {
                ContentCategory::Singleton { name } => Some(name.as_str()),
                _ => None,
            })
            .collect();
        panic!("singleton '{name}' not found. Available: {names:?}")
    })
}

/// Find a permalinked page by its declared permalink. Panics if not found.
pub fn find_special<'a>(inventory: &'a Inventory, permalink: &str) -> SpecialPage<'a> {
    inventory
        .special_pages()
        .into_iter()
        .find(|p| p.permalink == permalink)
        .unwrap_or_else(|| {
            let permalinks = special_permalinks(inventory);
            panic!("page '{permalink}' not found. Available: {permalinks:?}")
        })
}

// =========================================================================
// Bulk extractors
// =========================================================================

/// Entry names of a collection in display order.
pub fn entry_names<'a>(inventory: &'a Inventory, collection: &str) -> Vec<&'a str> {
    inventory
        .collection(collection)
        .iter()
        .map(|e| e.name)
        .collect()
}

/// Declared permalinks in scan order.
pub fn special_permalinks(inventory: &Inventory) -> Vec<&str> {
    inventory
        .special_pages()
        .iter()
        .map(|p| p.permalink)
        .collect()
}
