//! Load entity definitions from files and directories

use crate::definition::DefinitionSet;
use crate::document::{parse_json, parse_toml};
use crate::error::{LoadError, Result};
use crate::source::parse_source;
use entity_metadata::entity::EntityType;
use std::fs;
use std::path::Path;
use std::sync::Arc;

const SKIPPED_DIRS: &[&str] = &["target", ".git", "node_modules", ".venv"];

/// Parse a single `.rs`, `.toml` or `.json` file
pub fn load_file(path: &Path) -> Result<DefinitionSet> {
    let ext = path.extension().and_then(|s| s.to_str()).unwrap_or("");
    if !is_supported(ext) {
        return Err(LoadError::UnsupportedFormat(path.to_path_buf()));
    }

    let content = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    match ext {
        "rs" => parse_source(&content),
        "toml" => parse_toml(&content),
        _ => parse_json(&content),
    }
}

/// Parse every supported file below `dir`, recursively.
///
/// Files that fail to parse are logged and skipped.
pub fn load_dir(dir: &Path) -> Result<DefinitionSet> {
    let mut set = DefinitionSet::new();
    load_dir_recursive(dir, &mut set)?;
    Ok(set)
}

fn load_dir_recursive(dir: &Path, set: &mut DefinitionSet) -> Result<()> {
    let io_error = |source| LoadError::Io {
        path: dir.to_path_buf(),
        source,
    };
    let mut paths = fs::read_dir(dir)
        .map_err(io_error)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<Vec<_>>>()
        .map_err(io_error)?;
    paths.sort();

    for path in paths {
        if path.is_dir() {
            let skipped = path
                .file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| SKIPPED_DIRS.contains(&name));
            if !skipped {
                load_dir_recursive(&path, set)?;
            }
            continue;
        }

        let ext = path.extension().and_then(|s| s.to_str()).unwrap_or("");
        if !path.is_file() || !is_supported(ext) {
            continue;
        }
        match load_file(&path) {
            Ok(definitions) => {
                log::debug!(
                    "Loaded {} entit{} from {}",
                    definitions.entities().len(),
                    if definitions.entities().len() == 1 { "y" } else { "ies" },
                    path.display()
                );
                set.merge(definitions);
            }
            Err(e) => log::warn!("Failed to parse {}: {}", path.display(), e),
        }
    }
    Ok(())
}

/// Load a file or a directory tree
pub fn load_path(path: &Path) -> Result<DefinitionSet> {
    if path.is_dir() {
        load_dir(path)
    } else {
        load_file(path)
    }
}

/// Load `path` and build entity types for everything found
pub fn load_entities(path: &Path) -> Result<Vec<Arc<EntityType>>> {
    load_path(path)?.build()
}

fn is_supported(ext: &str) -> bool {
    matches!(ext, "rs" | "toml" | "json")
}
