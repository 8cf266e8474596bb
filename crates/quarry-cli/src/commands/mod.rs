pub mod assemble;
pub mod catalog;
pub mod completions;
pub mod repository;
pub mod resolve;

use quarry_core::CoreError;
use quarry_schema::{default_catalog, parse_catalog_file, Catalog};
use std::path::{Path, PathBuf};
use tracing::debug;

pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_FAILURE: u8 = 1;
pub const EXIT_INPUT_ERROR: u8 = 2;
pub const EXIT_RESOLVE_ERROR: u8 = 3;

/// Environment variable naming a catalog file when `--catalog` is absent.
pub const CATALOG_ENV: &str = "QUARRY_CATALOG";

/// Map an error message rendered from [`CoreError`] to the process exit code.
pub fn exit_code_for(msg: &str) -> u8 {
    if msg.starts_with("catalog error:") || msg.starts_with("request error:") {
        EXIT_INPUT_ERROR
    } else if msg.starts_with("assembly error:") {
        EXIT_RESOLVE_ERROR
    } else {
        EXIT_FAILURE
    }
}

pub fn json_pretty(value: &impl serde::Serialize) -> Result<String, String> {
    serde_json::to_string_pretty(value).map_err(|e| format!("JSON serialization failed: {e}"))
}

/// Load the catalog from `--catalog`, then `$QUARRY_CATALOG`, then the built-in one.
pub fn load_catalog(path: Option<&Path>) -> Result<Catalog, String> {
    let configured = path.map(Path::to_path_buf).or_else(|| {
        std::env::var_os(CATALOG_ENV)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
    });
    let catalog = match configured {
        Some(path) => {
            debug!("loading catalog from {}", path.display());
            parse_catalog_file(&path)
        }
        None => {
            debug!("using built-in catalog");
            default_catalog()
        }
    }
    .map_err(|e| CoreError::from(e).to_string())?;
    debug!(
        "catalog {} with {} runtimes, {} components",
        catalog.version,
        catalog.runtimes.len(),
        catalog.components.len()
    );
    Ok(catalog)
}
