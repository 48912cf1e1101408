//! # File I/O Module
//!
//! Reads the bracing catalog and reads/writes project files.
//!
//! - **Atomic saves**: write to a `.tmp` sibling, sync, rename over the target
//! - **Version validation**: reject project files from an incompatible schema
//!
//! The catalog is not schema-validated beyond being parseable JSON in the
//! catalog shape. Missing tables or odd keys surface later as "NA" rows.
//!
//! ## Example
//!
//! ```rust,no_run
//! use bracing_core::file_io::{load_catalog, load_project, save_project};
//! use std::path::Path;
//!
//! let catalog = load_catalog(Path::new("bracing-data.json"))?;
//! let project = load_project(Path::new("house.bracing.json"))?;
//! let report = project.report(&catalog);
//! save_project(&project, Path::new("house.bracing.json"))?;
//! # Ok::<(), bracing_core::errors::BracingError>(())
//! ```

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::catalog::BracingData;
use crate::errors::{BracingError, BracingResult};
use crate::project::{Project, SCHEMA_VERSION};

/// Parse a catalog from JSON text.
pub fn parse_catalog(json: &str) -> BracingResult<BracingData> {
    serde_json::from_str(json).map_err(|e| BracingError::SerializationError {
        reason: format!("Invalid catalog JSON: {}", e),
    })
}

/// Load the bracing catalog from a JSON file.
pub fn load_catalog(path: &Path) -> BracingResult<BracingData> {
    let contents = fs::read_to_string(path)
        .map_err(|e| BracingError::file_error("read catalog", path.display().to_string(), e.to_string()))?;
    let catalog = parse_catalog(&contents)?;
    info!(path = %path.display(), systems = catalog.systems.len(), types = catalog.type_count(), "loaded catalog");
    Ok(catalog)
}

/// Save a project with atomic write semantics.
///
/// The JSON is written to `<path>.tmp`, synced, then renamed over `path`,
/// so an interrupted save never leaves a truncated project file.
pub fn save_project(project: &Project, path: &Path) -> BracingResult<()> {
    let json = serde_json::to_string_pretty(project)?;
    let tmp_path = tmp_path_for(path);

    let mut tmp_file = File::create(&tmp_path).map_err(|e| {
        BracingError::file_error("create temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    tmp_file.write_all(json.as_bytes()).map_err(|e| {
        BracingError::file_error("write temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    tmp_file.sync_all().map_err(|e| {
        BracingError::file_error("sync temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        BracingError::file_error("rename to final", path.display().to_string(), e.to_string())
    })?;

    info!(path = %path.display(), tabs = project.tabs.len(), "saved project");
    Ok(())
}

/// Load a project file.
///
/// # Returns
///
/// * `Ok(Project)` - Successfully loaded project
/// * `Err(BracingError::VersionMismatch)` - File version is incompatible
/// * `Err(BracingError::SerializationError)` - Invalid JSON
/// * `Err(BracingError::FileError)` - I/O error
pub fn load_project(path: &Path) -> BracingResult<Project> {
    let contents = fs::read_to_string(path)
        .map_err(|e| BracingError::file_error("read", path.display().to_string(), e.to_string()))?;

    let project: Project = serde_json::from_str(&contents).map_err(|e| BracingError::SerializationError {
        reason: format!("Invalid JSON in {}: {}", path.display(), e),
    })?;

    validate_version(&project.meta.version)?;

    info!(path = %path.display(), tabs = project.tabs.len(), "loaded project");
    Ok(project)
}

fn tmp_path_for(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Check that a file's schema version is readable by this build.
///
/// Major versions must match; within 0.x, a newer minor version is rejected.
fn validate_version(file_version: &str) -> BracingResult<()> {
    let mismatch = || BracingError::VersionMismatch {
        file_version: file_version.to_string(),
        expected_version: SCHEMA_VERSION.to_string(),
    };

    let file_parts: Vec<u32> = file_version.split('.').filter_map(|p| p.parse().ok()).collect();
    let current_parts: Vec<u32> = SCHEMA_VERSION.split('.').filter_map(|p| p.parse().ok()).collect();

    if file_parts.is_empty() || current_parts.is_empty() {
        return Err(mismatch());
    }
    if file_parts[0] != current_parts[0] {
        return Err(mismatch());
    }
    if current_parts[0] == 0
        && file_parts.len() > 1
        && current_parts.len() > 1
        && file_parts[1] > current_parts[1]
    {
        return Err(mismatch());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("house.bracing.json");

        let project = Project::new("Smith House", "25-017", "J Smith");
        save_project(&project, &path).unwrap();

        let loaded = load_project(&path).unwrap();
        assert_eq!(loaded.info, project.info);
        assert_eq!(loaded.tabs, project.tabs);
        assert_eq!(loaded.tabs_data, project.tabs_data);
    }

    #[test]
    fn test_atomic_save_creates_no_tmp_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("atomic.json");

        save_project(&Project::default(), &path).unwrap();

        assert!(!tmp_path_for(&path).exists());
        assert!(path.exists());
    }

    #[test]
    fn test_tmp_path_keeps_full_name() {
        let tmp = tmp_path_for(Path::new("/work/house.bracing.json"));
        assert_eq!(tmp, Path::new("/work/house.bracing.json.tmp"));
    }

    #[test]
    fn test_load_rejects_newer_schema() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("future.json");
        let mut project = Project::default();
        project.meta.version = "0.9.0".to_string();
        save_project(&project, &path).unwrap();

        assert_eq!(load_project(&path).unwrap_err().error_code(), "VERSION_MISMATCH");
    }

    #[test]
    fn test_version_validation() {
        assert!(validate_version(SCHEMA_VERSION).is_ok());
        assert!(validate_version("0.1.7").is_ok());
        assert!(validate_version("1.0.0").is_err());
        assert!(validate_version("0.2.0").is_err());
        assert!(validate_version("garbage").is_err());
    }

    #[test]
    fn test_catalog_errors() {
        assert_eq!(parse_catalog("{ nope").unwrap_err().error_code(), "SERIALIZATION_ERROR");
        let missing = load_catalog(Path::new("/definitely/not/here.json")).unwrap_err();
        assert_eq!(missing.error_code(), "FILE_ERROR");
    }

    #[test]
    fn test_load_catalog_from_disk() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        fs::write(&path, r#"{ "systems": [ { "name": "GIB", "types": [] } ] }"#).unwrap();
        let catalog = load_catalog(&path).unwrap();
        assert_eq!(catalog.systems[0].name, "GIB");
    }
}
