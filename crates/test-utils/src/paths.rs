//! Path utilities for locating test data files.
//!
//! Dataset files (NetCDF samples, YAML descriptions) are optional; tests
//! that need them skip through [`crate::require_test_file`] when absent.

use std::path::{Path, PathBuf};

/// Returns the workspace root directory.
pub fn workspace_root() -> PathBuf {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    PathBuf::from(manifest_dir)
        .parent() // crates/
        .and_then(|p| p.parent()) // workspace root
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| PathBuf::from(manifest_dir))
}

/// `crates/{crate_name}/testdata/`
pub fn crate_testdata_dir(crate_name: &str) -> PathBuf {
    workspace_root()
        .join("crates")
        .join(crate_name)
        .join("testdata")
}

/// Searches for a test file in multiple locations.
///
/// This function checks the following locations in order:
/// 1. Environment variable `TEST_DATA_DIR` (if set)
/// 2. `crates/sos-catalog/testdata/`
/// 3. `crates/getobs/testdata/`
/// 4. `testdata/` at the workspace root
/// 5. `config/sos/datasets/` (the sample datasets shipped with the service)
pub fn find_test_file(name: &str) -> Option<PathBuf> {
    let mut candidates = Vec::new();

    if let Ok(test_data_dir) = std::env::var("TEST_DATA_DIR") {
        candidates.push(PathBuf::from(test_data_dir).join(name));
    }

    let root = workspace_root();
    candidates.extend([
        crate_testdata_dir("sos-catalog").join(name),
        crate_testdata_dir("getobs").join(name),
        root.join("testdata").join(name),
        root.join("config/sos/datasets").join(name),
    ]);

    candidates.into_iter().find(|path| path.exists())
}

/// Creates a temporary directory for test output, removed on drop.
pub fn temp_test_dir() -> tempfile::TempDir {
    tempfile::tempdir().expect("Failed to create temporary test directory")
}

/// Write `content` to `dir/name` and return the file path.
pub fn write_test_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("Failed to create test directory");
    }
    std::fs::write(&path, content).expect("Failed to write test file");
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workspace_root_is_valid() {
        let root = workspace_root();
        assert!(
            root.join("Cargo.toml").exists(),
            "Workspace root should contain Cargo.toml: {:?}",
            root
        );
    }

    #[test]
    fn test_write_test_file() {
        let dir = temp_test_dir();
        let path = write_test_file(dir.path(), "datasets/a.yaml", "feature_type: grid\n");
        assert!(path.exists());
        assert_eq!(std::fs::read_to_string(path).unwrap(), "feature_type: grid\n");
    }

    #[test]
    fn test_missing_file_is_none() {
        assert!(find_test_file("definitely_not_here.nc").is_none());
    }
}
