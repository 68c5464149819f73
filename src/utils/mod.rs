//! Utility functions for listdsl

use anyhow::{anyhow, Result};
use glob::Pattern;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Ensure a directory exists, creating it if necessary
pub fn ensure_directory(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    } else if !path.is_dir() {
        return Err(anyhow!("Path exists but is not a directory: {:?}", path));
    }
    Ok(())
}

/// Get the XDG config directory for listdsl
pub fn get_config_dir() -> Result<PathBuf> {
    let config_dir = dirs::config_dir()
        .ok_or_else(|| anyhow!("Could not determine config directory"))?
        .join("listdsl");

    Ok(config_dir)
}

/// Expand `~` and environment variables in a configured path
pub fn expand_path(path: &Path) -> Result<PathBuf> {
    let path_str = path.to_string_lossy();
    let expanded = shellexpand::full(&path_str)
        .map_err(|e| anyhow!("Failed to expand path {path_str}: {e}"))?;
    Ok(PathBuf::from(expanded.as_ref()))
}

/// Find files under `dir` whose path relative to `dir` matches one of
/// `include` and none of `exclude`. Results are sorted.
pub fn find_matching_files(dir: &Path, include: &[Pattern], exclude: &[Pattern]) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter_map(|entry| {
            let relative = entry.path().strip_prefix(dir).ok()?;
            let included = include.iter().any(|p| p.matches_path(relative));
            let excluded = exclude.iter().any(|p| p.matches_path(relative));
            (included && !excluded).then(|| entry.path().to_path_buf())
        })
        .collect();

    files.sort();
    files
}

/// Calculate SHA256 hash of a string
pub fn calculate_string_hash(content: &str) -> String {
    use sha2::{Digest, Sha256};

    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_find_matching_files() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir_all(root.join("nested/drafts")).unwrap();
        fs::write(root.join("tasks.dsl"), "").unwrap();
        fs::write(root.join("nested/contacts.dsl"), "").unwrap();
        fs::write(root.join("nested/drafts/wip.dsl"), "").unwrap();
        fs::write(root.join("notes.txt"), "").unwrap();

        let include = vec![Pattern::new("**/*.dsl").unwrap()];
        let exclude = vec![Pattern::new("**/drafts/*").unwrap()];
        let files = find_matching_files(root, &include, &exclude);

        assert_eq!(
            files,
            vec![root.join("nested/contacts.dsl"), root.join("tasks.dsl")]
        );
    }

    #[test]
    fn test_ensure_directory() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("a/b");
        ensure_directory(&dir).unwrap();
        assert!(dir.is_dir());

        let file = temp_dir.path().join("file");
        fs::write(&file, "x").unwrap();
        assert!(ensure_directory(&file).is_err());
    }

    #[test]
    fn test_string_hash_is_stable() {
        assert_eq!(
            calculate_string_hash("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}
