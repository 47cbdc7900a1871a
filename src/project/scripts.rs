//! Test script discovery

use std::io;
use std::path::Path;

/// List script file names with the given extension, sorted by name
///
/// Fails only when the directory itself cannot be read.
pub fn list_scripts(scripts_dir: &Path, extension: &str) -> io::Result<Vec<String>> {
    let entries = std::fs::read_dir(scripts_dir)?;

    let mut scripts: Vec<String> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .filter(|path| path.extension().is_some_and(|ext| ext == extension))
        .filter_map(|path| path.file_name().map(|n| n.to_string_lossy().into_owned()))
        .collect();
    scripts.sort();
    Ok(scripts)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lists_matching_files_sorted() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["zeta.py", "alpha.py", "notes.txt", "helper.pyc"] {
            std::fs::write(dir.path().join(name), "").unwrap();
        }
        std::fs::create_dir(dir.path().join("fixtures.py")).unwrap();

        assert_eq!(list_scripts(dir.path(), "py").unwrap(), vec!["alpha.py", "zeta.py"]);
    }

    #[test]
    fn test_missing_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = list_scripts(&dir.path().join("tests"), "py").unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::NotFound);
    }
}
