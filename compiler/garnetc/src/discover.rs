//! Source file discovery.

use std::fs;
use std::path::{Path, PathBuf};

fn is_source(path: &Path) -> bool {
    path.extension().is_some_and(|e| e == "rb" || e == "rbi")
}

/// Every source under `inputs`, sorted and without duplicates.
///
/// Files are taken as given (whatever their extension); directories are
/// searched recursively for `.rb` and `.rbi` files.
pub fn discover_sources(inputs: &[PathBuf]) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for input in inputs {
        if input.is_dir() {
            discover_recursive(input, &mut files);
        } else {
            files.push(input.clone());
        }
    }
    files.sort();
    files.dedup();
    files
}

fn discover_recursive(dir: &Path, files: &mut Vec<PathBuf>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };

    for entry in entries.flatten() {
        let path = entry.path();

        // Skip hidden files and directories
        if path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|name| name.starts_with('.'))
        {
            continue;
        }

        if path.is_dir() {
            discover_recursive(&path, files);
        } else if is_source(&path) {
            files.push(path);
        }
    }
}
