// src/discovery.rs
use crate::batch::SourceFile;
use crate::config::BatchSettings;
use anyhow::{Context, Result};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Directories never worth descending into.
const PRUNE_DIRS: &[&str] = &[".git", "target", "node_modules", "__pycache__", ".venv"];

/// Collects source files under `roots` (files or directories).
///
/// Keeps configured extensions, drops oversized files and skips files that
/// are not UTF-8. Results are sorted by path so ids are stable between runs;
/// the same file reached through different spellings is kept once.
///
/// # Errors
/// Returns error if a root does not exist.
pub fn collect_sources(roots: &[PathBuf], settings: &BatchSettings) -> Result<Vec<SourceFile>> {
    let mut paths = Vec::new();
    for root in roots {
        fs::metadata(root).with_context(|| format!("Cannot access {}", root.display()))?;
        let (found, error_count) = walk(root);
        if error_count > 0 {
            tracing::warn!(root = %root.display(), error_count, "errors during file walk");
        }
        paths.extend(found);
    }

    paths.retain(|p| has_allowed_extension(p, &settings.extensions));
    paths.sort();
    // `./x/a.py` and `x/a.py` are one file.
    let mut seen = HashSet::new();
    paths.retain(|p| seen.insert(fs::canonicalize(p).unwrap_or_else(|_| p.clone())));

    Ok(paths
        .into_iter()
        .filter_map(|p| read_source(&p, settings.max_file_bytes))
        .collect())
}

fn walk(root: &Path) -> (Vec<PathBuf>, usize) {
    let walker = WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !should_prune(&e.file_name().to_string_lossy()));

    let mut paths = Vec::new();
    let mut errors = 0;
    for item in walker {
        match item {
            Ok(entry) if entry.file_type().is_file() => paths.push(entry.into_path()),
            Ok(_) => {}
            Err(_) => errors += 1,
        }
    }
    (paths, errors)
}

fn should_prune(name: &str) -> bool {
    PRUNE_DIRS.contains(&name)
}

fn has_allowed_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| extensions.iter().any(|allowed| allowed.eq_ignore_ascii_case(ext)))
}

fn read_source(path: &Path, max_bytes: u64) -> Option<SourceFile> {
    let size = fs::metadata(path).map(|m| m.len()).unwrap_or(0);
    if size > max_bytes {
        tracing::warn!(path = %path.display(), size, max_bytes, "skipping oversized file");
        return None;
    }

    match fs::read(path).map(String::from_utf8) {
        Ok(Ok(content)) => Some(SourceFile::new(normalize_path(path), content)),
        Ok(Err(_)) => {
            tracing::warn!(path = %path.display(), "skipping file that is not valid UTF-8");
            None
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "skipping unreadable file");
            None
        }
    }
}

/// Normalizes a path to use forward slashes.
fn normalize_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Language name for a file, from its extension.
#[must_use]
pub fn detect_language(name: &str) -> &'static str {
    let ext = Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("py") => "python",
        Some("java") => "java",
        Some("js") => "javascript",
        Some("cpp") => "cpp",
        Some("c" | "h") => "c",
        _ => "text",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_language() {
        assert_eq!(detect_language("a/b/main.PY"), "python");
        assert_eq!(detect_language("x.h"), "c");
        assert_eq!(detect_language("Main.java"), "java");
        assert_eq!(detect_language("README"), "text");
        assert_eq!(detect_language("notes.md"), "text");
    }

    #[test]
    fn test_extension_filter() {
        let exts = vec!["py".to_string()];
        assert!(has_allowed_extension(Path::new("a.py"), &exts));
        assert!(has_allowed_extension(Path::new("A.PY"), &exts));
        assert!(!has_allowed_extension(Path::new("a.rs"), &exts));
        assert!(!has_allowed_extension(Path::new("Makefile"), &exts));
    }
}
