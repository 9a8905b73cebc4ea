//! Static file serving module
//!
//! Resolves request paths under the deployment root. A path is served only if
//! it normalizes to a location inside the root, contains no dot-file segment,
//! and its canonical form (after symlinks) still lies inside the root.

use super::mime;
use crate::Result;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticFile {
    pub content: Vec<u8>,
    pub content_type: &'static str,
}

/// Normalize a URL path into a root-relative file path.
///
/// Returns `None` for paths that climb above the root, touch a dot-file or
/// name nothing at all.
pub fn normalize_request_path(path: &str) -> Option<PathBuf> {
    let mut segments: Vec<&str> = Vec::new();

    for segment in path.split(['/', '\\']) {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop()?;
            }
            s if s.starts_with('.') => return None,
            s => segments.push(s),
        }
    }

    if segments.is_empty() {
        None
    } else {
        Some(segments.iter().collect())
    }
}

/// Load a file below `root` for the given URL path.
///
/// `Ok(None)` means there is nothing servable at that path.
pub async fn load(root: &Path, request_path: &str) -> Result<Option<StaticFile>> {
    let Some(relative) = normalize_request_path(request_path) else {
        tracing::debug!("Rejected static path '{}'", request_path);
        return Ok(None);
    };

    let root_canonical = match fs::canonicalize(root).await {
        Ok(p) => p,
        Err(e) => {
            tracing::warn!(
                "Static root not found or inaccessible '{}': {}",
                root.display(),
                e
            );
            return Ok(None);
        }
    };

    // File not found is common (404), no need to log at warning level
    let Ok(file_canonical) = fs::canonicalize(root.join(&relative)).await else {
        return Ok(None);
    };
    if !file_canonical.starts_with(&root_canonical) {
        tracing::warn!(
            "Path traversal attempt blocked: {} -> {}",
            request_path,
            file_canonical.display()
        );
        return Ok(None);
    }

    match fs::metadata(&file_canonical).await {
        Ok(meta) if meta.is_file() => {}
        _ => return Ok(None),
    }

    let content = match fs::read(&file_canonical).await {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            tracing::error!(
                "Failed to read file '{}': {}",
                file_canonical.display(),
                e
            );
            return Err(e.into());
        }
    };

    Ok(Some(StaticFile {
        content,
        content_type: mime::content_type_for(&file_canonical),
    }))
}
