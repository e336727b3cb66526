//! Filesystem access for the dispatcher: stat, directory enumeration and
//! opening files for streaming.

use std::{
    fs::Metadata,
    path::{Component, Path, PathBuf},
};

use axum::{
    body::Body,
    extract::Request,
    response::{IntoResponse, Response},
};
use tokio::fs;
use tower::ServiceExt;
use tower_http::services::ServeFile;
use tracing::{debug, error, warn};

use crate::{error::BrowseError, page::Entry};

/// Stats `path`, following symlinks.
///
/// Every failure here is reported as `NotFound`: a loop, an over-long name or
/// a missing search permission all mean the client cannot reach the path.
pub async fn stat(path: &Path) -> Result<Metadata, BrowseError> {
    fs::metadata(path).await.map_err(|e| {
        debug!("Cannot stat {}: {}", path.display(), e);
        BrowseError::NotFound(path.to_path_buf())
    })
}

/// Lists the immediate children of `dir` in OS enumeration order.
///
/// Symlinks are followed to decide `is_dir`; a dangling link counts as a file.
/// Names that are not valid UTF-8 are skipped.
pub async fn list_children(dir: &Path) -> Result<Vec<Entry>, BrowseError> {
    let mut reader = fs::read_dir(dir)
        .await
        .map_err(|e| BrowseError::from_io(dir, e))?;

    let mut entries = Vec::new();
    // An error mid-way fails the whole listing rather than returning a partial one
    while let Some(entry) = reader.next_entry().await.map_err(|source| BrowseError::Io {
        path: dir.to_path_buf(),
        source,
    })? {
        let name = match entry.file_name().into_string() {
            Ok(n) => n,
            Err(raw) => {
                warn!(
                    "Skipping entry with non-UTF8 filename {:?} in {}",
                    raw,
                    dir.display()
                );
                continue;
            }
        };

        // file_type() does not traverse symlinks, so look through them explicitly
        let file_type = entry.file_type().await.map_err(|source| BrowseError::Io {
            path: entry.path(),
            source,
        })?;
        let is_dir = if file_type.is_symlink() {
            fs::metadata(entry.path())
                .await
                .map(|m| m.is_dir())
                .unwrap_or(false)
        } else {
            file_type.is_dir()
        };

        entries.push(Entry::new(name, is_dir));
    }

    Ok(entries)
}

/// Sends the file at `path` as the response to `request`.
///
/// Range requests (206), conditional GETs (304) and HEAD are answered by
/// `ServeFile`; Content-Type is guessed from the extension.
pub async fn read_file(path: &Path, request: Request) -> Response {
    let mime_type = mime_guess::from_path(path).first_or_octet_stream();
    let service = ServeFile::new_with_mime(path, &mime_type);

    match service.oneshot(request).await {
        Ok(response) => response.map(Body::new).into_response(),
        Err(never) => match never {},
    }
}

/// Resolves `requested` against the filesystem and ensures it stays inside
/// `root` (which must already be canonical).
///
/// Paths that are lexically outside the root are refused before touching the
/// filesystem, so the answer never depends on what exists out there.
pub async fn confine(root: &Path, requested: &Path) -> Result<PathBuf, BrowseError> {
    if !lexically_normalize(requested).starts_with(root) {
        error!(
            "Path traversal attempt: '{}' is outside root '{}'",
            requested.display(),
            root.display()
        );
        return Err(BrowseError::Forbidden(requested.to_path_buf()));
    }

    let canonical = fs::canonicalize(requested).await.map_err(|e| {
        debug!("Cannot resolve {}: {}", requested.display(), e);
        BrowseError::NotFound(requested.to_path_buf())
    })?;

    // A symlink inside the root may still point elsewhere
    if canonical.starts_with(root) {
        Ok(canonical)
    } else {
        error!(
            "Path traversal attempt: '{}' resolved to '{}' which is outside root '{}'",
            requested.display(),
            canonical.display(),
            root.display()
        );
        Err(BrowseError::Forbidden(requested.to_path_buf()))
    }
}

/// Drops `.` and applies `..` without consulting the filesystem.
fn lexically_normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other),
        }
    }
    normalized
}
