use std::{io, path::PathBuf};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::{error, info};

use crate::volumes::VolumeError;

/// Everything that can go wrong while answering a browse request.
#[derive(Debug, Error)]
pub enum BrowseError {
    #[error("path not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("path resolves outside the served root: {}", .0.display())]
    Forbidden(PathBuf),

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to encode listing: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("failed to enumerate volumes: {0}")]
    Volumes(#[from] VolumeError),
}

impl BrowseError {
    /// Classifies an OS error raised while touching `path`.
    ///
    /// Missing or malformed paths are reported as `NotFound`; every other
    /// failure (permissions included) is an internal error.
    pub fn from_io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            io::ErrorKind::NotFound
            | io::ErrorKind::NotADirectory
            | io::ErrorKind::InvalidInput => BrowseError::NotFound(path),
            _ => BrowseError::Io { path, source },
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            BrowseError::NotFound(_) => StatusCode::NOT_FOUND,
            BrowseError::Forbidden(_) => StatusCode::FORBIDDEN,
            BrowseError::Io { .. } | BrowseError::Encode(_) | BrowseError::Volumes(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for BrowseError {
    fn into_response(self) -> Response {
        let status = self.status();
        match status {
            StatusCode::NOT_FOUND => info!("{}", self),
            _ => error!("{}", self),
        }
        status_response(status)
    }
}

/// Plain response carrying only the canonical status message.
/// The cause stays in the server log.
pub fn status_response(status: StatusCode) -> Response {
    let message = status.canonical_reason().unwrap_or("Error");
    (status, message).into_response()
}
