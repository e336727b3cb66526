//! Maps request paths onto the three possible answers: the volume view, a
//! directory listing, or the raw bytes of a file.

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use axum::{
    extract::{Path as AxumPath, Request, State},
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use tower_http::trace::TraceLayer;
use tracing::{debug, info};

use crate::{
    error::BrowseError,
    fs,
    page::{Listing, PageTemplate},
    volumes::VolumeSource,
};

pub type SharedState = Arc<AppState>;

/// Read-only state shared by every request.
pub struct AppState {
    pub template: PageTemplate,
    pub volumes: Box<dyn VolumeSource>,
    /// Canonical directory all requests are confined to, if any.
    pub root: Option<PathBuf>,
}

pub fn router(state: SharedState) -> Router {
    Router::new()
        // `/*path` never matches the bare root, so the volume view gets its own route
        .route("/", get(volumes_handler))
        .route("/*path", get(path_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn volumes_handler(
    State(state): State<SharedState>,
    request: Request,
) -> Result<Response, BrowseError> {
    handle(&state, "", request).await
}

async fn path_handler(
    State(state): State<SharedState>,
    AxumPath(captured): AxumPath<String>,
    request: Request,
) -> Result<Response, BrowseError> {
    handle(&state, &captured, request).await
}

/// Answers a request for the captured, percent-decoded path.
///
/// `request` is only consumed when the path is a file, so range and
/// conditional headers reach the file responder.
pub async fn handle(
    state: &AppState,
    captured: &str,
    request: Request,
) -> Result<Response, BrowseError> {
    // Synthetic root: one directory entry per volume, no way up
    let Some(requested) = normalize_request_path(captured) else {
        let names = state.volumes.list_volumes()?;
        debug!(count = names.len(), "Serving volume view");
        return render(&state.template, &Listing::volumes(names));
    };

    // With a configured root, refuse anything outside it before looking further
    let path = match &state.root {
        Some(root) => fs::confine(root, &requested).await?,
        None => requested,
    };

    let metadata = fs::stat(&path).await?;
    if !metadata.is_dir() {
        info!("Streaming file: {}", path.display());
        return Ok(fs::read_file(&path, request).await);
    }

    // Directory: list immediate children, offer the "go up" action
    let entries = fs::list_children(&path).await?;
    debug!(count = entries.len(), "Listing directory {}", path.display());
    render(&state.template, &Listing::directory(entries))
}

/// Turns a route capture into a filesystem path. `None` is the volume view.
///
/// Captures that are already absolute on this host (`C:\Users`, or `/boot`
/// from an encoded `%2Fboot`) are used as they are; anything else is
/// anchored at the filesystem root.
pub fn normalize_request_path(captured: &str) -> Option<PathBuf> {
    if captured.is_empty() {
        return None;
    }
    let path = Path::new(captured);
    if path.is_absolute() {
        Some(path.to_path_buf())
    } else {
        Some(Path::new("/").join(path))
    }
}

fn render(template: &PageTemplate, listing: &Listing) -> Result<Response, BrowseError> {
    Ok(Html(template.render_listing(listing)?).into_response())
}
