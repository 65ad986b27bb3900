//! JSON API over one shared explorer session.
//!
//! - `GET /network`: what is loaded
//! - `GET /samples`: bundled sample networks
//! - `POST /network/sample/{name}`: load a sample
//! - `POST /network/upload`: load an uploaded archive
//! - `GET /views/{summary,temporal,geospatial,metadata}`: view output

mod handlers;
mod types;

use std::net::SocketAddr;
use std::sync::{Arc, RwLock};

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use tracing::info;

use crate::session::Session;
use crate::shape::color::CarrierPalette;

pub use types::{ErrorResponse, NetworkInfo, SampleInfo, ViewQuery};

/// Largest accepted upload.
const UPLOAD_LIMIT_BYTES: usize = 64 * 1024 * 1024;

/// State shared across all request handlers.
///
/// The session is replaced as a whole by the load endpoints. Handlers take
/// the lock only inside synchronous sections.
pub struct AppState {
    session: RwLock<Option<Session>>,
    palette: CarrierPalette,
}

impl AppState {
    /// State with no network loaded yet.
    pub fn empty(palette: CarrierPalette) -> Self {
        Self {
            session: RwLock::new(None),
            palette,
        }
    }

    /// State serving an already loaded session.
    pub fn with_session(session: Session) -> Self {
        let palette = session.palette().clone();
        Self {
            session: RwLock::new(Some(session)),
            palette,
        }
    }
}

/// Builds the axum router with all API routes.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/network", get(handlers::get_network))
        .route("/samples", get(handlers::get_samples))
        .route("/network/sample/{name}", post(handlers::load_sample))
        .route("/network/upload", post(handlers::upload_network))
        .route("/views/summary", get(handlers::get_summary))
        .route("/views/temporal", get(handlers::get_temporal))
        .route("/views/geospatial", get(handlers::get_geospatial))
        .route("/views/metadata", get(handlers::get_metadata))
        .layer(DefaultBodyLimit::max(UPLOAD_LIMIT_BYTES))
        .with_state(state)
}

/// Binds to the given address and serves the API until the process exits.
///
/// # Errors
///
/// Returns an `io::Error` if the listener cannot bind or the server fails.
pub async fn serve(state: Arc<AppState>, addr: SocketAddr) -> std::io::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "API server listening");
    axum::serve(listener, app).await
}
