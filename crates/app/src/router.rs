use axum::{http::HeaderValue, routing::post, Router};
use thiserror::Error;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};

use crate::console::ProfileConsole;
use crate::onboard;

#[derive(Clone)]
pub struct AppState {
    console: ProfileConsole,
}

impl AppState {
    pub fn new(console: ProfileConsole) -> Self {
        Self { console }
    }

    pub fn console(&self) -> &ProfileConsole {
        &self.console
    }
}

#[derive(Debug, Error)]
pub enum RouterError {
    #[error("invalid CORS origin {origin:?}: {source}")]
    InvalidOrigin {
        origin: String,
        #[source]
        source: axum::http::header::InvalidHeaderValue,
    },
}

/// Builds the credentialed CORS policy for `origins`.
///
/// A literal `*` is not allowed alongside credentials, so any method and any
/// header are granted by echoing what the preflight asks for.
pub fn cors_layer<S: AsRef<str>>(origins: &[S]) -> Result<CorsLayer, RouterError> {
    let origins = origins
        .iter()
        .map(|origin| {
            let origin = origin.as_ref();
            HeaderValue::from_str(origin).map_err(|source| RouterError::InvalidOrigin {
                origin: origin.to_string(),
                source,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request()))
}

pub fn app_router(state: AppState, cors: CorsLayer) -> Router {
    Router::new()
        .route("/onboard", post(onboard::handle))
        .layer(cors)
        .with_state(state)
}
