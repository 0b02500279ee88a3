//! Ring listing endpoint.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::error;

use super::AppState;
use crate::ring::{self, RingError};
use crate::types::SiteId;

/// Errors that can occur when listing the ring.
#[derive(Debug, Error)]
pub enum ListingError {
    #[error(transparent)]
    Ring(#[from] RingError),
}

impl IntoResponse for ListingError {
    fn into_response(self) -> Response {
        let ListingError::Ring(err) = self;
        error!(error = %err, "ring listing failed");
        (StatusCode::INTERNAL_SERVER_ERROR, "internal error").into_response()
    }
}

#[derive(Debug, Deserialize)]
pub struct ListingParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// One entry in the ring listing. Only public fields leave the server.
#[derive(Debug, Serialize)]
pub struct RingEntry {
    pub id: SiteId,
    pub url: String,
}

/// `GET /ring?limit=N&offset=M` — valid sites ordered by ascending id.
///
/// Defaults to the first ten sites; the limit is clamped server-side.
pub async fn ring_handler(
    State(app_state): State<AppState>,
    Query(params): Query<ListingParams>,
) -> Result<Json<Vec<RingEntry>>, ListingError> {
    let limit = params.limit.unwrap_or(10);
    let offset = params.offset.unwrap_or(0);

    let sites = ring::list_valid(app_state.pool(), limit, offset).await?;
    let entries = sites
        .into_iter()
        .map(|site| RingEntry {
            id: site.id,
            url: site.url,
        })
        .collect();
    Ok(Json(entries))
}
