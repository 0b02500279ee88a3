//! Ring navigation endpoints: next, previous, random.
//!
//! Each resolves to a 307 redirect at a member site's URL, or 404 when the
//! ring has nothing to offer (empty ring, unknown start, or a lap that
//! found no valid site).

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use serde::Deserialize;
use thiserror::Error;
use tracing::{error, info};

use super::AppState;
use crate::ring::{self, RingError};
use crate::types::SiteId;

/// Errors that can occur when resolving a navigation redirect.
#[derive(Debug, Error)]
pub enum RedirectError {
    /// No destination site. Covers an empty ring, an unknown start id, and
    /// an all-invalid ring.
    #[error("no site to redirect to")]
    NoDestination,

    /// Topology or store failure.
    #[error(transparent)]
    Ring(#[from] RingError),
}

impl IntoResponse for RedirectError {
    fn into_response(self) -> Response {
        match &self {
            RedirectError::NoDestination => {
                (StatusCode::NOT_FOUND, self.to_string()).into_response()
            }
            RedirectError::Ring(err) => {
                error!(error = %err, "redirect lookup failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal error").into_response()
            }
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct NavigationParams {
    /// The site the visitor is navigating from.
    pub site: SiteId,
}

/// `GET /next?site=ID` — redirects to the next valid site in the ring.
pub async fn next_handler(
    State(app_state): State<AppState>,
    Query(params): Query<NavigationParams>,
) -> Result<Redirect, RedirectError> {
    let site = ring::find_next_valid(app_state.pool(), params.site)
        .await?
        .ok_or(RedirectError::NoDestination)?;
    info!(from = %params.site, to = %site.id, "next redirect");
    Ok(Redirect::temporary(&site.url))
}

/// `GET /previous?site=ID` — redirects to the previous valid site.
pub async fn previous_handler(
    State(app_state): State<AppState>,
    Query(params): Query<NavigationParams>,
) -> Result<Redirect, RedirectError> {
    let site = ring::find_previous_valid(app_state.pool(), params.site)
        .await?
        .ok_or(RedirectError::NoDestination)?;
    info!(from = %params.site, to = %site.id, "previous redirect");
    Ok(Redirect::temporary(&site.url))
}

/// `GET /random` — redirects to a uniformly random member, valid or not.
pub async fn random_handler(
    State(app_state): State<AppState>,
) -> Result<Redirect, RedirectError> {
    let site = ring::random_site(app_state.pool())
        .await?
        .ok_or(RedirectError::NoDestination)?;
    info!(to = %site.id, "random redirect");
    Ok(Redirect::temporary(&site.url))
}
