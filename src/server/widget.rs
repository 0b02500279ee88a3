//! Widget endpoint: the HTML snippet members embed on their sites.
//!
//! Peripheral to the ring itself, but kept because it is how member sites
//! link into the navigation endpoints.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use serde::Deserialize;
use thiserror::Error;
use tracing::error;

use super::AppState;
use crate::registry::validation;
use crate::store;
use crate::types::SiteId;

/// Errors that can occur when building a widget.
#[derive(Debug, Error)]
pub enum WidgetError {
    /// URL fails the shape check.
    #[error("malformed URL: expected http(s)://host")]
    InvalidUrl,

    /// The URL is not a ring member.
    #[error("that URL is not in the webring")]
    NotFound,

    #[error("store error: {0}")]
    Store(#[from] sqlx::Error),
}

impl IntoResponse for WidgetError {
    fn into_response(self) -> Response {
        match &self {
            WidgetError::InvalidUrl => (StatusCode::BAD_REQUEST, self.to_string()).into_response(),
            WidgetError::NotFound => (StatusCode::NOT_FOUND, self.to_string()).into_response(),
            WidgetError::Store(err) => {
                error!(error = %err, "widget lookup failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal error").into_response()
            }
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct WidgetParams {
    pub url: String,
}

/// `GET /widget?url=...` — navigation snippet for a member site.
pub async fn widget_handler(
    State(app_state): State<AppState>,
    Query(params): Query<WidgetParams>,
) -> Result<Html<String>, WidgetError> {
    if !validation::is_valid_url(&params.url) {
        return Err(WidgetError::InvalidUrl);
    }

    let url = validation::normalize_url(&params.url);
    let site = store::site_by_url(app_state.pool(), url)
        .await?
        .ok_or(WidgetError::NotFound)?;

    Ok(Html(render_widget(app_state.public_host(), site.id)))
}

/// Renders the prev/home/next/random link strip for a member.
fn render_widget(host: &str, site: SiteId) -> String {
    format!(
        concat!(
            r#"<a href="{host}/previous?site={site}">Previous Site</a>"#,
            r#"<a href="{host}/">WebRing</a>"#,
            r#"<a href="{host}/next?site={site}">Next Site</a>"#,
            r#"<a href="{host}/random">Random Site</a>"#,
        ),
        host = host,
        site = site,
    )
}
