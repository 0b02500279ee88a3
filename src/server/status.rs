//! Status endpoints: posting and the public latest-status lookup.
//!
//! `GET /get_status` keeps the original service's JSON contract
//! (`success` plus either the status fields or a `message`), since ring
//! widgets in the wild poll it.

use axum::extract::{Form, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::error;

use super::AppState;
use crate::status::{self, StatusError};
use crate::store;
use crate::types::{SiteId, StatusId};

/// Errors that can occur when posting a status.
#[derive(Debug, Error)]
pub enum StatusApiError {
    /// The site id in the form does not exist.
    #[error("no such site")]
    UnknownSite,

    #[error(transparent)]
    Status(#[from] StatusError),

    #[error("store error: {0}")]
    Store(#[from] sqlx::Error),
}

impl IntoResponse for StatusApiError {
    fn into_response(self) -> Response {
        match &self {
            StatusApiError::UnknownSite => {
                (StatusCode::NOT_FOUND, self.to_string()).into_response()
            }
            StatusApiError::Status(StatusError::TooLong) => {
                (StatusCode::BAD_REQUEST, self.to_string()).into_response()
            }
            StatusApiError::Status(StatusError::Store(err))
            | StatusApiError::Store(err) => {
                error!(error = %err, "status operation failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal error").into_response()
            }
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct StatusForm {
    pub site: SiteId,
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct PostStatusResponse {
    pub ok: bool,
    pub status_id: StatusId,
}

/// `POST /status` — appends a status post for a site.
pub async fn post_status_handler(
    State(app_state): State<AppState>,
    Form(form): Form<StatusForm>,
) -> Result<Json<PostStatusResponse>, StatusApiError> {
    let pool = app_state.pool();
    if store::site_by_id(pool, form.site).await?.is_none() {
        return Err(StatusApiError::UnknownSite);
    }

    let status_id = status::post_status(pool, form.site, &form.status).await?;
    Ok(Json(PostStatusResponse {
        ok: true,
        status_id,
    }))
}

#[derive(Debug, Deserialize)]
pub struct GetStatusParams {
    pub site: Option<String>,
}

/// Latest-status lookup body, in the original wire shape.
#[derive(Debug, Serialize)]
pub struct GetStatusResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<StatusId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl GetStatusResponse {
    fn failure(message: &str) -> Self {
        GetStatusResponse {
            success: false,
            status: None,
            id: None,
            created_at: None,
            message: Some(message.to_string()),
        }
    }
}

/// `GET /get_status?site=ID` — the most recent status for a site.
///
/// All misses are reported in-band (`success: false` with 200), including a
/// missing or non-integer `site` parameter. Widgets polling this endpoint
/// only look at the body, never the HTTP status.
pub async fn get_status_handler(
    State(app_state): State<AppState>,
    Query(params): Query<GetStatusParams>,
) -> Result<Json<GetStatusResponse>, StatusApiError> {
    let site = match params.site.as_deref().map(str::parse::<i64>) {
        Some(Ok(raw)) => SiteId::from(raw),
        Some(Err(_)) | None => {
            return Ok(Json(GetStatusResponse::failure(
                "site parameter missing or not an integer",
            )));
        }
    };

    let record = status::latest_status(app_state.pool(), site).await?;
    let body = match record {
        Some(record) => GetStatusResponse {
            success: true,
            status: Some(record.status),
            id: Some(record.id),
            created_at: Some(record.created_at),
            message: None,
        },
        None => GetStatusResponse::failure("no status found"),
    };
    Ok(Json(body))
}
