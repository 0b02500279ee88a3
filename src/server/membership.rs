//! Membership endpoints: register, deregister, login.
//!
//! Thin form-to-registry adapters. Validation and lookup failures become
//! user-facing 4xx responses; store and topology failures are logged and
//! surface as a generic 500.

use axum::extract::{Form, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::error;

use super::AppState;
use crate::registry::{self, RegistryError};
use crate::types::SiteId;

/// Errors that can occur on a membership endpoint.
#[derive(Debug, Error)]
pub enum MembershipError {
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

impl IntoResponse for MembershipError {
    fn into_response(self) -> Response {
        let MembershipError::Registry(err) = self;
        let status = match &err {
            RegistryError::InvalidUrl
            | RegistryError::InvalidEmail
            | RegistryError::PasswordTooShort => StatusCode::BAD_REQUEST,
            RegistryError::DuplicateUrl => StatusCode::CONFLICT,
            RegistryError::NotFound => StatusCode::NOT_FOUND,
            RegistryError::WrongPassword => StatusCode::UNAUTHORIZED,
            RegistryError::PasswordHash | RegistryError::Ring(_) | RegistryError::Store(_) => {
                error!(error = %err, "membership operation failed");
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(MembershipResponse::err("internal error")),
                )
                    .into_response();
            }
        };
        (status, Json(MembershipResponse::err(err.to_string()))).into_response()
    }
}

#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    pub url: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct DeregisterForm {
    pub url: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Response body shared by the membership endpoints.
#[derive(Debug, Serialize)]
pub struct MembershipResponse {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site_id: Option<SiteId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl MembershipResponse {
    fn ok(site_id: Option<SiteId>) -> Self {
        MembershipResponse {
            ok: true,
            site_id,
            error: None,
        }
    }

    fn err(message: impl Into<String>) -> Self {
        MembershipResponse {
            ok: false,
            site_id: None,
            error: Some(message.into()),
        }
    }
}

/// `POST /register` — adds a site to the ring.
pub async fn register_handler(
    State(app_state): State<AppState>,
    Form(form): Form<RegisterForm>,
) -> Result<Json<MembershipResponse>, MembershipError> {
    let id = registry::register(app_state.pool(), &form.url, &form.email, &form.password).await?;
    Ok(Json(MembershipResponse::ok(Some(id))))
}

/// `POST /deregister` — removes a site after a credential check.
pub async fn deregister_handler(
    State(app_state): State<AppState>,
    Form(form): Form<DeregisterForm>,
) -> Result<Json<MembershipResponse>, MembershipError> {
    registry::deregister(app_state.pool(), &form.url, &form.password).await?;
    Ok(Json(MembershipResponse::ok(None)))
}

/// `POST /login` — checks a credential and returns the member's site id.
pub async fn login_handler(
    State(app_state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> Result<Json<MembershipResponse>, MembershipError> {
    let id = registry::login(app_state.pool(), &form.email, &form.password).await?;
    Ok(Json(MembershipResponse::ok(Some(id))))
}
