use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::controller::ApiResponse;
use crate::extractors::compare_api_version::CompareApiVersion;
use crate::{AppState, Error};
use domain::{jwt, user as UserApi, users};
use log::*;
use service::config::ApiVersion;

/// Login credentials. The password only ever travels in this request body;
/// it is never logged.
#[derive(Debug, Deserialize, ToSchema)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Response to a successful login: the user row plus a bearer token to
/// attach to subsequent requests (header or `token` query parameter for the
/// event stream).
#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub user: users::Model,
    pub token: String,
    pub expires_at: i64,
}

/// POST login with email/password, returning a bearer token.
#[utoipa::path(
    post,
    path = "/session",
    params(ApiVersion),
    request_body = Credentials,
    responses(
        (status = 200, description = "Successfully logged in", body = [LoginResponse]),
        (status = 401, description = "Unauthorized"),
        (status = 405, description = "Method not allowed"),
        (status = 503, description = "Service temporarily unavailable")
    )
)]
pub async fn login(
    CompareApiVersion(_v): CompareApiVersion,
    State(app_state): State<AppState>,
    Json(credentials): Json<Credentials>,
) -> Result<impl IntoResponse, Error> {
    debug!("POST Login for email: {}", credentials.email);

    let user = UserApi::authenticate(
        app_state.db_conn_ref(),
        &credentials.email,
        &credentials.password,
    )
    .await?;

    let access = jwt::issue_access_token(&app_state.config, user.id)?;

    Ok(Json(ApiResponse::new(
        StatusCode::OK.into(),
        LoginResponse {
            user,
            token: access.token,
            expires_at: access.expires_at,
        },
    )))
}
