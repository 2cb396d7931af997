use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use crate::controller::ApiResponse;
use crate::extractors::{
    authenticated_user::AuthenticatedUser, compare_api_version::CompareApiVersion,
};
use crate::params::tag::IndexParams;
use crate::{AppState, Error};
use domain::{tag as TagApi, tags::Model, Id};
use log::*;
use service::config::ApiVersion;

// Tag mutations are not broadcast: clients resolve tag ids against the flat
// tag list on their next refetch.

/// POST create a new Tag
#[utoipa::path(
    post,
    path = "/tags",
    params(ApiVersion),
    request_body = domain::tags::Model,
    responses(
        (status = 201, description = "Successfully Created a New Tag", body = [domain::tags::Model]),
        (status = 400, description = "Bad Request"),
        (status = 401, description = "Unauthorized"),
        (status = 405, description = "Method not allowed"),
        (status = 503, description = "Service temporarily unavailable")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create(
    CompareApiVersion(_v): CompareApiVersion,
    AuthenticatedUser(user_id): AuthenticatedUser,
    State(app_state): State<AppState>,
    Json(tag_model): Json<Model>,
) -> Result<impl IntoResponse, Error> {
    debug!("POST Create a New Tag from: {tag_model:?}");

    if tag_model.name.trim().is_empty() {
        return Err(Error::validation("name must not be empty"));
    }

    let tag = TagApi::create(app_state.db_conn_ref(), user_id, tag_model).await?;

    Ok(Json(ApiResponse::new(StatusCode::CREATED.into(), tag)))
}

/// GET all Tags belonging to the caller.
#[utoipa::path(
    get,
    path = "/tags",
    params(ApiVersion),
    responses(
        (status = 200, description = "Successfully retrieved all Tags", body = [domain::tags::Model]),
        (status = 401, description = "Unauthorized"),
        (status = 405, description = "Method not allowed"),
        (status = 503, description = "Service temporarily unavailable")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn index(
    CompareApiVersion(_v): CompareApiVersion,
    AuthenticatedUser(user_id): AuthenticatedUser,
    State(app_state): State<AppState>,
    Query(params): Query<IndexParams>,
) -> Result<impl IntoResponse, Error> {
    debug!("GET all Tags");

    let tags = TagApi::find_by(app_state.db_conn_ref(), params.scoped(user_id)).await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), tags)))
}

/// DELETE a Tag specified by its primary key.
#[utoipa::path(
    delete,
    path = "/tags/{id}",
    params(
        ApiVersion,
        ("id" = Id, Path, description = "Tag id to delete")
    ),
    responses(
        (status = 200, description = "Successfully deleted a certain Tag by its id", body = [Id]),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Tag not found"),
        (status = 405, description = "Method not allowed"),
        (status = 503, description = "Service temporarily unavailable")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete(
    CompareApiVersion(_v): CompareApiVersion,
    AuthenticatedUser(user_id): AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
) -> Result<impl IntoResponse, Error> {
    debug!("DELETE Tag by id: {id}");

    TagApi::delete_by_id(app_state.db_conn_ref(), user_id, id).await?;

    Ok(Json(json!({"id": id})))
}
