use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use crate::controller::{to_payload, ApiResponse};
use crate::extractors::{
    authenticated_user::AuthenticatedUser, compare_api_version::CompareApiVersion,
    origin_client_id::OriginClientId,
};
use crate::params::smart_folder::IndexParams;
use crate::{AppState, Error};
use domain::{smart_folder as SmartFolderApi, smart_folders::Model, Id};
use events::{DomainEvent, EntityKind};
use log::*;
use service::config::ApiVersion;

/// POST create a new SmartFolder
#[utoipa::path(
    post,
    path = "/smart_folders",
    params(ApiVersion),
    request_body = domain::smart_folders::Model,
    responses(
        (status = 201, description = "Successfully Created a New SmartFolder", body = [domain::smart_folders::Model]),
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
    OriginClientId(origin): OriginClientId,
    State(app_state): State<AppState>,
    Json(smart_folder_model): Json<Model>,
) -> Result<impl IntoResponse, Error> {
    debug!("POST Create a New SmartFolder from: {smart_folder_model:?}");

    if smart_folder_model.name.trim().is_empty() {
        return Err(Error::validation("name must not be empty"));
    }
    if !smart_folder_model.criteria.is_object() {
        return Err(Error::validation("criteria must be a JSON object"));
    }

    let smart_folder =
        SmartFolderApi::create(app_state.db_conn_ref(), user_id, smart_folder_model).await?;

    app_state
        .event_publisher
        .publish(DomainEvent::Created {
            kind: EntityKind::SmartFolder,
            owner_id: user_id,
            entity: to_payload(&smart_folder),
            origin_client_id: origin,
        })
        .await;

    Ok(Json(ApiResponse::new(
        StatusCode::CREATED.into(),
        smart_folder,
    )))
}

/// GET all SmartFolders belonging to the caller.
#[utoipa::path(
    get,
    path = "/smart_folders",
    params(
        ApiVersion,
        ("sort_order" = Option<crate::params::sort::SortOrder>, Query, description = "Sort by board rank: 'asc' or 'desc'.")
    ),
    responses(
        (status = 200, description = "Successfully retrieved all SmartFolders", body = [domain::smart_folders::Model]),
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
    debug!("GET all SmartFolders");

    let smart_folders =
        SmartFolderApi::find_by(app_state.db_conn_ref(), params.scoped(user_id)).await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), smart_folders)))
}

#[utoipa::path(
    put,
    path = "/smart_folders/{id}",
    params(
        ApiVersion,
        ("id" = Id, Path, description = "Id of smart folder to update"),
    ),
    request_body = domain::smart_folders::Model,
    responses(
        (status = 200, description = "Successfully Updated SmartFolder", body = [domain::smart_folders::Model]),
        (status = 400, description = "Bad Request"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "SmartFolder not found"),
        (status = 405, description = "Method not allowed"),
        (status = 503, description = "Service temporarily unavailable")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update(
    CompareApiVersion(_v): CompareApiVersion,
    AuthenticatedUser(user_id): AuthenticatedUser,
    OriginClientId(origin): OriginClientId,
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
    Json(smart_folder_model): Json<Model>,
) -> Result<impl IntoResponse, Error> {
    debug!("PUT Update SmartFolder with id: {id}");

    if smart_folder_model.name.trim().is_empty() {
        return Err(Error::validation("name must not be empty"));
    }
    if !smart_folder_model.criteria.is_object() {
        return Err(Error::validation("criteria must be a JSON object"));
    }

    let smart_folder =
        SmartFolderApi::update(app_state.db_conn_ref(), user_id, id, smart_folder_model).await?;

    app_state
        .event_publisher
        .publish(DomainEvent::Updated {
            kind: EntityKind::SmartFolder,
            owner_id: user_id,
            entity: to_payload(&smart_folder),
            origin_client_id: origin,
        })
        .await;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), smart_folder)))
}

/// DELETE a SmartFolder specified by its primary key.
#[utoipa::path(
    delete,
    path = "/smart_folders/{id}",
    params(
        ApiVersion,
        ("id" = Id, Path, description = "SmartFolder id to delete")
    ),
    responses(
        (status = 200, description = "Successfully deleted a certain SmartFolder by its id", body = [Id]),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "SmartFolder not found"),
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
    OriginClientId(origin): OriginClientId,
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
) -> Result<impl IntoResponse, Error> {
    debug!("DELETE SmartFolder by id: {id}");

    SmartFolderApi::delete_by_id(app_state.db_conn_ref(), user_id, id).await?;

    app_state
        .event_publisher
        .publish(DomainEvent::Deleted {
            kind: EntityKind::SmartFolder,
            owner_id: user_id,
            entity_id: id,
            origin_client_id: origin,
        })
        .await;

    Ok(Json(json!({"id": id})))
}
