use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use crate::controller::task_controller::ReorderRequest;
use crate::controller::{to_payload, ApiResponse};
use crate::extractors::{
    authenticated_user::AuthenticatedUser, compare_api_version::CompareApiVersion,
    origin_client_id::OriginClientId,
};
use crate::params::folder::IndexParams;
use crate::{AppState, Error};
use domain::{folder as FolderApi, folders::Model, Id, RankUpdate};
use events::{DomainEvent, EntityKind};
use log::*;
use service::config::ApiVersion;

/// POST create a new Folder
#[utoipa::path(
    post,
    path = "/folders",
    params(ApiVersion),
    request_body = domain::folders::Model,
    responses(
        (status = 201, description = "Successfully Created a New Folder", body = [domain::folders::Model]),
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
    Json(folder_model): Json<Model>,
) -> Result<impl IntoResponse, Error> {
    debug!("POST Create a New Folder from: {folder_model:?}");

    if folder_model.name.trim().is_empty() {
        return Err(Error::validation("name must not be empty"));
    }

    let folder = FolderApi::create(app_state.db_conn_ref(), user_id, folder_model).await?;

    app_state
        .event_publisher
        .publish(DomainEvent::Created {
            kind: EntityKind::Folder,
            owner_id: user_id,
            entity: to_payload(&folder),
            origin_client_id: origin,
        })
        .await;

    Ok(Json(ApiResponse::new(StatusCode::CREATED.into(), folder)))
}

/// GET all Folders belonging to the caller.
#[utoipa::path(
    get,
    path = "/folders",
    params(
        ApiVersion,
        ("sort_order" = Option<crate::params::sort::SortOrder>, Query, description = "Sort by board rank: 'asc' or 'desc'.")
    ),
    responses(
        (status = 200, description = "Successfully retrieved all Folders", body = [domain::folders::Model]),
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
    debug!("GET all Folders");
    debug!("Filter Params: {params:?}");

    let folders = FolderApi::find_by(app_state.db_conn_ref(), params.scoped(user_id)).await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), folders)))
}

#[utoipa::path(
    put,
    path = "/folders/{id}",
    params(
        ApiVersion,
        ("id" = Id, Path, description = "Id of folder to update"),
    ),
    request_body = domain::folders::Model,
    responses(
        (status = 200, description = "Successfully Updated Folder", body = [domain::folders::Model]),
        (status = 400, description = "Bad Request"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Folder not found"),
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
    Json(folder_model): Json<Model>,
) -> Result<impl IntoResponse, Error> {
    debug!("PUT Update Folder with id: {id}");

    if folder_model.name.trim().is_empty() {
        return Err(Error::validation("name must not be empty"));
    }

    let folder = FolderApi::update(app_state.db_conn_ref(), user_id, id, folder_model).await?;

    app_state
        .event_publisher
        .publish(DomainEvent::Updated {
            kind: EntityKind::Folder,
            owner_id: user_id,
            entity: to_payload(&folder),
            origin_client_id: origin,
        })
        .await;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), folder)))
}

/// PUT bulk rank reassignment for folders.
#[utoipa::path(
    put,
    path = "/folders/reorder",
    params(ApiVersion),
    request_body = crate::controller::task_controller::ReorderRequest,
    responses(
        (status = 200, description = "Successfully Reordered Folders", body = [domain::folders::Model]),
        (status = 400, description = "Bad Request"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Folder not found"),
        (status = 405, description = "Method not allowed"),
        (status = 503, description = "Service temporarily unavailable")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn reorder(
    CompareApiVersion(_v): CompareApiVersion,
    AuthenticatedUser(user_id): AuthenticatedUser,
    OriginClientId(origin): OriginClientId,
    State(app_state): State<AppState>,
    Json(request): Json<ReorderRequest>,
) -> Result<impl IntoResponse, Error> {
    debug!("PUT Reorder {} Folders", request.updates.len());

    if request.updates.is_empty() {
        return Err(Error::validation("updates must not be empty"));
    }

    let folders = FolderApi::reorder(app_state.db_conn_ref(), user_id, &request.updates).await?;

    let ranks: Vec<RankUpdate> = folders
        .iter()
        .map(|folder| RankUpdate {
            id: folder.id,
            position: folder.position,
        })
        .collect();

    app_state
        .event_publisher
        .publish(DomainEvent::Reordered {
            kind: EntityKind::Folder,
            owner_id: user_id,
            ranks: to_payload(&ranks),
            origin_client_id: origin,
        })
        .await;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), folders)))
}

/// DELETE a Folder specified by its primary key.
#[utoipa::path(
    delete,
    path = "/folders/{id}",
    params(
        ApiVersion,
        ("id" = Id, Path, description = "Folder id to delete")
    ),
    responses(
        (status = 200, description = "Successfully deleted a certain Folder by its id", body = [Id]),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Folder not found"),
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
    debug!("DELETE Folder by id: {id}");

    FolderApi::delete_by_id(app_state.db_conn_ref(), user_id, id).await?;

    app_state
        .event_publisher
        .publish(DomainEvent::Deleted {
            kind: EntityKind::Folder,
            owner_id: user_id,
            entity_id: id,
            origin_client_id: origin,
        })
        .await;

    Ok(Json(json!({"id": id})))
}
