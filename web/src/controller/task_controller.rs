use serde::Deserialize;
use utoipa::ToSchema;

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
use crate::params::task::IndexParams;
use crate::{AppState, Error};
use domain::{task as TaskApi, tasks::Model, Id, RankUpdate};
use events::{DomainEvent, EntityKind};
use log::*;
use service::config::ApiVersion;

/// Request body for a bulk rank reassignment. `items` is accepted as an
/// alias for `updates`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ReorderRequest {
    #[serde(alias = "items")]
    pub updates: Vec<RankUpdate>,
}

/// Query parameters for the status update endpoint.
#[derive(Debug, Deserialize)]
pub struct UpdateStatusParams {
    value: String,
}

/// POST create a new Task
#[utoipa::path(
    post,
    path = "/tasks",
    params(ApiVersion),
    request_body = domain::tasks::Model,
    responses(
        (status = 201, description = "Successfully Created a New Task", body = [domain::tasks::Model]),
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
    Json(task_model): Json<Model>,
) -> Result<impl IntoResponse, Error> {
    debug!("POST Create a New Task from: {task_model:?}");

    if task_model.title.trim().is_empty() {
        return Err(Error::validation("title must not be empty"));
    }

    let task = TaskApi::create(app_state.db_conn_ref(), user_id, task_model).await?;

    app_state
        .event_publisher
        .publish(DomainEvent::Created {
            kind: EntityKind::Task,
            owner_id: user_id,
            entity: to_payload(&task),
            origin_client_id: origin,
        })
        .await;

    Ok(Json(ApiResponse::new(StatusCode::CREATED.into(), task)))
}

/// GET a particular Task specified by its id.
#[utoipa::path(
    get,
    path = "/tasks/{id}",
    params(
        ApiVersion,
        ("id" = String, Path, description = "Task id to retrieve")
    ),
    responses(
        (status = 200, description = "Successfully retrieved a specific Task by its id", body = [domain::tasks::Model]),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Task not found"),
        (status = 405, description = "Method not allowed"),
        (status = 503, description = "Service temporarily unavailable")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn read(
    CompareApiVersion(_v): CompareApiVersion,
    AuthenticatedUser(user_id): AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
) -> Result<impl IntoResponse, Error> {
    debug!("GET Task by id: {id}");

    let task = TaskApi::find_by_id(app_state.db_conn_ref(), user_id, id).await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), task)))
}

/// GET all Tasks, optionally filtered by section, parent or status.
#[utoipa::path(
    get,
    path = "/tasks",
    params(
        ApiVersion,
        ("section_id" = Option<Id>, Query, description = "Filter by section_id"),
        ("parent_id" = Option<Id>, Query, description = "Filter by parent task id"),
        ("status" = Option<String>, Query, description = "Filter by status"),
        ("sort_by" = Option<crate::params::task::SortField>, Query, description = "Sort by field. Valid values: 'position', 'due_by', 'created_at', 'updated_at'."),
        ("sort_order" = Option<crate::params::sort::SortOrder>, Query, description = "Sort order. Valid values: 'asc', 'desc'.")
    ),
    responses(
        (status = 200, description = "Successfully retrieved all Tasks", body = [domain::tasks::Model]),
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
    debug!("GET all Tasks");
    debug!("Filter Params: {params:?}");

    let tasks = TaskApi::find_by(app_state.db_conn_ref(), params.scoped(user_id)).await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), tasks)))
}

#[utoipa::path(
    put,
    path = "/tasks/{id}",
    params(
        ApiVersion,
        ("id" = Id, Path, description = "Id of task to update"),
    ),
    request_body = domain::tasks::Model,
    responses(
        (status = 200, description = "Successfully Updated Task", body = [domain::tasks::Model]),
        (status = 400, description = "Bad Request"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Task not found"),
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
    Json(task_model): Json<Model>,
) -> Result<impl IntoResponse, Error> {
    debug!("PUT Update Task with id: {id}");

    if task_model.title.trim().is_empty() {
        return Err(Error::validation("title must not be empty"));
    }

    let task = TaskApi::update(app_state.db_conn_ref(), user_id, id, task_model).await?;

    debug!("Updated Task: {task:?}");

    app_state
        .event_publisher
        .publish(DomainEvent::Updated {
            kind: EntityKind::Task,
            owner_id: user_id,
            entity: to_payload(&task),
            origin_client_id: origin,
        })
        .await;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), task)))
}

#[utoipa::path(
    put,
    path = "/tasks/{id}/status",
    params(
        ApiVersion,
        ("id" = Id, Path, description = "Id of task to update"),
        ("value" = Option<String>, Query, description = "Status value to update"),
    ),
    responses(
        (status = 200, description = "Successfully Updated Task", body = [domain::tasks::Model]),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Task not found"),
        (status = 405, description = "Method not allowed"),
        (status = 503, description = "Service temporarily unavailable")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_status(
    CompareApiVersion(_v): CompareApiVersion,
    AuthenticatedUser(user_id): AuthenticatedUser,
    OriginClientId(origin): OriginClientId,
    Query(params): Query<UpdateStatusParams>,
    Path(id): Path<Id>,
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, Error> {
    debug!("PUT Update Task Status with id: {id}");

    let task = TaskApi::update_status(
        app_state.db_conn_ref(),
        user_id,
        id,
        params.value.as_str().into(),
    )
    .await?;

    debug!("Updated Task: {task:?}");

    app_state
        .event_publisher
        .publish(DomainEvent::Updated {
            kind: EntityKind::Task,
            owner_id: user_id,
            entity: to_payload(&task),
            origin_client_id: origin,
        })
        .await;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), task)))
}

/// PUT bulk rank reassignment. The whole batch persists atomically; the
/// response and the broadcast both carry the full updated list so receivers
/// replace their ordering wholesale.
#[utoipa::path(
    put,
    path = "/tasks/reorder",
    params(ApiVersion),
    request_body = ReorderRequest,
    responses(
        (status = 200, description = "Successfully Reordered Tasks", body = [domain::tasks::Model]),
        (status = 400, description = "Bad Request"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Task not found"),
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
    debug!("PUT Reorder {} Tasks", request.updates.len());

    if request.updates.is_empty() {
        return Err(Error::validation("updates must not be empty"));
    }

    let tasks = TaskApi::reorder(app_state.db_conn_ref(), user_id, &request.updates).await?;

    let ranks: Vec<RankUpdate> = tasks
        .iter()
        .map(|task| RankUpdate {
            id: task.id,
            position: task.position,
        })
        .collect();

    app_state
        .event_publisher
        .publish(DomainEvent::Reordered {
            kind: EntityKind::Task,
            owner_id: user_id,
            ranks: to_payload(&ranks),
            origin_client_id: origin,
        })
        .await;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), tasks)))
}

/// DELETE a Task specified by its primary key.
#[utoipa::path(
    delete,
    path = "/tasks/{id}",
    params(
        ApiVersion,
        ("id" = Id, Path, description = "Task id to delete")
    ),
    responses(
        (status = 200, description = "Successfully deleted a certain Task by its id", body = [Id]),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Task not found"),
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
    debug!("DELETE Task by id: {id}");

    TaskApi::delete_by_id(app_state.db_conn_ref(), user_id, id).await?;

    app_state
        .event_publisher
        .publish(DomainEvent::Deleted {
            kind: EntityKind::Task,
            owner_id: user_id,
            entity_id: id,
            origin_client_id: origin,
        })
        .await;

    Ok(Json(json!({"id": id})))
}
