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
use crate::params::section::IndexParams;
use crate::{AppState, Error};
use domain::{section as SectionApi, sections::Model, Id, RankUpdate};
use events::{DomainEvent, EntityKind};
use log::*;
use service::config::ApiVersion;

/// POST create a new Section
#[utoipa::path(
    post,
    path = "/sections",
    params(ApiVersion),
    request_body = domain::sections::Model,
    responses(
        (status = 201, description = "Successfully Created a New Section", body = [domain::sections::Model]),
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
    Json(section_model): Json<Model>,
) -> Result<impl IntoResponse, Error> {
    debug!("POST Create a New Section from: {section_model:?}");

    if section_model.name.trim().is_empty() {
        return Err(Error::validation("name must not be empty"));
    }

    let section = SectionApi::create(app_state.db_conn_ref(), user_id, section_model).await?;

    app_state
        .event_publisher
        .publish(DomainEvent::Created {
            kind: EntityKind::Section,
            owner_id: user_id,
            entity: to_payload(&section),
            origin_client_id: origin,
        })
        .await;

    Ok(Json(ApiResponse::new(StatusCode::CREATED.into(), section)))
}

/// GET all Sections, optionally filtered by folder.
#[utoipa::path(
    get,
    path = "/sections",
    params(
        ApiVersion,
        ("folder_id" = Option<Id>, Query, description = "Filter by folder_id"),
        ("sort_order" = Option<crate::params::sort::SortOrder>, Query, description = "Sort by board rank: 'asc' or 'desc'.")
    ),
    responses(
        (status = 200, description = "Successfully retrieved all Sections", body = [domain::sections::Model]),
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
    debug!("GET all Sections");
    debug!("Filter Params: {params:?}");

    let sections = SectionApi::find_by(app_state.db_conn_ref(), params.scoped(user_id)).await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), sections)))
}

#[utoipa::path(
    put,
    path = "/sections/{id}",
    params(
        ApiVersion,
        ("id" = Id, Path, description = "Id of section to update"),
    ),
    request_body = domain::sections::Model,
    responses(
        (status = 200, description = "Successfully Updated Section", body = [domain::sections::Model]),
        (status = 400, description = "Bad Request"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Section not found"),
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
    Json(section_model): Json<Model>,
) -> Result<impl IntoResponse, Error> {
    debug!("PUT Update Section with id: {id}");

    if section_model.name.trim().is_empty() {
        return Err(Error::validation("name must not be empty"));
    }

    let section = SectionApi::update(app_state.db_conn_ref(), user_id, id, section_model).await?;

    app_state
        .event_publisher
        .publish(DomainEvent::Updated {
            kind: EntityKind::Section,
            owner_id: user_id,
            entity: to_payload(&section),
            origin_client_id: origin,
        })
        .await;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), section)))
}

/// PUT bulk rank reassignment for sections.
#[utoipa::path(
    put,
    path = "/sections/reorder",
    params(ApiVersion),
    request_body = crate::controller::task_controller::ReorderRequest,
    responses(
        (status = 200, description = "Successfully Reordered Sections", body = [domain::sections::Model]),
        (status = 400, description = "Bad Request"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Section not found"),
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
    debug!("PUT Reorder {} Sections", request.updates.len());

    if request.updates.is_empty() {
        return Err(Error::validation("updates must not be empty"));
    }

    let sections = SectionApi::reorder(app_state.db_conn_ref(), user_id, &request.updates).await?;

    let ranks: Vec<RankUpdate> = sections
        .iter()
        .map(|section| RankUpdate {
            id: section.id,
            position: section.position,
        })
        .collect();

    app_state
        .event_publisher
        .publish(DomainEvent::Reordered {
            kind: EntityKind::Section,
            owner_id: user_id,
            ranks: to_payload(&ranks),
            origin_client_id: origin,
        })
        .await;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), sections)))
}

/// DELETE a Section specified by its primary key.
#[utoipa::path(
    delete,
    path = "/sections/{id}",
    params(
        ApiVersion,
        ("id" = Id, Path, description = "Section id to delete")
    ),
    responses(
        (status = 200, description = "Successfully deleted a certain Section by its id", body = [Id]),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Section not found"),
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
    debug!("DELETE Section by id: {id}");

    SectionApi::delete_by_id(app_state.db_conn_ref(), user_id, id).await?;

    app_state
        .event_publisher
        .publish(DomainEvent::Deleted {
            kind: EntityKind::Section,
            owner_id: user_id,
            entity_id: id,
            origin_client_id: origin,
        })
        .await;

    Ok(Json(json!({"id": id})))
}
