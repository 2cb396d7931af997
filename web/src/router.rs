use crate::{controller::health_check_controller, stream, AppState};
use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::controller::{
    folder_controller, section_controller, smart_folder_controller, tag_controller,
    task_controller, user_session_controller,
};

use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_rapidoc::RapiDoc;

// This is the global definition of our OpenAPI spec. To be a part
// of the rendered spec, a path and schema must be listed here.
#[derive(OpenApi)]
#[openapi(
        info(
            title = "Daylist API"
        ),
        paths(
            task_controller::create,
            task_controller::read,
            task_controller::index,
            task_controller::update,
            task_controller::update_status,
            task_controller::reorder,
            task_controller::delete,
            section_controller::create,
            section_controller::index,
            section_controller::update,
            section_controller::reorder,
            section_controller::delete,
            folder_controller::create,
            folder_controller::index,
            folder_controller::update,
            folder_controller::reorder,
            folder_controller::delete,
            smart_folder_controller::create,
            smart_folder_controller::index,
            smart_folder_controller::update,
            smart_folder_controller::delete,
            tag_controller::create,
            tag_controller::index,
            tag_controller::delete,
            user_session_controller::login,
        ),
        components(
            schemas(
                domain::tasks::Model,
                domain::sections::Model,
                domain::folders::Model,
                domain::smart_folders::Model,
                domain::tags::Model,
                domain::users::Model,
                domain::status::Status,
                domain::RankUpdate,
                crate::controller::task_controller::ReorderRequest,
                crate::controller::user_session_controller::Credentials,
                crate::controller::user_session_controller::LoginResponse,
            )
        ),
        modifiers(&SecurityAddon),
        tags(
            (name = "daylist", description = "Daylist task & habit tracking API")
        )
    )]
struct ApiDoc;

struct SecurityAddon;

// Defines our bearer-token authentication requirement for gaining access to
// our API endpoints for OpenAPI.
impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some(
                            "Access token returned from a successful POST /session login",
                        ))
                        .build(),
                ),
            )
        }
    }
}

pub fn define_routes(app_state: AppState) -> Router {
    Router::new()
        .merge(task_routes(app_state.clone()))
        .merge(section_routes(app_state.clone()))
        .merge(folder_routes(app_state.clone()))
        .merge(smart_folder_routes(app_state.clone()))
        .merge(tag_routes(app_state.clone()))
        .merge(user_session_routes(app_state.clone()))
        .merge(event_stream_routes(app_state))
        .merge(health_routes())
        .merge(RapiDoc::with_openapi("/api-docs/openapi.json", ApiDoc::openapi()).path("/rapidoc"))
}

fn task_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/tasks", post(task_controller::create))
        .route("/tasks", get(task_controller::index))
        // The static segment must be declared alongside the parameterized
        // routes; axum prefers it over `/tasks/:id`.
        .route("/tasks/reorder", put(task_controller::reorder))
        .route("/tasks/:id", get(task_controller::read))
        .route("/tasks/:id", put(task_controller::update))
        .route("/tasks/:id/status", put(task_controller::update_status))
        .route("/tasks/:id", delete(task_controller::delete))
        .with_state(app_state)
}

fn section_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/sections", post(section_controller::create))
        .route("/sections", get(section_controller::index))
        .route("/sections/reorder", put(section_controller::reorder))
        .route("/sections/:id", put(section_controller::update))
        .route("/sections/:id", delete(section_controller::delete))
        .with_state(app_state)
}

fn folder_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/folders", post(folder_controller::create))
        .route("/folders", get(folder_controller::index))
        .route("/folders/reorder", put(folder_controller::reorder))
        .route("/folders/:id", put(folder_controller::update))
        .route("/folders/:id", delete(folder_controller::delete))
        .with_state(app_state)
}

fn smart_folder_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/smart_folders", post(smart_folder_controller::create))
        .route("/smart_folders", get(smart_folder_controller::index))
        .route("/smart_folders/:id", put(smart_folder_controller::update))
        .route(
            "/smart_folders/:id",
            delete(smart_folder_controller::delete),
        )
        .with_state(app_state)
}

fn tag_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/tags", post(tag_controller::create))
        .route("/tags", get(tag_controller::index))
        .route("/tags/:id", delete(tag_controller::delete))
        .with_state(app_state)
}

fn user_session_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/session", post(user_session_controller::login))
        .with_state(app_state)
}

fn event_stream_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/events", get(stream::handler::event_stream))
        .with_state(app_state)
}

fn health_routes() -> Router {
    Router::new().route("/health", get(health_check_controller::health_check))
}

#[cfg(test)]
// Gated behind seaORM's mock feature, which removes the Clone implementation
// from DatabaseConnection.
#[cfg(feature = "mock")]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use clap::Parser;
    use events::EventPublisher;
    use service::config::{ApiVersion, Config};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn test_app_state() -> AppState {
        let config = Config::parse_from(["daylist-test"]);
        let db = Arc::new(
            sea_orm::MockDatabase::new(sea_orm::DatabaseBackend::Postgres).into_connection(),
        );
        AppState::new(
            config,
            &db,
            Arc::new(sse::Manager::new()),
            EventPublisher::new(),
        )
    }

    #[tokio::test]
    async fn requests_without_a_token_are_unauthorized() {
        let app = define_routes(test_app_state());

        let request = Request::builder()
            .uri("/tasks")
            .header("x-version", ApiVersion::default_version())
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn the_event_stream_rejects_invalid_tokens() {
        let app = define_routes(test_app_state());

        let request = Request::builder()
            .uri("/events?token=garbage")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn the_event_stream_opens_for_a_valid_token() {
        let app_state = test_app_state();
        let token = domain::jwt::issue_access_token(&app_state.config, domain::Id::new_v4())
            .unwrap()
            .token;
        let app = define_routes(app_state);

        let request = Request::builder()
            .uri(format!("/events?token={token}&clientId=a1"))
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response
                .headers()
                .get("content-type")
                .and_then(|v| v.to_str().ok()),
            Some("text/event-stream")
        );
    }

    #[tokio::test]
    async fn reorder_rejects_an_empty_batch_before_any_mutation() {
        let app_state = test_app_state();
        let token = domain::jwt::issue_access_token(&app_state.config, domain::Id::new_v4())
            .unwrap()
            .token;
        let app = define_routes(app_state);

        // The mock database has no prepared results, so reaching it would
        // error with 500 instead of the expected validation response.
        let request = Request::builder()
            .method("PUT")
            .uri("/tasks/reorder")
            .header("x-version", ApiVersion::default_version())
            .header("authorization", format!("Bearer {token}"))
            .header("content-type", "application/json")
            .body(Body::from(r#"{"updates": []}"#))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn health_check_is_public() {
        let app = define_routes(test_app_state());

        let request = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }
}
