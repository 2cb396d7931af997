use axum::http::StatusCode;

pub(crate) mod authenticated_user;
pub(crate) mod compare_api_version;
pub(crate) mod origin_client_id;

pub(crate) type RejectionType = (StatusCode, String);
