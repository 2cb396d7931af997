use std::error::Error as StdError;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use domain::error::{DomainErrorKind, EntityErrorKind, Error as DomainError, InternalErrorKind};

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug)]
pub struct Error {
    source: DomainError,
    /// Optional human-readable reason included in 400 bodies.
    details: Option<String>,
}

impl StdError for Error {}

impl std::fmt::Display for Error {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> core::result::Result<(), std::fmt::Error> {
        write!(fmt, "{self:?}")
    }
}

impl Error {
    /// 400 response carrying a human-readable reason in the body, used for
    /// request validation failures before any mutation happens.
    pub(crate) fn validation(details: &str) -> Self {
        Self {
            source: DomainError {
                source: None,
                error_kind: DomainErrorKind::Internal(InternalErrorKind::Entity(
                    EntityErrorKind::Invalid,
                )),
            },
            details: Some(details.to_owned()),
        }
    }
}

// Client error bodies follow `{error, details?}`; server errors deliberately
// expose nothing beyond the status text.
impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self.source.error_kind {
            DomainErrorKind::Internal(internal_error_kind) => match internal_error_kind {
                InternalErrorKind::Entity(entity_error_kind) => match entity_error_kind {
                    EntityErrorKind::NotFound => {
                        (StatusCode::NOT_FOUND, Json(json!({"error": "NOT FOUND"})))
                            .into_response()
                    }
                    EntityErrorKind::Invalid => {
                        let body = match self.details {
                            Some(details) => json!({"error": "BAD REQUEST", "details": details}),
                            None => json!({"error": "BAD REQUEST"}),
                        };
                        (StatusCode::BAD_REQUEST, Json(body)).into_response()
                    }
                    EntityErrorKind::Unauthenticated => {
                        (StatusCode::UNAUTHORIZED, "UNAUTHORIZED").into_response()
                    }
                    EntityErrorKind::Other(_) => {
                        (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL SERVER ERROR").into_response()
                    }
                },
                InternalErrorKind::Config => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL SERVER ERROR").into_response()
                }
                InternalErrorKind::Other(_) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL SERVER ERROR").into_response()
                }
            },
        }
    }
}

impl<E> From<E> for Error
where
    E: Into<DomainError>,
{
    fn from(err: E) -> Self {
        Self {
            source: err.into(),
            details: None,
        }
    }
}
