use crate::extractors::RejectionType;
use crate::AppState;
use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, StatusCode},
};
use domain::{jwt, Id};
use log::*;

/// Extracts and verifies the caller's access token, yielding their user id.
///
/// The token is taken from the `Authorization: Bearer` header when present,
/// falling back to a `token` query parameter — EventSource cannot set
/// request headers, so the stream endpoint relies on the query form. Both
/// paths go through the same verification boundary.
pub(crate) struct AuthenticatedUser(pub Id);

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = RejectionType;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)
            .or_else(|| query_param(parts, "token"))
            .ok_or_else(unauthorized)?;

        match jwt::verify_access_token(&state.config, &token) {
            Ok(user_id) => Ok(AuthenticatedUser(user_id)),
            Err(e) => {
                debug!("Rejecting request with invalid access token: {e:?}");
                Err(unauthorized())
            }
        }
    }
}

fn unauthorized() -> RejectionType {
    (StatusCode::UNAUTHORIZED, "Unauthorized".to_string())
}

fn bearer_token(parts: &Parts) -> Option<String> {
    parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::to_owned)
}

pub(crate) fn query_param(parts: &Parts, name: &str) -> Option<String> {
    parts.uri.query().and_then(|query| {
        query.split('&').find_map(|pair| {
            let mut split = pair.splitn(2, '=');
            match (split.next(), split.next()) {
                (Some(key), Some(value)) if key == name && !value.is_empty() => {
                    Some(value.to_owned())
                }
                _ => None,
            }
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts_for(uri: &str) -> Parts {
        let (parts, _body) = Request::builder().uri(uri).body(()).unwrap().into_parts();
        parts
    }

    #[test]
    fn query_param_finds_the_named_pair() {
        let parts = parts_for("/events?clientId=a1&token=abc.def.ghi");

        assert_eq!(query_param(&parts, "token").as_deref(), Some("abc.def.ghi"));
        assert_eq!(query_param(&parts, "clientId").as_deref(), Some("a1"));
        assert_eq!(query_param(&parts, "missing"), None);
    }

    #[test]
    fn empty_query_values_are_treated_as_absent() {
        let parts = parts_for("/events?token=");

        assert_eq!(query_param(&parts, "token"), None);
    }

    #[test]
    fn bearer_token_requires_the_scheme_prefix() {
        let (mut parts, _body) = Request::builder()
            .uri("/tasks")
            .header(AUTHORIZATION, "Bearer abc")
            .body(())
            .unwrap()
            .into_parts();

        assert_eq!(bearer_token(&parts).as_deref(), Some("abc"));

        parts.headers.insert(AUTHORIZATION, "Basic abc".parse().unwrap());
        assert_eq!(bearer_token(&parts), None);
    }
}
