use crate::extractors::authenticated_user::query_param;
use crate::X_CLIENT_ID;
use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use std::convert::Infallible;

/// Identifies which open event stream issued a mutation, so that stream can
/// be excluded from the broadcast echo. Taken from the `X-Client-Id` header,
/// falling back to a `clientId` query parameter. Absent on requests from
/// clients without an open stream — every tab of the user then receives the
/// event.
pub(crate) struct OriginClientId(pub Option<String>);

#[async_trait]
impl<S> FromRequestParts<S> for OriginClientId
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let origin = parts
            .headers
            .get(&X_CLIENT_ID)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned)
            .or_else(|| query_param(parts, "clientId"))
            .filter(|value| !value.trim().is_empty());

        Ok(OriginClientId(origin))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    async fn extract(request: Request<()>) -> Option<String> {
        let (mut parts, _body) = request.into_parts();
        let OriginClientId(origin) = OriginClientId::from_request_parts(&mut parts, &())
            .await
            .unwrap();
        origin
    }

    #[tokio::test]
    async fn header_takes_precedence_over_query() {
        let request = Request::builder()
            .uri("/tasks/reorder?clientId=query-tab")
            .header("x-client-id", "header-tab")
            .body(())
            .unwrap();

        assert_eq!(extract(request).await.as_deref(), Some("header-tab"));
    }

    #[tokio::test]
    async fn falls_back_to_the_query_parameter() {
        let request = Request::builder()
            .uri("/tasks/reorder?clientId=query-tab")
            .body(())
            .unwrap();

        assert_eq!(extract(request).await.as_deref(), Some("query-tab"));
    }

    #[tokio::test]
    async fn absent_and_blank_values_yield_none() {
        let request = Request::builder().uri("/tasks").body(()).unwrap();
        assert_eq!(extract(request).await, None);

        let request = Request::builder()
            .uri("/tasks")
            .header("x-client-id", "   ")
            .body(())
            .unwrap();
        assert_eq!(extract(request).await, None);
    }
}
