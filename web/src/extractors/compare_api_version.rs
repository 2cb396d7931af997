use crate::extractors::RejectionType;
use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
};
use semver::Version;
use service::config::ApiVersion;

/// Rejects requests whose `x-version` header is missing, malformed, or not
/// one of the API versions this build exposes.
pub(crate) struct CompareApiVersion(pub Version);

#[async_trait]
impl<S> FromRequestParts<S> for CompareApiVersion
where
    S: Send + Sync,
{
    type Rejection = RejectionType;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(ApiVersion::field_name())
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| bad_request("x-version header is required"))?;

        let version = Version::parse(header)
            .map_err(|_| bad_request("x-version header is not a valid semantic version"))?;

        if !ApiVersion::versions().iter().any(|v| *v == header) {
            return Err(bad_request("unsupported API version"));
        }

        Ok(CompareApiVersion(version))
    }
}

fn bad_request(msg: &str) -> RejectionType {
    (StatusCode::BAD_REQUEST, msg.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    async fn extract(request: Request<()>) -> Result<Version, RejectionType> {
        let (mut parts, _body) = request.into_parts();
        CompareApiVersion::from_request_parts(&mut parts, &())
            .await
            .map(|CompareApiVersion(v)| v)
    }

    #[tokio::test]
    async fn accepts_the_current_version() {
        let request = Request::builder()
            .uri("/tasks")
            .header("x-version", ApiVersion::default_version())
            .body(())
            .unwrap();

        assert!(extract(request).await.is_ok());
    }

    #[tokio::test]
    async fn rejects_missing_and_unknown_versions() {
        let request = Request::builder().uri("/tasks").body(()).unwrap();
        assert_eq!(
            extract(request).await.unwrap_err().0,
            StatusCode::BAD_REQUEST
        );

        let request = Request::builder()
            .uri("/tasks")
            .header("x-version", "99.0.0")
            .body(())
            .unwrap();
        assert_eq!(
            extract(request).await.unwrap_err().0,
            StatusCode::BAD_REQUEST
        );
    }
}
