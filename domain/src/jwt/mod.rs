//! Access token issuance and verification.
//!
//! This module is the authentication boundary the rest of the system builds
//! on: the event-stream endpoint and the mutation extractors both call
//! [`verify_access_token`] and never look inside tokens themselves. Tokens
//! are signed with the symmetric key from [`Config`]; issuance happens at
//! login.

use crate::error::{DomainErrorKind, Error, EntityErrorKind, InternalErrorKind};
use claims::AccessClaims;
use entity::Id;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use log::*;
use serde::Serialize;
use service::config::Config;

pub(crate) mod claims;

/// An issued bearer token plus its absolute expiry, as returned to the
/// client at login.
#[derive(Debug, Clone, Serialize)]
pub struct AccessToken {
    pub token: String,
    pub expires_at: i64,
}

/// Issues a signed access token for a user.
pub fn issue_access_token(config: &Config, user_id: Id) -> Result<AccessToken, Error> {
    let now = chrono::Utc::now().timestamp();
    let expires_at = now + config.access_token_expiry_seconds as i64;

    let claims = AccessClaims {
        sub: user_id,
        exp: expires_at as usize,
        iat: now as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.token_signing_key().as_bytes()),
    )?;

    Ok(AccessToken { token, expires_at })
}

/// Verifies a bearer token and returns the user id it was issued for.
/// Invalid signatures, malformed tokens and expired tokens all map to the
/// same unauthenticated error.
pub fn verify_access_token(config: &Config, token: &str) -> Result<Id, Error> {
    let decoded = decode::<AccessClaims>(
        token,
        &DecodingKey::from_secret(config.token_signing_key().as_bytes()),
        &Validation::default(),
    )
    .map_err(|err| {
        debug!("Access token rejected: {err}");
        Error {
            source: Some(Box::new(err)),
            error_kind: DomainErrorKind::Internal(InternalErrorKind::Entity(
                EntityErrorKind::Unauthenticated,
            )),
        }
    })?;

    Ok(decoded.claims.sub)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn test_config() -> Config {
        Config::parse_from(["daylist-test"])
    }

    #[test]
    fn issued_tokens_verify_back_to_the_user_id() -> Result<(), Error> {
        let config = test_config();
        let user_id = Id::new_v4();

        let access = issue_access_token(&config, user_id)?;
        let verified = verify_access_token(&config, &access.token)?;

        assert_eq!(verified, user_id);
        Ok(())
    }

    #[test]
    fn garbage_tokens_are_rejected() {
        let config = test_config();

        let result = verify_access_token(&config, "not-a-token");

        assert!(result.is_err());
    }

    #[test]
    fn tokens_signed_with_another_key_are_rejected() {
        let config = test_config();
        let other =
            Config::parse_from(["daylist-test", "--token-signing-key", "a-different-key"]);

        let access = issue_access_token(&other, Id::new_v4()).unwrap();

        assert!(verify_access_token(&config, &access.token).is_err());
    }
}
