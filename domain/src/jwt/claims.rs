//! Claims carried by Daylist access tokens.

use entity::Id;
use serde::{Deserialize, Serialize};

/// Claims for a user-facing access token. `sub` is the user id; expiry is
/// validated on every decode.
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct AccessClaims {
    pub(crate) sub: Id,
    pub(crate) exp: usize,
    pub(crate) iat: usize,
}
