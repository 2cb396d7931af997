use crate::error::Error;
use crate::users::Model;
use sea_orm::DatabaseConnection;

pub use entity_api::user::{create, find_by_email, find_by_id};

/// Checks a credential pair and returns the matching user. Both an unknown
/// email and a wrong password surface as an unauthenticated error.
pub async fn authenticate(
    db: &DatabaseConnection,
    email: &str,
    password: &str,
) -> Result<Model, Error> {
    let user = entity_api::user::authenticate(db, email, password).await?;
    Ok(user)
}
