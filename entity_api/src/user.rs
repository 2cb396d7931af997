use sea_orm::{entity::prelude::*, ActiveValue::Set, DatabaseConnection};

use super::error::{EntityApiErrorKind, Error};
use entity::users::{ActiveModel, Column, Entity, Model};
use entity::Id;
use log::*;
use password_auth::{generate_hash, verify_password};

/// Inserts a new user. `model.password` is the clear-text password; only its
/// hash is persisted.
pub async fn create(db: &DatabaseConnection, model: Model) -> Result<Model, Error> {
    debug!("New User to be inserted: {}", model.email);

    let now = chrono::Utc::now();

    let user_active_model: ActiveModel = ActiveModel {
        email: Set(model.email),
        password: Set(generate_hash(&model.password)),
        display_name: Set(model.display_name),
        timezone: Set(model.timezone),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    };

    Ok(user_active_model.save(db).await?.try_into_model()?)
}

pub async fn find_by_id(db: &DatabaseConnection, id: Id) -> Result<Model, Error> {
    Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(Error::record_not_found)
}

pub async fn find_by_email(db: &DatabaseConnection, email: &str) -> Result<Model, Error> {
    Entity::find()
        .filter(Column::Email.eq(email))
        .one(db)
        .await?
        .ok_or_else(Error::record_not_found)
}

/// Checks a credential pair against the stored hash. An unknown email and a
/// wrong password both map to the same error kind, so callers leak nothing
/// about which part failed.
pub async fn authenticate(
    db: &DatabaseConnection,
    email: &str,
    password: &str,
) -> Result<Model, Error> {
    let unauthenticated = || Error {
        source: None,
        error_kind: EntityApiErrorKind::RecordUnauthenticated,
    };

    let user = find_by_email(db, email).await.map_err(|_| unauthenticated())?;

    verify_password(password, &user.password).map_err(|_| unauthenticated())?;

    Ok(user)
}

#[cfg(test)]
#[cfg(feature = "mock")]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn user_model(password_hash: String) -> Model {
        let now = chrono::Utc::now();
        Model {
            id: Id::new_v4(),
            email: "morgan@example.com".to_owned(),
            password: password_hash,
            display_name: Some("Morgan".to_owned()),
            timezone: "UTC".to_owned(),
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    #[tokio::test]
    async fn authenticate_accepts_a_matching_password() -> Result<(), Error> {
        let user = user_model(generate_hash("correct horse"));

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![user.clone()]])
            .into_connection();

        let authenticated = authenticate(&db, &user.email, "correct horse").await?;

        assert_eq!(authenticated.id, user.id);

        Ok(())
    }

    #[tokio::test]
    async fn authenticate_rejects_a_wrong_password() {
        let user = user_model(generate_hash("correct horse"));

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![user]])
            .into_connection();

        let result = authenticate(&db, "morgan@example.com", "battery staple").await;

        assert_eq!(
            result.unwrap_err().error_kind,
            EntityApiErrorKind::RecordUnauthenticated
        );
    }

    #[tokio::test]
    async fn authenticate_rejects_an_unknown_email() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![Vec::<Model>::new()])
            .into_connection();

        let result = authenticate(&db, "nobody@example.com", "anything").await;

        assert_eq!(
            result.unwrap_err().error_kind,
            EntityApiErrorKind::RecordUnauthenticated
        );
    }
}
