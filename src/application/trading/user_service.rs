use crate::domain::clock;
use crate::domain::errors::{ServiceError, ServiceResult};
use crate::domain::trading::User;
use crate::domain::trading::user::MAX_USERNAME_LEN;
use crate::domain::validation::FieldErrors;
use crate::infrastructure::persistence::repositories::users;
use crate::infrastructure::persistence::begin_write;
use serde::Deserialize;
use sqlx::SqlitePool;
use tracing::{info, warn};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRequest {
    pub username: Option<String>,
    pub balance: Option<i64>,
}

impl UserRequest {
    fn validate(&self) -> ServiceResult<(String, i64)> {
        let mut errors = FieldErrors::new();
        errors
            .not_blank("username", self.username.as_deref(), "username is required")
            .length(
                "username",
                self.username.as_deref(),
                1,
                MAX_USERNAME_LEN,
                "username must be at most 50 characters",
            )
            .required("balance", self.balance.as_ref(), "balance is required")
            .min_i64("balance", self.balance, 0, "balance must be 0 or greater");
        errors.finish()?;
        Ok((
            self.username.clone().unwrap_or_default(),
            self.balance.unwrap_or_default(),
        ))
    }
}

pub struct UserService {
    pool: SqlitePool,
}

impl UserService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list_users(&self) -> ServiceResult<Vec<User>> {
        let mut conn = self.pool.acquire().await?;
        users::find_all(&mut *conn).await
    }

    pub async fn get_user(&self, id: i64) -> ServiceResult<User> {
        let mut conn = self.pool.acquire().await?;
        users::find_by_id(&mut *conn, id)
            .await?
            .ok_or_else(|| ServiceError::not_found(format!("User not found: {}", id)))
    }

    pub async fn create_user(&self, request: UserRequest) -> ServiceResult<User> {
        let (username, balance) = request.validate()?;

        let mut tx = begin_write(&self.pool).await?;
        if users::username_taken(&mut *tx, &username, None).await? {
            warn!("UserService: duplicate username {}", username);
            return Err(ServiceError::Duplicated(format!("Username already exists: {}", username)));
        }
        let user = users::insert(&mut *tx, &username, balance, clock::now()).await?;
        tx.commit().await?;

        info!("UserService: created user {} ({})", user.username, user.id);
        Ok(user)
    }

    pub async fn update_user(&self, id: i64, request: UserRequest) -> ServiceResult<User> {
        let (username, balance) = request.validate()?;

        let mut tx = begin_write(&self.pool).await?;
        let mut user = users::find_by_id(&mut *tx, id)
            .await?
            .ok_or_else(|| ServiceError::not_found(format!("User not found: {}", id)))?;
        if user.username != username && users::username_taken(&mut *tx, &username, Some(id)).await? {
            return Err(ServiceError::Duplicated(format!("Username already exists: {}", username)));
        }

        user.username = username;
        user.balance = balance;
        user.updated_at = clock::now();
        users::update(&mut *tx, &user).await?;
        tx.commit().await?;

        info!("UserService: updated user {}", user.id);
        Ok(user)
    }

    /// Removes the user with their positions and transaction history.
    pub async fn delete_user(&self, id: i64) -> ServiceResult<()> {
        let mut tx = begin_write(&self.pool).await?;
        if !users::delete(&mut *tx, id).await? {
            return Err(ServiceError::not_found(format!("User not found: {}", id)));
        }
        tx.commit().await?;

        info!("UserService: deleted user {}", id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::ErrorCode;
    use crate::infrastructure::persistence::Database;

    fn request(username: &str, balance: i64) -> UserRequest {
        UserRequest {
            username: Some(username.to_string()),
            balance: Some(balance),
        }
    }

    #[tokio::test]
    async fn test_user_crud() {
        let db = Database::in_memory().await.unwrap();
        let service = UserService::new(db.pool);

        let user = service.create_user(request("kim", 1_000_000)).await.unwrap();
        assert_eq!(service.get_user(user.id).await.unwrap().balance, 1_000_000);

        let updated = service.update_user(user.id, request("lee", 500)).await.unwrap();
        assert_eq!(updated.username, "lee");
        assert_eq!(service.list_users().await.unwrap().len(), 1);

        service.delete_user(user.id).await.unwrap();
        let err = service.get_user(user.id).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::DataNotFound);
    }

    #[tokio::test]
    async fn test_username_must_be_unique() {
        let db = Database::in_memory().await.unwrap();
        let service = UserService::new(db.pool);
        let kim = service.create_user(request("kim", 0)).await.unwrap();
        let lee = service.create_user(request("lee", 0)).await.unwrap();

        let err = service.create_user(request("kim", 0)).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::DataDuplicated);
        let err = service.update_user(lee.id, request("kim", 0)).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::DataDuplicated);

        // Keeping one's own name is not a conflict.
        assert!(service.update_user(kim.id, request("kim", 10)).await.is_ok());
    }

    #[tokio::test]
    async fn test_rejects_negative_balance_and_blank_name() {
        let db = Database::in_memory().await.unwrap();
        let service = UserService::new(db.pool);
        let err = service.create_user(request("  ", -1)).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "username: username is required, balance: balance must be 0 or greater"
        );

        let long_name = "x".repeat(51);
        assert!(service.create_user(request(&long_name, 0)).await.is_err());
    }
}
