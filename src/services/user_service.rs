use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, IntoActiveModel, ModelTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::database::DbPool;
use crate::entities::{
    account_entity as accounts, session_entity as sessions, user_entity as users,
};
use crate::error::{AppError, AppResult};
use crate::models::{CreateUserRequest, UpdateUserRequest, UserResponse, UserRole};
use crate::services::auth_service::CREDENTIAL_PROVIDER;
use crate::utils::{hash_password, validate_email, validate_password};

fn invalid_role_message() -> String {
    let roles: Vec<String> = UserRole::ALL.iter().map(|r| r.to_string()).collect();
    format!("Invalid role. Must be one of: {}", roles.join(", "))
}

#[derive(Clone)]
pub struct UserService {
    pool: DbPool,
}

impl UserService {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn list_users(&self) -> AppResult<Vec<UserResponse>> {
        let models = users::Entity::find()
            .order_by_desc(users::Column::CreatedAt)
            .all(self.pool.as_ref())
            .await?;

        Ok(models.into_iter().map(UserResponse::from).collect())
    }

    pub async fn create_user(&self, request: CreateUserRequest) -> AppResult<UserResponse> {
        let name = request.name.as_deref().unwrap_or("").trim().to_string();
        let email = request.email.as_deref().unwrap_or("").trim().to_string();
        let role = request.role.as_deref().unwrap_or("").trim().to_string();
        let password = request.password.unwrap_or_default();

        if name.is_empty() || email.is_empty() || role.is_empty() || password.is_empty() {
            return Err(AppError::Validation(
                "Missing required fields: name, email, role, password".to_string(),
            ));
        }

        let role = UserRole::parse(&role).ok_or_else(|| AppError::Validation(invalid_role_message()))?;

        validate_email(&email)?;
        validate_password(&password)?;

        let existing = users::Entity::find()
            .filter(users::Column::Email.eq(&email))
            .one(self.pool.as_ref())
            .await?;
        if existing.is_some() {
            return Err(AppError::Conflict("Email already exists".to_string()));
        }

        let password_hash = hash_password(&password)?;
        let now = Utc::now();

        let txn = self.pool.begin().await?;

        let user = users::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            name: Set(name),
            email: Set(email.clone()),
            email_verified: Set(false),
            role: Set(role),
            santri_id: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await?;

        accounts::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            account_id: Set(email),
            provider_id: Set(CREDENTIAL_PROVIDER.to_string()),
            user_id: Set(user.id.clone()),
            password: Set(Some(password_hash)),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;

        Ok(UserResponse::from(user))
    }

    /// Only provided fields are overwritten.
    pub async fn update_user(
        &self,
        id: &str,
        request: UpdateUserRequest,
    ) -> AppResult<UserResponse> {
        let user = users::Entity::find_by_id(id)
            .one(self.pool.as_ref())
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        let now = Utc::now();

        let new_email = request
            .email
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty() && *e != user.email)
            .map(str::to_string);

        if let Some(email) = &new_email {
            validate_email(email)?;
            let existing = users::Entity::find()
                .filter(users::Column::Email.eq(email))
                .one(self.pool.as_ref())
                .await?;
            if existing.is_some() {
                return Err(AppError::Conflict("Email already exists".to_string()));
            }
        }

        if let Some(password) = request.password.as_deref().filter(|p| !p.is_empty()) {
            validate_password(password)?;
            let password_hash = hash_password(password)?;
            accounts::Entity::update_many()
                .col_expr(accounts::Column::Password, Expr::value(Some(password_hash)))
                .col_expr(accounts::Column::UpdatedAt, Expr::value(now))
                .filter(accounts::Column::UserId.eq(&user.id))
                .exec(self.pool.as_ref())
                .await?;
        }

        let mut model = user.into_active_model();
        if let Some(name) = request.name.as_deref().map(str::trim).filter(|n| !n.is_empty()) {
            model.name = Set(name.to_string());
        }
        if let Some(email) = new_email {
            model.email = Set(email);
        }
        if let Some(role) = request.role.as_deref().map(str::trim).filter(|r| !r.is_empty()) {
            let role =
                UserRole::parse(role).ok_or_else(|| AppError::Validation(invalid_role_message()))?;
            model.role = Set(role);
        }
        model.updated_at = Set(now);

        let updated = model.update(self.pool.as_ref()).await?;

        Ok(UserResponse::from(updated))
    }

    pub async fn delete_user(&self, id: &str) -> AppResult<()> {
        let user = users::Entity::find_by_id(id)
            .one(self.pool.as_ref())
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        let txn = self.pool.begin().await?;

        sessions::Entity::delete_many()
            .filter(sessions::Column::UserId.eq(&user.id))
            .exec(&txn)
            .await?;
        accounts::Entity::delete_many()
            .filter(accounts::Column::UserId.eq(&user.id))
            .exec(&txn)
            .await?;
        user.delete(&txn).await?;

        txn.commit().await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn sample_user(id: &str, email: &str, role: UserRole) -> users::Model {
        let now = Utc::now();
        users::Model {
            id: id.to_string(),
            name: "Admin Utama".to_string(),
            email: email.to_string(),
            email_verified: true,
            role,
            santri_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_create_user_rejects_duplicate_email() {
        let pool = MockDatabase::new(DatabaseBackend::Sqlite)
            .append_query_results([vec![sample_user(
                "admin-001",
                "admin@pondok.com",
                UserRole::Admin,
            )]])
            .into_connection();
        let service = UserService::new(Arc::new(pool));

        let result = service
            .create_user(CreateUserRequest {
                name: Some("Another Admin".to_string()),
                email: Some("admin@pondok.com".to_string()),
                role: Some("ADMIN".to_string()),
                password: Some("admin123".to_string()),
            })
            .await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_create_user_rejects_unknown_role() {
        let pool = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();
        let service = UserService::new(Arc::new(pool));

        let result = service
            .create_user(CreateUserRequest {
                name: Some("Guru".to_string()),
                email: Some("guru@pondok.com".to_string()),
                role: Some("GURU".to_string()),
                password: Some("guru123".to_string()),
            })
            .await;

        assert!(matches!(result, Err(AppError::Validation(msg)) if msg.contains("Invalid role")));
    }

    #[tokio::test]
    async fn test_delete_missing_user_is_not_found() {
        let pool = MockDatabase::new(DatabaseBackend::Sqlite)
            .append_query_results([Vec::<users::Model>::new()])
            .into_connection();
        let service = UserService::new(Arc::new(pool));

        let result = service.delete_user("missing-id").await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
