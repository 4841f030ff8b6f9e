use chrono::{Duration, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, ModelTrait, QueryFilter, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::database::DbPool;
use crate::entities::{
    account_entity as accounts, session_entity as sessions, user_entity as users,
};
use crate::error::{AppError, AppResult};
use crate::models::{AuthResponse, LoginRequest, RegisterRequest, UserResponse, UserRole};
use crate::utils::{
    generate_session_token, hash_password, validate_email, validate_password, verify_password,
};

/// Provider identifier for password credentials; accounts.account_id mirrors
/// the user's email under this provider.
pub const CREDENTIAL_PROVIDER: &str = "credential";

#[derive(Clone)]
pub struct AuthService {
    pool: DbPool,
    session_expires_in: i64,
}

impl AuthService {
    pub fn new(pool: DbPool, session_expires_in: i64) -> Self {
        Self {
            pool,
            session_expires_in,
        }
    }

    /// Self-service sign-up. The role is always SANTRI; privileged accounts
    /// are only created through the admin user endpoint.
    pub async fn register(
        &self,
        request: RegisterRequest,
        ip_address: Option<String>,
        user_agent: Option<String>,
    ) -> AppResult<AuthResponse> {
        let name = request.name.trim().to_string();
        let email = request.email.trim().to_string();

        if name.is_empty() || email.is_empty() || request.password.is_empty() {
            return Err(AppError::Validation(
                "Missing required fields: name, email, password".to_string(),
            ));
        }

        validate_email(&email)?;
        validate_password(&request.password)?;

        let existing = users::Entity::find()
            .filter(users::Column::Email.eq(&email))
            .one(self.pool.as_ref())
            .await?;
        if existing.is_some() {
            return Err(AppError::Duplicate("Email already exists".to_string()));
        }

        let password_hash = hash_password(&request.password)?;
        let now = Utc::now();

        let txn = self.pool.begin().await?;

        let user = users::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            name: Set(name),
            email: Set(email.clone()),
            email_verified: Set(false),
            role: Set(UserRole::Santri),
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

        self.open_session(user, ip_address, user_agent).await
    }

    pub async fn login(
        &self,
        request: LoginRequest,
        ip_address: Option<String>,
        user_agent: Option<String>,
    ) -> AppResult<AuthResponse> {
        let email = request.email.trim();

        let user = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(self.pool.as_ref())
            .await?
            .ok_or_else(|| AppError::Unauthenticated("Invalid email or password".to_string()))?;

        let account = accounts::Entity::find()
            .filter(accounts::Column::UserId.eq(&user.id))
            .filter(accounts::Column::ProviderId.eq(CREDENTIAL_PROVIDER))
            .one(self.pool.as_ref())
            .await?
            .ok_or_else(|| AppError::Unauthenticated("Invalid email or password".to_string()))?;

        let password_hash = account
            .password
            .ok_or_else(|| AppError::Unauthenticated("Invalid email or password".to_string()))?;

        if !verify_password(&request.password, &password_hash)? {
            return Err(AppError::Unauthenticated(
                "Invalid email or password".to_string(),
            ));
        }

        self.open_session(user, ip_address, user_agent).await
    }

    /// Deletes the presented session; unknown tokens are a no-op so logout
    /// stays idempotent.
    pub async fn logout(&self, token: &str) -> AppResult<()> {
        sessions::Entity::delete_many()
            .filter(sessions::Column::Token.eq(token))
            .exec(self.pool.as_ref())
            .await?;
        Ok(())
    }

    /// Resolves a bearer token to its user, re-reading the store on every
    /// call. Expired sessions resolve to no user and are removed on touch.
    pub async fn resolve_session(&self, token: &str) -> AppResult<Option<users::Model>> {
        let session = sessions::Entity::find()
            .filter(sessions::Column::Token.eq(token))
            .one(self.pool.as_ref())
            .await?;

        let Some(session) = session else {
            return Ok(None);
        };

        if session.expires_at <= Utc::now() {
            session.delete(self.pool.as_ref()).await?;
            return Ok(None);
        }

        let user = users::Entity::find_by_id(&session.user_id)
            .one(self.pool.as_ref())
            .await?;

        Ok(user)
    }

    async fn open_session(
        &self,
        user: users::Model,
        ip_address: Option<String>,
        user_agent: Option<String>,
    ) -> AppResult<AuthResponse> {
        let now = Utc::now();
        let expires_at = now + Duration::seconds(self.session_expires_in);
        let token = generate_session_token();

        sessions::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            token: Set(token.clone()),
            user_id: Set(user.id.clone()),
            expires_at: Set(expires_at),
            ip_address: Set(ip_address),
            user_agent: Set(user_agent),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(self.pool.as_ref())
        .await?;

        Ok(AuthResponse {
            user: UserResponse::from(user),
            token,
            expires_at,
        })
    }
}
