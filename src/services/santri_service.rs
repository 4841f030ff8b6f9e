use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, IntoActiveModel, ModelTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde_json::Value;
use uuid::Uuid;

use crate::config::{DeletePolicy, ImportConfig};
use crate::database::DbPool;
use crate::entities::{
    account_entity as accounts, santri_entity as santri, transaksi_entity as transaksi,
    user_entity as users,
};
use crate::error::{AppError, AppResult};
use crate::models::{
    CreateSantriRequest, ImportError, ImportSummary, SantriResponse, SantriStatus,
    UpdateSantriRequest, UserRole,
};
use crate::services::auth_service::CREDENTIAL_PROVIDER;
use crate::utils::spreadsheet::{ImportRow, normalize_rows};
use crate::utils::{hash_password, validate_email, validate_password};

fn parse_status(value: &str) -> AppResult<SantriStatus> {
    SantriStatus::parse(value).ok_or_else(|| {
        AppError::Validation(
            "Invalid status. Must be one of: AKTIF, NON_AKTIF, LULUS, KELUAR".to_string(),
        )
    })
}

#[derive(Clone)]
pub struct SantriService {
    pool: DbPool,
    import: ImportConfig,
    delete_policy: DeletePolicy,
}

impl SantriService {
    pub fn new(pool: DbPool, import: ImportConfig, delete_policy: DeletePolicy) -> Self {
        Self {
            pool,
            import,
            delete_policy,
        }
    }

    pub async fn list_santri(&self) -> AppResult<Vec<SantriResponse>> {
        let rows = santri::Entity::find()
            .find_also_related(users::Entity)
            .order_by_desc(santri::Column::CreatedAt)
            .all(self.pool.as_ref())
            .await?;

        Ok(rows
            .into_iter()
            .map(|(s, user)| SantriResponse::with_email(s, user.map(|u| u.email)))
            .collect())
    }

    pub async fn create_santri(&self, request: CreateSantriRequest) -> AppResult<SantriResponse> {
        let nis = request.nis.as_deref().unwrap_or("").trim().to_string();
        let nama = request.nama.as_deref().unwrap_or("").trim().to_string();
        let kelas = request.kelas.as_deref().unwrap_or("").trim().to_string();
        let asrama = request.asrama.as_deref().unwrap_or("").trim().to_string();
        let wali = request.wali.as_deref().unwrap_or("").trim().to_string();

        if nis.is_empty()
            || nama.is_empty()
            || kelas.is_empty()
            || asrama.is_empty()
            || wali.is_empty()
        {
            return Err(AppError::Validation("Missing required fields".to_string()));
        }

        let status = match request.status.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            Some(value) => parse_status(value)?,
            None => SantriStatus::Aktif,
        };

        if self.nis_exists(&nis).await? {
            return Err(AppError::Duplicate("NIS already exists".to_string()));
        }

        // Attach to an existing user when a userId is supplied.
        if let Some(user_id) = request.user_id.as_deref().filter(|id| !id.is_empty()) {
            let user = users::Entity::find_by_id(user_id)
                .one(self.pool.as_ref())
                .await?
                .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

            let now = Utc::now();
            let txn = self.pool.begin().await?;

            let created = santri::ActiveModel {
                id: Set(Uuid::new_v4().to_string()),
                nis: Set(nis),
                nama: Set(nama),
                kelas: Set(kelas),
                asrama: Set(asrama),
                wali: Set(wali),
                status: Set(status),
                created_at: Set(now),
                updated_at: Set(now),
            }
            .insert(&txn)
            .await?;

            let email = user.email.clone();
            let mut link = user.into_active_model();
            link.santri_id = Set(Some(created.id.clone()));
            link.updated_at = Set(now);
            link.update(&txn).await?;

            txn.commit().await?;

            return Ok(SantriResponse::with_email(created, Some(email)));
        }

        let email = request.email.as_deref().unwrap_or("").trim().to_string();
        let password = request.password.unwrap_or_default();
        if email.is_empty() || password.is_empty() {
            return Err(AppError::Validation(
                "Email and password are required when userId is not provided".to_string(),
            ));
        }

        let created = self
            .create_santri_with_user(&nis, &nama, &kelas, &asrama, &wali, status, &email, &password)
            .await?;

        Ok(SantriResponse::with_email(created, Some(email)))
    }

    /// Only provided fields are overwritten; email and password changes flow
    /// through to the linked user and its credential rows.
    pub async fn update_santri(
        &self,
        id: &str,
        request: UpdateSantriRequest,
    ) -> AppResult<SantriResponse> {
        let existing = santri::Entity::find_by_id(id)
            .one(self.pool.as_ref())
            .await?
            .ok_or_else(|| AppError::NotFound("Santri not found".to_string()))?;

        let linked_user = users::Entity::find()
            .filter(users::Column::SantriId.eq(id))
            .one(self.pool.as_ref())
            .await?;

        let now = Utc::now();

        let new_nis = request
            .nis
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty() && *n != existing.nis)
            .map(str::to_string);
        if let Some(nis) = &new_nis
            && self.nis_exists(nis).await?
        {
            return Err(AppError::Duplicate("NIS already exists".to_string()));
        }

        let mut user_email = linked_user.as_ref().map(|u| u.email.clone());
        if let Some(user) = &linked_user {
            let new_email = request
                .email
                .as_deref()
                .map(str::trim)
                .filter(|e| !e.is_empty() && *e != user.email)
                .map(str::to_string);

            if let Some(email) = new_email {
                validate_email(&email)?;
                let duplicate = users::Entity::find()
                    .filter(users::Column::Email.eq(&email))
                    .one(self.pool.as_ref())
                    .await?;
                if duplicate.is_some() {
                    return Err(AppError::Duplicate("Email already exists".to_string()));
                }

                let mut model = user.clone().into_active_model();
                model.email = Set(email.clone());
                model.updated_at = Set(now);
                model.update(self.pool.as_ref()).await?;
                user_email = Some(email);
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
        }

        let mut model = existing.into_active_model();
        if let Some(nis) = new_nis {
            model.nis = Set(nis);
        }
        if let Some(nama) = request.nama.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
            model.nama = Set(nama.to_string());
        }
        if let Some(kelas) = request.kelas.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
            model.kelas = Set(kelas.to_string());
        }
        if let Some(asrama) = request.asrama.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
            model.asrama = Set(asrama.to_string());
        }
        if let Some(wali) = request.wali.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
            model.wali = Set(wali.to_string());
        }
        if let Some(status) = request.status.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
            model.status = Set(parse_status(status)?);
        }
        model.updated_at = Set(now);

        let updated = model.update(self.pool.as_ref()).await?;

        Ok(SantriResponse::with_email(updated, user_email))
    }

    /// Whether owned transactions block the delete or go with it is a
    /// configured policy; either way the linked user survives, unlinked.
    pub async fn delete_santri(&self, id: &str) -> AppResult<()> {
        let existing = santri::Entity::find_by_id(id)
            .one(self.pool.as_ref())
            .await?
            .ok_or_else(|| AppError::NotFound("Santri not found".to_string()))?;

        let transaction_count = transaksi::Entity::find()
            .filter(transaksi::Column::SantriId.eq(id))
            .count(self.pool.as_ref())
            .await?;

        if transaction_count > 0 && self.delete_policy == DeletePolicy::Restrict {
            return Err(AppError::Conflict(
                "Santri still has transactions; delete them first or enable the cascade policy"
                    .to_string(),
            ));
        }

        let txn = self.pool.begin().await?;

        if transaction_count > 0 {
            transaksi::Entity::delete_many()
                .filter(transaksi::Column::SantriId.eq(id))
                .exec(&txn)
                .await?;
        }

        users::Entity::update_many()
            .col_expr(users::Column::SantriId, Expr::value(Option::<String>::None))
            .filter(users::Column::SantriId.eq(id))
            .exec(&txn)
            .await?;

        existing.delete(&txn).await?;

        txn.commit().await?;

        Ok(())
    }

    /// Bulk import. Rows that fail the required-field pre-filter are reported
    /// as rejected; every retained row is attempted independently, so one bad
    /// row never aborts the batch.
    pub async fn import_santri(&self, rows: &[Value]) -> AppResult<ImportSummary> {
        let (valid, rejected) =
            normalize_rows(rows, &self.import.aliases, &self.import.default_password);

        let mut results = Vec::new();
        let mut errors = Vec::new();

        for row in valid {
            match self.import_row(&row).await {
                Ok(created) => {
                    results.push(SantriResponse::with_email(created, Some(row.email)));
                }
                Err(e) => errors.push(ImportError {
                    nis: row.nis.clone(),
                    error: e.to_string(),
                }),
            }
        }

        log::info!(
            "Santri import finished: {} created, {} failed, {} rejected",
            results.len(),
            errors.len(),
            rejected.len()
        );

        Ok(ImportSummary {
            success: results.len(),
            failed: errors.len(),
            results,
            errors,
            rejected,
        })
    }

    async fn import_row(&self, row: &ImportRow) -> AppResult<santri::Model> {
        let status = parse_status(&row.status)?;
        if self.nis_exists(&row.nis).await? {
            return Err(AppError::Duplicate("NIS already exists".to_string()));
        }
        self.create_santri_with_user(
            &row.nis,
            &row.nama,
            &row.kelas,
            &row.asrama,
            &row.wali,
            status,
            &row.email,
            &row.password,
        )
        .await
    }

    async fn nis_exists(&self, nis: &str) -> AppResult<bool> {
        let existing = santri::Entity::find()
            .filter(santri::Column::Nis.eq(nis))
            .one(self.pool.as_ref())
            .await?;
        Ok(existing.is_some())
    }

    /// User, credential, santri and the link back onto the user are one unit
    /// of work: a failure in any step leaves no orphan records behind. The
    /// caller has already ruled out a duplicate nis.
    #[allow(clippy::too_many_arguments)]
    async fn create_santri_with_user(
        &self,
        nis: &str,
        nama: &str,
        kelas: &str,
        asrama: &str,
        wali: &str,
        status: SantriStatus,
        email: &str,
        password: &str,
    ) -> AppResult<santri::Model> {
        validate_email(email)?;
        validate_password(password)?;

        let existing_user = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(self.pool.as_ref())
            .await?;
        if existing_user.is_some() {
            return Err(AppError::Duplicate("Email already exists".to_string()));
        }

        let password_hash = hash_password(password)?;
        let now = Utc::now();

        let txn = self.pool.begin().await?;

        let user = users::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            name: Set(nama.to_string()),
            email: Set(email.to_string()),
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
            account_id: Set(email.to_string()),
            provider_id: Set(CREDENTIAL_PROVIDER.to_string()),
            user_id: Set(user.id.clone()),
            password: Set(Some(password_hash)),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await?;

        let created = santri::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            nis: Set(nis.to_string()),
            nama: Set(nama.to_string()),
            kelas: Set(kelas.to_string()),
            asrama: Set(asrama.to_string()),
            wali: Set(wali.to_string()),
            status: Set(status),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await?;

        let mut link = user.into_active_model();
        link.santri_id = Set(Some(created.id.clone()));
        link.updated_at = Set(now);
        link.update(&txn).await?;

        txn.commit().await?;

        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase};
    use std::sync::Arc;

    fn sample_santri(id: &str, nis: &str) -> santri::Model {
        let now = Utc::now();
        santri::Model {
            id: id.to_string(),
            nis: nis.to_string(),
            nama: "Ahmad Fauzi".to_string(),
            kelas: "X-A".to_string(),
            asrama: "Asrama A".to_string(),
            wali: "Bpk. H. Fauzi".to_string(),
            status: SantriStatus::Aktif,
            created_at: now,
            updated_at: now,
        }
    }

    fn service(pool: DatabaseConnection) -> SantriService {
        SantriService::new(Arc::new(pool), ImportConfig::default(), DeletePolicy::Restrict)
    }

    fn full_request(nis: &str) -> CreateSantriRequest {
        CreateSantriRequest {
            nis: Some(nis.to_string()),
            nama: Some("Ahmad Fauzi".to_string()),
            kelas: Some("X-A".to_string()),
            asrama: Some("Asrama A".to_string()),
            wali: Some("Bpk. H. Fauzi".to_string()),
            status: None,
            user_id: None,
            email: Some("ahmad@pondok.com".to_string()),
            password: Some("santri123".to_string()),
        }
    }

    #[tokio::test]
    async fn test_create_santri_rejects_duplicate_nis() {
        let pool = MockDatabase::new(DatabaseBackend::Sqlite)
            .append_query_results([vec![sample_santri("santri-001", "2024001")]])
            .into_connection();

        let result = service(pool).create_santri(full_request("2024001")).await;

        assert!(matches!(result, Err(AppError::Duplicate(msg)) if msg == "NIS already exists"));
    }

    #[tokio::test]
    async fn test_create_santri_requires_all_fields() {
        let pool = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();

        let mut request = full_request("2024001");
        request.kelas = Some("  ".to_string());
        let result = service(pool).create_santri(request).await;

        assert!(matches!(result, Err(AppError::Validation(msg)) if msg == "Missing required fields"));
    }

    #[tokio::test]
    async fn test_create_santri_requires_credentials_without_user_id() {
        // nis lookup comes back empty, then the credential check trips
        let pool = MockDatabase::new(DatabaseBackend::Sqlite)
            .append_query_results([Vec::<santri::Model>::new()])
            .into_connection();

        let mut request = full_request("2024001");
        request.email = None;
        let result = service(pool).create_santri(request).await;

        assert!(
            matches!(result, Err(AppError::Validation(msg)) if msg.contains("Email and password"))
        );
    }

    #[tokio::test]
    async fn test_delete_missing_santri_is_not_found() {
        let pool = MockDatabase::new(DatabaseBackend::Sqlite)
            .append_query_results([Vec::<santri::Model>::new()])
            .into_connection();

        let result = service(pool).delete_santri("missing-id").await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_import_reports_rejected_rows_without_touching_the_store() {
        // Both rows fail the pre-filter, so the service never issues a query.
        let pool = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();

        let rows = vec![
            serde_json::json!({"nis": "", "nama": "B", "kelas": "X", "asrama": "A2", "wali": "W", "email": "b@x.com"}),
            serde_json::json!({"nama": "C", "kelas": "X"}),
        ];
        let summary = service(pool).import_santri(&rows).await.unwrap();

        assert_eq!(summary.success, 0);
        assert_eq!(summary.failed, 0);
        assert_eq!(summary.rejected.len(), 2);
        assert!(summary.errors.is_empty());
    }
}
