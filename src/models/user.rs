use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entities::user_entity as users;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(None)")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    #[sea_orm(string_value = "ADMIN")]
    Admin,
    #[sea_orm(string_value = "BENDAHARA_SMK")]
    BendaharaSmk,
    #[sea_orm(string_value = "BENDAHARA_SMP")]
    BendaharaSmp,
    #[sea_orm(string_value = "BENDAHARA_PONDOK")]
    BendaharaPondok,
    #[sea_orm(string_value = "SANTRI")]
    Santri,
}

impl UserRole {
    pub const ALL: [UserRole; 5] = [
        UserRole::Admin,
        UserRole::BendaharaSmk,
        UserRole::BendaharaSmp,
        UserRole::BendaharaPondok,
        UserRole::Santri,
    ];

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "ADMIN" => Some(UserRole::Admin),
            "BENDAHARA_SMK" => Some(UserRole::BendaharaSmk),
            "BENDAHARA_SMP" => Some(UserRole::BendaharaSmp),
            "BENDAHARA_PONDOK" => Some(UserRole::BendaharaPondok),
            "SANTRI" => Some(UserRole::Santri),
            _ => None,
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserRole::Admin => write!(f, "ADMIN"),
            UserRole::BendaharaSmk => write!(f, "BENDAHARA_SMK"),
            UserRole::BendaharaSmp => write!(f, "BENDAHARA_SMP"),
            UserRole::BendaharaPondok => write!(f, "BENDAHARA_PONDOK"),
            UserRole::Santri => write!(f, "SANTRI"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub email_verified: bool,
    pub santri_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<users::Model> for UserResponse {
    fn from(user: users::Model) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            email_verified: user.email_verified,
            santri_id: user.santri_id,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateUserRequest {
    #[schema(example = "Bendahara Pondok")]
    pub name: Option<String>,
    #[schema(example = "bendahara.pondok@pondok.com")]
    pub email: Option<String>,
    #[schema(example = "BENDAHARA_PONDOK")]
    pub role: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RegisterRequest {
    #[schema(example = "Ahmad Fauzi")]
    pub name: String,
    #[schema(example = "ahmad@pondok.com")]
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginRequest {
    #[schema(example = "admin@pondok.com")]
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub user: UserResponse,
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_role() {
        assert_eq!(UserRole::parse("ADMIN"), Some(UserRole::Admin));
        assert_eq!(
            UserRole::parse("BENDAHARA_PONDOK"),
            Some(UserRole::BendaharaPondok)
        );
        assert_eq!(UserRole::parse("SANTRI"), Some(UserRole::Santri));
        assert_eq!(UserRole::parse("admin"), None);
        assert_eq!(UserRole::parse("GURU"), None);
    }

    #[test]
    fn test_role_display_round_trips() {
        for role in UserRole::ALL {
            assert_eq!(UserRole::parse(&role.to_string()), Some(role));
        }
    }

    #[test]
    fn test_role_serde_names() {
        assert_eq!(
            serde_json::to_string(&UserRole::BendaharaSmk).unwrap(),
            "\"BENDAHARA_SMK\""
        );
        assert_eq!(
            serde_json::from_str::<UserRole>("\"UANG_SAKU\"").ok(),
            None
        );
    }
}
