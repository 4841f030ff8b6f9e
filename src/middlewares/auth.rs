use actix_web::dev::Payload;
use actix_web::http::header;
use actix_web::{FromRequest, HttpRequest, web};
use futures_util::future::LocalBoxFuture;

use crate::entities::user_entity as users;
use crate::error::{AppError, AppResult};
use crate::models::UserRole;
use crate::services::AuthService;

/// Roles admitted to the admin dashboard surface. Every protected handler
/// goes through [`require_dashboard_access`] rather than repeating the list.
pub const DASHBOARD_ROLES: [UserRole; 4] = [
    UserRole::Admin,
    UserRole::BendaharaSmk,
    UserRole::BendaharaSmp,
    UserRole::BendaharaPondok,
];

/// Session token from the Authorization header, falling back to the
/// `session_token` cookie set by the web client.
pub fn session_token(req: &HttpRequest) -> Option<String> {
    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::to_string)
        .or_else(|| req.cookie("session_token").map(|c| c.value().to_string()))
}

/// The requester's user, when a live session accompanies the request.
/// Resolution hits the store on every extraction; admission decisions are
/// never cached across requests.
pub struct MaybeSession(pub Option<users::Model>);

impl FromRequest for MaybeSession {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let req = req.clone();
        Box::pin(async move {
            let Some(token) = session_token(&req) else {
                return Ok(MaybeSession(None));
            };
            let Some(auth_service) = req.app_data::<web::Data<AuthService>>() else {
                return Ok(MaybeSession(None));
            };

            let user = auth_service.resolve_session(&token).await?;
            Ok(MaybeSession(user))
        })
    }
}

#[derive(Debug, PartialEq)]
pub enum Admission<'a> {
    NotAuthenticated,
    Forbidden(&'a users::Model),
    Allowed(&'a users::Model),
}

pub fn admit(user: Option<&users::Model>) -> Admission<'_> {
    match user {
        None => Admission::NotAuthenticated,
        Some(user) if DASHBOARD_ROLES.contains(&user.role) => Admission::Allowed(user),
        Some(user) => Admission::Forbidden(user),
    }
}

pub fn require_dashboard_access(session: &MaybeSession) -> AppResult<&users::Model> {
    match admit(session.0.as_ref()) {
        Admission::Allowed(user) => Ok(user),
        Admission::Forbidden(_) => Err(AppError::Forbidden(
            "Forbidden - Insufficient permissions".to_string(),
        )),
        Admission::NotAuthenticated => Err(AppError::Unauthenticated(
            "Unauthorized - Please login".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn user_with_role(role: UserRole) -> users::Model {
        let now = Utc::now();
        users::Model {
            id: "user-001".to_string(),
            name: "Test User".to_string(),
            email: "user@pondok.com".to_string(),
            email_verified: true,
            role,
            santri_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_no_session_is_not_authenticated() {
        assert_eq!(admit(None), Admission::NotAuthenticated);
    }

    #[test]
    fn test_santri_role_is_forbidden() {
        let user = user_with_role(UserRole::Santri);
        assert_eq!(admit(Some(&user)), Admission::Forbidden(&user));
    }

    #[test]
    fn test_dashboard_roles_are_allowed() {
        for role in DASHBOARD_ROLES {
            let user = user_with_role(role);
            assert_eq!(admit(Some(&user)), Admission::Allowed(&user));
        }
    }

    #[test]
    fn test_require_dashboard_access_maps_to_errors() {
        let none = MaybeSession(None);
        assert!(matches!(
            require_dashboard_access(&none),
            Err(AppError::Unauthenticated(_))
        ));

        let santri = MaybeSession(Some(user_with_role(UserRole::Santri)));
        assert!(matches!(
            require_dashboard_access(&santri),
            Err(AppError::Forbidden(_))
        ));

        let admin = MaybeSession(Some(user_with_role(UserRole::Admin)));
        assert!(require_dashboard_access(&admin).is_ok());
    }
}
