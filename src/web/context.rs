//! Request context, e.g. user id, its role, etc.
//!
//! The auth middleware only verifies the session token and records the
//! claimed user id. The user row is loaded by the guards below, which
//! handlers call after their own input validation.

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::model::entity::UserEntity;
use crate::model::{CrudRepository, ModelManager, ResourceType, ResourceTyped};
use crate::web::{WebResult, error::WebError};

#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    user_id: i32,
    user_role: UserRole,
}

impl AuthenticatedUser {
    pub fn new(user_id: i32, user_role: UserRole) -> Self {
        Self { user_id, user_role }
    }

    /// Internal actor for server-side operations such as registration.
    pub fn system() -> Self {
        Self {
            user_role: UserRole::Admin,
            user_id: 0,
        }
    }

    pub fn user_id(&self) -> i32 {
        self.user_id
    }

    pub fn user_role(&self) -> UserRole {
        self.user_role
    }

    pub fn is_admin(&self) -> bool {
        self.user_role == UserRole::Admin
    }

    pub fn require_admin(self, resource_type: ResourceType) -> WebResult<Self> {
        if self.is_admin() {
            Ok(self)
        } else {
            Err(WebError::resource_forbidden(resource_type))
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserRole {
    Admin,
    User,
}

impl From<&str> for UserRole {
    fn from(value: &str) -> Self {
        match value {
            "admin" => Self::Admin,
            _ => Self::User,
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::Admin => write!(f, "admin"),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    claimed_user_id: Option<i32>,
}

impl RequestContext {
    pub fn new(claimed_user_id: Option<i32>) -> Self {
        Self { claimed_user_id }
    }

    /// User id carried by a verified token. The user may no longer exist.
    pub fn claimed_user_id(&self) -> Option<i32> {
        self.claimed_user_id
    }

    /// Loads the caller. Tokens of deleted users resolve to `None`.
    pub async fn maybe_user(&self, mm: &ModelManager) -> WebResult<Option<AuthenticatedUser>> {
        let Some(id) = self.claimed_user_id else {
            return Ok(None);
        };

        let user = UserEntity::find_by_id(mm, id)
            .await
            .map_err(|e| WebError::resource_fetch_error(UserEntity::get_resource_type(), e))?;

        Ok(user.map(|user| AuthenticatedUser::new(user.id(), user.role())))
    }

    pub async fn user(&self, mm: &ModelManager) -> WebResult<AuthenticatedUser> {
        self.maybe_user(mm).await?.ok_or_else(WebError::auth_required)
    }

    /// Progress endpoints treat a missing user as a malformed request.
    pub async fn progress_user(&self, mm: &ModelManager) -> WebResult<AuthenticatedUser> {
        self.maybe_user(mm)
            .await?
            .ok_or_else(|| WebError::bad_request("User must be authenticated"))
    }

    pub async fn admin(
        &self,
        mm: &ModelManager,
        resource_type: ResourceType,
    ) -> WebResult<AuthenticatedUser> {
        self.user(mm).await?.require_admin(resource_type)
    }
}

impl<S> FromRequestParts<S> for RequestContext
where
    S: Send + Sync,
{
    type Rejection = WebError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let ctx = parts.extensions.get::<RequestContext>();
        if let Some(ctx) = ctx {
            Ok(ctx.clone())
        } else {
            Ok(RequestContext::new(None))
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::model::DbConnection;
    use axum::http::StatusCode;

    // never dialed for anonymous contexts
    fn offline_mm() -> ModelManager {
        let db = DbConnection::connect("postgres://nobody@127.0.0.1:1/none").unwrap();
        ModelManager::new(db)
    }

    #[tokio::test]
    async fn anonymous_progress_is_bad_request() {
        let ctx = RequestContext::default();
        let err = ctx.progress_user(&offline_mm()).await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.client_display(), "User must be authenticated");
    }

    #[tokio::test]
    async fn anonymous_guards_skip_the_database() {
        let ctx = RequestContext::default();
        let mm = offline_mm();
        assert!(ctx.maybe_user(&mm).await.unwrap().is_none());
        assert_eq!(
            ctx.user(&mm).await.unwrap_err().status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ctx.admin(&mm, ResourceType::Lesson)
                .await
                .unwrap_err()
                .status_code(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn admin_guard() {
        let err = AuthenticatedUser::new(4, UserRole::User)
            .require_admin(ResourceType::Lesson)
            .unwrap_err();
        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);

        let admin = AuthenticatedUser::new(1, UserRole::Admin)
            .require_admin(ResourceType::Lesson)
            .unwrap();
        assert_eq!(admin.user_id(), 1);
    }

    #[test]
    fn role_parsing_defaults_to_user() {
        assert_eq!(UserRole::from("admin"), UserRole::Admin);
        assert_eq!(UserRole::from("moderator"), UserRole::User);
        assert_eq!(UserRole::Admin.to_string(), "admin");
    }
}
