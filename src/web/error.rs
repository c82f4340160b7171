use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Serialize;
use thiserror::Error;

use crate::{
    auth::CryptError,
    error::log_error,
    model::{DatabaseError, ResourceType},
};

pub type WebResult<T> = std::result::Result<T, WebError>;

#[derive(Debug, Error)]
pub enum RegistrationError {
    #[error("RegistrationUserConflict: {username}")]
    RegistrationUserConflict { username: String },
}

#[derive(Debug, Error)]
pub enum AuthenticationError {
    #[error("AuthenticationRequired")]
    AuthenticationRequired,

    #[error("AuthenticationInvalidCredentials")]
    AuthenticationInvalidCredentials,
}

#[derive(Debug, Error)]
pub enum ResourceError {
    #[error("ResourceNotFound: {resource_type:?}, id: {id}")]
    ResourceNotFound { resource_type: ResourceType, id: i32 },

    #[error("ResourceForbidden: {resource_type:?}")]
    ResourceForbidden { resource_type: ResourceType },

    #[error("ResourceFetchError: {resource_type:?}. Error: {error}")]
    ResourceFetchError {
        resource_type: ResourceType,
        error: DatabaseError,
    },

    #[error("ResourceBadRequest: {resource_type:?}. Reason: {reason}")]
    ResourceBadRequest {
        resource_type: ResourceType,
        reason: String,
    },

    #[error("ResourceConflict: {resource_type:?}. Error: {error}")]
    ResourceConflict {
        resource_type: ResourceType,
        error: DatabaseError,
    },
}

#[derive(Debug, Error)]
pub enum RequestError {
    #[error("RequestBadRequest: {reason}")]
    RequestBadRequest { reason: String },

    #[error("RequestInvalidBody: {0}")]
    RequestInvalidBody(#[from] JsonRejection),

    #[error("RequestInvalidQuery: {0}")]
    RequestInvalidQuery(#[from] QueryRejection),
}

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("ServerCryptError: {0}")]
    ServerCryptError(#[from] crate::auth::CryptError),
}

impl ServerError {
    pub fn status_code(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }

    pub fn client_display(&self) -> String {
        String::from("Internal server error.")
    }
}

impl RegistrationError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::RegistrationUserConflict { .. } => StatusCode::CONFLICT,
        }
    }

    pub fn client_display(&self) -> String {
        match self {
            Self::RegistrationUserConflict { .. } => {
                String::from("Registration error, user already exists.")
            }
        }
    }
}

impl AuthenticationError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::AuthenticationRequired => StatusCode::UNAUTHORIZED,
            Self::AuthenticationInvalidCredentials => StatusCode::UNAUTHORIZED,
        }
    }

    pub fn client_display(&self) -> String {
        match self {
            Self::AuthenticationRequired => String::from("Authentication required."),
            Self::AuthenticationInvalidCredentials => {
                String::from("Authentication error, user not found or password is invalid.")
            }
        }
    }
}

impl ResourceError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::ResourceNotFound { .. } => StatusCode::NOT_FOUND,
            Self::ResourceForbidden { .. } => StatusCode::FORBIDDEN,
            Self::ResourceFetchError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ResourceBadRequest { .. } => StatusCode::BAD_REQUEST,
            Self::ResourceConflict { .. } => StatusCode::CONFLICT,
        }
    }

    pub fn client_display(&self) -> String {
        match self {
            Self::ResourceNotFound { resource_type, id } => {
                format!("{resource_type} with ID {id} not found")
            }
            Self::ResourceForbidden { resource_type } => {
                format!("Access to this {} is forbidden", lowercase(*resource_type))
            }
            Self::ResourceFetchError { resource_type, .. } => {
                format!("Unable to process {}", lowercase(*resource_type))
            }
            Self::ResourceBadRequest { reason, .. } => reason.clone(),
            Self::ResourceConflict { resource_type, .. } => {
                format!("{resource_type} already exists")
            }
        }
    }
}

impl RequestError {
    pub fn status_code(&self) -> StatusCode {
        StatusCode::BAD_REQUEST
    }

    pub fn client_display(&self) -> String {
        match self {
            Self::RequestBadRequest { reason } => reason.clone(),
            Self::RequestInvalidBody(rejection) => {
                format!("Invalid request body: {}", rejection.body_text())
            }
            Self::RequestInvalidQuery(rejection) => {
                format!("Invalid query parameters: {}", rejection.body_text())
            }
        }
    }
}

fn lowercase(resource_type: ResourceType) -> String {
    resource_type.display_name().to_lowercase()
}

#[derive(Debug, Error)]
pub enum WebError {
    #[error("ResourceError - {0}")]
    ResourceError(#[from] ResourceError),
    #[error("AuthenticationError - {0}")]
    AuthenticationError(#[from] AuthenticationError),
    #[error("RegistrationError - {0}")]
    RegistrationError(#[from] RegistrationError),
    #[error("RequestError - {0}")]
    RequestError(#[from] RequestError),
    #[error("ServerError - {0}")]
    ServerError(#[from] ServerError),
}

impl From<JsonRejection> for WebError {
    fn from(value: JsonRejection) -> Self {
        Self::RequestError(RequestError::RequestInvalidBody(value))
    }
}

impl From<QueryRejection> for WebError {
    fn from(value: QueryRejection) -> Self {
        Self::RequestError(RequestError::RequestInvalidQuery(value))
    }
}

impl WebError {
    pub fn not_found_with_id(r#type: ResourceType, id: i32) -> Self {
        Self::ResourceError(ResourceError::ResourceNotFound {
            resource_type: r#type,
            id,
        })
    }

    pub fn resource_forbidden(r#type: ResourceType) -> Self {
        Self::ResourceError(ResourceError::ResourceForbidden {
            resource_type: r#type,
        })
    }

    pub fn resource_fetch_error(r#type: ResourceType, error: DatabaseError) -> Self {
        Self::ResourceError(ResourceError::ResourceFetchError {
            resource_type: r#type,
            error,
        })
    }

    pub fn resource_bad_request<S: Into<String>>(r#type: ResourceType, reason: S) -> Self {
        Self::ResourceError(ResourceError::ResourceBadRequest {
            resource_type: r#type,
            reason: reason.into(),
        })
    }

    /// Maps a persistence failure onto the matching client error.
    pub fn from_db(r#type: ResourceType, error: DatabaseError) -> Self {
        if let DatabaseError::Forbidden = error {
            return Self::resource_forbidden(r#type);
        }
        if error.is_unique_violation() {
            return Self::ResourceError(ResourceError::ResourceConflict {
                resource_type: r#type,
                error,
            });
        }
        if error.is_foreign_key_violation() {
            return Self::resource_bad_request(r#type, "Referenced resource does not exist");
        }
        if error.is_constraint_violation() {
            return Self::resource_bad_request(r#type, "Invalid payload");
        }
        Self::resource_fetch_error(r#type, error)
    }

    pub fn bad_request<S: Into<String>>(reason: S) -> Self {
        Self::RequestError(RequestError::RequestBadRequest {
            reason: reason.into(),
        })
    }

    pub fn auth_required() -> Self {
        Self::AuthenticationError(AuthenticationError::AuthenticationRequired)
    }

    pub fn auth_invalid_credentials() -> Self {
        Self::AuthenticationError(AuthenticationError::AuthenticationInvalidCredentials)
    }

    pub fn registration_conflict<S: Into<String>>(username: S) -> Self {
        Self::RegistrationError(RegistrationError::RegistrationUserConflict {
            username: username.into(),
        })
    }

    pub fn server_crypt_error(e: CryptError) -> Self {
        Self::ServerError(ServerError::ServerCryptError(e))
    }

    pub fn status_code(&self) -> axum::http::StatusCode {
        match self {
            Self::ResourceError(e) => e.status_code(),
            Self::RegistrationError(e) => e.status_code(),
            Self::AuthenticationError(e) => e.status_code(),
            Self::RequestError(e) => e.status_code(),
            Self::ServerError(e) => e.status_code(),
        }
    }

    pub fn client_display(&self) -> String {
        match self {
            Self::ResourceError(e) => e.client_display(),
            Self::RegistrationError(e) => e.client_display(),
            Self::AuthenticationError(e) => e.client_display(),
            Self::RequestError(e) => e.client_display(),
            Self::ServerError(e) => e.client_display(),
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    /// Always `false`
    pub success: bool,
    /// Human-readable message for the client
    pub message: String,
    /// HTTP status code
    pub status_code: u16,
    /// Optional debug details (only in debug mode)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl IntoResponse for WebError {
    fn into_response(self) -> axum::response::Response {
        let status_code = self.status_code();
        if status_code.is_server_error() {
            log_error(&self);
        } else {
            tracing::debug!(status = status_code.as_u16(), "{self}");
        }

        let body = ErrorResponse {
            success: false,
            message: self.client_display(),
            status_code: status_code.as_u16(),
            details: if cfg!(debug_assertions) {
                Some(self.to_string())
            } else {
                None
            },
        };

        (status_code, Json(body)).into_response()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn not_found_message_names_the_id() {
        let err = WebError::not_found_with_id(ResourceType::Lesson, 42);
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.client_display(), "Lesson with ID 42 not found");
    }

    #[test]
    fn bad_request_carries_reason() {
        let err = WebError::resource_bad_request(ResourceType::Lesson, "Invalid lesson ID");
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.client_display(), "Invalid lesson ID");
    }

    #[test]
    fn forbidden_from_database_layer() {
        let err = WebError::from_db(ResourceType::User, DatabaseError::Forbidden);
        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(err.client_display(), "Access to this user is forbidden");
    }

    #[test]
    fn constraint_failures_are_not_missing_references() {
        use crate::model::database_error_of_kind;
        use sqlx::error::ErrorKind;

        let err = WebError::from_db(
            ResourceType::Lesson,
            database_error_of_kind(ErrorKind::ForeignKeyViolation),
        );
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.client_display(), "Referenced resource does not exist");

        for kind in [ErrorKind::CheckViolation, ErrorKind::NotNullViolation] {
            let err = WebError::from_db(ResourceType::Lesson, database_error_of_kind(kind));
            assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
            assert_eq!(err.client_display(), "Invalid payload");
        }

        let err = WebError::from_db(
            ResourceType::Course,
            database_error_of_kind(ErrorKind::UniqueViolation),
        );
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
    }

    #[test]
    fn other_database_errors_are_internal() {
        let err = WebError::from_db(
            ResourceType::Course,
            DatabaseError::SqlxError(sqlx::Error::PoolTimedOut),
        );
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
