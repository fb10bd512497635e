use actix_web::{HttpResponse, ResponseError};
use failure::Fail;
use serde::Serialize;

/// Terminal, user-facing failures. Nothing here is retried: every variant
/// ends the request it occurred in.
#[derive(Debug, Fail, PartialEq)]
pub enum ServiceError {
    /// Login attempt with a wrong password or an unknown username.
    #[fail(display = "invalid username or password")]
    InvalidCredentials,

    /// Anonymous request to a resource that requires an authenticated
    /// session.
    #[fail(display = "authentication required")]
    AuthRequired,

    /// Signup with a username that is already taken.
    #[fail(display = "username is already taken")]
    DuplicateUsername,

    /// The credential store could not be reached (pool exhausted or the
    /// database file inaccessible). Fatal to the request; there is no
    /// fallback store.
    #[fail(display = "credential store unavailable")]
    StoreUnavailable,

    #[fail(display = "internal error")]
    Internal,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl ResponseError for ServiceError {
    fn error_response(&self) -> HttpResponse {
        let body = ErrorBody {
            error: self.to_string(),
        };

        match self {
            ServiceError::InvalidCredentials | ServiceError::AuthRequired => {
                HttpResponse::Unauthorized().json(body)
            }
            ServiceError::DuplicateUsername => HttpResponse::Conflict().json(body),
            ServiceError::StoreUnavailable => HttpResponse::ServiceUnavailable().json(body),
            ServiceError::Internal => HttpResponse::InternalServerError().json(body),
        }
    }
}
