//! Two-state session flow: a request is either anonymous or carries a valid
//! identity cookie naming the logged-in user. Session state lives entirely
//! in the per-client cookie; there is no process-wide session map.

use actix_identity::Identity;
use actix_web::dev::Payload;
use actix_web::{Error, FromRequest, HttpRequest};

use crate::error::ServiceError;

/// Bind the session to `username`. The identity middleware issues the
/// signed cookie on the response.
pub fn establish(id: &Identity, username: &str) {
    id.remember(username.to_string());
}

/// Drop the session back to anonymous; the cookie is cleared on the
/// response.
pub fn clear(id: &Identity) {
    id.forget();
}

/// The username of an authenticated session.
///
/// Gated handlers take this as an extractor argument: extraction fails with
/// `AuthRequired` for anonymous requests, so such handlers never run
/// without a logged-in user.
pub struct AuthedUser {
    pub username: String,
}

impl FromRequest for AuthedUser {
    type Config = ();
    type Error = Error;
    type Future = Result<AuthedUser, Error>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        if let Some(username) = Identity::from_request(req, payload)?.identity() {
            return Ok(AuthedUser { username });
        }

        Err(ServiceError::AuthRequired.into())
    }
}
