use actix_web::HttpResponse;
use serde::Serialize;

use crate::session::AuthedUser;

#[derive(Serialize)]
pub struct SessionView {
    username: String,
}

/// GET /api/auth — the read-only session view downstream dashboards gate
/// on. Anonymous requests are rejected by the `AuthedUser` extractor.
pub fn me(user: AuthedUser) -> HttpResponse {
    HttpResponse::Ok().json(SessionView {
        username: user.username,
    })
}
