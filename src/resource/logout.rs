use actix_identity::Identity;
use actix_web::HttpResponse;

use crate::session;

/// DELETE /api/auth — drop the session back to anonymous. Idempotent: an
/// anonymous logout is still a 204.
pub fn logout(id: Identity) -> HttpResponse {
    session::clear(&id);
    HttpResponse::NoContent().finish()
}
