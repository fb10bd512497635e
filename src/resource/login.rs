use actix_identity::Identity;
use actix_web::error::BlockingError;
use actix_web::{web, HttpResponse};
use futures::Future;
use log::info;
use serde::{Deserialize, Serialize};

use crate::error::ServiceError;
use crate::{session, store, Pool};

#[derive(Deserialize)]
pub struct LoginParams {
    username: String,
    password: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    username: String,
}

/// POST /api/auth — verify credentials and establish the session. A failed
/// verification leaves the session anonymous.
pub fn login(
    params: web::Json<LoginParams>,
    id: Identity,
    pool: web::Data<Pool>,
) -> impl Future<Item = HttpResponse, Error = ServiceError> {
    let LoginParams { username, password } = params.into_inner();

    web::block(move || {
        let conn = super::get_conn(&pool)?;
        if store::verify(&conn, &username, &password)? {
            Ok(username)
        } else {
            Err(ServiceError::InvalidCredentials)
        }
    })
    .then(move |res| match res {
        Ok(username) => {
            info!("session established for '{}'", username);
            session::establish(&id, &username);
            Ok(HttpResponse::Ok().json(LoginResponse { username }))
        }
        Err(BlockingError::Error(e)) => Err(e),
        Err(BlockingError::Canceled) => Err(ServiceError::Internal),
    })
}
