use actix_web::error::BlockingError;
use actix_web::{web, HttpResponse};
use futures::Future;
use serde::{Deserialize, Serialize};

use crate::error::ServiceError;
use crate::{store, Pool};

#[derive(Deserialize)]
pub struct RegisterParams {
    username: String,
    password: String,
}

#[derive(Serialize)]
pub struct RegisterResponse {
    id: i32,
    username: String,
}

/// POST /api/register — create an account. Never touches the session: a
/// freshly registered user still has to log in.
pub fn register(
    params: web::Json<RegisterParams>,
    pool: web::Data<Pool>,
) -> impl Future<Item = HttpResponse, Error = ServiceError> {
    let params = params.into_inner();

    web::block(move || {
        let conn = super::get_conn(&pool)?;
        store::register(&conn, &crate::RNG, &params.username, &params.password)
    })
    .then(|res| match res {
        Ok(user) => Ok(HttpResponse::Created().json(RegisterResponse {
            id: user.id,
            username: user.username,
        })),
        Err(BlockingError::Error(e)) => Err(e),
        Err(BlockingError::Canceled) => Err(ServiceError::Internal),
    })
}
