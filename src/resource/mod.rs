pub mod login;
pub mod logout;
pub mod me;
pub mod register;

pub use login::login;
pub use logout::logout;
pub use me::me;
pub use register::register;

use log::error;

use crate::error::ServiceError;
use crate::{Pool, PooledConnection};

fn get_conn(pool: &Pool) -> Result<PooledConnection, ServiceError> {
    pool.get().map_err(|e| {
        error!("credential store connection unavailable: {}", e);
        ServiceError::StoreUnavailable
    })
}
