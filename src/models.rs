use crate::error::ServiceError;
use crate::schema::users;
use diesel::prelude::*;

#[derive(Insertable)]
#[table_name = "users"]
pub struct NewUser {
    pub username: String,
    pub salt_base64: String,
    pub argon2_hash: String,
}

#[derive(Queryable, Debug)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub salt_base64: String,
    pub argon2_hash: String,
}

impl User {
    /// Decode the record's salt for digest recomputation. A record that
    /// fails to decode is corrupt, not a failed verification.
    pub fn salt(&self) -> Result<Vec<u8>, ServiceError> {
        base64::decode(&self.salt_base64).map_err(|_| ServiceError::Internal)
    }
}
