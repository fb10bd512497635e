use argon2rs::{verifier::Encoded, Argon2, Variant};
use ring::rand::{SecureRandom, SystemRandom};

use crate::error::ServiceError;

/// Per-record salt length in bytes.
const SALT_LEN: usize = 32;

/// Run argon2 over the password with the given salt and the service-wide
/// pepper. Deterministic for a fixed (salt, password) pair, which is what
/// verification relies on.
fn argon2_session(salt: &[u8], password: &str) -> Encoded {
    Encoded::new(
        Argon2::default(Variant::Argon2d),
        password.as_bytes(),
        salt,
        &*crate::secret::PEPPER,
        b"",
    )
}

/// A freshly derived password digest together with the salt it was derived
/// with. The plaintext never leaves this function's stack.
pub struct SaltedHash {
    pub salt: [u8; SALT_LEN],
    pub hash: Vec<u8>,
}

impl SaltedHash {
    /// Generate a random salt, then salt and pepper the password.
    pub fn from_password(rng: &SystemRandom, password: &str) -> Result<SaltedHash, ServiceError> {
        let mut salt = [0; SALT_LEN];
        rng.fill(&mut salt).map_err(|_| ServiceError::Internal)?;

        let hash = argon2_session(&salt, password).to_u8();

        Ok(SaltedHash { salt, hash })
    }

    /// Recompute the digest of `password` under `salt` and compare it
    /// against a stored digest.
    pub fn matches(salt: &[u8], stored_hash: &[u8], password: &str) -> bool {
        argon2_session(salt, password).to_u8() == stored_hash
    }
}
