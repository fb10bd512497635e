//! Durable username -> password-digest mapping.
//!
//! Uniqueness is enforced by the UNIQUE constraint on `users.username`, so
//! the present-check and the insert in `register` are one atomic statement;
//! two concurrent signups for the same name resolve to exactly one winner.

use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use log::error;
use ring::rand::SystemRandom;

use crate::error::ServiceError;
use crate::hash::SaltedHash;
use crate::models::{NewUser, User};
use crate::schema::users;

fn store_error(e: DieselError) -> ServiceError {
    match e {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            ServiceError::DuplicateUsername
        }
        e => {
            error!("credential store query failed: {}", e);
            ServiceError::StoreUnavailable
        }
    }
}

fn find_user(conn: &SqliteConnection, name: &str) -> Result<Option<User>, ServiceError> {
    users::table
        .filter(users::username.eq(name))
        .first::<User>(conn)
        .optional()
        .map_err(store_error)
}

/// Insert a new user record with a freshly salted digest of `password`.
///
/// No username or password validation beyond uniqueness: any string that
/// does not collide with an existing username is accepted.
pub fn register(
    conn: &SqliteConnection,
    rng: &SystemRandom,
    username: &str,
    password: &str,
) -> Result<User, ServiceError> {
    let SaltedHash { salt, hash } = SaltedHash::from_password(rng, password)?;

    let new_user = NewUser {
        username: username.to_string(),
        salt_base64: base64::encode(&salt),
        argon2_hash: String::from_utf8(hash).map_err(|_| ServiceError::Internal)?,
    };

    diesel::insert_into(users::table)
        .values(&new_user)
        .execute(conn)
        .map_err(store_error)?;

    // SQLite has no RETURNING; read the inserted row back by its unique key.
    match find_user(conn, username)? {
        Some(user) => Ok(user),
        None => {
            error!("user '{}' missing immediately after insert", username);
            Err(ServiceError::StoreUnavailable)
        }
    }
}

/// Check `password` against the stored digest for `username`.
///
/// An unknown username is an ordinary `false`, not an error.
pub fn verify(conn: &SqliteConnection, username: &str, password: &str) -> Result<bool, ServiceError> {
    let user = match find_user(conn, username)? {
        Some(user) => user,
        None => return Ok(false),
    };

    let salt = user.salt()?;

    Ok(SaltedHash::matches(&salt, user.argon2_hash.as_bytes(), password))
}

#[cfg(test)]
mod tests {
    use super::*;
    use diesel::connection::SimpleConnection;
    use std::sync::{Arc, Barrier};
    use std::thread;
    use tempfile::TempDir;

    fn scratch_store() -> (TempDir, SqliteConnection) {
        let dir = tempfile::tempdir().expect("tempdir");
        let conn = open(&db_url(&dir));
        crate::embedded_migrations::run(&conn).expect("migrations");
        (dir, conn)
    }

    fn db_url(dir: &TempDir) -> String {
        dir.path().join("users.db").to_str().expect("utf8 path").to_string()
    }

    fn open(url: &str) -> SqliteConnection {
        let conn = SqliteConnection::establish(url).expect("establish");
        conn.batch_execute("PRAGMA journal_mode = WAL; PRAGMA busy_timeout = 5000;")
            .expect("pragmas");
        conn
    }

    #[test]
    fn register_then_verify_round_trip() {
        let (_dir, conn) = scratch_store();
        let rng = SystemRandom::new();

        let user = register(&conn, &rng, "alice", "secret1").unwrap();
        assert_eq!(user.username, "alice");
        assert!(verify(&conn, "alice", "secret1").unwrap());
    }

    #[test]
    fn verify_rejects_wrong_password() {
        let (_dir, conn) = scratch_store();
        let rng = SystemRandom::new();

        register(&conn, &rng, "alice", "secret1").unwrap();
        assert!(!verify(&conn, "alice", "wrong").unwrap());
    }

    #[test]
    fn verify_unknown_username_is_false_not_error() {
        let (_dir, conn) = scratch_store();

        assert!(!verify(&conn, "nobody", "anything").unwrap());
    }

    #[test]
    fn duplicate_register_is_rejected_and_preserves_digest() {
        let (_dir, conn) = scratch_store();
        let rng = SystemRandom::new();

        register(&conn, &rng, "alice", "secret1").unwrap();
        let stored = find_user(&conn, "alice").unwrap().unwrap();

        let err = register(&conn, &rng, "alice", "other").unwrap_err();
        assert_eq!(err, ServiceError::DuplicateUsername);

        let after = find_user(&conn, "alice").unwrap().unwrap();
        assert_eq!(after.argon2_hash, stored.argon2_hash);
        assert_eq!(after.salt_base64, stored.salt_base64);
        assert!(verify(&conn, "alice", "secret1").unwrap());
        assert!(!verify(&conn, "alice", "other").unwrap());
    }

    #[test]
    fn registration_is_permissive_about_format() {
        let (_dir, conn) = scratch_store();
        let rng = SystemRandom::new();

        // Only uniqueness is enforced; empty and one-character inputs pass.
        register(&conn, &rng, "", "x").unwrap();
        assert!(verify(&conn, "", "x").unwrap());
    }

    #[test]
    fn concurrent_duplicate_signup_has_single_winner() {
        let dir = tempfile::tempdir().expect("tempdir");
        let url = db_url(&dir);
        crate::embedded_migrations::run(&open(&url)).expect("migrations");

        let barrier = Arc::new(Barrier::new(2));
        let handles: Vec<_> = (0..2)
            .map(|_| {
                let url = url.clone();
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    let conn = open(&url);
                    let rng = SystemRandom::new();
                    barrier.wait();
                    register(&conn, &rng, "bob", "x").map(|user| user.username)
                })
            })
            .collect();

        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        let winners = results.iter().filter(|r| r.is_ok()).count();
        assert_eq!(winners, 1);

        let losers: Vec<_> = results.iter().filter_map(|r| r.as_ref().err()).collect();
        assert_eq!(losers, vec![&ServiceError::DuplicateUsername]);
    }
}
