use lazy_static::lazy_static;

// these secret values are loaded from /run/secrets at runtime
#[cfg(not(test))]
lazy_static! {
    pub static ref PEPPER: [u8; 32] = secret_bytes("dashgate_pepper");
    pub static ref COOKIE_KEY: [u8; 32] = secret_bytes("dashgate_cookie_key");
}

// we don't have access to Docker secrets in the test environment, so we hardcode
// a different set of secrets to be used in test builds.
#[cfg(test)]
lazy_static! {
    pub static ref PEPPER: [u8; 32] = *b"fJ2xJ0dQqnJ7cJBJpXvRw4hYkT8mZsE3";
    pub static ref COOKIE_KEY: [u8; 32] = *b"Vq1uN6gTcY0rPbWdK3zMhL9xSaF5eJ2o";
}

#[cfg(not(test))]
fn secret_bytes(name: &str) -> [u8; 32] {
    use log::error;
    use std::fs::File;
    use std::io::{ErrorKind, Read};
    use std::path::Path;

    let path = Path::new("/run/secrets").join(name);

    let mut f = match File::open(&path) {
        Ok(f) => f,
        Err(e) => {
            match e.kind() {
                ErrorKind::NotFound => error!(
                    "{} not found. Make sure to create the '{}' secret with \
                     'docker secret create' before starting the service.",
                    path.display(),
                    name,
                ),
                _ => error!("Failed to open {}: {}", path.display(), e),
            }

            std::process::exit(1);
        }
    };

    let mut data = [0; 32];
    match f.read_exact(&mut data) {
        Ok(()) => data,
        Err(e) => {
            error!("Failed to read {}: {}", path.display(), e);
            std::process::exit(1);
        }
    }
}
