use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("password hashing failed: {0}")]
    HashingFailed(String),
    #[error("stored password hash is invalid: {0}")]
    InvalidHash(String),
}

fn hash_blocking(password: &str) -> Result<String, Error> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| Error::HashingFailed(err.to_string()))
}

fn verify_blocking(password: &str, hash: &str) -> Result<bool, Error> {
    let parsed_hash = PasswordHash::new(hash).map_err(|err| Error::InvalidHash(err.to_string()))?;

    match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(err) => Err(Error::HashingFailed(err.to_string())),
    }
}

/// Hashes a password with Argon2id and a fresh salt, returning a PHC string.
/// Runs on the blocking pool.
pub async fn hash(password: &str) -> Result<String, Error> {
    let password = password.to_owned();

    tokio::task::spawn_blocking(move || hash_blocking(&password))
        .await
        .map_err(|err| Error::HashingFailed(err.to_string()))?
}

/// A mismatch is `Ok(false)`; only an unusable hash or engine failure is an error.
pub async fn verify(password: &str, hash: &str) -> Result<bool, Error> {
    let password = password.to_owned();
    let hash = hash.to_owned();

    tokio::task::spawn_blocking(move || verify_blocking(&password, &hash))
        .await
        .map_err(|err| Error::HashingFailed(err.to_string()))?
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn verifies_its_own_hash() {
        let hashed = hash("correct horse battery staple").await.unwrap();
        assert!(verify("correct horse battery staple", &hashed).await.unwrap());
    }

    #[tokio::test]
    async fn rejects_other_passwords() {
        let hashed = hash("password").await.unwrap();
        assert!(!verify("Password", &hashed).await.unwrap());
        assert!(!verify("", &hashed).await.unwrap());
    }

    #[tokio::test]
    async fn salts_every_hash() {
        assert_ne!(
            hash("password").await.unwrap(),
            hash("password").await.unwrap()
        );
    }

    #[tokio::test]
    async fn hash_is_not_the_plaintext() {
        let hashed = hash("password").await.unwrap();
        assert!(hashed.starts_with("$argon2id$"));
        assert!(!hashed.contains("password"));
    }

    #[tokio::test]
    async fn garbage_hash_is_an_error() {
        assert!(matches!(
            verify("password", "not-a-phc-string").await,
            Err(Error::InvalidHash(_))
        ));
    }

    #[tokio::test]
    async fn hashing_leaves_the_runtime_thread_free() {
        let hashing = tokio::spawn(async { hash("password").await });

        // one scheduler turn: the hashing task starts, then control comes back here
        tokio::task::yield_now().await;
        assert!(!hashing.is_finished());

        assert!(hashing.await.unwrap().is_ok());
    }
}
