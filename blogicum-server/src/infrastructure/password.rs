use std::sync::LazyLock;

use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{
        Error as PasswordHashError, PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
        rand_core::OsRng,
    },
};

use crate::domain::error::DomainError;

const MEMORY_KIB: u32 = 19 * 1024;
const ITERATIONS: u32 = 2;
const LANES: u32 = 1;

/// Checked against on unknown usernames so that a miss costs one full
/// verification, like a hit.
static DECOY_HASH: LazyLock<Option<String>> =
    LazyLock::new(|| hash_password("blogicum-decoy-password").ok());

fn hasher() -> Result<Argon2<'static>, DomainError> {
    let params = Params::new(MEMORY_KIB, ITERATIONS, LANES, None)
        .map_err(|err| DomainError::Unexpected(format!("argon2 params: {err}")))?;
    Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
}

/// Salted argon2id hash in PHC string form.
pub(crate) fn hash_password(raw: &str) -> Result<String, DomainError> {
    let salt = SaltString::generate(&mut OsRng);
    hasher()?
        .hash_password(raw.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| DomainError::Unexpected(format!("password hashing: {err}")))
}

/// `Ok(false)` on a wrong password; a stored hash that does not parse is an error.
pub(crate) fn password_matches(raw: &str, stored: &str) -> Result<bool, DomainError> {
    let parsed = PasswordHash::new(stored)
        .map_err(|err| DomainError::Unexpected(format!("stored password hash: {err}")))?;
    match hasher()?.verify_password(raw.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(PasswordHashError::Password) => Ok(false),
        Err(err) => Err(DomainError::Unexpected(format!("password check: {err}"))),
    }
}

pub(crate) fn spend_decoy_check(raw: &str) -> Result<(), DomainError> {
    if let Some(decoy) = DECOY_HASH.as_deref() {
        password_matches(raw, decoy)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{hash_password, password_matches, spend_decoy_check};
    use crate::domain::error::DomainError;

    #[test]
    fn hashes_are_salted_argon2id() {
        let first = hash_password("very-secure-password").expect("must hash");
        let second = hash_password("very-secure-password").expect("must hash");

        assert!(first.starts_with("$argon2id$v=19$m=19456,t=2,p=1$"));
        assert_ne!(first, second);
    }

    #[test]
    fn only_the_original_password_matches() {
        let stored = hash_password("very-secure-password").expect("must hash");

        assert!(password_matches("very-secure-password", &stored).expect("must verify"));
        assert!(!password_matches("very-secure-passwore", &stored).expect("must verify"));
    }

    #[test]
    fn unparsable_stored_hash_is_an_error() {
        let err = password_matches("whatever", "plaintext").expect_err("must fail");
        assert!(matches!(err, DomainError::Unexpected(_)));
    }

    #[test]
    fn decoy_check_never_fails_on_a_wrong_password() {
        spend_decoy_check("anything").expect("decoy check must not fail");
    }
}
