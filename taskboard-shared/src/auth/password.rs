/// Credential storage schemes
///
/// The `password` column holds whatever [`CredentialScheme::protect`] produced
/// at registration time, and login checks go through
/// [`CredentialScheme::verify`].
///
/// - `plaintext`: the password is stored and compared as-is. This is the
///   default because existing deployments hold plaintext rows. It is insecure
///   and the API logs a warning at startup when it is active.
/// - `argon2`: Argon2id PHC strings (`$argon2id$v=19$...`), verified in
///   constant time.
///
/// # Example
///
/// ```
/// use taskboard_shared::auth::password::CredentialScheme;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let scheme: CredentialScheme = "argon2".parse()?;
/// let stored = scheme.protect("hunter2")?;
///
/// assert!(scheme.verify("hunter2", &stored)?);
/// assert!(!scheme.verify("hunter3", &stored)?);
/// # Ok(())
/// # }
/// ```

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use std::fmt;
use std::str::FromStr;
use tracing::warn;

/// Error type for credential operations
#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    /// Failed to hash password
    #[error("Failed to hash password: {0}")]
    HashError(String),

    /// Failed to verify password
    #[error("Failed to verify password: {0}")]
    VerifyError(String),

    /// Invalid password hash format
    #[error("Invalid password hash format: {0}")]
    InvalidHash(String),

    /// Unrecognized scheme name in configuration
    #[error("Unknown password scheme: {0} (expected \"plaintext\" or \"argon2\")")]
    UnknownScheme(String),
}

/// How credentials are stored and compared
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CredentialScheme {
    /// Stored verbatim, compared by equality
    #[default]
    Plaintext,

    /// Argon2id hash
    Argon2,
}

impl CredentialScheme {
    /// Value to store for a freshly registered password
    pub fn protect(&self, password: &str) -> Result<String, PasswordError> {
        match self {
            CredentialScheme::Plaintext => Ok(password.to_string()),
            CredentialScheme::Argon2 => hash_password(password),
        }
    }

    /// Checks a login attempt against the stored value
    ///
    /// Under `argon2`, a stored value that is not a PHC string (a row written
    /// before the scheme was switched) never matches.
    pub fn verify(&self, password: &str, stored: &str) -> Result<bool, PasswordError> {
        match self {
            CredentialScheme::Plaintext => Ok(password == stored),
            CredentialScheme::Argon2 => match verify_password(password, stored) {
                Err(PasswordError::InvalidHash(reason)) => {
                    warn!(%reason, "Stored credential is not an Argon2 hash");
                    Ok(false)
                }
                other => other,
            },
        }
    }

    /// Whether this scheme stores passwords unprotected
    pub fn is_insecure(&self) -> bool {
        matches!(self, CredentialScheme::Plaintext)
    }

    /// Configuration name
    pub fn as_str(&self) -> &'static str {
        match self {
            CredentialScheme::Plaintext => "plaintext",
            CredentialScheme::Argon2 => "argon2",
        }
    }
}

impl FromStr for CredentialScheme {
    type Err = PasswordError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "plaintext" => Ok(CredentialScheme::Plaintext),
            "argon2" => Ok(CredentialScheme::Argon2),
            other => Err(PasswordError::UnknownScheme(other.to_string())),
        }
    }
}

impl fmt::Display for CredentialScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Hashes a password with Argon2id
///
/// 19 MiB memory, 2 passes, 1 lane, 32-byte output, random 16-byte salt.
///
/// # Returns
///
/// PHC string, e.g. `$argon2id$v=19$m=19456,t=2,p=1$<salt>$<hash>`
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);

    let params = Params::new(19_456, 2, 1, Some(32))
        .map_err(|e| PasswordError::HashError(format!("Invalid parameters: {}", e)))?;
    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| PasswordError::HashError(format!("Hash generation failed: {}", e)))?;

    Ok(hash.to_string())
}

/// Verifies a password against a PHC hash
///
/// Parameters are read from the hash itself.
///
/// # Errors
///
/// `InvalidHash` if `hash` cannot be parsed, `VerifyError` for any other
/// failure besides a plain mismatch.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, PasswordError> {
    let parsed = PasswordHash::new(hash)
        .map_err(|e| PasswordError::InvalidHash(format!("Failed to parse hash: {}", e)))?;

    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(PasswordError::VerifyError(format!("Verification failed: {}", e))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_scheme_is_plaintext() {
        assert_eq!(CredentialScheme::default(), CredentialScheme::Plaintext);
        assert!(CredentialScheme::default().is_insecure());
    }

    #[test]
    fn test_scheme_from_str() {
        assert_eq!("plaintext".parse::<CredentialScheme>().unwrap(), CredentialScheme::Plaintext);
        assert_eq!(" Argon2 ".parse::<CredentialScheme>().unwrap(), CredentialScheme::Argon2);
        assert!(matches!(
            "bcrypt".parse::<CredentialScheme>(),
            Err(PasswordError::UnknownScheme(_))
        ));
    }

    #[test]
    fn test_plaintext_stores_verbatim() {
        let scheme = CredentialScheme::Plaintext;
        let stored = scheme.protect("secret").unwrap();

        assert_eq!(stored, "secret");
        assert!(scheme.verify("secret", &stored).unwrap());
        assert!(!scheme.verify("Secret", &stored).unwrap());
    }

    #[test]
    fn test_hash_password_format() {
        let hash = hash_password("test_password_123").expect("Hash should succeed");

        assert!(hash.starts_with("$argon2id$"));
        assert!(hash.contains("v=19"));
        assert!(hash.contains("m=19456"));
        assert!(hash.contains("t=2"));
        assert!(hash.contains("p=1"));
    }

    #[test]
    fn test_hash_password_salts_differ() {
        let first = hash_password("same_password").expect("Hash 1 should succeed");
        let second = hash_password("same_password").expect("Hash 2 should succeed");
        assert_ne!(first, second);
    }

    #[test]
    fn test_argon2_scheme_verifies() {
        let scheme = CredentialScheme::Argon2;
        let stored = scheme.protect("correct_password").unwrap();

        assert_ne!(stored, "correct_password");
        assert!(scheme.verify("correct_password", &stored).unwrap());
        assert!(!scheme.verify("wrong_password", &stored).unwrap());
        assert!(!scheme.verify("", &stored).unwrap());
    }

    #[test]
    fn test_argon2_scheme_rejects_plaintext_rows() {
        let scheme = CredentialScheme::Argon2;
        assert!(!scheme.verify("secret", "secret").unwrap());
    }

    #[test]
    fn test_verify_password_invalid_hash() {
        assert!(matches!(
            verify_password("password", "invalid_hash"),
            Err(PasswordError::InvalidHash(_))
        ));
        assert!(matches!(
            verify_password("password", ""),
            Err(PasswordError::InvalidHash(_))
        ));
    }

    #[test]
    fn test_verify_password_hashless_phc_never_matches() {
        assert!(!verify_password("password", "$argon2id$invalid").unwrap());
    }
}
