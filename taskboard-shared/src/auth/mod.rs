/// Credential handling
///
/// - [`password`]: credential schemes (`plaintext`, `argon2`) and Argon2id
///   hashing helpers
pub mod password;
