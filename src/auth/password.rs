use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};

/// Failures of the credential codec. Never carries the plaintext.
#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    #[error("invalid password hash cost: {0}")]
    InvalidCost(String),

    #[error("failed to encode password hash: {0}")]
    EncodingFailure(String),
}

/// Argon2id password hasher with a configurable cost.
///
/// Produces PHC strings (`$argon2id$v=19$m=...,t=...,p=...$salt$hash`) with a
/// fresh random salt per call, so hashing the same secret twice yields two
/// different strings that both verify. The cost parameters are embedded in
/// the hash, which lets the cost be raised without invalidating old hashes.
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    params: Params,
}

impl PasswordHasher {
    /// Iteration count used when none is configured.
    pub const DEFAULT_COST: u32 = 2;
    /// Memory cost in KiB used when none is configured (19 MiB).
    pub const DEFAULT_MEMORY_KIB: u32 = 19 * 1024;

    /// Creates a hasher with `cost` iterations over `memory_kib` KiB.
    pub fn new(cost: u32, memory_kib: u32) -> Result<Self, CredentialError> {
        let params = Params::new(memory_kib, cost, 1, None)
            .map_err(|e| CredentialError::InvalidCost(e.to_string()))?;
        Ok(Self { params })
    }

    /// Iteration count this hasher applies to new hashes.
    pub fn cost(&self) -> u32 {
        self.params.t_cost()
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    /// Hashes a password using Argon2id.
    ///
    /// Returns a PHC-formatted hash string.
    pub fn hash(&self, plaintext: &str) -> Result<String, CredentialError> {
        let salt = SaltString::generate(&mut OsRng);

        self.argon2()
            .hash_password(plaintext.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| CredentialError::EncodingFailure(e.to_string()))
    }

    /// Verifies a password against a stored PHC hash.
    ///
    /// Malformed hashes simply fail to verify. The comparison inside
    /// `argon2` is constant-time.
    pub fn verify(&self, plaintext: &str, stored_hash: &str) -> bool {
        let Ok(parsed_hash) = PasswordHash::new(stored_hash) else {
            return false;
        };

        // Params come from the stored hash, not from `self`.
        Argon2::default()
            .verify_password(plaintext.as_bytes(), &parsed_hash)
            .is_ok()
    }

    /// [`hash`](Self::hash) on the blocking pool.
    pub async fn hash_blocking(&self, plaintext: String) -> Result<String, CredentialError> {
        let hasher = self.clone();
        tokio::task::spawn_blocking(move || hasher.hash(&plaintext))
            .await
            .map_err(|e| CredentialError::EncodingFailure(format!("hash task failed: {}", e)))?
    }

    /// [`verify`](Self::verify) on the blocking pool. A panicked or
    /// cancelled task counts as a failed verification.
    pub async fn verify_blocking(&self, plaintext: String, stored_hash: String) -> bool {
        let hasher = self.clone();
        tokio::task::spawn_blocking(move || hasher.verify(&plaintext, &stored_hash))
            .await
            .unwrap_or(false)
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        // argon2's defaults are m=19456 KiB, t=2, p=1.
        Self {
            params: Params::default(),
        }
    }
}
