use crate::types::{Claims, Identity};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    decode, decode_header, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header,
    Validation,
};
use std::fmt;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

/// Why a token was rejected, or why the service could not be built.
///
/// The authentication gate hides the distinction from clients; it is kept
/// here for logs.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("token is malformed")]
    Malformed,

    #[error("token signature does not match")]
    Tampered,

    #[error("token has expired")]
    Expired,

    #[error("signing key misconfigured: {0}")]
    Config(String),
}

/// Source of the current time for issuing and checking tokens.
pub trait Clock: Send + Sync + fmt::Debug {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Settable clock with one-second resolution, for deterministic expiry.
#[derive(Debug)]
pub struct FixedClock {
    seconds: AtomicI64,
}

impl FixedClock {
    pub fn new(at: DateTime<Utc>) -> Self {
        Self {
            seconds: AtomicI64::new(at.timestamp()),
        }
    }

    pub fn set(&self, at: DateTime<Utc>) {
        self.seconds.store(at.timestamp(), Ordering::SeqCst);
    }

    pub fn advance(&self, by: Duration) {
        self.seconds.fetch_add(by.num_seconds(), Ordering::SeqCst);
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.seconds.load(Ordering::SeqCst), 0).unwrap_or_default()
    }
}

/// Issues and verifies stateless bearer tokens.
///
/// Tokens are HS256-signed JWTs carrying the subject id, display name,
/// issue time and expiry. Nothing is stored server-side: a token is valid
/// exactly while its signature checks out and its expiry lies in the future.
/// The secret and lifetime are fixed at construction.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    lifetime: Duration,
    clock: Arc<dyn Clock>,
}

impl TokenService {
    /// Lifetime used when none is configured.
    pub const DEFAULT_LIFETIME_HOURS: i64 = 24;

    const ALGORITHM: Algorithm = Algorithm::HS256;

    /// Creates a new TokenService with the given configuration.
    ///
    /// # Arguments
    /// * `secret` - Key material for the HMAC tag; must be non-empty
    /// * `lifetime` - How long an issued token stays valid; must be positive
    pub fn new(secret: &str, lifetime: Duration) -> Result<Self, TokenError> {
        if secret.is_empty() {
            return Err(TokenError::Config("signing secret is empty".to_string()));
        }
        if lifetime <= Duration::zero() {
            return Err(TokenError::Config(
                "token lifetime must be positive".to_string(),
            ));
        }

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            lifetime,
            clock: Arc::new(SystemClock),
        })
    }

    /// Replaces the clock, typically with a [`FixedClock`] in tests.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn lifetime(&self) -> Duration {
        self.lifetime
    }

    /// Issues a token for `subject_id`, valid for the configured lifetime.
    pub fn issue(&self, subject_id: &str, display_name: &str) -> Result<String, TokenError> {
        let issued_at = self.clock.now().timestamp();
        let claims = Claims {
            sub: subject_id.to_string(),
            name: display_name.to_string(),
            iat: issued_at,
            exp: issued_at + self.lifetime.num_seconds(),
        };

        encode(&Header::new(Self::ALGORITHM), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Config(format!("failed to sign token: {}", e)))
    }

    /// Verifies a token and returns the identity it asserts.
    ///
    /// Checks run in order: structure and algorithm (`Malformed`), signature
    /// (`Tampered`), expiry against the service clock (`Expired`).
    pub fn verify(&self, token: &str) -> Result<Identity, TokenError> {
        let header = decode_header(token).map_err(|_| TokenError::Malformed)?;
        if header.alg != Self::ALGORITHM {
            return Err(TokenError::Malformed);
        }

        let mut validation = Validation::new(Self::ALGORITHM);
        // Expiry is checked below against the injected clock.
        validation.validate_exp = false;
        validation.leeway = 0;

        let claims = decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature => TokenError::Tampered,
                _ => TokenError::Malformed,
            })?;

        if self.clock.now().timestamp() >= claims.exp {
            return Err(TokenError::Expired);
        }

        Ok(Identity::from(claims))
    }
}

impl fmt::Debug for TokenService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenService")
            .field("algorithm", &Self::ALGORITHM)
            .field("lifetime", &self.lifetime)
            .field("clock", &self.clock)
            .finish_non_exhaustive()
    }
}
