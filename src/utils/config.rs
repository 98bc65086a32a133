use crate::db::DatabaseProvider;
use chrono::Duration;
use std::env;
use std::fmt;
use tokio::net::TcpListener;

/// Startup configuration failures. Any of these aborts the process.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{key} has invalid value {value:?}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Clone)]
pub struct DatabaseConfig {
    /// Local SQLite file, or `:memory:`
    pub path: String,
    pub turso_url: Option<String>,
    pub turso_auth_token: Option<String>,
}

#[derive(Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    /// Token lifetime, validated from `JWT_EXPIRATION_HOURS`
    pub jwt_expiration: Duration,
    pub password_hash_cost: u32,
    pub password_hash_memory_kib: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
}

#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Default filter directive; `RUST_LOG` wins when set
    pub level: String,
    pub format: LogFormat,
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"<redacted>")
            .field("jwt_expiration", &self.jwt_expiration)
            .field("password_hash_cost", &self.password_hash_cost)
            .field("password_hash_memory_kib", &self.password_hash_memory_kib)
            .finish()
    }
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("path", &self.path)
            .field("turso_url", &self.turso_url)
            .field(
                "turso_auth_token",
                &self.turso_auth_token.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}

impl AuthConfig {
    pub fn token_lifetime(&self) -> Duration {
        self.jwt_expiration
    }
}

impl ServerConfig {
    /// Binds the listen socket. `host` may be an IP literal or a hostname.
    pub async fn bind(&self) -> std::io::Result<TcpListener> {
        TcpListener::bind((self.host.as_str(), self.port)).await
    }
}

impl DatabaseConfig {
    pub fn provider(&self) -> DatabaseProvider {
        let turso = match (&self.turso_url, &self.turso_auth_token) {
            (Some(url), Some(token)) => Some((url.clone(), token.clone())),
            _ => None,
        };
        DatabaseProvider::resolve(&self.path, turso)
    }
}

fn parse<T>(key: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: fmt::Display,
{
    match raw {
        None => Ok(default),
        Some(value) => value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            key,
            reason: e.to_string(),
            value,
        }),
    }
}

fn positive<T>(key: &'static str, value: T) -> Result<T, ConfigError>
where
    T: PartialOrd + Default + fmt::Display,
{
    if value > T::default() {
        Ok(value)
    } else {
        Err(ConfigError::Invalid {
            key,
            value: value.to_string(),
            reason: "must be greater than zero".to_string(),
        })
    }
}

fn hours(key: &'static str, value: i64) -> Result<Duration, ConfigError> {
    Duration::try_hours(value).ok_or_else(|| ConfigError::Invalid {
        key,
        value: value.to_string(),
        reason: "too large for a duration".to_string(),
    })
}

impl Config {
    /// Reads configuration from the process environment.
    ///
    /// Call [`load_dotenv`](Self::load_dotenv) first to pick up a `.env` file.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Loads a `.env` file into the environment: the given path, or `./.env`
    /// if present. Existing variables are not overridden.
    pub fn load_dotenv(path: Option<&std::path::Path>) -> Result<(), ConfigError> {
        match path {
            Some(path) => dotenvy::from_path(path)
                .map(|_| ())
                .map_err(|e| ConfigError::Invalid {
                    key: "--env-file",
                    value: path.display().to_string(),
                    reason: e.to_string(),
                }),
            None => {
                dotenvy::dotenv().ok();
                Ok(())
            }
        }
    }

    /// Builds a config from any key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let jwt_secret = get("JWT_SECRET").ok_or(ConfigError::Missing("JWT_SECRET"))?;

        let format = match get("LOG_FORMAT").as_deref().map(str::to_ascii_lowercase) {
            None => LogFormat::Json,
            Some(f) if f == "json" => LogFormat::Json,
            Some(f) if f == "pretty" => LogFormat::Pretty,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    key: "LOG_FORMAT",
                    value: other,
                    reason: "expected json or pretty".to_string(),
                })
            }
        };

        Ok(Config {
            server: ServerConfig {
                host: get("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
                port: parse("PORT", get("PORT"), 8000)?,
            },
            database: DatabaseConfig {
                path: get("DATABASE_PATH").unwrap_or_else(|| "todos.db".to_string()),
                turso_url: get("TURSO_DATABASE_URL"),
                turso_auth_token: get("TURSO_AUTH_TOKEN"),
            },
            auth: AuthConfig {
                jwt_secret,
                jwt_expiration: hours(
                    "JWT_EXPIRATION_HOURS",
                    positive(
                        "JWT_EXPIRATION_HOURS",
                        parse("JWT_EXPIRATION_HOURS", get("JWT_EXPIRATION_HOURS"), 24i64)?,
                    )?,
                )?,
                password_hash_cost: positive(
                    "PASSWORD_HASH_COST",
                    parse("PASSWORD_HASH_COST", get("PASSWORD_HASH_COST"), 2u32)?,
                )?,
                password_hash_memory_kib: positive(
                    "PASSWORD_HASH_MEMORY_KIB",
                    parse(
                        "PASSWORD_HASH_MEMORY_KIB",
                        get("PASSWORD_HASH_MEMORY_KIB"),
                        19_456u32,
                    )?,
                )?,
            },
            log: LogConfig {
                level: get("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
                format,
            },
        })
    }
}
