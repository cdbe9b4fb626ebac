use crate::auth::expiry_after;
use crate::error::ConfigError;
use std::env;
use std::path::PathBuf;

const DEFAULT_TOKEN_TTL_SECS: i64 = 3600;

pub struct Config {
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub token_ttl_secs: i64,
    pub users_file: Option<PathBuf>,
}

// Keeps the secret out of startup logs.
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("jwt_secret", &"<redacted>")
            .field("token_ttl_secs", &self.token_ttl_secs)
            .field("users_file", &self.users_file)
            .finish()
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from any key lookup; `from_env` passes the process env.
    pub fn from_lookup<F>(get: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let jwt_secret = get("JWT_SECRET")
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::MissingSecret)?;

        let port = match get("PORT") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::InvalidValue {
                var: "PORT",
                value: raw,
            })?,
            None => 8000,
        };

        let token_ttl_secs = match get("JWT_EXPIRES_IN_SECS") {
            Some(raw) => match raw.parse::<i64>() {
                Ok(secs) if secs > 0 && expiry_after(chrono::Utc::now(), secs).is_some() => secs,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        var: "JWT_EXPIRES_IN_SECS",
                        value: raw,
                    })
                }
            },
            None => DEFAULT_TOKEN_TTL_SECS,
        };

        Ok(Self {
            host: get("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port,
            jwt_secret,
            token_ttl_secs,
            users_file: get("AUTH_USERS_FILE")
                .filter(|s| !s.is_empty())
                .map(PathBuf::from),
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
