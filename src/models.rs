use serde::{Deserialize, Serialize};

/// A stored account. Only ever lives inside the credential store.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserRecord {
    pub id: i64,
    pub username: String,
    pub password: String,
}

impl UserRecord {
    pub fn new(id: i64, username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            id,
            username: username.into(),
            password: password.into(),
        }
    }

    /// Everything except the password.
    pub fn public(&self) -> PublicUser {
        PublicUser {
            id: self.id,
            username: self.username.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicUser {
    pub id: i64,
    pub username: String,
}

/// Login payload. Fields stay loosely typed so the shape check can report
/// every violation instead of failing on the first bad field.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: Option<serde_json::Value>,
    #[serde(default)]
    pub password: Option<serde_json::Value>,
}

/// Credentials that passed the shape check.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl LoginRequest {
    pub fn into_credentials(self) -> Result<Credentials, Vec<String>> {
        let mut violations = Vec::new();
        let username = check_field("username", self.username, &mut violations);
        let password = check_field("password", self.password, &mut violations);

        match (username, password) {
            (Some(username), Some(password)) if violations.is_empty() => {
                Ok(Credentials { username, password })
            }
            _ => Err(violations),
        }
    }
}

fn check_field(
    name: &str,
    value: Option<serde_json::Value>,
    violations: &mut Vec<String>,
) -> Option<String> {
    match value {
        Some(serde_json::Value::String(s)) if !s.is_empty() => Some(s),
        Some(serde_json::Value::String(_)) => {
            violations.push(format!("{name} should not be empty"));
            None
        }
        Some(serde_json::Value::Null) | None => {
            violations.push(format!("{name} should not be empty"));
            violations.push(format!("{name} must be a string"));
            None
        }
        Some(_) => {
            violations.push(format!("{name} must be a string"));
            None
        }
    }
}

/// Token payload: the public user plus timing metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    #[serde(flatten)]
    pub user: PublicUser,
    pub iat: i64,
    pub exp: i64,
}
