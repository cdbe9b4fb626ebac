use crate::error::{ConfigError, StoreError};
use crate::models::UserRecord;
use std::collections::HashMap;
use std::path::Path;

/// Read-only lookup of stored accounts.
pub trait CredentialLookup: Send + Sync {
    fn find_by_username(&self, username: &str) -> Option<&UserRecord>;
}

/// Fixed user list, built once at startup and never mutated.
#[derive(Debug)]
pub struct InMemoryUsers {
    users: HashMap<String, UserRecord>,
}

impl InMemoryUsers {
    pub fn new(records: Vec<UserRecord>) -> Result<Self, StoreError> {
        let mut users = HashMap::with_capacity(records.len());
        for record in records {
            if users.contains_key(&record.username) {
                return Err(StoreError::DuplicateUsername(record.username));
            }
            users.insert(record.username.clone(), record);
        }
        Ok(Self { users })
    }

    /// The built-in account list used when no users file is configured.
    pub fn seeded() -> Self {
        let mut users = HashMap::new();
        users.insert("davirds".to_string(), UserRecord::new(1, "davirds", "123"));
        Self { users }
    }

    /// Loads a JSON array of `{id, username, password}` objects.
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let display = path.display().to_string();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::UsersFileIo {
            path: display.clone(),
            source,
        })?;
        let records: Vec<UserRecord> =
            serde_json::from_str(&raw).map_err(|source| ConfigError::UsersFileParse {
                path: display,
                source,
            })?;
        Ok(Self::new(records)?)
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

impl CredentialLookup for InMemoryUsers {
    fn find_by_username(&self, username: &str) -> Option<&UserRecord> {
        self.users.get(username)
    }
}
