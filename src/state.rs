use crate::auth::TokenService;
use crate::db::CredentialLookup;
use std::sync::Arc;

/// Shared, read-only application state.
pub struct AppState {
    pub users: Arc<dyn CredentialLookup>,
    pub tokens: TokenService,
}

impl AppState {
    pub fn new(users: Arc<dyn CredentialLookup>, tokens: TokenService) -> Self {
        Self { users, tokens }
    }
}
