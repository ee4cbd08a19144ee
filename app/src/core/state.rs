use std::sync::Arc;

use anyhow::Result;
use sea_orm::DatabaseConnection;

use crate::config::config::Config;
use crate::services::{auth_adapter::AuthAdapter, google::IdentityProvider};
use crate::utils::encryption::TokenCipher;

/// Shared, read-only handle passed to every request handler.
#[derive(Clone, Debug)]
pub struct AppState {
    pub database: DatabaseConnection,
    pub config: Config,
    pub identity_provider: Arc<dyn IdentityProvider>,
    pub token_cipher: TokenCipher,
}

impl AppState {
    pub fn new(
        database: DatabaseConnection,
        config: Config,
        identity_provider: Arc<dyn IdentityProvider>,
    ) -> Result<Self> {
        let token_cipher = TokenCipher::new(config.encryption_key())?;

        Ok(Self {
            database,
            config,
            identity_provider,
            token_cipher,
        })
    }

    pub fn auth_adapter(&self) -> AuthAdapter {
        AuthAdapter::new(self.database.clone(), self.token_cipher.clone())
    }
}
