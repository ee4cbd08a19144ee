use anyhow::{Context, Result};
use sea_orm::DatabaseConnection;
use tracing::info;

use crate::{
    models::user::Model as User,
    repos::{
        accounts::{AccountsRepo, StoredTokens},
        users::UsersRepo,
    },
    services::google::{ProviderIdentity, ProviderTokens},
    utils::encryption::TokenCipher,
};

/// Maps a verified provider identity onto user and account rows.
pub struct AuthAdapter {
    users: UsersRepo,
    accounts: AccountsRepo,
    cipher: TokenCipher,
}

impl AuthAdapter {
    pub fn new(db: DatabaseConnection, cipher: TokenCipher) -> Self {
        Self {
            users: UsersRepo::new(db.clone()),
            accounts: AccountsRepo::new(db),
            cipher,
        }
    }

    /// Resolve the signing-in user, creating it on first sign-in.
    ///
    /// Lookup order is linked account, then email, then a fresh user. New
    /// users start with `onboarded = false`.
    pub async fn sign_in(&self, identity: ProviderIdentity) -> Result<User> {
        let tokens = self.seal(&identity.tokens)?;

        if let Some(account) = self
            .accounts
            .find_by_provider_account(&identity.provider, &identity.provider_account_id)
            .await?
        {
            let user = self
                .users
                .find_by_id(&account.user_id)
                .await?
                .with_context(|| format!("Account {} has no user", account.id))?;

            self.accounts.update_tokens(account, tokens).await?;
            info!("Existing user signed in: {}", user.email);

            let user = self
                .users
                .update_identity(user, identity.name, identity.image)
                .await?;
            return Ok(user);
        }

        let user = match self.users.find_by_email(&identity.email).await? {
            Some(user) => {
                info!(
                    "Linking {} account to existing user {}",
                    identity.provider, user.email
                );
                user
            }
            None => {
                info!("Signing up new user: {}", identity.email);
                self.users
                    .create(identity.email.clone(), identity.name.clone(), identity.image.clone())
                    .await?
            }
        };

        self.accounts
            .create(
                user.id.clone(),
                identity.provider,
                identity.provider_account_id,
                tokens,
            )
            .await?;

        Ok(user)
    }

    fn seal(&self, tokens: &ProviderTokens) -> Result<StoredTokens> {
        let seal = |value: &Option<String>| -> Result<Option<String>> {
            value
                .as_deref()
                .map(|plain| self.cipher.encrypt(plain))
                .transpose()
        };

        Ok(StoredTokens {
            access_token: seal(&tokens.access_token)?,
            refresh_token: seal(&tokens.refresh_token)?,
            expires_at: tokens.expires_at,
            scope: tokens.scope.clone(),
        })
    }
}
