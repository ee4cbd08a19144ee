use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter,
};

use crate::{
    models::account::{self, ActiveModel, Entity as AccountEntity, Model as Account},
    utils::crypto::generate_id,
};

/// Provider tokens as they are written to the table (already encrypted).
#[derive(Debug, Clone, Default)]
pub struct StoredTokens {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub expires_at: Option<i64>,
    pub scope: Option<String>,
}

pub struct AccountsRepo {
    db: DatabaseConnection,
}

impl AccountsRepo {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn find_by_provider_account(
        &self,
        provider: &str,
        provider_account_id: &str,
    ) -> Result<Option<Account>, DbErr> {
        AccountEntity::find()
            .filter(account::Column::Provider.eq(provider))
            .filter(account::Column::ProviderAccountId.eq(provider_account_id))
            .one(&self.db)
            .await
    }

    pub async fn get_by_user(&self, user_id: &str) -> Result<Vec<Account>, DbErr> {
        AccountEntity::find()
            .filter(account::Column::UserId.eq(user_id))
            .all(&self.db)
            .await
    }

    pub async fn create(
        &self,
        user_id: String,
        provider: String,
        provider_account_id: String,
        tokens: StoredTokens,
    ) -> Result<Account, DbErr> {
        let account_model = ActiveModel {
            id: Set(generate_id()),
            user_id: Set(user_id),
            provider: Set(provider),
            provider_account_id: Set(provider_account_id),
            access_token: Set(tokens.access_token),
            refresh_token: Set(tokens.refresh_token),
            expires_at: Set(tokens.expires_at),
            scope: Set(tokens.scope),
            created_at: Set(Utc::now().naive_utc()),
        };

        account_model.insert(&self.db).await
    }

    /// Google only returns a refresh token on first consent, so a missing one
    /// keeps the stored value.
    pub async fn update_tokens(
        &self,
        account: Account,
        tokens: StoredTokens,
    ) -> Result<Account, DbErr> {
        let mut account_model: ActiveModel = account.into();
        account_model.access_token = Set(tokens.access_token);
        if tokens.refresh_token.is_some() {
            account_model.refresh_token = Set(tokens.refresh_token);
        }
        account_model.expires_at = Set(tokens.expires_at);
        account_model.scope = Set(tokens.scope);

        account_model.update(&self.db).await
    }
}
