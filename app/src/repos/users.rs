use chrono::{NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, TransactionTrait,
};

use crate::{
    models::user::{self, ActiveModel, Entity as UserEntity, Model as User},
    repos::addresses::{AddressesRepo, NewAddress},
    utils::crypto::generate_id,
};

#[derive(Clone)]
pub struct UsersRepo {
    db: DatabaseConnection,
}

impl UsersRepo {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn create(
        &self,
        email: String,
        name: Option<String>,
        image: Option<String>,
    ) -> Result<User, DbErr> {
        let user_model = ActiveModel {
            id: Set(generate_id()),
            email: Set(email),
            name: Set(name),
            image: Set(image),
            birthday: Set(None),
            onboarded: Set(false),
            created_at: Set(Utc::now().naive_utc()),
            updated_at: Set(None),
        };

        user_model.insert(&self.db).await
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<User>, DbErr> {
        UserEntity::find_by_id(id.to_string()).one(&self.db).await
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, DbErr> {
        UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
    }

    pub async fn count(&self) -> Result<u64, DbErr> {
        UserEntity::find().count(&self.db).await
    }

    /// Refresh the avatar from the provider. The provider's name only fills
    /// a missing one, since onboarding may have set it.
    pub async fn update_identity(
        &self,
        user: User,
        name: Option<String>,
        image: Option<String>,
    ) -> Result<User, DbErr> {
        let name = name.filter(|_| user.name.is_none());
        let image = image.filter(|image| user.image.as_ref() != Some(image));
        if name.is_none() && image.is_none() {
            return Ok(user);
        }

        let mut user_model: ActiveModel = user.into();
        if let Some(name) = name {
            user_model.name = Set(Some(name));
        }
        if let Some(image) = image {
            user_model.image = Set(Some(image));
        }
        user_model.updated_at = Set(Some(Utc::now().naive_utc()));

        user_model.update(&self.db).await
    }

    /// Record the onboarding answers: profile fields on the user, the address
    /// upserted by owner, and `onboarded` flipped on. Runs in one transaction.
    pub async fn complete_onboarding(
        &self,
        user_id: &str,
        name: Option<String>,
        birthday: NaiveDate,
        address: NewAddress,
    ) -> Result<User, DbErr> {
        let txn = self.db.begin().await?;

        let user = UserEntity::find_by_id(user_id.to_string())
            .one(&txn)
            .await?
            .ok_or(DbErr::RecordNotFound(format!(
                "User with the id {} not found",
                user_id
            )))?;

        let mut user_model: ActiveModel = user.into();
        if let Some(name) = name {
            user_model.name = Set(Some(name));
        }
        user_model.birthday = Set(Some(birthday));
        user_model.onboarded = Set(true);
        user_model.updated_at = Set(Some(Utc::now().naive_utc()));
        let user = user_model.update(&txn).await?;

        AddressesRepo::upsert_for_user(&txn, user_id, address).await?;

        txn.commit().await?;

        Ok(user)
    }
}
