use chrono::Utc;
use sea_orm::{
    sea_query::OnConflict, ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseConnection,
    DbErr, EntityTrait, PaginatorTrait, QueryFilter,
};

use crate::{
    models::address::{self, ActiveModel, Entity as AddressEntity, Model as Address},
    utils::crypto::generate_id,
};

/// Normalized address fields, ready to store.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAddress {
    pub line1: String,
    pub line2: Option<String>,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
}

pub struct AddressesRepo {
    db: DatabaseConnection,
}

impl AddressesRepo {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn get_by_user(&self, user_id: &str) -> Result<Option<Address>, DbErr> {
        AddressEntity::find()
            .filter(address::Column::UserId.eq(user_id))
            .one(&self.db)
            .await
    }

    pub async fn count_for_user(&self, user_id: &str) -> Result<u64, DbErr> {
        AddressEntity::find()
            .filter(address::Column::UserId.eq(user_id))
            .count(&self.db)
            .await
    }

    /// Insert the user's address, or overwrite it in place if one exists.
    /// Keyed on the unique `user_id`, so a user never has two rows.
    pub async fn upsert_for_user<C: ConnectionTrait>(
        conn: &C,
        user_id: &str,
        new_address: NewAddress,
    ) -> Result<(), DbErr> {
        let now = Utc::now().naive_utc();

        let address_model = ActiveModel {
            id: Set(generate_id()),
            user_id: Set(user_id.to_string()),
            line1: Set(new_address.line1),
            line2: Set(new_address.line2),
            city: Set(new_address.city),
            state: Set(new_address.state),
            postal_code: Set(new_address.postal_code),
            country: Set(new_address.country),
            created_at: Set(now),
            updated_at: Set(Some(now)),
        };

        AddressEntity::insert(address_model)
            .on_conflict(
                OnConflict::column(address::Column::UserId)
                    .update_columns([
                        address::Column::Line1,
                        address::Column::Line2,
                        address::Column::City,
                        address::Column::State,
                        address::Column::PostalCode,
                        address::Column::Country,
                        address::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(conn)
            .await?;

        Ok(())
    }
}
