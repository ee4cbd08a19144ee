use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // One address per user, replaced in place by the onboarding upsert
        manager
            .create_table(
                Table::create()
                    .table(Alias::new("addresses"))
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Alias::new("id"))
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Alias::new("user_id")).string().not_null())
                    .col(ColumnDef::new(Alias::new("line1")).string().not_null())
                    .col(ColumnDef::new(Alias::new("line2")).string().null())
                    .col(ColumnDef::new(Alias::new("city")).string().not_null())
                    .col(ColumnDef::new(Alias::new("state")).string().not_null())
                    .col(
                        ColumnDef::new(Alias::new("postal_code"))
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Alias::new("country"))
                            .string()
                            .not_null()
                            .default("US"),
                    )
                    .col(
                        ColumnDef::new(Alias::new("created_at"))
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Alias::new("updated_at")).timestamp().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_addresses_users")
                            .from(Alias::new("addresses"), Alias::new("user_id"))
                            .to(Alias::new("users"), Alias::new("id"))
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // The upsert conflicts on this index
        manager
            .create_index(
                Index::create()
                    .name("idx_addresses_user_id")
                    .table(Alias::new("addresses"))
                    .col(Alias::new("user_id"))
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Alias::new("addresses")).to_owned())
            .await?;

        Ok(())
    }
}
