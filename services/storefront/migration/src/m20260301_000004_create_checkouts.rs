use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Checkouts::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Checkouts::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Checkouts::UserId).uuid().null())
                    .col(ColumnDef::new(Checkouts::Email).string().not_null())
                    .col(ColumnDef::new(Checkouts::Channel).string().not_null())
                    .col(ColumnDef::new(Checkouts::Currency).string_len(3).not_null())
                    .col(
                        ColumnDef::new(Checkouts::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Checkouts::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Checkouts::Table, Checkouts::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(CheckoutLines::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CheckoutLines::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CheckoutLines::CheckoutId).uuid().not_null())
                    .col(ColumnDef::new(CheckoutLines::VariantId).uuid().not_null())
                    .col(ColumnDef::new(CheckoutLines::Quantity).integer().not_null())
                    .col(
                        ColumnDef::new(CheckoutLines::Position)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(CheckoutLines::Table, CheckoutLines::CheckoutId)
                            .to(Checkouts::Table, Checkouts::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(CheckoutLines::Table, CheckoutLines::VariantId)
                            .to(ProductVariants::Table, ProductVariants::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // One line per variant; repeated adds bump the quantity.
        manager
            .create_index(
                Index::create()
                    .name("uq_checkout_lines_checkout_variant")
                    .table(CheckoutLines::Table)
                    .col(CheckoutLines::CheckoutId)
                    .col(CheckoutLines::VariantId)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CheckoutLines::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Checkouts::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Checkouts {
    Table,
    Id,
    UserId,
    Email,
    Channel,
    Currency,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum CheckoutLines {
    Table,
    Id,
    CheckoutId,
    VariantId,
    Quantity,
    Position,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
}

#[derive(Iden)]
enum ProductVariants {
    Table,
    Id,
}
