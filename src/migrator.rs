use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_users_table::Migration),
            Box::new(m20240101_000002_create_items_table::Migration),
            Box::new(m20240101_000003_create_item_history_table::Migration),
            Box::new(m20240101_000004_create_used_items_table::Migration),
            Box::new(m20240101_000005_create_item_requests_table::Migration),
            Box::new(m20240101_000006_create_notifications_table::Migration),
        ]
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Username,
    FirstName,
    LastName,
    Email,
    PasswordHash,
    Role,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Items {
    Table,
    Id,
    Manufacturer,
    Model,
    PartOrUnit,
    PartNumber,
    Description,
    Location,
    Quantity,
    MinQuantity,
    UnitPrice,
    LastModifiedBy,
    CreatedAt,
    UpdatedAt,
}

mod m20240101_000001_create_users_table {
    use super::Users;
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000001_create_users_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Users::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Users::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(Users::Username)
                                .string_len(150)
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Users::FirstName).string_len(150).not_null())
                        .col(ColumnDef::new(Users::LastName).string_len(150).not_null())
                        .col(ColumnDef::new(Users::Email).string_len(254).not_null())
                        .col(ColumnDef::new(Users::PasswordHash).text().not_null())
                        .col(ColumnDef::new(Users::Role).string_len(20).not_null())
                        .col(
                            ColumnDef::new(Users::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Users::Table).to_owned())
                .await
        }
    }
}

mod m20240101_000002_create_items_table {
    use super::{Items, Users};
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000002_create_items_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Items::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Items::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(Items::Manufacturer)
                                .string_len(50)
                                .not_null()
                                .default("N/A"),
                        )
                        .col(
                            ColumnDef::new(Items::Model)
                                .string_len(100)
                                .not_null()
                                .default("N/A"),
                        )
                        .col(
                            ColumnDef::new(Items::PartOrUnit)
                                .string_len(10)
                                .not_null()
                                .default("Part"),
                        )
                        .col(
                            ColumnDef::new(Items::PartNumber)
                                .string_len(100)
                                .not_null()
                                .default(""),
                        )
                        .col(ColumnDef::new(Items::Description).text().not_null())
                        .col(
                            ColumnDef::new(Items::Location)
                                .string_len(50)
                                .not_null()
                                .default("N/A"),
                        )
                        .col(
                            ColumnDef::new(Items::Quantity)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(Items::MinQuantity)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(Items::UnitPrice)
                                .decimal_len(16, 2)
                                .not_null(),
                        )
                        .col(ColumnDef::new(Items::LastModifiedBy).integer().null())
                        .col(
                            ColumnDef::new(Items::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Items::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_items_last_modified_by")
                                .from(Items::Table, Items::LastModifiedBy)
                                .to(Users::Table, Users::Id)
                                .on_delete(ForeignKeyAction::SetNull),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_items_listing_order")
                        .table(Items::Table)
                        .col(Items::Manufacturer)
                        .col(Items::Model)
                        .col(Items::PartNumber)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Items::Table).to_owned())
                .await
        }
    }
}

mod m20240101_000003_create_item_history_table {
    use super::{Items, Users};
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000003_create_item_history_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(ItemHistory::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(ItemHistory::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(ItemHistory::ItemId).integer().not_null())
                        .col(ColumnDef::new(ItemHistory::Action).string_len(10).not_null())
                        .col(ColumnDef::new(ItemHistory::UserId).integer().null())
                        .col(ColumnDef::new(ItemHistory::Changes).text().not_null())
                        .col(
                            ColumnDef::new(ItemHistory::Timestamp)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_item_history_item")
                                .from(ItemHistory::Table, ItemHistory::ItemId)
                                .to(Items::Table, Items::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_item_history_user")
                                .from(ItemHistory::Table, ItemHistory::UserId)
                                .to(Users::Table, Users::Id)
                                .on_delete(ForeignKeyAction::SetNull),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_item_history_item_id")
                        .table(ItemHistory::Table)
                        .col(ItemHistory::ItemId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(ItemHistory::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum ItemHistory {
        Table,
        Id,
        ItemId,
        Action,
        UserId,
        Changes,
        Timestamp,
    }
}

mod m20240101_000004_create_used_items_table {
    use super::{Items, Users};
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000004_create_used_items_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(UsedItems::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(UsedItems::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(UsedItems::ItemId).integer().not_null())
                        .col(ColumnDef::new(UsedItems::WorkOrder).integer().not_null())
                        .col(
                            ColumnDef::new(UsedItems::DatetimeUsed)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(ColumnDef::new(UsedItems::UsedBy).integer().null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_used_items_item")
                                .from(UsedItems::Table, UsedItems::ItemId)
                                .to(Items::Table, Items::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_used_items_user")
                                .from(UsedItems::Table, UsedItems::UsedBy)
                                .to(Users::Table, Users::Id)
                                .on_delete(ForeignKeyAction::SetNull),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(UsedItems::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum UsedItems {
        Table,
        Id,
        ItemId,
        WorkOrder,
        DatetimeUsed,
        UsedBy,
    }
}

mod m20240101_000005_create_item_requests_table {
    use super::{Items, Users};
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000005_create_item_requests_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(ItemRequests::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(ItemRequests::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(ItemRequests::Manufacturer)
                                .string_len(50)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ItemRequests::ModelPartNum)
                                .string_len(200)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ItemRequests::QuantityRequested)
                                .integer()
                                .not_null(),
                        )
                        .col(ColumnDef::new(ItemRequests::Description).text().not_null())
                        .col(
                            ColumnDef::new(ItemRequests::UnitPrice)
                                .decimal_len(16, 2)
                                .not_null(),
                        )
                        .col(ColumnDef::new(ItemRequests::ItemId).integer().null())
                        .col(
                            ColumnDef::new(ItemRequests::RequestedBy)
                                .integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ItemRequests::Timestamp)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ItemRequests::Status)
                                .string_len(10)
                                .not_null()
                                .default("Pending"),
                        )
                        .col(ColumnDef::new(ItemRequests::StatusChangedBy).integer().null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_item_requests_item")
                                .from(ItemRequests::Table, ItemRequests::ItemId)
                                .to(Items::Table, Items::Id)
                                .on_delete(ForeignKeyAction::SetNull),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_item_requests_requested_by")
                                .from(ItemRequests::Table, ItemRequests::RequestedBy)
                                .to(Users::Table, Users::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_item_requests_status_changed_by")
                                .from(ItemRequests::Table, ItemRequests::StatusChangedBy)
                                .to(Users::Table, Users::Id)
                                .on_delete(ForeignKeyAction::SetNull),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(ItemRequests::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum ItemRequests {
        Table,
        Id,
        Manufacturer,
        ModelPartNum,
        QuantityRequested,
        Description,
        UnitPrice,
        ItemId,
        RequestedBy,
        Timestamp,
        Status,
        StatusChangedBy,
    }
}

mod m20240101_000006_create_notifications_table {
    use super::Users;
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000006_create_notifications_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Notifications::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Notifications::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(Notifications::Subject)
                                .string_len(100)
                                .not_null(),
                        )
                        .col(ColumnDef::new(Notifications::Message).text().not_null())
                        .col(
                            ColumnDef::new(Notifications::IsRead)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(
                            ColumnDef::new(Notifications::Timestamp)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Notifications::UserId).integer().not_null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_notifications_user")
                                .from(Notifications::Table, Notifications::UserId)
                                .to(Users::Table, Users::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_notifications_user_unread")
                        .table(Notifications::Table)
                        .col(Notifications::UserId)
                        .col(Notifications::IsRead)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Notifications::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Notifications {
        Table,
        Id,
        Subject,
        Message,
        IsRead,
        Timestamp,
        UserId,
    }
}
