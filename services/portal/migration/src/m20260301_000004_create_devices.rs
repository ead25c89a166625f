use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Devices::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Devices::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Devices::Name).string().not_null())
                    .col(
                        ColumnDef::new(Devices::Os)
                            .string()
                            .not_null()
                            .default("other"),
                    )
                    .col(ColumnDef::new(Devices::OwnerType).string().not_null())
                    .col(ColumnDef::new(Devices::CustomerId).uuid().null())
                    .col(
                        ColumnDef::new(Devices::Status)
                            .string()
                            .not_null()
                            .default("available"),
                    )
                    .col(ColumnDef::new(Devices::AssignedEmployeeId).uuid().null())
                    .col(
                        ColumnDef::new(Devices::CyberProtectionEnabled)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Devices::EncryptionEnabled)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Devices::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Devices::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .table(Devices::Table)
                    .col(Devices::CustomerId)
                    .name("idx_devices_customer_id")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Devices::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Devices {
    Table,
    Id,
    Name,
    Os,
    OwnerType,
    CustomerId,
    Status,
    AssignedEmployeeId,
    CyberProtectionEnabled,
    EncryptionEnabled,
    CreatedAt,
    UpdatedAt,
}
