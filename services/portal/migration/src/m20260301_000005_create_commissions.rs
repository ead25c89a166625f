use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Commissions::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Commissions::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Commissions::PartnerId).uuid().not_null())
                    .col(ColumnDef::new(Commissions::CustomerId).uuid().not_null())
                    // Commissions outlive the employee they were earned on.
                    .col(ColumnDef::new(Commissions::EmployeeId).uuid().not_null())
                    .col(ColumnDef::new(Commissions::DeviceId).uuid().null())
                    .col(ColumnDef::new(Commissions::Kind).string().not_null())
                    .col(ColumnDef::new(Commissions::Amount).big_integer().not_null())
                    .col(
                        ColumnDef::new(Commissions::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Commissions::Table, Commissions::PartnerId)
                            .to(Partners::Table, Partners::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Commissions::Table, Commissions::CustomerId)
                            .to(Customers::Table, Customers::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .table(Commissions::Table)
                    .col(Commissions::PartnerId)
                    .col(Commissions::CreatedAt)
                    .name("idx_commissions_partner_id_created_at")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Commissions::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Commissions {
    Table,
    Id,
    PartnerId,
    CustomerId,
    EmployeeId,
    DeviceId,
    Kind,
    Amount,
    CreatedAt,
}

#[derive(Iden)]
enum Partners {
    Table,
    Id,
}

#[derive(Iden)]
enum Customers {
    Table,
    Id,
}
