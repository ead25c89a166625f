use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Employees::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Employees::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Employees::CustomerId).uuid().not_null())
                    .col(ColumnDef::new(Employees::FirstName).string().not_null())
                    .col(ColumnDef::new(Employees::LastName).string().not_null())
                    .col(ColumnDef::new(Employees::Email).string().not_null())
                    .col(ColumnDef::new(Employees::Location).string().not_null())
                    .col(ColumnDef::new(Employees::JobTitle).string().null())
                    .col(ColumnDef::new(Employees::Department).string().null())
                    .col(
                        ColumnDef::new(Employees::StartDate)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Employees::Status)
                            .string()
                            .not_null()
                            .default("onboarding"),
                    )
                    .col(ColumnDef::new(Employees::OnboardingStep).small_integer().null())
                    .col(ColumnDef::new(Employees::OffboardingStep).small_integer().null())
                    .col(
                        ColumnDef::new(Employees::DeviceAcquisitionOption)
                            .small_integer()
                            .null(),
                    )
                    // No foreign key; dangling links are repaired by reconcile.
                    .col(ColumnDef::new(Employees::DeviceId).uuid().null())
                    .col(
                        ColumnDef::new(Employees::SetupApproved)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Employees::DeviceApproved)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Employees::AccountDisabled)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Employees::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Employees::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Employees::Table, Employees::CustomerId)
                            .to(Customers::Table, Customers::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .table(Employees::Table)
                    .col(Employees::CustomerId)
                    .col(Employees::Email)
                    .name("uq_employees_customer_id_email")
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Employees::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Employees {
    Table,
    Id,
    CustomerId,
    FirstName,
    LastName,
    Email,
    Location,
    JobTitle,
    Department,
    StartDate,
    Status,
    OnboardingStep,
    OffboardingStep,
    DeviceAcquisitionOption,
    DeviceId,
    SetupApproved,
    DeviceApproved,
    AccountDisabled,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Customers {
    Table,
    Id,
}
