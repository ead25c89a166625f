use sea_orm::entity::prelude::*;

/// Employee of a customer. Unique on `(customer_id, email)`.
///
/// `device_id` is a weak reference; the device row holds the matching
/// `assigned_employee_id`.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "employees")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub customer_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub location: String,
    pub job_title: Option<String>,
    pub department: Option<String>,
    pub start_date: Option<chrono::DateTime<chrono::Utc>>,
    pub status: String,
    pub onboarding_step: Option<i16>,
    pub offboarding_step: Option<i16>,
    pub device_acquisition_option: Option<i16>,
    pub device_id: Option<Uuid>,
    pub setup_approved: bool,
    pub device_approved: bool,
    pub account_disabled: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::customers::Entity",
        from = "Column::CustomerId",
        to = "super::customers::Column::Id"
    )]
    Customer,
}

impl Related<super::customers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Customer.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
