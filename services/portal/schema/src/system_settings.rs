use sea_orm::entity::prelude::*;

/// Singleton row; `id` is always [`SINGLETON_ID`].
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "system_settings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i32,
    pub company_name: String,
    pub support_email: String,
    pub default_partner_commission_rate: f64,
    pub maintenance_mode: bool,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

pub const SINGLETON_ID: i32 = 1;

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
