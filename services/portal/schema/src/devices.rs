use sea_orm::entity::prelude::*;

/// Inventory device, either customer-owned or pooled (`owner_type = 'belzir'`).
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "devices")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub os: String,
    pub owner_type: String,
    pub customer_id: Option<Uuid>,
    pub status: String,
    pub assigned_employee_id: Option<Uuid>,
    pub cyber_protection_enabled: bool,
    pub encryption_enabled: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
