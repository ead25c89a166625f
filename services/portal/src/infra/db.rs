use anyhow::Context as _;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, Condition, ConnectionTrait,
    DatabaseConnection, DbErr, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
    SqlErr, TransactionError, TransactionTrait,
    sea_query::{Expr, OnConflict},
};
use uuid::Uuid;

use belzir_domain::device::{DeviceStatus, OwnerType};
use belzir_domain::employee::AcquisitionOption;
use belzir_domain::pagination::PageRequest;
use belzir_domain::record::RecordStatus;
use belzir_portal_schema::{
    audit_logs, commissions, customers, devices, employees, partners, system_settings,
};

use crate::domain::repository::{
    AuditRepository, CommissionFilter, CommissionRepository, CustomerRepository,
    DeviceRepository, EmployeeRepository, PartnerRepository, SettingsRepository,
};
use crate::domain::scope::Visibility;
use crate::domain::types::{
    AuditEntry, Commission, Customer, Device, DeviceMove, Employee, LifecycleWrite, Partner,
    SystemSettings,
};
use crate::error::PortalError;

const CLAIM_REJECTED: &str = "device claim matched no available device";

/// Unique violations become `DuplicateKey`; everything else is internal.
fn write_error(err: DbErr, what: &'static str) -> PortalError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => PortalError::DuplicateKey(what.to_owned()),
        _ => PortalError::Internal(anyhow::Error::new(err).context(format!("write {what}"))),
    }
}

// ── Partner repository ───────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbPartnerRepository {
    pub db: DatabaseConnection,
}

impl PartnerRepository for DbPartnerRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Partner>, PortalError> {
        let model = partners::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find partner by id")?;
        model.map(partner_from_model).transpose()
    }

    async fn list_live(&self) -> Result<Vec<Partner>, PortalError> {
        let models = partners::Entity::find()
            .filter(partners::Column::Status.ne(RecordStatus::Deleted.as_str()))
            .order_by_asc(partners::Column::Name)
            .all(&self.db)
            .await
            .context("list partners")?;
        models.into_iter().map(partner_from_model).collect()
    }

    async fn create(&self, partner: &Partner) -> Result<(), PortalError> {
        partner_to_active(partner)
            .insert(&self.db)
            .await
            .map_err(|e| write_error(e, "partner name"))?;
        Ok(())
    }

    async fn update(&self, partner: &Partner) -> Result<(), PortalError> {
        partner_to_active(partner)
            .update(&self.db)
            .await
            .map_err(|e| write_error(e, "partner name"))?;
        Ok(())
    }
}

fn partner_to_active(partner: &Partner) -> partners::ActiveModel {
    partners::ActiveModel {
        id: Set(partner.id),
        name: Set(partner.name.clone()),
        status: Set(partner.status.as_str().to_owned()),
        commission_rate: Set(partner.commission_rate),
        created_at: Set(partner.created_at),
        updated_at: Set(partner.updated_at),
    }
}

fn partner_from_model(model: partners::Model) -> Result<Partner, PortalError> {
    Ok(Partner {
        id: model.id,
        name: model.name,
        status: model.status.parse().context("partner status")?,
        commission_rate: model.commission_rate,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

// ── Customer repository ──────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbCustomerRepository {
    pub db: DatabaseConnection,
}

impl CustomerRepository for DbCustomerRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Customer>, PortalError> {
        let model = customers::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find customer by id")?;
        model.map(customer_from_model).transpose()
    }

    async fn list_live(&self, partner_id: Option<Uuid>) -> Result<Vec<Customer>, PortalError> {
        let mut query = customers::Entity::find()
            .filter(customers::Column::Status.ne(RecordStatus::Deleted.as_str()));
        if let Some(partner_id) = partner_id {
            query = query.filter(customers::Column::PartnerId.eq(partner_id));
        }
        let models = query
            .order_by_asc(customers::Column::Name)
            .all(&self.db)
            .await
            .context("list customers")?;
        models.into_iter().map(customer_from_model).collect()
    }

    async fn live_ids_for_partner(&self, partner_id: Uuid) -> Result<Vec<Uuid>, PortalError> {
        let ids = customers::Entity::find()
            .select_only()
            .column(customers::Column::Id)
            .filter(customers::Column::PartnerId.eq(partner_id))
            .filter(customers::Column::Status.ne(RecordStatus::Deleted.as_str()))
            .into_tuple::<Uuid>()
            .all(&self.db)
            .await
            .context("list customer ids for partner")?;
        Ok(ids)
    }

    async fn create(&self, customer: &Customer) -> Result<(), PortalError> {
        customer_to_active(customer)
            .insert(&self.db)
            .await
            .map_err(|e| write_error(e, "customer name"))?;
        Ok(())
    }

    async fn update(&self, customer: &Customer) -> Result<(), PortalError> {
        customer_to_active(customer)
            .update(&self.db)
            .await
            .map_err(|e| write_error(e, "customer name"))?;
        Ok(())
    }
}

fn customer_to_active(customer: &Customer) -> customers::ActiveModel {
    customers::ActiveModel {
        id: Set(customer.id),
        partner_id: Set(customer.partner_id),
        name: Set(customer.name.clone()),
        status: Set(customer.status.as_str().to_owned()),
        created_at: Set(customer.created_at),
        updated_at: Set(customer.updated_at),
    }
}

fn customer_from_model(model: customers::Model) -> Result<Customer, PortalError> {
    Ok(Customer {
        id: model.id,
        partner_id: model.partner_id,
        name: model.name,
        status: model.status.parse().context("customer status")?,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

// ── Employee repository ──────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbEmployeeRepository {
    pub db: DatabaseConnection,
}

fn employee_scope(visibility: &Visibility) -> Condition {
    match visibility {
        Visibility::All => Condition::all(),
        Visibility::Partner { customer_ids, .. } => {
            Condition::all().add(employees::Column::CustomerId.is_in(customer_ids.clone()))
        }
        Visibility::Customer { customer_id } => {
            Condition::all().add(employees::Column::CustomerId.eq(*customer_id))
        }
    }
}

/// Apply one device move inside a transaction.
async fn apply_move<C: ConnectionTrait>(conn: &C, mv: &DeviceMove) -> Result<(), DbErr> {
    let now = Utc::now();
    let release = devices::Entity::update_many()
        .col_expr(
            devices::Column::Status,
            Expr::value(DeviceStatus::Available.as_str()),
        )
        .col_expr(
            devices::Column::AssignedEmployeeId,
            Expr::value(Option::<Uuid>::None),
        )
        .col_expr(devices::Column::UpdatedAt, Expr::value(now));
    match *mv {
        DeviceMove::Claim {
            device_id,
            employee_id,
        } => {
            let result = devices::Entity::update_many()
                .col_expr(
                    devices::Column::Status,
                    Expr::value(DeviceStatus::Assigned.as_str()),
                )
                .col_expr(devices::Column::AssignedEmployeeId, Expr::value(employee_id))
                .col_expr(devices::Column::UpdatedAt, Expr::value(now))
                .filter(devices::Column::Id.eq(device_id))
                .filter(devices::Column::Status.eq(DeviceStatus::Available.as_str()))
                .filter(devices::Column::AssignedEmployeeId.is_null())
                .exec(conn)
                .await?;
            if result.rows_affected == 0 {
                return Err(DbErr::Custom(CLAIM_REJECTED.to_owned()));
            }
        }
        DeviceMove::Release {
            device_id,
            employee_id,
        } => {
            let result = release
                .filter(devices::Column::Id.eq(device_id))
                .filter(devices::Column::AssignedEmployeeId.eq(employee_id))
                .exec(conn)
                .await?;
            if result.rows_affected == 0 {
                tracing::warn!(%device_id, %employee_id, "release matched no device, skipping");
            }
        }
        DeviceMove::Reset { device_id } => {
            release
                .filter(devices::Column::Id.eq(device_id))
                .exec(conn)
                .await?;
        }
    }
    Ok(())
}

fn lifecycle_error(err: TransactionError<DbErr>) -> PortalError {
    match err {
        TransactionError::Transaction(DbErr::Custom(msg)) if msg == CLAIM_REJECTED => {
            PortalError::invalid_transition("expected device status=available")
        }
        TransactionError::Transaction(DbErr::RecordNotUpdated) => {
            PortalError::NotFound("employee")
        }
        TransactionError::Connection(e) => {
            PortalError::Internal(anyhow::Error::new(e).context("begin lifecycle write"))
        }
        // Employee email is the only unique index a lifecycle write can hit.
        TransactionError::Transaction(e) => match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => {
                PortalError::DuplicateKey("employee email".to_owned())
            }
            _ => PortalError::Internal(anyhow::Error::new(e).context("apply lifecycle write")),
        },
    }
}

impl EmployeeRepository for DbEmployeeRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Employee>, PortalError> {
        let model = employees::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find employee by id")?;
        model.map(employee_from_model).transpose()
    }

    async fn list(&self, visibility: &Visibility) -> Result<Vec<Employee>, PortalError> {
        let models = employees::Entity::find()
            .filter(employee_scope(visibility))
            .order_by_desc(employees::Column::CreatedAt)
            .all(&self.db)
            .await
            .context("list employees")?;
        models.into_iter().map(employee_from_model).collect()
    }

    async fn create(&self, employee: &Employee) -> Result<(), PortalError> {
        employee_to_active(employee)
            .insert(&self.db)
            .await
            .map_err(|e| write_error(e, "employee email"))?;
        Ok(())
    }

    async fn apply(&self, write: &LifecycleWrite) -> Result<(), PortalError> {
        let write = write.clone();
        self.db
            .transaction::<_, (), DbErr>(|txn| {
                Box::pin(async move {
                    for mv in &write.device_moves {
                        apply_move(txn, mv).await?;
                    }
                    if let Some(employee) = &write.employee {
                        employee_to_active(employee).update(txn).await?;
                    }
                    if let Some(commission) = &write.commission {
                        commission_to_active(commission).insert(txn).await?;
                    }
                    Ok(())
                })
            })
            .await
            .map_err(lifecycle_error)
    }

    async fn remove(&self, id: Uuid, releases: &[DeviceMove]) -> Result<bool, PortalError> {
        let releases = releases.to_vec();
        self.db
            .transaction::<_, bool, DbErr>(|txn| {
                Box::pin(async move {
                    for mv in &releases {
                        apply_move(txn, mv).await?;
                    }
                    let result = employees::Entity::delete_by_id(id).exec(txn).await?;
                    Ok(result.rows_affected > 0)
                })
            })
            .await
            .map_err(lifecycle_error)
    }
}

fn employee_to_active(employee: &Employee) -> employees::ActiveModel {
    employees::ActiveModel {
        id: Set(employee.id),
        customer_id: Set(employee.customer_id),
        first_name: Set(employee.first_name.clone()),
        last_name: Set(employee.last_name.clone()),
        email: Set(employee.email.clone()),
        location: Set(employee.location.clone()),
        job_title: Set(employee.job_title.clone()),
        department: Set(employee.department.clone()),
        start_date: Set(employee.start_date),
        status: Set(employee.status.as_str().to_owned()),
        onboarding_step: Set(employee.onboarding_step.map(i16::from)),
        offboarding_step: Set(employee.offboarding_step.map(i16::from)),
        device_acquisition_option: Set(employee
            .device_acquisition_option
            .map(|o| i16::from(o.as_u8()))),
        device_id: Set(employee.device_id),
        setup_approved: Set(employee.setup_approved),
        device_approved: Set(employee.device_approved),
        account_disabled: Set(employee.account_disabled),
        created_at: Set(employee.created_at),
        updated_at: Set(employee.updated_at),
    }
}

fn step_from_column(value: Option<i16>, column: &str) -> Result<Option<u8>, PortalError> {
    value
        .map(|v| u8::try_from(v).with_context(|| format!("employee {column} out of range")))
        .transpose()
        .map_err(PortalError::from)
}

fn employee_from_model(model: employees::Model) -> Result<Employee, PortalError> {
    let device_acquisition_option = model
        .device_acquisition_option
        .map(|v| {
            u8::try_from(v)
                .ok()
                .and_then(AcquisitionOption::from_u8)
                .with_context(|| format!("unknown device acquisition option {v}"))
        })
        .transpose()?;
    Ok(Employee {
        id: model.id,
        customer_id: model.customer_id,
        first_name: model.first_name,
        last_name: model.last_name,
        email: model.email,
        location: model.location,
        job_title: model.job_title,
        department: model.department,
        start_date: model.start_date,
        status: model.status.parse().context("employee status")?,
        onboarding_step: step_from_column(model.onboarding_step, "onboarding_step")?,
        offboarding_step: step_from_column(model.offboarding_step, "offboarding_step")?,
        device_acquisition_option,
        device_id: model.device_id,
        setup_approved: model.setup_approved,
        device_approved: model.device_approved,
        account_disabled: model.account_disabled,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

// ── Device repository ────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbDeviceRepository {
    pub db: DatabaseConnection,
}

fn device_scope(visibility: &Visibility) -> Condition {
    match visibility {
        Visibility::All => Condition::all(),
        Visibility::Partner { customer_ids, .. } => {
            Condition::all().add(devices::Column::CustomerId.is_in(customer_ids.clone()))
        }
        Visibility::Customer { customer_id } => Condition::any()
            .add(devices::Column::OwnerType.eq(OwnerType::Belzir.as_str()))
            .add(
                Condition::all()
                    .add(devices::Column::OwnerType.eq(OwnerType::Customer.as_str()))
                    .add(devices::Column::CustomerId.eq(*customer_id)),
            ),
    }
}

impl DeviceRepository for DbDeviceRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Device>, PortalError> {
        let model = devices::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find device by id")?;
        model.map(device_from_model).transpose()
    }

    async fn list(&self, visibility: &Visibility) -> Result<Vec<Device>, PortalError> {
        let models = devices::Entity::find()
            .filter(device_scope(visibility))
            .order_by_asc(devices::Column::Name)
            .all(&self.db)
            .await
            .context("list devices")?;
        models.into_iter().map(device_from_model).collect()
    }

    async fn create(&self, device: &Device) -> Result<(), PortalError> {
        devices::ActiveModel {
            id: Set(device.id),
            name: Set(device.name.clone()),
            os: Set(device.os.as_str().to_owned()),
            owner_type: Set(device.owner_type.as_str().to_owned()),
            customer_id: Set(device.customer_id),
            status: Set(device.status.as_str().to_owned()),
            assigned_employee_id: Set(device.assigned_employee_id),
            cyber_protection_enabled: Set(device.cyber_protection_enabled),
            encryption_enabled: Set(device.encryption_enabled),
            created_at: Set(device.created_at),
            updated_at: Set(device.updated_at),
        }
        .insert(&self.db)
        .await
        .context("create device")?;
        Ok(())
    }

    async fn update_details(&self, device: &Device) -> Result<(), PortalError> {
        devices::ActiveModel {
            id: Set(device.id),
            name: Set(device.name.clone()),
            os: Set(device.os.as_str().to_owned()),
            cyber_protection_enabled: Set(device.cyber_protection_enabled),
            encryption_enabled: Set(device.encryption_enabled),
            updated_at: Set(device.updated_at),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .context("update device details")?;
        Ok(())
    }

    async fn delete_available(&self, id: Uuid) -> Result<bool, PortalError> {
        let result = devices::Entity::delete_many()
            .filter(devices::Column::Id.eq(id))
            .filter(devices::Column::Status.eq(DeviceStatus::Available.as_str()))
            .filter(devices::Column::AssignedEmployeeId.is_null())
            .exec(&self.db)
            .await
            .context("delete available device")?;
        Ok(result.rows_affected > 0)
    }
}

fn device_from_model(model: devices::Model) -> Result<Device, PortalError> {
    Ok(Device {
        id: model.id,
        name: model.name,
        os: model.os.parse().context("device os")?,
        owner_type: model.owner_type.parse().context("device owner type")?,
        customer_id: model.customer_id,
        status: model.status.parse().context("device status")?,
        assigned_employee_id: model.assigned_employee_id,
        cyber_protection_enabled: model.cyber_protection_enabled,
        encryption_enabled: model.encryption_enabled,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

// ── Commission repository ────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbCommissionRepository {
    pub db: DatabaseConnection,
}

impl CommissionRepository for DbCommissionRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Commission>, PortalError> {
        let model = commissions::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find commission by id")?;
        model.map(commission_from_model).transpose()
    }

    async fn list(&self, filter: CommissionFilter) -> Result<Vec<Commission>, PortalError> {
        let mut query = commissions::Entity::find();
        if let Some(partner_id) = filter.partner_id {
            query = query.filter(commissions::Column::PartnerId.eq(partner_id));
        }
        if let Some(customer_id) = filter.customer_id {
            query = query.filter(commissions::Column::CustomerId.eq(customer_id));
        }
        let models = query
            .order_by_desc(commissions::Column::CreatedAt)
            .all(&self.db)
            .await
            .context("list commissions")?;
        models.into_iter().map(commission_from_model).collect()
    }

    async fn delete(&self, id: Uuid) -> Result<bool, PortalError> {
        let result = commissions::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .context("delete commission")?;
        Ok(result.rows_affected > 0)
    }
}

fn commission_to_active(commission: &Commission) -> commissions::ActiveModel {
    commissions::ActiveModel {
        id: Set(commission.id),
        partner_id: Set(commission.partner_id),
        customer_id: Set(commission.customer_id),
        employee_id: Set(commission.employee_id),
        device_id: Set(commission.device_id),
        kind: Set(commission.kind.as_str().to_owned()),
        amount: Set(commission.amount),
        created_at: Set(commission.created_at),
    }
}

fn commission_from_model(model: commissions::Model) -> Result<Commission, PortalError> {
    Ok(Commission {
        id: model.id,
        partner_id: model.partner_id,
        customer_id: model.customer_id,
        employee_id: model.employee_id,
        device_id: model.device_id,
        kind: model.kind.parse().context("commission kind")?,
        amount: model.amount,
        created_at: model.created_at,
    })
}

// ── Audit repository ─────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbAuditRepository {
    pub db: DatabaseConnection,
}

impl AuditRepository for DbAuditRepository {
    async fn append(&self, entry: &AuditEntry) -> Result<(), PortalError> {
        audit_logs::ActiveModel {
            id: Set(entry.id),
            actor_user_id: Set(entry.actor_user_id),
            actor_role: Set(entry.actor_role.map(|r| r.as_str().to_owned())),
            action: Set(entry.action.clone()),
            entity_type: Set(entry.entity_type.clone()),
            entity_id: Set(entry.entity_id),
            before: Set(entry.before.clone()),
            after: Set(entry.after.clone()),
            meta: Set(entry.meta.clone()),
            created_at: Set(entry.created_at),
        }
        .insert(&self.db)
        .await
        .context("append audit log")?;
        Ok(())
    }

    async fn list(&self, page: PageRequest) -> Result<Vec<AuditEntry>, PortalError> {
        let page = page.clamped();
        let models = audit_logs::Entity::find()
            .order_by_desc(audit_logs::Column::CreatedAt)
            .order_by_desc(audit_logs::Column::Id)
            .offset(page.offset())
            .limit(u64::from(page.per_page))
            .all(&self.db)
            .await
            .context("list audit logs")?;
        models.into_iter().map(audit_from_model).collect()
    }

    async fn count(&self) -> Result<u64, PortalError> {
        let count = audit_logs::Entity::find()
            .count(&self.db)
            .await
            .context("count audit logs")?;
        Ok(count)
    }
}

fn audit_from_model(model: audit_logs::Model) -> Result<AuditEntry, PortalError> {
    let actor_role = model
        .actor_role
        .map(|r| r.parse())
        .transpose()
        .context("audit actor role")?;
    Ok(AuditEntry {
        id: model.id,
        actor_user_id: model.actor_user_id,
        actor_role,
        action: model.action,
        entity_type: model.entity_type,
        entity_id: model.entity_id,
        before: model.before,
        after: model.after,
        meta: model.meta,
        created_at: model.created_at,
    })
}

// ── Settings repository ──────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbSettingsRepository {
    pub db: DatabaseConnection,
}

impl SettingsRepository for DbSettingsRepository {
    async fn get(&self) -> Result<SystemSettings, PortalError> {
        let existing = system_settings::Entity::find_by_id(system_settings::SINGLETON_ID)
            .one(&self.db)
            .await
            .context("find settings")?;
        if let Some(model) = existing {
            return Ok(settings_from_model(model));
        }

        let defaults = SystemSettings::default();
        system_settings::Entity::insert(settings_to_active(&defaults))
            .on_conflict(
                OnConflict::column(system_settings::Column::Id)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .context("initialize settings")?;
        let model = system_settings::Entity::find_by_id(system_settings::SINGLETON_ID)
            .one(&self.db)
            .await
            .context("find settings")?;
        Ok(model.map(settings_from_model).unwrap_or(defaults))
    }

    async fn update(&self, settings: &SystemSettings) -> Result<(), PortalError> {
        system_settings::Entity::insert(settings_to_active(settings))
            .on_conflict(
                OnConflict::column(system_settings::Column::Id)
                    .update_columns([
                        system_settings::Column::CompanyName,
                        system_settings::Column::SupportEmail,
                        system_settings::Column::DefaultPartnerCommissionRate,
                        system_settings::Column::MaintenanceMode,
                        system_settings::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .context("update settings")?;
        Ok(())
    }
}

fn settings_to_active(settings: &SystemSettings) -> system_settings::ActiveModel {
    system_settings::ActiveModel {
        id: Set(system_settings::SINGLETON_ID),
        company_name: Set(settings.company_name.clone()),
        support_email: Set(settings.support_email.clone()),
        default_partner_commission_rate: Set(settings.default_partner_commission_rate),
        maintenance_mode: Set(settings.maintenance_mode),
        updated_at: Set(settings.updated_at),
    }
}

fn settings_from_model(model: system_settings::Model) -> SystemSettings {
    SystemSettings {
        company_name: model.company_name,
        support_email: model.support_email,
        default_partner_commission_rate: model.default_partner_commission_rate,
        maintenance_mode: model.maintenance_mode,
        updated_at: model.updated_at,
    }
}
