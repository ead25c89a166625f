//! Reconciliation sweep for the portal database.
//!
//! # Usage
//!
//! ```bash
//! # Report what would be repaired
//! cargo run -p reconcile -- --dry-run
//!
//! # Repair against an explicit database
//! cargo run -p reconcile -- --database-url postgres://localhost/portal
//! ```
//!
//! Prints the report as JSON on stdout; logs go to stderr.

use anyhow::{Context, Result};
use clap::Parser;
use sea_orm::Database;

use belzir_core::tracing::{LogTarget, init_tracing};
use belzir_portal::state::AppState;
use belzir_portal::usecase::reconcile::ReconcileUseCase;

#[derive(Parser)]
#[command(about = "Repair device/employee links and lifecycle fields")]
struct ReconcileArgs {
    /// PostgreSQL connection URL
    #[arg(long, env = "DATABASE_URL")]
    database_url: String,

    /// Report inconsistencies without writing
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing(LogTarget::Stderr);
    let args = ReconcileArgs::parse();

    let db = Database::connect(&args.database_url)
        .await
        .context("failed to connect to database")?;
    let state = AppState { db };

    let usecase = ReconcileUseCase {
        employees: state.employee_repo(),
        devices: state.device_repo(),
        audit: state.audit_repo(),
    };
    let report = usecase
        .execute(args.dry_run)
        .await
        .context("reconciliation failed")?;

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
