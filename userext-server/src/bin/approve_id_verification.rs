//! Approva la verifica d'identità per gli utenti esistenti.
//!
//!     approve_id_verification --all
//!     approve_id_verification --username john_doe
//!     approve_id_verification --all --batch-size 100 --dry-run

use anyhow::Context;
use clap::Parser;
use std::sync::Arc;
use userext_server::{
    approver::{report_missing_selection, ApproveArgs, Approver},
    build_sqlite_url,
    config::CommandSettings,
    connect_pool, init_tracing,
    console::Console,
    policy::DaysGoodFor,
    run_migrations,
    store::{UserStore, VerificationStore},
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = ApproveArgs::parse();
    init_tracing();

    // errore d'uso: si esce prima di aprire il database
    let mut console = Console::stdout();
    let Some(selection) = args.selection() else {
        report_missing_selection(&mut console)?;
        return Ok(());
    };

    let settings = CommandSettings::from_env().context("load settings")?;
    let raw_url = args.database_url.clone().unwrap_or(settings.database_url);
    let db_url = build_sqlite_url(&raw_url).context("build sqlite DATABASE_URL")?;
    let pool = connect_pool(&db_url).await.context("connect to sqlite")?;
    run_migrations(&pool).await.context("run migrations")?;

    let approver = Approver::new(
        UserStore::new(pool.clone()),
        VerificationStore::new(pool),
        Arc::new(DaysGoodFor::new(settings.days_good_for)),
    );

    approver
        .run(Some(selection), args.batch_size as usize, args.dry_run, &mut console)
        .await
        .context("approve_id_verification")?;
    Ok(())
}
