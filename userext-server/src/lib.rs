use anyhow::Context;
use axum::http::StatusCode;
use sqlx::SqlitePool;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub mod accounts;
pub mod approver;
pub mod config;
pub mod console;
pub mod controllers;
pub mod hooks;
pub mod policy;
pub mod routes;
pub mod store;

use hooks::HookRegistry;
use policy::VerificationPolicy;
use store::{ProfileStore, UserStore, VerificationStore};

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub users: UserStore,
    /// Handler registrati all'avvio per l'evento "account creato".
    pub hooks: Arc<HookRegistry>,
}

impl AppState {
    /// Stato con gli hook di registrazione predefiniti.
    pub fn new(pool: SqlitePool, policy: Arc<dyn VerificationPolicy>) -> Self {
        let hooks = hooks::default_hooks(
            ProfileStore::new(pool.clone()),
            VerificationStore::new(pool.clone()),
            policy,
        );
        Self::with_hooks(pool, hooks)
    }

    pub fn with_hooks(pool: SqlitePool, hooks: HookRegistry) -> Self {
        AppState { users: UserStore::new(pool.clone()), pool, hooks: Arc::new(hooks) }
    }
}

// Dato un percorso di file, restituisce un URL SQLite valido. Crea le directory genitrici se non esistono.
pub fn sqlite_url_for_path(p: &Path) -> anyhow::Result<String> {
    let abs = if p.is_absolute() {
        p.to_path_buf()
    } else {
        std::env::current_dir()?.join(p)
    };
    if let Some(parent) = abs.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create parent dirs for {:?}", parent))?;
    }
    std::fs::OpenOptions::new()
        .create(true)
        .truncate(false)
        .write(true)
        .open(&abs)
        .with_context(|| format!("create/open sqlite file {:?}", abs))?;
    let s = abs.to_string_lossy().replace('\\', "/");
    Ok(format!("sqlite:///{}", s.trim_start_matches('/')))
}

/// Normalizza il DATABASE_URL grezzo in un URL SQLite.
/// "sqlite::memory:" passa invariato, altrimenti è un percorso di file (con o senza prefisso "sqlite://").
pub fn build_sqlite_url(raw: &str) -> anyhow::Result<String> {
    if raw == "sqlite::memory:" {
        return Ok(raw.to_string());
    }
    // Rimuovi il prefisso "sqlite://" se presente, per ottenere il percorso del file.
    let path_part = if raw.starts_with("sqlite://") {
        raw.trim_start_matches("sqlite:///")
            .trim_start_matches("sqlite://")
            .to_string()
    } else {
        raw.to_string()
    };
    let path = if raw.starts_with("sqlite:///") {
        PathBuf::from(format!("/{}", path_part))
    } else {
        PathBuf::from(path_part)
    };
    sqlite_url_for_path(&path)
}

// Connect to the database and return a connection pool.
pub async fn connect_pool(db_url: &str) -> anyhow::Result<SqlitePool> {
    let pool = SqlitePool::connect(db_url)
        .await
        .with_context(|| format!("connect to sqlite via {}", db_url))?;
    Ok(pool)
}

// Esegue le migrazioni del database. Crea le tabelle se non esistono.
pub async fn run_migrations(pool: &SqlitePool) -> anyhow::Result<()> {
    // Enable foreign keys (SQLite)
    sqlx::query("PRAGMA foreign_keys = ON;")
        .execute(pool)
        .await
        .context("enable foreign_keys")?;

    let stmts = [
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id            INTEGER PRIMARY KEY AUTOINCREMENT,
            username      TEXT NOT NULL UNIQUE,
            password_hash TEXT NOT NULL,
            created_at    TEXT NOT NULL
        );"#,
        // nessun vincolo di unicità: più record approvati per utente sono ammessi
        r#"
        CREATE TABLE IF NOT EXISTS manual_verifications (
            id         INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id    INTEGER NOT NULL,
            status     TEXT NOT NULL,
            created_at TEXT NOT NULL,
            FOREIGN KEY(user_id) REFERENCES users(id)
        );"#,
        r#"
        CREATE INDEX IF NOT EXISTS manual_verifications_user_status
            ON manual_verifications (user_id, status, created_at);"#,
        r#"
        CREATE TABLE IF NOT EXISTS extended_profiles (
            id         INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id    INTEGER NOT NULL UNIQUE,
            created_at TEXT NOT NULL,
            FOREIGN KEY(user_id) REFERENCES users(id)
        );"#,
    ];
    // applica ogni statement di migrazione
    for s in &stmts {
        sqlx::query(s)
            .execute(pool)
            .await
            .with_context(|| format!("apply migration: {}", s.trim().chars().take(60).collect::<String>().replace('\n', " ")))?;
    }
    Ok(())
}

/// Installa il subscriber di tracing: filtro da RUST_LOG (default "info"), output su stderr.
pub fn init_tracing() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let _ = tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

/// Controlla lo stato di salute del database tentando di acquisire una connessione dal pool.
pub async fn health_with_pool(pool: &SqlitePool) -> StatusCode {
    match pool.acquire().await {
        Ok(_) => StatusCode::OK,
        Err(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}
