#![allow(dead_code)]

use anyhow::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqliteSynchronous};
use sqlx::SqlitePool;
use std::sync::Arc;
use tempfile::TempDir;
use time::OffsetDateTime;
use userext_core::{days_before, User, VerificationStatus};
use userext_server::{
    accounts::hash_password,
    approver::Approver,
    connect_pool,
    console::Console,
    policy::{DaysGoodFor, VerificationPolicy},
    run_migrations, sqlite_url_for_path,
    store::{UserStore, VerificationStore},
};

/// Database temporaneo su file, con le tabelle già create. Tieni vivo il TempDir.
pub async fn fresh_db() -> Result<(TempDir, SqlitePool)> {
    let td = TempDir::new()?;
    let url = sqlite_url_for_path(&td.path().join("userext.db"))?;
    let pool = connect_pool(&url).await?;
    run_migrations(&pool).await?;
    Ok((td, pool))
}

/// Come `fresh_db`, ma senza fsync: per i test con decine di migliaia di righe.
pub async fn fast_db() -> Result<(TempDir, SqlitePool)> {
    let td = TempDir::new()?;
    let opts = SqliteConnectOptions::new()
        .filename(td.path().join("bulk.db"))
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Memory)
        .synchronous(SqliteSynchronous::Off);
    let pool = SqlitePool::connect_with(opts).await?;
    run_migrations(&pool).await?;
    Ok((td, pool))
}

pub fn policy() -> Arc<dyn VerificationPolicy> {
    Arc::new(DaysGoodFor::new(365))
}

pub fn approver(pool: &SqlitePool) -> Approver {
    Approver::new(UserStore::new(pool.clone()), VerificationStore::new(pool.clone()), policy())
}

pub fn plain_console() -> Console<Vec<u8>> {
    Console::new(Vec::new(), false)
}

pub fn output(console: Console<Vec<u8>>) -> String {
    String::from_utf8(console.into_inner()).expect("utf8 output")
}

pub async fn add_user(pool: &SqlitePool, username: &str) -> Result<User> {
    Ok(UserStore::new(pool.clone()).insert(username, &hash_password("pw")).await?)
}

/// Crea `n` utenti user01, user02, ... in ordine di id.
pub async fn add_users(pool: &SqlitePool, n: usize) -> Result<Vec<User>> {
    let mut users = Vec::with_capacity(n);
    for i in 1..=n {
        users.push(add_user(pool, &format!("user{:02}", i)).await?);
    }
    Ok(users)
}

/// Record di verifica creato `age_days` giorni fa.
pub async fn add_verification(pool: &SqlitePool, user: &User, status: VerificationStatus, age_days: i64) -> Result<()> {
    VerificationStore::new(pool.clone())
        .insert(user.id, status, &days_before(OffsetDateTime::now_utc(), age_days).expect("age in range"))
        .await?;
    Ok(())
}

/// Record di verifica con `created_at` esatto, senza passare da `days_before`.
pub async fn add_verification_at(pool: &SqlitePool, user: &User, status: VerificationStatus, created_at: &str) -> Result<()> {
    sqlx::query("INSERT INTO manual_verifications (user_id, status, created_at) VALUES (?, ?, ?)")
        .bind(user.id)
        .bind(status.as_str())
        .bind(created_at)
        .execute(pool)
        .await?;
    Ok(())
}

/// Stati dei record di verifica di un utente, dal più vecchio.
pub async fn verification_statuses(pool: &SqlitePool, user_id: i64) -> Result<Vec<VerificationStatus>> {
    let raw: Vec<String> = sqlx::query_scalar("SELECT status FROM manual_verifications WHERE user_id = ? ORDER BY id")
        .bind(user_id)
        .fetch_all(pool)
        .await?;
    raw.iter()
        .map(|s| s.parse::<VerificationStatus>().map_err(|e| anyhow::anyhow!(e)))
        .collect()
}

pub async fn profile_owner(pool: &SqlitePool, user_id: i64) -> Result<Option<i64>> {
    Ok(sqlx::query_scalar("SELECT user_id FROM extended_profiles WHERE user_id = ?")
        .bind(user_id)
        .fetch_optional(pool)
        .await?)
}

/// Inserisce `n` utenti bulk00001, bulk00002, ... con una sola query.
pub async fn add_bulk_users(pool: &SqlitePool, n: i64) -> Result<()> {
    sqlx::query(
        "WITH RECURSIVE seq(n) AS (SELECT 1 UNION ALL SELECT n + 1 FROM seq WHERE n < ?)
         INSERT INTO users (username, password_hash, created_at)
         SELECT printf('bulk%05d', n), 'x', '2025-01-01T00:00:00Z' FROM seq",
    )
    .bind(n)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn approved_count(pool: &SqlitePool, user_id: i64) -> Result<i64> {
    Ok(sqlx::query_scalar("SELECT COUNT(*) FROM manual_verifications WHERE user_id = ? AND status = 'approved'")
        .bind(user_id)
        .fetch_one(pool)
        .await?)
}

pub async fn verification_rows(pool: &SqlitePool) -> Result<i64> {
    Ok(sqlx::query_scalar("SELECT COUNT(*) FROM manual_verifications").fetch_one(pool).await?)
}

/// Fa fallire ogni INSERT di verifica per l'utente dato.
pub async fn reject_verifications_for(pool: &SqlitePool, user: &User) -> Result<()> {
    let sql = format!(
        "CREATE TRIGGER reject_{id} BEFORE INSERT ON manual_verifications
         WHEN NEW.user_id = {id}
         BEGIN SELECT RAISE(ABORT, 'verification rejected'); END;",
        id = user.id
    );
    sqlx::query(&sql).execute(pool).await?;
    Ok(())
}
