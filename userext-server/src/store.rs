//! Accesso tipizzato alle tre tabelle esterne: `users`, `manual_verifications`,
//! `extended_profiles`. Ogni store è un handle clonabile sul pool.

use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Row, Sqlite, SqlitePool};
use userext_core::{now_timestamp, ExtendedProfile, ManualVerification, User, VerificationStatus};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("db error: {0}")]
    Db(#[from] sqlx::Error),
}

/// Parametri per singola query `IN (...)`, ben sotto il limite di variabili di SQLite.
pub const MAX_IDS_PER_QUERY: usize = 500;

fn user_from_row(row: &SqliteRow) -> Result<User, StoreError> {
    Ok(User {
        id: row.try_get("id")?,
        username: row.try_get("username")?,
        created_at: row.try_get("created_at")?,
    })
}

/// Tabella `users` (account).
#[derive(Clone)]
pub struct UserStore {
    pool: SqlitePool,
}

impl UserStore {
    pub fn new(pool: SqlitePool) -> Self {
        UserStore { pool }
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let row = sqlx::query("SELECT id, username, created_at FROM users WHERE username = ?")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(user_from_row).transpose()
    }

    pub async fn username_exists(&self, username: &str) -> Result<bool, StoreError> {
        let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE username = ?")
            .bind(username)
            .fetch_one(&self.pool)
            .await?;
        Ok(existing > 0)
    }

    /// Inserisce un nuovo account. La password arriva già come hash.
    pub async fn insert(&self, username: &str, password_hash: &str) -> Result<User, StoreError> {
        let created_at = now_timestamp();
        let result = sqlx::query("INSERT INTO users (username, password_hash, created_at) VALUES (?, ?, ?)")
            .bind(username)
            .bind(password_hash)
            .bind(&created_at)
            .execute(&self.pool)
            .await?;
        Ok(User { id: result.last_insert_rowid(), username: username.to_string(), created_at })
    }

    /// Righe utente per gli id dati, in ordine crescente di id. Id inesistenti vengono ignorati.
    /// Liste lunghe vengono spezzate in più query.
    pub async fn find_by_ids(&self, ids: &[i64]) -> Result<Vec<User>, StoreError> {
        let mut users = Vec::with_capacity(ids.len());
        for chunk in ids.chunks(MAX_IDS_PER_QUERY) {
            let mut qb: QueryBuilder<Sqlite> =
                QueryBuilder::new("SELECT id, username, created_at FROM users WHERE id IN (");
            {
                let mut separated = qb.separated(", ");
                for id in chunk {
                    separated.push_bind(*id);
                }
            }
            qb.push(")");
            let rows = qb.build().fetch_all(&self.pool).await?;
            for row in &rows {
                users.push(user_from_row(row)?);
            }
        }
        users.sort_by_key(|u| u.id);
        Ok(users)
    }

    /// Id degli utenti senza una verifica approvata creata a partire da `earliest`, crescenti.
    pub async fn ids_without_valid_verification(&self, earliest: &str) -> Result<Vec<i64>, StoreError> {
        let ids: Vec<i64> = sqlx::query_scalar(
            "SELECT id FROM users WHERE id NOT IN (
                SELECT user_id FROM manual_verifications
                WHERE status = ? AND julianday(created_at) >= julianday(?)
             ) ORDER BY id",
        )
        .bind(VerificationStatus::Approved.as_str())
        .bind(earliest)
        .fetch_all(&self.pool)
        .await?;
        Ok(ids)
    }
}

/// Tabella `manual_verifications`: si legge e si inserisce, mai update o delete.
#[derive(Clone)]
pub struct VerificationStore {
    pool: SqlitePool,
}

impl VerificationStore {
    pub fn new(pool: SqlitePool) -> Self {
        VerificationStore { pool }
    }

    /// Esiste un record approvato per l'utente creato a partire da `earliest`?
    pub async fn has_valid_approval(&self, user_id: i64, earliest: &str) -> Result<bool, StoreError> {
        let found: i64 = sqlx::query_scalar(
            "SELECT EXISTS(
                SELECT 1 FROM manual_verifications
                WHERE user_id = ? AND status = ? AND julianday(created_at) >= julianday(?)
             )",
        )
        .bind(user_id)
        .bind(VerificationStatus::Approved.as_str())
        .bind(earliest)
        .fetch_one(&self.pool)
        .await?;
        Ok(found != 0)
    }

    /// Inserisce un record `approved` con timestamp corrente. Nessun controllo di unicità.
    pub async fn approve(&self, user: &User) -> Result<ManualVerification, StoreError> {
        self.insert(user.id, VerificationStatus::Approved, &now_timestamp()).await
    }

    pub async fn insert(
        &self,
        user_id: i64,
        status: VerificationStatus,
        created_at: &str,
    ) -> Result<ManualVerification, StoreError> {
        let result = sqlx::query("INSERT INTO manual_verifications (user_id, status, created_at) VALUES (?, ?, ?)")
            .bind(user_id)
            .bind(status.as_str())
            .bind(created_at)
            .execute(&self.pool)
            .await?;
        Ok(ManualVerification {
            id: result.last_insert_rowid(),
            user_id,
            status,
            created_at: created_at.to_string(),
        })
    }
}

/// Tabella `extended_profiles`, solo inserimenti.
#[derive(Clone)]
pub struct ProfileStore {
    pool: SqlitePool,
}

impl ProfileStore {
    pub fn new(pool: SqlitePool) -> Self {
        ProfileStore { pool }
    }

    /// Fallisce sul vincolo UNIQUE se il profilo esiste già.
    pub async fn create(&self, user: &User) -> Result<ExtendedProfile, StoreError> {
        let created_at = now_timestamp();
        let result = sqlx::query("INSERT INTO extended_profiles (user_id, created_at) VALUES (?, ?)")
            .bind(user.id)
            .bind(&created_at)
            .execute(&self.pool)
            .await?;
        Ok(ExtendedProfile { id: result.last_insert_rowid(), user_id: user.id, created_at })
    }
}
