//! Configurazione da variabili d'ambiente (eventualmente caricate da `.env`).

use anyhow::Context;
use std::net::SocketAddr;

pub const DEFAULT_DATABASE_URL: &str = "userext.db";
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
/// Quanti giorni resta valida una verifica approvata.
pub const DEFAULT_DAYS_GOOD_FOR: i64 = 365;
/// Cento anni: oltre, la soglia non cambia più nulla in pratica.
pub const MAX_DAYS_GOOD_FOR: i64 = 36_500;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// DATABASE_URL grezzo, normalizzato poi da `build_sqlite_url`.
    pub database_url: String,
    pub bind_addr: SocketAddr,
    pub days_good_for: i64,
}

impl Settings {
    /// Legge le impostazioni dall'ambiente del processo.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Come `from_env`, ma con una sorgente arbitraria (comodo nei test).
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let CommandSettings { database_url, days_good_for } = CommandSettings::from_lookup(&lookup)?;

        let bind = lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr: SocketAddr = bind.parse().with_context(|| format!("parse BIND_ADDR {:?}", bind))?;

        Ok(Settings { database_url, bind_addr, days_good_for })
    }
}

/// Solo ciò che serve al comando batch: niente BIND_ADDR.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSettings {
    pub database_url: String,
    pub days_good_for: i64,
}

impl CommandSettings {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());
        let days_good_for = match lookup("VERIFICATION_DAYS_GOOD_FOR") {
            Some(raw) => parse_days_good_for(&raw)?,
            None => DEFAULT_DAYS_GOOD_FOR,
        };
        Ok(CommandSettings { database_url, days_good_for })
    }
}

fn parse_days_good_for(raw: &str) -> anyhow::Result<i64> {
    let days = raw
        .trim()
        .parse::<i64>()
        .with_context(|| format!("parse VERIFICATION_DAYS_GOOD_FOR {:?}", raw))?;
    if !(0..=MAX_DAYS_GOOD_FOR).contains(&days) {
        anyhow::bail!("VERIFICATION_DAYS_GOOD_FOR must be between 0 and {}, got {}", MAX_DAYS_GOOD_FOR, days);
    }
    Ok(days)
}
