use time::OffsetDateTime;
use userext_core::{days_before, format_timestamp, EARLIEST_TIMESTAMP};

/// Politica esterna che decide fin dove può risalire una verifica approvata
/// per essere ancora considerata valida.
pub trait VerificationPolicy: Send + Sync {
    /// Data minima di creazione (RFC3339 UTC, secondi interi).
    fn earliest_allowed_verification_date(&self) -> String;
}

/// Una verifica vale per `days` giorni dalla sua creazione. Se la soglia cade
/// prima dell'anno 0 vale ogni record, dal primo istante rappresentabile.
#[derive(Debug, Clone, Copy)]
pub struct DaysGoodFor {
    pub days: i64,
}

impl DaysGoodFor {
    pub fn new(days: i64) -> Self {
        DaysGoodFor { days }
    }
}

impl VerificationPolicy for DaysGoodFor {
    fn earliest_allowed_verification_date(&self) -> String {
        days_before(OffsetDateTime::now_utc(), self.days).unwrap_or_else(|| EARLIEST_TIMESTAMP.to_string())
    }
}

/// Soglia fissa, indipendente dall'orologio.
#[derive(Debug, Clone)]
pub struct FixedCutoff(pub String);

impl FixedCutoff {
    pub fn at(at: OffsetDateTime) -> Self {
        FixedCutoff(format_timestamp(at))
    }
}

impl VerificationPolicy for FixedCutoff {
    fn earliest_allowed_verification_date(&self) -> String {
        self.0.clone()
    }
}
