use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Stato di una verifica d'identità. Qui scriviamo solo `Approved`, gli altri
/// valori possono comparire in righe create altrove.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationStatus {
    Created,
    Ready,
    Submitted,
    MustRetry,
    Approved,
    Denied,
}

impl VerificationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VerificationStatus::Created => "created",
            VerificationStatus::Ready => "ready",
            VerificationStatus::Submitted => "submitted",
            VerificationStatus::MustRetry => "must_retry",
            VerificationStatus::Approved => "approved",
            VerificationStatus::Denied => "denied",
        }
    }
}

impl fmt::Display for VerificationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VerificationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "created" => Ok(VerificationStatus::Created),
            "ready" => Ok(VerificationStatus::Ready),
            "submitted" => Ok(VerificationStatus::Submitted),
            "must_retry" => Ok(VerificationStatus::MustRetry),
            "approved" => Ok(VerificationStatus::Approved),
            "denied" => Ok(VerificationStatus::Denied),
            other => Err(format!("unknown verification status: {}", other)),
        }
    }
}

/// Una decisione di verifica d'identità per un utente. Mai aggiornata né cancellata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManualVerification {
    pub id: i64,
    pub user_id: i64,
    pub status: VerificationStatus,
    pub created_at: String, // RFC3339 UTC, secondi interi
}
