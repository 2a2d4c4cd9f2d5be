use serde::{Deserialize, Serialize};

/// Profilo esteso, uno-a-uno con l'account. Creato una sola volta alla registrazione.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtendedProfile {
    pub id: i64,
    pub user_id: i64,
    pub created_at: String, // RFC3339 UTC
}
