use serde::{Deserialize, Serialize};

/// Account utente esposto sul wire. La tabella `users` resta di proprietà del
/// sottosistema di autenticazione: qui la leggiamo e basta.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub username: String,
    pub created_at: String, // RFC3339 UTC
}
