//! Creazione account: inserisce l'utente e lancia gli hook `AccountCreated`.

use sha2::{Digest, Sha256};
use tracing::info;
use userext_core::User;

use crate::hooks::AccountCreated;
use crate::store::StoreError;
use crate::AppState;

#[derive(Debug, thiserror::Error)]
pub enum RegisterError {
    #[error("{0}")]
    Invalid(&'static str),
    #[error("username already exists")]
    UsernameTaken,
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("registration hook failed: {0:#}")]
    Hook(anyhow::Error),
}

/// hash semplice della password (esadecimale)
pub fn hash_password(password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    format!("{:x}", hasher.finalize())
}

pub async fn create_account(state: &AppState, username: &str, password: &str) -> Result<User, RegisterError> {
    let username = username.trim();
    if username.is_empty() {
        return Err(RegisterError::Invalid("username must not be empty"));
    }
    if password.is_empty() {
        return Err(RegisterError::Invalid("password must not be empty"));
    }

    if state.users.username_exists(username).await? {
        return Err(RegisterError::UsernameTaken);
    }

    let user = state.users.insert(username, &hash_password(password)).await?;
    info!("account created: {} (id {})", user.username, user.id);

    // gli hook girano prima di rispondere al chiamante
    state
        .hooks
        .dispatch(&AccountCreated { user: user.clone() })
        .await
        .map_err(RegisterError::Hook)?;

    Ok(user)
}
