//! Hook sincroni sull'evento "account creato".
//!
//! Gli handler si registrano esplicitamente all'avvio (`default_hooks`) e
//! vengono eseguiti in ordine dentro la richiesta che ha creato l'account.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{error, info};
use userext_core::{ManualVerification, User};

use crate::policy::VerificationPolicy;
use crate::store::{ProfileStore, StoreError, VerificationStore};

/// Emesso una sola volta per account, subito dopo l'inserimento in `users`.
#[derive(Debug, Clone)]
pub struct AccountCreated {
    pub user: User,
}

#[async_trait]
pub trait AccountCreatedHandler: Send + Sync {
    fn name(&self) -> &'static str;

    async fn handle(&self, event: &AccountCreated) -> anyhow::Result<()>;
}

#[derive(Default, Clone)]
pub struct HookRegistry {
    handlers: Vec<Arc<dyn AccountCreatedHandler>>,
}

impl HookRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, handler: Arc<dyn AccountCreatedHandler>) {
        self.handlers.push(handler);
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.handlers.iter().map(|h| h.name()).collect()
    }

    /// Esegue gli handler in ordine di registrazione; il primo errore interrompe la catena.
    pub async fn dispatch(&self, event: &AccountCreated) -> anyhow::Result<()> {
        for handler in &self.handlers {
            handler
                .handle(event)
                .await
                .map_err(|e| e.context(format!("hook {} failed for {}", handler.name(), event.user.username)))?;
        }
        Ok(())
    }
}

/// Registro con i due hook di registrazione: profilo esteso e auto-approvazione.
pub fn default_hooks(
    profiles: ProfileStore,
    verifications: VerificationStore,
    policy: Arc<dyn VerificationPolicy>,
) -> HookRegistry {
    let mut hooks = HookRegistry::new();
    hooks.register(Arc::new(SyncExtendedProfile::new(profiles)));
    hooks.register(Arc::new(AutoApproveIdVerification::new(verifications, policy)));
    hooks
}

/// Crea il profilo esteso del nuovo account. Non idempotente: un secondo evento
/// per lo stesso utente fallisce sul vincolo UNIQUE.
pub struct SyncExtendedProfile {
    profiles: ProfileStore,
}

impl SyncExtendedProfile {
    pub fn new(profiles: ProfileStore) -> Self {
        SyncExtendedProfile { profiles }
    }
}

#[async_trait]
impl AccountCreatedHandler for SyncExtendedProfile {
    fn name(&self) -> &'static str {
        "sync_extended_profile"
    }

    async fn handle(&self, event: &AccountCreated) -> anyhow::Result<()> {
        self.profiles.create(&event.user).await?;
        Ok(())
    }
}

/// Approva la verifica d'identità del nuovo account se non ne ha già una valida.
pub struct AutoApproveIdVerification {
    verifications: VerificationStore,
    policy: Arc<dyn VerificationPolicy>,
}

impl AutoApproveIdVerification {
    pub fn new(verifications: VerificationStore, policy: Arc<dyn VerificationPolicy>) -> Self {
        AutoApproveIdVerification { verifications, policy }
    }

    /// Lettura e poi scrittura condizionata: ripeterla è sicuro.
    pub async fn ensure_approved(&self, user: &User) -> Result<Option<ManualVerification>, StoreError> {
        let earliest = self.policy.earliest_allowed_verification_date();
        if self.verifications.has_valid_approval(user.id, &earliest).await? {
            return Ok(None);
        }
        self.verifications.approve(user).await.map(Some)
    }

    /// Gli errori finiscono solo nel log: la registrazione non deve fallire per questo.
    pub async fn set_id_verification_status(&self, user: &User) {
        match self.ensure_approved(user).await {
            Ok(Some(_)) => info!("ManualVerification approved for: {}", user.username),
            Ok(None) => {}
            Err(e) => error!("Error setting ID verification status for user {}: {}", user.username, e),
        }
    }
}

#[async_trait]
impl AccountCreatedHandler for AutoApproveIdVerification {
    fn name(&self) -> &'static str {
        "auto_approve_id_verification"
    }

    async fn handle(&self, event: &AccountCreated) -> anyhow::Result<()> {
        self.set_id_verification_status(&event.user).await;
        Ok(())
    }
}
