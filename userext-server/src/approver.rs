//! Comando `approve_id_verification`: approva la verifica d'identità per gli
//! utenti esistenti che non ne hanno una valida.

use clap::Parser;
use std::io::{self, Write};
use std::sync::Arc;
use tracing::{error, info};
use userext_core::{ManualVerification, User};

use crate::console::Console;
use crate::policy::VerificationPolicy;
use crate::store::{StoreError, UserStore, VerificationStore};

pub const DEFAULT_BATCH_SIZE: usize = 100;
/// Ogni quante approvazioni riuscite si stampa una riga di avanzamento.
pub const PROGRESS_EVERY: usize = 50;
/// Quanti username mostra il dry-run in modalità bulk.
pub const DRY_RUN_PREVIEW: usize = 10;

/// Approve ID verification for existing users who don't have valid verification
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "approve_id_verification", version)]
pub struct ApproveArgs {
    /// Process all users without valid ID verification
    #[arg(long)]
    pub all: bool,

    /// Approve ID verification for a specific user
    #[arg(long)]
    pub username: Option<String>,

    /// Number of users to process in each batch
    #[arg(long, default_value_t = DEFAULT_BATCH_SIZE as u64, value_parser = clap::value_parser!(u64).range(1..))]
    pub batch_size: u64,

    /// Show what would be done without making any changes
    #[arg(long)]
    pub dry_run: bool,

    /// SQLite database (file path or sqlite:// URL)
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,
}

impl ApproveArgs {
    pub fn selection(&self) -> Option<Selection> {
        match (&self.username, self.all) {
            (Some(name), _) => Some(Selection::User(name.clone())),
            (None, true) => Some(Selection::All),
            (None, false) => None,
        }
    }
}

/// Utenti bersaglio. `--username` ha la precedenza su `--all`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    User(String),
    All,
}

#[derive(Debug)]
pub enum SingleOutcome {
    Approved(ManualVerification),
    AlreadyVerified,
    WouldApprove,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BulkOutcome {
    /// Utenti nella lista di lavoro.
    pub total: usize,
    pub approved: usize,
    pub errors: usize,
    pub dry_run: bool,
}

#[derive(Debug)]
pub enum Outcome {
    MissingSelection,
    UserNotFound(String),
    Single(SingleOutcome),
    Bulk(BulkOutcome),
}

#[derive(Debug, thiserror::Error)]
pub enum ApproveError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("console write failed: {0}")]
    Io(#[from] io::Error),
}

pub struct Approver {
    users: UserStore,
    verifications: VerificationStore,
    policy: Arc<dyn VerificationPolicy>,
}

impl Approver {
    pub fn new(users: UserStore, verifications: VerificationStore, policy: Arc<dyn VerificationPolicy>) -> Self {
        Approver { users, verifications, policy }
    }

    /// Esegue il comando. Errori d'uso e utente inesistente vengono solo riportati sulla console.
    pub async fn run<W: Write>(
        &self,
        selection: Option<Selection>,
        batch_size: usize,
        dry_run: bool,
        console: &mut Console<W>,
    ) -> Result<Outcome, ApproveError> {
        match selection {
            None => {
                report_missing_selection(console)?;
                Ok(Outcome::MissingSelection)
            }
            Some(Selection::User(username)) => match self.users.find_by_username(&username).await? {
                Some(user) => Ok(Outcome::Single(self.approve_user(&user, dry_run, console).await?)),
                None => {
                    console.error(&format!("User \"{}\" does not exist", username))?;
                    Ok(Outcome::UserNotFound(username))
                }
            },
            Some(Selection::All) => Ok(Outcome::Bulk(self.approve_all(batch_size, dry_run, console).await?)),
        }
    }

    pub async fn approve_user<W: Write>(
        &self,
        user: &User,
        dry_run: bool,
        console: &mut Console<W>,
    ) -> Result<SingleOutcome, ApproveError> {
        let earliest = self.policy.earliest_allowed_verification_date();

        if self.verifications.has_valid_approval(user.id, &earliest).await? {
            console.warning(&format!("User \"{}\" already has valid ID verification", user.username))?;
            return Ok(SingleOutcome::AlreadyVerified);
        }

        if dry_run {
            console.success(&format!("[DRY RUN] Would approve ID verification for: {}", user.username))?;
            return Ok(SingleOutcome::WouldApprove);
        }

        let record = self.verifications.approve(user).await?;
        console.success(&format!("Approved ID verification for: {}", user.username))?;
        info!("ManualVerification approved for: {}", user.username);
        Ok(SingleOutcome::Approved(record))
    }

    pub async fn approve_all<W: Write>(
        &self,
        batch_size: usize,
        dry_run: bool,
        console: &mut Console<W>,
    ) -> Result<BulkOutcome, ApproveError> {
        let earliest = self.policy.earliest_allowed_verification_date();

        // lista di lavoro: tutti gli utenti meno quelli con verifica valida, per id crescente
        let user_ids = self.users.ids_without_valid_verification(&earliest).await?;
        let total = user_ids.len();
        let mut outcome = BulkOutcome { total, dry_run, ..BulkOutcome::default() };

        if total == 0 {
            console.success("No users need ID verification approval")?;
            return Ok(outcome);
        }

        console.warning(&format!("Found {} users without valid ID verification", total))?;

        if dry_run {
            console.success(&format!("[DRY RUN] Would approve ID verification for {} users", total))?;
            let preview = &user_ids[..total.min(DRY_RUN_PREVIEW)];
            for user in self.users.find_by_ids(preview).await? {
                console.line(&format!("  - {}", user.username))?;
            }
            if total > DRY_RUN_PREVIEW {
                console.line(&format!("  ... and {} more", total - DRY_RUN_PREVIEW))?;
            }
            return Ok(outcome);
        }

        for batch_ids in user_ids.chunks(batch_size.max(1)) {
            let batch_users = self.users.find_by_ids(batch_ids).await?;

            for user in &batch_users {
                match self.verifications.approve(user).await {
                    Ok(_) => {
                        outcome.approved += 1;
                        if outcome.approved % PROGRESS_EVERY == 0 {
                            console.line(&progress_line(outcome.approved, total))?;
                        }
                    }
                    Err(e) => {
                        outcome.errors += 1;
                        error!("Error approving verification for {}: {}", user.username, e);
                    }
                }
            }
        }

        // ultima riga di avanzamento, se non già stampata
        if outcome.approved % PROGRESS_EVERY != 0 {
            console.line(&progress_line(outcome.approved, total))?;
        }

        console.success(&format!("\nCompleted! Approved: {}, Errors: {}", outcome.approved, outcome.errors))?;
        Ok(outcome)
    }
}

/// Errore d'uso: né `--all` né `--username`.
pub fn report_missing_selection<W: Write>(console: &mut Console<W>) -> io::Result<()> {
    console.error("You must specify either --all or --username <username>")
}

fn progress_line(done: usize, total: usize) -> String {
    format!("Progress: {}/{} users processed", done, total)
}
