//! userext-core: tipi condivisi (modelli, DTO HTTP, errori, timestamp).
//! Niente I/O: il database vive in userext-server.

pub mod models;
pub mod protocol;
pub mod error;
pub mod utils;

// Re-export utili per ridurre i percorsi nel crate server
pub use error::Error;
pub use models::{ExtendedProfile, ManualVerification, User, VerificationStatus};
pub use protocol::http::{RegisterRequest, RegisterResponse};
pub use utils::{days_before, EARLIEST_TIMESTAMP, format_timestamp, now_timestamp, parse_timestamp};
