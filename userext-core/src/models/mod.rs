pub mod user;
pub mod verification;
pub mod profile;

// Re-export per comodità
pub use user::User;
pub use verification::{ManualVerification, VerificationStatus};
pub use profile::ExtendedProfile;
