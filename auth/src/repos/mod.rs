pub mod credential_repo;
pub mod error;

pub use credential_repo::{CredentialStore, PgCredentialRepo};
