pub mod credential;
pub mod factory;
pub mod gate;
pub mod identity;

pub use credential::{Claims, CredentialVerifier, VerifyError};
pub use factory::build_access_gate;
pub use gate::{AccessGate, AuthRejection};
pub use identity::{Identity, IdentityResolver, ResolveError};
