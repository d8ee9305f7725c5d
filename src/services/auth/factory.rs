/// Factory: build the `AccessGate` from application `Config` and the user store.
use std::sync::Arc;

use crate::config::AuthConfig;
use crate::repos::UserStore;
use crate::services::auth::{AccessGate, CredentialVerifier, IdentityResolver};

pub fn build_access_gate(config: &AuthConfig, users: Arc<dyn UserStore>) -> Arc<AccessGate> {
    let verifier = CredentialVerifier::new(config);
    let resolver = IdentityResolver::new(users);

    Arc::new(AccessGate::new(verifier, resolver))
}
