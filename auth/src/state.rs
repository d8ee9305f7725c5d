use std::sync::Arc;

use crate::services::auth::{Authenticator, TokenIssuer};

#[derive(Clone)]
pub struct AppState {
    pub authenticator: Arc<Authenticator>,
    pub issuer: Arc<TokenIssuer>,
}

impl AppState {
    pub fn new(authenticator: Arc<Authenticator>, issuer: Arc<TokenIssuer>) -> Self {
        Self {
            authenticator,
            issuer,
        }
    }
}
