use std::sync::Arc;

use uuid::Uuid;

use crate::error::AppError;
use crate::repos::CredentialStore;

/// Username + password -> user id, checked against the stored bcrypt hash.
#[derive(Clone)]
pub struct Authenticator {
    credentials: Arc<dyn CredentialStore>,
}

impl Authenticator {
    pub fn new(credentials: Arc<dyn CredentialStore>) -> Self {
        Self { credentials }
    }

    pub async fn authenticate(&self, username: &str, password: &str) -> Result<Uuid, AppError> {
        let Some(row) = self.credentials.find_by_username(username.trim()).await? else {
            tracing::warn!("login for unknown user refused");
            return Err(AppError::InvalidCredentials);
        };

        let password = password.to_string();
        let hash = row.password_hash.clone();
        let matches = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "password check task failed");
                AppError::Internal
            })?
            .map_err(|e| {
                tracing::error!(error = %e, user_id = %row.user_id, "stored password hash unreadable");
                AppError::Internal
            })?;

        if !matches {
            tracing::warn!(user_id = %row.user_id, "login with wrong password refused");
            return Err(AppError::InvalidCredentials);
        }

        Ok(row.user_id)
    }
}
