use std::sync::Arc;

use thiserror::Error;
use uuid::Uuid;

use crate::repos::{UserStore, error::RepoError, user_repo::UserRow};

/// Sanitized user record used for authorization decisions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub id: Uuid,
    pub username: String,
    pub location: Option<String>,
}

impl From<UserRow> for Identity {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            username: row.username,
            location: row.location,
        }
    }
}

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("no user for subject")]
    NotFound,
    #[error("identity store failure")]
    Store(#[from] RepoError),
}

/// Looks a verified subject id up in the user store. Read-only.
#[derive(Clone)]
pub struct IdentityResolver {
    users: Arc<dyn UserStore>,
}

impl IdentityResolver {
    pub fn new(users: Arc<dyn UserStore>) -> Self {
        Self { users }
    }

    pub async fn resolve(&self, subject_id: Uuid) -> Result<Identity, ResolveError> {
        self.users
            .get(subject_id)
            .await?
            .map(Identity::from)
            .ok_or(ResolveError::NotFound)
    }
}
