/*
 * Responsibility
 * - the authenticated context a handler sees
 * - built by the access middleware from the resolved Identity; handlers never
 *   look at tokens
 */
use uuid::Uuid;

use crate::services::auth::Identity;

/// Identity attached to an authorized request. Read-only, lives for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthCtx {
    pub user_id: Uuid,
    pub username: String,
    pub location: Option<String>,
}

impl From<Identity> for AuthCtx {
    fn from(identity: Identity) -> Self {
        Self {
            user_id: identity.id,
            username: identity.username,
            location: identity.location,
        }
    }
}

impl AuthCtx {
    /// Ownership is an exact id match; no roles or delegation.
    pub fn owns(&self, author_id: Uuid) -> bool {
        self.user_id == author_id
    }
}
