/*
 * Responsibility
 * - Users request/response DTOs
 * - validate() normalizes as it checks (trimmed name, upper-case country)
 * - the password only travels inbound; responses never carry it or its hash
 */
use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

const PASSWORD_MIN_CHARS: usize = 8;
// bcrypt ignores everything past 72 bytes
const PASSWORD_MAX_BYTES: usize = 72;

#[derive(Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub password: String,
    pub location: Option<String>,
}

/// A create request that passed validation.
#[derive(PartialEq, Eq)]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub location: Option<String>,
}

impl fmt::Debug for NewUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewUser")
            .field("username", &self.username)
            .field("location", &self.location)
            .finish_non_exhaustive()
    }
}

impl CreateUserRequest {
    pub fn validate(self) -> Result<NewUser, &'static str> {
        let username = self.username.trim().to_string();
        if username.is_empty() {
            return Err("username is required");
        }
        if username.chars().count() > 64 {
            return Err("username must be <= 64 chars");
        }

        if self.password.chars().count() < PASSWORD_MIN_CHARS {
            return Err("password must be at least 8 chars");
        }
        if self.password.len() > PASSWORD_MAX_BYTES {
            return Err("password must be <= 72 bytes");
        }

        let location = match self.location.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(code) if code.len() == 2 && code.chars().all(|c| c.is_ascii_alphabetic()) => {
                Some(code.to_ascii_uppercase())
            }
            Some(_) => return Err("location must be a 2-letter country code"),
        };

        Ok(NewUser {
            username,
            password: self.password,
            location,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub location: Option<String>,
}
