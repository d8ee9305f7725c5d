use serde::Serialize;
use uuid::Uuid;

use crate::error::AppError;
use crate::services::auth::jwt::JwtIssuer;

#[derive(Debug, Serialize)]
struct AccessTokenClaims<'a> {
    sub: String,
    iat: i64,
    exp: i64,
    jti: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    iss: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    aud: Option<&'a str>,
}

#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub access_token: String,
    pub expires_in: u64,
}

#[derive(Clone)]
pub struct TokenIssuer {
    jwt: JwtIssuer,
}

impl TokenIssuer {
    pub fn new(jwt: JwtIssuer) -> Self {
        Self { jwt }
    }

    /// Issue an access token asserting `sub`, valid for the configured TTL.
    pub fn issue_access_token(&self, sub: Uuid) -> Result<IssuedToken, AppError> {
        let now = chrono::Utc::now().timestamp();
        let ttl = self.jwt.ttl_seconds();

        let claims = AccessTokenClaims {
            sub: sub.to_string(),
            iat: now,
            exp: now + ttl as i64,
            jti: Uuid::new_v4().to_string(),
            iss: self.jwt.issuer(),
            aud: self.jwt.audience(),
        };

        Ok(IssuedToken {
            access_token: self.jwt.sign(&claims)?,
            expires_in: ttl,
        })
    }
}
