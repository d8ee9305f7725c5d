//! Access gate: bearer token -> verified claims -> resolved identity.
//!
//! The gate knows nothing about axum middleware; it takes the request headers
//! and returns a tagged outcome. `middleware::auth::access` turns a rejection
//! into a response and an identity into an `AuthCtx` extension.

use axum::http::{HeaderMap, header};

use super::credential::{CredentialVerifier, VerifyError};
use super::identity::{Identity, IdentityResolver, ResolveError};

const BEARER_PREFIX: &str = "Bearer ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthRejection {
    NoToken,
    InvalidToken,
    TokenExpired,
    UserNotFound,
    Internal,
}

impl AuthRejection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NoToken => "no_token",
            Self::InvalidToken => "invalid_token",
            Self::TokenExpired => "token_expired",
            Self::UserNotFound => "user_not_found",
            Self::Internal => "internal",
        }
    }
}

impl From<VerifyError> for AuthRejection {
    fn from(e: VerifyError) -> Self {
        match e {
            VerifyError::Expired => Self::TokenExpired,
            VerifyError::Malformed | VerifyError::SignatureInvalid => Self::InvalidToken,
        }
    }
}

impl From<ResolveError> for AuthRejection {
    fn from(e: ResolveError) -> Self {
        match e {
            ResolveError::NotFound => Self::UserNotFound,
            ResolveError::Store(err) => {
                tracing::error!(error = ?err, "identity lookup failed");
                Self::Internal
            }
        }
    }
}

/// Pull the token out of `Authorization: Bearer <token>`.
///
/// - header missing, or nothing after the scheme: `NoToken`
/// - header present but not a readable bearer credential: `InvalidToken`
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthRejection> {
    let Some(value) = headers.get(header::AUTHORIZATION) else {
        return Err(AuthRejection::NoToken);
    };

    let value = value.to_str().map_err(|_| AuthRejection::InvalidToken)?;
    if value.trim().is_empty() {
        return Err(AuthRejection::NoToken);
    }

    let token = value
        .strip_prefix(BEARER_PREFIX)
        .ok_or(AuthRejection::InvalidToken)?
        .trim();

    if token.is_empty() {
        return Err(AuthRejection::NoToken);
    }
    Ok(token)
}

#[derive(Clone)]
pub struct AccessGate {
    verifier: CredentialVerifier,
    resolver: IdentityResolver,
}

impl std::fmt::Debug for AccessGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessGate")
            .field("verifier", &self.verifier)
            .finish_non_exhaustive()
    }
}

impl AccessGate {
    pub fn new(verifier: CredentialVerifier, resolver: IdentityResolver) -> Self {
        Self { verifier, resolver }
    }

    pub async fn authorize(&self, headers: &HeaderMap) -> Result<Identity, AuthRejection> {
        let token = bearer_token(headers)?;
        let claims = self.verifier.verify(token)?;
        let identity = self.resolver.resolve(claims.subject_id).await?;
        Ok(identity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &'static str) -> HeaderMap {
        let mut h = HeaderMap::new();
        h.insert(header::AUTHORIZATION, HeaderValue::from_static(value));
        h
    }

    #[test]
    fn missing_header_is_no_token() {
        assert_eq!(bearer_token(&HeaderMap::new()), Err(AuthRejection::NoToken));
    }

    #[test]
    fn empty_bearer_is_no_token() {
        assert_eq!(bearer_token(&headers("Bearer ")), Err(AuthRejection::NoToken));
        assert_eq!(bearer_token(&headers("")), Err(AuthRejection::NoToken));
    }

    #[test]
    fn other_schemes_are_invalid() {
        assert_eq!(
            bearer_token(&headers("Basic dXNlcjpwYXNz")),
            Err(AuthRejection::InvalidToken)
        );
    }

    #[test]
    fn strips_the_scheme() {
        assert_eq!(bearer_token(&headers("Bearer abc.def.ghi")), Ok("abc.def.ghi"));
    }

    #[test]
    fn expiry_maps_to_its_own_rejection() {
        assert_eq!(
            AuthRejection::from(VerifyError::Expired),
            AuthRejection::TokenExpired
        );
        assert_eq!(
            AuthRejection::from(VerifyError::SignatureInvalid),
            AuthRejection::InvalidToken
        );
        assert_eq!(
            AuthRejection::from(VerifyError::Malformed),
            AuthRejection::InvalidToken
        );
    }
}
