use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, errors::ErrorKind};
use serde::Deserialize;
use thiserror::Error;
use uuid::Uuid;

use crate::config::AuthConfig;

/// Why a bearer token was refused by the verifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum VerifyError {
    #[error("malformed token")]
    Malformed,
    #[error("token expired")]
    Expired,
    #[error("token signature is invalid")]
    SignatureInvalid,
}

impl From<jsonwebtoken::errors::Error> for VerifyError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        match e.kind() {
            ErrorKind::ExpiredSignature => Self::Expired,
            ErrorKind::InvalidSignature => Self::SignatureInvalid,
            _ => Self::Malformed,
        }
    }
}

#[derive(Debug, Deserialize)]
struct AccessTokenClaims {
    sub: String,
    exp: i64,
}

/// Verified claims, promoted to the types the rest of the app uses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Claims {
    pub subject_id: Uuid,
    pub expires_at: DateTime<Utc>,
}

/// HS256 access-token verifier. Pure and local: no I/O.
#[derive(Clone)]
pub struct CredentialVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for CredentialVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not print key material
        f.debug_struct("CredentialVerifier")
            .field("validation", &self.validation)
            .finish_non_exhaustive()
    }
}

impl CredentialVerifier {
    pub fn new(config: &AuthConfig) -> Self {
        let decoding_key = DecodingKey::from_secret(config.jwt_secret.as_bytes());

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = config.leeway_seconds;
        validation.set_required_spec_claims(&["exp", "sub"]);
        if let Some(issuer) = &config.issuer {
            validation.set_issuer(&[issuer]);
        }
        match &config.audience {
            Some(audience) => validation.set_audience(&[audience]),
            None => validation.validate_aud = false,
        }

        Self {
            decoding_key,
            validation,
        }
    }

    /// Signature is checked before expiry, so a forged token never reports `Expired`.
    pub fn verify(&self, token: &str) -> Result<Claims, VerifyError> {
        let data =
            jsonwebtoken::decode::<AccessTokenClaims>(token, &self.decoding_key, &self.validation)?;
        let claims = data.claims;

        let subject_id = Uuid::parse_str(claims.sub.trim()).map_err(|_| VerifyError::Malformed)?;
        let expires_at = DateTime::from_timestamp(claims.exp, 0).ok_or(VerifyError::Malformed)?;

        Ok(Claims {
            subject_id,
            expires_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{EncodingKey, Header};
    use serde_json::json;

    const SECRET: &str = "unit-test-secret";

    fn config() -> AuthConfig {
        AuthConfig {
            jwt_secret: SECRET.to_string(),
            issuer: None,
            audience: None,
            leeway_seconds: 0,
        }
    }

    fn sign(claims: serde_json::Value, secret: &str) -> String {
        jsonwebtoken::encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    fn in_one_hour() -> i64 {
        Utc::now().timestamp() + 3600
    }

    #[test]
    fn accepts_a_well_formed_token() {
        let user_id = Uuid::new_v4();
        let exp = in_one_hour();
        let token = sign(json!({ "sub": user_id.to_string(), "exp": exp }), SECRET);

        let claims = CredentialVerifier::new(&config()).verify(&token).unwrap();
        assert_eq!(claims.subject_id, user_id);
        assert_eq!(claims.expires_at.timestamp(), exp);
    }

    #[test]
    fn rejects_a_foreign_signature() {
        let token = sign(
            json!({ "sub": Uuid::new_v4().to_string(), "exp": in_one_hour() }),
            "some-other-secret",
        );
        assert_eq!(
            CredentialVerifier::new(&config()).verify(&token),
            Err(VerifyError::SignatureInvalid)
        );
    }

    #[test]
    fn rejects_an_expired_token() {
        let token = sign(
            json!({ "sub": Uuid::new_v4().to_string(), "exp": Utc::now().timestamp() - 600 }),
            SECRET,
        );
        assert_eq!(
            CredentialVerifier::new(&config()).verify(&token),
            Err(VerifyError::Expired)
        );
    }

    #[test]
    fn forged_and_expired_is_a_signature_failure() {
        let token = sign(
            json!({ "sub": Uuid::new_v4().to_string(), "exp": Utc::now().timestamp() - 600 }),
            "some-other-secret",
        );
        assert_eq!(
            CredentialVerifier::new(&config()).verify(&token),
            Err(VerifyError::SignatureInvalid)
        );
    }

    #[test]
    fn garbage_is_malformed() {
        let verifier = CredentialVerifier::new(&config());
        assert_eq!(verifier.verify("not-a-jwt"), Err(VerifyError::Malformed));
        assert_eq!(verifier.verify(""), Err(VerifyError::Malformed));
    }

    #[test]
    fn non_uuid_subject_is_malformed() {
        let token = sign(json!({ "sub": "42", "exp": in_one_hour() }), SECRET);
        assert_eq!(
            CredentialVerifier::new(&config()).verify(&token),
            Err(VerifyError::Malformed)
        );
    }

    #[test]
    fn missing_expiry_is_malformed() {
        let token = sign(json!({ "sub": Uuid::new_v4().to_string() }), SECRET);
        assert_eq!(
            CredentialVerifier::new(&config()).verify(&token),
            Err(VerifyError::Malformed)
        );
    }

    #[test]
    fn issuer_is_checked_when_configured() {
        let mut cfg = config();
        cfg.issuer = Some("https://issuer.example".to_string());
        let token = sign(
            json!({ "sub": Uuid::new_v4().to_string(), "exp": in_one_hour(), "iss": "someone-else" }),
            SECRET,
        );
        assert_eq!(
            CredentialVerifier::new(&cfg).verify(&token),
            Err(VerifyError::Malformed)
        );
    }
}
