//! Bearer token authentication.
//!
//! Tokens are HS256 JWTs signed with one static shared secret. A token is accepted only
//! when its signature verifies, its issuer and audience match the configured values, and
//! its `exp` is strictly in the future. Configuration is read once at startup; without
//! it every request is rejected.
//!
//! This module is framework-agnostic. The axum extractors live in `api::auth`.

use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode, errors::ErrorKind};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use tracing::error;

/// Role value that grants access to the admin routes.
pub const ADMIN_ROLE: &str = "admin";

const BEARER_PREFIX: &str = "Bearer ";

/// Reasons a request fails authentication.
///
/// These are logged but never returned to clients, which always see one uniform message.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Secret, issuer or audience is not configured.
    #[error("JWT configuration is invalid, one of issuer, audience, or key is missing")]
    MissingConfiguration,

    /// No `Authorization` header.
    #[error("Missing Authorization header")]
    MissingHeader,

    /// Header is not `Bearer <token>`.
    #[error("Authorization header is not a bearer token")]
    MalformedHeader,

    /// Bad signature, issuer, audience, algorithm or token format.
    #[error("Invalid token: {0}")]
    InvalidToken(jsonwebtoken::errors::Error),

    /// `exp` is not in the future.
    #[error("Token expired")]
    TokenExpired,

    /// Token is valid but does not carry the admin role.
    #[error("Token does not carry the admin role")]
    NotAdmin,
}

impl From<jsonwebtoken::errors::Error> for AuthError {
    fn from(value: jsonwebtoken::errors::Error) -> Self {
        match value.kind() {
            ErrorKind::ExpiredSignature => Self::TokenExpired,
            _ => Self::InvalidToken(value),
        }
    }
}

/// Static token verification settings, read from `JWT_KEY`, `JWT_ISS` and `JWT_AUD`.
#[derive(Clone)]
pub struct JwtSettings {
    /// Shared HMAC secret
    pub secret: String,
    /// Expected `iss` claim
    pub issuer: String,
    /// Expected `aud` claim
    pub audience: String,
}

impl fmt::Debug for JwtSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtSettings")
            .field("secret", &"<redacted>")
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .finish()
    }
}

impl JwtSettings {
    /// Reads the settings from the environment.
    ///
    /// Returns `None` (and logs a configuration error) if any value is missing or blank.
    #[must_use]
    pub fn from_env() -> Option<Self> {
        Self::from_values(
            std::env::var("JWT_KEY").ok(),
            std::env::var("JWT_ISS").ok(),
            std::env::var("JWT_AUD").ok(),
        )
    }

    /// Builds settings from optional values; any missing or blank value yields `None`.
    #[must_use]
    pub fn from_values(
        secret: Option<String>,
        issuer: Option<String>,
        audience: Option<String>,
    ) -> Option<Self> {
        let present = |value: Option<String>| value.filter(|v| !v.trim().is_empty());
        match (present(secret), present(issuer), present(audience)) {
            (Some(secret), Some(issuer), Some(audience)) => Some(Self {
                secret,
                issuer,
                audience,
            }),
            _ => {
                error!("{}", AuthError::MissingConfiguration);
                None
            }
        }
    }
}

/// `aud` claim, which may be one string or a list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Audience {
    /// Single audience
    One(String),
    /// Several audiences
    Many(Vec<String>),
}

impl Audience {
    /// Whether `audience` is among the token's audiences.
    #[must_use]
    pub fn contains(&self, audience: &str) -> bool {
        match self {
            Self::One(one) => one == audience,
            Self::Many(many) => many.iter().any(|one| one == audience),
        }
    }
}

/// Decoded token payload, handed to handlers after verification.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    /// Issuer
    pub iss: String,
    /// Audience
    pub aud: Audience,
    /// Issued at (seconds since epoch)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
    /// Expiration time (seconds since epoch, possibly fractional)
    pub exp: f64,
    /// Role; `admin` unlocks the admin routes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Any other custom claims
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Claims {
    /// Whether the token carries exactly the `admin` role.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role.as_deref() == Some(ADMIN_ROLE)
    }
}

/// Extracts the token from an `Authorization` header value.
///
/// # Errors
/// Fails when the header is absent, uses another scheme, or carries an empty token.
pub fn bearer_token(header: Option<&str>) -> Result<&str, AuthError> {
    let header = header.ok_or(AuthError::MissingHeader)?;
    let token = header
        .strip_prefix(BEARER_PREFIX)
        .ok_or(AuthError::MalformedHeader)?
        .trim();
    if token.is_empty() {
        return Err(AuthError::MalformedHeader);
    }
    Ok(token)
}

struct VerifierKeys {
    decoding_key: DecodingKey,
    validation: Validation,
}

/// Verifies bearer tokens against static settings.
pub struct JwtVerifier {
    keys: Option<VerifierKeys>,
}

impl fmt::Debug for JwtVerifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtVerifier")
            .field("configured", &self.is_configured())
            .finish()
    }
}

impl JwtVerifier {
    /// Builds a verifier. Without settings, every verification fails closed.
    #[must_use]
    pub fn new(settings: Option<&JwtSettings>) -> Self {
        let keys = settings.map(|settings| {
            let mut validation = Validation::new(Algorithm::HS256);
            validation.set_issuer(&[settings.issuer.as_str()]);
            validation.set_audience(&[settings.audience.as_str()]);
            validation.set_required_spec_claims(&["exp", "iss", "aud"]);
            validation.leeway = 0;

            VerifierKeys {
                decoding_key: DecodingKey::from_secret(settings.secret.as_bytes()),
                validation,
            }
        });
        Self { keys }
    }

    /// Builds a verifier from `JWT_KEY`, `JWT_ISS` and `JWT_AUD`.
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(JwtSettings::from_env().as_ref())
    }

    /// Whether verification settings are present.
    #[must_use]
    pub const fn is_configured(&self) -> bool {
        self.keys.is_some()
    }

    /// Verifies a raw token and returns its claims.
    ///
    /// # Errors
    /// Fails when settings are missing, the signature, issuer, audience or algorithm do
    /// not match, or `exp` is missing, non-numeric or not strictly after now.
    pub fn verify_token(&self, token: &str) -> Result<Claims, AuthError> {
        let keys = self.keys.as_ref().ok_or(AuthError::MissingConfiguration)?;
        let data = decode::<Claims>(token, &keys.decoding_key, &keys.validation)?;

        #[allow(clippy::cast_precision_loss)]
        let now = Utc::now().timestamp_millis() as f64 / 1000.0;
        if data.claims.exp <= now {
            return Err(AuthError::TokenExpired);
        }
        Ok(data.claims)
    }

    /// Verifies an `Authorization` header value and returns the claims.
    ///
    /// # Errors
    /// See [`bearer_token`] and [`JwtVerifier::verify_token`].
    pub fn verify_authorization(&self, header: Option<&str>) -> Result<Claims, AuthError> {
        let token = bearer_token(header)?;
        self.verify_token(token)
    }

    /// Verifies a header value and additionally requires the admin role.
    ///
    /// # Errors
    /// See [`JwtVerifier::verify_authorization`]; also fails with [`AuthError::NotAdmin`].
    pub fn verify_admin(&self, header: Option<&str>) -> Result<Claims, AuthError> {
        let claims = self.verify_authorization(header)?;
        if !claims.is_admin() {
            return Err(AuthError::NotAdmin);
        }
        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::cast_precision_loss)]
    use super::*;
    use crate::test_utils::*;
    use serde_json::json;

    fn verifier() -> JwtVerifier {
        JwtVerifier::new(Some(&test_jwt_settings()))
    }

    fn bearer(token: &str) -> String {
        format!("Bearer {token}")
    }

    #[test]
    fn test_valid_token_returns_claims() {
        let settings = test_jwt_settings();
        let mut claims = claims_expiring_in(&settings, 3600, Some("admin"));
        claims["favourite"] = json!("espresso");
        let token = mint_token(&settings.secret, &claims);

        let verified = verifier().verify_authorization(Some(&bearer(&token))).unwrap();
        assert_eq!(verified.iss, settings.issuer);
        assert_eq!(verified.aud, Audience::One(settings.audience.clone()));
        assert_eq!(verified.sub.as_deref(), Some("user"));
        assert!(verified.is_admin());
        assert_eq!(verified.extra.get("favourite"), Some(&json!("espresso")));
    }

    #[test]
    fn test_missing_header_rejected() {
        let result = verifier().verify_authorization(None);
        assert!(matches!(result, Err(AuthError::MissingHeader)));
    }

    #[test]
    fn test_non_bearer_header_rejected() {
        for header in ["Basic dXNlcjpwYXNz", "bearer abc", "Bearer", "Bearer    "] {
            let result = verifier().verify_authorization(Some(header));
            assert!(
                matches!(result, Err(AuthError::MalformedHeader)),
                "{header:?} should be malformed"
            );
        }
    }

    #[test]
    fn test_bearer_token_trims_whitespace() {
        let token = bearer_token(Some("Bearer   abc.def.ghi   ")).unwrap();
        assert_eq!(token, "abc.def.ghi");
    }

    #[test]
    fn test_expired_token_rejected() {
        let settings = test_jwt_settings();
        let token = mint_token(&settings.secret, &claims_expiring_in(&settings, -60, None));

        let result = verifier().verify_token(&token);
        assert!(matches!(result, Err(AuthError::TokenExpired)));
    }

    #[test]
    fn test_token_expiring_now_rejected() {
        let settings = test_jwt_settings();
        let token = mint_token(&settings.secret, &claims_expiring_in(&settings, 0, None));

        let result = verifier().verify_token(&token);
        assert!(matches!(result, Err(AuthError::TokenExpired)));
    }

    #[test]
    fn test_missing_exp_rejected() {
        let settings = test_jwt_settings();
        let mut claims = claims_expiring_in(&settings, 3600, None);
        claims.as_object_mut().unwrap().remove("exp");
        let token = mint_token(&settings.secret, &claims);

        assert!(verifier().verify_token(&token).is_err());
    }

    #[test]
    fn test_non_numeric_exp_rejected() {
        let settings = test_jwt_settings();
        let mut claims = claims_expiring_in(&settings, 3600, None);
        claims["exp"] = json!("tomorrow");
        let token = mint_token(&settings.secret, &claims);

        assert!(verifier().verify_token(&token).is_err());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let settings = test_jwt_settings();
        let token = mint_token(
            "a-completely-different-secret",
            &claims_expiring_in(&settings, 3600, None),
        );

        let result = verifier().verify_token(&token);
        assert!(matches!(result, Err(AuthError::InvalidToken(_))));
    }

    #[test]
    fn test_wrong_issuer_rejected() {
        let settings = test_jwt_settings();
        let mut claims = claims_expiring_in(&settings, 3600, None);
        claims["iss"] = json!("someone-else");
        let token = mint_token(&settings.secret, &claims);

        let result = verifier().verify_token(&token);
        assert!(matches!(result, Err(AuthError::InvalidToken(_))));
    }

    #[test]
    fn test_wrong_audience_rejected() {
        let settings = test_jwt_settings();
        let mut claims = claims_expiring_in(&settings, 3600, None);
        claims["aud"] = json!("another-service");
        let token = mint_token(&settings.secret, &claims);

        let result = verifier().verify_token(&token);
        assert!(matches!(result, Err(AuthError::InvalidToken(_))));
    }

    #[test]
    fn test_garbage_token_rejected() {
        let result = verifier().verify_token("not.a.jwt");
        assert!(matches!(result, Err(AuthError::InvalidToken(_))));
    }

    #[test]
    fn test_unconfigured_verifier_rejects_everything() {
        let settings = test_jwt_settings();
        let token = mint_token(&settings.secret, &claims_expiring_in(&settings, 3600, None));

        let unconfigured = JwtVerifier::new(None);
        assert!(!unconfigured.is_configured());
        let result = unconfigured.verify_authorization(Some(&bearer(&token)));
        assert!(matches!(result, Err(AuthError::MissingConfiguration)));
    }

    #[test]
    fn test_settings_require_every_value() {
        let value = |v: &str| Some(v.to_string());
        assert!(JwtSettings::from_values(value("k"), value("i"), value("a")).is_some());
        assert!(JwtSettings::from_values(None, value("i"), value("a")).is_none());
        assert!(JwtSettings::from_values(value("k"), None, value("a")).is_none());
        assert!(JwtSettings::from_values(value("k"), value("i"), value("  ")).is_none());
    }

    #[test]
    fn test_admin_role_must_match_exactly() {
        let settings = test_jwt_settings();
        for (role, allowed) in [
            (Some("admin"), true),
            (Some("Admin"), false),
            (Some("ADMIN"), false),
            (Some("user"), false),
            (None, false),
        ] {
            let token = mint_token(&settings.secret, &claims_expiring_in(&settings, 3600, role));
            let result = verifier().verify_admin(Some(&bearer(&token)));
            if allowed {
                assert!(result.is_ok(), "{role:?} should be allowed");
            } else {
                assert!(
                    matches!(result, Err(AuthError::NotAdmin)),
                    "{role:?} should be rejected"
                );
            }
        }
    }

    #[test]
    fn test_settings_debug_redacts_secret() {
        let rendered = format!("{:?}", test_jwt_settings());
        assert!(!rendered.contains(&test_jwt_settings().secret));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn test_audience_list_accepted() {
        let settings = test_jwt_settings();
        let mut claims = claims_expiring_in(&settings, 3600, Some("admin"));
        claims["aud"] = json!(["another-service", settings.audience]);
        let token = mint_token(&settings.secret, &claims);

        let verified = verifier().verify_admin(Some(&bearer(&token))).unwrap();
        assert!(verified.aud.contains(&settings.audience));
        assert!(verified.aud.contains("another-service"));
    }

    #[test]
    fn test_audience_list_without_ours_rejected() {
        let settings = test_jwt_settings();
        let mut claims = claims_expiring_in(&settings, 3600, None);
        claims["aud"] = json!(["another-service", "yet-another"]);
        let token = mint_token(&settings.secret, &claims);

        let result = verifier().verify_token(&token);
        assert!(matches!(result, Err(AuthError::InvalidToken(_))));
    }

    #[test]
    fn test_fractional_exp_accepted() {
        let settings = test_jwt_settings();
        let mut claims = claims_expiring_in(&settings, 3600, None);
        let exp = claims["exp"].as_i64().unwrap();
        claims["exp"] = json!(exp as f64 + 0.5);
        let token = mint_token(&settings.secret, &claims);

        let verified = verifier().verify_token(&token).unwrap();
        assert!((verified.exp - (exp as f64 + 0.5)).abs() < f64::EPSILON);
    }

    #[test]
    fn test_fractional_exp_in_past_rejected() {
        let settings = test_jwt_settings();
        let mut claims = claims_expiring_in(&settings, -30, None);
        let exp = claims["exp"].as_i64().unwrap();
        claims["exp"] = json!(exp as f64 - 0.5);
        let token = mint_token(&settings.secret, &claims);

        let result = verifier().verify_token(&token);
        assert!(matches!(result, Err(AuthError::TokenExpired)));
    }
}
