//! axum extractors that guard routes with bearer tokens.
//!
//! [`Authenticated`] accepts any valid token; [`Admin`] also requires the `admin` role.
//! Both attach the decoded claims to the handler and reject with a uniform 401.

use super::AppState;
use crate::{
    auth::{AuthError, Claims},
    errors::Error,
};
use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use tracing::{error, warn};

/// Claims of a request carrying any valid token.
#[derive(Debug, Clone)]
pub struct Authenticated(pub Claims);

/// Claims of a request carrying a valid token with the admin role.
#[derive(Debug, Clone)]
pub struct Admin(pub Claims);

fn authorization_header(parts: &Parts) -> Result<Option<&str>, AuthError> {
    parts
        .headers
        .get(AUTHORIZATION)
        .map(|value| value.to_str().map_err(|_| AuthError::MalformedHeader))
        .transpose()
}

fn reject(parts: &Parts, err: AuthError) -> Error {
    match err {
        AuthError::MissingConfiguration => error!("{}", err),
        _ => warn!(path = %parts.uri.path(), "Error when verifying authorization token: {}", err),
    }
    Error::Auth(err)
}

#[async_trait]
impl FromRequestParts<AppState> for Authenticated {
    type Rejection = Error;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let parts: &Parts = parts;
        authorization_header(parts)
            .and_then(|header| state.verifier.verify_authorization(header))
            .map(Self)
            .map_err(|err| reject(parts, err))
    }
}

#[async_trait]
impl FromRequestParts<AppState> for Admin {
    type Rejection = Error;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let parts: &Parts = parts;
        authorization_header(parts)
            .and_then(|header| state.verifier.verify_admin(header))
            .map(Self)
            .map_err(|err| reject(parts, err))
    }
}
