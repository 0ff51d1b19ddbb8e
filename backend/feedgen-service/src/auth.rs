//! Requester resolution.
//!
//! Full service-auth verification (signature check against the requester's
//! DID key) belongs to the gateway in front of this service; here we only
//! lift the `iss` claim out of the bearer token. In development mode the
//! configured publisher DID stands in for a real requester.

use actix_web::HttpRequest;
use base64::{engine::general_purpose, Engine as _};
use serde::Deserialize;

use crate::config::Config;
use crate::error::{AppError, Result};

#[derive(Debug, Deserialize)]
struct Claims {
    iss: String,
}

/// Resolve the DID of the requesting actor.
pub fn requester_did(req: &HttpRequest, config: &Config) -> Result<String> {
    if config.is_development() {
        return Ok(config.identity.publisher_did.clone());
    }

    let header = req
        .headers()
        .get("Authorization")
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("missing authorization header".to_string()))?;

    let token = header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::Unauthorized("malformed authorization header".to_string()))?;

    issuer_of(token)
}

/// Extract the `iss` claim from a JWT without verifying the signature.
fn issuer_of(token: &str) -> Result<String> {
    let payload = token
        .split('.')
        .nth(1)
        .ok_or_else(|| AppError::Unauthorized("malformed jwt".to_string()))?;

    let bytes = general_purpose::URL_SAFE_NO_PAD
        .decode(payload)
        .map_err(|_| AppError::Unauthorized("malformed jwt payload".to_string()))?;

    let claims: Claims = serde_json::from_slice(&bytes)
        .map_err(|_| AppError::Unauthorized("jwt payload missing iss".to_string()))?;

    Ok(claims.iss)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token_with_payload(payload: &str) -> String {
        let header = general_purpose::URL_SAFE_NO_PAD.encode(r#"{"alg":"ES256K"}"#);
        let body = general_purpose::URL_SAFE_NO_PAD.encode(payload);
        format!("{}.{}.sig", header, body)
    }

    #[test]
    fn extracts_issuer_from_bearer_token() {
        let token = token_with_payload(r#"{"iss":"did:plc:abc123","aud":"did:web:feed.example"}"#);
        assert_eq!(issuer_of(&token).unwrap(), "did:plc:abc123");
    }

    #[test]
    fn rejects_token_without_issuer() {
        let token = token_with_payload(r#"{"aud":"did:web:feed.example"}"#);
        assert!(issuer_of(&token).is_err());
    }

    #[test]
    fn rejects_garbage_token() {
        assert!(issuer_of("not-a-jwt").is_err());
        assert!(issuer_of("a.!!!.c").is_err());
    }
}
