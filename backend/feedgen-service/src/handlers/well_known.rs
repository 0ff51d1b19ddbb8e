//! `/.well-known/did.json` — did:web document for the service identity.

use actix_web::{get, web, HttpResponse};
use serde::Serialize;

use crate::error::{AppError, Result};
use crate::handlers::feed::FeedHandlerState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DidDocument {
    #[serde(rename = "@context")]
    context: Vec<String>,
    id: String,
    service: Vec<DidService>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DidService {
    id: String,
    #[serde(rename = "type")]
    service_type: String,
    service_endpoint: String,
}

#[get("/.well-known/did.json")]
pub async fn did_document(state: web::Data<FeedHandlerState>) -> Result<HttpResponse> {
    let identity = &state.config.identity;

    // Only answerable when the service identity is did:web on this host.
    if !identity.service_did.ends_with(&identity.hostname) {
        return Err(AppError::NotFound("no did:web identity".to_string()));
    }

    Ok(HttpResponse::Ok().json(DidDocument {
        context: vec!["https://www.w3.org/ns/did/v1".to_string()],
        id: identity.service_did.clone(),
        service: vec![DidService {
            id: "#bsky_fg".to_string(),
            service_type: "BskyFeedGenerator".to_string(),
            service_endpoint: format!("https://{}", identity.hostname),
        }],
    }))
}
