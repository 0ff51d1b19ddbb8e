//! `app.bsky.feed.describeFeedGenerator` handler.

use actix_web::{get, web, HttpResponse};
use serde::Serialize;

use crate::error::Result;
use crate::handlers::feed::FeedHandlerState;

#[derive(Debug, Serialize)]
struct DescribeFeedGeneratorResponse {
    did: String,
    feeds: Vec<FeedRef>,
}

#[derive(Debug, Serialize)]
struct FeedRef {
    uri: String,
}

#[get("/xrpc/app.bsky.feed.describeFeedGenerator")]
pub async fn describe_feed_generator(
    state: web::Data<FeedHandlerState>,
) -> Result<HttpResponse> {
    let publisher = &state.config.identity.publisher_did;
    let feeds = state
        .registry
        .shortnames()
        .into_iter()
        .map(|shortname| FeedRef {
            uri: format!("at://{}/app.bsky.feed.generator/{}", publisher, shortname),
        })
        .collect();

    Ok(HttpResponse::Ok().json(DescribeFeedGeneratorResponse {
        did: state.config.identity.service_did.clone(),
        feeds,
    }))
}
