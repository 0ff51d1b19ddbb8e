//! `app.bsky.feed.getFeedSkeleton` handler.

use actix_web::{get, web, HttpRequest, HttpResponse};
use serde::Deserialize;
use tracing::debug;

use crate::algos::{AlgoContext, AlgoRegistry, FeedAlgorithm, FeedQuery};
use crate::auth;
use crate::config::Config;
use crate::error::{AppError, Result};

const FEED_GENERATOR_COLLECTION: &str = "app.bsky.feed.generator";

#[derive(Debug, Deserialize)]
pub struct FeedQueryParams {
    pub feed: String,
    pub limit: Option<u32>,
    pub cursor: Option<String>,
}

/// Shared state of the skeleton endpoint.
pub struct FeedHandlerState {
    pub config: Config,
    pub registry: AlgoRegistry,
    pub ctx: AlgoContext,
}

/// Minimal `at://` URI split into authority / collection / rkey.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct AtUri<'a> {
    pub authority: &'a str,
    pub collection: &'a str,
    pub rkey: &'a str,
}

impl<'a> AtUri<'a> {
    pub(crate) fn parse(uri: &'a str) -> Option<Self> {
        let rest = uri.strip_prefix("at://")?;
        let mut parts = rest.splitn(3, '/');
        let authority = parts.next().filter(|s| !s.is_empty())?;
        let collection = parts.next().filter(|s| !s.is_empty())?;
        let rkey = parts.next().filter(|s| !s.is_empty())?;
        Some(Self {
            authority,
            collection,
            rkey,
        })
    }
}

#[get("/xrpc/app.bsky.feed.getFeedSkeleton")]
pub async fn get_feed_skeleton(
    query: web::Query<FeedQueryParams>,
    http_req: HttpRequest,
    state: web::Data<FeedHandlerState>,
) -> Result<HttpResponse> {
    let feed_uri = AtUri::parse(&query.feed)
        .ok_or_else(|| AppError::BadRequest("invalid feed uri".to_string()))?;

    let algo = if feed_uri.authority == state.config.identity.publisher_did
        && feed_uri.collection == FEED_GENERATOR_COLLECTION
    {
        state.registry.get(feed_uri.rkey)
    } else {
        None
    };
    let algo = algo.ok_or_else(|| AppError::BadRequest("Unsupported algorithm".to_string()))?;

    let requester_did = auth::requester_did(&http_req, &state.config)?;
    debug!(
        "Feed skeleton request: requester={} algo={} limit={:?} cursor={:?}",
        requester_did, feed_uri.rkey, query.limit, query.cursor
    );

    let feed_query = FeedQuery {
        limit: query.limit,
        cursor: query.cursor.clone(),
    };
    let skeleton = algo.produce(&state.ctx, &feed_query, &requester_did).await?;

    Ok(HttpResponse::Ok().json(skeleton))
}
