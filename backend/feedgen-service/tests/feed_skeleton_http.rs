//! End-to-end tests of the skeleton endpoint over the actix test service,
//! with in-memory store and content-source doubles.

use std::collections::HashMap;
use std::sync::Arc;

use actix_web::{test, web, App};
use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};

use feedgen_service::algos::{AlgoContext, AlgoRegistry};
use feedgen_service::config::{
    AppConfig, AppViewConfig, Config, DatabaseConfig, FeedSettings, IdentityConfig,
};
use feedgen_service::db::InteractionStore;
use feedgen_service::error::{AppError, Result};
use feedgen_service::handlers::feed::FeedHandlerState;
use feedgen_service::handlers::{describe_feed_generator, did_document, get_feed_skeleton};
use feedgen_service::models::{ContentItem, FeedSkeleton, LikeEdge};
use feedgen_service::services::{AuthorFeedFilter, ContentSource};

const PUBLISHER: &str = "did:plc:publisher";

fn ts(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
}

struct MemStore {
    likes_by_actor: Vec<LikeEdge>,
}

#[async_trait]
impl InteractionStore for MemStore {
    async fn register_subscriber(&self, _did: &str, _now: DateTime<Utc>) -> Result<bool> {
        Ok(false)
    }

    async fn recent_likes_by_actor(&self, _did: &str, limit: i64) -> Result<Vec<LikeEdge>> {
        Ok(self
            .likes_by_actor
            .iter()
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn recent_likes_on_actor(
        &self,
        _did: &str,
        _since: DateTime<Utc>,
    ) -> Result<Vec<LikeEdge>> {
        Ok(Vec::new())
    }
}

struct MemSource {
    feeds: HashMap<String, Vec<ContentItem>>,
    failing: Vec<String>,
}

#[async_trait]
impl ContentSource for MemSource {
    async fn author_feed(
        &self,
        actor: &str,
        _limit: u32,
        _filter: AuthorFeedFilter,
    ) -> Result<Vec<ContentItem>> {
        if self.failing.iter().any(|f| f == actor) {
            return Err(AppError::Upstream("remote unavailable".into()));
        }
        Ok(self.feeds.get(actor).cloned().unwrap_or_default())
    }
}

fn test_config() -> Config {
    Config {
        app: AppConfig {
            // Development mode resolves the requester to the publisher DID,
            // which keeps these tests free of token plumbing.
            env: "development".to_string(),
            port: 0,
            log_level: "info".to_string(),
        },
        database: DatabaseConfig {
            url: "postgres://unused".to_string(),
            max_connections: 1,
        },
        identity: IdentityConfig {
            publisher_did: PUBLISHER.to_string(),
            service_did: "did:web:feed.example.com".to_string(),
            hostname: "feed.example.com".to_string(),
        },
        appview: AppViewConfig {
            service_url: "https://unused.example".to_string(),
            identifier: None,
            app_password: None,
            request_timeout_secs: 10,
        },
        feed: FeedSettings::default(),
    }
}

fn state(store: MemStore, source: MemSource) -> web::Data<FeedHandlerState> {
    web::Data::new(FeedHandlerState {
        config: test_config(),
        registry: AlgoRegistry::with_defaults(),
        ctx: AlgoContext {
            store: Arc::new(store),
            source: Arc::new(source),
            settings: FeedSettings::default(),
        },
    })
}

fn post(target: &str, n: u32, secs: i64, original: bool) -> ContentItem {
    ContentItem {
        post_uri: format!("at://{}/app.bsky.feed.post/{}", target, n),
        indexed_at: ts(secs),
        is_original: original,
    }
}

fn likes(edges: &[(&str, i64)]) -> Vec<LikeEdge> {
    edges
        .iter()
        .map(|(did, secs)| LikeEdge {
            did: did.to_string(),
            indexed_at: ts(*secs),
        })
        .collect()
}

fn feed_uri(rkey: &str) -> String {
    format!("at://{}/app.bsky.feed.generator/{}", PUBLISHER, rkey)
}

#[actix_web::test]
async fn skeleton_merges_targets_by_recency() {
    let store = MemStore {
        likes_by_actor: likes(&[("did:t1", 50), ("did:t1", 40), ("did:t2", 30)]),
    };
    let mut feeds = HashMap::new();
    feeds.insert(
        "did:t1".to_string(),
        vec![
            post("did:t1", 0, 90, true),
            post("did:t1", 1, 70, true),
            post("did:t1", 2, 60, true),
        ],
    );
    feeds.insert(
        "did:t2".to_string(),
        vec![post("did:t2", 0, 80, false), post("did:t2", 1, 75, true)],
    );

    let app = test::init_service(
        App::new()
            .app_data(state(
                store,
                MemSource {
                    feeds,
                    failing: Vec::new(),
                },
            ))
            .service(get_feed_skeleton),
    )
    .await;

    let req = test::TestRequest::get()
        .uri(&format!(
            "/xrpc/app.bsky.feed.getFeedSkeleton?feed={}",
            feed_uri("likeTracer")
        ))
        .to_request();
    let skeleton: FeedSkeleton = test::call_and_read_body_json(&app, req).await;

    // T1 quota 2, T2 quota 1 with its reshare excluded.
    let uris: Vec<_> = skeleton.feed.iter().map(|p| p.post.as_str()).collect();
    assert_eq!(
        uris,
        vec![
            "at://did:t1/app.bsky.feed.post/0",
            "at://did:t2/app.bsky.feed.post/1",
            "at://did:t1/app.bsky.feed.post/1"
        ]
    );
    assert!(skeleton.cursor.is_none());
}

#[actix_web::test]
async fn pages_chain_into_the_unpaginated_sequence() {
    let store = MemStore {
        likes_by_actor: likes(&[("did:t1", 10), ("did:t1", 9), ("did:t1", 8), ("did:t1", 7)]),
    };
    let mut feeds = HashMap::new();
    feeds.insert(
        "did:t1".to_string(),
        (0..4).map(|i| post("did:t1", i, 100 - i as i64, true)).collect(),
    );

    let app = test::init_service(
        App::new()
            .app_data(state(
                store,
                MemSource {
                    feeds,
                    failing: Vec::new(),
                },
            ))
            .service(get_feed_skeleton),
    )
    .await;

    let first: FeedSkeleton = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri(&format!(
                "/xrpc/app.bsky.feed.getFeedSkeleton?feed={}&limit=2",
                feed_uri("likeTracer")
            ))
            .to_request(),
    )
    .await;
    assert_eq!(first.feed.len(), 2);
    let cursor = first.cursor.clone().expect("more items remain");

    let second: FeedSkeleton = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri(&format!(
                "/xrpc/app.bsky.feed.getFeedSkeleton?feed={}&limit=2&cursor={}",
                feed_uri("likeTracer"),
                urlencode(&cursor)
            ))
            .to_request(),
    )
    .await;

    let both: FeedSkeleton = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri(&format!(
                "/xrpc/app.bsky.feed.getFeedSkeleton?feed={}&limit=4",
                feed_uri("likeTracer")
            ))
            .to_request(),
    )
    .await;

    let chained: Vec<_> = first.feed.into_iter().chain(second.feed).collect();
    assert_eq!(chained, both.feed);
    assert!(both.cursor.is_none());
}

#[actix_web::test]
async fn failing_target_degrades_to_partial_feed() {
    let store = MemStore {
        likes_by_actor: likes(&[("did:t1", 30), ("did:bad", 20), ("did:t3", 10)]),
    };
    let mut feeds = HashMap::new();
    feeds.insert("did:t1".to_string(), vec![post("did:t1", 0, 20, true)]);
    feeds.insert("did:t3".to_string(), vec![post("did:t3", 0, 10, true)]);

    let app = test::init_service(
        App::new()
            .app_data(state(
                store,
                MemSource {
                    feeds,
                    failing: vec!["did:bad".to_string()],
                },
            ))
            .service(get_feed_skeleton),
    )
    .await;

    let req = test::TestRequest::get()
        .uri(&format!(
            "/xrpc/app.bsky.feed.getFeedSkeleton?feed={}",
            feed_uri("likeTracer")
        ))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let skeleton: FeedSkeleton = test::read_body_json(resp).await;
    assert_eq!(skeleton.feed.len(), 2);
    // Adjacent items never increase in recency.
    assert_eq!(skeleton.feed[0].post, "at://did:t1/app.bsky.feed.post/0");
}

#[actix_web::test]
async fn actor_without_interactions_gets_empty_feed() {
    let store = MemStore {
        likes_by_actor: Vec::new(),
    };
    let app = test::init_service(
        App::new()
            .app_data(state(
                store,
                MemSource {
                    feeds: HashMap::new(),
                    failing: Vec::new(),
                },
            ))
            .service(get_feed_skeleton),
    )
    .await;

    let req = test::TestRequest::get()
        .uri(&format!(
            "/xrpc/app.bsky.feed.getFeedSkeleton?feed={}",
            feed_uri("likeTracer")
        ))
        .to_request();
    let skeleton: FeedSkeleton = test::call_and_read_body_json(&app, req).await;
    assert!(skeleton.feed.is_empty());
    assert!(skeleton.cursor.is_none());
}

#[actix_web::test]
async fn foreign_publisher_and_unknown_rkey_are_rejected() {
    let store = MemStore {
        likes_by_actor: Vec::new(),
    };
    let app = test::init_service(
        App::new()
            .app_data(state(
                store,
                MemSource {
                    feeds: HashMap::new(),
                    failing: Vec::new(),
                },
            ))
            .service(get_feed_skeleton),
    )
    .await;

    for uri in [
        "at://did:plc:somebody-else/app.bsky.feed.generator/likeTracer".to_string(),
        feed_uri("nonexistent"),
        format!("at://{}/app.bsky.graph.list/likeTracer", PUBLISHER),
    ] {
        let req = test::TestRequest::get()
            .uri(&format!("/xrpc/app.bsky.feed.getFeedSkeleton?feed={}", uri))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status().as_u16(), 400, "uri {} should be rejected", uri);
    }
}

#[actix_web::test]
async fn describe_lists_published_algorithms() {
    let store = MemStore {
        likes_by_actor: Vec::new(),
    };
    let app = test::init_service(
        App::new()
            .app_data(state(
                store,
                MemSource {
                    feeds: HashMap::new(),
                    failing: Vec::new(),
                },
            ))
            .service(describe_feed_generator),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/xrpc/app.bsky.feed.describeFeedGenerator")
        .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["did"], "did:web:feed.example.com");
    let feeds: Vec<_> = body["feeds"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["uri"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(feeds, vec![feed_uri("likeTracer"), feed_uri("likesBack")]);
}

#[actix_web::test]
async fn did_document_advertises_service_endpoint() {
    let store = MemStore {
        likes_by_actor: Vec::new(),
    };
    let app = test::init_service(
        App::new()
            .app_data(state(
                store,
                MemSource {
                    feeds: HashMap::new(),
                    failing: Vec::new(),
                },
            ))
            .service(did_document),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/.well-known/did.json")
        .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["id"], "did:web:feed.example.com");
    assert_eq!(
        body["service"][0]["serviceEndpoint"],
        "https://feed.example.com"
    );
}

/// Percent-encode the handful of characters base64 cursors can contain.
fn urlencode(raw: &str) -> String {
    raw.replace('%', "%25").replace('+', "%2B").replace('=', "%3D")
}
