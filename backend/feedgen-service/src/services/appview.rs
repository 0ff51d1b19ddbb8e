//! Long-lived AT-Proto client for author-feed reads.
//!
//! The session is established once at process start and the access token is
//! reused for every request; the client is passed into the pipeline as an
//! explicit collaborator handle.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::info;

use crate::config::AppViewConfig;
use crate::error::{AppError, Result};
use crate::models::ContentItem;

/// Source-side filter applied to an author feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthorFeedFilter {
    /// Replies excluded
    PostsNoReplies,
    /// Replies excluded, thread-root posts by the author included
    PostsAndAuthorThreads,
}

impl AuthorFeedFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PostsNoReplies => "posts_no_replies",
            Self::PostsAndAuthorThreads => "posts_and_author_threads",
        }
    }
}

/// Remote "recent content by target" capability. Every call is fallible on
/// its own; callers decide how failures are isolated.
#[async_trait]
pub trait ContentSource: Send + Sync {
    async fn author_feed(
        &self,
        actor: &str,
        limit: u32,
        filter: AuthorFeedFilter,
    ) -> Result<Vec<ContentItem>>;
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SessionResponse {
    access_jwt: String,
    did: String,
}

#[derive(Debug, Deserialize)]
struct AuthorFeedResponse {
    feed: Vec<FeedViewPost>,
}

#[derive(Debug, Deserialize)]
struct FeedViewPost {
    post: PostView,
    /// Present when the item was surfaced by a repost
    #[serde(default)]
    reason: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PostView {
    uri: String,
    indexed_at: DateTime<Utc>,
}

/// HTTP client against a PDS/AppView XRPC endpoint.
pub struct AppViewClient {
    http: Client,
    service_url: String,
    access_jwt: Option<String>,
}

impl AppViewClient {
    /// Build the client and log in once when credentials are configured.
    /// Without credentials the client runs unauthenticated, which is enough
    /// for a public AppView.
    pub async fn connect(config: &AppViewConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| AppError::Internal(format!("failed to build http client: {}", e)))?;

        let access_jwt = match (&config.identifier, &config.app_password) {
            (Some(identifier), Some(password)) => {
                let session = create_session(&http, &config.service_url, identifier, password)
                    .await?;
                info!("AppView session established for {}", session.did);
                Some(session.access_jwt)
            }
            _ => {
                info!("AppView client running unauthenticated");
                None
            }
        };

        Ok(Self {
            http,
            service_url: config.service_url.trim_end_matches('/').to_string(),
            access_jwt,
        })
    }
}

async fn create_session(
    http: &Client,
    service_url: &str,
    identifier: &str,
    password: &str,
) -> Result<SessionResponse> {
    let url = format!(
        "{}/xrpc/com.atproto.server.createSession",
        service_url.trim_end_matches('/')
    );
    let response = http
        .post(&url)
        .json(&serde_json::json!({
            "identifier": identifier,
            "password": password,
        }))
        .send()
        .await
        .map_err(|e| AppError::Upstream(format!("createSession request failed: {}", e)))?;

    if !response.status().is_success() {
        return Err(AppError::Upstream(format!(
            "createSession returned {}",
            response.status()
        )));
    }

    response
        .json::<SessionResponse>()
        .await
        .map_err(|e| AppError::Upstream(format!("createSession parse failed: {}", e)))
}

#[async_trait]
impl ContentSource for AppViewClient {
    async fn author_feed(
        &self,
        actor: &str,
        limit: u32,
        filter: AuthorFeedFilter,
    ) -> Result<Vec<ContentItem>> {
        let url = format!("{}/xrpc/app.bsky.feed.getAuthorFeed", self.service_url);
        let limit_param = limit.to_string();
        let mut request = self.http.get(&url).query(&[
            ("actor", actor),
            ("limit", limit_param.as_str()),
            ("filter", filter.as_str()),
        ]);
        if let Some(jwt) = &self.access_jwt {
            request = request.bearer_auth(jwt);
        }

        let response = request
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("getAuthorFeed request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::Upstream(format!(
                "getAuthorFeed for {} returned {}",
                actor,
                response.status()
            )));
        }

        let body = response
            .json::<AuthorFeedResponse>()
            .await
            .map_err(|e| AppError::Upstream(format!("getAuthorFeed parse failed: {}", e)))?;

        Ok(body
            .feed
            .into_iter()
            .map(|entry| ContentItem {
                post_uri: entry.post.uri,
                indexed_at: entry.post.indexed_at,
                is_original: entry.reason.is_none(),
            })
            .collect())
    }
}
