use crate::metrics::{MetricsCollector, RequestMetrics};
use redditcast_core::{BroadcastError, ListingError, RedditPost};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info};

const REDDIT_API_BASE: &str = "https://www.reddit.com";

/// Listing sort orders the broadcaster draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Hot,
    Rising,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Hot => "hot",
            SortOrder::Rising => "rising",
        }
    }

    /// Uniform choice between the two orders, for post variety per fetch.
    pub fn choose_random() -> Self {
        if fastrand::bool() {
            SortOrder::Hot
        } else {
            SortOrder::Rising
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedditListing<T> {
    pub data: RedditListingData<T>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedditListingData<T> {
    pub children: Vec<RedditListingChild<T>>,
    pub after: Option<String>,
    #[serde(default)]
    pub before: Option<String>,
    #[serde(default)]
    pub dist: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedditListingChild<T> {
    pub data: T,
}

/// Post fields from the public listing JSON. The anonymous `.json` endpoint
/// omits fields freely, so everything beyond the title defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedditPostData {
    #[serde(default)]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub selftext: String,
    #[serde(default)]
    pub author: String,
    pub subreddit: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub permalink: String,
    #[serde(default)]
    pub created_utc: f64,
    #[serde(default)]
    pub score: i32,
    #[serde(default)]
    pub num_comments: u32,
    #[serde(default)]
    pub over_18: bool,
    #[serde(default)]
    pub stickied: bool,
    #[serde(default)]
    pub post_hint: Option<String>,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub is_self: bool,
}

impl RedditPostData {
    pub fn has_image_hint(&self) -> bool {
        self.post_hint.as_deref() == Some("image")
    }
}

impl From<RedditPostData> for RedditPost {
    fn from(post_data: RedditPostData) -> Self {
        let image_url = if post_data.has_image_hint() {
            Some(post_data.url)
        } else {
            None
        };
        Self {
            subreddit: post_data.subreddit,
            title: post_data.title,
            self_text: post_data.selftext,
            image_url,
        }
    }
}

/// Anonymous client for the public listing API.
#[derive(Debug)]
pub struct ListingClient {
    http_client: Client,
    metrics: Arc<MetricsCollector>,
    base_url: String,
    user_agent: String,
}

impl ListingClient {
    pub fn new(user_agent: String) -> Self {
        Self::with_base_url(user_agent, REDDIT_API_BASE.to_string())
    }

    /// Point the client at a different listing host. Tests use this to hit a
    /// local address instead of the live API.
    pub fn with_base_url(user_agent: String, base_url: String) -> Self {
        let http_client = Client::builder()
            .user_agent(&user_agent)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            http_client,
            metrics: Arc::new(MetricsCollector::new()),
            base_url,
            user_agent,
        }
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Fetch one listing page for `subreddit` in the given sort order.
    pub async fn fetch_page(
        &self,
        subreddit: &str,
        sort: SortOrder,
        limit: u32,
        after: Option<&str>,
    ) -> Result<RedditListing<RedditPostData>, BroadcastError> {
        let endpoint = format!("/r/{}/{}/.json", subreddit, sort.as_str());
        let url = format!("{}{}", self.base_url, endpoint);
        let start_time = Instant::now();

        let limit_str = limit.to_string();
        let mut params = vec![("limit", limit_str.as_str())];
        if let Some(cursor) = after {
            params.push(("after", cursor));
        }

        debug!("Fetching listing page: {} {:?}", endpoint, params);
        let response = match self.http_client.get(&url).query(&params).send().await {
            Ok(response) => response,
            Err(e) => {
                error!("Network error for {}: {}", endpoint, e);
                self.record(&endpoint, None, start_time, false).await;
                return Err(BroadcastError::Network(e));
            }
        };

        let status = response.status();
        if !status.is_success() {
            error!("Listing request failed with status {} for {}", status, endpoint);
            self.record(&endpoint, Some(status.as_u16()), start_time, false)
                .await;
            if status.as_u16() == 404 {
                return Err(ListingError::SubredditNotFound {
                    subreddit: subreddit.to_string(),
                }
                .into());
            }
            return Err(ListingError::RequestFailed {
                status_code: status.as_u16(),
            }
            .into());
        }

        let listing: RedditListing<RedditPostData> = match response.json().await {
            Ok(listing) => listing,
            Err(e) => {
                error!("Failed to parse listing page: {}", e);
                self.record(&endpoint, Some(status.as_u16()), start_time, false)
                    .await;
                return Err(ListingError::InvalidResponse {
                    details: format!("Failed to parse posts for r/{subreddit}"),
                }
                .into());
            }
        };

        self.record(&endpoint, Some(status.as_u16()), start_time, true)
            .await;
        info!(
            "Retrieved {} posts from r/{} ({})",
            listing.data.children.len(),
            subreddit,
            sort.as_str()
        );
        Ok(listing)
    }

    async fn record(
        &self,
        endpoint: &str,
        status_code: Option<u16>,
        start_time: Instant,
        success: bool,
    ) {
        self.metrics
            .record_request(RequestMetrics {
                endpoint: endpoint.to_string(),
                status_code,
                response_time: start_time.elapsed(),
                success,
            })
            .await;
    }

    pub async fn get_metrics(&self) -> crate::metrics::ApiMetrics {
        self.metrics.get_metrics().await
    }
}
