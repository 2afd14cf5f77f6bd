use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Settings key under which the host stores this extension's flat settings
/// object.
pub const MODULE_NAME: &str = "reddit";

/// Avatar asset shown next to every synthesized message.
pub const BROADCAST_AVATAR: &str = "img/reddit.png";

/// Flat settings object owned by the host-provided settings store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BroadcasterSettings {
    /// Name the synthesized chat messages are attributed to.
    pub display_name: String,
    /// Subreddit the listing API is queried for.
    pub subreddit: String,
    /// Minimum seconds between automatic broadcasts; 0 disables auto-posting.
    pub auto_interval_secs: u64,
    /// Listing page size requested per fetch.
    pub fetch_count: u32,
    /// Longest self-text a candidate post may carry.
    pub max_text_length: usize,
}

impl Default for BroadcasterSettings {
    fn default() -> Self {
        Self {
            display_name: "You".to_string(),
            subreddit: "all".to_string(),
            auto_interval_secs: 0,
            fetch_count: 200,
            max_text_length: 256,
        }
    }
}

/// A candidate post, ephemeral between selection and message composition.
#[derive(Debug, Clone)]
pub struct RedditPost {
    pub subreddit: String,
    pub title: String,
    pub self_text: String,
    /// Set only for posts the listing marks with an image hint.
    pub image_url: Option<String>,
}

impl RedditPost {
    pub fn is_image(&self) -> bool {
        self.image_url.is_some()
    }
}

/// Side-channel metadata carried by captioned image messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageExtra {
    /// Data URI of the image shown alongside the message.
    pub image: String,
    pub caption: String,
}

/// A synthesized chat message; ownership moves to the host chat log on
/// delivery.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub sender_name: String,
    pub avatar: String,
    pub is_user: bool,
    /// Epoch milliseconds.
    pub send_date: i64,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra: Option<MessageExtra>,
}

impl ChatMessage {
    pub fn new(sender_name: String, text: String, sent_at: DateTime<Utc>) -> Self {
        Self {
            sender_name,
            avatar: BROADCAST_AVATAR.to_string(),
            is_user: false,
            send_date: sent_at.timestamp_millis(),
            text,
            extra: None,
        }
    }

    pub fn with_image(mut self, image: String, caption: String) -> Self {
        self.extra = Some(MessageExtra { image, caption });
        self
    }
}
