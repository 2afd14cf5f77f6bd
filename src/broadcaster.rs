use crate::host::{ChatHost, OnlineStatus, SendIndicator, SettingsStore};
use crate::settings::{SettingField, SettingsBinding};
use caption_client::CaptionClient;
use chrono::Utc;
use reddit_client::ListingClient;
use redditcast_core::{BroadcastError, ChatMessage, ErrorExt, RedditPost};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Host drives `poll_tick` at this cadence.
pub const POLL_INTERVAL: Duration = Duration::from_millis(1000);

/// Floor under the configured auto-interval; auto-posting never fires more
/// often than this.
pub const MINIMUM_AUTO_INTERVAL: Duration = Duration::from_millis(5000);

const SEND_WAIT_DELAY: Duration = Duration::from_secs(1);
const SEND_WAIT_ATTEMPTS: u32 = 5;

/// Auto-post fires once the configured interval is on and the elapsed time
/// strictly exceeds both the interval and the minimum floor.
pub fn should_auto_fire(auto_interval_secs: u64, elapsed: Duration) -> bool {
    auto_interval_secs > 0
        && elapsed > Duration::from_secs(auto_interval_secs).max(MINIMUM_AUTO_INTERVAL)
}

/// Message text for a text post; `None` means the post has nothing usable
/// and the broadcast aborts silently.
pub fn compose_text(post: &RedditPost) -> Option<String> {
    if !post.title.is_empty() && !post.self_text.is_empty() {
        Some(format!(
            "How about the post in {} titled {}, they say {}",
            post.subreddit, post.title, post.self_text
        ))
    } else if !post.title.is_empty() {
        Some(format!(
            "How about the post in {} titled {}",
            post.subreddit, post.title
        ))
    } else {
        None
    }
}

/// Message text for a captioned image post.
pub fn compose_caption_text(subreddit: &str, title: &str, caption: &str) -> String {
    format!("How about the post in {subreddit} titled {title}, a picture that contains {caption}?")
}

/// Fetches a post on a timer or on demand, captions image posts, and injects
/// the synthesized message into the host conversation.
pub struct PostBroadcaster<H, S, I>
where
    H: ChatHost,
    S: SettingsStore,
    I: SendIndicator,
{
    host: H,
    indicator: I,
    settings: SettingsBinding<S>,
    listing: ListingClient,
    caption: CaptionClient,
    last_auto_at: Instant,
    in_flight: bool,
    send_wait_delay: Duration,
    send_wait_attempts: u32,
}

impl<H, S, I> PostBroadcaster<H, S, I>
where
    H: ChatHost,
    S: SettingsStore,
    I: SendIndicator,
{
    pub fn new(
        host: H,
        indicator: I,
        store: S,
        listing: ListingClient,
        caption: CaptionClient,
        now: Instant,
    ) -> Self {
        Self {
            host,
            indicator,
            settings: SettingsBinding::load(store),
            listing,
            caption,
            last_auto_at: now,
            in_flight: false,
            send_wait_delay: SEND_WAIT_DELAY,
            send_wait_attempts: SEND_WAIT_ATTEMPTS,
        }
    }

    /// Shorten the send-in-progress wait. Tests use this to avoid real
    /// one-second sleeps.
    pub fn with_send_wait(mut self, delay: Duration, attempts: u32) -> Self {
        self.send_wait_delay = delay;
        self.send_wait_attempts = attempts;
        self
    }

    pub fn settings(&self) -> &redditcast_core::BroadcasterSettings {
        self.settings.current()
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    pub fn last_auto_at(&self) -> Instant {
        self.last_auto_at
    }

    /// One UI edit from the settings drawer.
    pub fn on_setting_changed(&mut self, field: SettingField, raw: &str, now: Instant) {
        self.settings.apply(field, raw, now);
        if field == SettingField::AutoInterval {
            // An interval edit pushes the next auto fire out past the floor
            self.last_auto_at = now + MINIMUM_AUTO_INTERVAL;
        }
    }

    /// Fixed-cadence tick: keeps the affordance in sync with connectivity,
    /// flushes the debounced settings save, and fires an auto broadcast when
    /// due.
    pub async fn poll_tick(&mut self, now: Instant) {
        self.indicator
            .set_visible(self.host.online_status() != OnlineStatus::NoConnection);
        self.settings.flush_if_due(now);

        let interval = self.settings.current().auto_interval_secs;
        // last_auto_at sits in the future right after an interval edit
        let elapsed = match now.checked_duration_since(self.last_auto_at) {
            Some(elapsed) => elapsed,
            None => return,
        };
        if should_auto_fire(interval, elapsed) {
            self.broadcast(now).await;
        }
    }

    /// Fetch, compose, and inject one message. Called by the poll tick and by
    /// the host's send-button click; the in-flight flag makes the two
    /// mutually exclusive. Failures are logged and swallowed.
    pub async fn broadcast(&mut self, now: Instant) {
        if self.in_flight {
            debug!("Broadcast already in flight, skipping");
            return;
        }

        // Bounded wait for the host's send window instead of rescheduling
        // forever
        let mut waited = 0;
        while self.host.is_send_in_progress() {
            if waited >= self.send_wait_attempts {
                warn!("Host still sending after {} waits, skipping broadcast", waited);
                return;
            }
            tokio::time::sleep(self.send_wait_delay).await;
            waited += 1;
        }

        self.in_flight = true;
        self.indicator.set_busy(true);
        // Stamp before the first fetch so the tick cannot double-fire; the
        // stamp includes the time slept waiting on the send window
        self.last_auto_at = now + self.send_wait_delay * waited;

        if let Err(err) = self.broadcast_inner().await {
            err.log_error();
        }

        self.indicator.set_busy(false);
        self.in_flight = false;
    }

    async fn broadcast_inner(&mut self) -> Result<(), BroadcastError> {
        let settings = self.settings.current().clone();
        let post = match self
            .listing
            .select_post(
                &settings.subreddit,
                settings.fetch_count,
                settings.max_text_length,
            )
            .await?
        {
            Some(post) => post,
            None => {
                debug!("No suitable post in r/{}", settings.subreddit);
                return Ok(());
            }
        };

        if let Some(image_url) = post.image_url.clone() {
            return self
                .caption_and_send(&image_url, &post.subreddit, &post.title, &settings.display_name)
                .await;
        }

        let text = match compose_text(&post) {
            Some(text) => text,
            None => {
                debug!("Post has neither title nor text, dropping");
                return Ok(());
            }
        };
        let message = ChatMessage::new(settings.display_name, text, Utc::now());
        self.deliver(message).await
    }

    /// Image branch: download, caption, attach, deliver. A failed download
    /// aborts without a message; caption failures bubble to the broadcast
    /// wrapper's logging.
    async fn caption_and_send(
        &self,
        image_url: &str,
        subreddit: &str,
        title: &str,
        display_name: &str,
    ) -> Result<(), BroadcastError> {
        let bytes = match self.caption.download_image(image_url).await {
            Ok(bytes) => bytes,
            Err(err) => {
                err.log_warn();
                return Ok(());
            }
        };

        let captioned = self.caption.caption_image(&bytes).await?;
        let text = compose_caption_text(subreddit, title, &captioned.caption);
        let message = ChatMessage::new(display_name.to_string(), text, Utc::now())
            .with_image(captioned.image, captioned.caption);
        self.deliver(message).await
    }

    async fn deliver(&self, message: ChatMessage) -> Result<(), BroadcastError> {
        self.host.push_message(message.clone());
        self.host.render_message(&message);
        self.host.generate().await
    }
}
