use async_trait::async_trait;
use redditcast_core::{BroadcastError, BroadcasterSettings, ChatMessage};

/// Host connectivity as reported to the poll tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnlineStatus {
    Online,
    NoConnection,
}

/// The host chat application this extension injects messages into.
#[async_trait]
pub trait ChatHost: Send + Sync {
    /// Append a message to the host's ordered chat log, taking ownership.
    fn push_message(&self, message: ChatMessage);

    /// Ask the host to render an appended message.
    fn render_message(&self, message: &ChatMessage);

    /// Trigger an assistant reply to the latest message.
    async fn generate(&self) -> Result<(), BroadcastError>;

    fn online_status(&self) -> OnlineStatus;

    /// True while the host is mid generation-send; broadcasts wait it out.
    fn is_send_in_progress(&self) -> bool;
}

/// Host-provided persistent store for this extension's settings object.
pub trait SettingsStore: Send + Sync {
    fn load(&self) -> Option<BroadcasterSettings>;
    fn save(&self, settings: &BroadcasterSettings);
}

/// The send-button affordance in the host's send bar. Purely visual; it
/// gates nothing.
pub trait SendIndicator: Send + Sync {
    /// Hidden while the host has no connection.
    fn set_visible(&self, visible: bool);

    /// Icon swap while a broadcast is in flight.
    fn set_busy(&self, busy: bool);
}
