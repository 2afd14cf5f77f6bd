pub mod broadcaster;
pub mod host;
pub mod settings;

pub use broadcaster::{
    compose_caption_text, compose_text, should_auto_fire, PostBroadcaster, MINIMUM_AUTO_INTERVAL,
    POLL_INTERVAL,
};
pub use host::{ChatHost, OnlineStatus, SendIndicator, SettingsStore};
pub use redditcast_core::MODULE_NAME;
pub use settings::{SettingField, SettingsBinding, SAVE_DEBOUNCE};
