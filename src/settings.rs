use crate::host::SettingsStore;
use redditcast_core::BroadcasterSettings;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Quiet period after the last edit before the store is written.
pub const SAVE_DEBOUNCE: Duration = Duration::from_millis(500);

/// One UI input field in the extension's settings drawer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingField {
    DisplayName,
    Subreddit,
    AutoInterval,
    FetchCount,
    MaxTextLength,
}

/// Live settings plus the debounced-save bookkeeping. Replaces the host
/// framework's per-field input callbacks with a single typed entry point.
pub struct SettingsBinding<S: SettingsStore> {
    store: S,
    settings: BroadcasterSettings,
    dirty_since: Option<Instant>,
}

impl<S: SettingsStore> SettingsBinding<S> {
    /// Load from the host store, falling back to defaults the first time.
    pub fn load(store: S) -> Self {
        let settings = store.load().unwrap_or_default();
        Self {
            store,
            settings,
            dirty_since: None,
        }
    }

    pub fn current(&self) -> &BroadcasterSettings {
        &self.settings
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty_since.is_some()
    }

    /// Apply one field edit from the UI. Unparseable numeric input keeps the
    /// previous value.
    pub fn apply(&mut self, field: SettingField, raw: &str, now: Instant) {
        match field {
            SettingField::DisplayName => self.settings.display_name = raw.to_string(),
            SettingField::Subreddit => self.settings.subreddit = raw.to_string(),
            SettingField::AutoInterval => match raw.trim().parse() {
                Ok(value) => self.settings.auto_interval_secs = value,
                Err(_) => {
                    warn!("Ignoring invalid auto-interval input: {raw:?}");
                    return;
                }
            },
            SettingField::FetchCount => match raw.trim().parse() {
                Ok(value) if value > 0 => self.settings.fetch_count = value,
                _ => {
                    warn!("Ignoring invalid fetch-count input: {raw:?}");
                    return;
                }
            },
            SettingField::MaxTextLength => match raw.trim().parse() {
                Ok(value) if value > 0 => self.settings.max_text_length = value,
                _ => {
                    warn!("Ignoring invalid max-text-length input: {raw:?}");
                    return;
                }
            },
        }
        self.dirty_since = Some(now);
    }

    /// Write through to the store once the debounce window has passed.
    pub fn flush_if_due(&mut self, now: Instant) {
        if let Some(dirty_since) = self.dirty_since {
            if now.duration_since(dirty_since) >= SAVE_DEBOUNCE {
                debug!("Saving settings to host store");
                self.store.save(&self.settings);
                self.dirty_since = None;
            }
        }
    }
}
