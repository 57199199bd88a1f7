use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Timing and threshold knobs for the discovery engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrollSettings {
    /// Fixed tick interval of the scroll loop.
    pub scroll_interval_ms: u64,
    /// Minimum wall-clock time without progress before an auto-stop.
    pub scroll_stall_timeout_ms: u64,
    /// Consecutive at-top stalled ticks required before an auto-stop.
    pub stall_ticks: u32,
    /// Status is re-emitted when nothing changed for this long.
    pub status_refresh_ms: u64,
    /// Seen count that maps to a progress fraction of 1.0.
    pub progress_scale: usize,
}

impl Default for ScrollSettings {
    fn default() -> Self {
        Self {
            scroll_interval_ms: 900,
            scroll_stall_timeout_ms: 8000,
            stall_ticks: 3,
            status_refresh_ms: 10_000,
            progress_scale: 10_000,
        }
    }
}

impl ScrollSettings {
    pub fn scroll_interval(&self) -> Duration {
        Duration::from_millis(self.scroll_interval_ms)
    }

    pub fn stall_timeout(&self) -> Duration {
        Duration::from_millis(self.scroll_stall_timeout_ms)
    }

    pub fn status_refresh(&self) -> Duration {
        Duration::from_millis(self.status_refresh_ms)
    }

    /// Rejects values the scroll loop cannot run with.
    pub fn validate(&self) -> Result<(), InvalidSettings> {
        if self.scroll_interval_ms == 0 {
            return Err(InvalidSettings::ZeroInterval);
        }
        if self.stall_ticks == 0 {
            return Err(InvalidSettings::ZeroStallTicks);
        }
        Ok(())
    }

    /// Fraction of the progress scale covered by `seen` messages, capped at 1.
    pub fn progress_fraction(&self, seen: usize) -> f64 {
        let scale = self.progress_scale.max(1) as f64;
        (seen as f64 / scale).min(1.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum InvalidSettings {
    #[error("scroll_interval_ms must be greater than 0")]
    ZeroInterval,
    #[error("stall_ticks must be at least 1")]
    ZeroStallTicks,
}

/// Structural queries used to find the message list and pick items apart.
///
/// These are opaque to the core; only a concrete locator interprets them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Selectors {
    pub message_list: String,
    pub message_item: String,
    pub message_wrapper: String,
    pub identity_attribute: String,
    pub timestamp: String,
    pub timestamp_attribute: String,
    pub username: String,
    pub content: String,
    pub attachment_link: String,
    pub sticker: String,
}

impl Default for Selectors {
    fn default() -> Self {
        Self {
            message_list: r#"[data-list-id="chat-messages"]"#.to_string(),
            message_item: r#"li[role="listitem"], li.messageListItem__5126c"#.to_string(),
            message_wrapper: r#"[role="article"]"#.to_string(),
            identity_attribute: "id".to_string(),
            timestamp: "time[datetime]".to_string(),
            timestamp_attribute: "datetime".to_string(),
            username: r#"[id^="message-username"]"#.to_string(),
            content: r#"[id^="message-content"]"#.to_string(),
            attachment_link: r#"a[href*="cdn.discordapp.com"]"#.to_string(),
            sticker: r#"[data-type="sticker"]"#.to_string(),
        }
    }
}

/// Output-side knobs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    /// Every n-th rendered message is echoed as a log event.
    pub log_interval: usize,
    /// File stem of the written exports.
    pub basename: String,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            log_interval: 50,
            basename: "messages".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExporterConfig {
    pub scroll: ScrollSettings,
    pub selectors: Selectors,
    pub export: ExportSettings,
}
