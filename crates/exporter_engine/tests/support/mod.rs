#![allow(dead_code)]

use std::sync::Once;

use exporter_core::{ScrollMetrics, Selectors};
use exporter_engine::{CompiledSelectors, ElementPath, ScrollHost};

pub fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(exporter_logging::initialize_for_tests);
}

pub fn selectors() -> CompiledSelectors {
    CompiledSelectors::compile(&Selectors::default()).unwrap()
}

pub fn message(id: &str, user: &str, timestamp: &str, content: &str) -> String {
    format!(
        r#"<li role="listitem" id="{id}"><div role="article"><h3><span id="message-username-{id}">{user}</span><time datetime="{timestamp}">today</time></h3><div id="message-content-{id}">{content}</div></div></li>"#
    )
}

pub fn frame(items: &[String]) -> String {
    format!(
        r#"<html><head><title>dm</title></head><body><div id="app"><main class="scroller"><ol data-list-id="chat-messages">{}</ol></main></div></body></html>"#,
        items.concat()
    )
}

/// Frames of `per_frame` messages each, newest frame first, ids unique across frames.
pub fn numbered_frames(frames: usize, per_frame: usize) -> Vec<String> {
    (0..frames)
        .map(|f| {
            let items: Vec<String> = (0..per_frame)
                .map(|i| {
                    let n = (frames - f) * 100 + i;
                    message(
                        &format!("chat-messages-{n}"),
                        "alice",
                        "2024-01-01T00:00:00Z",
                        &format!("message {n}"),
                    )
                })
                .collect();
            frame(&items)
        })
        .collect()
}

/// A document that never scrolls.
pub struct StaticHost {
    pub markup: String,
}

impl ScrollHost for StaticHost {
    fn markup(&self) -> &str {
        &self.markup
    }

    fn metrics(&self, _path: &ElementPath) -> ScrollMetrics {
        ScrollMetrics {
            scroll_top: 0,
            scroll_height: 100,
            client_height: 100,
        }
    }

    fn set_scroll_top(&mut self, _path: &ElementPath, _offset: u64) {}
}
