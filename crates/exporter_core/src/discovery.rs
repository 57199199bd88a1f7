//! Scroll-driven discovery of a virtualized message list.
//!
//! The engine is a synchronous state machine. A driver calls [`DiscoveryEngine::tick`]
//! on a fixed interval and [`DiscoveryEngine::on_list_mutated`] whenever the host
//! reports a structural change of the list; both funnel into the same rescan.

use std::rc::Rc;
use std::time::Instant;

use chrono::{DateTime, Local};
use exporter_logging::{exporter_debug, exporter_info, exporter_warn, set_scan_tick};

use crate::cursor::ScrollCursor;
use crate::{InvalidSettings, Locator, MessageId, Notifier, ScrollSettings, SeenSet};

pub const STATUS_NOT_FOUND: &str = "Scroller not found; cannot scroll.";
pub const STATUS_STOPPED_AUTO: &str = "Reached top. Extracting…";
pub const STATUS_STOPPED_MANUAL: &str = "Stopped.";
const STATUS_STARTING: &str = "Scrolling…";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopKind {
    /// The user asked for it.
    Manual,
    /// The engine judged the top of history reached.
    Auto,
}

impl StopKind {
    pub fn is_auto(self) -> bool {
        self == StopKind::Auto
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnginePhase {
    Idle,
    Running,
    Stopped(StopKind),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DiscoveryError {
    #[error("message list not found; cannot scroll")]
    ListNotFound,
    #[error("invalid scroll settings: {0}")]
    InvalidSettings(#[from] InvalidSettings),
}

type MessageListener<I> = Box<dyn FnMut(&MessageId, &I) -> anyhow::Result<()>>;
type StopListener = Box<dyn FnMut(StopKind)>;

pub struct DiscoveryEngine<L: Locator> {
    settings: ScrollSettings,
    notifier: Rc<dyn Notifier>,
    seen: SeenSet,
    cursor: Option<ScrollCursor<L::Node>>,
    phase: EnginePhase,
    tick: u64,
    message_listeners: Vec<MessageListener<L::Item>>,
    stop_listeners: Vec<StopListener>,
}

impl<L: Locator> DiscoveryEngine<L> {
    pub fn new(settings: ScrollSettings, notifier: Rc<dyn Notifier>) -> Self {
        Self {
            settings,
            notifier,
            seen: SeenSet::new(),
            cursor: None,
            phase: EnginePhase::Idle,
            tick: 0,
            message_listeners: Vec::new(),
            stop_listeners: Vec::new(),
        }
    }

    pub fn settings(&self) -> &ScrollSettings {
        &self.settings
    }

    pub fn phase(&self) -> EnginePhase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == EnginePhase::Running
    }

    pub fn stall_count(&self) -> u32 {
        self.cursor.as_ref().map_or(0, ScrollCursor::stall_count)
    }

    pub fn seen_count(&self) -> usize {
        self.seen.len()
    }

    /// Independent copy of the discovery order.
    pub fn seen_order(&self) -> Vec<MessageId> {
        self.seen.order().to_vec()
    }

    /// Called for every newly discovered identity, in registration order.
    pub fn on_message(
        &mut self,
        listener: impl FnMut(&MessageId, &L::Item) -> anyhow::Result<()> + 'static,
    ) {
        self.message_listeners.push(Box::new(listener));
    }

    /// Called once per effective `stop`.
    pub fn on_stop(&mut self, listener: impl FnMut(StopKind) + 'static) {
        self.stop_listeners.push(Box::new(listener));
    }

    /// Begins a fresh run, discarding any previous seen-set and cursor.
    ///
    /// When no list can be located the failure is reported on the status
    /// channel and the engine is left idle.
    pub fn start(&mut self, locator: &mut L, now: Instant) -> Result<(), DiscoveryError> {
        if self.is_running() {
            exporter_info!("Restarting discovery; dropping {} seen ids", self.seen.len());
        }
        self.cursor = None;
        self.seen.clear();
        self.tick = 0;
        set_scan_tick(0);

        let Some(list) = locator.find_list_root() else {
            self.phase = EnginePhase::Idle;
            exporter_warn!("Message list not found");
            self.notifier.notify_status(STATUS_NOT_FOUND);
            return Err(DiscoveryError::ListNotFound);
        };
        let scroller = locator.find_scrollable_ancestor(&list);
        if scroller != list {
            self.notifier
                .notify_log(&format!("using ancestor scroller {scroller:?}"));
        }

        scan::<L>(
            &mut self.seen,
            &mut self.message_listeners,
            self.notifier.as_ref(),
            locator,
        );
        let first = first_visible_id(locator);
        self.cursor = Some(ScrollCursor::new(scroller, now, self.seen.len(), first));
        self.phase = EnginePhase::Running;

        self.notifier.notify_status(STATUS_STARTING);
        emit_status(&self.seen, self.notifier.as_ref(), locator);
        Ok(())
    }

    /// One timer step: move, rescan, judge progress, maybe auto-stop.
    pub fn tick(&mut self, locator: &mut L, now: Instant) {
        if !self.is_running() {
            return;
        }
        let Some(cursor) = self.cursor.as_mut() else {
            return;
        };
        self.tick += 1;
        set_scan_tick(self.tick);

        let scroller = cursor.scroller().clone();
        let metrics = locator.metrics(&scroller);
        let before = metrics.scroll_top;
        locator.set_scroll_top(&scroller, cursor.target_offset(before, metrics.scroll_height));
        let after = locator.metrics(&scroller).scroll_top;
        cursor.record_movement(before, after);
        self.notifier.notify_log(&format!(
            "scroll offset set, before={before} after={after} direction={:?}",
            cursor.direction()
        ));

        scan::<L>(
            &mut self.seen,
            &mut self.message_listeners,
            self.notifier.as_ref(),
            locator,
        );
        let first = first_visible_id(locator);
        if cursor.observe(self.seen.len(), first.as_ref()) {
            cursor.mark_progress(now);
            emit_status(&self.seen, self.notifier.as_ref(), locator);
            self.notifier
                .notify_progress(self.settings.progress_fraction(self.seen.len()));
        } else {
            if cursor.since_change(now) > self.settings.status_refresh() {
                emit_status(&self.seen, self.notifier.as_ref(), locator);
            }
            cursor.record_stall(before, after);
        }

        // A non-zero stall count implies the last write left us parked at offset 0.
        let stalls = cursor.stall_count();
        let auto_stop = stalls >= self.settings.stall_ticks.max(1)
            && cursor.since_change(now) > self.settings.stall_timeout();
        if auto_stop {
            self.notifier
                .notify_log(&format!("auto-stop triggered after {stalls} stalls"));
            self.stop(StopKind::Auto);
        }
    }

    /// Fast path for host-side list mutations between ticks.
    pub fn on_list_mutated(&mut self, locator: &mut L, now: Instant) {
        if !self.is_running() {
            return;
        }
        let Some(cursor) = self.cursor.as_mut() else {
            return;
        };

        scan::<L>(
            &mut self.seen,
            &mut self.message_listeners,
            self.notifier.as_ref(),
            locator,
        );
        if cursor.observe_growth(self.seen.len()) {
            cursor.mark_progress(now);
            emit_status(&self.seen, self.notifier.as_ref(), locator);
            self.notifier
                .notify_progress(self.settings.progress_fraction(self.seen.len()));
        }
        cursor.reset_stalls();

        let scroller = cursor.scroller().clone();
        let before = locator.metrics(&scroller).scroll_top;
        locator.set_scroll_top(&scroller, 0);
        let after = locator.metrics(&scroller).scroll_top;
        self.notifier
            .notify_log(&format!("observer scroll, before={before} after={after}"));
    }

    /// Ends the run. A no-op unless running.
    pub fn stop(&mut self, kind: StopKind) {
        if !self.is_running() {
            return;
        }
        self.phase = EnginePhase::Stopped(kind);
        self.cursor = None;
        exporter_info!("Discovery stopped ({:?}) with {} seen ids", kind, self.seen.len());

        let text = if kind.is_auto() {
            STATUS_STOPPED_AUTO
        } else {
            STATUS_STOPPED_MANUAL
        };
        self.notifier.notify_status(text);
        for listener in &mut self.stop_listeners {
            listener(kind);
        }
    }
}

/// Records every unseen visible identity and fans it out to the listeners.
fn scan<L: Locator>(
    seen: &mut SeenSet,
    listeners: &mut [MessageListener<L::Item>],
    notifier: &dyn Notifier,
    locator: &L,
) -> usize {
    let mut discovered = 0;
    for item in locator.list_visible_items() {
        let Some(id) = locator.extract_identity(&item) else {
            continue;
        };
        if !seen.insert(id.clone()) {
            continue;
        }
        discovered += 1;
        for listener in listeners.iter_mut() {
            if let Err(err) = listener(&id, &item) {
                exporter_warn!("message listener failed for {}: {:#}", id, err);
                notifier.notify_log(&format!("message listener failed for {id}: {err:#}"));
            }
        }
    }
    if discovered > 0 {
        exporter_debug!("scan discovered {} new ids", discovered);
    }
    discovered
}

fn first_visible_id<L: Locator>(locator: &L) -> Option<MessageId> {
    locator
        .list_visible_items()
        .first()
        .and_then(|item| locator.extract_identity(item))
}

fn emit_status<L: Locator>(seen: &SeenSet, notifier: &dyn Notifier, locator: &L) {
    let oldest = locator
        .list_visible_items()
        .first()
        .map(|item| locator.extract_base(item).timestamp)
        .filter(|ts| !ts.is_empty())
        .map(|ts| format_timestamp(&ts))
        .unwrap_or_else(|| "unknown".to_string());
    notifier.notify_status(&format!(
        "Scrolling… {} messages seen (oldest {})",
        seen.len(),
        oldest
    ));
}

fn format_timestamp(raw: &str) -> String {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|_| raw.to_string())
}
