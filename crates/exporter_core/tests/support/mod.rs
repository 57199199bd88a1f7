#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::sync::Once;
use std::time::{Duration, Instant};

use exporter_core::{
    DiscoveryEngine, Locator, MessageId, NotificationChannel, RawMessageRecord, ScrollMetrics,
    ScrollSettings,
};

pub const LIST: usize = 0;
pub const CONTAINER: usize = 1;

pub fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(exporter_logging::initialize_for_tests);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FakeItem {
    pub id: Option<String>,
    pub timestamp: String,
}

pub fn items(ids: &[&str]) -> Vec<FakeItem> {
    ids.iter()
        .map(|id| FakeItem {
            id: Some(id.to_string()),
            timestamp: String::new(),
        })
        .collect()
}

/// In-memory host: node 0 is the list, node 1 its overflowing container.
#[derive(Debug)]
pub struct ScriptedLocator {
    pub has_list: bool,
    pub visible: Vec<FakeItem>,
    /// Windows revealed one by one whenever offset 0 is written.
    pub windows: VecDeque<Vec<FakeItem>>,
    pub offset: u64,
    pub scroll_height: u64,
    pub client_height: u64,
    /// Offset writes are ignored (wedged loader).
    pub sticky: bool,
    pub writes: Vec<u64>,
}

impl ScriptedLocator {
    pub fn at_top(visible: Vec<FakeItem>) -> Self {
        Self {
            has_list: true,
            visible,
            windows: VecDeque::new(),
            offset: 0,
            scroll_height: 1000,
            client_height: 200,
            sticky: false,
            writes: Vec::new(),
        }
    }

    pub fn sliding(windows: Vec<Vec<FakeItem>>) -> Self {
        Self {
            windows: windows.into(),
            ..Self::at_top(Vec::new())
        }
    }
}

impl Locator for ScriptedLocator {
    type Node = usize;
    type Item = FakeItem;

    fn find_list_root(&self) -> Option<usize> {
        self.has_list.then_some(LIST)
    }

    fn parent(&self, node: &usize) -> Option<usize> {
        (*node == LIST).then_some(CONTAINER)
    }

    fn metrics(&self, node: &usize) -> ScrollMetrics {
        if *node == CONTAINER {
            ScrollMetrics {
                scroll_top: self.offset,
                scroll_height: self.scroll_height,
                client_height: self.client_height,
            }
        } else {
            ScrollMetrics {
                scroll_top: 0,
                scroll_height: 100,
                client_height: 100,
            }
        }
    }

    fn set_scroll_top(&mut self, node: &usize, offset: u64) {
        assert_eq!(*node, CONTAINER, "engine must scroll the overflowing ancestor");
        self.writes.push(offset);
        if self.sticky {
            return;
        }
        self.offset = offset.min(self.scroll_height - self.client_height);
        if offset == 0 {
            if let Some(next) = self.windows.pop_front() {
                self.visible = next;
            }
        }
    }

    fn list_visible_items(&self) -> Vec<FakeItem> {
        self.visible.clone()
    }

    fn extract_identity(&self, item: &FakeItem) -> Option<MessageId> {
        item.id.as_deref().map(MessageId::from)
    }

    fn extract_base(&self, item: &FakeItem) -> RawMessageRecord {
        RawMessageRecord {
            id: item.id.clone().unwrap_or_default(),
            timestamp: item.timestamp.clone(),
            ..RawMessageRecord::default()
        }
    }
}

/// Everything the channel emitted, in order.
#[derive(Debug, Default)]
pub struct Recorded {
    pub statuses: Vec<String>,
    pub progress: Vec<f64>,
    pub logs: Vec<String>,
    pub stops: Vec<exporter_core::StopKind>,
}

pub struct Harness {
    pub engine: DiscoveryEngine<ScriptedLocator>,
    pub locator: ScriptedLocator,
    pub recorded: Rc<RefCell<Recorded>>,
    pub t0: Instant,
}

impl Harness {
    pub fn new(locator: ScriptedLocator) -> Self {
        Self::with_settings(locator, ScrollSettings::default())
    }

    pub fn with_settings(locator: ScriptedLocator, settings: ScrollSettings) -> Self {
        init_logging();
        let channel = NotificationChannel::new();
        let recorded = Rc::new(RefCell::new(Recorded::default()));

        let sink = Rc::clone(&recorded);
        channel.on_status(move |text| sink.borrow_mut().statuses.push(text.to_string()));
        let sink = Rc::clone(&recorded);
        channel.on_progress(move |fraction| sink.borrow_mut().progress.push(fraction));
        let sink = Rc::clone(&recorded);
        channel.on_log(move |line| sink.borrow_mut().logs.push(line.to_string()));

        let mut engine = DiscoveryEngine::new(settings, channel);
        let sink = Rc::clone(&recorded);
        engine.on_stop(move |kind| sink.borrow_mut().stops.push(kind));

        Self {
            engine,
            locator,
            recorded,
            t0: Instant::now(),
        }
    }

    pub fn at(&self, millis: u64) -> Instant {
        self.t0 + Duration::from_millis(millis)
    }

    pub fn start(&mut self) {
        let now = self.t0;
        self.engine
            .start(&mut self.locator, now)
            .expect("list should be found");
    }

    pub fn tick_at(&mut self, millis: u64) {
        let now = self.at(millis);
        self.engine.tick(&mut self.locator, now);
    }

    pub fn mutate_at(&mut self, millis: u64) {
        let now = self.at(millis);
        self.engine.on_list_mutated(&mut self.locator, now);
    }

    pub fn stop_count(&self) -> usize {
        self.recorded.borrow().stops.len()
    }
}
