//! Exporter core: scroll-driven discovery state machine and its collaborators.
//!
//! Nothing in this crate performs IO. The host document is reached through the
//! [`Locator`] trait and every timestamp is passed in by the caller.
mod accumulator;
mod config;
mod cursor;
mod discovery;
mod locator;
mod notify;
mod record;
mod seen;

pub use accumulator::MessageAccumulator;
pub use config::{ExportSettings, ExporterConfig, InvalidSettings, ScrollSettings, Selectors};
pub use cursor::{Direction, ScrollCursor};
pub use discovery::{
    DiscoveryEngine, DiscoveryError, EnginePhase, StopKind, STATUS_NOT_FOUND,
    STATUS_STOPPED_AUTO, STATUS_STOPPED_MANUAL,
};
pub use locator::{Locator, ScrollMetrics};
pub use notify::{NotificationChannel, Notifier};
pub use record::{MessageId, MessagesDocument, RawMessageRecord, Sticker};
pub use seen::SeenSet;
