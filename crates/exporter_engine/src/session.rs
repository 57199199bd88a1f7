use std::time::Instant as StdInstant;

use exporter_core::{DiscoveryEngine, DiscoveryError, EnginePhase, Locator, StopKind};
use exporter_logging::{exporter_debug, exporter_info};
use tokio::sync::mpsc;
use tokio::time::{self, Instant, MissedTickBehavior};

/// Things that happen to the session between timer ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostEvent {
    /// The host list changed structurally (mutation observer analogue).
    ListMutated,
    StopRequested,
    RestartRequested,
}

pub type HostEventSender = mpsc::UnboundedSender<HostEvent>;

pub fn event_channel() -> (HostEventSender, mpsc::UnboundedReceiver<HostEvent>) {
    mpsc::unbounded_channel()
}

/// Drives one engine over one locator: fixed-interval ticks plus host events.
///
/// Everything runs on the calling task; there is never more than one tick or
/// event being handled at a time.
pub struct DiscoverySession<L: Locator> {
    engine: DiscoveryEngine<L>,
    locator: L,
    events: mpsc::UnboundedReceiver<HostEvent>,
}

impl<L: Locator> DiscoverySession<L> {
    pub fn new(
        engine: DiscoveryEngine<L>,
        locator: L,
        events: mpsc::UnboundedReceiver<HostEvent>,
    ) -> Self {
        Self {
            engine,
            locator,
            events,
        }
    }

    pub fn engine(&self) -> &DiscoveryEngine<L> {
        &self.engine
    }

    pub fn locator(&self) -> &L {
        &self.locator
    }

    /// Runs until the engine stops, returning how it stopped.
    ///
    /// Settings the loop cannot run with are rejected before the engine starts.
    pub async fn run(&mut self) -> Result<StopKind, DiscoveryError> {
        let Self {
            engine,
            locator,
            events,
        } = self;
        engine.settings().validate()?;
        let period = engine.settings().scroll_interval();

        engine.start(locator, now())?;
        let mut ticker = time::interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut events_open = true;

        loop {
            tokio::select! {
                _ = ticker.tick() => engine.tick(locator, now()),
                event = events.recv(), if events_open => match event {
                    Some(HostEvent::ListMutated) => engine.on_list_mutated(locator, now()),
                    Some(HostEvent::StopRequested) => engine.stop(StopKind::Manual),
                    Some(HostEvent::RestartRequested) => {
                        exporter_info!("Restart requested");
                        engine.start(locator, now())?;
                        ticker.reset();
                    }
                    None => {
                        exporter_debug!("Host event channel closed; ticking on");
                        events_open = false;
                    }
                },
            }

            if let EnginePhase::Stopped(kind) = engine.phase() {
                return Ok(kind);
            }
        }
    }
}

fn now() -> StdInstant {
    Instant::now().into_std()
}
