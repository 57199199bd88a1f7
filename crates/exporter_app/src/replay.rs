//! `dm-exporter replay`: run a discovery session over captured frames, then export.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use anyhow::{Context, Result};
use exporter_core::{
    DiscoveryEngine, ExporterConfig, MessageAccumulator, NotificationChannel, Notifier,
    RawMessageRecord, StopKind,
};
use exporter_engine::{
    event_channel, export_messages, load_frames, CompiledSelectors, DiscoverySession, HostEvent,
    HtmlLocator, ItemSnapshot, MessageExtractor, ReplayHost,
};
use exporter_logging::{exporter_debug, exporter_info, exporter_warn};

use crate::settings::load_config;
use crate::ReplayArgs;

pub fn run(args: &ReplayArgs) -> Result<()> {
    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => ExporterConfig::default(),
    };
    let selectors =
        CompiledSelectors::compile(&config.selectors).context("invalid selector in config")?;
    let frames = load_frames(&args.frames_dir)
        .with_context(|| format!("loading frames from {}", args.frames_dir.display()))?;

    let channel = NotificationChannel::new();
    channel.on_status(|text| println!("{text}"));
    channel.on_progress(|fraction| exporter_debug!("progress {:.2}%", fraction * 100.0));

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .context("building runtime")?;
    let (kind, records) = runtime.block_on(discover(args, &config, selectors, frames, &channel))?;
    exporter_info!("Discovery ended ({:?}), {} records", kind, records.len());

    for &format in &args.formats {
        let reporter = ExportReporter::default();
        let summary = export_messages(&records, format, &args.out, &config.export, &reporter)
            .with_context(|| format!("exporting {format}"))?;
        exporter_debug!("{} status updates while exporting {}", reporter.updates(), format);
        println!(
            "Wrote {} messages to {}",
            summary.message_count,
            summary.output_path.display()
        );
        if let Some(manifest) = summary.manifest_path {
            println!("Attachment manifest: {}", manifest.display());
        }
    }
    Ok(())
}

async fn discover(
    args: &ReplayArgs,
    config: &ExporterConfig,
    selectors: CompiledSelectors,
    frames: Vec<String>,
    channel: &Rc<NotificationChannel>,
) -> Result<(StopKind, Vec<RawMessageRecord>)> {
    let (events, rx) = event_channel();
    let host = ReplayHost::new(frames, &selectors.list)
        .context("first frame has no message list")?
        .with_events(events.clone());
    let extractor = MessageExtractor::with_default_enrichers(selectors.clone());
    let locator = HtmlLocator::new(host, selectors);

    let notifier: Rc<dyn Notifier> = channel.clone();
    let mut engine = DiscoveryEngine::new(config.scroll.clone(), notifier);
    let accumulator: MessageAccumulator<ItemSnapshot> = MessageAccumulator::new();
    accumulator.attach(&mut engine);
    accumulator.on_complete(|entries, kind| {
        exporter_info!("Collected {} messages ({:?} stop)", entries.len(), kind);
    });

    if let Some(secs) = args.time_limit {
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(secs)).await;
            // The session may already be over.
            let _ = events.send(HostEvent::StopRequested);
        });
    }

    let mut session = DiscoverySession::new(engine, locator, rx);
    let kind = session.run().await.context("discovery failed")?;

    let records = if accumulator.is_empty() {
        exporter_warn!("Accumulator is empty; extracting the visible window only");
        extractor.extract_live(session.locator())
    } else {
        extractor.extract_accumulated(&accumulator)
    };
    Ok((kind, records))
}

/// Export-time notifier: per-message status goes to the debug log, not the console.
#[derive(Default)]
struct ExportReporter {
    updates: Cell<usize>,
    last_status: RefCell<String>,
}

impl ExportReporter {
    fn updates(&self) -> usize {
        self.updates.get()
    }

    fn last_status(&self) -> String {
        self.last_status.borrow().clone()
    }
}

impl Notifier for ExportReporter {
    fn notify_status(&self, text: &str) {
        self.updates.set(self.updates.get() + 1);
        *self.last_status.borrow_mut() = text.to_string();
        exporter_debug!("{}", text);
    }

    fn notify_progress(&self, _fraction: f64) {}

    fn notify_log(&self, line: &str) {
        exporter_debug!("{}", line);
    }
}
