//! Replays captured frames of a virtualized list as if it were a live host.
//!
//! Frame 0 is the newest window (what the page showed when captured at the
//! bottom); each later frame reveals older history. Writing offset 0 while
//! older frames remain loads the next one, the way an infinite-scroll loader
//! prepends history and pushes the viewport down.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use exporter_core::ScrollMetrics;
use exporter_logging::{exporter_debug, exporter_info};
use scraper::{Html, Selector};

use crate::{decode_snapshot, DecodeError, ElementPath, HostEvent, HostEventSender, ScrollHost};

const VIEWPORT_HEIGHT: u64 = 800;
const CONTENT_HEIGHT: u64 = VIEWPORT_HEIGHT * 4;

#[derive(Debug, thiserror::Error)]
pub enum ReplayError {
    #[error("no frames to replay in {0}")]
    NoFrames(String),
    #[error("message list not present in the first frame")]
    ListMissing,
    #[error("frame {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: DecodeError,
    },
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

#[derive(Debug)]
pub struct ReplayHost {
    frames: Vec<String>,
    current: usize,
    container: ElementPath,
    scroll_top: u64,
    events: Option<HostEventSender>,
}

impl ReplayHost {
    /// The list root's parent becomes the scrolling container.
    pub fn new(frames: Vec<String>, list: &Selector) -> Result<Self, ReplayError> {
        let first = frames
            .first()
            .ok_or_else(|| ReplayError::NoFrames("memory".to_string()))?;
        let document = Html::parse_document(first);
        let list_path = document
            .select(list)
            .next()
            .map(ElementPath::of)
            .ok_or(ReplayError::ListMissing)?;
        let container = list_path.parent().unwrap_or(list_path);

        Ok(Self {
            frames,
            current: 0,
            container,
            scroll_top: CONTENT_HEIGHT - VIEWPORT_HEIGHT,
            events: None,
        })
    }

    /// Frame loads are reported on `events` as [`HostEvent::ListMutated`].
    pub fn with_events(mut self, events: HostEventSender) -> Self {
        self.events = Some(events);
        self
    }

    pub fn container(&self) -> &ElementPath {
        &self.container
    }

    pub fn current_frame(&self) -> usize {
        self.current
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    fn load_older(&mut self) {
        self.current += 1;
        // Prepended history pushes the viewport down by one screen.
        self.scroll_top = VIEWPORT_HEIGHT;
        exporter_debug!("replay loaded frame {}/{}", self.current + 1, self.frames.len());
        if let Some(events) = &self.events {
            // A gone receiver just means nobody is observing any more.
            let _ = events.send(HostEvent::ListMutated);
        }
    }
}

impl ScrollHost for ReplayHost {
    fn markup(&self) -> &str {
        &self.frames[self.current]
    }

    fn metrics(&self, path: &ElementPath) -> ScrollMetrics {
        if *path == self.container {
            ScrollMetrics {
                scroll_top: self.scroll_top,
                scroll_height: CONTENT_HEIGHT,
                client_height: VIEWPORT_HEIGHT,
            }
        } else {
            ScrollMetrics {
                scroll_top: 0,
                scroll_height: VIEWPORT_HEIGHT,
                client_height: VIEWPORT_HEIGHT,
            }
        }
    }

    fn set_scroll_top(&mut self, path: &ElementPath, offset: u64) {
        if *path != self.container {
            return;
        }
        let clamped = offset.min(CONTENT_HEIGHT - VIEWPORT_HEIGHT);
        if clamped == 0 && self.current + 1 < self.frames.len() {
            self.load_older();
        } else {
            self.scroll_top = clamped;
        }
    }
}

/// Reads every `*.html` file of `dir`, sorted by file name.
pub fn load_frames(dir: &Path) -> Result<Vec<String>, ReplayError> {
    let mut paths: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .filter(|path| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case("html"))
        })
        .collect();
    paths.sort();

    if paths.is_empty() {
        return Err(ReplayError::NoFrames(dir.display().to_string()));
    }

    let mut frames = Vec::with_capacity(paths.len());
    for path in paths {
        let bytes = fs::read(&path)?;
        let decoded = decode_snapshot(&bytes).map_err(|source| ReplayError::Decode {
            path: path.clone(),
            source,
        })?;
        frames.push(decoded.html);
    }
    exporter_info!("Loaded {} frames from {}", frames.len(), dir.display());
    Ok(frames)
}
