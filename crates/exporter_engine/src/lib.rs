//! Exporter engine: HTML-backed host access, session driving, extraction and output.
mod decode;
mod export;
mod extract;
mod filename;
mod format;
mod host;
mod locator;
mod path;
mod persist;
mod replay;
mod selectors;
mod session;

pub use decode::{decode_snapshot, DecodeError, DecodedSnapshot};
pub use export::{export_messages, ExportError, ExportSummary};
pub use extract::{attachment_enricher, sticker_enricher, Enricher, MessageExtractor};
pub use filename::export_filename;
pub use format::{render, AttachmentRef, ExportFormat, FormatError, Rendered};
pub use host::{ItemSnapshot, ScrollHost};
pub use locator::HtmlLocator;
pub use path::ElementPath;
pub use persist::{ensure_output_dir, AtomicFileWriter, PersistError};
pub use replay::{load_frames, ReplayError, ReplayHost};
pub use selectors::{CompiledSelectors, SelectorError};
pub use session::{event_channel, DiscoverySession, HostEvent, HostEventSender};
