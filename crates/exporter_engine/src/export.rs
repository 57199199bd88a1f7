use std::path::{Path, PathBuf};

use exporter_core::{ExportSettings, Notifier, RawMessageRecord};
use exporter_logging::exporter_info;
use serde_json::json;

use crate::format::text_line;
use crate::persist::{AtomicFileWriter, PersistError};
use crate::{export_filename, render, ExportFormat, FormatError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    pub format: ExportFormat,
    pub message_count: usize,
    pub output_path: PathBuf,
    /// Attachment name map, written only for markdown exports with attachments.
    pub manifest_path: Option<PathBuf>,
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("format error: {0}")]
    Format(#[from] FormatError),
    #[error("persist error: {0}")]
    Persist(#[from] PersistError),
}

/// Renders `messages` and writes them into `output_dir`, reporting as it goes.
pub fn export_messages(
    messages: &[RawMessageRecord],
    format: ExportFormat,
    output_dir: &Path,
    settings: &ExportSettings,
    notifier: &dyn Notifier,
) -> Result<ExportSummary, ExportError> {
    let total = messages.len();
    let log_interval = settings.log_interval.max(1);
    notifier.notify_log(&format!("export invoked, format={format}, {total} messages"));

    for (idx, message) in messages.iter().enumerate() {
        if idx % log_interval == 0 {
            notifier.notify_log(&format!("- {}", text_line(message)));
        }
        notifier.notify_status(&format!("Extracting… {}/{}", idx + 1, total));
    }

    let rendered = render(messages, format)?;
    notifier.notify_log(&format!("Finished generating {format} for {total} messages"));

    let writer = AtomicFileWriter::new(output_dir);
    let output_path = writer.write(&export_filename(&settings.basename, format), &rendered.body)?;

    let manifest_path = if rendered.attachments.is_empty() {
        None
    } else {
        let manifest = json!({
            "attachments": rendered.attachments.iter().map(|a| {
                json!({ "url": a.url, "filename": a.filename })
            }).collect::<Vec<_>>()
        });
        let stem = format!("{}.attachments", settings.basename);
        let name = export_filename(&stem, ExportFormat::Json);
        Some(writer.write(&name, &manifest.to_string())?)
    };

    exporter_info!(
        "Exported {} messages as {} to {}",
        total,
        format,
        output_path.display()
    );
    Ok(ExportSummary {
        format,
        message_count: total,
        output_path,
        manifest_path,
    })
}
