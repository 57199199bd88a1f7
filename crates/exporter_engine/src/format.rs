use std::fmt;
use std::str::FromStr;

use exporter_core::{MessagesDocument, RawMessageRecord};
use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    Text,
    Json,
    Markdown,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Text => "txt",
            ExportFormat::Json => "json",
            ExportFormat::Markdown => "md",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "txt" | "text" => Ok(ExportFormat::Text),
            "json" => Ok(ExportFormat::Json),
            "md" | "markdown" => Ok(ExportFormat::Markdown),
            other => Err(FormatError::UnknownFormat(other.to_string())),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    #[error("unknown export format {0:?} (expected txt, json or md)")]
    UnknownFormat(String),
    #[error("json serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Local name an attachment is referred to by in a markdown export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentRef {
    pub url: String,
    pub filename: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub body: String,
    pub attachments: Vec<AttachmentRef>,
}

pub fn render(messages: &[RawMessageRecord], format: ExportFormat) -> Result<Rendered, FormatError> {
    let rendered = match format {
        ExportFormat::Text => Rendered {
            body: messages.iter().map(text_line).collect::<Vec<_>>().join("\n"),
            attachments: Vec::new(),
        },
        ExportFormat::Json => {
            let document = MessagesDocument {
                messages: messages.to_vec(),
            };
            Rendered {
                body: serde_json::to_string_pretty(&document)?,
                attachments: Vec::new(),
            }
        }
        ExportFormat::Markdown => render_markdown(messages),
    };
    Ok(rendered)
}

/// `[timestamp] username: content`
pub(crate) fn text_line(message: &RawMessageRecord) -> String {
    format!(
        "[{}] {}: {}",
        message.timestamp, message.username, message.content
    )
}

fn render_markdown(messages: &[RawMessageRecord]) -> Rendered {
    let mut body = String::from("# Messages\n");
    let mut attachments = Vec::new();
    for message in messages {
        body.push_str(&format!(
            "- [{}] **{}**: {}\n",
            message.timestamp, message.username, message.content
        ));
        for url in &message.attachments {
            let filename = format!(
                "attachment-{}.{}",
                attachments.len() + 1,
                attachment_extension(url)
            );
            body.push_str(&format!("  [Attachment]({filename})\n"));
            attachments.push(AttachmentRef {
                url: url.clone(),
                filename,
            });
        }
    }
    Rendered { body, attachments }
}

/// Extension of the last path segment, query and fragment ignored.
fn attachment_extension(raw: &str) -> String {
    let path = match Url::parse(raw) {
        Ok(url) => url.path().to_string(),
        Err(_) => raw.split(['?', '#']).next().unwrap_or(raw).to_string(),
    };
    let segment = path.rsplit('/').next().unwrap_or(&path);
    match segment.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => ext.to_ascii_lowercase(),
        _ => "bin".to_string(),
    }
}
