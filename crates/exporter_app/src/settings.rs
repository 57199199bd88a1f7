use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use exporter_core::{ExporterConfig, InvalidSettings};
use exporter_engine::{AtomicFileWriter, PersistError};
use exporter_logging::{exporter_info, exporter_warn};

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },
    #[error("invalid config {}: {source}", path.display())]
    Invalid {
        path: PathBuf,
        #[source]
        source: InvalidSettings,
    },
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] ron::Error),
    #[error("config path {} has no file name", .0.display())]
    NoFileName(PathBuf),
    #[error("failed to write config: {0}")]
    Write(#[from] PersistError),
}

/// Reads a RON config. A missing file yields the defaults; absent fields too.
pub fn load_config(path: &Path) -> Result<ExporterConfig, SettingsError> {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            exporter_warn!("Config {:?} not found, using defaults", path);
            return Ok(ExporterConfig::default());
        }
        Err(source) => {
            return Err(SettingsError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let config: ExporterConfig = ron::from_str(&content).map_err(|source| SettingsError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    config.scroll.validate().map_err(|source| SettingsError::Invalid {
        path: path.to_path_buf(),
        source,
    })?;
    exporter_info!("Loaded config from {:?}", path);
    Ok(config)
}

pub fn save_config(path: &Path, config: &ExporterConfig) -> Result<PathBuf, SettingsError> {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| SettingsError::NoFileName(path.to_path_buf()))?;
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };

    let pretty = ron::ser::PrettyConfig::new();
    let content = ron::ser::to_string_pretty(config, pretty)?;
    let written = AtomicFileWriter::new(dir).write(&file_name, &content)?;
    exporter_info!("Wrote config to {:?}", written);
    Ok(written)
}
