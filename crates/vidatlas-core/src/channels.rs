//! Channel roster loading.
//!
//! The set of aggregated channels is fixed per deployment and read from a
//! YAML file at startup. The roster is validated once on load; the rest of
//! the pipeline can assume names are non-empty and ids are unique.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// One configured external channel whose videos are aggregated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelConfig {
    /// Display name used in logs and summaries.
    pub name: String,
    /// Source-assigned channel identifier.
    pub channel_id: String,
}

#[derive(Debug, Deserialize)]
pub struct ChannelsFile {
    pub channels: Vec<ChannelConfig>,
}

/// Load and validate the channel roster from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_channels(path: &Path) -> Result<ChannelsFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ChannelsFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let channels_file: ChannelsFile =
        serde_yaml::from_str(&content).map_err(ConfigError::ChannelsFileParse)?;

    validate_channels(&channels_file)?;

    Ok(channels_file)
}

fn validate_channels(channels_file: &ChannelsFile) -> Result<(), ConfigError> {
    if channels_file.channels.is_empty() {
        return Err(ConfigError::Validation(
            "channel roster must contain at least one channel".to_string(),
        ));
    }

    let mut seen_ids = HashSet::new();
    for channel in &channels_file.channels {
        if channel.name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "channel name must be non-empty".to_string(),
            ));
        }
        if channel.channel_id.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "channel '{}' has an empty channel_id",
                channel.name
            )));
        }
        if !seen_ids.insert(channel.channel_id.as_str()) {
            return Err(ConfigError::Validation(format!(
                "duplicate channel_id: {}",
                channel.channel_id
            )));
        }
    }

    Ok(())
}
