//! Configuration system
//!
//! Settings for the sound worker, the rodio sound pool and sample loading.
//! Files are TOML or RON, chosen by extension.

use std::path::PathBuf;

pub use serde::{Deserialize, Serialize};

use crate::audio::VolumePolicy;
use crate::piano::Note;

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(ConfigError::Io)?;

        // Try different formats
        if path.ends_with(".toml") {
            toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else if path.ends_with(".ron") {
            ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else {
            Err(ConfigError::UnsupportedFormat(path.to_string()))
        }
    }

    /// Save configuration to file
    fn save_to_file(&self, path: &str) -> Result<(), ConfigError> {
        let contents = if path.ends_with(".toml") {
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else if path.ends_with(".ron") {
            ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else {
            return Err(ConfigError::UnsupportedFormat(path.to_string()));
        };

        std::fs::write(path, contents).map_err(ConfigError::Io)
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

/// Sound worker settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkerConfig {
    /// Name given to the worker thread
    pub thread_name: String,
    /// Queue capacity; `None` keeps the queue unbounded
    pub queue_capacity: Option<usize>,
    /// Handling of out-of-range volumes on enqueue
    pub volume_policy: VolumePolicy,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            thread_name: "sound-worker".to_string(),
            queue_capacity: None,
            volume_policy: VolumePolicy::Reject,
        }
    }
}

/// Rodio sound pool settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    /// Maximum number of simultaneously playing streams
    pub max_streams: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self { max_streams: 8 }
    }
}

/// Where piano samples live on disk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SampleConfig {
    /// Directory holding one file per note
    pub directory: PathBuf,
    /// File extension of the sample files
    pub extension: String,
}

impl SampleConfig {
    /// Path of the sample for `note`, e.g. `resources/audio/39.wav`
    pub fn path_for(&self, note: Note) -> PathBuf {
        self.directory
            .join(format!("{}", note.index()))
            .with_extension(&self.extension)
    }

    /// Check if the sample directory exists
    pub fn directory_exists(&self) -> bool {
        self.directory.is_dir()
    }
}

impl Default for SampleConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("resources/audio"),
            extension: "wav".to_string(),
        }
    }
}

/// Top-level audio configuration
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    /// Sound worker settings
    pub worker: WorkerConfig,
    /// Sound pool settings
    pub pool: PoolConfig,
    /// Sample file settings
    pub samples: SampleConfig,
}

impl Config for AudioConfig {}
