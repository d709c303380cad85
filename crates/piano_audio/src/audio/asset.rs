//! Encoded samples held by a sound pool
//!
//! Samples are kept in their original container and decoded by the
//! backend on every play.

use std::path::Path;
use std::sync::Arc;

use super::AudioError;

/// Supported sample containers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleFormat {
    /// WAV uncompressed
    Wav,
    /// OGG Vorbis compressed
    Ogg,
    /// MP3 compressed
    Mp3,
    /// FLAC lossless
    Flac,
}

impl SampleFormat {
    /// Detect the container from magic bytes
    pub fn detect(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < 4 {
            return None;
        }

        match &bytes[0..4] {
            b"RIFF" => Some(Self::Wav),
            b"OggS" => Some(Self::Ogg),
            b"fLaC" => Some(Self::Flac),
            // ID3 tag or bare frame sync
            [0xFF, 0xFB | 0xFA | 0xF3 | 0xF2, _, _] | [b'I', b'D', b'3', _] => Some(Self::Mp3),
            _ => None,
        }
    }
}

/// One preloaded sample
#[derive(Debug, Clone)]
pub struct Sample {
    data: Arc<[u8]>,
    format: SampleFormat,
}

impl Sample {
    /// Wrap encoded bytes, rejecting empty or unrecognized data
    ///
    /// # Errors
    /// - `UnsupportedFormat` when the bytes are empty or carry no known magic
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, AudioError> {
        if bytes.is_empty() {
            return Err(AudioError::UnsupportedFormat("empty sample".to_string()));
        }

        let format = SampleFormat::detect(bytes)
            .ok_or_else(|| AudioError::UnsupportedFormat("unknown container".to_string()))?;

        Ok(Self {
            data: Arc::from(bytes),
            format,
        })
    }

    /// Read and wrap a sample file
    ///
    /// # Errors
    /// - `Io` if the file cannot be read
    /// - `UnsupportedFormat` as for [`Sample::from_bytes`]
    pub fn from_file(path: &Path) -> Result<Self, AudioError> {
        let bytes = std::fs::read(path)?;
        Self::from_bytes(&bytes)
    }

    /// Encoded bytes
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Shared handle to the encoded bytes
    pub fn shared_data(&self) -> Arc<[u8]> {
        Arc::clone(&self.data)
    }

    /// Detected container
    pub const fn format(&self) -> SampleFormat {
        self.format
    }
}
