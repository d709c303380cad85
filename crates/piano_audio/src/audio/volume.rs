//! Volume checks applied at the queue boundary

use serde::{Deserialize, Serialize};

use super::AudioError;

/// What to do with a play request whose volume is outside [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VolumePolicy {
    /// Fail the enqueue with [`AudioError::InvalidVolume`]
    #[default]
    Reject,
    /// Clamp into range (NaN becomes silence)
    Clamp,
}

impl VolumePolicy {
    /// Apply the policy to a volume
    ///
    /// # Errors
    /// - `InvalidVolume` under [`VolumePolicy::Reject`] when the volume is
    ///   not finite or falls outside [0, 1]
    pub fn apply(self, volume: f32) -> Result<f32, AudioError> {
        if (0.0..=1.0).contains(&volume) {
            return Ok(volume);
        }

        match self {
            Self::Reject => Err(AudioError::InvalidVolume(volume)),
            Self::Clamp if volume.is_nan() => Ok(0.0),
            Self::Clamp => Ok(volume.clamp(0.0, 1.0)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_range_passes_through() {
        assert_eq!(VolumePolicy::Reject.apply(0.0).unwrap(), 0.0);
        assert_eq!(VolumePolicy::Reject.apply(1.0).unwrap(), 1.0);
        assert_eq!(VolumePolicy::Clamp.apply(0.25).unwrap(), 0.25);
    }

    #[test]
    fn test_reject() {
        assert!(matches!(
            VolumePolicy::Reject.apply(1.5),
            Err(AudioError::InvalidVolume(v)) if v == 1.5
        ));
        assert!(VolumePolicy::Reject.apply(-0.1).is_err());
        assert!(VolumePolicy::Reject.apply(f32::NAN).is_err());
        assert!(VolumePolicy::Reject.apply(f32::INFINITY).is_err());
    }

    #[test]
    fn test_clamp() {
        assert_eq!(VolumePolicy::Clamp.apply(2.0).unwrap(), 1.0);
        assert_eq!(VolumePolicy::Clamp.apply(-3.0).unwrap(), 0.0);
        assert_eq!(VolumePolicy::Clamp.apply(f32::NAN).unwrap(), 0.0);
        assert_eq!(VolumePolicy::Clamp.apply(f32::NEG_INFINITY).unwrap(), 0.0);
    }
}
