//! Configuration type definitions
//!
//! These types hold the device tunables. They are stored in flash as
//! postcard-serialized binary data under a version header.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Current configuration format version
pub const CONFIG_VERSION: u8 = 1;

/// Maximum serialized size of [`DeviceConfig`]
pub const MAX_CONFIG_SIZE: usize = 64;

/// Configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Serialization failed (buffer too small)
    Serialize,
    /// Deserialization failed
    Deserialize,
    /// Stored data has a different format version
    VersionMismatch { found: u8 },
    /// A field is out of its valid range
    Invalid(&'static str),
}

/// Fader sampling tunables
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FaderConfig {
    /// Minimum time between samples
    pub read_interval_ms: u32,
    /// Quantized change required before a new position is reported
    pub deadband: u8,
    /// Full-scale converter reading
    pub adc_max: u16,
    /// Throw away one conversion before the real one
    pub discard_first_read: bool,
    /// Settling delay after the discarded conversion
    pub settle_us: u32,
    /// Smoothing weight of the previous value, in quarters (0-3)
    ///
    /// `filtered = (prev * w + raw * (4 - w)) / 4`; 0 disables smoothing.
    pub history_weight: u8,
}

impl Default for FaderConfig {
    fn default() -> Self {
        Self {
            read_interval_ms: 20,
            deadband: 2,
            adc_max: 1023,
            discard_first_read: true,
            settle_us: 100,
            history_weight: 3,
        }
    }
}

/// Rotary encoder tunables
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EncoderConfig {
    /// Button level must be stable for longer than this to register
    pub debounce_ms: u32,
    /// Button pulls the line low when pressed
    pub button_active_low: bool,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 50,
            button_active_low: true,
        }
    }
}

/// What to do with a message that stops arriving halfway
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum IdleReset {
    /// Wait indefinitely for the remaining bytes
    #[default]
    Disabled,
    /// Drop the partial message after this long without a byte
    After { ms: u32 },
}

/// Host link tunables
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LinkConfig {
    /// Interval between unsolicited announcements until the host acknowledges
    pub beacon_interval_ms: u32,
    /// Partial message policy
    pub idle_reset: IdleReset,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            beacon_interval_ms: 500,
            idle_reset: IdleReset::Disabled,
        }
    }
}

/// Complete device tunables
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DeviceConfig {
    /// Format version, must equal [`CONFIG_VERSION`]
    pub version: u8,
    pub fader: FaderConfig,
    pub encoder: EncoderConfig,
    pub link: LinkConfig,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            fader: FaderConfig::default(),
            encoder: EncoderConfig::default(),
            link: LinkConfig::default(),
        }
    }
}

impl DeviceConfig {
    /// Check every field against its valid range
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.version != CONFIG_VERSION {
            return Err(ConfigError::VersionMismatch {
                found: self.version,
            });
        }
        if self.fader.adc_max == 0 {
            return Err(ConfigError::Invalid("fader.adc_max"));
        }
        if self.fader.history_weight > 3 {
            return Err(ConfigError::Invalid("fader.history_weight"));
        }
        if self.fader.settle_us > 10_000 {
            return Err(ConfigError::Invalid("fader.settle_us"));
        }
        if self.link.beacon_interval_ms == 0 {
            return Err(ConfigError::Invalid("link.beacon_interval_ms"));
        }
        if self.link.idle_reset == (IdleReset::After { ms: 0 }) {
            return Err(ConfigError::Invalid("link.idle_reset"));
        }
        Ok(())
    }

    /// Serialize into `buffer`, returning the used prefix
    #[cfg(feature = "serde")]
    pub fn to_bytes<'a>(&self, buffer: &'a mut [u8]) -> Result<&'a mut [u8], ConfigError> {
        postcard::to_slice(self, buffer).map_err(|_| ConfigError::Serialize)
    }

    /// Deserialize and validate
    #[cfg(feature = "serde")]
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ConfigError> {
        let config: DeviceConfig =
            postcard::from_bytes(bytes).map_err(|_| ConfigError::Deserialize)?;
        config.validate()?;
        Ok(config)
    }
}
