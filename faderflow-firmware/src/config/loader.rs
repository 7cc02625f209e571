//! Configuration persistence
//!
//! Loads device tunables from flash storage.
//! Falls back to board defaults if flash is empty.

use defmt::*;

use faderflow_core::config::{self as core_config, DeviceConfig, MAX_CONFIG_SIZE};
use faderflow_hal_rp2040::flash::{FlashError, FlashStorage, StorageKey};
// Import the FlashStorage trait to bring methods into scope
use faderflow_hal_rp2040::FlashStorageTrait;

/// Configuration persistence errors
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Flash operation failed
    Flash(FlashError),
    /// Stored record is not a valid config
    Config(core_config::ConfigError),
}

impl From<FlashError> for ConfigError {
    fn from(e: FlashError) -> Self {
        ConfigError::Flash(e)
    }
}

impl From<core_config::ConfigError> for ConfigError {
    fn from(e: core_config::ConfigError) -> Self {
        ConfigError::Config(e)
    }
}

/// Configuration persistence manager
pub struct ConfigPersistence<'d> {
    storage: FlashStorage<'d>,
}

impl<'d> ConfigPersistence<'d> {
    pub fn new(storage: FlashStorage<'d>) -> Self {
        Self { storage }
    }

    /// Consume this persistence manager and return the underlying storage
    ///
    /// The identity store reuses it after the config is loaded.
    pub fn into_storage(self) -> FlashStorage<'d> {
        self.storage
    }

    /// Load configuration from flash
    pub async fn load(&mut self) -> Result<DeviceConfig, ConfigError> {
        info!("Loading configuration from flash...");

        let mut buffer = [0u8; MAX_CONFIG_SIZE];
        let len = self
            .storage
            .read(StorageKey::DeviceConfig, &mut buffer)
            .await?;

        debug!("Read {} bytes of config from flash", len);

        let config = DeviceConfig::from_bytes(&buffer[..len])?;
        log_config_summary(&config);
        Ok(config)
    }

    /// Load configuration, falling back to `defaults` on any failure
    pub async fn load_or(&mut self, defaults: DeviceConfig) -> DeviceConfig {
        match self.load().await {
            Ok(config) => config,
            Err(ConfigError::Flash(FlashError::NotFound)) => {
                info!("No configuration in flash, using board defaults");
                defaults
            }
            Err(e) => {
                warn!("Invalid configuration in flash: {:?}, using board defaults", e);
                defaults
            }
        }
    }
}

/// Log a summary of the loaded configuration
fn log_config_summary(config: &DeviceConfig) {
    info!("Configuration loaded successfully");
    debug!(
        "  fader: every {} ms, deadband {}, adc_max {}",
        config.fader.read_interval_ms, config.fader.deadband, config.fader.adc_max
    );
    debug!("  encoder: debounce {} ms", config.encoder.debounce_ms);
    debug!("  link: {:?}", config.link);
}
