//! Configuration loading
//!
//! Tunables are read from flash when present. Otherwise the board
//! defaults below apply.

pub mod loader;

pub use loader::ConfigPersistence;

use faderflow_core::config::{DeviceConfig, FaderConfig, IdleReset, LinkConfig};
use faderflow_hal_rp2040::adc::ADC_MAX;

/// Stall window for a half-received host message
const BOARD_IDLE_RESET_MS: u32 = 500;

/// Defaults for this board
///
/// Differs from the core defaults in the 12-bit converter range and in
/// dropping stalled host messages.
pub fn board_defaults() -> DeviceConfig {
    DeviceConfig {
        fader: FaderConfig {
            adc_max: ADC_MAX,
            ..Default::default()
        },
        link: LinkConfig {
            idle_reset: IdleReset::After {
                ms: BOARD_IDLE_RESET_MS,
            },
            ..Default::default()
        },
        ..Default::default()
    }
}
