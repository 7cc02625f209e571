//! RP2040-specific HAL for the FaderFlow controller
//!
//! This crate provides RP2040 implementations of the shared
//! `faderflow-hal` traits:
//!
//! - Digital inputs for encoder lines (implements `faderflow_hal::InputPin`)
//! - ADC channels for fader wipers (implements `faderflow_hal::AnalogInput`)
//! - UART line settings for the host link
//! - Flash storage driver (implements `faderflow_hal::FlashStorage`)

#![no_std]

pub mod adc;
pub mod flash;
pub mod gpio;
pub mod uart;

// Re-export shared traits from faderflow-hal for convenience
pub use faderflow_hal::{AnalogInput, FlashStorage as FlashStorageTrait, InputPin, StorageKey};
