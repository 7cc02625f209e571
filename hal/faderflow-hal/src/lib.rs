//! FaderFlow Hardware Abstraction Layer
//!
//! This crate defines the hardware seams the controller logic is written
//! against. Chip-specific crates implement them; host tests implement them
//! with in-memory mocks.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  faderflow-core / faderflow-firmware    │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  faderflow-hal (this crate - traits)    │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//!             ┌───────────────┐
//!             │ faderflow-hal-│
//!             │    rp2040     │
//!             └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::InputPin`] - Digital input (encoder CLK/DT/SW lines)
//! - [`adc::AnalogInput`] - Single-shot analog reads (fader wipers)
//! - [`flash::FlashStorage`] - Persistent key/value storage
//!
//! [`uart::SerialConfig`] describes the host link line settings.

#![no_std]
#![deny(unsafe_code)]

pub mod adc;
pub mod flash;
pub mod gpio;
pub mod uart;

// Re-export key traits at crate root for convenience
pub use adc::{AdcError, AnalogInput};
pub use flash::{FlashError, FlashStorage, StorageKey};
pub use gpio::InputPin;
pub use uart::SerialConfig;
