//! Board-agnostic core logic for the FaderFlow volume controller
//!
//! This crate contains all controller logic that does not depend on
//! specific hardware implementations:
//!
//! - Fader sampling, smoothing and deadband filtering
//! - Rotary encoder decoding and button debouncing
//! - Icon bitmap reassembly from the host byte stream
//! - Per-channel state and screen layout
//! - Host link supervision (handshake beacon, stream idle reset)
//! - Persistent device identity
//! - Tunable configuration types
//!
//! Time is passed in as a wrapping millisecond counter (`now_ms`); nothing
//! here reads a clock.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod channel;
pub mod config;
pub mod display;
pub mod identity;
pub mod input;
pub mod link;
