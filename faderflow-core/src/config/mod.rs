//! Configuration types
//!
//! Board-agnostic tunables stored as postcard binary data. Every field has a
//! compile-time default so a device with empty flash behaves correctly.

pub mod types;

pub use types::*;
