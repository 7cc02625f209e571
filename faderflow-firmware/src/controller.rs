//! Shared controller state
//!
//! The channel map and the host link are touched by the serial RX task, the
//! input task and the display task. They live together behind one mutex so
//! link events and local input are applied in order.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::mutex::Mutex;
use embassy_time::Instant;

use faderflow_core::channel::ChannelMap;
use faderflow_core::link::Link;

/// Number of fader/encoder/display channels on the board
pub const CHANNEL_COUNT: usize = 2;

pub struct Controller {
    pub channels: ChannelMap<CHANNEL_COUNT>,
    pub link: Link,
}

pub type SharedController = Mutex<CriticalSectionRawMutex, Controller>;

/// Wrapping millisecond timestamp shared by all tasks
pub fn now_ms() -> u32 {
    Instant::now().as_millis() as u32
}
