//! Tick task for time-based updates
//!
//! Drives input sampling and link housekeeping.

use defmt::*;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use embassy_time::{Duration, Ticker};

use crate::controller::now_ms;

/// Tick interval in milliseconds
///
/// Encoder lines are polled once per tick, so this bounds the detent rate
/// that can be followed.
pub const TICK_INTERVAL_MS: u32 = 1;

/// Signal to notify the input task of a tick
pub static TICK_SIGNAL: Signal<CriticalSectionRawMutex, u32> = Signal::new();

/// Tick task - sends periodic tick signals with timestamp
#[embassy_executor::task]
pub async fn tick_task() {
    info!("Tick task started");

    let mut ticker = Ticker::every(Duration::from_millis(TICK_INTERVAL_MS as u64));

    loop {
        ticker.next().await;
        TICK_SIGNAL.signal(now_ms());
    }
}
