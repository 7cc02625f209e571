//! Inter-task communication channels
//!
//! Defines the static channels used for communication between Embassy tasks.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;

use faderflow_protocol::Outbound;

/// Channel capacity for outbound messages
const OUTBOUND_CHANNEL_SIZE: usize = 16;

/// Messages waiting to be written to the host
pub static OUTBOUND: Channel<CriticalSectionRawMutex, Outbound, OUTBOUND_CHANNEL_SIZE> =
    Channel::new();

/// Signal that some channel screen needs repainting
pub static DISPLAY_DIRTY: Signal<CriticalSectionRawMutex, ()> = Signal::new();

/// Queue a message for the host, dropping it if the queue is full
pub fn send_outbound(msg: Outbound) {
    if OUTBOUND.try_send(msg).is_err() {
        defmt::warn!("Outbound queue full, dropping {:?}", msg);
    }
}
