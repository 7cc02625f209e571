//! Host link supervision
//!
//! Ties the inbound decoder to the channel map, keeps announcing the
//! device until the host acknowledges it, and drops half-received
//! messages once the stream goes quiet.

mod beacon;
mod idle;
mod supervisor;

pub use beacon::HandshakeBeacon;
pub use idle::IdleTimer;
pub use supervisor::{Link, LinkPoll};

use faderflow_protocol::DecodeError;

/// Host link errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkError {
    /// Inbound byte was rejected by the decoder
    Decode(DecodeError),
    /// Message addressed a channel that does not exist; its payload was
    /// still consumed
    ChannelOutOfRange(u8),
    /// A partial message was dropped after the stream went idle
    StreamTimeout,
}

impl From<DecodeError> for LinkError {
    fn from(e: DecodeError) -> Self {
        LinkError::Decode(e)
    }
}

/// True once `window_ms` has passed since `since_ms`
///
/// A `now_ms` slightly behind `since_ms` (stamped by another task) counts
/// as no time elapsed rather than a full wrap.
fn elapsed_at_least(now_ms: u32, since_ms: u32, window_ms: u32) -> bool {
    let elapsed = now_ms.wrapping_sub(since_ms) as i32;
    elapsed >= 0 && elapsed as u32 >= window_ms
}
