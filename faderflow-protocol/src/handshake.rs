//! Device identity announcement
//!
//! On request (and, after boot, periodically until acknowledged) the device
//! announces itself with a [`HandshakeResponse`] carrying a fixed magic
//! string, its device type, its persistent identifier and the protocol
//! version.

use crate::messages::HandshakeResponse;

/// Magic string identifying a FaderFlow device
pub const MAGIC: &[u8; 9] = b"FADERFLOW";

/// Width of the magic field on the wire (string plus terminator)
pub const MAGIC_FIELD_LEN: usize = 10;

/// Length of the device identifier in bytes
pub const UUID_LEN: usize = 16;

/// Device type: multi-channel volume controller
pub const DEVICE_TYPE_VOLUME_CONTROLLER: u8 = 0x01;

/// Protocol version implemented by this crate
pub const PROTOCOL_VERSION_MAJOR: u8 = 1;
pub const PROTOCOL_VERSION_MINOR: u8 = 0;

/// Persistent 16-byte device identifier
///
/// Generated once on first boot and never changed afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DeviceIdentity([u8; UUID_LEN]);

impl DeviceIdentity {
    pub const fn new(bytes: [u8; UUID_LEN]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; UUID_LEN] {
        &self.0
    }

    /// Parse from a slice of exactly [`UUID_LEN`] bytes
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        let arr: [u8; UUID_LEN] = bytes.try_into().ok()?;
        Some(Self(arr))
    }
}

/// Build the identity announcement for this device
pub fn build_announcement(identity: &DeviceIdentity) -> HandshakeResponse {
    let mut magic = [0u8; MAGIC_FIELD_LEN];
    magic[..MAGIC.len()].copy_from_slice(MAGIC);

    HandshakeResponse {
        magic,
        device_type: DEVICE_TYPE_VOLUME_CONTROLLER,
        uuid: *identity,
        version_major: PROTOCOL_VERSION_MAJOR,
        version_minor: PROTOCOL_VERSION_MINOR,
    }
}
