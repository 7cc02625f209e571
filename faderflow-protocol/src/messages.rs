//! Fixed-layout message types
//!
//! Each message type knows its own size and field offsets. Encoding writes
//! every field explicitly; decoding validates the command byte and length.
//!
//! Messages are divided into two categories:
//! - Device → Host: handshake announcement, UUID echo, fader reports
//! - Host → Device: app name, volume and icon updates for a display channel

use heapless::{String, Vec};

use crate::command::{
    CMD_APP_NAME, CMD_ECHO_UUID, CMD_FADER_UPDATE, CMD_HANDSHAKE_RESPONSE, CMD_ICON, CMD_VOLUME,
};
use crate::decoder::DecodeError;
use crate::handshake::{DeviceIdentity, MAGIC, MAGIC_FIELD_LEN, UUID_LEN};

/// Size of a handshake response on the wire
pub const HANDSHAKE_RESPONSE_LEN: usize = 30;

/// Size of an echo UUID reply on the wire
pub const ECHO_UUID_REPLY_LEN: usize = 1 + UUID_LEN;

/// Maximum application name length in bytes
pub const APP_NAME_MAX: usize = 64;

/// Size of an app name update on the wire
pub const APP_NAME_LEN: usize = 2 + APP_NAME_MAX;

/// Size of a volume update on the wire
pub const VOLUME_UPDATE_LEN: usize = 3;

/// Size of the icon update header (command + channel)
pub const ICON_HEADER_LEN: usize = 2;

/// Icon payload: 64 × 64 pixels, two bytes each
pub const ICON_PAYLOAD_LEN: usize = 64 * 64 * 2;

/// Size of a fader update on the wire
pub const FADER_UPDATE_LEN: usize = 3;

/// Largest device → host message
pub const MAX_OUTBOUND_LEN: usize = HANDSHAKE_RESPONSE_LEN;

/// Largest valid volume value
pub const MAX_VOLUME: u8 = 100;

/// Errors that can occur while encoding a message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EncodeError {
    /// Output buffer too small for the message
    BufferTooSmall,
}

fn ensure_capacity(buffer: &[u8], len: usize) -> Result<(), EncodeError> {
    if buffer.len() < len {
        return Err(EncodeError::BufferTooSmall);
    }
    Ok(())
}

fn expect_message(bytes: &[u8], cmd: u8, len: usize) -> Result<(), DecodeError> {
    match bytes.first() {
        None => Err(DecodeError::Truncated),
        Some(&b) if b != cmd => Err(DecodeError::UnexpectedCommand(b)),
        Some(_) if bytes.len() < len => Err(DecodeError::Truncated),
        Some(_) => Ok(()),
    }
}

/// Identity announcement
///
/// ```text
/// offset  size  field
///      0     1  command (0x03)
///      1    10  magic "FADERFLOW\0"
///     11     1  device type
///     12    16  uuid
///     28     1  version major
///     29     1  version minor
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HandshakeResponse {
    pub magic: [u8; MAGIC_FIELD_LEN],
    pub device_type: u8,
    pub uuid: DeviceIdentity,
    pub version_major: u8,
    pub version_minor: u8,
}

impl HandshakeResponse {
    const MAGIC_OFFSET: usize = 1;
    const DEVICE_TYPE_OFFSET: usize = 11;
    const UUID_OFFSET: usize = 12;
    const VERSION_MAJOR_OFFSET: usize = 28;
    const VERSION_MINOR_OFFSET: usize = 29;

    /// Returns true if the magic string matches
    ///
    /// Only the nine magic characters are compared; the trailing byte is the
    /// terminator and is not inspected.
    pub fn is_valid(&self) -> bool {
        &self.magic[..MAGIC.len()] == MAGIC
    }

    /// Encode into a byte buffer, returning the number of bytes written
    pub fn encode(&self, buffer: &mut [u8]) -> Result<usize, EncodeError> {
        ensure_capacity(buffer, HANDSHAKE_RESPONSE_LEN)?;

        buffer[0] = CMD_HANDSHAKE_RESPONSE;
        buffer[Self::MAGIC_OFFSET..Self::DEVICE_TYPE_OFFSET].copy_from_slice(&self.magic);
        buffer[Self::DEVICE_TYPE_OFFSET] = self.device_type;
        buffer[Self::UUID_OFFSET..Self::VERSION_MAJOR_OFFSET].copy_from_slice(self.uuid.as_bytes());
        buffer[Self::VERSION_MAJOR_OFFSET] = self.version_major;
        buffer[Self::VERSION_MINOR_OFFSET] = self.version_minor;

        Ok(HANDSHAKE_RESPONSE_LEN)
    }

    /// Decode from a complete message (host side)
    pub fn decode(bytes: &[u8]) -> Result<Self, DecodeError> {
        expect_message(bytes, CMD_HANDSHAKE_RESPONSE, HANDSHAKE_RESPONSE_LEN)?;

        let mut magic = [0u8; MAGIC_FIELD_LEN];
        magic.copy_from_slice(&bytes[Self::MAGIC_OFFSET..Self::DEVICE_TYPE_OFFSET]);
        let mut uuid = [0u8; UUID_LEN];
        uuid.copy_from_slice(&bytes[Self::UUID_OFFSET..Self::VERSION_MAJOR_OFFSET]);

        let response = Self {
            magic,
            device_type: bytes[Self::DEVICE_TYPE_OFFSET],
            uuid: DeviceIdentity::new(uuid),
            version_major: bytes[Self::VERSION_MAJOR_OFFSET],
            version_minor: bytes[Self::VERSION_MINOR_OFFSET],
        };

        if !response.is_valid() {
            return Err(DecodeError::BadMagic);
        }
        Ok(response)
    }
}

/// Reply to an echo request: `[0x04][uuid;16]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EchoUuidReply {
    pub uuid: DeviceIdentity,
}

impl EchoUuidReply {
    pub fn encode(&self, buffer: &mut [u8]) -> Result<usize, EncodeError> {
        ensure_capacity(buffer, ECHO_UUID_REPLY_LEN)?;
        buffer[0] = CMD_ECHO_UUID;
        buffer[1..ECHO_UUID_REPLY_LEN].copy_from_slice(self.uuid.as_bytes());
        Ok(ECHO_UUID_REPLY_LEN)
    }
}

/// Fader position report: `[0x10][channel][position]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FaderUpdate {
    pub channel: u8,
    /// Quantized position, 0-255
    pub position: u8,
}

impl FaderUpdate {
    pub fn encode(&self, buffer: &mut [u8]) -> Result<usize, EncodeError> {
        ensure_capacity(buffer, FADER_UPDATE_LEN)?;
        buffer[0] = CMD_FADER_UPDATE;
        buffer[1] = self.channel;
        buffer[2] = self.position;
        Ok(FADER_UPDATE_LEN)
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, DecodeError> {
        expect_message(bytes, CMD_FADER_UPDATE, FADER_UPDATE_LEN)?;
        Ok(Self {
            channel: bytes[1],
            position: bytes[2],
        })
    }
}

/// Application name for a channel
///
/// ```text
/// offset  size  field
///      0     1  command (0x05)
///      1     1  channel
///      2    64  name, UTF-8, NUL padded
/// ```
///
/// Names longer than 64 bytes are truncated on encode. On decode the name
/// ends at the first NUL; trailing bytes that are not valid UTF-8 are dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AppName {
    pub channel: u8,
    pub name: String<APP_NAME_MAX>,
}

impl AppName {
    /// Build an update, truncating the name at a character boundary
    pub fn new(channel: u8, name: &str) -> Self {
        let mut end = name.len().min(APP_NAME_MAX);
        while !name.is_char_boundary(end) {
            end -= 1;
        }
        let mut s = String::new();
        // Cannot fail: end <= APP_NAME_MAX
        let _ = s.push_str(&name[..end]);
        Self { channel, name: s }
    }

    pub fn encode(&self, buffer: &mut [u8]) -> Result<usize, EncodeError> {
        ensure_capacity(buffer, APP_NAME_LEN)?;
        buffer[0] = CMD_APP_NAME;
        buffer[1] = self.channel;

        let field = &mut buffer[2..APP_NAME_LEN];
        field.fill(0);
        let bytes = self.name.as_bytes();
        field[..bytes.len()].copy_from_slice(bytes);

        Ok(APP_NAME_LEN)
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, DecodeError> {
        expect_message(bytes, CMD_APP_NAME, APP_NAME_LEN)?;
        Ok(Self::from_payload(&bytes[1..APP_NAME_LEN]))
    }

    /// Build from the 65 bytes following the command byte
    pub(crate) fn from_payload(payload: &[u8]) -> Self {
        let channel = payload[0];
        let field = &payload[1..];
        let end = field.iter().position(|&b| b == 0).unwrap_or(field.len());
        let raw = &field[..end];

        let text = match core::str::from_utf8(raw) {
            Ok(s) => s,
            Err(e) => core::str::from_utf8(&raw[..e.valid_up_to()]).unwrap_or(""),
        };

        Self::new(channel, text)
    }
}

/// Volume for a channel: `[0x06][channel][volume]`
///
/// The volume is carried as sent; receivers clamp it to 0-100.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct VolumeUpdate {
    pub channel: u8,
    pub volume: u8,
}

impl VolumeUpdate {
    pub fn encode(&self, buffer: &mut [u8]) -> Result<usize, EncodeError> {
        ensure_capacity(buffer, VOLUME_UPDATE_LEN)?;
        buffer[0] = CMD_VOLUME;
        buffer[1] = self.channel;
        buffer[2] = self.volume;
        Ok(VOLUME_UPDATE_LEN)
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, DecodeError> {
        expect_message(bytes, CMD_VOLUME, VOLUME_UPDATE_LEN)?;
        Ok(Self {
            channel: bytes[1],
            volume: bytes[2],
        })
    }

    /// Volume clamped to the valid range
    pub fn clamped(&self) -> u8 {
        self.volume.min(MAX_VOLUME)
    }
}

/// Icon update header: `[0x07][channel]`
///
/// Exactly [`ICON_PAYLOAD_LEN`] pixel bytes follow, two per pixel, high
/// byte first, row-major.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct IconHeader {
    pub channel: u8,
}

impl IconHeader {
    pub fn encode(&self, buffer: &mut [u8]) -> Result<usize, EncodeError> {
        ensure_capacity(buffer, ICON_HEADER_LEN)?;
        buffer[0] = CMD_ICON;
        buffer[1] = self.channel;
        Ok(ICON_HEADER_LEN)
    }
}

/// Messages sent from the device to the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Outbound {
    /// Identity announcement (reply to a request, or a beacon)
    Handshake(HandshakeResponse),
    /// Identifier echo
    EchoUuid(EchoUuidReply),
    /// Fader moved past the deadband
    Fader(FaderUpdate),
}

impl Outbound {
    /// Encode this message into a byte buffer
    ///
    /// Returns the number of bytes written
    pub fn encode(&self, buffer: &mut [u8]) -> Result<usize, EncodeError> {
        match self {
            Outbound::Handshake(msg) => msg.encode(buffer),
            Outbound::EchoUuid(msg) => msg.encode(buffer),
            Outbound::Fader(msg) => msg.encode(buffer),
        }
    }

    /// Encode this message into a heapless Vec
    pub fn encode_to_vec(&self) -> Result<Vec<u8, MAX_OUTBOUND_LEN>, EncodeError> {
        let mut buffer = [0u8; MAX_OUTBOUND_LEN];
        let len = self.encode(&mut buffer)?;
        let mut vec = Vec::new();
        vec.extend_from_slice(&buffer[..len])
            .map_err(|_| EncodeError::BufferTooSmall)?;
        Ok(vec)
    }
}

impl From<FaderUpdate> for Outbound {
    fn from(msg: FaderUpdate) -> Self {
        Outbound::Fader(msg)
    }
}

impl From<HandshakeResponse> for Outbound {
    fn from(msg: HandshakeResponse) -> Self {
        Outbound::Handshake(msg)
    }
}
