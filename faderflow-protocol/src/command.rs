//! Command codes
//!
//! The first byte of every message. Codes are shared by both directions;
//! [`Command::is_inbound`] tells which ones the device accepts.

// Handshake
pub const CMD_HANDSHAKE_REQUEST: u8 = 0x01;
pub const CMD_HANDSHAKE_ACK: u8 = 0x02;
pub const CMD_HANDSHAKE_RESPONSE: u8 = 0x03;
pub const CMD_ECHO_UUID: u8 = 0x04;

// Display updates: host → device
pub const CMD_APP_NAME: u8 = 0x05;
pub const CMD_VOLUME: u8 = 0x06;
pub const CMD_ICON: u8 = 0x07;

// Input reports: device → host
pub const CMD_FADER_UPDATE: u8 = 0x10;

/// A recognized command code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Command {
    HandshakeRequest = CMD_HANDSHAKE_REQUEST,
    HandshakeAck = CMD_HANDSHAKE_ACK,
    HandshakeResponse = CMD_HANDSHAKE_RESPONSE,
    EchoUuid = CMD_ECHO_UUID,
    AppName = CMD_APP_NAME,
    Volume = CMD_VOLUME,
    Icon = CMD_ICON,
    FaderUpdate = CMD_FADER_UPDATE,
}

impl Command {
    /// Parse a command from its wire byte
    pub fn from_u8(byte: u8) -> Option<Self> {
        match byte {
            CMD_HANDSHAKE_REQUEST => Some(Command::HandshakeRequest),
            CMD_HANDSHAKE_ACK => Some(Command::HandshakeAck),
            CMD_HANDSHAKE_RESPONSE => Some(Command::HandshakeResponse),
            CMD_ECHO_UUID => Some(Command::EchoUuid),
            CMD_APP_NAME => Some(Command::AppName),
            CMD_VOLUME => Some(Command::Volume),
            CMD_ICON => Some(Command::Icon),
            CMD_FADER_UPDATE => Some(Command::FaderUpdate),
            _ => None,
        }
    }

    /// Wire byte for this command
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Returns true if the device accepts this command from the host
    pub fn is_inbound(self) -> bool {
        !matches!(self, Command::HandshakeResponse | Command::FaderUpdate)
    }

    /// Number of bytes that follow the command byte in a host → device message
    ///
    /// Returns 0 for device → host commands.
    pub fn inbound_payload_len(self) -> usize {
        match self {
            Command::HandshakeRequest | Command::HandshakeAck | Command::EchoUuid => 0,
            Command::AppName => crate::messages::APP_NAME_LEN - 1,
            Command::Volume => crate::messages::VOLUME_UPDATE_LEN - 1,
            Command::Icon => crate::messages::ICON_HEADER_LEN - 1 + crate::messages::ICON_PAYLOAD_LEN,
            Command::HandshakeResponse | Command::FaderUpdate => 0,
        }
    }
}
