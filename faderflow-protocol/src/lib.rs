//! FaderFlow Host Link Protocol
//!
//! This crate defines the serial protocol between the volume controller and
//! its desktop companion. Messages are fixed-size records with no framing
//! bytes, length prefix or checksum: the first byte is a command code and
//! the command alone determines how many payload bytes follow.
//!
//! # Message catalog
//!
//! ```text
//! cmd   name               dir        size   layout
//! 0x01  HandshakeRequest   host→dev      1   [cmd]
//! 0x02  HandshakeAck       host→dev      1   [cmd]
//! 0x03  HandshakeResponse  dev→host     30   [cmd][magic;10][type][uuid;16][major][minor]
//! 0x04  EchoUuid           host→dev      1   [cmd]
//!                          dev→host     17   [cmd][uuid;16]
//! 0x05  AppName            host→dev     66   [cmd][channel][name;64 NUL padded]
//! 0x06  Volume             host→dev      3   [cmd][channel][volume 0-100]
//! 0x07  Icon               host→dev   8194   [cmd][channel][8192 bytes RGB565 big-endian]
//! 0x10  FaderUpdate        dev→host      3   [cmd][channel][position 0-255]
//! ```
//!
//! Every field is serialized explicitly at the offsets documented on each
//! message type. In-memory layout never goes on the wire.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod command;
pub mod decoder;
pub mod handshake;
pub mod messages;

pub use command::Command;
pub use decoder::{DecodeError, Decoder, Inbound};
pub use handshake::{build_announcement, DeviceIdentity, UUID_LEN};
pub use messages::{
    AppName, EchoUuidReply, EncodeError, FaderUpdate, HandshakeResponse, IconHeader, Outbound,
    VolumeUpdate, ICON_PAYLOAD_LEN, MAX_OUTBOUND_LEN,
};
