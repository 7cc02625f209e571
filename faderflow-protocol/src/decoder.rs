//! Inbound byte stream decoder
//!
//! The host link has no delimiters, so the decoder must stay aligned with
//! message boundaries by consuming exactly the payload size implied by each
//! command byte. Icon payloads are too large to buffer and are surfaced one
//! byte at a time.

use heapless::Vec;

use crate::command::Command;
use crate::messages::{AppName, VolumeUpdate, APP_NAME_LEN, ICON_PAYLOAD_LEN};

/// Errors that can occur while decoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DecodeError {
    /// Byte in command position is not a known command; it was dropped
    UnknownCommand(u8),
    /// Known command that is not valid in this direction, or a message
    /// decoded with the wrong type; it was dropped
    UnexpectedCommand(u8),
    /// Message is shorter than its fixed size
    Truncated,
    /// Handshake magic mismatch
    BadMagic,
}

/// A decoded host → device event
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Inbound {
    /// Host asks for the identity announcement
    HandshakeRequest,
    /// Host acknowledged the announcement
    HandshakeAck,
    /// Host asks for the identifier
    EchoUuid,
    /// New application name for a channel
    AppName(AppName),
    /// New volume for a channel
    Volume(VolumeUpdate),
    /// An icon stream for `channel` begins; pixel bytes follow
    IconStart { channel: u8 },
    /// One icon payload byte; `index` counts from 0 to 8191
    IconData { channel: u8, index: u16, byte: u8 },
}

impl Inbound {
    /// Display channel this event addresses, if any
    pub fn channel(&self) -> Option<u8> {
        match self {
            Inbound::AppName(msg) => Some(msg.channel),
            Inbound::Volume(msg) => Some(msg.channel),
            Inbound::IconStart { channel } | Inbound::IconData { channel, .. } => Some(*channel),
            Inbound::HandshakeRequest | Inbound::HandshakeAck | Inbound::EchoUuid => None,
        }
    }
}

/// Largest payload the decoder buffers (app name: channel + 64 bytes)
const MAX_BUFFERED_PAYLOAD: usize = APP_NAME_LEN - 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseState {
    /// Next byte is a command byte
    WaitingForCommand,
    /// Collecting a fixed payload into the buffer
    ReadingPayload(Command),
    /// Got icon command, next byte is the channel
    WaitingForIconChannel,
    /// Streaming icon pixel bytes
    ReadingIcon { channel: u8, received: u16 },
}

/// State machine for decoding the inbound byte stream
#[derive(Debug, Clone)]
pub struct Decoder {
    state: ParseState,
    buffer: Vec<u8, MAX_BUFFERED_PAYLOAD>,
}

impl Default for Decoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder {
    /// Create a new decoder waiting for a command byte
    pub fn new() -> Self {
        Self {
            state: ParseState::WaitingForCommand,
            buffer: Vec::new(),
        }
    }

    /// Drop any partially received message
    pub fn reset(&mut self) {
        self.state = ParseState::WaitingForCommand;
        self.buffer.clear();
    }

    /// Returns true if a message has started but not completed
    pub fn is_mid_message(&self) -> bool {
        self.state != ParseState::WaitingForCommand
    }

    /// Feed a single byte to the decoder
    ///
    /// Returns `Ok(Some(event))` when the byte completes a message or is an
    /// icon stream byte, `Ok(None)` when more bytes are needed, or `Err` if
    /// the byte was rejected in command position.
    pub fn feed(&mut self, byte: u8) -> Result<Option<Inbound>, DecodeError> {
        match self.state {
            ParseState::WaitingForCommand => self.dispatch(byte),
            ParseState::ReadingPayload(cmd) => {
                // Cannot overflow: the state is left once the payload is full
                let _ = self.buffer.push(byte);
                if self.buffer.len() < cmd.inbound_payload_len() {
                    return Ok(None);
                }

                let event = match cmd {
                    Command::AppName => Inbound::AppName(AppName::from_payload(&self.buffer)),
                    _ => Inbound::Volume(VolumeUpdate {
                        channel: self.buffer[0],
                        volume: self.buffer[1],
                    }),
                };
                self.reset();
                Ok(Some(event))
            }
            ParseState::WaitingForIconChannel => {
                self.state = ParseState::ReadingIcon {
                    channel: byte,
                    received: 0,
                };
                Ok(Some(Inbound::IconStart { channel: byte }))
            }
            ParseState::ReadingIcon { channel, received } => {
                let next = received + 1;
                if next as usize >= ICON_PAYLOAD_LEN {
                    self.reset();
                } else {
                    self.state = ParseState::ReadingIcon {
                        channel,
                        received: next,
                    };
                }
                Ok(Some(Inbound::IconData {
                    channel,
                    index: received,
                    byte,
                }))
            }
        }
    }

    /// Route a byte in command position
    fn dispatch(&mut self, byte: u8) -> Result<Option<Inbound>, DecodeError> {
        let cmd = Command::from_u8(byte).ok_or(DecodeError::UnknownCommand(byte))?;

        match cmd {
            Command::HandshakeRequest => Ok(Some(Inbound::HandshakeRequest)),
            Command::HandshakeAck => Ok(Some(Inbound::HandshakeAck)),
            Command::EchoUuid => Ok(Some(Inbound::EchoUuid)),
            Command::AppName | Command::Volume => {
                self.buffer.clear();
                self.state = ParseState::ReadingPayload(cmd);
                Ok(None)
            }
            Command::Icon => {
                self.state = ParseState::WaitingForIconChannel;
                Ok(None)
            }
            Command::HandshakeResponse | Command::FaderUpdate => {
                Err(DecodeError::UnexpectedCommand(byte))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::IconHeader;
    use proptest::prelude::*;

    /// Feed bytes, collecting events and errors
    fn feed_all(decoder: &mut Decoder, bytes: &[u8]) -> (usize, usize, Option<Inbound>) {
        let mut events = 0;
        let mut errors = 0;
        let mut last = None;
        for &b in bytes {
            match decoder.feed(b) {
                Ok(Some(ev)) => {
                    events += 1;
                    last = Some(ev);
                }
                Ok(None) => {}
                Err(_) => errors += 1,
            }
        }
        (events, errors, last)
    }

    #[test]
    fn test_single_byte_commands() {
        let mut decoder = Decoder::new();
        assert_eq!(decoder.feed(0x01), Ok(Some(Inbound::HandshakeRequest)));
        assert_eq!(decoder.feed(0x02), Ok(Some(Inbound::HandshakeAck)));
        assert_eq!(decoder.feed(0x04), Ok(Some(Inbound::EchoUuid)));
        assert!(!decoder.is_mid_message());
    }

    #[test]
    fn test_volume_update() {
        let mut decoder = Decoder::new();
        assert_eq!(decoder.feed(0x06), Ok(None));
        assert!(decoder.is_mid_message());
        assert_eq!(decoder.feed(1), Ok(None));
        assert_eq!(
            decoder.feed(42),
            Ok(Some(Inbound::Volume(VolumeUpdate {
                channel: 1,
                volume: 42
            })))
        );
        assert!(!decoder.is_mid_message());
    }

    #[test]
    fn test_app_name_update() {
        let msg = AppName::new(0, "Discord");
        let mut bytes = [0u8; APP_NAME_LEN];
        msg.encode(&mut bytes).unwrap();

        let mut decoder = Decoder::new();
        let (events, errors, last) = feed_all(&mut decoder, &bytes);
        assert_eq!((events, errors), (1, 0));
        assert_eq!(last, Some(Inbound::AppName(msg)));
    }

    #[test]
    fn test_icon_stream_events() {
        let mut decoder = Decoder::new();
        let mut header = [0u8; 2];
        IconHeader { channel: 1 }.encode(&mut header).unwrap();

        assert_eq!(decoder.feed(header[0]), Ok(None));
        assert_eq!(
            decoder.feed(header[1]),
            Ok(Some(Inbound::IconStart { channel: 1 }))
        );

        for i in 0..ICON_PAYLOAD_LEN {
            let ev = decoder.feed((i & 0xFF) as u8).unwrap();
            assert_eq!(
                ev,
                Some(Inbound::IconData {
                    channel: 1,
                    index: i as u16,
                    byte: (i & 0xFF) as u8
                })
            );
        }

        // Payload fully consumed; next byte is a command again
        assert!(!decoder.is_mid_message());
        assert_eq!(decoder.feed(0x01), Ok(Some(Inbound::HandshakeRequest)));
    }

    #[test]
    fn test_unknown_command_then_resync() {
        let mut decoder = Decoder::new();
        assert_eq!(decoder.feed(0x99), Err(DecodeError::UnknownCommand(0x99)));
        assert!(!decoder.is_mid_message());

        let (events, errors, last) = feed_all(&mut decoder, &[0x06, 0, 75]);
        assert_eq!((events, errors), (1, 0));
        assert_eq!(
            last,
            Some(Inbound::Volume(VolumeUpdate {
                channel: 0,
                volume: 75
            }))
        );
    }

    #[test]
    fn test_outbound_command_rejected() {
        let mut decoder = Decoder::new();
        assert_eq!(decoder.feed(0x10), Err(DecodeError::UnexpectedCommand(0x10)));
        assert_eq!(decoder.feed(0x03), Err(DecodeError::UnexpectedCommand(0x03)));
        assert!(!decoder.is_mid_message());
    }

    #[test]
    fn test_reset_drops_partial_message() {
        let mut decoder = Decoder::new();
        decoder.feed(0x05).unwrap();
        decoder.feed(0).unwrap();
        decoder.feed(b'x').unwrap();
        decoder.reset();

        assert!(!decoder.is_mid_message());
        assert_eq!(decoder.feed(0x02), Ok(Some(Inbound::HandshakeAck)));
    }

    #[test]
    fn test_event_channel() {
        assert_eq!(Inbound::IconStart { channel: 4 }.channel(), Some(4));
        assert_eq!(Inbound::HandshakeAck.channel(), None);
    }

    #[derive(Debug, Clone)]
    enum Msg {
        Request,
        Ack,
        Echo,
        Volume(u8, u8),
        Name(u8, std::string::String),
    }

    fn msg_strategy() -> impl Strategy<Value = Msg> {
        prop_oneof![
            Just(Msg::Request),
            Just(Msg::Ack),
            Just(Msg::Echo),
            (any::<u8>(), any::<u8>()).prop_map(|(c, v)| Msg::Volume(c, v)),
            (any::<u8>(), "[a-zA-Z0-9 ]{0,64}").prop_map(|(c, n)| Msg::Name(c, n)),
        ]
    }

    proptest! {
        #[test]
        fn prop_back_to_back_messages_stay_aligned(msgs in proptest::collection::vec(msg_strategy(), 1..20)) {
            let mut decoder = Decoder::new();
            let mut buf = [0u8; APP_NAME_LEN];

            for msg in &msgs {
                let (len, expected) = match msg {
                    Msg::Request => { buf[0] = 0x01; (1, Inbound::HandshakeRequest) }
                    Msg::Ack => { buf[0] = 0x02; (1, Inbound::HandshakeAck) }
                    Msg::Echo => { buf[0] = 0x04; (1, Inbound::EchoUuid) }
                    Msg::Volume(c, v) => {
                        let m = VolumeUpdate { channel: *c, volume: *v };
                        (m.encode(&mut buf).unwrap(), Inbound::Volume(m))
                    }
                    Msg::Name(c, n) => {
                        let m = AppName::new(*c, n);
                        (m.encode(&mut buf).unwrap(), Inbound::AppName(m))
                    }
                };

                for &b in &buf[..len - 1] {
                    prop_assert_eq!(decoder.feed(b), Ok(None));
                }
                prop_assert_eq!(decoder.feed(buf[len - 1]), Ok(Some(expected)));
            }
            prop_assert!(!decoder.is_mid_message());
        }
    }
}
