use faderflow_protocol::messages::EchoUuidReply;
use faderflow_protocol::{build_announcement, Decoder, DeviceIdentity, Inbound, Outbound};

use crate::channel::ChannelMap;
use crate::config::LinkConfig;

use super::{HandshakeBeacon, IdleTimer, LinkError};

/// Result of one [`Link::poll`]
///
/// The idle check and the beacon run independently, so both can fire on
/// the same tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LinkPoll {
    /// Announcement to send
    pub announcement: Option<Outbound>,
    /// Set when a stalled message was dropped
    pub timeout: Option<LinkError>,
}

/// Device side of the host link
///
/// Feed every received byte to [`Link::on_byte`] and call [`Link::poll`]
/// periodically. Both may return a message to send back.
#[derive(Debug, Clone)]
pub struct Link {
    decoder: Decoder,
    beacon: HandshakeBeacon,
    idle: IdleTimer,
    identity: DeviceIdentity,
    /// Channel of the icon stream in progress
    icon_target: Option<u8>,
}

impl Link {
    pub fn new(identity: DeviceIdentity, config: LinkConfig) -> Self {
        Self {
            decoder: Decoder::new(),
            beacon: HandshakeBeacon::new(config.beacon_interval_ms),
            idle: IdleTimer::new(config.idle_reset),
            identity,
            icon_target: None,
        }
    }

    pub fn identity(&self) -> &DeviceIdentity {
        &self.identity
    }

    /// True once the host has acknowledged the announcement
    pub fn is_connected(&self) -> bool {
        self.beacon.is_acknowledged()
    }

    /// Process one received byte
    ///
    /// Messages for a missing channel are consumed in full so framing
    /// holds; the first event of such a message reports
    /// [`LinkError::ChannelOutOfRange`] and the rest are dropped.
    pub fn on_byte<const N: usize>(
        &mut self,
        byte: u8,
        now_ms: u32,
        channels: &mut ChannelMap<N>,
    ) -> Result<Option<Outbound>, LinkError> {
        let result = self.decoder.feed(byte);

        if self.decoder.is_mid_message() {
            self.idle.touch(now_ms);
        } else {
            self.idle.clear();
            self.icon_target = None;
        }

        match result? {
            Some(event) => self.apply(event, now_ms, channels),
            None => Ok(None),
        }
    }

    /// Periodic housekeeping
    ///
    /// Drops a message that has stalled past the idle window and returns
    /// an announcement if the beacon is due.
    pub fn poll<const N: usize>(&mut self, now_ms: u32, channels: &mut ChannelMap<N>) -> LinkPoll {
        let timeout = self.expire_stalled(now_ms, channels).err();
        let announcement = self
            .beacon
            .poll(now_ms)
            .then(|| self.announcement());

        LinkPoll {
            announcement,
            timeout,
        }
    }

    fn expire_stalled<const N: usize>(
        &mut self,
        now_ms: u32,
        channels: &mut ChannelMap<N>,
    ) -> Result<(), LinkError> {
        if !self.idle.expired(now_ms) {
            return Ok(());
        }

        self.idle.clear();
        self.decoder.reset();
        if let Some(channel) = self.icon_target.take() {
            if let Ok(ch) = channels.get_mut(channel) {
                ch.abort_icon();
            }
        }
        Err(LinkError::StreamTimeout)
    }

    fn announcement(&self) -> Outbound {
        Outbound::Handshake(build_announcement(&self.identity))
    }

    fn apply<const N: usize>(
        &mut self,
        event: Inbound,
        now_ms: u32,
        channels: &mut ChannelMap<N>,
    ) -> Result<Option<Outbound>, LinkError> {
        match event {
            Inbound::HandshakeRequest => {
                self.beacon.note_sent(now_ms);
                return Ok(Some(self.announcement()));
            }
            Inbound::HandshakeAck => self.beacon.acknowledge(),
            Inbound::EchoUuid => {
                return Ok(Some(Outbound::EchoUuid(EchoUuidReply {
                    uuid: self.identity,
                })));
            }
            Inbound::AppName(msg) => channels.get_mut(msg.channel)?.set_app_name(&msg.name),
            Inbound::Volume(msg) => channels
                .get_mut(msg.channel)?
                .set_volume(msg.clamped() as i32),
            Inbound::IconStart { channel } => {
                let ch = channels.get_mut(channel)?;
                ch.start_icon();
                if self.decoder.is_mid_message() {
                    self.icon_target = Some(channel);
                }
            }
            Inbound::IconData { channel, byte, .. } => {
                if let Ok(ch) = channels.get_mut(channel) {
                    ch.push_icon_byte(byte);
                }
            }
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use faderflow_protocol::messages::{AppName, IconHeader, VolumeUpdate, ICON_PAYLOAD_LEN};
    use faderflow_protocol::DecodeError;

    use crate::config::{EncoderConfig, IdleReset};

    const ID: DeviceIdentity = DeviceIdentity::new([0x5A; 16]);

    fn setup(idle_reset: IdleReset) -> (Link, ChannelMap<2>) {
        let config = LinkConfig {
            idle_reset,
            ..Default::default()
        };
        (
            Link::new(ID, config),
            ChannelMap::new(EncoderConfig::default()),
        )
    }

    /// Feed bytes, returning the last reply and the errors seen
    fn feed(
        link: &mut Link,
        channels: &mut ChannelMap<2>,
        now_ms: u32,
        bytes: &[u8],
    ) -> (Option<Outbound>, std::vec::Vec<LinkError>) {
        let mut reply = None;
        let mut errors = std::vec::Vec::new();
        for &b in bytes {
            match link.on_byte(b, now_ms, channels) {
                Ok(Some(out)) => reply = Some(out),
                Ok(None) => {}
                Err(e) => errors.push(e),
            }
        }
        (reply, errors)
    }

    fn icon_message(channel: u8) -> std::vec::Vec<u8> {
        let mut bytes = std::vec![0u8; 2];
        IconHeader { channel }.encode(&mut bytes).unwrap();
        bytes.extend((0..ICON_PAYLOAD_LEN).map(|i| i as u8));
        bytes
    }

    #[test]
    fn test_beacon_until_ack() {
        let (mut link, mut channels) = setup(IdleReset::Disabled);

        assert!(matches!(
            link.poll(0, &mut channels).announcement,
            Some(Outbound::Handshake(_))
        ));
        assert_eq!(link.poll(100, &mut channels), LinkPoll::default());
        assert!(link.poll(500, &mut channels).announcement.is_some());

        feed(&mut link, &mut channels, 600, &[0x02]);
        assert!(link.is_connected());
        assert_eq!(link.poll(1000, &mut channels), LinkPoll::default());
        assert_eq!(link.poll(5000, &mut channels), LinkPoll::default());
    }

    #[test]
    fn test_request_replies_immediately() {
        let (mut link, mut channels) = setup(IdleReset::Disabled);
        link.poll(0, &mut channels);

        let (reply, errors) = feed(&mut link, &mut channels, 200, &[0x01]);
        assert!(errors.is_empty());
        match reply {
            Some(Outbound::Handshake(resp)) => {
                assert!(resp.is_valid());
                assert_eq!(resp.uuid, ID);
            }
            other => panic!("expected handshake, got {:?}", other),
        }

        // Interval restarted by the reply
        assert_eq!(link.poll(600, &mut channels), LinkPoll::default());
        assert!(link.poll(700, &mut channels).announcement.is_some());
    }

    #[test]
    fn test_request_after_ack_still_answered() {
        let (mut link, mut channels) = setup(IdleReset::Disabled);
        feed(&mut link, &mut channels, 0, &[0x02]);
        let (reply, _) = feed(&mut link, &mut channels, 10, &[0x01]);
        assert!(matches!(reply, Some(Outbound::Handshake(_))));
    }

    #[test]
    fn test_echo_uuid() {
        let (mut link, mut channels) = setup(IdleReset::Disabled);
        let (reply, _) = feed(&mut link, &mut channels, 0, &[0x04]);
        assert_eq!(reply, Some(Outbound::EchoUuid(EchoUuidReply { uuid: ID })));
    }

    #[test]
    fn test_app_name_and_volume_applied() {
        let (mut link, mut channels) = setup(IdleReset::Disabled);

        let mut buf = [0u8; 66];
        AppName::new(1, "Spotify").encode(&mut buf).unwrap();
        feed(&mut link, &mut channels, 0, &buf);

        let mut buf = [0u8; 3];
        VolumeUpdate {
            channel: 0,
            volume: 250,
        }
        .encode(&mut buf)
        .unwrap();
        feed(&mut link, &mut channels, 0, &buf);

        assert_eq!(channels.get(1).unwrap().app_name(), "Spotify");
        assert_eq!(channels.get(0).unwrap().volume(), 100);
    }

    #[test]
    fn test_out_of_range_channel_keeps_framing() {
        let (mut link, mut channels) = setup(IdleReset::Disabled);

        let (_, errors) = feed(&mut link, &mut channels, 0, &[0x06, 7, 30]);
        assert_eq!(errors, [LinkError::ChannelOutOfRange(7)]);

        let (_, errors) = feed(&mut link, &mut channels, 0, &[0x06, 1, 30]);
        assert!(errors.is_empty());
        assert_eq!(channels.get(1).unwrap().volume(), 30);
    }

    #[test]
    fn test_out_of_range_icon_reports_once() {
        let (mut link, mut channels) = setup(IdleReset::Disabled);
        let (_, errors) = feed(&mut link, &mut channels, 0, &icon_message(9));
        assert_eq!(errors, [LinkError::ChannelOutOfRange(9)]);

        let (reply, _) = feed(&mut link, &mut channels, 0, &[0x04]);
        assert!(reply.is_some());
    }

    #[test]
    fn test_icon_stream_completes() {
        let (mut link, mut channels) = setup(IdleReset::Disabled);
        let (_, errors) = feed(&mut link, &mut channels, 0, &icon_message(0));
        assert!(errors.is_empty());

        let icon = channels.get(0).unwrap().icon();
        assert!(icon.is_complete());
        assert_eq!(icon.pixel(0, 0), Some(0x0001));
        assert!(!channels.get(1).unwrap().icon().is_ready());
    }

    #[test]
    fn test_unknown_command_then_valid() {
        let (mut link, mut channels) = setup(IdleReset::Disabled);
        let (reply, errors) = feed(&mut link, &mut channels, 0, &[0xEE, 0x04]);
        assert_eq!(
            errors,
            [LinkError::Decode(DecodeError::UnknownCommand(0xEE))]
        );
        assert!(matches!(reply, Some(Outbound::EchoUuid(_))));
    }

    #[test]
    fn test_idle_reset_drops_partial_icon() {
        let (mut link, mut channels) = setup(IdleReset::After { ms: 500 });
        feed(&mut link, &mut channels, 0, &[0x02]);

        let partial = &icon_message(1)[..101];
        feed(&mut link, &mut channels, 1000, partial);
        assert!(channels.get(1).unwrap().icon().has_pending_byte());

        assert_eq!(link.poll(1400, &mut channels), LinkPoll::default());
        assert_eq!(
            link.poll(1500, &mut channels).timeout,
            Some(LinkError::StreamTimeout)
        );

        let icon = channels.get(1).unwrap().icon();
        assert_eq!(icon.pixels_received(), 0);
        assert!(!icon.has_pending_byte());
        assert!(icon.is_placeholder());

        // Realigned on the next command
        let (reply, errors) = feed(&mut link, &mut channels, 1600, &[0x04]);
        assert!(errors.is_empty());
        assert!(reply.is_some());
    }

    #[test]
    fn test_idle_reset_disabled_waits() {
        let (mut link, mut channels) = setup(IdleReset::Disabled);
        feed(&mut link, &mut channels, 0, &[0x02]);
        feed(&mut link, &mut channels, 0, &[0x06, 0]);

        assert_eq!(link.poll(60_000, &mut channels), LinkPoll::default());
        feed(&mut link, &mut channels, 60_001, &[42]);
        assert_eq!(channels.get(0).unwrap().volume(), 42);
    }

    #[test]
    fn test_idle_reset_drops_partial_app_name() {
        let (mut link, mut channels) = setup(IdleReset::After { ms: 500 });
        feed(&mut link, &mut channels, 0, &[0x02]);
        feed(&mut link, &mut channels, 0, &[0x05, 0, b'a']);

        assert_eq!(
            link.poll(600, &mut channels).timeout,
            Some(LinkError::StreamTimeout)
        );
        assert_eq!(channels.get(0).unwrap().app_name(), "Waiting...");
        assert!(!channels.get(0).unwrap().icon().is_placeholder());
    }

    #[test]
    fn test_poll_time_behind_last_byte_keeps_stream() {
        let (mut link, mut channels) = setup(IdleReset::After { ms: 500 });
        feed(&mut link, &mut channels, 0, &[0x02]);

        let message = icon_message(0);
        let (head, rest) = message.split_at(101);
        feed(&mut link, &mut channels, 1001, head);

        // Tick stamped just before the byte was handled
        assert_eq!(link.poll(1000, &mut channels), LinkPoll::default());

        let (_, errors) = feed(&mut link, &mut channels, 1002, rest);
        assert!(errors.is_empty());
        assert!(channels.get(0).unwrap().icon().is_complete());
    }

    #[test]
    fn test_timeout_and_beacon_same_tick() {
        let (mut link, mut channels) = setup(IdleReset::After { ms: 500 });
        assert!(link.poll(0, &mut channels).announcement.is_some());

        feed(&mut link, &mut channels, 100, &[0x05, 0]);

        let result = link.poll(600, &mut channels);
        assert_eq!(result.timeout, Some(LinkError::StreamTimeout));
        assert!(matches!(result.announcement, Some(Outbound::Handshake(_))));
    }
}
