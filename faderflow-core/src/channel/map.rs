use crate::config::EncoderConfig;
use crate::link::LinkError;

use super::Channel;

/// Fixed set of channels addressed by wire index
#[derive(Debug, Clone)]
pub struct ChannelMap<const N: usize> {
    channels: [Channel; N],
}

impl<const N: usize> ChannelMap<N> {
    /// Channels `0..N`, all with the same encoder tuning
    pub fn new(encoder: EncoderConfig) -> Self {
        Self {
            channels: core::array::from_fn(|i| Channel::new(i as u8, encoder)),
        }
    }

    pub fn get(&self, index: u8) -> Result<&Channel, LinkError> {
        self.channels
            .get(index as usize)
            .ok_or(LinkError::ChannelOutOfRange(index))
    }

    pub fn get_mut(&mut self, index: u8) -> Result<&mut Channel, LinkError> {
        self.channels
            .get_mut(index as usize)
            .ok_or(LinkError::ChannelOutOfRange(index))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Channel> {
        self.channels.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Channel> {
        self.channels.iter_mut()
    }

    pub const fn len(&self) -> usize {
        N
    }

    pub const fn is_empty(&self) -> bool {
        N == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_follow_index() {
        let map: ChannelMap<3> = ChannelMap::new(EncoderConfig::default());
        let ids: std::vec::Vec<u8> = map.iter().map(|c| c.id()).collect();
        assert_eq!(ids, [0, 1, 2]);
        assert_eq!(map.len(), 3);
    }

    #[test]
    fn test_out_of_range_rejected() {
        let mut map: ChannelMap<2> = ChannelMap::new(EncoderConfig::default());
        assert!(map.get(1).is_ok());
        assert_eq!(map.get(2).err(), Some(LinkError::ChannelOutOfRange(2)));
        assert_eq!(
            map.get_mut(255).err(),
            Some(LinkError::ChannelOutOfRange(255))
        );
    }

    #[test]
    fn test_get_mut_writes_through() {
        let mut map: ChannelMap<2> = ChannelMap::new(EncoderConfig::default());
        map.get_mut(1).unwrap().set_volume(10);
        assert_eq!(map.get(1).unwrap().volume(), 10);
        assert_eq!(map.get(0).unwrap().volume(), 50);
    }
}
