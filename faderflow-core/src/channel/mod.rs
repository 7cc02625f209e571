//! Per-channel state
//!
//! A channel pairs one display with one rotary encoder. It holds what the
//! host has told it (application name, volume, icon) and folds local
//! encoder movement into the volume.

mod map;

pub use map::ChannelMap;

use heapless::String;

use faderflow_protocol::messages::{APP_NAME_MAX, MAX_VOLUME};

use crate::config::EncoderConfig;
use crate::display::{layout, IconAssembler, Surface};
use crate::input::{EncoderDecoder, EncoderSample};

/// Name shown until the host assigns one
pub const DEFAULT_APP_NAME: &str = "Waiting...";

/// Volume before the host sends one
pub const DEFAULT_VOLUME: u8 = 50;

/// Screen areas that changed since the last redraw
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Dirty {
    pub icon: bool,
    pub app_name: bool,
    pub volume: bool,
}

impl Dirty {
    pub const ALL: Self = Self {
        icon: true,
        app_name: true,
        volume: true,
    };

    pub fn any(&self) -> bool {
        self.icon || self.app_name || self.volume
    }
}

/// One display + encoder channel
#[derive(Debug, Clone)]
pub struct Channel {
    id: u8,
    icon: IconAssembler,
    encoder: EncoderDecoder,
    app_name: String<APP_NAME_MAX>,
    volume: u8,
    /// Encoder steps not yet collected by the caller
    encoder_change: Option<i32>,
    dirty: Dirty,
}

impl Channel {
    pub fn new(id: u8, encoder: EncoderConfig) -> Self {
        let mut app_name = String::new();
        // Shorter than APP_NAME_MAX
        let _ = app_name.push_str(DEFAULT_APP_NAME);

        Self {
            id,
            icon: IconAssembler::new(),
            encoder: EncoderDecoder::new(encoder),
            app_name,
            volume: DEFAULT_VOLUME,
            encoder_change: None,
            dirty: Dirty::ALL,
        }
    }

    pub fn id(&self) -> u8 {
        self.id
    }

    /// Feed one encoder sample
    ///
    /// Rotation moves the local volume immediately and is kept as a pending
    /// change until [`Channel::take_encoder_change`].
    pub fn update(&mut self, now_ms: u32, sample: EncoderSample) {
        self.encoder.update(now_ms, sample);

        let delta = self.encoder.delta();
        if delta != 0 {
            let pending = self.encoder_change.unwrap_or(0);
            self.encoder_change = Some(pending.saturating_add(delta));
            self.set_volume(self.volume as i32 + delta);
        }
    }

    /// Replace the application name, truncated to 64 bytes on a char boundary
    pub fn set_app_name(&mut self, name: &str) {
        self.app_name.clear();
        for c in name.chars() {
            if self.app_name.push(c).is_err() {
                break;
            }
        }
        self.dirty.app_name = true;
    }

    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    /// Set the volume, clamped to 0..=100
    pub fn set_volume(&mut self, volume: i32) {
        let volume = volume.clamp(0, MAX_VOLUME as i32) as u8;
        if volume != self.volume {
            self.volume = volume;
            self.dirty.volume = true;
        }
    }

    pub fn volume(&self) -> u8 {
        self.volume
    }

    pub fn icon(&self) -> &IconAssembler {
        &self.icon
    }

    /// Begin receiving a new icon
    pub fn start_icon(&mut self) {
        self.icon.start_receiving();
    }

    /// Add one icon stream byte; marks the icon dirty when it completes
    pub fn push_icon_byte(&mut self, byte: u8) {
        let was_complete = self.icon.is_complete();
        self.icon.add_byte(byte);
        if !was_complete && self.icon.is_complete() {
            self.dirty.icon = true;
        }
    }

    /// Drop a stalled icon stream and fall back to the placeholder
    pub fn abort_icon(&mut self) {
        if !self.icon.is_complete() {
            self.icon.abort();
            self.icon.use_placeholder();
            self.dirty.icon = true;
        }
    }

    /// Accumulated encoder steps since the last call, if any
    pub fn take_encoder_change(&mut self) -> Option<i32> {
        self.encoder_change.take()
    }

    pub fn was_button_pressed(&mut self) -> bool {
        self.encoder.was_pressed()
    }

    /// Areas changed since the last call
    pub fn take_dirty(&mut self) -> Dirty {
        core::mem::take(&mut self.dirty)
    }

    /// Paint the whole screen
    pub fn render<S: Surface>(&self, surface: &mut S) -> Result<(), S::Error> {
        layout::draw_ui(surface, self.volume, &self.app_name, &self.icon)
    }

    /// Repaint only the areas flagged in `dirty`
    pub fn render_dirty<S: Surface>(&self, surface: &mut S, dirty: Dirty) -> Result<(), S::Error> {
        if dirty == Dirty::ALL {
            return self.render(surface);
        }
        if dirty.icon {
            layout::draw_icon_area(surface, &self.icon)?;
        }
        if dirty.app_name {
            layout::draw_app_name(surface, &self.app_name)?;
        }
        if dirty.volume {
            layout::draw_volume(surface, self.volume)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::testing::FrameBuffer;
    use crate::display::ICON_PIXELS;

    fn channel() -> Channel {
        let mut ch = Channel::new(0, EncoderConfig::default());
        ch.take_dirty();
        ch
    }

    fn sample(clk: bool, dt: bool) -> EncoderSample {
        EncoderSample { clk, dt, sw: true }
    }

    fn turn_clockwise(ch: &mut Channel, steps: u32, t: &mut u32) {
        for _ in 0..steps {
            ch.update(*t, sample(true, false));
            ch.update(*t + 1, sample(false, true));
            *t += 2;
        }
    }

    #[test]
    fn test_defaults() {
        let mut ch = Channel::new(1, EncoderConfig::default());
        assert_eq!(ch.id(), 1);
        assert_eq!(ch.app_name(), "Waiting...");
        assert_eq!(ch.volume(), 50);
        assert_eq!(ch.take_dirty(), Dirty::ALL);
        assert!(!ch.take_dirty().any());
    }

    #[test]
    fn test_encoder_moves_volume() {
        let mut ch = channel();
        let mut t = 0;
        ch.update(t, sample(false, true));
        turn_clockwise(&mut ch, 3, &mut t);

        assert_eq!(ch.volume(), 53);
        assert_eq!(ch.take_encoder_change(), Some(3));
        assert_eq!(ch.take_encoder_change(), None);
        assert!(ch.take_dirty().volume);
    }

    #[test]
    fn test_encoder_volume_clamps() {
        let mut ch = channel();
        ch.set_volume(99);
        let mut t = 0;
        ch.update(t, sample(false, true));
        turn_clockwise(&mut ch, 5, &mut t);

        assert_eq!(ch.volume(), 100);
        assert_eq!(ch.take_encoder_change(), Some(5));
    }

    #[test]
    fn test_set_volume_clamps() {
        let mut ch = channel();
        ch.set_volume(150);
        assert_eq!(ch.volume(), 100);
        ch.set_volume(-3);
        assert_eq!(ch.volume(), 0);
    }

    #[test]
    fn test_unchanged_volume_not_dirty() {
        let mut ch = channel();
        ch.set_volume(50);
        assert!(!ch.take_dirty().volume);
    }

    #[test]
    fn test_app_name_truncates() {
        let mut ch = channel();
        let long = "é".repeat(40); // 80 bytes
        ch.set_app_name(&long);
        assert_eq!(ch.app_name().len(), 64);
        assert!(ch.take_dirty().app_name);
    }

    #[test]
    fn test_icon_completion_marks_dirty() {
        let mut ch = channel();
        ch.start_icon();
        for _ in 0..ICON_PIXELS * 2 - 1 {
            ch.push_icon_byte(0x11);
        }
        assert!(!ch.take_dirty().icon);
        ch.push_icon_byte(0x11);
        assert!(ch.take_dirty().icon);
        assert!(ch.icon().is_complete());
    }

    #[test]
    fn test_abort_icon_uses_placeholder() {
        let mut ch = channel();
        ch.start_icon();
        ch.push_icon_byte(0xAB);
        ch.abort_icon();

        assert!(ch.icon().is_placeholder());
        assert!(!ch.icon().has_pending_byte());
        assert!(ch.take_dirty().icon);
    }

    #[test]
    fn test_render_dirty_volume_only() {
        let mut ch = channel();
        let mut fb = FrameBuffer::new();
        ch.render(&mut fb).unwrap();
        let full = fb.writes;

        ch.set_volume(80);
        let dirty = ch.take_dirty();
        assert_eq!(
            dirty,
            Dirty {
                volume: true,
                ..Default::default()
            }
        );

        fb.writes = 0;
        ch.render_dirty(&mut fb, dirty).unwrap();
        assert!(fb.writes > 0);
        assert!(fb.writes < full);

        // Icon frame untouched
        assert_eq!(fb.at(88 - 4, 40 + 32), layout::ICON_BG);
    }
}
