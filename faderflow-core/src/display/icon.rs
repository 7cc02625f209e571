//! Icon reassembly
//!
//! An icon is 64 × 64 RGB565 pixels streamed as byte pairs, high byte
//! first. The assembler pairs bytes into pixels and marks the icon ready
//! once the last pixel lands. Surplus bytes are ignored until the next
//! [`IconAssembler::start_receiving`].

use super::layout;
use super::surface::Surface;

/// Icon edge length in pixels
pub const ICON_SIZE: usize = 64;

/// Pixels per icon
pub const ICON_PIXELS: usize = ICON_SIZE * ICON_SIZE;

/// Icon buffer and byte-pair state machine
#[derive(Clone)]
pub struct IconAssembler {
    pixels: [u16; ICON_PIXELS],
    /// Next pixel to write
    cursor: usize,
    /// High byte waiting for its low byte
    high: Option<u8>,
    ready: bool,
    placeholder: bool,
}

impl Default for IconAssembler {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for IconAssembler {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("IconAssembler")
            .field("cursor", &self.cursor)
            .field("high", &self.high)
            .field("ready", &self.ready)
            .field("placeholder", &self.placeholder)
            .finish()
    }
}

impl IconAssembler {
    pub const fn new() -> Self {
        Self {
            pixels: [0; ICON_PIXELS],
            cursor: 0,
            high: None,
            ready: false,
            placeholder: false,
        }
    }

    /// Prepare for a new icon stream
    ///
    /// Always rewinds to the first pixel and drops readiness, whatever the
    /// previous state. Pixel data is overwritten as bytes arrive.
    pub fn start_receiving(&mut self) {
        self.cursor = 0;
        self.high = None;
        self.ready = false;
        self.placeholder = false;
    }

    /// Consume one byte of the pixel stream
    pub fn add_byte(&mut self, byte: u8) {
        if self.ready {
            return;
        }

        match self.high.take() {
            None => self.high = Some(byte),
            Some(high) => {
                if self.cursor < ICON_PIXELS {
                    self.pixels[self.cursor] = ((high as u16) << 8) | byte as u16;
                    self.cursor += 1;
                }
                if self.cursor >= ICON_PIXELS {
                    self.ready = true;
                    self.placeholder = false;
                }
            }
        }
    }

    /// Drop a partially received stream
    ///
    /// Leaves the assembler as if `start_receiving` had just been called,
    /// so a resumed stream cannot pair with a stale high byte.
    pub fn abort(&mut self) {
        if !self.ready {
            self.cursor = 0;
            self.high = None;
        }
    }

    /// True when a complete icon or the placeholder is available
    pub fn is_ready(&self) -> bool {
        self.ready || self.placeholder
    }

    /// True when a complete icon has been received
    pub fn is_complete(&self) -> bool {
        self.ready
    }

    pub fn is_placeholder(&self) -> bool {
        self.placeholder
    }

    /// Show the built-in placeholder until an icon arrives
    pub fn use_placeholder(&mut self) {
        self.placeholder = true;
    }

    /// Erase pixel data and all flags
    pub fn clear(&mut self) {
        self.pixels.fill(0);
        self.cursor = 0;
        self.high = None;
        self.ready = false;
        self.placeholder = false;
    }

    /// Pixels written so far
    pub fn pixels_received(&self) -> usize {
        self.cursor
    }

    /// True while a high byte waits for its pair
    pub fn has_pending_byte(&self) -> bool {
        self.high.is_some()
    }

    /// Raw RGB565 pixel buffer, row-major
    pub fn pixels(&self) -> &[u16; ICON_PIXELS] {
        &self.pixels
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<u16> {
        if x >= ICON_SIZE || y >= ICON_SIZE {
            return None;
        }
        Some(self.pixels[y * ICON_SIZE + x])
    }

    /// Render at `(x, y)`; does nothing unless ready
    pub fn draw<S: Surface>(&self, surface: &mut S, x: i32, y: i32) -> Result<(), S::Error> {
        if self.placeholder {
            layout::draw_placeholder_icon(surface, x, y)
        } else if self.ready {
            surface.draw_bitmap(x, y, ICON_SIZE as u32, ICON_SIZE as u32, &self.pixels)
        } else {
            Ok(())
        }
    }
}
