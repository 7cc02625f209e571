//! Display surface
//!
//! The panels are driven by an external driver; until one is attached each
//! channel renders into a [`LoggingSurface`] that tracks what was painted
//! and reports it over defmt.

use core::convert::Infallible;

use defmt::*;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;

use faderflow_core::display::layout::{SCREEN_HEIGHT, SCREEN_WIDTH};

/// Draw target that counts pixels instead of driving a panel
pub struct LoggingSurface {
    channel: u8,
    pixels: u32,
}

impl LoggingSurface {
    pub const fn new(channel: u8) -> Self {
        Self { channel, pixels: 0 }
    }

    /// Log and reset the pixel count of the last repaint
    pub fn flush(&mut self) {
        trace!("Channel {} repainted {} pixels", self.channel, self.pixels);
        self.pixels = 0;
    }
}

impl OriginDimensions for LoggingSurface {
    fn size(&self) -> Size {
        Size::new(SCREEN_WIDTH, SCREEN_HEIGHT)
    }
}

impl DrawTarget for LoggingSurface {
    type Color = Rgb565;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        let bounds = self.bounding_box();
        let drawn = pixels
            .into_iter()
            .filter(|Pixel(p, _)| bounds.contains(*p))
            .count();
        self.pixels = self.pixels.saturating_add(drawn as u32);
        Ok(())
    }
}
