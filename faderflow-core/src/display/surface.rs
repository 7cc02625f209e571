//! Drawing surface
//!
//! Thin helpers over `embedded-graphics` so layout code reads in terms of
//! bitmaps, rectangles and text rather than styled primitives.

use embedded_graphics::mono_font::{MonoFont, MonoTextStyle};
use embedded_graphics::pixelcolor::raw::RawU16;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{
    Circle, PrimitiveStyle, Rectangle, RoundedRectangle, Triangle,
};
use embedded_graphics::text::{Alignment, Baseline, Text, TextStyleBuilder};

/// Drawing operations used by the channel screens
pub trait Surface: DrawTarget<Color = Rgb565> + Sized {
    /// Blit raw RGB565 values, row-major
    fn draw_bitmap(
        &mut self,
        x: i32,
        y: i32,
        width: u32,
        height: u32,
        pixels: &[u16],
    ) -> Result<(), Self::Error> {
        let area = Rectangle::new(Point::new(x, y), Size::new(width, height));
        self.fill_contiguous(&area, pixels.iter().map(|&p| Rgb565::from(RawU16::new(p))))
    }

    fn fill_rect(
        &mut self,
        x: i32,
        y: i32,
        width: u32,
        height: u32,
        color: Rgb565,
    ) -> Result<(), Self::Error> {
        self.fill_solid(
            &Rectangle::new(Point::new(x, y), Size::new(width, height)),
            color,
        )
    }

    fn fill_round_rect(
        &mut self,
        x: i32,
        y: i32,
        width: u32,
        height: u32,
        radius: u32,
        color: Rgb565,
    ) -> Result<(), Self::Error> {
        RoundedRectangle::with_equal_corners(
            Rectangle::new(Point::new(x, y), Size::new(width, height)),
            Size::new(radius, radius),
        )
        .into_styled(PrimitiveStyle::with_fill(color))
        .draw(self)
    }

    fn fill_triangle(
        &mut self,
        a: Point,
        b: Point,
        c: Point,
        color: Rgb565,
    ) -> Result<(), Self::Error> {
        Triangle::new(a, b, c)
            .into_styled(PrimitiveStyle::with_fill(color))
            .draw(self)
    }

    fn draw_circle(&mut self, center: Point, radius: u32, color: Rgb565) -> Result<(), Self::Error> {
        Circle::with_center(center, radius * 2 + 1)
            .into_styled(PrimitiveStyle::with_stroke(color, 1))
            .draw(self)
    }

    /// Draw text horizontally centered on `center_x` with its top at `y`
    fn draw_text(
        &mut self,
        text: &str,
        center_x: i32,
        y: i32,
        font: &MonoFont<'_>,
        color: Rgb565,
    ) -> Result<(), Self::Error> {
        let style = TextStyleBuilder::new()
            .alignment(Alignment::Center)
            .baseline(Baseline::Top)
            .build();
        Text::with_text_style(
            text,
            Point::new(center_x, y),
            MonoTextStyle::new(font, color),
            style,
        )
        .draw(self)?;
        Ok(())
    }
}

impl<T: DrawTarget<Color = Rgb565>> Surface for T {}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_graphics::mock_display::MockDisplay;

    #[test]
    fn test_bitmap_uses_raw_rgb565() {
        let mut display = MockDisplay::<Rgb565>::new();
        display.draw_bitmap(1, 1, 2, 1, &[0xF800, 0x001F]).unwrap();

        assert_eq!(display.get_pixel(Point::new(1, 1)), Some(Rgb565::RED));
        assert_eq!(display.get_pixel(Point::new(2, 1)), Some(Rgb565::BLUE));
        assert_eq!(display.get_pixel(Point::new(0, 0)), None);
    }

    #[test]
    fn test_fill_rect() {
        let mut display = MockDisplay::<Rgb565>::new();
        display.fill_rect(0, 0, 3, 2, Rgb565::GREEN).unwrap();

        assert_eq!(display.get_pixel(Point::new(2, 1)), Some(Rgb565::GREEN));
        assert_eq!(display.get_pixel(Point::new(3, 1)), None);
    }
}
