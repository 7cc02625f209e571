//! Channel screen layout
//!
//! One 240 × 240 panel per channel:
//!
//! ```text
//! ┌──────────────────────────┐
//! │        ┌────────┐        │  y = 32..112  icon frame
//! │        │  icon  │        │
//! │        └────────┘        │
//! │         App name         │  y = 114..144
//! │           50%            │  y = 140..240 volume area
//! │  [██████████──────────]  │
//! └──────────────────────────┘
//! ```
//!
//! Each area can be redrawn on its own so small updates do not repaint
//! the whole panel.

use core::fmt::Write;

use embedded_graphics::mono_font::ascii::{FONT_10X20, FONT_9X15_BOLD};
use embedded_graphics::mono_font::MonoFont;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use heapless::String;

use super::icon::{IconAssembler, ICON_SIZE};
use super::surface::Surface;

pub const SCREEN_WIDTH: u32 = 240;
pub const SCREEN_HEIGHT: u32 = 240;

const ICON_X: i32 = (SCREEN_WIDTH as i32 - ICON_SIZE as i32) / 2;
const ICON_Y: i32 = 40;
const ICON_FRAME_PAD: i32 = 8;

const NAME_AREA_Y: i32 = ICON_Y + ICON_SIZE as i32 + 10;
const NAME_AREA_HEIGHT: u32 = 30;
const NAME_TEXT_Y: i32 = ICON_Y + ICON_SIZE as i32 + 15;

const VOLUME_AREA_Y: i32 = 140;
const VOLUME_AREA_HEIGHT: u32 = 100;
const VOLUME_TEXT_Y: i32 = 150;

const BAR_WIDTH: u32 = 200;
const BAR_HEIGHT: u32 = 12;
const BAR_X: i32 = (SCREEN_WIDTH - BAR_WIDTH) as i32 / 2;
const BAR_Y: i32 = 200;

pub const BG_COLOR: Rgb565 = Rgb565::BLACK;
pub const ICON_BG: Rgb565 = Rgb565::new(3, 6, 3);
pub const TEXT_COLOR: Rgb565 = Rgb565::WHITE;
pub const BAR_BG: Rgb565 = Rgb565::new(6, 12, 6);
pub const ACCENT_COLOR: Rgb565 = Rgb565::CYAN;

const NAME_FONT: &MonoFont<'static> = &FONT_9X15_BOLD;
const VOLUME_FONT: &MonoFont<'static> = &FONT_10X20;

/// Paint the whole panel
pub fn draw_ui<S: Surface>(
    surface: &mut S,
    volume: u8,
    name: &str,
    icon: &IconAssembler,
) -> Result<(), S::Error> {
    surface.fill_rect(0, 0, SCREEN_WIDTH, SCREEN_HEIGHT, BG_COLOR)?;
    draw_icon_area(surface, icon)?;
    draw_app_name(surface, name)?;
    draw_volume(surface, volume)
}

/// Repaint the icon frame with the icon, or the placeholder if none is ready
pub fn draw_icon_area<S: Surface>(surface: &mut S, icon: &IconAssembler) -> Result<(), S::Error> {
    let frame = ICON_SIZE as u32 + 2 * ICON_FRAME_PAD as u32;
    surface.fill_round_rect(
        ICON_X - ICON_FRAME_PAD,
        ICON_Y - ICON_FRAME_PAD,
        frame,
        frame,
        8,
        ICON_BG,
    )?;

    if icon.is_ready() {
        icon.draw(surface, ICON_X, ICON_Y)
    } else {
        draw_placeholder_icon(surface, ICON_X, ICON_Y)
    }
}

/// Repaint the app name line, centered and cut to the panel width
pub fn draw_app_name<S: Surface>(surface: &mut S, name: &str) -> Result<(), S::Error> {
    surface.fill_rect(0, NAME_AREA_Y, SCREEN_WIDTH, NAME_AREA_HEIGHT, BG_COLOR)?;

    let max_chars = (SCREEN_WIDTH / NAME_FONT.character_size.width) as usize;
    let visible = match name.char_indices().nth(max_chars) {
        Some((cut, _)) => &name[..cut],
        None => name,
    };

    surface.draw_text(
        visible,
        SCREEN_WIDTH as i32 / 2,
        NAME_TEXT_Y,
        NAME_FONT,
        TEXT_COLOR,
    )
}

/// Repaint the volume percentage and bar
pub fn draw_volume<S: Surface>(surface: &mut S, volume: u8) -> Result<(), S::Error> {
    let volume = volume.min(100);
    surface.fill_rect(0, VOLUME_AREA_Y, SCREEN_WIDTH, VOLUME_AREA_HEIGHT, BG_COLOR)?;

    let mut label: String<8> = String::new();
    // "100%" always fits
    let _ = write!(label, "{}%", volume);
    surface.draw_text(
        &label,
        SCREEN_WIDTH as i32 / 2,
        VOLUME_TEXT_Y,
        VOLUME_FONT,
        TEXT_COLOR,
    )?;

    surface.fill_round_rect(BAR_X, BAR_Y, BAR_WIDTH, BAR_HEIGHT, 6, BAR_BG)?;

    let fill = bar_fill_width(volume);
    if fill > 0 {
        surface.fill_round_rect(BAR_X + 2, BAR_Y + 2, fill, BAR_HEIGHT - 4, 4, ACCENT_COLOR)?;
    }
    Ok(())
}

/// Width of the filled part of the volume bar
pub fn bar_fill_width(volume: u8) -> u32 {
    (BAR_WIDTH - 4) * volume.min(100) as u32 / 100
}

/// Speaker glyph shown when no icon has been received
pub fn draw_placeholder_icon<S: Surface>(surface: &mut S, x: i32, y: i32) -> Result<(), S::Error> {
    surface.fill_rect(x + 10, y + 20, 15, 24, ACCENT_COLOR)?;
    surface.fill_triangle(
        Point::new(x + 25, y + 20),
        Point::new(x + 25, y + 44),
        Point::new(x + 40, y + 50),
        ACCENT_COLOR,
    )?;
    surface.fill_triangle(
        Point::new(x + 25, y + 20),
        Point::new(x + 25, y + 44),
        Point::new(x + 40, y + 14),
        ACCENT_COLOR,
    )?;

    for i in 0..3 {
        surface.draw_circle(Point::new(x + 30, y + 32), 18 + i * 6, ACCENT_COLOR)?;
    }
    Ok(())
}
