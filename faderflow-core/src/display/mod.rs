//! Per-channel display content
//!
//! Icons arrive over the host link as raw RGB565 pixel pairs and are
//! reassembled here. Rendering goes through [`Surface`], which any
//! `embedded-graphics` draw target with an RGB565 color type provides.

pub mod icon;
pub mod layout;
pub mod surface;

pub use icon::{IconAssembler, ICON_PIXELS, ICON_SIZE};
pub use surface::Surface;
