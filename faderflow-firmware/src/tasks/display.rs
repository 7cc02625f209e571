//! Display task
//!
//! Repaints the areas of each channel screen that changed.

use defmt::*;

use crate::channels::DISPLAY_DIRTY;
use crate::controller::{SharedController, CHANNEL_COUNT};
use crate::display::LoggingSurface;

/// Display task - redraws dirty screen areas when signalled
#[embassy_executor::task]
pub async fn display_task(controller: &'static SharedController) {
    info!("Display task started");

    let mut surfaces: [LoggingSurface; CHANNEL_COUNT] =
        core::array::from_fn(|i| LoggingSurface::new(i as u8));

    loop {
        DISPLAY_DIRTY.wait().await;

        let mut ctrl = controller.lock().await;
        for (channel, surface) in ctrl.channels.iter_mut().zip(surfaces.iter_mut()) {
            let dirty = channel.take_dirty();
            if !dirty.any() {
                continue;
            }
            trace!("Channel {} dirty: {:?}", channel.id(), dirty);
            // Infallible surface
            let _ = channel.render_dirty(surface, dirty);
            surface.flush();
        }
    }
}
