//! Host UART receive task
//!
//! Feeds received bytes through the link and queues any replies.

use defmt::*;
use embassy_rp::uart::BufferedUartRx;
use embedded_io_async::Read;

use faderflow_core::link::LinkError;

use crate::channels::{send_outbound, DISPLAY_DIRTY};
use crate::controller::{now_ms, SharedController};

/// Buffer size for UART receive
const RX_BUF_SIZE: usize = 64;

/// Serial RX task - decodes host messages
#[embassy_executor::task]
pub async fn serial_rx_task(mut rx: BufferedUartRx, controller: &'static SharedController) {
    info!("Serial RX task started");

    let mut buf = [0u8; RX_BUF_SIZE];

    loop {
        match rx.read(&mut buf).await {
            Ok(n) if n > 0 => {
                trace!("RX: {} bytes", n);

                let mut guard = controller.lock().await;
                let ctrl = &mut *guard;
                let now = now_ms();

                for &byte in &buf[..n] {
                    match ctrl.link.on_byte(byte, now, &mut ctrl.channels) {
                        Ok(Some(reply)) => {
                            debug!("Reply queued: {:?}", reply);
                            send_outbound(reply);
                        }
                        Ok(None) => {}
                        Err(e) => log_link_error(e),
                    }
                }
                drop(guard);

                DISPLAY_DIRTY.signal(());
            }
            Ok(_) => {
                // No bytes read, continue
            }
            Err(e) => {
                warn!("UART read error: {:?}", e);
            }
        }
    }
}

pub(crate) fn log_link_error(e: LinkError) {
    match e {
        LinkError::Decode(e) => warn!("Dropped byte: {:?}", e),
        LinkError::ChannelOutOfRange(ch) => warn!("Message for unknown channel {}", ch),
        LinkError::StreamTimeout => warn!("Partial message dropped"),
    }
}
