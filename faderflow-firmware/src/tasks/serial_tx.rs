//! Host UART transmit task
//!
//! Drains the outbound queue onto the wire.

use defmt::*;
use embassy_rp::uart::BufferedUartTx;
use embedded_io_async::Write;

use faderflow_protocol::Outbound;

use crate::channels::OUTBOUND;

/// Serial TX task - writes queued messages to the host
#[embassy_executor::task]
pub async fn serial_tx_task(mut tx: BufferedUartTx) {
    info!("Serial TX task started");

    loop {
        let msg = OUTBOUND.receive().await;
        send(&mut tx, &msg).await;
    }
}

async fn send(tx: &mut BufferedUartTx, msg: &Outbound) {
    let bytes = match msg.encode_to_vec() {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!("Failed to encode {:?}: {:?}", msg, e);
            return;
        }
    };

    if let Err(e) = tx.write_all(&bytes).await {
        warn!("UART write error: {:?}", e);
    } else {
        trace!("TX: {} bytes", bytes.len());
    }
}
