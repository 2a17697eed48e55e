//! Host link transmit task
//!
//! Sends replies queued by the RX task back to the host bridge.

use defmt::*;
use embassy_rp::uart::BufferedUartTx;
use embedded_io_async::Write;

use crate::channels::REPLIES;

/// Host TX task - writes reply frames
#[embassy_executor::task]
pub async fn host_tx_task(mut tx: BufferedUartTx) {
    info!("Host TX task started");

    loop {
        let reply = REPLIES.receive().await;

        let bytes = match reply.to_frame().and_then(|frame| frame.encode_to_vec()) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!("Failed to encode reply: {:?}", e);
                continue;
            }
        };

        if let Err(e) = tx.write_all(&bytes).await {
            warn!("Failed to send reply: {:?}", e);
        } else {
            trace!("Reply sent: {:?}", reply);
        }
    }
}
