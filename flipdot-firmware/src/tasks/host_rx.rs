//! Host link receive task
//!
//! Receives frames from the host bridge and queues them for the
//! controller.

use defmt::*;
use embassy_rp::uart::BufferedUartRx;
use embedded_io_async::Read;
use heapless::String;

use flipdot_protocol::{DisplayReply, Frame, FrameParser, HostMessage};

use crate::channels::{Command, COMMANDS, REPLIES};

/// Buffer size for UART receive
const RX_BUF_SIZE: usize = 64;

/// Host RX task - receives and parses frames from the host bridge
#[embassy_executor::task]
pub async fn host_rx_task(mut rx: BufferedUartRx) {
    info!("Host RX task started");

    let mut parser = FrameParser::new();
    let mut buf = [0u8; RX_BUF_SIZE];

    loop {
        match rx.read(&mut buf).await {
            Ok(n) if n > 0 => {
                trace!("RX: {} bytes", n);

                for result in parser.frames(&buf[..n]) {
                    match result {
                        Ok(frame) => handle_frame(&frame),
                        Err(e) => warn!("Frame parse error: {:?}", e),
                    }
                }
            }
            Ok(_) => {}
            Err(e) => {
                warn!("UART read error: {:?}", e);
                parser.reset();
            }
        }
    }
}

fn handle_frame(frame: &Frame) {
    let reply = match HostMessage::from_frame(frame) {
        Ok(HostMessage::Ping) => {
            trace!("PING received");
            DisplayReply::Pong
        }
        Ok(message) => {
            let msg_type = message.msg_type();
            match to_command(message) {
                Some(command) if COMMANDS.try_send(command).is_ok() => {
                    DisplayReply::Ack { msg_type }
                }
                Some(_) => {
                    warn!("Command channel full, dropping message {=u8:#x}", msg_type);
                    DisplayReply::Nack { msg_type }
                }
                None => {
                    warn!("Message {=u8:#x} does not fit the display", msg_type);
                    DisplayReply::Nack { msg_type }
                }
            }
        }
        Err(e) => {
            warn!("Bad host message {=u8:#x}: {:?}", frame.msg_type, e);
            DisplayReply::Nack {
                msg_type: frame.msg_type,
            }
        }
    };

    if REPLIES.try_send(reply).is_err() {
        warn!("Reply channel full");
    }
}

/// Owned command for a borrowed message, `None` if it cannot be queued
fn to_command(message: HostMessage<'_>) -> Option<Command> {
    let command = match message {
        HostMessage::Pixels(pixels) => Command::Pixels(pixels),
        HostMessage::SetMode(mode) => Command::SetMode(mode),
        HostMessage::Text(text) => Command::Text(String::try_from(text).ok()?),
        HostMessage::Time(time) => Command::Time(time),
        HostMessage::Solar(stats) => Command::Solar(stats),
        HostMessage::ClientConnected => Command::ClientConnected,
        HostMessage::ClientDisconnected => Command::ClientDisconnected,
        HostMessage::Angle(reading) => Command::Angle(reading),
        HostMessage::Ping => return None,
    };
    Some(command)
}
