//! SocketCAN frame source
//!
//! Wraps a SocketCAN socket as an iterator of decoder frames. Remote and
//! error frames carry no signal payload and are skipped; the monitor is a
//! read-only listener.

use can_signal_decoder::CanFrame;
use socketcan::{CanSocket, EmbeddedFrame, Id, Socket};
use std::io;

/// A blocking stream of data frames from one CAN interface
pub struct CanBusSource {
    socket: CanSocket,
}

impl CanBusSource {
    /// Open a SocketCAN interface (e.g. "can0", "vcan0")
    pub fn open(channel: &str) -> io::Result<CanBusSource> {
        let socket = CanSocket::open(channel)?;
        log::info!("Listening on CAN interface '{}'", channel);
        Ok(CanBusSource { socket })
    }
}

impl Iterator for CanBusSource {
    type Item = io::Result<CanFrame>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.socket.read_frame() {
                Ok(socketcan::CanFrame::Data(frame)) => {
                    let (can_id, is_extended) = match frame.id() {
                        Id::Standard(id) => (id.as_raw() as u32, false),
                        Id::Extended(id) => (id.as_raw(), true),
                    };
                    return Some(Ok(CanFrame {
                        can_id,
                        data: frame.data().to_vec(),
                        is_extended,
                    }));
                }
                Ok(other) => {
                    log::trace!("Skipping non-data frame: {:?}", other);
                    continue;
                }
                Err(e) => return Some(Err(e)),
            }
        }
    }
}
