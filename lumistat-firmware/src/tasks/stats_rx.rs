//! UDP stats listener
//!
//! The PC-side broadcaster sends one small JSON datagram per second to
//! every host on the subnet. This task sits in `recv_from` and applies
//! whatever decodes; malformed datagrams are logged and dropped.
//! Connection staleness is not tracked here - the render task derives
//! it from the packet timestamp in the store.

use defmt::*;
use embassy_net::udp::{PacketMetadata, UdpSocket};
use embassy_net::Stack;
use embassy_time::Instant;

use lumistat_protocol::payload;

use crate::state::TELEMETRY;

/// Port the broadcaster targets
pub const STATS_PORT: u16 = 8266;

/// One datagram's worth of buffer; payloads are well under this
const RX_BUFFER_SIZE: usize = 512;

#[embassy_executor::task]
pub async fn stats_rx_task(stack: Stack<'static>) {
    let mut rx_meta = [PacketMetadata::EMPTY; 4];
    let mut rx_buffer = [0u8; RX_BUFFER_SIZE];
    let mut tx_meta = [PacketMetadata::EMPTY; 4];
    let mut tx_buffer = [0u8; 16];

    let mut socket = UdpSocket::new(
        stack,
        &mut rx_meta,
        &mut rx_buffer,
        &mut tx_meta,
        &mut tx_buffer,
    );
    unwrap!(socket.bind(STATS_PORT));
    info!("Listening for stats on UDP port {}", STATS_PORT);

    let mut buf = [0u8; RX_BUFFER_SIZE];
    loop {
        match socket.recv_from(&mut buf).await {
            Ok((len, _meta)) => match payload::decode(&buf[..len]) {
                Ok(stats) => {
                    TELEMETRY.apply_stats(&stats, Instant::now().as_millis());
                    trace!(
                        "Stats: cpu={} mem={} gpu={}",
                        stats.cpu,
                        stats.mem,
                        stats.gpu
                    );
                }
                Err(e) => {
                    warn!("Dropping undecodable stats datagram: {:?}", e);
                }
            },
            Err(e) => {
                warn!("UDP receive error: {:?}", e);
            }
        }
    }
}
