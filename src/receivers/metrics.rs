//! UDP receive loop for agent readings.
//!
//! The metrics channel is explicitly best-effort: no acknowledgement, no
//! retry, no ordering guarantee. Loss and duplication are acceptable;
//! a duplicate reading simply overwrites the registry entry with the same
//! value and adds one more history line.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::UdpSocket;
use tracing::{error, info, instrument, trace, warn};

use crate::codec;
use crate::registry::LiveRegistry;
use crate::storage::HistoryStore;

/// Receive buffer size; anything longer is truncated and fails to decode
const MAX_DATAGRAM_SIZE: usize = 8192;

/// Listener for the fire-and-forget metrics channel
pub struct MetricsReceiver {
    socket: UdpSocket,
    registry: LiveRegistry,
    history: Arc<HistoryStore>,
}

impl MetricsReceiver {
    /// Bind the UDP socket. A bind failure here aborts startup.
    pub async fn bind(
        addr: SocketAddr,
        registry: LiveRegistry,
        history: Arc<HistoryStore>,
    ) -> anyhow::Result<Self> {
        let socket = UdpSocket::bind(addr)
            .await
            .map_err(|e| anyhow::anyhow!("failed to bind metrics socket on {addr}: {e}"))?;

        info!("metrics receiver listening on {}", socket.local_addr()?);

        Ok(Self {
            socket,
            registry,
            history,
        })
    }

    pub fn local_addr(&self) -> anyhow::Result<SocketAddr> {
        Ok(self.socket.local_addr()?)
    }

    /// Receive loop. One datagram is one unit of work: a datagram that
    /// fails to decode is dropped and the loop keeps running.
    #[instrument(skip(self))]
    pub async fn run(self) {
        let mut buf = [0u8; MAX_DATAGRAM_SIZE];

        loop {
            let (len, peer) = match self.socket.recv_from(&mut buf).await {
                Ok(received) => received,
                Err(e) => {
                    error!("metrics socket receive error: {e}");
                    continue;
                }
            };

            let reading = match codec::decode(&buf[..len]) {
                Ok(reading) => reading,
                Err(e) => {
                    warn!("dropping undecodable datagram ({len} bytes) from {peer}: {e}");
                    continue;
                }
            };

            trace!("received reading for {} from {peer}", reading.agent_id);

            self.registry.upsert(reading.clone()).await;

            // Live visibility does not depend on durability: the registry
            // update above stands even when this append fails.
            if let Err(e) = self.history.append(&reading).await {
                error!("failed to persist reading for {}: {e}", reading.agent_id);
            }
        }
    }
}
