//! TCP accept loop for alert submissions.
//!
//! Protocol: the submitter opens a connection, writes one line of text,
//! and may close. The receiver reads at most that one line, stamps it
//! with the server-side receipt time, and appends it to the alert log.
//! No response is sent and the connection is not reused.

use std::net::SocketAddr;

use chrono::Utc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, error, info, instrument, warn};

use crate::alerts::AlertLog;
use crate::storage::schema::LINE_TIME_FORMAT;

/// Listener for the reliable alert channel
pub struct AlertReceiver {
    listener: TcpListener,
    alerts: AlertLog,
}

impl AlertReceiver {
    /// Bind the TCP listener. A bind failure here aborts startup.
    pub async fn bind(addr: SocketAddr, alerts: AlertLog) -> anyhow::Result<Self> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| anyhow::anyhow!("failed to bind alert listener on {addr}: {e}"))?;

        info!("alert receiver listening on {}", listener.local_addr()?);

        Ok(Self { listener, alerts })
    }

    pub fn local_addr(&self) -> anyhow::Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Accept loop. Every connection is handled in its own task so a slow
    /// or silent sender never blocks acceptance of the next one.
    #[instrument(skip(self))]
    pub async fn run(self) {
        loop {
            let (stream, peer) = match self.listener.accept().await {
                Ok(accepted) => accepted,
                Err(e) => {
                    error!("alert accept error: {e}");
                    continue;
                }
            };

            debug!("alert connection from {peer}");

            let alerts = self.alerts.clone();
            tokio::spawn(async move {
                if let Err(e) = handle_connection(stream, alerts).await {
                    warn!("alert connection from {peer} failed: {e}");
                }
            });
        }
    }
}

/// Read at most one line and append it to the alert log.
///
/// A connection that closes without sending any bytes leaves no record.
/// An unterminated line is appended once end-of-stream is observed.
async fn handle_connection(stream: TcpStream, alerts: AlertLog) -> std::io::Result<()> {
    let mut reader = BufReader::new(stream);
    let mut line = String::new();

    let read = reader.read_line(&mut line).await?;
    if read == 0 {
        debug!("alert connection closed without data");
        return Ok(());
    }

    let message = line.trim_end_matches(['\r', '\n']);
    let entry = format!(
        "[CRITICAL ALERT] {message} at {}",
        Utc::now().format(LINE_TIME_FORMAT)
    );

    info!("{entry}");
    alerts.push(entry).await;

    Ok(())
}
