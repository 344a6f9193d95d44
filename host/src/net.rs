use quinn::{Connection, ConnectionError};
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, error, trace};

use common::net::MessageChannel;
use common::protocol::{ClientEnvelope, ClientMessage};

// ============================================================================
// Client Receive Task
// ============================================================================

// Pump every inbound message from the one connected peer into the session's
// mailbox channel. Reliable streams carry GameOver; datagrams carry the
// steady Input flow. The task never touches simulation state directly — the
// tick loop drains the channel once per tick.
pub async fn client_receive_task(connection: Connection, to_session: UnboundedSender<ClientMessage>) {
    let channel = MessageChannel::new(&connection);

    loop {
        let result = tokio::select! {
            reliable = channel.recv_reliable::<ClientEnvelope>() => reliable,
            datagram = channel.recv_unreliable::<ClientEnvelope>() => datagram,
        };

        match result {
            Ok(envelope) => {
                trace!("received from client: {:?}", envelope.msg);
                if to_session.send(envelope.msg).is_err() {
                    debug!("session gone, receive task exiting");
                    return;
                }
            }
            Err(err) => {
                if let Some(conn_err) = err.downcast_ref::<ConnectionError>() {
                    match conn_err {
                        ConnectionError::ApplicationClosed { .. } => debug!("client closed connection"),
                        ConnectionError::TimedOut => debug!("client timed out"),
                        ConnectionError::LocallyClosed => debug!("connection locally closed"),
                        _ => error!("connection error: {err}"),
                    }
                } else {
                    error!("error receiving from client: {err}");
                }
                return;
            }
        }
    }
}

// Milliseconds since the unix epoch, for message envelopes only — the
// simulation itself never reads the wall clock.
#[must_use]
pub fn wall_clock_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map_or(0, |d| d.as_millis() as u64)
}
