use quinn::{Connection, ConnectionError};
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, error, trace};

use common::net::MessageChannel;
use common::protocol::{HostEnvelope, HostMessage};

// ============================================================================
// Host Receive Task
// ============================================================================

// Forward everything the host sends into the game loop's mailbox. Init and
// GameOver arrive on reliable streams, State snapshots as datagrams; the
// select below drains both without caring which came first.
pub async fn host_receive_task(connection: Connection, to_game: UnboundedSender<HostMessage>) {
    let channel = MessageChannel::new(&connection);

    loop {
        let result = tokio::select! {
            reliable = channel.recv_reliable::<HostEnvelope>() => reliable,
            datagram = channel.recv_unreliable::<HostEnvelope>() => datagram,
        };

        match result {
            Ok(envelope) => {
                trace!("received from host: {:?}", envelope.msg);
                if to_game.send(envelope.msg).is_err() {
                    debug!("game loop gone, receive task exiting");
                    return;
                }
            }
            Err(err) => {
                if let Some(conn_err) = err.downcast_ref::<ConnectionError>() {
                    match conn_err {
                        ConnectionError::ApplicationClosed { .. } => debug!("host closed connection"),
                        ConnectionError::TimedOut => debug!("host timed out"),
                        ConnectionError::LocallyClosed => debug!("connection locally closed"),
                        _ => error!("connection error: {err}"),
                    }
                } else {
                    error!("error receiving from host: {err}");
                }
                return;
            }
        }
    }
}

// Envelope timestamps only; the game state never reads the wall clock.
#[must_use]
pub fn wall_clock_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map_or(0, |d| d.as_millis() as u64)
}
