//! Server network layer handling WebSocket connections and the relay event loop

use crate::registry::ConnectionHandle;
use crate::relay::{Relay, RelayConfig, RelayEvent};
use futures_util::{SinkExt, StreamExt};
use log::{debug, error, info, warn};
use std::io;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio_tungstenite::accept_async;
use tokio_tungstenite::tungstenite::Message;

/// Listens for screens and feeds their events into a single relay loop
pub struct Server {
    listener: TcpListener,
    relay: Relay,
    local_addr: SocketAddr,

    events_tx: mpsc::UnboundedSender<RelayEvent>,
    events_rx: mpsc::UnboundedReceiver<RelayEvent>,
}

impl Server {
    pub async fn bind(addr: &str, config: RelayConfig) -> io::Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        let local_addr = listener.local_addr()?;
        info!("WebSocket server is running on ws://{}", local_addr);

        let (events_tx, events_rx) = mpsc::unbounded_channel();

        Ok(Server {
            listener,
            relay: Relay::new(config),
            local_addr,
            events_tx,
            events_rx,
        })
    }

    /// The address actually bound, which differs from the requested one
    /// when port 0 was asked for.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Spawns task that accepts sockets and starts a task per connection
    fn spawn_acceptor(listener: TcpListener, events_tx: mpsc::UnboundedSender<RelayEvent>) {
        tokio::spawn(async move {
            let mut next_handle = 0u64;

            loop {
                match listener.accept().await {
                    Ok((stream, addr)) => {
                        let handle = ConnectionHandle::new(next_handle);
                        next_handle += 1;
                        debug!("Accepted socket {} from {}", handle, addr);

                        tokio::spawn(handle_connection(stream, addr, handle, events_tx.clone()));
                    }
                    Err(e) => {
                        error!("Error accepting connection: {}", e);
                        tokio::time::sleep(Duration::from_millis(10)).await;
                    }
                }
            }
        });
    }

    /// Runs the relay loop.
    ///
    /// Connection tasks only do I/O. Every registry and state change happens
    /// here, one event at a time.
    pub async fn run(self) {
        let Server {
            listener,
            mut relay,
            events_tx,
            mut events_rx,
            ..
        } = self;

        Self::spawn_acceptor(listener, events_tx);

        while let Some(event) = events_rx.recv().await {
            relay.handle_event(event);
        }

        info!("Relay shutting down");
    }
}

/// Drives one socket: handshake, a writer task, then the read loop.
async fn handle_connection(
    stream: TcpStream,
    addr: SocketAddr,
    handle: ConnectionHandle,
    events_tx: mpsc::UnboundedSender<RelayEvent>,
) {
    let ws_stream = match accept_async(stream).await {
        Ok(ws) => ws,
        Err(e) => {
            warn!("WebSocket handshake failed for {}: {}", addr, e);
            return;
        }
    };

    let (mut ws_sender, mut ws_receiver) = ws_stream.split();
    let (tx, mut rx) = mpsc::unbounded_channel::<Message>();

    if events_tx
        .send(RelayEvent::Connected {
            handle,
            addr,
            sender: tx,
        })
        .is_err()
    {
        error!("Relay loop is gone, dropping connection from {}", addr);
        return;
    }

    // Ends once the registry drops the sender or the socket stops accepting writes
    tokio::spawn(async move {
        while let Some(message) = rx.recv().await {
            if let Err(e) = ws_sender.send(message).await {
                warn!("Failed to write to {}: {}", addr, e);
                break;
            }
        }
        let _ = ws_sender.close().await;
    });

    while let Some(result) = ws_receiver.next().await {
        match result {
            Ok(Message::Text(text)) => {
                if events_tx.send(RelayEvent::Text { handle, text }).is_err() {
                    break;
                }
            }
            Ok(Message::Binary(data)) => {
                debug!("Ignoring {} byte binary frame from {}", data.len(), addr);
            }
            Ok(Message::Close(_)) => break,
            Ok(_) => {}
            Err(e) => {
                warn!("WebSocket error from {}: {}", addr, e);
                break;
            }
        }
    }

    let _ = events_tx.send(RelayEvent::Disconnected { handle });
}
