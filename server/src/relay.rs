//! The relay: connection registry plus the shared ball, driven one event at a time

use crate::error::RelayError;
use crate::registry::{Connection, ConnectionHandle, ConnectionRegistry, IdAssignment};
use crate::state::{validate_move, SharedState};
use log::{debug, info, warn};
use screens_shared::{ClientMessage, ServerMessage};
use std::net::SocketAddr;
use tokio::sync::mpsc::UnboundedSender;
use tokio_tungstenite::tungstenite::Message;

/// Relay settings taken from the command line
#[derive(Debug, Clone, Copy, Default)]
pub struct RelayConfig {
    /// Number of screens, if known. Moves to a screen outside `0..screen_count`
    /// are rejected.
    pub screen_count: Option<u32>,
    pub id_assignment: IdAssignment,
}

/// Connection lifecycle events, produced by the per-connection tasks
#[derive(Debug)]
pub enum RelayEvent {
    Connected {
        handle: ConnectionHandle,
        addr: SocketAddr,
        sender: UnboundedSender<Message>,
    },
    Text {
        handle: ConnectionHandle,
        text: String,
    },
    Disconnected {
        handle: ConnectionHandle,
    },
}

/// What an incoming message did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageOutcome {
    /// The ball moved and an update went out to `delivered` connections
    Moved { delivered: usize },
    /// Not a move; nothing changed
    Ignored,
}

/// Owns the registry and the shared state.
///
/// Every mutation goes through `on_connect`, `on_message` and
/// `on_disconnect`, called from a single event loop.
pub struct Relay {
    registry: ConnectionRegistry,
    state: SharedState,
    screen_count: Option<u32>,
}

impl Relay {
    pub fn new(config: RelayConfig) -> Self {
        Self {
            registry: ConnectionRegistry::new(config.id_assignment),
            state: SharedState::new(),
            screen_count: config.screen_count,
        }
    }

    pub fn state(&self) -> &SharedState {
        &self.state
    }

    pub fn registry(&self) -> &ConnectionRegistry {
        &self.registry
    }

    /// Registers a new connection and sends it the current ball.
    ///
    /// Only the new connection hears about it. Shared state is untouched.
    pub fn on_connect(
        &mut self,
        handle: ConnectionHandle,
        addr: SocketAddr,
        sender: UnboundedSender<Message>,
    ) -> Result<u32, RelayError> {
        let id = self.registry.register(handle, addr, sender);
        let init = self
            .state
            .init_message(id)
            .to_json()
            .map_err(RelayError::Encode)?;

        if let Some(connection) = self.registry.find(handle) {
            if !connection.send(&init) {
                warn!("Failed to send init to client {}", id);
            }
        }

        Ok(id)
    }

    /// Applies one text payload from a connection.
    ///
    /// A `move` overwrites the ball and broadcasts it. Other message types are
    /// ignored. Errors only concern this message: state is left as it was.
    pub fn on_message(
        &mut self,
        handle: ConnectionHandle,
        text: &str,
    ) -> Result<MessageOutcome, RelayError> {
        let id = self
            .registry
            .find(handle)
            .map(|connection| connection.id)
            .ok_or(RelayError::UnknownConnection(handle))?;

        match ClientMessage::parse(text)? {
            ClientMessage::Move { position, screen } => {
                let (position, screen) = validate_move(position, screen, self.screen_count)?;
                self.state.apply_move(position, screen);
                info!(
                    "Ball moved to position ({}, {}) on screen {} by client {}",
                    position.x, position.y, screen, id
                );

                let delivered = self.broadcast()?;
                Ok(MessageOutcome::Moved { delivered })
            }
            ClientMessage::Other => {
                debug!("Ignoring message from client {}: {}", id, text);
                Ok(MessageOutcome::Ignored)
            }
        }
    }

    /// Sends the current ball to every registered connection, sender included.
    ///
    /// Each target is independent: a failed send is logged and the rest still
    /// get the update. Returns how many sends succeeded.
    pub fn broadcast(&self) -> Result<usize, RelayError> {
        let update = self
            .state
            .update_message()
            .to_json()
            .map_err(RelayError::Encode)?;

        let mut delivered = 0;
        for connection in self.registry.broadcast_targets() {
            if connection.send(&update) {
                delivered += 1;
            } else {
                warn!(
                    "Failed to send update to client {} at {}",
                    connection.id, connection.addr
                );
            }
        }

        Ok(delivered)
    }

    pub fn on_disconnect(&mut self, handle: ConnectionHandle) -> Option<Connection> {
        self.registry.deregister(handle)
    }

    /// Dispatches one event, logging any failure against its connection.
    pub fn handle_event(&mut self, event: RelayEvent) {
        match event {
            RelayEvent::Connected {
                handle,
                addr,
                sender,
            } => {
                if let Err(e) = self.on_connect(handle, addr, sender) {
                    warn!("Failed to initialise connection {} from {}: {}", handle, addr, e);
                }
            }
            RelayEvent::Text { handle, text } => {
                if let Err(e) = self.on_message(handle, &text) {
                    warn!("Rejected message from connection {}: {}", handle, e);
                }
            }
            RelayEvent::Disconnected { handle } => {
                self.on_disconnect(handle);
            }
        }
    }
}

impl Default for Relay {
    fn default() -> Self {
        Self::new(RelayConfig::default())
    }
}
