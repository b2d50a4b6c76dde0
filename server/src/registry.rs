//! Connection bookkeeping for the relay
//!
//! This module tracks which screens are currently connected:
//! - Identifier assignment when a connection opens
//! - Removal by connection identity when it closes
//! - The ordered list of broadcast targets
//!
//! A [`ConnectionHandle`] is the identity of one socket and is never reused.
//! The client-visible identifier is separate and follows the configured
//! [`IdAssignment`] policy.

use log::info;
use std::fmt;
use std::net::SocketAddr;
use std::time::{Duration, Instant};
use tokio::sync::mpsc::UnboundedSender;
use tokio_tungstenite::tungstenite::Message;

/// Process-unique identity of one accepted socket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionHandle(u64);

impl ConnectionHandle {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for ConnectionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// How identifiers are handed out to new connections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum IdAssignment {
    /// Monotonic counter starting at 0, never reused
    #[default]
    Sequential,
    /// Number of registered connections at connect time. Two live
    /// connections can end up sharing an id after disconnects.
    RegistrySize,
}

/// A registered connection and its outbound channel
///
/// The sender feeds the connection's writer task. Dropping the entry drops
/// the sender, which lets the writer drain and close.
#[derive(Debug)]
pub struct Connection {
    /// Socket identity used for removal
    pub handle: ConnectionHandle,
    /// Identifier reported to the client in its init message
    pub id: u32,
    /// Peer address, for logging
    pub addr: SocketAddr,
    /// When the connection was registered
    pub connected_at: Instant,
    sender: UnboundedSender<Message>,
}

impl Connection {
    pub fn new(
        handle: ConnectionHandle,
        id: u32,
        addr: SocketAddr,
        sender: UnboundedSender<Message>,
    ) -> Self {
        Self {
            handle,
            id,
            addr,
            connected_at: Instant::now(),
            sender,
        }
    }

    /// Queues a text frame for this connection.
    ///
    /// Returns false if the writer side has already gone away.
    pub fn send(&self, text: &str) -> bool {
        self.sender.send(Message::Text(text.to_string())).is_ok()
    }

    pub fn session_length(&self) -> Duration {
        self.connected_at.elapsed()
    }
}

/// Ordered set of open connections
pub struct ConnectionRegistry {
    connections: Vec<Connection>,
    next_id: u32,
    id_assignment: IdAssignment,
}

impl ConnectionRegistry {
    pub fn new(id_assignment: IdAssignment) -> Self {
        Self {
            connections: Vec::new(),
            next_id: 0,
            id_assignment,
        }
    }

    /// Appends a connection and returns the identifier assigned to it.
    pub fn register(
        &mut self,
        handle: ConnectionHandle,
        addr: SocketAddr,
        sender: UnboundedSender<Message>,
    ) -> u32 {
        let id = match self.id_assignment {
            IdAssignment::Sequential => {
                let id = self.next_id;
                self.next_id = self.next_id.wrapping_add(1);
                id
            }
            IdAssignment::RegistrySize => self.connections.len() as u32,
        };

        self.connections.push(Connection::new(handle, id, addr, sender));
        info!(
            "New client {} connected from {}. Total clients: {}",
            id,
            addr,
            self.connections.len()
        );

        id
    }

    /// Removes the first entry with the given handle.
    ///
    /// Unknown handles are ignored.
    pub fn deregister(&mut self, handle: ConnectionHandle) -> Option<Connection> {
        let index = self
            .connections
            .iter()
            .position(|connection| connection.handle == handle)?;
        let connection = self.connections.remove(index);

        info!(
            "Client {} disconnected after {:.1}s. Total clients: {}",
            connection.id,
            connection.session_length().as_secs_f64(),
            self.connections.len()
        );

        Some(connection)
    }

    pub fn find(&self, handle: ConnectionHandle) -> Option<&Connection> {
        self.connections
            .iter()
            .find(|connection| connection.handle == handle)
    }

    /// All registered connections, in registration order
    pub fn broadcast_targets(&self) -> &[Connection] {
        &self.connections
    }

    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }
}

impl Default for ConnectionRegistry {
    fn default() -> Self {
        Self::new(IdAssignment::default())
    }
}
