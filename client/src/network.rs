use futures_util::{SinkExt, StreamExt};
use log::{debug, info};
use screens_shared::{ClientMessage, Position, ServerMessage};
use thiserror::Error;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::{self, Message};
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tungstenite::Error),

    #[error("Invalid message from relay: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Expected init message, got {0:?}")]
    UnexpectedMessage(ServerMessage),

    #[error("Relay closed the connection")]
    Closed,
}

/// One screen's connection to the relay
pub struct RelayClient {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
    id: u32,
}

impl RelayClient {
    /// Connects and waits for the relay's `init` message.
    ///
    /// The init message is returned alongside the client so callers can
    /// seed their view of the ball.
    pub async fn connect(url: &str) -> Result<(Self, ServerMessage), ClientError> {
        info!("Connecting to {}", url);
        let (stream, _) = connect_async(url).await?;

        let mut client = RelayClient { stream, id: 0 };
        let Some(init) = client.next_message().await? else {
            return Err(ClientError::Closed);
        };

        if let ServerMessage::Init { id, .. } = init {
            info!("Connected! Client ID: {}", id);
            client.id = id;
            Ok((client, init))
        } else {
            Err(ClientError::UnexpectedMessage(init))
        }
    }

    /// Identifier the relay assigned to this connection
    pub fn id(&self) -> u32 {
        self.id
    }

    pub async fn send_move(&mut self, position: Position, screen: i64) -> Result<(), ClientError> {
        let text = ClientMessage::Move { position, screen }.to_json()?;
        self.send_text(&text).await
    }

    /// Sends a raw text frame, valid protocol or not.
    pub async fn send_text(&mut self, text: &str) -> Result<(), ClientError> {
        self.stream.send(Message::Text(text.to_string())).await?;
        Ok(())
    }

    /// Waits for the next relay message. Returns `None` once the relay closes.
    pub async fn next_message(&mut self) -> Result<Option<ServerMessage>, ClientError> {
        while let Some(frame) = self.stream.next().await {
            match frame? {
                Message::Text(text) => return Ok(Some(ServerMessage::parse(&text)?)),
                Message::Close(_) => return Ok(None),
                other => debug!("Skipping non-text frame: {:?}", other),
            }
        }

        Ok(None)
    }

    pub async fn close(mut self) -> Result<(), ClientError> {
        self.stream.close(None).await?;
        Ok(())
    }
}
