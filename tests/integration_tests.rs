//! Integration tests for the relay and client crates
//!
//! These tests run a real relay on a loopback port and drive it with real
//! WebSocket clients.

use assert_approx_eq::assert_approx_eq;
use screens_client::{RelayClient, ScreenView};
use screens_server::network::Server;
use screens_server::registry::IdAssignment;
use screens_server::relay::RelayConfig;
use screens_shared::{Position, ServerMessage, INITIAL_POSITION};
use std::time::Duration;
use tokio::time::timeout;

const WAIT: Duration = Duration::from_secs(5);

async fn start_relay(config: RelayConfig) -> String {
    let server = Server::bind("127.0.0.1:0", config)
        .await
        .expect("Failed to bind relay");
    let url = format!("ws://{}", server.local_addr());
    tokio::spawn(server.run());
    url
}

async fn connect(url: &str) -> (RelayClient, ServerMessage) {
    timeout(WAIT, RelayClient::connect(url))
        .await
        .expect("Timed out connecting")
        .expect("Failed to connect")
}

async fn recv(client: &mut RelayClient) -> ServerMessage {
    timeout(WAIT, client.next_message())
        .await
        .expect("Timed out waiting for message")
        .expect("Failed to read message")
        .expect("Relay closed the connection")
}

/// CONNECTION LIFECYCLE TESTS
mod lifecycle_tests {
    use super::*;

    /// Two screens connect, one moves the ball, both see it
    #[tokio::test]
    async fn two_screens_share_a_move() {
        let url = start_relay(RelayConfig::default()).await;

        let (mut a, init_a) = connect(&url).await;
        assert_eq!(
            init_a,
            ServerMessage::Init {
                id: 0,
                ball_position: INITIAL_POSITION,
                current_screen: 0,
            }
        );

        let (mut b, init_b) = connect(&url).await;
        assert_eq!(
            init_b,
            ServerMessage::Init {
                id: 1,
                ball_position: INITIAL_POSITION,
                current_screen: 0,
            }
        );

        a.send_move(Position::new(10.0, 20.0), 2).await.unwrap();

        let expected = ServerMessage::Update {
            ball_position: Position::new(10.0, 20.0),
            current_screen: 2,
        };
        assert_eq!(recv(&mut a).await, expected);
        assert_eq!(recv(&mut b).await, expected);
    }

    /// A late joiner is initialised with the latest ball
    #[tokio::test]
    async fn late_joiner_sees_current_ball() {
        let url = start_relay(RelayConfig::default()).await;

        let (mut a, _) = connect(&url).await;
        a.send_move(Position::new(75.0, 12.5), 3).await.unwrap();
        recv(&mut a).await;

        let (b, init) = connect(&url).await;
        let mut view = ScreenView::new();
        view.apply(&init);

        assert_eq!(b.id(), 1);
        assert_eq!(view.id, Some(1));
        assert_approx_eq!(view.ball.x, 75.0);
        assert_approx_eq!(view.ball.y, 12.5);
        assert!(view.is_showing_ball(3));
    }

    /// Identifiers keep increasing across disconnects
    #[tokio::test]
    async fn identifiers_are_not_reused() {
        let url = start_relay(RelayConfig {
            id_assignment: IdAssignment::Sequential,
            ..RelayConfig::default()
        })
        .await;

        let (a, _) = connect(&url).await;
        let (b, _) = connect(&url).await;
        assert_eq!((a.id(), b.id()), (0, 1));

        tokio_test::assert_ok!(b.close().await);
        let (c, _) = connect(&url).await;
        assert_eq!(c.id(), 2);
    }

    /// A closed screen stops counting and the rest keep working
    #[tokio::test]
    async fn remaining_screens_keep_receiving_after_disconnect() {
        let url = start_relay(RelayConfig::default()).await;

        let (mut a, _) = connect(&url).await;
        let (b, _) = connect(&url).await;
        let (mut c, _) = connect(&url).await;
        b.close().await.unwrap();

        c.send_move(Position::new(1.0, 1.0), 1).await.unwrap();
        assert_eq!(recv(&mut a).await.current_screen(), 1);
        assert_eq!(recv(&mut c).await.current_screen(), 1);
    }
}

/// MESSAGE HANDLING TESTS
mod message_tests {
    use super::*;

    /// Unknown message types produce nothing
    #[tokio::test]
    async fn ping_is_ignored() {
        let url = start_relay(RelayConfig::default()).await;

        let (mut a, _) = connect(&url).await;
        let (mut b, _) = connect(&url).await;

        a.send_text(r#"{"type":"ping"}"#).await.unwrap();
        b.send_move(Position::new(5.0, 6.0), 1).await.unwrap();

        // The first thing either screen hears is the move, not a reply to ping
        for client in [&mut a, &mut b] {
            assert_eq!(
                recv(client).await,
                ServerMessage::Update {
                    ball_position: Position::new(5.0, 6.0),
                    current_screen: 1,
                }
            );
        }

        // Nor does anything follow it
        let extra = timeout(Duration::from_millis(200), a.next_message()).await;
        assert!(extra.is_err(), "ping must not produce a reply");
    }

    /// Invalid JSON fails the message, not the connection
    #[tokio::test]
    async fn malformed_message_keeps_connection_open() {
        let url = start_relay(RelayConfig::default()).await;

        let (mut a, _) = connect(&url).await;
        let (mut b, _) = connect(&url).await;

        a.send_text("{this is not json").await.unwrap();
        a.send_text(r#"{"type":"move","position":{"x":"left"},"screen":0}"#)
            .await
            .unwrap();
        a.send_move(Position::new(30.0, 40.0), 0).await.unwrap();

        assert_eq!(recv(&mut a).await.ball_position(), Position::new(30.0, 40.0));
        assert_eq!(recv(&mut b).await.ball_position(), Position::new(30.0, 40.0));
    }

    /// Repeating a move repeats the broadcast
    #[tokio::test]
    async fn repeated_move_broadcasts_twice() {
        let url = start_relay(RelayConfig::default()).await;

        let (mut a, _) = connect(&url).await;
        let (mut b, _) = connect(&url).await;

        a.send_move(Position::new(8.0, 9.0), 1).await.unwrap();
        a.send_move(Position::new(8.0, 9.0), 1).await.unwrap();

        let first = recv(&mut b).await;
        let second = recv(&mut b).await;
        assert_eq!(first, second);
        assert_eq!(recv(&mut a).await, first);
        assert_eq!(recv(&mut a).await, first);
    }

    /// Moves to a screen that does not exist are rejected
    #[tokio::test]
    async fn out_of_range_screen_is_rejected() {
        let url = start_relay(RelayConfig {
            screen_count: Some(3),
            ..RelayConfig::default()
        })
        .await;

        let (mut a, _) = connect(&url).await;
        a.send_move(Position::new(1.0, 1.0), 7).await.unwrap();
        a.send_move(Position::new(1.0, 1.0), -2).await.unwrap();
        a.send_move(Position::new(2.0, 2.0), 2).await.unwrap();

        let update = recv(&mut a).await;
        assert_eq!(update.ball_position(), Position::new(2.0, 2.0));
        assert_eq!(update.current_screen(), 2);
    }
}
