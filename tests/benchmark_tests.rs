//! Performance benchmarks for the relay hot paths

use screens_server::registry::ConnectionHandle;
use screens_server::relay::{MessageOutcome, Relay};
use screens_shared::{ClientMessage, Position, ServerMessage};
use std::net::SocketAddr;
use std::time::Instant;
use tokio::sync::mpsc;

fn test_addr() -> SocketAddr {
    "127.0.0.1:9000".parse().unwrap()
}

/// Benchmarks fan-out of one move to many screens
#[test]
fn benchmark_broadcast_fan_out() {
    let mut relay = Relay::default();
    let mut receivers = Vec::new();

    for raw in 0..1000 {
        let (tx, rx) = mpsc::unbounded_channel();
        relay
            .on_connect(ConnectionHandle::new(raw), test_addr(), tx)
            .unwrap();
        receivers.push(rx);
    }

    let payload = ClientMessage::Move {
        position: Position::new(10.0, 20.0),
        screen: 1,
    }
    .to_json()
    .unwrap();

    let iterations = 100;
    let start = Instant::now();

    for _ in 0..iterations {
        let outcome = relay
            .on_message(ConnectionHandle::new(0), &payload)
            .unwrap();
        assert_eq!(outcome, MessageOutcome::Moved { delivered: 1000 });
    }

    let duration = start.elapsed();
    println!(
        "Broadcast: {} moves × {} screens in {:?} ({:.2} μs/move)",
        iterations,
        receivers.len(),
        duration,
        duration.as_micros() as f64 / iterations as f64
    );

    // init + one update per move on every screen
    for rx in &mut receivers {
        let mut count = 0;
        while rx.try_recv().is_ok() {
            count += 1;
        }
        assert_eq!(count, iterations + 1);
    }

    // Should complete in under 5 seconds
    assert!(duration.as_millis() < 5000);
}

/// Benchmarks message encoding and decoding
#[test]
fn benchmark_message_serialization() {
    let update = ServerMessage::Update {
        ball_position: Position::new(123.456, 789.012),
        current_screen: 3,
    };
    let text = r#"{"type":"move","position":{"x":123.456,"y":789.012},"screen":3}"#;

    let iterations = 10_000;
    let start = Instant::now();

    for _ in 0..iterations {
        let encoded = update.to_json().unwrap();
        let _decoded = ServerMessage::parse(&encoded).unwrap();
        let _request = ClientMessage::parse(text).unwrap();
    }

    let duration = start.elapsed();
    println!(
        "Message serialization: {} iterations in {:?} ({:.2} μs/iter)",
        iterations,
        duration,
        duration.as_micros() as f64 / iterations as f64
    );

    // Should complete in under 2 seconds
    assert!(duration.as_millis() < 2000);
}

/// Stress tests connect/disconnect churn
#[test]
fn stress_test_connection_churn() {
    let mut relay = Relay::default();
    let start = Instant::now();

    for raw in 0..10_000u64 {
        let (tx, _rx) = mpsc::unbounded_channel();
        let id = relay
            .on_connect(ConnectionHandle::new(raw), test_addr(), tx)
            .unwrap();
        assert_eq!(u64::from(id), raw);

        if raw % 2 == 1 {
            relay.on_disconnect(ConnectionHandle::new(raw - 1));
            relay.on_disconnect(ConnectionHandle::new(raw));
        }
    }

    let duration = start.elapsed();
    println!("Connection churn: 10000 connections in {:?}", duration);

    assert!(relay.registry().is_empty());
    // Should complete in under 1 second
    assert!(duration.as_millis() < 1000);
}
