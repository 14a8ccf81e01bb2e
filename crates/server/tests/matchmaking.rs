//! End-to-end tests over real TCP connections.

use std::net::SocketAddr;
use std::time::Duration;

use duel_content::ContentFactory;
use duel_core::{Phase, ResultReason, Side, Winner};
use duel_server::transport::MAX_LINE_BYTES;
use duel_server::{
    DuelServer, FixedSeed, MatchSettings, ServerConfig, ServerMessage, serve,
};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::net::{TcpListener, TcpStream};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};

const RECV_TIMEOUT: Duration = Duration::from_secs(5);

struct TestClient {
    lines: Lines<BufReader<OwnedReadHalf>>,
    writer: OwnedWriteHalf,
}

impl TestClient {
    async fn connect(addr: SocketAddr) -> Self {
        let stream = TcpStream::connect(addr).await.expect("connect");
        let (reader, writer) = stream.into_split();
        let mut client = Self {
            lines: BufReader::new(reader).lines(),
            writer,
        };
        match client.recv().await {
            ServerMessage::Connected { client_id, version } => {
                assert!(client_id.starts_with("client_"));
                assert_eq!(version, "1.0.0");
            }
            other => panic!("expected CONNECTED, got {other:?}"),
        }
        client
    }

    async fn send(&mut self, line: &str) {
        self.writer
            .write_all(format!("{line}\n").as_bytes())
            .await
            .expect("write");
    }

    async fn send_raw(&mut self, bytes: &[u8]) {
        self.writer.write_all(bytes).await.expect("write");
    }

    async fn recv(&mut self) -> ServerMessage {
        let line = tokio::time::timeout(RECV_TIMEOUT, self.lines.next_line())
            .await
            .expect("timed out waiting for a message")
            .expect("read")
            .expect("connection closed");
        serde_json::from_str(&line).expect("valid server message")
    }

    async fn expect_error(&mut self) -> String {
        match self.recv().await {
            ServerMessage::Error { message } => message,
            other => panic!("expected ERROR, got {other:?}"),
        }
    }

    async fn join(&mut self, name: &str) -> usize {
        self.send(&format!(r#"{{"type":"JOIN","playerName":"{name}"}}"#))
            .await;
        match self.recv().await {
            ServerMessage::Queued { position } => position,
            other => panic!("expected QUEUED, got {other:?}"),
        }
    }
}

async fn start_server(settings: MatchSettings) -> (SocketAddr, DuelServer) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");

    let config = ServerConfig {
        matches: settings,
        ..ServerConfig::default()
    };
    let server = DuelServer::builder()
        .config(config)
        .catalog(ContentFactory::builtin().expect("builtin content"))
        .seeds(FixedSeed::new(2024))
        .build()
        .expect("server builds");

    tokio::spawn(serve(listener, server.handle()));
    (addr, server)
}

fn no_timeout() -> MatchSettings {
    MatchSettings {
        turn_timeout: None,
        result_grace: Duration::from_secs(60),
    }
}

/// Connects two clients and plays them through the lobby. Returns them in
/// seat order along with the opening snapshot's current side.
async fn started_match(addr: SocketAddr) -> (TestClient, TestClient, Side) {
    let mut a = TestClient::connect(addr).await;
    let mut b = TestClient::connect(addr).await;
    a.join("Ann").await;
    b.join("Bo").await;
    assert!(matches!(a.recv().await, ServerMessage::Matched { side: Side::Player1, .. }));
    assert!(matches!(b.recv().await, ServerMessage::Matched { side: Side::Player2, .. }));

    a.send(r#"{"type":"PICK_CLASS","classId":"warrior"}"#).await;
    assert!(matches!(a.recv().await, ServerMessage::ClassPicked { .. }));
    b.send(r#"{"type":"PICK_CLASS","classId":"priest"}"#).await;
    assert!(matches!(b.recv().await, ServerMessage::ClassPicked { .. }));
    for client in [&mut a, &mut b] {
        assert_eq!(
            client.recv().await,
            ServerMessage::BothPicked {
                player1_class: "warrior".into(),
                player2_class: "priest".into(),
            }
        );
    }

    a.send(r#"{"type":"READY"}"#).await;
    b.send(r#"{"type":"READY"}"#).await;

    let mut current = None;
    for client in [&mut a, &mut b] {
        match client.recv().await {
            ServerMessage::State { state } => {
                assert_eq!(state.phase, Phase::Turn);
                assert_eq!(state.turn, 0);
                assert!(state.player1.position.is_some());
                assert!(state.player2.position.is_some());
                assert_eq!(state.player1.class_id, "warrior");
                current = Some(state.current_side);
            }
            other => panic!("expected STATE, got {other:?}"),
        }
    }

    (a, b, current.expect("state received"))
}

#[tokio::test]
async fn queue_pairs_clients_in_arrival_order() {
    let (addr, _server) = start_server(no_timeout()).await;

    let mut clients = Vec::new();
    for name in ["A", "B", "C", "D"] {
        let mut client = TestClient::connect(addr).await;
        client.join(name).await;
        clients.push(client);
    }

    let mut pairings = Vec::new();
    for client in &mut clients {
        match client.recv().await {
            ServerMessage::Matched {
                match_id,
                side,
                seed,
                opponent,
            } => pairings.push((match_id, side, seed, opponent.name)),
            other => panic!("expected MATCHED, got {other:?}"),
        }
    }

    assert_eq!(
        pairings,
        vec![
            ("match_1".to_string(), Side::Player1, 2024, "B".to_string()),
            ("match_1".to_string(), Side::Player2, 2024, "A".to_string()),
            ("match_2".to_string(), Side::Player1, 2025, "D".to_string()),
            ("match_2".to_string(), Side::Player2, 2025, "C".to_string()),
        ]
    );
}

#[tokio::test]
async fn protocol_errors_keep_the_connection_open() {
    let (addr, _server) = start_server(no_timeout()).await;
    let mut client = TestClient::connect(addr).await;

    client.send("this is not json").await;
    assert_eq!(client.expect_error().await, "Invalid message format");

    client.send(r#"{"type":"TELEPORT"}"#).await;
    assert_eq!(client.expect_error().await, "Unknown message type");

    client.send(r#"{"type":"PICK_CLASS","classId":"mage"}"#).await;
    assert_eq!(client.expect_error().await, "Not in a match");

    assert_eq!(client.join("Still here").await, 1);
}

#[tokio::test]
async fn non_utf8_lines_are_rejected_without_dropping_the_client() {
    let (addr, _server) = start_server(no_timeout()).await;
    let mut client = TestClient::connect(addr).await;

    client.send_raw(b"\xff\xfe\n").await;
    assert_eq!(client.expect_error().await, "Invalid message format");

    assert_eq!(client.join("Still here").await, 1);
}

#[tokio::test]
async fn oversized_lines_are_rejected_and_skipped() {
    let (addr, _server) = start_server(no_timeout()).await;
    let mut client = TestClient::connect(addr).await;

    let mut line = vec![b'x'; MAX_LINE_BYTES * 2];
    line.push(b'\n');
    client.send_raw(&line).await;
    assert_eq!(client.expect_error().await, "Invalid message format");

    assert_eq!(client.join("Still here").await, 1);
}

#[tokio::test]
async fn garbage_bytes_mid_match_do_not_forfeit() {
    let (addr, _server) = start_server(no_timeout()).await;
    let (mut a, mut b, current) = started_match(addr).await;

    a.send_raw(b"\xff\xfe\n").await;
    assert_eq!(a.expect_error().await, "Invalid message format");

    let active = match current {
        Side::Player1 => &mut a,
        Side::Player2 => &mut b,
    };
    active.send(r#"{"type":"END_TURN"}"#).await;
    for client in [&mut a, &mut b] {
        match client.recv().await {
            ServerMessage::State { state } => {
                assert_eq!(state.phase, Phase::Turn);
                assert!(state.result.is_none());
                assert_eq!(state.turn, 1);
            }
            other => panic!("expected STATE, got {other:?}"),
        }
    }
}

#[tokio::test]
async fn only_the_current_side_may_end_the_turn() {
    let (addr, _server) = start_server(no_timeout()).await;
    let (mut a, mut b, current) = started_match(addr).await;

    let (active, idle) = match current {
        Side::Player1 => (&mut a, &mut b),
        Side::Player2 => (&mut b, &mut a),
    };

    idle.send(r#"{"type":"END_TURN"}"#).await;
    assert_eq!(idle.expect_error().await, "Not your turn");

    active.send(r#"{"type":"END_TURN"}"#).await;
    for client in [active, idle] {
        match client.recv().await {
            ServerMessage::State { state } => {
                assert_eq!(state.turn, 1);
                assert_eq!(state.current_side, current.other());
            }
            other => panic!("expected STATE, got {other:?}"),
        }
    }
}

#[tokio::test]
async fn surrender_ends_the_match_for_both_players() {
    let (addr, _server) = start_server(no_timeout()).await;
    let (mut a, mut b, _) = started_match(addr).await;

    b.send(r#"{"type":"SURRENDER"}"#).await;

    for client in [&mut a, &mut b] {
        assert!(matches!(client.recv().await, ServerMessage::State { state } if state.phase == Phase::Result));
        match client.recv().await {
            ServerMessage::Outcome { result } => {
                assert_eq!(result.winner, Winner::Player1);
                assert_eq!(result.reason, ResultReason::Surrender);
            }
            other => panic!("expected RESULT, got {other:?}"),
        }
    }

    assert_eq!(a.join("Ann again").await, 1);
}

#[tokio::test]
async fn disconnect_during_match_surrenders() {
    let (addr, server) = start_server(no_timeout()).await;
    let (a, mut b, _) = started_match(addr).await;

    drop(a);

    assert!(matches!(b.recv().await, ServerMessage::State { .. }));
    match b.recv().await {
        ServerMessage::Outcome { result } => {
            assert_eq!(result.winner, Winner::Player2);
            assert_eq!(result.reason, ResultReason::Surrender);
        }
        other => panic!("expected RESULT, got {other:?}"),
    }

    let stats = server.handle().stats().await.expect("stats");
    assert_eq!(stats.clients, 1);
    assert_eq!(stats.matches, 1);
}

#[tokio::test]
async fn disconnect_in_lobby_notifies_opponent() {
    let (addr, _server) = start_server(no_timeout()).await;
    let mut a = TestClient::connect(addr).await;
    let mut b = TestClient::connect(addr).await;
    a.join("Ann").await;
    b.join("Bo").await;
    a.recv().await;
    b.recv().await;

    drop(a);

    assert_eq!(b.expect_error().await, "Opponent disconnected");
    assert_eq!(b.join("Bo").await, 1);
}

#[tokio::test]
async fn idle_turn_is_ended_by_the_server() {
    let settings = MatchSettings {
        turn_timeout: Some(Duration::from_millis(50)),
        result_grace: Duration::from_secs(60),
    };
    let (addr, _server) = start_server(settings).await;
    let (mut a, _b, current) = started_match(addr).await;

    match a.recv().await {
        ServerMessage::State { state } => {
            assert_eq!(state.turn, 1);
            assert_eq!(state.current_side, current.other());
        }
        other => panic!("expected STATE, got {other:?}"),
    }
}
