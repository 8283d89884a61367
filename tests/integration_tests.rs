//! Integration tests for the relay and client components
//!
//! These tests run a real relay on a loopback port and talk to it over
//! WebSockets, the same way browsers and the native client do.

use client::network::{Connection, NetworkEvent};
use client::remote::RemoteProxies;
use futures_util::{SinkExt, StreamExt};
use server::config::ServerConfig;
use server::network::RelayServer;
use shared::codec::{decode_server, encode_client};
use shared::{ClientMessage, Encoding, ServerMessage, SessionId, Transform, WireFrame, RELAY_PATH};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::{sleep, timeout};
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

async fn start_relay(config: ServerConfig) -> SocketAddr {
    let server = RelayServer::bind(ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        ..config
    })
    .await
    .expect("Failed to bind relay");
    let addr = server.local_addr().unwrap();
    tokio::spawn(server.run());
    addr
}

fn relay_url(addr: SocketAddr) -> String {
    format!("ws://{}{}", addr, RELAY_PATH)
}

async fn connect(addr: SocketAddr) -> Socket {
    let (socket, _) = connect_async(relay_url(addr))
        .await
        .expect("Failed to connect to relay");
    socket
}

async fn send(socket: &mut Socket, message: &ClientMessage, encoding: Encoding) {
    let frame = match encode_client(message, encoding).unwrap() {
        WireFrame::Binary(bytes) => Message::Binary(bytes),
        WireFrame::Text(text) => Message::Text(text),
    };
    socket.send(frame).await.unwrap();
}

/// Next data or close frame, skipping keepalives
async fn next_frame(socket: &mut Socket) -> Option<Message> {
    loop {
        match timeout(Duration::from_secs(2), socket.next()).await {
            Ok(Some(Ok(Message::Ping(_)))) | Ok(Some(Ok(Message::Pong(_)))) => continue,
            Ok(Some(Ok(message))) => return Some(message),
            _ => return None,
        }
    }
}

async fn recv_frame(socket: &mut Socket) -> WireFrame {
    match next_frame(socket).await {
        Some(Message::Text(text)) => WireFrame::Text(text),
        Some(Message::Binary(bytes)) => WireFrame::Binary(bytes),
        other => panic!("Expected a data frame, got {:?}", other),
    }
}

async fn recv(socket: &mut Socket) -> ServerMessage {
    let frame = recv_frame(socket).await;
    decode_server(&frame).expect("Relay sent an undecodable frame")
}

async fn join(addr: SocketAddr) -> (Socket, SessionId) {
    let mut socket = connect(addr).await;
    match recv(&mut socket).await {
        ServerMessage::RosterSnapshot { self_id, .. } => (socket, self_id),
        other => panic!("Expected a roster snapshot first, got {:?}", other),
    }
}

/// RELAY PROTOCOL TESTS
mod relay_tests {
    use super::*;

    /// Tests the two-player join sequence
    #[tokio::test]
    async fn second_player_sees_first_and_first_hears_join() {
        let addr = start_relay(ServerConfig::default()).await;

        let (mut a, a_id) = join(addr).await;

        let mut b = connect(addr).await;
        let b_id = match recv(&mut b).await {
            ServerMessage::RosterSnapshot { self_id, players } => {
                assert_eq!(players.len(), 2);
                assert!(players.contains_key(&a_id));
                assert!(players.contains_key(&self_id));
                assert_eq!(players[&a_id].transform, Transform::origin());
                self_id
            }
            other => panic!("Expected a roster snapshot, got {:?}", other),
        };
        assert_ne!(a_id, b_id);

        match recv(&mut a).await {
            ServerMessage::Joined { id, player } => {
                assert_eq!(id, b_id);
                assert_eq!(player.name, format!("Player{}", b_id));
            }
            other => panic!("Expected a join announcement, got {:?}", other),
        }
    }

    /// Tests that a transform reaches the other player and not the sender
    #[tokio::test]
    async fn moved_reaches_others_and_drives_proxies() {
        let addr = start_relay(ServerConfig::default()).await;
        let (mut a, a_id) = join(addr).await;

        let mut b = connect(addr).await;
        let mut proxies = RemoteProxies::new();
        proxies.apply(recv(&mut b).await);
        let _joined = recv(&mut a).await;

        let transform = Transform::new(5.0, 0.0, 3.0, 1.57);
        send(
            &mut a,
            &ClientMessage::UpdateTransform {
                transform,
                gait: Some(0.2),
            },
            Encoding::Binary,
        )
        .await;

        let moved = recv(&mut b).await;
        match &moved {
            ServerMessage::Moved {
                id,
                transform: relayed,
                gait,
                ..
            } => {
                assert_eq!(*id, a_id);
                assert_eq!(*relayed, transform);
                assert_eq!(*gait, Some(0.2));
            }
            other => panic!("Expected a move, got {:?}", other),
        }
        proxies.apply(moved);
        assert_eq!(proxies.get(a_id).map(|p| p.transform), Some(transform));

        // The relay processes in order, so if A's next message is its own
        // rename, it never got its own move.
        send(
            &mut a,
            &ClientMessage::SetName {
                name: "Marker".to_string(),
            },
            Encoding::Binary,
        )
        .await;
        match recv(&mut a).await {
            ServerMessage::NameChanged { id, name } => {
                assert_eq!(id, a_id);
                assert_eq!(name, "Marker");
            }
            other => panic!("Sender should not receive its own move, got {:?}", other),
        }
    }

    /// Tests that renames go to everyone, the renaming session included
    #[tokio::test]
    async fn rename_is_echoed_to_all() {
        let addr = start_relay(ServerConfig::default()).await;
        let (mut a, a_id) = join(addr).await;
        let (mut b, _) = join(addr).await;
        let _joined = recv(&mut a).await;

        send(
            &mut a,
            &ClientMessage::SetName {
                name: "  Ares  ".to_string(),
            },
            Encoding::Text,
        )
        .await;

        for socket in [&mut a, &mut b] {
            match recv(socket).await {
                ServerMessage::NameChanged { id, name } => {
                    assert_eq!(id, a_id);
                    assert_eq!(name, "Ares");
                }
                other => panic!("Expected a name change, got {:?}", other),
            }
        }
    }

    /// Tests the leave announcement
    #[tokio::test]
    async fn disconnect_is_announced() {
        let addr = start_relay(ServerConfig::default()).await;
        let (mut a, _) = join(addr).await;
        let (mut b, b_id) = join(addr).await;
        let _joined = recv(&mut a).await;

        b.close(None).await.unwrap();

        match recv(&mut a).await {
            ServerMessage::Left { id } => assert_eq!(id, b_id),
            other => panic!("Expected a leave announcement, got {:?}", other),
        }
    }

    /// Tests that replies follow the encoding of the peer's last frame
    #[tokio::test]
    async fn replies_match_sender_encoding() {
        let addr = start_relay(ServerConfig::default()).await;
        let (mut a, _) = join(addr).await;

        send(
            &mut a,
            &ClientMessage::SetName {
                name: "Binary".to_string(),
            },
            Encoding::Binary,
        )
        .await;
        assert_eq!(recv_frame(&mut a).await.encoding(), Encoding::Binary);

        send(
            &mut a,
            &ClientMessage::SetName {
                name: "Text".to_string(),
            },
            Encoding::Text,
        )
        .await;
        let frame = recv_frame(&mut a).await;
        assert_eq!(frame.encoding(), Encoding::Text);
        match frame {
            WireFrame::Text(text) => assert!(text.contains("name_changed")),
            WireFrame::Binary(_) => unreachable!(),
        }
    }

    /// Tests that malformed or invalid frames are dropped without closing the session
    #[tokio::test]
    async fn malformed_frames_are_ignored() {
        let addr = start_relay(ServerConfig::default()).await;
        let (mut a, a_id) = join(addr).await;

        a.send(Message::Text("not json".to_string())).await.unwrap();
        a.send(Message::Binary(vec![0xff, 0x00, 0x13])).await.unwrap();
        a.send(Message::Text(
            r#"{"update_transform":{"transform":{"x":2e7,"y":0.0,"z":0.0,"yaw":0.0}}}"#.to_string(),
        ))
        .await
        .unwrap();

        send(
            &mut a,
            &ClientMessage::SetName {
                name: "StillHere".to_string(),
            },
            Encoding::Text,
        )
        .await;
        match recv(&mut a).await {
            ServerMessage::NameChanged { id, name } => {
                assert_eq!(id, a_id);
                assert_eq!(name, "StillHere");
            }
            other => panic!("Expected a name change, got {:?}", other),
        }
    }

    /// Tests the capacity limit
    #[tokio::test]
    async fn full_server_refuses_connection() {
        let addr = start_relay(ServerConfig {
            max_clients: 1,
            ..ServerConfig::default()
        })
        .await;
        let (_a, _) = join(addr).await;

        let mut b = connect(addr).await;
        match next_frame(&mut b).await {
            Some(Message::Close(Some(frame))) => {
                assert_eq!(u16::from(frame.code), 1013);
                assert_eq!(frame.reason, "Server full");
            }
            other => panic!("Expected a close frame, got {:?}", other),
        }
    }

    /// Tests that ids keep increasing after a disconnect
    #[tokio::test]
    async fn session_ids_are_not_reused() {
        let addr = start_relay(ServerConfig::default()).await;
        let (a, a_id) = join(addr).await;
        drop(a);
        sleep(Duration::from_millis(50)).await;

        let (_b, b_id) = join(addr).await;
        assert!(b_id > a_id);
    }
}

/// HTTP TESTS
mod static_tests {
    use super::*;

    async fn http_get(addr: SocketAddr, path: &str) -> String {
        let mut stream = TcpStream::connect(addr).await.unwrap();
        let request = format!(
            "GET {} HTTP/1.1\r\nHost: {}\r\nConnection: close\r\n\r\n",
            path, addr
        );
        stream.write_all(request.as_bytes()).await.unwrap();

        let mut response = String::new();
        timeout(Duration::from_secs(2), stream.read_to_string(&mut response))
            .await
            .expect("HTTP response timed out")
            .unwrap();
        response
    }

    /// Tests that non-relay paths serve files from the static directory
    #[tokio::test]
    async fn serves_static_assets() {
        let dir = std::env::temp_dir().join(format!("colony-static-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("index.html"), "<h1>colony</h1>").unwrap();

        let addr = start_relay(ServerConfig {
            static_dir: dir.clone(),
            ..ServerConfig::default()
        })
        .await;

        let response = http_get(addr, "/index.html").await;
        assert!(response.starts_with("HTTP/1.1 200"));
        assert!(response.contains("<h1>colony</h1>"));

        let missing = http_get(addr, "/nope.js").await;
        assert!(missing.starts_with("HTTP/1.1 404"));

        let _ = std::fs::remove_dir_all(&dir);
    }
}

/// CLIENT CONNECTION TESTS
mod client_tests {
    use super::*;

    async fn wait_for<F>(connection: &mut Connection, mut predicate: F) -> Vec<NetworkEvent>
    where
        F: FnMut(&NetworkEvent) -> bool,
    {
        let mut seen = Vec::new();
        for _ in 0..200 {
            for event in connection.poll() {
                let done = predicate(&event);
                seen.push(event);
                if done {
                    return seen;
                }
            }
            sleep(Duration::from_millis(10)).await;
        }
        panic!("Timed out waiting for network event, saw {:?}", seen);
    }

    /// Tests the native client connection against a live relay
    #[tokio::test]
    async fn client_connection_joins_and_renames() {
        let addr = start_relay(ServerConfig::default()).await;
        let mut connection = Connection::open(relay_url(addr), Encoding::Binary).unwrap();

        let events = wait_for(&mut connection, |e| {
            matches!(e, NetworkEvent::Message(ServerMessage::RosterSnapshot { .. }))
        })
        .await;
        assert_eq!(events.first(), Some(&NetworkEvent::Connected));

        assert!(connection.send(ClientMessage::SetName {
            name: "Colonist".to_string(),
        }));
        wait_for(&mut connection, |e| {
            matches!(
                e,
                NetworkEvent::Message(ServerMessage::NameChanged { name, .. }) if name == "Colonist"
            )
        })
        .await;
    }

    /// Tests that a peer's moves show up in a client's proxies
    #[tokio::test]
    async fn client_sees_peer_moves() {
        let addr = start_relay(ServerConfig::default()).await;
        let mut connection = Connection::open(relay_url(addr), Encoding::Binary).unwrap();
        let mut proxies = RemoteProxies::new();

        for event in wait_for(&mut connection, |e| {
            matches!(e, NetworkEvent::Message(ServerMessage::RosterSnapshot { .. }))
        })
        .await
        {
            if let NetworkEvent::Message(message) = event {
                proxies.apply(message);
            }
        }

        let (mut peer, peer_id) = join(addr).await;
        let transform = Transform::new(-12.0, 4.0, 30.0, 0.5);
        send(
            &mut peer,
            &ClientMessage::UpdateTransform {
                transform,
                gait: None,
            },
            Encoding::Text,
        )
        .await;

        for event in wait_for(&mut connection, |e| {
            matches!(e, NetworkEvent::Message(ServerMessage::Moved { .. }))
        })
        .await
        {
            if let NetworkEvent::Message(message) = event {
                proxies.apply(message);
            }
        }

        let proxy = proxies.get(peer_id).expect("Peer proxy was not created");
        assert_eq!(proxy.transform, transform);
    }
}
