//! In-memory stand-ins for an SMTP relay.

use crate::email::ServerCredentials;
use secrecy::Secret;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, DuplexStream};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

const CAPACITY: usize = 64 * 1024;

pub(crate) fn credentials(password: &str) -> ServerCredentials {
    ServerCredentials {
        host: "relay.test".into(),
        port: 2525,
        username: "mailer".into(),
        password: Secret::new(password.into()),
        from_address: "noreply@mpgrupo.pt".into(),
        from_name: "MP Grupo CRM".into(),
    }
}

/// Greets, then answers `250 OK` to every chunk it reads until the client hangs
/// up. The task resolves to everything the client wrote.
pub(crate) fn cooperative_relay() -> (DuplexStream, JoinHandle<Vec<u8>>) {
    let (client, server) = tokio::io::duplex(CAPACITY);
    (client, tokio::spawn(converse(server)))
}

/// The same relay behind a real socket on `127.0.0.1`. Serves a single
/// connection and resolves once the client closes it.
pub(crate) async fn tcp_relay() -> (u16, JoinHandle<Vec<u8>>) {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind a local port.");
    let port = listener
        .local_addr()
        .expect("Failed to read the local address.")
        .port();
    let relay = tokio::spawn(async move {
        match listener.accept().await {
            Ok((socket, _)) => converse(socket).await,
            Err(_) => Vec::new(),
        }
    });
    (port, relay)
}

async fn converse<S: AsyncRead + AsyncWrite + Unpin>(mut server: S) -> Vec<u8> {
    let mut transcript = Vec::new();
    if server.write_all(b"220 relay.test ESMTP\r\n").await.is_err() {
        return transcript;
    }
    let mut buffer = [0u8; 4096];
    loop {
        match server.read(&mut buffer).await {
            Ok(0) | Err(_) => break,
            Ok(n) => {
                transcript.extend_from_slice(&buffer[..n]);
                if server.write_all(b"250 OK\r\n").await.is_err() {
                    break;
                }
            }
        }
    }
    transcript
}

/// Greets and then drops the connection.
pub(crate) fn hang_up_relay() -> DuplexStream {
    let (client, mut server) = tokio::io::duplex(CAPACITY);
    tokio::spawn(async move {
        let _ = server.write_all(b"220 relay.test ESMTP\r\n").await;
    });
    client
}

/// Accepts the connection and never says a word. The server half is returned so
/// the caller decides when it goes away.
pub(crate) fn silent_relay() -> (DuplexStream, DuplexStream) {
    tokio::io::duplex(CAPACITY)
}
