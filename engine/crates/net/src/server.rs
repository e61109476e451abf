use std::sync::atomic::{AtomicU64, Ordering};

use session::SessionId;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::watch;

use crate::channels::{ConnEvent, ConnTx, RegisterSession, RegisterTx, SessionWriteRx, UnregisterTx};
use crate::telnet::LineBuffer;

static NEXT_SESSION_ID: AtomicU64 = AtomicU64::new(0);

/// Accept connections and run one reader/writer pair per session until the
/// shutdown signal flips.
pub async fn run_tcp_server(
    addr: String,
    conn_tx: ConnTx,
    register_tx: RegisterTx,
    unregister_tx: UnregisterTx,
    mut shutdown_rx: watch::Receiver<bool>,
) -> Result<(), std::io::Error> {
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "TCP server listening");

    loop {
        tokio::select! {
            accepted = listener.accept() => {
                let (stream, peer_addr) = accepted?;
                let session_id = SessionId(NEXT_SESSION_ID.fetch_add(1, Ordering::Relaxed));
                tracing::info!(?session_id, %peer_addr, "new connection");

                let conn_tx = conn_tx.clone();
                let register_tx = register_tx.clone();
                let unregister_tx = unregister_tx.clone();
                tokio::spawn(async move {
                    handle_connection(stream, session_id, conn_tx, register_tx, unregister_tx).await;
                });
            }
            _ = shutdown_rx.changed() => {
                if *shutdown_rx.borrow() {
                    tracing::info!("TCP server stopping");
                    return Ok(());
                }
            }
        }
    }
}

async fn handle_connection(
    stream: tokio::net::TcpStream,
    session_id: SessionId,
    conn_tx: ConnTx,
    register_tx: RegisterTx,
    unregister_tx: UnregisterTx,
) {
    let (mut reader, mut writer) = stream.into_split();

    let (write_tx, mut write_rx): (_, SessionWriteRx) = tokio::sync::mpsc::unbounded_channel();
    let _ = register_tx.send(RegisterSession {
        session_id,
        write_tx,
    });
    let _ = conn_tx.send(ConnEvent::Opened { session_id });

    let writer_handle = tokio::spawn(async move {
        while let Some(text) = write_rx.recv().await {
            // Normalize bare \n to \r\n for Telnet clients.
            let text = text.replace("\r\n", "\n").replace('\n', "\r\n");
            let msg = format!("{}\r\n", text);
            if writer.write_all(msg.as_bytes()).await.is_err() {
                break;
            }
        }
    });

    let mut line_buffer = LineBuffer::new();
    let mut buf = [0u8; 4096];

    loop {
        match reader.read(&mut buf).await {
            Ok(0) => break,
            Ok(n) => {
                for line in line_buffer.feed(&buf[..n]) {
                    let _ = conn_tx.send(ConnEvent::Line { session_id, line });
                }
            }
            Err(_) => break,
        }
    }

    let _ = conn_tx.send(ConnEvent::Closed { session_id });
    let _ = unregister_tx.send(session_id);

    writer_handle.abort();
    tracing::info!(?session_id, "connection ended");
}
