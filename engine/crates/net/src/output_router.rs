use std::collections::HashMap;

use session::SessionId;

use crate::channels::{OutputRx, RegisterRx, SessionWriteTx, UnregisterRx};

/// Routes SessionOutput messages to the correct per-session write channel.
pub async fn run_output_router(
    mut output_rx: OutputRx,
    mut register_rx: RegisterRx,
    mut unregister_rx: UnregisterRx,
) {
    let mut writers: HashMap<SessionId, SessionWriteTx> = HashMap::new();

    loop {
        tokio::select! {
            Some(reg) = register_rx.recv() => {
                tracing::debug!(session_id = ?reg.session_id, "output router: session registered");
                writers.insert(reg.session_id, reg.write_tx);
            }
            Some(session_id) = unregister_rx.recv() => {
                tracing::debug!(session_id = ?session_id, "output router: session unregistered");
                writers.remove(&session_id);
            }
            Some(output) = output_rx.recv() => {
                if let Some(tx) = writers.get(&output.session_id) {
                    if tx.send(output.text).is_err() {
                        tracing::debug!(session_id = ?output.session_id, "output router: write channel closed");
                        writers.remove(&output.session_id);
                    } else if output.disconnect {
                        tracing::debug!(session_id = ?output.session_id, "output router: disconnect requested");
                        writers.remove(&output.session_id);
                    }
                }
            }
            else => break,
        }
    }

    tracing::info!("output router shutting down");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channels::RegisterSession;
    use session::SessionOutput;
    use tokio::sync::mpsc;

    #[tokio::test]
    async fn router_delivers_and_drops() {
        let (output_tx, output_rx) = mpsc::unbounded_channel();
        let (register_tx, register_rx) = mpsc::unbounded_channel();
        let (unregister_tx, unregister_rx) = mpsc::unbounded_channel();

        let router = tokio::spawn(run_output_router(output_rx, register_rx, unregister_rx));

        let (write_tx, mut write_rx) = mpsc::unbounded_channel();
        let sid = SessionId(1);
        register_tx
            .send(RegisterSession {
                session_id: sid,
                write_tx,
            })
            .unwrap();
        tokio::task::yield_now().await;

        output_tx.send(SessionOutput::new(sid, "Hello!")).unwrap();
        assert_eq!(write_rx.recv().await.unwrap(), "Hello!");

        unregister_tx.send(sid).unwrap();
        tokio::task::yield_now().await;

        // After unregister, output is silently dropped.
        output_tx.send(SessionOutput::new(sid, "dropped")).unwrap();
        tokio::task::yield_now().await;

        drop(output_tx);
        drop(register_tx);
        drop(unregister_tx);
        let _ = router.await;
    }

    #[tokio::test]
    async fn disconnect_output_removes_writer() {
        let (output_tx, output_rx) = mpsc::unbounded_channel();
        let (register_tx, register_rx) = mpsc::unbounded_channel();
        let (_unregister_tx, unregister_rx) = mpsc::unbounded_channel();

        let router = tokio::spawn(run_output_router(output_rx, register_rx, unregister_rx));

        let (write_tx, mut write_rx) = mpsc::unbounded_channel();
        let sid = SessionId(2);
        register_tx
            .send(RegisterSession {
                session_id: sid,
                write_tx,
            })
            .unwrap();
        tokio::task::yield_now().await;

        output_tx
            .send(SessionOutput::with_disconnect(sid, "Goodbye."))
            .unwrap();
        assert_eq!(write_rx.recv().await.unwrap(), "Goodbye.");

        // The writer is gone; the channel closes once the router drops it.
        assert!(write_rx.recv().await.is_none());

        router.abort();
    }
}
