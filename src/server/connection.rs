//! Per-connection actor: bridges one WebSocket to its session's mailbox.
//!
//! Two duties share one identity and one outbound queue: an inbound task that
//! turns text frames into move submissions, and an outbound/control loop that
//! writes broadcasts, obeys shutdown instructions from the session, and
//! enforces the connection deadline. Transport failures stay local to this
//! connection; they surface to the session as a single `Leave`.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use axum::extract::ws::{CloseFrame, Message, WebSocket, close_code};
use futures_util::{sink::SinkExt, stream::StreamExt};
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::config::GAME_LIFETIME;
use crate::game::{PlayerEvent, PlayerLink, SessionHandle};
use crate::game::session::PlayerId;

/// Ensures the session sees at most one `Leave` per connection lifetime,
/// whichever exit path fires first.
struct LeaveGuard {
    sent: AtomicBool,
}

impl LeaveGuard {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            sent: AtomicBool::new(false),
        })
    }

    fn send_leave(&self, session: &SessionHandle, player_id: PlayerId) {
        if !self.sent.swap(true, Ordering::SeqCst) {
            session.leave(player_id);
        }
    }

    /// Session-initiated teardown: nothing may notify the session back.
    fn suppress(&self) {
        self.sent.store(true, Ordering::SeqCst);
    }
}

/// Drive one upgraded socket. `session` is `None` when the presented code
/// matched nothing; the socket is then closed with a readable reason.
pub async fn run(socket: WebSocket, session: Option<SessionHandle>) {
    let Some(session) = session else {
        close_with_reason(socket, "invalid connect code").await;
        return;
    };

    let (events_tx, mut events_rx) = mpsc::unbounded_channel();
    let player_id = Uuid::new_v4();
    let link = PlayerLink {
        id: player_id,
        events: events_tx,
    };

    match session.join(link).await {
        Ok(seat) => {
            tracing::debug!(
                "connection {} seated at {} on session {}",
                player_id,
                seat + 1,
                session.code()
            );
        }
        Err(err) => {
            tracing::info!("connection rejected on {}: {}", session.code(), err);
            close_with_reason(socket, &err.to_string()).await;
            return;
        }
    }

    let (mut sender, mut receiver) = socket.split();
    let leave_guard = LeaveGuard::new();

    // Inbound duty: forward text frames as move submissions; a read failure
    // or client close ends the duty with a single leave.
    let read_session = session.clone();
    let read_guard = Arc::clone(&leave_guard);
    let recv_task = tokio::spawn(async move {
        while let Some(frame) = receiver.next().await {
            match frame {
                Ok(Message::Text(text)) => {
                    read_session.submit_move(player_id, text.as_bytes().to_vec());
                }
                Ok(Message::Close(_)) => break,
                // Binary and ping/pong frames are not part of the protocol.
                Ok(_) => {}
                Err(e) => {
                    tracing::debug!("read error on connection {}: {}", player_id, e);
                    break;
                }
            }
        }
        read_guard.send_leave(&read_session, player_id);
    });

    // Outbound/control duty.
    let deadline = tokio::time::sleep(GAME_LIFETIME);
    tokio::pin!(deadline);
    loop {
        tokio::select! {
            event = events_rx.recv() => match event {
                Some(PlayerEvent::Line(line)) => {
                    if sender.send(Message::Text(line.into())).await.is_err() {
                        leave_guard.send_leave(&session, player_id);
                        break;
                    }
                }
                Some(PlayerEvent::Shutdown(reason)) => {
                    tracing::debug!("shutting down connection {}: {}", player_id, reason);
                    leave_guard.suppress();
                    // Deliver the reason as the final message, then close.
                    let _ = sender.send(Message::Text(reason.clone().into())).await;
                    let _ = sender
                        .send(Message::Close(Some(CloseFrame {
                            code: close_code::NORMAL,
                            reason: reason.into(),
                        })))
                        .await;
                    break;
                }
                None => break,
            },
            _ = &mut deadline => {
                leave_guard.send_leave(&session, player_id);
                let _ = sender
                    .send(Message::Close(Some(CloseFrame {
                        code: close_code::NORMAL,
                        reason: "connection time limit reached".into(),
                    })))
                    .await;
                break;
            }
        }
    }

    recv_task.abort();
}

async fn close_with_reason(mut socket: WebSocket, reason: &str) {
    let frame = CloseFrame {
        code: close_code::NORMAL,
        reason: reason.into(),
    };
    if socket.send(Message::Close(Some(frame))).await.is_err() {
        tracing::debug!("failed to deliver close reason: {}", reason);
    }
}
