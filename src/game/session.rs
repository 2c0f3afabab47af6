//! Per-session game actor.
//!
//! Each [`GameSession`] is a single-consumer control loop: exactly one spawned
//! task owns the seats and the phase tag, draining commands from an mpsc
//! mailbox. This yields a total order over join/leave/move events per session
//! with no locking inside the session. Connections talk to the session only
//! through a [`SessionHandle`]; the session talks back only through each
//! player's event channel.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use uuid::Uuid;

use crate::error::JoinError;

use super::registry::SessionRegistry;
use super::round::{self, Move};

/// Identity of one attached connection.
pub type PlayerId = Uuid;

/// Events a session pushes to one attached connection.
#[derive(Debug, Clone)]
pub enum PlayerEvent {
    /// A broadcast line to forward to the remote peer.
    Line(String),
    /// Session-initiated teardown: deliver the reason as the final message,
    /// close the stream, and do not notify the session back.
    Shutdown(String),
}

/// A connection's side of the session link: its identity plus the channel the
/// session uses to reach it.
#[derive(Debug, Clone)]
pub struct PlayerLink {
    pub id: PlayerId,
    pub events: mpsc::UnboundedSender<PlayerEvent>,
}

enum SessionCommand {
    Join {
        link: PlayerLink,
        reply: oneshot::Sender<Result<usize, JoinError>>,
    },
    Leave {
        player_id: PlayerId,
    },
    SubmitMove {
        player_id: PlayerId,
        payload: Vec<u8>,
    },
}

/// Cloneable sender half of a session's mailbox.
#[derive(Clone)]
pub struct SessionHandle {
    code: String,
    tx: mpsc::UnboundedSender<SessionCommand>,
}

impl SessionHandle {
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Ask the session for a seat. Resolves once the session's loop has
    /// processed the join, so a returned seat index is already visible to
    /// subsequent commands.
    pub async fn join(&self, link: PlayerLink) -> Result<usize, JoinError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(SessionCommand::Join {
                link,
                reply: reply_tx,
            })
            .map_err(|_| JoinError::SessionClosed)?;
        reply_rx.await.map_err(|_| JoinError::SessionClosed)?
    }

    /// Notify the session that a connection is gone. Safe to call for a
    /// connection the session no longer knows about.
    pub fn leave(&self, player_id: PlayerId) {
        let _ = self.tx.send(SessionCommand::Leave { player_id });
    }

    /// Forward a raw move payload from a connection.
    pub fn submit_move(&self, player_id: PlayerId, payload: Vec<u8>) {
        let _ = self.tx.send(SessionCommand::SubmitMove { player_id, payload });
    }
}

/// Session phase. `ShuttingDown` is terminal: the loop exits right after
/// entering it, so no further seat or move mutation can occur.
enum Phase {
    WaitingForPlayers,
    Full,
    ShuttingDown,
}

struct Seat {
    link: PlayerLink,
    name: String,
    pending: Option<Move>,
}

pub(crate) struct GameSession {
    code: String,
    registry: Arc<SessionRegistry>,
    rx: mpsc::UnboundedReceiver<SessionCommand>,
    seats: [Option<Seat>; 2],
    phase: Phase,
}

impl GameSession {
    /// Spawn a session task and return the handle to its mailbox.
    pub(crate) fn spawn(
        code: String,
        registry: Arc<SessionRegistry>,
        lifetime: Duration,
    ) -> SessionHandle {
        let (tx, rx) = mpsc::unbounded_channel();
        let session = GameSession {
            code: code.clone(),
            registry,
            rx,
            seats: [None, None],
            phase: Phase::WaitingForPlayers,
        };
        tokio::spawn(session.run(lifetime));
        SessionHandle { code, tx }
    }

    async fn run(mut self, lifetime: Duration) {
        let deadline = tokio::time::sleep(lifetime);
        tokio::pin!(deadline);
        loop {
            tokio::select! {
                cmd = self.rx.recv() => match cmd {
                    Some(cmd) => {
                        if self.handle(cmd).await {
                            break;
                        }
                    }
                    // All handles dropped: registry-initiated teardown.
                    None => {
                        self.shut_down("session cancelled").await;
                        break;
                    }
                },
                _ = &mut deadline => {
                    self.shut_down("game time limit reached").await;
                    break;
                }
            }
        }
        tracing::debug!("session {} loop stopped", self.code);
    }

    /// Process one command. Returns `true` once the session is terminal.
    async fn handle(&mut self, cmd: SessionCommand) -> bool {
        match cmd {
            SessionCommand::Join { link, reply } => {
                self.handle_join(link, reply);
                false
            }
            SessionCommand::Leave { player_id } => self.handle_leave(player_id).await,
            SessionCommand::SubmitMove { player_id, payload } => {
                self.handle_submit(player_id, &payload);
                false
            }
        }
    }

    fn handle_join(&mut self, link: PlayerLink, reply: oneshot::Sender<Result<usize, JoinError>>) {
        if !matches!(self.phase, Phase::WaitingForPlayers) {
            tracing::warn!("join rejected on session {}: already full", self.code);
            let _ = reply.send(Err(JoinError::GameFull));
            return;
        }

        // Seat assignment order = join order.
        let seat_index = if self.seats[0].is_none() { 0 } else { 1 };
        let name = format!("Player {}", seat_index + 1);
        tracing::info!("{} joined session {}", name, self.code);
        self.seats[seat_index] = Some(Seat {
            link,
            name: name.clone(),
            pending: None,
        });

        if self.seats.iter().all(|seat| seat.is_some()) {
            self.phase = Phase::Full;
        }
        self.broadcast(&format!("{} joined", name));
        let _ = reply.send(Ok(seat_index));
    }

    async fn handle_leave(&mut self, player_id: PlayerId) -> bool {
        let departing = self
            .seats
            .iter()
            .flatten()
            .find(|seat| seat.link.id == player_id)
            .map(|seat| seat.name.clone());

        // A leave for a connection that never got seated (or was already
        // processed) is a no-op.
        let Some(name) = departing else {
            tracing::debug!("ignoring leave for unseated connection on {}", self.code);
            return false;
        };

        self.shut_down(&format!("{} disconnected", name)).await;
        true
    }

    fn handle_submit(&mut self, player_id: PlayerId, payload: &[u8]) {
        if !matches!(self.phase, Phase::Full) {
            tracing::debug!("ignoring move on session {}: not full", self.code);
            return;
        }

        // Empty payload = no move submitted; garbage first byte = Invalid.
        let Some(mv) = Move::parse(payload) else {
            return;
        };
        let Some(seat) = self
            .seats
            .iter_mut()
            .flatten()
            .find(|seat| seat.link.id == player_id)
        else {
            return;
        };
        seat.pending = Some(mv);
        self.try_resolve();
    }

    /// Resolve the round once both seats hold a pending move, then reset the
    /// slots so a new round can begin without re-seating.
    fn try_resolve(&mut self) {
        let lines = match (&self.seats[0], &self.seats[1]) {
            (Some(first), Some(second)) => match (first.pending, second.pending) {
                (Some(first_move), Some(second_move)) => {
                    let outcome = round::resolve_round(first_move, second_move);
                    vec![
                        round::reveal_line(&first.name, first_move),
                        round::reveal_line(&second.name, second_move),
                        round::result_line(outcome, &first.name, &second.name),
                    ]
                }
                _ => return,
            },
            _ => return,
        };

        for line in &lines {
            self.broadcast(line);
        }
        for seat in self.seats.iter_mut().flatten() {
            seat.pending = None;
        }
    }

    fn broadcast(&self, line: &str) {
        for seat in self.seats.iter().flatten() {
            if seat.link.events.send(PlayerEvent::Line(line.to_string())).is_err() {
                tracing::warn!("failed to push broadcast to {} on {}", seat.name, self.code);
            }
        }
    }

    /// Terminal teardown shared by leave, lifetime expiry, and cancellation:
    /// remove this session from the registry, then hand every attached
    /// connection a shutdown instruction carrying the reason.
    async fn shut_down(&mut self, reason: &str) {
        self.phase = Phase::ShuttingDown;
        self.registry.remove(&self.code).await;
        for seat in self.seats.iter().flatten() {
            let _ = seat.link.events.send(PlayerEvent::Shutdown(reason.to_string()));
        }
        tracing::info!("session {} shut down: {}", self.code, reason);
    }
}
