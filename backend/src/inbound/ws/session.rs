//! One admin's live board socket.
//!
//! On connect, on every change notice and on a client `refresh` the whole
//! table is re-fetched into the socket's [`AdminBoard`] and pushed. A failed
//! fetch resends the last table that loaded. The server pings every
//! [`HEARTBEAT_INTERVAL`] and hangs up on clients silent for
//! [`CLIENT_TIMEOUT`].

use std::sync::Arc;
use std::time::{Duration, Instant};

use actix_ws::{CloseCode, CloseReason, Closed, Message, MessageStream, ProtocolError, Session};
use tokio::time;
use tracing::{debug, info, warn};

use crate::domain::{AdminBoard, AdminId};
use crate::domain::ports::{ChangeNotice, LetterAdmin};
use crate::inbound::ws::messages::{ClientMessage, ServerMessage, SnapshotCause};

#[cfg(not(test))]
const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(5);
#[cfg(test)]
const HEARTBEAT_INTERVAL: Duration = Duration::from_millis(50);

#[cfg(not(test))]
const CLIENT_TIMEOUT: Duration = Duration::from_secs(10);
#[cfg(test)]
const CLIENT_TIMEOUT: Duration = Duration::from_millis(100);

/// Why the socket is being torn down.
enum Hangup {
    /// The client sent a close frame.
    ByClient(Option<CloseReason>),
    /// The inbound stream ended without a close frame.
    Vanished,
    Silent,
    /// The change feed has no publisher left.
    FeedGone,
    Garbled(ProtocolError),
    UnknownCommand,
    /// A write failed; the peer is gone.
    Unwritable(Closed),
}

impl Hangup {
    /// Close frame to send, if the socket is still writable.
    fn close_frame(self) -> Option<Option<CloseReason>> {
        let frame = |code, text: &str| {
            Some(Some(CloseReason {
                code,
                description: Some(text.to_owned()),
            }))
        };
        match self {
            Self::ByClient(reason) => Some(reason),
            Self::Silent => frame(CloseCode::Normal, "heartbeat timeout"),
            Self::FeedGone => frame(CloseCode::Away, "server shutting down"),
            Self::Garbled(_) => frame(CloseCode::Protocol, "protocol error"),
            Self::UnknownCommand => frame(CloseCode::Policy, "invalid payload"),
            Self::Vanished | Self::Unwritable(_) => None,
        }
    }

    fn log(&self, admin: &AdminId) {
        match self {
            Self::ByClient(_) | Self::Vanished | Self::UnknownCommand => {
                debug!(admin = %admin, "live board disconnected");
            }
            Self::Silent => info!(admin = %admin, "live board went quiet"),
            Self::FeedGone => warn!("letter change feed closed"),
            Self::Garbled(err) => warn!(error = %err, "live board protocol error"),
            Self::Unwritable(err) => warn!(error = %err, "live board send failed"),
        }
    }
}

type Step = Result<(), Hangup>;

pub(super) async fn handle_ws_session(
    admin_id: AdminId,
    admin: Arc<dyn LetterAdmin>,
    session: Session,
    mut frames: MessageStream,
) {
    let mut changes = admin.subscribe();
    let mut board = Board {
        admin,
        letters: AdminBoard::new(),
        session,
        heard_from: Instant::now(),
    };
    debug!(admin = %admin_id, "live board connected");

    let mut ticks = time::interval(HEARTBEAT_INTERVAL);
    let mut step = board.push(SnapshotCause::Connected).await;
    while step.is_ok() {
        step = tokio::select! {
            _ = ticks.tick() => board.heartbeat().await,
            notice = changes.next() => match notice {
                Some(notice) => board.on_notice(notice).await,
                None => Err(Hangup::FeedGone),
            },
            frame = frames.recv() => match frame {
                Some(Ok(message)) => board.on_message(message).await,
                Some(Err(err)) => Err(Hangup::Garbled(err)),
                None => Err(Hangup::Vanished),
            },
        };
    }

    // `changes` unsubscribes when it drops at the end of this function.
    if let Err(hangup) = step {
        hangup.log(&admin_id);
        if let Some(reason) = hangup.close_frame() {
            if let Err(err) = board.session.close(reason).await {
                debug!(error = %err, "live board already closed");
            }
        }
    }
}

struct Board {
    admin: Arc<dyn LetterAdmin>,
    letters: AdminBoard,
    session: Session,
    heard_from: Instant,
}

impl Board {
    async fn heartbeat(&mut self) -> Step {
        if self.heard_from.elapsed() > CLIENT_TIMEOUT {
            return Err(Hangup::Silent);
        }
        self.session.ping(b"").await.map_err(Hangup::Unwritable)
    }

    async fn on_notice(&mut self, notice: ChangeNotice) -> Step {
        if let ChangeNotice::Missed(skipped) = notice {
            debug!(skipped, "live board fell behind the change feed");
        }
        self.push(notice.into()).await
    }

    async fn on_message(&mut self, message: Message) -> Step {
        if let Message::Close(reason) = message {
            return Err(Hangup::ByClient(reason));
        }
        self.heard_from = Instant::now();
        match message {
            Message::Ping(payload) => self.session.pong(&payload).await.map_err(Hangup::Unwritable),
            Message::Text(text) => match serde_json::from_str::<ClientMessage>(&text) {
                Ok(ClientMessage::Refresh) => self.push(SnapshotCause::Requested).await,
                Err(err) => {
                    warn!(error = %err, "unrecognised live board command");
                    Err(Hangup::UnknownCommand)
                }
            },
            _ => Ok(()),
        }
    }

    /// Re-fetch and send the table. A failed fetch is reported as
    /// `refreshFailed` with the retained records and the socket stays open.
    async fn push(&mut self, cause: SnapshotCause) -> Step {
        let message = match self.letters.refresh(self.admin.as_ref()).await {
            Ok(()) => ServerMessage::snapshot(cause, self.letters.letters().to_vec()),
            Err(err) => {
                warn!(error = %err, ?cause, "live board refresh failed");
                ServerMessage::refresh_failed(err.message(), self.letters.letters().to_vec())
            }
        };
        let body = match serde_json::to_string(&message) {
            Ok(body) => body,
            Err(err) => {
                warn!(error = %err, "live board payload not serialisable");
                return Ok(());
            }
        };
        self.session.text(body).await.map_err(Hangup::Unwritable)
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
