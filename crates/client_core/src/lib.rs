use std::sync::Arc;

use shared::domain::{BoardSize, GameId, MoveDirection};
use tokio::sync::{broadcast, Mutex};
use tracing::{debug, info, warn};

pub mod config;
pub mod error;
pub mod input;
pub mod render;
pub mod session;
pub mod transport;

pub use config::{load_settings, ClientSettings};
pub use error::SessionError;
pub use input::{Dispatch, InputEvent, InputRouter, Intent, KeyInput, Routed};
pub use render::{present_phase, render, BoardSurface, BoardView, CellView};
pub use session::{GameSession, SessionPhase, UpdateDisposition};
pub use transport::{HttpAuthority, RemoteAuthority};

#[derive(Debug, Clone)]
pub enum ClientEvent {
    /// Emitted after every applied lifecycle transition.
    PhaseChanged(SessionPhase),
    /// A move or refresh failed and was dropped; the session is unchanged.
    UpdateDropped {
        game_id: GameId,
        error: SessionError,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
    Applied(GameSession),
    /// Input was disabled; nothing was sent.
    Skipped,
    /// The response arrived after its game stopped being current.
    Stale,
}

struct ClientState {
    phase: SessionPhase,
    creation_generation: u64,
}

/// Session manager: owns the view of the current game and talks to the
/// remote authority on its behalf.
pub struct GameClient {
    authority: Arc<dyn RemoteAuthority>,
    inner: Mutex<ClientState>,
    events: broadcast::Sender<ClientEvent>,
}

impl GameClient {
    pub fn new(authority: Arc<dyn RemoteAuthority>) -> Arc<Self> {
        let (events, _) = broadcast::channel(256);
        Arc::new(Self {
            authority,
            inner: Mutex::new(ClientState {
                phase: SessionPhase::NoSession,
                creation_generation: 0,
            }),
            events,
        })
    }

    pub fn from_settings(settings: &ClientSettings) -> Result<Arc<Self>, SessionError> {
        let authority = HttpAuthority::from_settings(settings)?;
        Ok(Self::new(Arc::new(authority)))
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<ClientEvent> {
        self.events.subscribe()
    }

    pub async fn phase(&self) -> SessionPhase {
        self.inner.lock().await.phase.clone()
    }

    pub async fn current_session(&self) -> Option<GameSession> {
        self.inner.lock().await.phase.session().cloned()
    }

    pub async fn input_enabled(&self) -> bool {
        self.inner.lock().await.phase.accepts_moves()
    }

    fn publish(&self, phase: &SessionPhase) {
        let _ = self.events.send(ClientEvent::PhaseChanged(phase.clone()));
    }

    /// Starts a new game of `requested` × `requested` cells.
    ///
    /// Out-of-range sizes fail before any request. Otherwise the previous
    /// game is discarded immediately, even if creation later fails.
    pub async fn start_session(&self, requested: i64) -> Result<GameSession, SessionError> {
        let size = BoardSize::new(requested).map_err(|err| {
            warn!(requested, "session: rejected board size");
            SessionError::from(err)
        })?;

        let generation = {
            let mut guard = self.inner.lock().await;
            guard.creation_generation += 1;
            if let Some(previous) = guard.phase.discard() {
                info!(game_id = %previous.id, "session: discarded previous game");
                self.publish(&guard.phase);
            }
            guard.creation_generation
        };

        let result = self
            .authority
            .create_game(size)
            .await
            .and_then(GameSession::try_from)
            .and_then(|session| {
                if session.side() != size.side() {
                    return Err(SessionError::protocol_violation(format!(
                        "requested a {size}x{size} board, received {}x{}",
                        session.side(),
                        session.side()
                    )));
                }
                Ok(session)
            });

        let mut guard = self.inner.lock().await;
        if guard.creation_generation != generation {
            debug!(
                board_size = size.get(),
                "session: creation superseded by a newer request"
            );
            return Err(SessionError::Superseded);
        }

        match result {
            Ok(session) => {
                info!(
                    game_id = %session.id,
                    board_size = size.get(),
                    "session: game started"
                );
                guard.phase = SessionPhase::from_session(session.clone());
                self.publish(&guard.phase);
                Ok(session)
            }
            Err(err) => {
                warn!(board_size = size.get(), error = %err, "session: creation failed");
                Err(err)
            }
        }
    }

    /// Sends `direction` for the current game. A no-op unless input is enabled.
    ///
    /// Failures are logged and returned; the stored session is left as it was.
    pub async fn submit_move(&self, direction: MoveDirection) -> Result<MoveOutcome, SessionError> {
        let game_id = {
            let guard = self.inner.lock().await;
            match &guard.phase {
                SessionPhase::Active(session) => session.id.clone(),
                other => {
                    debug!(phase = other.label(), %direction, "session: move ignored");
                    return Ok(MoveOutcome::Skipped);
                }
            }
        };

        let result = self
            .authority
            .submit_move(&game_id, direction)
            .await
            .and_then(GameSession::try_from);
        self.apply_remote_update(&game_id, result, "move").await
    }

    /// Re-reads the current game from the authority.
    pub async fn refresh(&self) -> Result<MoveOutcome, SessionError> {
        let Some(game_id) = self.inner.lock().await.phase.game_id().cloned() else {
            return Ok(MoveOutcome::Skipped);
        };

        let result = self
            .authority
            .fetch_game(&game_id)
            .await
            .and_then(GameSession::try_from);
        self.apply_remote_update(&game_id, result, "refresh").await
    }

    async fn apply_remote_update(
        &self,
        origin: &GameId,
        result: Result<GameSession, SessionError>,
        action: &'static str,
    ) -> Result<MoveOutcome, SessionError> {
        let update = match result {
            Ok(update) => update,
            Err(error) => {
                warn!(game_id = %origin, action, %error, "session: update dropped");
                let _ = self.events.send(ClientEvent::UpdateDropped {
                    game_id: origin.clone(),
                    error: error.clone(),
                });
                return Err(error);
            }
        };

        let mut guard = self.inner.lock().await;
        match guard.phase.apply_update(origin, update) {
            UpdateDisposition::Applied => {
                self.publish(&guard.phase);
                let session = guard.phase.session().cloned();
                if let Some(session) = &session {
                    debug!(
                        game_id = %session.id,
                        action,
                        score = session.score,
                        terminal = session.terminal,
                        "session: update applied"
                    );
                }
                Ok(session.map_or(MoveOutcome::Stale, MoveOutcome::Applied))
            }
            UpdateDisposition::Stale => {
                info!(
                    game_id = %origin,
                    action,
                    current = ?guard.phase.game_id(),
                    "session: ignored response for a game that is no longer current or already finished"
                );
                Ok(MoveOutcome::Stale)
            }
            UpdateDisposition::Violation(message) => {
                let error = SessionError::protocol_violation(message);
                warn!(game_id = %origin, action, %error, "session: update dropped");
                let _ = self.events.send(ClientEvent::UpdateDropped {
                    game_id: origin.clone(),
                    error: error.clone(),
                });
                Err(error)
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
