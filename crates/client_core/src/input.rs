//! Input router: input event -> intent -> guarded action.
//!
//! Front ends translate their toolkit's key and button events into
//! [`InputEvent`]s and honor [`Routed::suppress_default`]; everything past
//! that point is toolkit independent.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use shared::domain::MoveDirection;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::{error::SessionError, session::GameSession, GameClient, MoveOutcome};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyInput {
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Other(String),
}

impl From<MoveDirection> for KeyInput {
    fn from(direction: MoveDirection) -> Self {
        match direction {
            MoveDirection::Up => KeyInput::ArrowUp,
            MoveDirection::Down => KeyInput::ArrowDown,
            MoveDirection::Left => KeyInput::ArrowLeft,
            MoveDirection::Right => KeyInput::ArrowRight,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    Key(KeyInput),
    NewGame,
    Restart,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Move(MoveDirection),
    StartSession,
}

impl InputEvent {
    pub fn intent(&self) -> Option<Intent> {
        match self {
            InputEvent::Key(KeyInput::ArrowUp) => Some(Intent::Move(MoveDirection::Up)),
            InputEvent::Key(KeyInput::ArrowDown) => Some(Intent::Move(MoveDirection::Down)),
            InputEvent::Key(KeyInput::ArrowLeft) => Some(Intent::Move(MoveDirection::Left)),
            InputEvent::Key(KeyInput::ArrowRight) => Some(Intent::Move(MoveDirection::Right)),
            InputEvent::Key(KeyInput::Other(_)) => None,
            InputEvent::NewGame | InputEvent::Restart => Some(Intent::StartSession),
        }
    }

    /// Arrow keys never reach the surface's default handler (no scrolling).
    pub fn suppresses_default(&self) -> bool {
        matches!(
            self,
            InputEvent::Key(
                KeyInput::ArrowUp | KeyInput::ArrowDown | KeyInput::ArrowLeft | KeyInput::ArrowRight
            )
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// The event has no meaning for the game.
    Unmapped,
    /// A move was blocked by input enablement; nothing was sent.
    Guarded,
    Moved(MoveOutcome),
    /// Logged only; the displayed session is untouched.
    MoveDropped(SessionError),
    Started(GameSession),
    /// Shown to the user.
    StartFailed(SessionError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Routed {
    pub suppress_default: bool,
    pub dispatch: Dispatch,
}

pub struct InputRouter {
    client: Arc<GameClient>,
    board_size: RwLock<i64>,
    bootstrapped: AtomicBool,
}

impl InputRouter {
    pub fn new(client: Arc<GameClient>, board_size: i64) -> Self {
        Self {
            client,
            board_size: RwLock::new(board_size),
            bootstrapped: AtomicBool::new(false),
        }
    }

    pub fn client(&self) -> &Arc<GameClient> {
        &self.client
    }

    pub async fn board_size(&self) -> i64 {
        *self.board_size.read().await
    }

    /// Updates the size used by the next "new game" or "restart".
    pub async fn set_board_size(&self, size: i64) {
        *self.board_size.write().await = size;
    }

    /// The implicit start on initial load. Only the first call does anything.
    pub async fn bootstrap(&self) -> Option<Dispatch> {
        if self.bootstrapped.swap(true, Ordering::SeqCst) {
            return None;
        }
        Some(self.start().await)
    }

    pub async fn handle(&self, event: InputEvent) -> Routed {
        let suppress_default = event.suppresses_default();
        let dispatch = match event.intent() {
            None => Dispatch::Unmapped,
            Some(Intent::StartSession) => self.start().await,
            Some(Intent::Move(direction)) => self.forward_move(direction).await,
        };
        Routed {
            suppress_default,
            dispatch,
        }
    }

    async fn start(&self) -> Dispatch {
        let size = self.board_size().await;
        match self.client.start_session(size).await {
            Ok(session) => Dispatch::Started(session),
            Err(err) => Dispatch::StartFailed(err),
        }
    }

    async fn forward_move(&self, direction: MoveDirection) -> Dispatch {
        if !self.client.input_enabled().await {
            debug!(%direction, "input: move guarded, no active game");
            return Dispatch::Guarded;
        }
        match self.client.submit_move(direction).await {
            Ok(outcome) => Dispatch::Moved(outcome),
            Err(err) => {
                warn!(%direction, error = %err, "input: move dropped");
                Dispatch::MoveDropped(err)
            }
        }
    }
}
