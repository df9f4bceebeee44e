//! Client-side view of one playthrough and the lifecycle it moves through.

use shared::{
    domain::{BoardSnapshot, GameId},
    protocol::GameStateResponse,
};

use crate::error::SessionError;

/// Latest state received from the remote authority for one game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSession {
    pub id: GameId,
    pub board: BoardSnapshot,
    pub score: u64,
    pub terminal: bool,
    pub won: bool,
}

impl GameSession {
    pub fn side(&self) -> usize {
        self.board.side()
    }
}

impl TryFrom<GameStateResponse> for GameSession {
    type Error = SessionError;

    fn try_from(value: GameStateResponse) -> Result<Self, Self::Error> {
        let board = BoardSnapshot::try_from_rows(value.board)
            .map_err(|err| SessionError::protocol_violation(err.to_string()))?;
        Ok(Self {
            id: value.id,
            board,
            score: value.score,
            terminal: value.game_over,
            won: value.won,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SessionPhase {
    #[default]
    NoSession,
    Active(GameSession),
    Finished(GameSession),
}

/// Result of offering a remote update to the current phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateDisposition {
    Applied,
    /// The update belongs to a game that is no longer current.
    Stale,
    Violation(String),
}

impl SessionPhase {
    pub fn from_session(session: GameSession) -> Self {
        if session.terminal {
            Self::Finished(session)
        } else {
            Self::Active(session)
        }
    }

    pub fn session(&self) -> Option<&GameSession> {
        match self {
            Self::NoSession => None,
            Self::Active(session) | Self::Finished(session) => Some(session),
        }
    }

    pub fn game_id(&self) -> Option<&GameId> {
        self.session().map(|session| &session.id)
    }

    /// Input enablement: a session exists and is not terminal.
    pub fn accepts_moves(&self) -> bool {
        matches!(self, Self::Active(_))
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::NoSession => "no_session",
            Self::Active(_) => "active",
            Self::Finished(_) => "finished",
        }
    }

    /// Drops the current session, returning it if there was one.
    pub fn discard(&mut self) -> Option<GameSession> {
        match std::mem::take(self) {
            Self::NoSession => None,
            Self::Active(session) | Self::Finished(session) => Some(session),
        }
    }

    /// Replaces the session wholesale with `update` when it was issued for the
    /// current game and keeps the board geometry.
    ///
    /// A finished game only leaves `Finished` through a new session, so late
    /// responses for it are stale.
    pub fn apply_update(&mut self, origin: &GameId, update: GameSession) -> UpdateDisposition {
        let current = match &*self {
            Self::Active(current) => current,
            Self::NoSession | Self::Finished(_) => return UpdateDisposition::Stale,
        };
        if current.id != *origin {
            return UpdateDisposition::Stale;
        }
        if update.id != current.id {
            return UpdateDisposition::Violation(format!(
                "response for game {} carried id {}",
                current.id, update.id
            ));
        }
        if update.side() != current.side() {
            return UpdateDisposition::Violation(format!(
                "board dimension changed from {} to {} within game {}",
                current.side(),
                update.side(),
                current.id
            ));
        }
        *self = Self::from_session(update);
        UpdateDisposition::Applied
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(id: &str, side: usize, terminal: bool) -> GameSession {
        GameSession {
            id: GameId::new(id),
            board: BoardSnapshot::try_from_rows(vec![vec![0; side]; side]).expect("square"),
            score: 0,
            terminal,
            won: false,
        }
    }

    #[test]
    fn terminal_sessions_land_in_finished() {
        assert!(SessionPhase::from_session(session("a", 4, false)).accepts_moves());
        let finished = SessionPhase::from_session(session("a", 4, true));
        assert!(!finished.accepts_moves());
        assert_eq!(finished.label(), "finished");
        assert!(!SessionPhase::NoSession.accepts_moves());
    }

    #[test]
    fn update_for_other_game_is_stale() {
        let mut phase = SessionPhase::from_session(session("b", 4, false));
        let before = phase.clone();
        let disposition = phase.apply_update(&GameId::new("a"), session("a", 4, true));
        assert_eq!(disposition, UpdateDisposition::Stale);
        assert_eq!(phase, before);
    }

    #[test]
    fn update_without_session_is_stale() {
        let mut phase = SessionPhase::NoSession;
        assert_eq!(
            phase.apply_update(&GameId::new("a"), session("a", 4, false)),
            UpdateDisposition::Stale
        );
        assert_eq!(phase, SessionPhase::NoSession);
    }

    #[test]
    fn finished_game_ignores_late_updates() {
        let mut finished = session("a", 4, true);
        finished.score = 64;
        let mut phase = SessionPhase::from_session(finished);
        let before = phase.clone();

        let mut late = session("a", 4, false);
        late.score = 32;
        assert_eq!(
            phase.apply_update(&GameId::new("a"), late),
            UpdateDisposition::Stale
        );
        assert_eq!(phase, before);
        assert_eq!(phase.label(), "finished");
    }

    #[test]
    fn dimension_change_is_a_violation() {
        let mut phase = SessionPhase::from_session(session("a", 4, false));
        let disposition = phase.apply_update(&GameId::new("a"), session("a", 5, false));
        assert!(matches!(disposition, UpdateDisposition::Violation(_)));
        assert_eq!(phase.session().map(GameSession::side), Some(4));
    }

    #[test]
    fn terminal_update_moves_to_finished() {
        let mut phase = SessionPhase::from_session(session("a", 4, false));
        let mut update = session("a", 4, true);
        update.score = 96;
        assert_eq!(
            phase.apply_update(&GameId::new("a"), update),
            UpdateDisposition::Applied
        );
        assert!(matches!(phase, SessionPhase::Finished(ref s) if s.score == 96));
    }

    #[test]
    fn non_square_response_is_rejected() {
        let response = GameStateResponse {
            id: GameId::new("a"),
            board: vec![vec![0, 0, 0], vec![0, 0, 0]],
            score: 0,
            game_over: false,
            won: false,
        };
        let err = GameSession::try_from(response).expect_err("not square");
        assert!(matches!(err, SessionError::RemoteRejection { status: None, .. }));
    }
}
