//! Backend commands queued from UI to backend worker.

use client_core::InputEvent;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendCommand {
    /// Implicit first game on startup.
    Bootstrap,
    Input(InputEvent),
    SetBoardSize(i64),
    Refresh,
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            BackendCommand::Bootstrap => "bootstrap",
            BackendCommand::Input(InputEvent::Key(_)) => "key",
            BackendCommand::Input(InputEvent::NewGame) => "new_game",
            BackendCommand::Input(InputEvent::Restart) => "restart",
            BackendCommand::SetBoardSize(_) => "set_board_size",
            BackendCommand::Refresh => "refresh",
        }
    }
}
