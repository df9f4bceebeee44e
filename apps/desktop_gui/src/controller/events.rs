//! UI/backend events and error modeling for the desktop GUI controller.

use client_core::{SessionError, SessionPhase};

pub enum UiEvent {
    Info(String),
    PhaseChanged(SessionPhase),
    Error(UiError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Validation,
    Rejected,
    Transport,
    Startup,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    BackendStartup,
    NewGame,
    Move,
    Refresh,
}

#[derive(Debug, Clone)]
pub struct UiError {
    category: UiErrorCategory,
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn startup(message: impl Into<String>) -> Self {
        Self {
            category: UiErrorCategory::Startup,
            context: UiErrorContext::BackendStartup,
            message: message.into(),
        }
    }

    pub fn from_session_error(context: UiErrorContext, err: &SessionError) -> Self {
        let category = match err {
            SessionError::InvalidConfiguration(_) => UiErrorCategory::Validation,
            SessionError::RemoteRejection { .. } | SessionError::Superseded => {
                UiErrorCategory::Rejected
            }
            SessionError::TransportFailure(_) => UiErrorCategory::Transport,
        };
        Self {
            category,
            context,
            message: err.user_message(),
        }
    }

    /// Move failures are diagnostics only; everything else goes to the banner.
    pub fn is_shown(&self) -> bool {
        self.context != UiErrorContext::Move
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

pub fn err_label(category: UiErrorCategory) -> &'static str {
    match category {
        UiErrorCategory::Validation => "Invalid settings",
        UiErrorCategory::Rejected => "Server error",
        UiErrorCategory::Transport => "Connection",
        UiErrorCategory::Startup => "Startup",
    }
}
