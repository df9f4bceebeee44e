use shared::domain::BoardSizeError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// Rejected locally; never reaches the network.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
    /// The authority answered, but not with a usable game state.
    #[error("remote authority rejected the request: {message}")]
    RemoteRejection {
        status: Option<u16>,
        message: String,
    },
    #[error("transport failure: {0}")]
    TransportFailure(String),
    /// A newer session creation was issued before this one completed.
    #[error("session creation superseded by a newer request")]
    Superseded,
}

impl From<BoardSizeError> for SessionError {
    fn from(value: BoardSizeError) -> Self {
        Self::InvalidConfiguration(value.to_string())
    }
}

impl SessionError {
    pub fn protocol_violation(message: impl Into<String>) -> Self {
        Self::RemoteRejection {
            status: None,
            message: format!("protocol violation: {}", message.into()),
        }
    }

    /// Whether a front end should show this error when it ends a session
    /// creation attempt.
    pub fn is_user_visible(&self) -> bool {
        !matches!(self, Self::Superseded)
    }

    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidConfiguration(message) => {
                let mut text = message.clone();
                if let Some(first) = text.get_mut(0..1) {
                    first.make_ascii_uppercase();
                }
                text
            }
            Self::RemoteRejection { message, .. } => format!("Error: {message}"),
            Self::TransportFailure(message) => format!("Error: server unreachable ({message})"),
            Self::Superseded => "A newer game was requested.".to_string(),
        }
    }
}
