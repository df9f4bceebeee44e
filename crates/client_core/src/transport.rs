//! Remote authority seam and its HTTP implementation.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use shared::{
    domain::{BoardSize, GameId, MoveDirection},
    error::ApiError,
    protocol::{CreateGameQuery, GameStateResponse, MoveQuery},
};
use tracing::debug;
use url::Url;

use crate::{config::ClientSettings, error::SessionError};

/// The service that owns the game rules. The client only asks it for state.
#[async_trait]
pub trait RemoteAuthority: Send + Sync {
    async fn create_game(&self, size: BoardSize) -> Result<GameStateResponse, SessionError>;
    async fn submit_move(
        &self,
        game_id: &GameId,
        direction: MoveDirection,
    ) -> Result<GameStateResponse, SessionError>;
    async fn fetch_game(&self, game_id: &GameId) -> Result<GameStateResponse, SessionError>;
}

#[derive(Debug, Clone, Copy)]
enum Operation {
    Create,
    Move,
    Fetch,
}

impl Operation {
    fn name(self) -> &'static str {
        match self {
            Operation::Create => "create",
            Operation::Move => "move",
            Operation::Fetch => "fetch",
        }
    }

    fn fallback_message(self, status: u16) -> String {
        match self {
            Operation::Create => format!("Failed to start a new game (status {status})."),
            Operation::Move => format!("Move failed with status: {status}"),
            Operation::Fetch => format!("Fetching game failed with status: {status}"),
        }
    }
}

pub struct HttpAuthority {
    http: Client,
    server_url: Url,
}

impl HttpAuthority {
    pub fn new(server_url: &str) -> Result<Self, SessionError> {
        Self::with_client(Client::new(), server_url)
    }

    pub fn from_settings(settings: &ClientSettings) -> Result<Self, SessionError> {
        let mut builder = Client::builder();
        if let Some(secs) = settings.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http = builder.build().map_err(|err| {
            SessionError::TransportFailure(format!("failed to build http client: {err}"))
        })?;
        Self::with_client(http, &settings.server_url)
    }

    pub fn with_client(http: Client, server_url: &str) -> Result<Self, SessionError> {
        let server_url = Url::parse(server_url).map_err(|err| {
            SessionError::InvalidConfiguration(format!("invalid server url '{server_url}': {err}"))
        })?;
        if server_url.cannot_be_a_base() {
            return Err(SessionError::InvalidConfiguration(format!(
                "server url '{server_url}' cannot carry a path"
            )));
        }
        Ok(Self { http, server_url })
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.server_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn read_game_state(
        response: Response,
        operation: Operation,
    ) -> Result<GameStateResponse, SessionError> {
        let status = response.status();
        let body = response.bytes().await.map_err(|err| {
            SessionError::TransportFailure(format!(
                "failed to read {} response body: {err}",
                operation.name()
            ))
        })?;

        if !status.is_success() {
            let message = serde_json::from_slice::<ApiError>(&body)
                .ok()
                .and_then(|api_error| api_error.describe().map(str::to_owned))
                .unwrap_or_else(|| operation.fallback_message(status.as_u16()));
            return Err(SessionError::RemoteRejection {
                status: Some(status.as_u16()),
                message,
            });
        }

        serde_json::from_slice(&body).map_err(|err| SessionError::RemoteRejection {
            status: Some(status.as_u16()),
            message: format!("malformed {} response: {err}", operation.name()),
        })
    }
}

fn transport_failure(operation: Operation, err: reqwest::Error) -> SessionError {
    SessionError::TransportFailure(format!("{} request failed: {err}", operation.name()))
}

#[async_trait]
impl RemoteAuthority for HttpAuthority {
    async fn create_game(&self, size: BoardSize) -> Result<GameStateResponse, SessionError> {
        let url = self.endpoint(&["api", "games"]);
        debug!(%url, board_size = size.get(), "authority: create game");
        let response = self
            .http
            .post(url)
            .query(&CreateGameQuery::from(size))
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .send()
            .await
            .map_err(|err| transport_failure(Operation::Create, err))?;
        Self::read_game_state(response, Operation::Create).await
    }

    async fn submit_move(
        &self,
        game_id: &GameId,
        direction: MoveDirection,
    ) -> Result<GameStateResponse, SessionError> {
        let url = self.endpoint(&["api", "games", game_id.as_str(), "move"]);
        debug!(%url, %direction, "authority: submit move");
        let response = self
            .http
            .post(url)
            .query(&MoveQuery { direction })
            .send()
            .await
            .map_err(|err| transport_failure(Operation::Move, err))?;
        Self::read_game_state(response, Operation::Move).await
    }

    async fn fetch_game(&self, game_id: &GameId) -> Result<GameStateResponse, SessionError> {
        let url = self.endpoint(&["api", "games", game_id.as_str()]);
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|err| transport_failure(Operation::Fetch, err))?;
        Self::read_game_state(response, Operation::Fetch).await
    }
}
