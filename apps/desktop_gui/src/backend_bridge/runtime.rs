//! Runtime bridge between UI command queue and backend event intake.

use std::{sync::Arc, thread};

use client_core::{
    ClientEvent, ClientSettings, Dispatch, GameClient, InputRouter, MoveOutcome,
};
use crossbeam_channel::{Receiver, Sender};
use tokio::sync::broadcast::error::RecvError;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext, UiEvent};

pub fn launch(settings: ClientSettings, cmd_rx: Receiver<BackendCommand>, ui_tx: Sender<UiEvent>) {
    thread::spawn(move || {
        let _ = ui_tx.try_send(UiEvent::Info("Backend worker starting...".to_string()));
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::Error(UiError::startup(format!(
                    "backend worker startup failure: failed to build runtime: {err}"
                ))));
                tracing::error!("failed to build backend runtime: {err}");
                return;
            }
        };

        runtime.block_on(async move {
            let client = match GameClient::from_settings(&settings) {
                Ok(client) => client,
                Err(err) => {
                    let _ = ui_tx.try_send(UiEvent::Error(UiError::startup(format!(
                        "backend worker startup failure: {err}"
                    ))));
                    tracing::error!(server_url = %settings.server_url, "failed to create game client: {err}");
                    return;
                }
            };
            let router = Arc::new(InputRouter::new(client.clone(), settings.board_size));
            let _ = ui_tx.try_send(UiEvent::Info(format!(
                "Connected to {}",
                settings.server_url
            )));

            let event_task = tokio::spawn(forward_client_events(client.clone(), ui_tx.clone()));

            while let Ok(cmd) = cmd_rx.recv() {
                match cmd {
                    BackendCommand::SetBoardSize(size) => router.set_board_size(size).await,
                    BackendCommand::Bootstrap => {
                        let router = router.clone();
                        let ui_tx = ui_tx.clone();
                        tokio::spawn(async move {
                            if let Some(dispatch) = router.bootstrap().await {
                                report_dispatch(&ui_tx, dispatch);
                            }
                        });
                    }
                    BackendCommand::Input(event) => {
                        let router = router.clone();
                        let ui_tx = ui_tx.clone();
                        tokio::spawn(async move {
                            let routed = router.handle(event).await;
                            report_dispatch(&ui_tx, routed.dispatch);
                        });
                    }
                    BackendCommand::Refresh => {
                        let client = client.clone();
                        let ui_tx = ui_tx.clone();
                        tokio::spawn(async move {
                            match client.refresh().await {
                                Ok(MoveOutcome::Applied(_)) => {
                                    let _ = ui_tx.try_send(UiEvent::Info(
                                        "Game reloaded from server".to_string(),
                                    ));
                                }
                                Ok(_) => {}
                                Err(err) => {
                                    let _ = ui_tx.try_send(UiEvent::Error(
                                        UiError::from_session_error(UiErrorContext::Refresh, &err),
                                    ));
                                }
                            }
                        });
                    }
                }
            }

            event_task.abort();
            tracing::info!("ui command channel closed; backend worker exiting");
        });
    });
}

async fn forward_client_events(client: Arc<GameClient>, ui_tx: Sender<UiEvent>) {
    let mut events = client.subscribe_events();
    loop {
        match events.recv().await {
            Ok(ClientEvent::PhaseChanged(phase)) => {
                if ui_tx.send(UiEvent::PhaseChanged(phase)).is_err() {
                    break;
                }
            }
            Ok(ClientEvent::UpdateDropped { game_id, error }) => {
                tracing::warn!(%game_id, %error, "update dropped");
                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_session_error(
                    UiErrorContext::Move,
                    &error,
                )));
            }
            Err(RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "client events lagged; resending current phase");
                if ui_tx.send(UiEvent::PhaseChanged(client.phase().await)).is_err() {
                    break;
                }
            }
            Err(RecvError::Closed) => break,
        }
    }
}

fn report_dispatch(ui_tx: &Sender<UiEvent>, dispatch: Dispatch) {
    match dispatch {
        Dispatch::StartFailed(err) if err.is_user_visible() => {
            let _ = ui_tx.try_send(UiEvent::Error(UiError::from_session_error(
                UiErrorContext::NewGame,
                &err,
            )));
        }
        Dispatch::StartFailed(err) => tracing::debug!(%err, "start superseded"),
        Dispatch::Started(session) => {
            let _ = ui_tx.try_send(UiEvent::Info(format!(
                "Started game {} ({}x{})",
                session.id,
                session.side(),
                session.side()
            )));
        }
        Dispatch::Moved(MoveOutcome::Stale) => {
            tracing::debug!("move response ignored; game no longer current");
        }
        Dispatch::Unmapped | Dispatch::Guarded | Dispatch::Moved(_) | Dispatch::MoveDropped(_) => {}
    }
}
