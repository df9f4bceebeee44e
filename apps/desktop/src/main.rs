use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use clap::Parser;
use client_core::{
    config::{load_settings_from, DEFAULT_SETTINGS_FILE},
    present_phase, BoardSurface, BoardView, ClientEvent, Dispatch, GameClient, InputEvent,
    InputRouter, KeyInput, MoveOutcome,
};
use shared::domain::{BoardSize, MoveDirection};
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::broadcast::{self, error::RecvError},
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(about = "Play a remote 2048 game from the terminal")]
struct Args {
    #[arg(long)]
    server_url: Option<String>,
    #[arg(long)]
    board_size: Option<i64>,
    #[arg(long, default_value = DEFAULT_SETTINGS_FILE)]
    config: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Input(InputEvent),
    Size(i64),
    Sync,
    Help,
    Quit,
    Unknown(String),
}

fn parse_command(line: &str) -> Command {
    let line = line.trim();
    let key = |k| Command::Input(InputEvent::Key(k));
    match line.to_ascii_lowercase().as_str() {
        "w" | "k" | "\u{1b}[a" => key(KeyInput::ArrowUp),
        "s" | "j" | "\u{1b}[b" => key(KeyInput::ArrowDown),
        "a" | "h" | "\u{1b}[d" => key(KeyInput::ArrowLeft),
        "d" | "l" | "\u{1b}[c" => key(KeyInput::ArrowRight),
        "n" | "new" => Command::Input(InputEvent::NewGame),
        "r" | "restart" => Command::Input(InputEvent::Restart),
        "sync" => Command::Sync,
        "?" | "help" => Command::Help,
        "q" | "quit" | "exit" => Command::Quit,
        other => {
            if let Ok(direction) = other.parse::<MoveDirection>() {
                return key(KeyInput::from(direction));
            }
            match other.strip_prefix("size") {
                Some(rest) => rest
                    .trim()
                    .parse()
                    .map(Command::Size)
                    .unwrap_or_else(|_| Command::Unknown(line.to_string())),
                None => Command::Unknown(line.to_string()),
            }
        }
    }
}

const HELP: &str = "\
moves:    w/a/s/d, h/j/k/l, up/down/left/right (or an arrow key then Enter)
new game: new | restart
size:     size N   (between 3 and 10, used by the next new game)
sync:     reload the current game from the server
quit:     q";

struct TerminalSurface;

impl BoardSurface for TerminalSurface {
    fn present(&mut self, view: &BoardView) {
        println!("\n{view}");
    }

    fn clear(&mut self) {
        println!("\nNo active game. Type `new` to start one.");
    }
}

fn report(dispatch: &Dispatch) {
    match dispatch {
        Dispatch::StartFailed(err) if err.is_user_visible() => eprintln!("{}", err.user_message()),
        Dispatch::Guarded => println!("No active game; moves are disabled."),
        Dispatch::Moved(MoveOutcome::Stale) => println!("Ignored a response for an older game."),
        Dispatch::Unmapped => println!("Unknown command. Type `help` for commands."),
        _ => {}
    }
}

async fn redraw_on_events<S: BoardSurface>(
    mut events: broadcast::Receiver<ClientEvent>,
    client: Arc<GameClient>,
    mut surface: S,
) -> S {
    loop {
        match events.recv().await {
            Ok(ClientEvent::PhaseChanged(phase)) => present_phase(&mut surface, &phase),
            Ok(ClientEvent::UpdateDropped { .. }) => {}
            Err(RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "client events lagged; redrawing current phase");
                let phase = client.phase().await;
                present_phase(&mut surface, &phase);
            }
            Err(RecvError::Closed) => break,
        }
    }
    surface
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let mut settings = load_settings_from(&args.config, |key| std::env::var(key).ok());
    if let Some(server_url) = args.server_url {
        settings.server_url = client_core::config::normalize_server_url(&server_url);
    }
    if let Some(board_size) = args.board_size {
        settings.board_size = board_size;
    }

    tracing::info!(
        server_url = %settings.server_url,
        board_size = settings.board_size,
        "terminal client starting"
    );
    let client = GameClient::from_settings(&settings)
        .with_context(|| format!("failed to set up client for {}", settings.server_url))?;
    let router = Arc::new(InputRouter::new(client.clone(), settings.board_size));

    let render_task = tokio::spawn(redraw_on_events(
        client.subscribe_events(),
        client.clone(),
        TerminalSurface,
    ));

    println!("Connected to {}. Type `help` for commands.", settings.server_url);
    if let Some(dispatch) = router.bootstrap().await {
        report(&dispatch);
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("failed to read stdin")? {
        match parse_command(&line) {
            Command::Input(event) => {
                let routed = router.handle(event).await;
                report(&routed.dispatch);
            }
            Command::Size(size) => match BoardSize::new(size) {
                Ok(size) => {
                    router.set_board_size(i64::from(size.get())).await;
                    println!("Next game will be {size}x{size}.");
                }
                Err(err) => eprintln!("Please select a board size between 3 and 10 ({err})."),
            },
            Command::Sync => {
                if let Err(err) = client.refresh().await {
                    tracing::warn!(error = %err, "refresh failed");
                    eprintln!("{}", err.user_message());
                }
            }
            Command::Help => println!("{HELP}"),
            Command::Quit => break,
            Command::Unknown(text) if text.is_empty() => {}
            Command::Unknown(text) => {
                let routed = router.handle(InputEvent::Key(KeyInput::Other(text))).await;
                report(&routed.dispatch);
            }
        }
    }

    render_task.abort();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use client_core::{ClientSettings, GameSession, SessionPhase};
    use shared::domain::{BoardSnapshot, GameId};

    #[derive(Default)]
    struct RecordingSurface {
        frames: Vec<Option<String>>,
    }

    impl BoardSurface for RecordingSurface {
        fn present(&mut self, view: &BoardView) {
            self.frames.push(Some(view.score_text.clone()));
        }

        fn clear(&mut self) {
            self.frames.push(None);
        }
    }

    fn active(score: u64) -> SessionPhase {
        SessionPhase::from_session(GameSession {
            id: GameId::new("g1"),
            board: BoardSnapshot::try_from_rows(vec![vec![0; 4]; 4]).expect("square"),
            score,
            terminal: false,
            won: false,
        })
    }

    #[tokio::test]
    async fn lagged_events_redraw_current_phase_and_keep_listening() {
        let client = GameClient::from_settings(&ClientSettings::default()).expect("client");
        let (tx, rx) = broadcast::channel(1);
        for score in [4, 8, 12] {
            tx.send(ClientEvent::PhaseChanged(active(score)))
                .expect("receiver alive");
        }
        drop(tx);

        let surface = redraw_on_events(rx, client, RecordingSurface::default()).await;
        assert_eq!(surface.frames, vec![None, Some("12".to_string())]);
    }

    #[test]
    fn parses_movement_aliases_and_arrow_escapes() {
        assert_eq!(parse_command("w"), Command::Input(InputEvent::Key(KeyInput::ArrowUp)));
        assert_eq!(
            parse_command(" LEFT "),
            Command::Input(InputEvent::Key(KeyInput::ArrowLeft))
        );
        assert_eq!(
            parse_command("\u{1b}[B"),
            Command::Input(InputEvent::Key(KeyInput::ArrowDown))
        );
        assert_eq!(
            parse_command("l"),
            Command::Input(InputEvent::Key(KeyInput::ArrowRight))
        );
        assert_eq!(
            parse_command("Up"),
            Command::Input(InputEvent::Key(KeyInput::ArrowUp))
        );
    }

    #[test]
    fn parses_session_commands() {
        assert_eq!(parse_command("new"), Command::Input(InputEvent::NewGame));
        assert_eq!(parse_command("restart"), Command::Input(InputEvent::Restart));
        assert_eq!(parse_command("size 6"), Command::Size(6));
        assert_eq!(parse_command("size 42"), Command::Size(42));
        assert_eq!(parse_command("sync"), Command::Sync);
        assert_eq!(parse_command("q"), Command::Quit);
        assert_eq!(
            parse_command("size big"),
            Command::Unknown("size big".to_string())
        );
        assert_eq!(parse_command(""), Command::Unknown(String::new()));
        assert_eq!(parse_command("jump"), Command::Unknown("jump".to_string()));
    }
}
