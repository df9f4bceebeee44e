//! Board renderer: a pure mapping from a session to the grid a front end draws.

use std::fmt;

use crate::session::{GameSession, SessionPhase};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellView {
    Empty,
    /// Occupied cell. `value` is the presentation tag (color by value).
    Tile { value: u32, label: String },
}

impl CellView {
    pub fn label(&self) -> Option<&str> {
        match self {
            CellView::Empty => None,
            CellView::Tile { label, .. } => Some(label),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardView {
    pub side: usize,
    /// Row-major, `side * side` cells.
    pub cells: Vec<CellView>,
    pub score_text: String,
    pub overlay_visible: bool,
    pub won: bool,
}

pub fn render(session: &GameSession) -> BoardView {
    let side = session.board.side();
    let cells = session
        .board
        .rows()
        .iter()
        .flatten()
        .map(|&value| {
            if value > 0 {
                CellView::Tile {
                    value,
                    label: value.to_string(),
                }
            } else {
                CellView::Empty
            }
        })
        .collect();

    BoardView {
        side,
        cells,
        score_text: session.score.to_string(),
        overlay_visible: session.terminal,
        won: session.won,
    }
}

impl BoardView {
    pub fn rows(&self) -> std::slice::Chunks<'_, CellView> {
        self.cells.chunks(self.side.max(1))
    }
}

/// Anything that can show a rendered board.
pub trait BoardSurface {
    fn present(&mut self, view: &BoardView);
    fn clear(&mut self);
}

/// Presents the phase's session, or clears the surface when there is none.
pub fn present_phase(surface: &mut dyn BoardSurface, phase: &SessionPhase) {
    match phase.session() {
        Some(session) => surface.present(&render(session)),
        None => surface.clear(),
    }
}

impl fmt::Display for BoardView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self
            .cells
            .iter()
            .filter_map(CellView::label)
            .map(str::len)
            .max()
            .unwrap_or(1)
            .max(4);

        writeln!(f, "Score: {}", self.score_text)?;
        let border = format!("+{}", format!("{}+", "-".repeat(width + 2)).repeat(self.side));
        writeln!(f, "{border}")?;
        for row in self.rows() {
            write!(f, "|")?;
            for cell in row {
                write!(f, " {:>width$} |", cell.label().unwrap_or(""))?;
            }
            writeln!(f)?;
            writeln!(f, "{border}")?;
        }
        if self.won {
            writeln!(f, "You reached 2048!")?;
        }
        if self.overlay_visible {
            writeln!(f, "GAME OVER")?;
        }
        Ok(())
    }
}
