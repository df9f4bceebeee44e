//! Desktop GUI app shell: toolbar, board surface, game-over overlay, status.

use std::time::Duration;

use client_core::{present_phase, BoardSurface, BoardView, CellView, InputEvent, KeyInput};
use crossbeam_channel::{Receiver, Sender};
use eframe::egui;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{err_label, UiError, UiEvent};
use crate::controller::orchestration::dispatch_backend_command;
use crate::ui::theme;

const CELL_GAP: f32 = 10.0;
const MAX_BOARD_EXTENT: f32 = 520.0;

/// Retained board state; `present_phase` writes into it, `paint` draws it.
#[derive(Default)]
struct GuiBoard {
    view: Option<BoardView>,
}

impl BoardSurface for GuiBoard {
    fn present(&mut self, view: &BoardView) {
        self.view = Some(view.clone());
    }

    fn clear(&mut self) {
        self.view = None;
    }
}

impl GuiBoard {
    fn score_text(&self) -> &str {
        self.view.as_ref().map_or("0", |view| view.score_text.as_str())
    }

    fn overlay_visible(&self) -> bool {
        self.view.as_ref().is_some_and(|view| view.overlay_visible)
    }

    fn paint(&self, ui: &mut egui::Ui) -> egui::Rect {
        let extent = ui.available_width().min(ui.available_height()).min(MAX_BOARD_EXTENT);
        let (rect, _) = ui.allocate_exact_size(egui::vec2(extent, extent), egui::Sense::hover());
        let painter = ui.painter_at(rect);
        painter.rect_filled(rect, 8.0, theme::BOARD_BACKGROUND);

        let Some(view) = &self.view else {
            painter.text(
                rect.center(),
                egui::Align2::CENTER_CENTER,
                "No game",
                egui::FontId::proportional(28.0),
                theme::EMPTY_CELL,
            );
            return rect;
        };

        let side = view.side.max(1) as f32;
        let cell = (extent - CELL_GAP * (side + 1.0)) / side;
        for (row_index, row) in view.rows().enumerate() {
            for (col_index, cell_view) in row.iter().enumerate() {
                let min = rect.min
                    + egui::vec2(
                        CELL_GAP + col_index as f32 * (cell + CELL_GAP),
                        CELL_GAP + row_index as f32 * (cell + CELL_GAP),
                    );
                let cell_rect = egui::Rect::from_min_size(min, egui::vec2(cell, cell));
                match cell_view {
                    CellView::Empty => {
                        painter.rect_filled(cell_rect, 4.0, theme::EMPTY_CELL);
                    }
                    CellView::Tile { value, label } => {
                        painter.rect_filled(cell_rect, 4.0, theme::tile_fill(*value));
                        painter.text(
                            cell_rect.center(),
                            egui::Align2::CENTER_CENTER,
                            label,
                            egui::FontId::proportional(theme::label_size(cell, label)),
                            theme::tile_text(*value),
                        );
                    }
                }
            }
        }

        if view.overlay_visible {
            painter.rect_filled(rect, 8.0, theme::OVERLAY_TINT);
        }
        rect
    }
}

pub struct GameApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    board: GuiBoard,
    board_size_input: i64,
    status: String,
    status_banner: Option<UiError>,
    phase_label: &'static str,
}

impl GameApp {
    pub fn new(
        cmd_tx: Sender<BackendCommand>,
        ui_rx: Receiver<UiEvent>,
        board_size: i64,
    ) -> Self {
        let mut app = Self {
            cmd_tx,
            ui_rx,
            board: GuiBoard::default(),
            board_size_input: board_size,
            status: "Starting...".to_string(),
            status_banner: None,
            phase_label: "no_session",
        };
        dispatch_backend_command(&app.cmd_tx, BackendCommand::Bootstrap, &mut app.status);
        app
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            match event {
                UiEvent::Info(message) => self.status = message,
                UiEvent::PhaseChanged(phase) => {
                    self.phase_label = phase.label();
                    present_phase(&mut self.board, &phase);
                    if phase.accepts_moves() {
                        self.status_banner = None;
                    }
                }
                UiEvent::Error(err) => {
                    tracing::warn!(
                        context = ?err.context(),
                        category = ?err.category(),
                        "{}",
                        err.message()
                    );
                    if err.is_shown() {
                        self.status = err.message().to_string();
                        self.status_banner = Some(err);
                    }
                }
            }
        }
    }

    fn send(&mut self, cmd: BackendCommand) {
        dispatch_backend_command(&self.cmd_tx, cmd, &mut self.status);
    }

    fn handle_arrow_keys(&mut self, ctx: &egui::Context) {
        let arrows = [
            (egui::Key::ArrowUp, KeyInput::ArrowUp),
            (egui::Key::ArrowDown, KeyInput::ArrowDown),
            (egui::Key::ArrowLeft, KeyInput::ArrowLeft),
            (egui::Key::ArrowRight, KeyInput::ArrowRight),
        ];
        if ctx.wants_keyboard_input() {
            return;
        }
        // Consumed so focused widgets never scroll or move focus on arrows.
        for (key, input) in arrows {
            if ctx.input_mut(|i| i.consume_key(egui::Modifiers::NONE, key)) {
                self.send(BackendCommand::Input(InputEvent::Key(input)));
            }
        }
    }

    fn show_toolbar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.heading("2048");
            ui.separator();
            ui.label("Score:");
            ui.strong(self.board.score_text());
            ui.separator();

            ui.label("Board size");
            let response = ui.add(egui::DragValue::new(&mut self.board_size_input).speed(0.1));
            if response.changed() {
                self.send(BackendCommand::SetBoardSize(self.board_size_input));
            }

            if ui.button("New game").clicked() {
                self.send(BackendCommand::Input(InputEvent::NewGame));
            }
            if ui.button("Resync").clicked() {
                self.send(BackendCommand::Refresh);
            }
        });
    }

    fn show_status_banner(&mut self, ui: &mut egui::Ui) {
        let Some(err) = &self.status_banner else {
            return;
        };
        let mut dismissed = false;
        egui::Frame::new()
            .fill(egui::Color32::from_rgb(90, 30, 30))
            .inner_margin(egui::Margin::same(6))
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    ui.colored_label(egui::Color32::WHITE, err_label(err.category()));
                    ui.colored_label(egui::Color32::LIGHT_GRAY, err.message());
                    if ui.small_button("Dismiss").clicked() {
                        dismissed = true;
                    }
                });
            });
        if dismissed {
            self.status_banner = None;
        }
    }

    fn show_game_over(&mut self, ctx: &egui::Context, board_rect: egui::Rect) {
        if !self.board.overlay_visible() {
            return;
        }
        let won = self.board.view.as_ref().is_some_and(|view| view.won);
        let mut restart = false;
        egui::Window::new("game_over")
            .title_bar(false)
            .resizable(false)
            .collapsible(false)
            .fixed_pos(board_rect.center() - egui::vec2(90.0, 50.0))
            .show(ctx, |ui| {
                ui.vertical_centered(|ui| {
                    ui.heading("Game Over");
                    if won {
                        ui.label("You reached 2048!");
                    }
                    ui.label(format!("Final score: {}", self.board.score_text()));
                    restart = ui.button("Restart").clicked();
                });
            });
        if restart {
            self.send(BackendCommand::Input(InputEvent::Restart));
        }
    }
}

impl eframe::App for GameApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();
        self.handle_arrow_keys(ctx);

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            self.show_toolbar(ui);
            self.show_status_banner(ui);
        });
        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(&self.status);
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.weak(self.phase_label);
                });
            });
        });
        let board_rect = egui::CentralPanel::default()
            .show(ctx, |ui| {
                ui.vertical_centered(|ui| self.board.paint(ui)).inner
            })
            .inner;
        self.show_game_over(ctx, board_rect);

        ctx.request_repaint_after(Duration::from_millis(100));
    }
}
