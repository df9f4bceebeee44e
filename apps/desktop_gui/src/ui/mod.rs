//! UI layer: app shell, board drawing, and tile theme.

pub mod app;
pub mod theme;

pub use app::GameApp;
