//! Tile colors and label sizing, keyed by tile value.

use eframe::egui::Color32;

pub const BOARD_BACKGROUND: Color32 = Color32::from_rgb(187, 173, 160);
pub const EMPTY_CELL: Color32 = Color32::from_rgb(205, 193, 180);
pub const OVERLAY_TINT: Color32 = Color32::from_rgba_premultiplied(238, 228, 218, 186);

const DARK_TEXT: Color32 = Color32::from_rgb(119, 110, 101);
const LIGHT_TEXT: Color32 = Color32::from_rgb(249, 246, 242);
const SUPER_TILE: Color32 = Color32::from_rgb(60, 58, 50);

pub fn tile_fill(value: u32) -> Color32 {
    match value {
        2 => Color32::from_rgb(238, 228, 218),
        4 => Color32::from_rgb(237, 224, 200),
        8 => Color32::from_rgb(242, 177, 121),
        16 => Color32::from_rgb(245, 149, 99),
        32 => Color32::from_rgb(246, 124, 95),
        64 => Color32::from_rgb(246, 94, 59),
        128 => Color32::from_rgb(237, 207, 114),
        256 => Color32::from_rgb(237, 204, 97),
        512 => Color32::from_rgb(237, 200, 80),
        1024 => Color32::from_rgb(237, 197, 63),
        2048 => Color32::from_rgb(237, 194, 46),
        _ => SUPER_TILE,
    }
}

pub fn tile_text(value: u32) -> Color32 {
    if value <= 4 {
        DARK_TEXT
    } else {
        LIGHT_TEXT
    }
}

/// Shrinks long labels so they stay inside the cell.
pub fn label_size(cell: f32, label: &str) -> f32 {
    let factor = match label.len() {
        0..=2 => 0.45,
        3 => 0.38,
        4 => 0.30,
        _ => 0.24,
    };
    cell * factor
}
