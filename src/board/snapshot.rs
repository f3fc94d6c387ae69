//! Snapshot text rendering (spec §4.1).

use std::fmt::Write as _;

use super::cell::Cell;

/// Renders the `Look` snapshot for `player` over `grid`, laid out row-major
/// in `rows x cols`. Must be called while the board lock is held so the
/// render reflects one atomic observation (spec §4.1).
pub fn render(rows: usize, cols: usize, grid: &[Cell], player: &str) -> String {
    let mut out = String::with_capacity(16 + grid.len() * 8);
    let _ = writeln!(out, "{rows}x{cols}");
    for cell in grid {
        let line = match (&cell.label, cell.face_up, &cell.controller) {
            (None, _, _) => "none".to_string(),
            (Some(_), false, _) => "down".to_string(),
            (Some(label), true, Some(controller)) if controller == player => {
                format!("my {label}")
            }
            (Some(label), true, _) => format!("up {label}"),
        };
        let _ = writeln!(out, "{line}");
    }
    out
}
