//! Error taxonomy for the Board core (spec §7).

/// Errors Flip can surface. These are the only error kinds Flip exposes;
/// anything else is an invariant violation and asserts instead of returning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum FlipError {
    #[error("coordinates ({row}, {col}) are out of range for a {rows}x{cols} board")]
    InvalidCoordinates {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },
    #[error("no card at the requested cell")]
    NoCardHere,
    #[error("target cell is controlled by another player")]
    TargetControlled,
}

/// Board construction from a pre-split `rows x cols` grid of labels.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LengthMismatch {
    #[error("expected {expected} labels for a {rows}x{cols} board, got {actual}")]
    Count {
        rows: usize,
        cols: usize,
        expected: usize,
        actual: usize,
    },
    #[error("rows and cols must both be positive, got {rows}x{cols}")]
    ZeroDimension { rows: usize, cols: usize },
    #[error("label at index {index} is empty")]
    EmptyLabel { index: usize },
}

/// Errors surfaced by Map, either from validation or propagated from the
/// caller-supplied transform.
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error("player id must not be empty")]
    EmptyPlayerId,
    #[error("map transform failed: {0}")]
    Transform(#[source] anyhow::Error),
}
