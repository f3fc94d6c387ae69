//! Board-file loading (spec §6): parses the textual board format into a
//! [`Board`], layered on top of [`Board::new`] rather than folded into it, so
//! file-shaped errors (`ParseError`) stay distinct from direct-construction
//! errors (`LengthMismatch`).

use std::path::Path;

use crate::board::{Board, LengthMismatch};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("board file is empty or has no non-blank lines")]
    Empty,
    #[error("header line {line:?} is not of the form \"<rows>x<cols>\" with positive integers")]
    BadHeader { line: String },
    #[error(transparent)]
    LengthMismatch(#[from] LengthMismatch),
}

/// Parses board text per spec §6: the first non-blank line is `"<rows>x<cols>"`,
/// every following non-blank line is one row-major card label.
pub fn parse_board_str(text: &str) -> Result<Board, ParseError> {
    let mut lines = text.lines().map(str::trim).filter(|line| !line.is_empty());

    let header = lines.next().ok_or(ParseError::Empty)?;
    let (rows, cols) = parse_header(header)?;

    let labels: Vec<String> = lines.map(String::from).collect();
    Board::new(rows, cols, labels).map_err(ParseError::from)
}

fn parse_header(line: &str) -> Result<(usize, usize), ParseError> {
    let bad_header = || ParseError::BadHeader { line: line.to_string() };

    let (rows_str, cols_str) = line.split_once('x').ok_or_else(bad_header)?;
    let rows: usize = rows_str.trim().parse().map_err(|_| bad_header())?;
    let cols: usize = cols_str.trim().parse().map_err(|_| bad_header())?;
    if rows == 0 || cols == 0 {
        return Err(bad_header());
    }
    Ok((rows, cols))
}

/// Reads and parses a board file from disk.
pub async fn parse_board_file(path: impl AsRef<Path>) -> anyhow::Result<Board> {
    let path = path.as_ref();
    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|err| anyhow::anyhow!("reading board file {}: {err}", path.display()))?;
    parse_board_str(&text).map_err(anyhow::Error::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_header_and_labels() {
        let board = parse_board_str("2x2\nA\nB\nA\nB\n").unwrap();
        assert_eq!(board.rows(), 2);
        assert_eq!(board.cols(), 2);
    }

    #[test]
    fn ignores_blank_lines() {
        let board = parse_board_str("\n\n2x2\n\nA\nB\n\nA\nB\n\n").unwrap();
        assert_eq!(board.rows(), 2);
        assert_eq!(board.cols(), 2);
    }

    #[test]
    fn rejects_empty_input() {
        let err = parse_board_str("   \n\n").unwrap_err();
        assert_eq!(err, ParseError::Empty);
    }

    #[test]
    fn rejects_malformed_header() {
        let err = parse_board_str("not-a-header\nA\n").unwrap_err();
        assert!(matches!(err, ParseError::BadHeader { .. }));
    }

    #[test]
    fn rejects_zero_dimension_header() {
        let err = parse_board_str("0x4\n").unwrap_err();
        assert!(matches!(err, ParseError::BadHeader { .. }));
    }

    #[test]
    fn propagates_length_mismatch() {
        let err = parse_board_str("2x2\nA\nB\nA\n").unwrap_err();
        assert!(matches!(err, ParseError::LengthMismatch(_)));
    }
}
