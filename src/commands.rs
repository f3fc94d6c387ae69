//! Command façade (spec §4.8/§6): stable, non-HTTP entry points that
//! delegate one-to-one to the matching [`Board`] method. Signatures are
//! fixed by contract.

use std::future::Future;

use crate::board::{Board, FlipError, MapError};

pub async fn look(board: &Board, player: &str) -> String {
    board.look(player).await
}

pub async fn flip(board: &Board, player: &str, row: usize, col: usize) -> Result<String, FlipError> {
    board.flip(player, row, col).await
}

pub async fn map<F, Fut>(board: &Board, player: &str, f: F) -> Result<String, MapError>
where
    F: Fn(String) -> Fut,
    Fut: Future<Output = anyhow::Result<String>>,
{
    board.map(player, f).await
}

pub async fn watch(board: &Board, player: &str) -> String {
    board.watch(player).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiny_board() -> Board {
        Board::new(1, 2, vec!["A".to_string(), "A".to_string()]).unwrap()
    }

    #[tokio::test]
    async fn look_delegates() {
        let board = tiny_board();
        assert_eq!(look(&board, "alice").await, board.look("alice").await);
    }

    #[tokio::test]
    async fn flip_delegates() {
        let board = tiny_board();
        let snap = flip(&board, "alice", 0, 0).await.unwrap();
        assert!(snap.contains("my A"));
    }

    #[tokio::test]
    async fn map_delegates() {
        let board = tiny_board();
        let snap = map(&board, "alice", |label| async move { Ok(label) }).await.unwrap();
        assert!(snap.starts_with("1x2"));
    }
}
