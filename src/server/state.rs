//! Shared HTTP server state (spec §4.9 ambient): the currently-active board,
//! swappable by `/reset` without blocking readers already holding a strong
//! reference to the old one.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::board::Board;
use crate::boardfile;

#[derive(Clone)]
pub struct AppState {
    inner: Arc<RwLock<Arc<Board>>>,
    default_path: PathBuf,
}

impl AppState {
    pub fn new(board: Board, default_path: PathBuf) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Arc::new(board))),
            default_path,
        }
    }

    /// A strong reference to the board active at the moment of the call.
    /// Operations on it continue against that snapshot even if `/reset`
    /// swaps in a new board afterward.
    pub async fn board(&self) -> Arc<Board> {
        Arc::clone(&*self.inner.read().await)
    }

    /// Re-parses `path` (or the path the server was started with, if none is
    /// given) and atomically swaps it in as the active board.
    pub async fn reset(&self, path: Option<&str>) -> anyhow::Result<Arc<Board>> {
        let path = path.map(PathBuf::from).unwrap_or_else(|| self.default_path.clone());
        let board = Arc::new(boardfile::parse_board_file(&path).await?);
        let mut guard = self.inner.write().await;
        *guard = Arc::clone(&board);
        Ok(board)
    }
}
