//! The concurrent Board abstract data type (spec §2–§5).
//!
//! A single in-memory object behind one [`AsyncLock`]. Four operations form
//! its public surface: [`Board::look`], [`Board::flip`], [`Board::map`],
//! [`Board::watch`]. There is no finer-grained locking than the one board
//! lock; see `lock.rs` for why that is sufficient here.

pub mod cell;
pub mod error;
pub mod lock;
pub mod player;
pub mod snapshot;
pub mod waiter;

use std::collections::HashMap;
use std::future::Future;

use tokio::sync::{broadcast, oneshot};

pub use cell::{Cell, Pos};
pub use error::{FlipError, LengthMismatch, MapError};
pub use player::PlayerRecord;

use lock::AsyncLock;
use waiter::WaiterRegistry;

const CHANGE_CHANNEL_CAPACITY: usize = 256;

fn idx(pos: Pos, cols: usize) -> usize {
    pos.0 * cols + pos.1
}

struct BoardState {
    grid: Vec<Cell>,
    players: HashMap<String, PlayerRecord>,
    waiters: WaiterRegistry,
}

/// Outcome of attempting Step B of a Flip (spec §9, "weakly-typed control
/// enum for Flip outcome" redesigned as a proper sum type).
enum FlipStep {
    Done(String),
    Err(FlipError),
    Wait(oneshot::Receiver<()>),
    /// `|controlled| == 2` survived Step A somehow; yield and have the
    /// caller retry. Should not occur in practice since Step A always runs
    /// immediately beforehand, but is kept as a defensive fallback rather
    /// than a panic (spec §4.2, case |controlled|=2).
    Retry,
}

pub struct Board {
    rows: usize,
    cols: usize,
    state: AsyncLock<BoardState>,
    change_tx: broadcast::Sender<()>,
}

impl Board {
    /// Direct construction from a row-major list of labels (spec §7,
    /// `LengthMismatch`).
    pub fn new(rows: usize, cols: usize, labels: Vec<String>) -> Result<Self, LengthMismatch> {
        if rows == 0 || cols == 0 {
            return Err(LengthMismatch::ZeroDimension { rows, cols });
        }
        let expected = rows * cols;
        if labels.len() != expected {
            return Err(LengthMismatch::Count {
                rows,
                cols,
                expected,
                actual: labels.len(),
            });
        }
        for (index, label) in labels.iter().enumerate() {
            if label.is_empty() {
                return Err(LengthMismatch::EmptyLabel { index });
            }
        }

        let grid = labels.into_iter().map(Cell::new).collect();
        let (change_tx, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Ok(Self {
            rows,
            cols,
            state: AsyncLock::new(BoardState {
                grid,
                players: HashMap::new(),
                waiters: WaiterRegistry::new(),
            }),
            change_tx,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Look (spec §4.1): a read-only snapshot, atomic with respect to other
    /// operations.
    pub async fn look(&self, player: &str) -> String {
        let rows = self.rows;
        let cols = self.cols;
        self.state
            .run(|state| {
                check_invariants(state, rows, cols);
                snapshot::render(rows, cols, &state.grid, player)
            })
            .await
    }

    /// Flip (spec §4.2): finalize the caller's previous turn, then attempt
    /// this flip, retrying across suspension whenever the target cell is
    /// held by another player.
    pub async fn flip(&self, player: &str, row: usize, col: usize) -> Result<String, FlipError> {
        loop {
            let rows = self.rows;
            let cols = self.cols;
            let step = self.state.run(|state| {
                let mut changed = false;
                finalize_previous_turn(state, player, cols, &mut changed);
                let step = attempt_flip(state, player, row, col, rows, cols, &mut changed);
                if changed {
                    let _ = self.change_tx.send(());
                }
                check_invariants(state, rows, cols);
                step
            });
            match step.await {
                FlipStep::Done(snapshot) => return Ok(snapshot),
                FlipStep::Err(err) => return Err(err),
                FlipStep::Wait(rx) => {
                    // Suspend outside the lock; on resume, retry Step A/B
                    // from the top since the world may have changed.
                    let _ = rx.await;
                }
                FlipStep::Retry => {}
            }
        }
    }

    /// Map (spec §4.4): compute phase runs `f` once per present label with
    /// the lock released, apply phase rewrites every surviving cell
    /// atomically.
    pub async fn map<F, Fut>(&self, player: &str, f: F) -> Result<String, MapError>
    where
        F: Fn(String) -> Fut,
        Fut: Future<Output = anyhow::Result<String>>,
    {
        if player.is_empty() {
            return Err(MapError::EmptyPlayerId);
        }
        let rows = self.rows;
        let cols = self.cols;

        let current_labels: Vec<(Pos, String)> = self
            .state
            .run(|state| {
                let mut items = Vec::new();
                for r in 0..rows {
                    for c in 0..cols {
                        if let Some(label) = state.grid[idx((r, c), cols)].label.clone() {
                            items.push(((r, c), label));
                        }
                    }
                }
                items
            })
            .await;

        let mut rewrites = Vec::with_capacity(current_labels.len());
        for (pos, label) in current_labels {
            let new_label = f(label).await.map_err(MapError::Transform)?;
            rewrites.push((pos, new_label));
        }

        let snapshot = self
            .state
            .run(|state| {
                let mut changed = false;
                for (pos, new_label) in &rewrites {
                    let i = idx(*pos, cols);
                    if state.grid[i].is_present() {
                        state.grid[i].label = Some(new_label.clone());
                        changed = true;
                    }
                }
                if changed {
                    let _ = self.change_tx.send(());
                }
                check_invariants(state, rows, cols);
                snapshot::render(rows, cols, &state.grid, player)
            })
            .await;

        Ok(snapshot)
    }

    /// Watch (spec §4.5): suspend until the next change event, then return
    /// a fresh snapshot. Backed by a broadcast channel so every watcher
    /// registered before an emit observes it (fan-out), unlike the
    /// per-cell, at-most-one-wake waiter queues.
    pub async fn watch(&self, player: &str) -> String {
        let mut rx = self.state.run(|_state| self.change_tx.subscribe()).await;
        match rx.recv().await {
            Ok(()) => {}
            Err(broadcast::error::RecvError::Lagged(_)) => {
                // Missed some events while behind, but "at least one change
                // happened" still satisfies the contract.
            }
            Err(broadcast::error::RecvError::Closed) => {}
        }
        self.look(player).await
    }
}

/// Step A: finalize `player`'s previous turn, lazily creating their record
/// if this is their first-ever Flip (spec §4.2, §9 resolved open question).
fn finalize_previous_turn(state: &mut BoardState, player: &str, cols: usize, changed: &mut bool) {
    let controlled = state
        .players
        .entry(player.to_string())
        .or_default()
        .controlled
        .clone();

    match controlled.len() {
        2 => {
            let a = controlled.first().unwrap();
            let b = controlled.second().unwrap();
            finalize_pair(state, a, b, cols, changed);
            state.players.get_mut(player).unwrap().controlled.clear();
        }
        1 => {
            let a = controlled.first().unwrap();
            let still_controls = state.grid[idx(a, cols)].controller.as_deref() == Some(player);
            if !still_controls {
                finalize_single(state, a, cols, changed);
                state.players.get_mut(player).unwrap().controlled.clear();
            }
        }
        _ => {}
    }
}

/// Resolve a pending pair: remove on match, hide-if-uncontrolled on
/// mismatch, then wake one waiter on each position.
fn finalize_pair(state: &mut BoardState, a: Pos, b: Pos, cols: usize, changed: &mut bool) {
    let ia = idx(a, cols);
    let ib = idx(b, cols);
    let label_a = state.grid[ia].label.clone();
    let label_b = state.grid[ib].label.clone();

    if label_a.is_some() && label_a == label_b {
        state.grid[ia].remove();
        state.grid[ib].remove();
        *changed = true;
    } else {
        if state.grid[ia].is_present() && state.grid[ia].face_up && state.grid[ia].controller.is_none()
        {
            state.grid[ia].hide();
            *changed = true;
        }
        if state.grid[ib].is_present() && state.grid[ib].face_up && state.grid[ib].controller.is_none()
        {
            state.grid[ib].hide();
            *changed = true;
        }
    }

    wake_one(state, a, cols, changed);
    wake_one(state, b, cols, changed);
}

/// Resolve a single pending cell left over from a relinquished first card
/// (spec §4.2, case |controlled| = 1 already relinquished).
fn finalize_single(state: &mut BoardState, a: Pos, cols: usize, changed: &mut bool) {
    let ia = idx(a, cols);
    if state.grid[ia].is_present() && state.grid[ia].face_up && state.grid[ia].controller.is_none() {
        state.grid[ia].hide();
        *changed = true;
    }
    wake_one(state, a, cols, changed);
}

/// Wake at most one waiter on `pos` (spec §4.3). If the cell still carries a
/// label, ownership is reserved for the waiting player before the one-shot
/// fires, closing the race between wake and resume.
fn wake_one(state: &mut BoardState, pos: Pos, cols: usize, changed: &mut bool) {
    if let Some(waiter) = state.waiters.pop_random(pos) {
        let i = idx(pos, cols);
        if state.grid[i].is_present() {
            state.grid[i].face_up = true;
            state.grid[i].controller = Some(waiter.player.clone());
            *changed = true;
        }
        waiter.fulfill();
    }
}

/// Step B: attempt this flip given the post-Step-A state of `player`'s
/// `controlled` list (spec §4.2).
fn attempt_flip(
    state: &mut BoardState,
    player: &str,
    row: usize,
    col: usize,
    rows: usize,
    cols: usize,
    changed: &mut bool,
) -> FlipStep {
    if row >= rows || col >= cols {
        return FlipStep::Err(FlipError::InvalidCoordinates { row, col, rows, cols });
    }
    let pos = (row, col);
    let len = state.players.entry(player.to_string()).or_default().controlled.len();

    match len {
        0 => first_card(state, player, pos, rows, cols, changed),
        1 => second_card(state, player, pos, rows, cols, changed),
        _ => FlipStep::Retry,
    }
}

fn first_card(
    state: &mut BoardState,
    player: &str,
    pos: Pos,
    rows: usize,
    cols: usize,
    changed: &mut bool,
) -> FlipStep {
    let i = idx(pos, cols);
    if !state.grid[i].is_present() {
        return FlipStep::Err(FlipError::NoCardHere);
    }
    match state.grid[i].controller.clone() {
        Some(ref controller) if controller != player => {
            let rx = state.waiters.enqueue(pos, player.to_string());
            FlipStep::Wait(rx)
        }
        _ => {
            state.grid[i].face_up = true;
            state.grid[i].controller = Some(player.to_string());
            state
                .players
                .get_mut(player)
                .unwrap()
                .controlled
                .push(pos);
            *changed = true;
            FlipStep::Done(snapshot::render(rows, cols, &state.grid, player))
        }
    }
}

fn second_card(
    state: &mut BoardState,
    player: &str,
    pos: Pos,
    rows: usize,
    cols: usize,
    changed: &mut bool,
) -> FlipStep {
    let first = state
        .players
        .get(player)
        .unwrap()
        .controlled
        .first()
        .expect("attempt_flip called with controlled.len() == 1");

    let i = idx(pos, cols);
    let target_present = state.grid[i].is_present();
    let target_controlled = target_present && state.grid[i].face_up && state.grid[i].controller.is_some();

    if !target_present {
        state.grid[idx(first, cols)].controller = None;
        return FlipStep::Err(FlipError::NoCardHere);
    }
    if target_controlled {
        state.grid[idx(first, cols)].controller = None;
        return FlipStep::Err(FlipError::TargetControlled);
    }

    state.grid[i].face_up = true;
    state.grid[i].controller = Some(player.to_string());
    *changed = true;

    let label_first = state.grid[idx(first, cols)].label.clone();
    let label_second = state.grid[i].label.clone();

    if label_first.is_some() && label_first == label_second {
        state
            .players
            .get_mut(player)
            .unwrap()
            .controlled
            .push(pos);
        FlipStep::Done(snapshot::render(rows, cols, &state.grid, player))
    } else {
        state.grid[idx(first, cols)].controller = None;
        state.grid[i].controller = None;
        state
            .players
            .get_mut(player)
            .unwrap()
            .controlled
            .set_two(first, pos);
        wake_one(state, first, cols, changed);
        FlipStep::Done(snapshot::render(rows, cols, &state.grid, player))
    }
}

/// Fatal assertion routine for the invariants in spec §3/§8. Compiled out in
/// release builds; any violation here is a programmer error, not a
/// recoverable condition.
fn check_invariants(state: &BoardState, rows: usize, cols: usize) {
    if !cfg!(debug_assertions) {
        return;
    }
    debug_assert_eq!(state.grid.len(), rows * cols, "grid size invariant");
    for cell in &state.grid {
        if cell.label.is_none() {
            debug_assert!(!cell.face_up, "absent label must not be face-up");
            debug_assert!(cell.controller.is_none(), "absent label must have no controller");
        }
    }
    for (player, record) in &state.players {
        debug_assert!(record.controlled.len() <= 2, "controlled list overflow");
        for pos in record.controlled.as_slice() {
            let cell = &state.grid[idx(pos, cols)];
            let owns = cell.controller.as_deref() == Some(player.as_str());
            let pending = cell.is_present() && cell.face_up;
            debug_assert!(
                owns || pending,
                "controlled cell must be owned or pending-finalization"
            );
        }
    }
    let mut controller_counts: HashMap<&str, usize> = HashMap::new();
    for cell in &state.grid {
        if let Some(controller) = &cell.controller {
            *controller_counts.entry(controller.as_str()).or_insert(0) += 1;
        }
    }
    for count in controller_counts.values() {
        debug_assert!(*count <= 2, "a player controls at most two cells");
    }
}

#[cfg(test)]
mod tests;
