//! Per-cell waiter queues (spec §3 "Waiter", §4.3 "Waking a waiter").
//!
//! A waiter is a player suspended inside Flip awaiting acquisition of a
//! specific cell. Distinct from the watcher broadcast channel: at most one
//! waiter per cell is woken per wake call, never a fan-out.

use std::collections::HashMap;

use rand::Rng;
use tokio::sync::oneshot;

use super::cell::Pos;

pub struct Waiter {
    pub player: String,
    notify: oneshot::Sender<()>,
}

impl Waiter {
    /// Signal this waiter to resume. The caller is responsible for having
    /// already reserved or declined ownership of the cell before calling
    /// this, under the lock.
    pub fn fulfill(self) {
        let _ = self.notify.send(());
    }
}

#[derive(Default)]
pub struct WaiterRegistry {
    queues: HashMap<Pos, Vec<Waiter>>,
}

impl WaiterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueue `player` on `pos`'s waiter queue, returning the receive side
    /// of a one-shot signal fulfilled when this waiter is woken.
    pub fn enqueue(&mut self, pos: Pos, player: String) -> oneshot::Receiver<()> {
        let (tx, rx) = oneshot::channel();
        self.queues.entry(pos).or_default().push(Waiter {
            player,
            notify: tx,
        });
        rx
    }

    /// Pop one waiter uniformly at random from `pos`'s queue (documented
    /// fairness choice, spec §4.3 / §9 open question), if the queue is
    /// non-empty. Remaining waiters stay queued.
    pub fn pop_random(&mut self, pos: Pos) -> Option<Waiter> {
        let queue = self.queues.get_mut(&pos)?;
        if queue.is_empty() {
            return None;
        }
        let idx = rand::thread_rng().gen_range(0..queue.len());
        let waiter = queue.remove(idx);
        if queue.is_empty() {
            self.queues.remove(&pos);
        }
        Some(waiter)
    }
}
