//! Memory Scramble: a concurrent board-game ADT with an async critical
//! section per mutating operation, a board-file loader, a command façade,
//! and an HTTP layer over it.

pub mod board;
pub mod boardfile;
pub mod commands;
pub mod server;

pub use board::Board;
