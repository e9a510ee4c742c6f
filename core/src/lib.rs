//! Pure game engines for the arcade lobby: minesweeper, snake, and
//! whack-a-mole.
//!
//! Every engine is a synchronous state machine with no timers and no I/O;
//! the lobby crate owns scheduling, persistence, and the session protocol.

#![no_std]

extern crate alloc;

pub use error::*;
pub use types::*;

pub mod mines;
pub mod snake;
pub mod whack;

mod error;
mod types;
