//! Game-state engines for grid games.
//!
//! Each engine exclusively owns its grid and is driven through a small command
//! surface; callers read state back through accessors or serializable snapshots.
//! Nothing here renders, sleeps, or spawns threads.

pub use error::*;
pub use types::*;

pub mod connect_four;
pub mod minesweeper;

mod error;
mod types;
