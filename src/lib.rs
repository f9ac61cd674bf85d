#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

mod ai;
mod bitboard;
mod board;
#[cfg(feature = "std")]
pub mod cli;
mod common;
mod config;
mod fleet;
mod game;
#[cfg(feature = "std")]
mod logging;
#[cfg(feature = "std")]
mod pacing;
mod ship;
pub mod shot;
mod stats;

pub use ai::*;
pub use bitboard::{BitBoard, BitBoardError};
pub use board::{Board, BoardState};
pub use common::*;
pub use config::*;
pub use fleet::*;
pub use game::*;
#[cfg(feature = "std")]
pub use logging::{init_logging, LOG_ENV};
#[cfg(feature = "std")]
pub use pacing::*;
pub use ship::*;
pub use shot::{ShotOutcome, ship_run, suppress_perimeter};
pub use stats::*;
