//! TETRS core - a deterministic falling-block simulation
//!
//! One authoritative [`GameState`] is replaced every tick by [`next_tick`].
//! Hosts feed button snapshots and frame-timer events into a [`Scheduler`],
//! which drains them in arrival order and emits one snapshot per tick. The
//! [`render::view`] function turns a snapshot into a grid ready for drawing.

pub mod board;
pub mod game;
pub mod input;
pub mod kick;
pub mod piece;
pub mod randomizer;
pub mod render;
pub mod scheduler;
pub mod score;
pub mod settings;
pub mod tetromino;
pub mod timing;

pub use board::{Cell, Colors, Grid, BOARD_HEIGHT, BOARD_WIDTH};
pub use game::{next_tick, Action, GameState, TickContext, TickFlags};
pub use input::{Buttons, InputTracker};
pub use piece::Placement;
pub use render::{view, ViewCell};
pub use scheduler::{Event, Scheduler};
pub use settings::Settings;
pub use tetromino::PieceKind;
pub use timing::{Frame, LevelTiming, StandardTiming};
