//! Core game state and the per-tick reducer
//!
//! A [`GameState`] is a plain value. [`next_tick`] consumes one state and an
//! [`Action`] and returns the next state; nothing else mutates it.

use crate::board::{merge_grids, Grid};
use crate::input::Buttons;
use crate::kick::{self, WALL_KICKS};
use crate::piece::{cycle, Placement};
use crate::randomizer::{QueueEntry, Randomizer};
use crate::score;
use crate::tetromino::{PieceKind, RotationDirection};
use crate::timing::{frames_since, Frame, LevelTiming};
use std::collections::VecDeque;
use tracing::{debug, info, trace};

/// Frames between a lock and the next spawn
pub const SPAWN_DELAY_FRAMES: u32 = 30;
/// Upcoming pieces shown to the player
pub const PREVIEW_LEN: usize = 2;

/// Things that happened during the current tick only
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickFlags {
    pub piece_got_locked: bool,
    pub completed_lines: u32,
}

/// Input actions the game can process. Each one is a state transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Record the latest button snapshot
    SetInputs(Buttons),
    SoftDrop,
    MoveLeft,
    MoveRight,
    HardDrop,
    RotateLeft,
    RotateRight,
    Hold,
    /// Log the whole state
    Debug,
    /// Gravity timer fired
    Gravity,
    /// No transform; used when only the pause flag changes
    Idle,
}

/// What a tick needs besides the state: the clock and the level data
#[derive(Clone, Copy)]
pub struct TickContext<'a> {
    pub now: Frame,
    pub timing: &'a dyn LevelTiming,
    pub spawn_delay: u32,
}

impl<'a> TickContext<'a> {
    pub fn new(now: Frame, timing: &'a dyn LevelTiming) -> Self {
        Self {
            now,
            timing,
            spawn_delay: SPAWN_DELAY_FRAMES,
        }
    }
}

/// The single source of truth, replaced wholesale every tick
#[derive(Debug, Clone)]
pub struct GameState {
    /// Last recorded button snapshot
    pub inputs: Buttons,
    /// Settled cells
    pub environment: Grid,
    /// Falling piece; absent between a lock and the next spawn
    pub active: Option<Placement>,
    /// Upcoming pieces, front spawns next
    pub next_pieces: VecDeque<QueueEntry>,
    randomizer: Randomizer,
    pub last_gravity: Frame,
    pub last_lock_reset: Frame,
    pub last_lock: Frame,
    pub score: u64,
    pub level: u32,
    pub held: Option<PieceKind>,
    pub this_tick: TickFlags,
    pub paused: bool,
    /// Frame the game ended on. Once set, ticks no longer change the game.
    pub game_ended: Option<Frame>,
    /// Where the active piece would land
    pub ghost: Option<Placement>,
    /// The active piece cannot fall any further
    pub is_locking: bool,
}

impl GameState {
    /// Start a new game: empty grid, seeded queue, no active piece yet.
    /// The first piece spawns once the spawn delay has passed after `now`.
    pub fn new(seed: u64, now: Frame) -> Self {
        let (randomizer, next_pieces) = Randomizer::new(seed);
        Self {
            inputs: Buttons::default(),
            environment: Grid::new(),
            active: None,
            next_pieces,
            randomizer,
            last_gravity: now,
            last_lock_reset: now,
            last_lock: now,
            score: 0,
            level: 0,
            held: None,
            this_tick: TickFlags::default(),
            paused: false,
            game_ended: None,
            ghost: None,
            is_locking: false,
        }
    }

    /// The upcoming pieces shown to the player
    pub fn preview(&self) -> impl Iterator<Item = &QueueEntry> {
        self.next_pieces.iter().take(PREVIEW_LEN)
    }

    /// The trailing anti-repeat window of issued pieces, oldest first
    pub fn recent_pieces(&self) -> &[QueueEntry] {
        self.randomizer.recent()
    }

    /// Number of pieces issued so far, queue included
    pub fn pieces_issued(&self) -> u64 {
        self.randomizer.issued()
    }

    /// A move is legal when there is an active piece and the moved placement fits
    pub fn is_legal_move(&self, transform: impl FnOnce(Placement) -> Placement) -> bool {
        self.active
            .is_some_and(|piece| transform(piece).fits(&self.environment))
    }

    /// Apply a move if it is legal. Returns whether it was applied.
    fn try_move(&mut self, transform: impl FnOnce(Placement) -> Placement) -> bool {
        let Some(piece) = self.active else {
            return false;
        };
        let moved = transform(piece);
        if moved.fits(&self.environment) {
            self.active = Some(moved);
            true
        } else {
            trace!(piece = piece.kind.name(), "move rejected");
            false
        }
    }

    fn apply(&mut self, action: Action, ctx: &TickContext) {
        match action {
            Action::SetInputs(buttons) => self.inputs = buttons,
            Action::SoftDrop => self.player_move_down(ctx.now),
            Action::MoveLeft => {
                self.try_move(Placement::nudged_left);
            }
            Action::MoveRight => {
                self.try_move(Placement::nudged_right);
            }
            Action::HardDrop => self.hard_drop(ctx.now),
            Action::RotateLeft => self.rotate(RotationDirection::CounterClockwise, ctx.now),
            Action::RotateRight => self.rotate(RotationDirection::Clockwise, ctx.now),
            Action::Hold => self.hold(),
            Action::Debug => debug!(state = ?self, "debug snapshot"),
            Action::Gravity => self.gravity(ctx),
            Action::Idle => {}
        }
    }

    /// Player soft drop: fall one row, or lock at once when grounded
    fn player_move_down(&mut self, now: Frame) {
        if self.try_move(Placement::nudged_down) {
            self.last_lock_reset = now;
        } else {
            self.lock_piece(now);
        }
    }

    /// Timer-driven descent: fall one row, or lock once the lock delay ran out
    fn gravity(&mut self, ctx: &TickContext) {
        let delay = ctx.timing.gravity_delay_frames(self) as u64;
        if frames_since(ctx.now, self.last_gravity) < delay {
            return;
        }
        self.last_gravity = ctx.now;

        if self.try_move(Placement::nudged_down) {
            self.last_lock_reset = ctx.now;
        } else {
            let lock_delay = ctx.timing.lock_delay_frames(self) as u64;
            if frames_since(ctx.now, self.last_lock_reset) > lock_delay {
                self.lock_piece(ctx.now);
            }
        }
    }

    /// Move straight down as far as possible. Locking is left to the lock delay.
    fn hard_drop(&mut self, now: Frame) {
        if let Some(piece) = self.active {
            self.active = Some(piece.dropped(&self.environment));
            self.last_lock_reset = now;
        }
    }

    /// Rotate with wall kicks: in place, then one right, then one left
    fn rotate(&mut self, direction: RotationDirection, now: Frame) {
        let Some(piece) = self.active else {
            return;
        };
        match kick::first_fit(piece.rotated(direction), &self.environment) {
            Some(rotated) => {
                self.active = Some(rotated);
                self.last_lock_reset = now;
            }
            None => trace!(piece = piece.kind.name(), ?direction, "rotation rejected"),
        }
    }

    /// Swap with the hold slot, committing the first of the three kick
    /// positions that fits. If none fits, nothing changes.
    fn hold(&mut self) {
        for dx in WALL_KICKS {
            let mut candidate = self.clone();
            if !candidate.swap_hold(dx) {
                return;
            }
            if candidate
                .active
                .is_some_and(|piece| piece.fits(&candidate.environment))
            {
                debug!(held = ?candidate.held.map(|k| k.name()), "hold");
                *self = candidate;
                return;
            }
        }
        trace!("hold rejected");
    }

    /// Perform the hold swap with the new piece shifted by `dx`.
    /// Returns false when there is nothing to hold or release.
    fn swap_hold(&mut self, dx: i32) -> bool {
        match (self.active, self.held) {
            (Some(active), Some(held)) => {
                self.held = Some(active.kind);
                self.active = Some(Placement::spawn(held, 0).shifted(dx));
            }
            (Some(active), None) => {
                self.held = Some(active.kind);
                self.active = None;
                self.spawn_next();
                self.active = self.active.map(|piece| piece.shifted(dx));
            }
            (None, Some(held)) => {
                self.held = None;
                self.active = Some(Placement::spawn(held, 0).shifted(dx));
            }
            (None, None) => return false,
        }
        true
    }

    /// Spawn rotation: pre-rotated one step if a rotate button is held
    fn initial_rotation(&self, kind: PieceKind) -> usize {
        let count = kind.rotation_count();
        if self.inputs.rotate_right {
            cycle(0, count, 1)
        } else if self.inputs.rotate_left {
            cycle(0, count, -1)
        } else {
            0
        }
    }

    /// Take the front of the queue as the active piece and refill the queue
    fn spawn_next(&mut self) {
        let Some(entry) = self.next_pieces.pop_front() else {
            return;
        };
        let rotation = self.initial_rotation(entry.kind);
        self.active = Some(Placement::spawn(entry.kind, rotation));
        let refill = self.randomizer.next_entry();
        self.next_pieces.push_back(refill);
        debug!(
            piece = entry.kind.name(),
            sequence = entry.sequence,
            rotation,
            "spawned"
        );
    }

    /// Merge the active piece into the environment. Cells above the field are lost.
    fn lock_piece(&mut self, now: Frame) {
        let Some(piece) = self.active.take() else {
            return;
        };
        let piece_grid = Grid::new().with_cells(piece.cells());
        self.environment = merge_grids(&self.environment, &piece_grid);
        self.last_lock = now;
        self.this_tick.piece_got_locked = true;
        debug!(piece = piece.kind.name(), x = piece.x, y = piece.y, "piece locked");
    }

    fn remove_complete_lines(&mut self) {
        let cleared = self.environment.clear_complete_rows() as u32;
        self.score += score::line_clear_points(cleared);
        self.this_tick.completed_lines = cleared;
        if cleared > 0 {
            info!(lines = cleared, score = self.score, "lines cleared");
        }
    }

    fn next_piece(&mut self, ctx: &TickContext) {
        if self.active.is_none() && frames_since(ctx.now, self.last_lock) > ctx.spawn_delay as u64 {
            self.spawn_next();
        }
    }

    fn check_game_end(&mut self, now: Frame) {
        if self
            .active
            .is_some_and(|piece| piece.overlaps(&self.environment))
        {
            self.game_ended = Some(now);
            info!(score = self.score, level = self.level, "game over");
        }
    }

    fn advance_level(&mut self) {
        let level = score::advance_level(
            self.level,
            self.this_tick.piece_got_locked,
            self.this_tick.completed_lines,
        );
        if level != self.level {
            debug!(from = self.level, to = level, "level up");
            self.level = level;
        }
    }

    fn update_locking_status(&mut self) {
        self.is_locking = self.active.is_some() && !self.is_legal_move(Placement::nudged_down);
    }

    fn update_ghost(&mut self) {
        self.ghost = self
            .active
            .map(|piece| piece.dropped(&self.environment));
    }
}

/// Advance the game by one tick.
///
/// The pause flag is always recorded. A paused or ended game is otherwise
/// returned untouched; a running one applies `action` and then, in order:
/// line removal, spawning, the game-end check, level advance, the locking
/// flag and the ghost piece.
pub fn next_tick(mut state: GameState, action: Action, paused: bool, ctx: &TickContext) -> GameState {
    state.paused = paused;
    if paused || state.game_ended.is_some() {
        return state;
    }

    state.this_tick = TickFlags::default();
    state.apply(action, ctx);
    state.remove_complete_lines();
    state.next_piece(ctx);
    state.check_game_end(ctx.now);
    state.advance_level();
    state.update_locking_status();
    state.update_ghost();
    state
}
