//! Button snapshots, press edges and horizontal auto-repeat
//!
//! The input layer hands us a full snapshot of named buttons whenever anything
//! changes. Only press edges (released -> pressed) become actions; repeated
//! identical snapshots are ignored. Left and right repeat while held, after an
//! initial delay, all counted in frames.

use crate::game::Action;
use crate::settings::Settings;
use crate::timing::{frames_since, Frame};

/// Frames a horizontal key must be held before it starts repeating
pub const DEFAULT_DAS_FRAMES: u32 = 10;
/// Frames between repeats once repeating
pub const DEFAULT_ARR_FRAMES: u32 = 1;

/// A snapshot of every button the game listens to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Buttons {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    pub rotate_left: bool,
    pub rotate_right: bool,
    pub hold: bool,
    pub pause: bool,
    pub debug: bool,
}

impl Buttons {
    /// Left counts only while right is not also held
    fn wants_left(&self) -> bool {
        self.left && !self.right
    }

    fn wants_right(&self) -> bool {
        self.right && !self.left
    }
}

/// What a new snapshot produced
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputEvents {
    /// Actions to dispatch, in order
    pub actions: Vec<Action>,
    /// The pause button was just pressed
    pub pause_toggled: bool,
}

#[derive(Debug, Clone, Copy)]
struct RepeatState {
    pressed_at: Frame,
    last_repeat: Option<Frame>,
}

/// Turns button snapshots into actions
#[derive(Debug, Clone)]
pub struct InputTracker {
    previous: Option<Buttons>,
    left: Option<RepeatState>,
    right: Option<RepeatState>,
    das: u32,
    arr: u32,
}

impl Default for InputTracker {
    fn default() -> Self {
        Self::new(DEFAULT_DAS_FRAMES, DEFAULT_ARR_FRAMES)
    }
}

impl InputTracker {
    pub fn new(das: u32, arr: u32) -> Self {
        Self {
            previous: None,
            left: None,
            right: None,
            das,
            arr: arr.max(1),
        }
    }

    /// Create input tracker from settings
    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.input.das_frames, settings.input.arr_frames)
    }

    /// Handle a new snapshot. Duplicates of the previous snapshot produce nothing.
    pub fn update(&mut self, buttons: Buttons, now: Frame) -> InputEvents {
        let mut events = InputEvents::default();
        if self.previous == Some(buttons) {
            return events;
        }
        let before = self.previous.unwrap_or_default();
        self.previous = Some(buttons);

        events.actions.push(Action::SetInputs(buttons));

        let pressed = |was: bool, is: bool| !was && is;

        if pressed(before.down, buttons.down) {
            events.actions.push(Action::SoftDrop);
        }
        if track_repeat(&mut self.left, before.wants_left(), buttons.wants_left(), now) {
            events.actions.push(Action::MoveLeft);
        }
        if track_repeat(&mut self.right, before.wants_right(), buttons.wants_right(), now) {
            events.actions.push(Action::MoveRight);
        }
        if pressed(before.up, buttons.up) {
            events.actions.push(Action::HardDrop);
        }
        if pressed(before.rotate_left, buttons.rotate_left) {
            events.actions.push(Action::RotateLeft);
        }
        if pressed(before.rotate_right, buttons.rotate_right) {
            events.actions.push(Action::RotateRight);
        }
        if pressed(before.hold, buttons.hold) {
            events.actions.push(Action::Hold);
        }
        if pressed(before.debug, buttons.debug) {
            events.actions.push(Action::Debug);
        }
        events.pause_toggled = pressed(before.pause, buttons.pause);
        events
    }

    /// Repeat moves due at `now` (call once per frame)
    pub fn repeat(&mut self, now: Frame) -> Vec<Action> {
        let mut actions = Vec::new();
        let (das, arr) = (self.das, self.arr);

        if let Some(state) = &mut self.left {
            if repeat_due(state, now, das, arr) {
                actions.push(Action::MoveLeft);
            }
        }
        if let Some(state) = &mut self.right {
            if repeat_due(state, now, das, arr) {
                actions.push(Action::MoveRight);
            }
        }
        actions
    }

    /// Forget held keys
    pub fn clear(&mut self) {
        self.previous = None;
        self.left = None;
        self.right = None;
    }
}

/// Start or stop a repeat when the held condition changes.
/// Returns true when it just started; the first move fires immediately.
fn track_repeat(slot: &mut Option<RepeatState>, was: bool, is: bool, now: Frame) -> bool {
    match (was, is) {
        (false, true) => {
            *slot = Some(RepeatState {
                pressed_at: now,
                last_repeat: None,
            });
            true
        }
        (true, false) => {
            *slot = None;
            false
        }
        _ => false,
    }
}

/// The first repeat lands `das + arr` frames after the press, then every `arr`
fn repeat_due(state: &mut RepeatState, now: Frame, das: u32, arr: u32) -> bool {
    let held = frames_since(now, state.pressed_at);
    if held < das as u64 + arr as u64 {
        return false;
    }
    let due = match state.last_repeat {
        None => true,
        Some(last) => frames_since(now, last) >= arr as u64,
    };
    if due {
        state.last_repeat = Some(now);
    }
    due
}
