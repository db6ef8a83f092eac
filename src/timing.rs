//! Frame clock and level-dependent delays

use crate::game::GameState;
use std::time::Duration;

/// A simulated frame number. Every timestamp in the game state is a `Frame`.
pub type Frame = u64;

/// Gravity timer rate
pub const FRAMES_PER_SECOND: u64 = 60;
pub const FRAME_DURATION: Duration = Duration::from_micros(1_000_000 / FRAMES_PER_SECOND);

/// Frames that passed between `then` and `now`
pub fn frames_since(now: Frame, then: Frame) -> u64 {
    now.saturating_sub(then)
}

/// Level data: how long a grounded piece may wait, and how often gravity pulls.
pub trait LevelTiming {
    /// Frames a piece may rest on the stack before it locks
    fn lock_delay_frames(&self, state: &GameState) -> u32;
    /// Frames between two gravity steps
    fn gravity_delay_frames(&self, state: &GameState) -> u32;
}

/// (first level of band, frames) pairs, ascending by level
const GRAVITY_BANDS: [(u32, u32); 10] = [
    (0, 48),
    (10, 40),
    (30, 32),
    (60, 24),
    (100, 16),
    (150, 10),
    (200, 6),
    (300, 4),
    (400, 2),
    (500, 1),
];

const LOCK_DELAY_BANDS: [(u32, u32); 4] = [(0, 30), (500, 24), (700, 18), (900, 15)];

fn band_lookup(bands: &[(u32, u32)], level: u32) -> u32 {
    bands
        .iter()
        .rev()
        .find(|(from, _)| level >= *from)
        .map_or(bands[0].1, |(_, frames)| *frames)
}

/// Default level table: gravity speeds up steadily, lock delay tightens late
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardTiming;

impl LevelTiming for StandardTiming {
    fn lock_delay_frames(&self, state: &GameState) -> u32 {
        band_lookup(&LOCK_DELAY_BANDS, state.level)
    }

    fn gravity_delay_frames(&self, state: &GameState) -> u32 {
        band_lookup(&GRAVITY_BANDS, state.level)
    }
}

/// Fixed delays regardless of level
#[derive(Debug, Clone, Copy)]
pub struct FixedTiming {
    pub lock_delay: u32,
    pub gravity_delay: u32,
}

impl LevelTiming for FixedTiming {
    fn lock_delay_frames(&self, _state: &GameState) -> u32 {
        self.lock_delay
    }

    fn gravity_delay_frames(&self, _state: &GameState) -> u32 {
        self.gravity_delay
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frames_since_saturates() {
        assert_eq!(frames_since(10, 4), 6);
        assert_eq!(frames_since(4, 10), 0);
    }

    #[test]
    fn test_frame_duration() {
        assert_eq!(FRAME_DURATION.as_micros(), 16_666);
    }

    #[test]
    fn test_gravity_bands() {
        let mut state = GameState::new(1, 0);
        assert_eq!(StandardTiming.gravity_delay_frames(&state), 48);
        state.level = 29;
        assert_eq!(StandardTiming.gravity_delay_frames(&state), 40);
        state.level = 100;
        assert_eq!(StandardTiming.gravity_delay_frames(&state), 16);
        state.level = 5_000;
        assert_eq!(StandardTiming.gravity_delay_frames(&state), 1);
    }

    #[test]
    fn test_gravity_never_slows_down() {
        let mut state = GameState::new(1, 0);
        let mut previous = u32::MAX;
        for level in 0..1_000 {
            state.level = level;
            let delay = StandardTiming.gravity_delay_frames(&state);
            assert!(delay <= previous && delay >= 1);
            previous = delay;
        }
    }

    #[test]
    fn test_lock_delay_bands() {
        let mut state = GameState::new(1, 0);
        assert_eq!(StandardTiming.lock_delay_frames(&state), 30);
        state.level = 750;
        assert_eq!(StandardTiming.lock_delay_frames(&state), 18);
        state.level = 2_000;
        assert_eq!(StandardTiming.lock_delay_frames(&state), 15);
    }
}
