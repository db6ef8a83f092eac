//! Event queue and dispatcher
//!
//! Every source of change (button snapshots and the frame timer) is pushed as
//! an [`Event`] and drained in arrival order. Each event becomes one or more
//! actions, and each action runs exactly one tick of the reducer. The frame
//! counter advances once per timer event and is the clock for every tick.

use crate::game::{next_tick, Action, GameState, TickContext};
use crate::input::{Buttons, InputTracker};
use crate::settings::Settings;
use crate::timing::{Frame, LevelTiming, StandardTiming};
use std::collections::VecDeque;
use tracing::{debug, info};

/// Something that happened outside the core
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// The input collaborator published a new button snapshot
    Input(Buttons),
    /// The 60 Hz timer fired
    Frame,
}

/// Owns the game state and folds events into it
pub struct Scheduler<T: LevelTiming = StandardTiming> {
    state: GameState,
    paused: bool,
    frame: Frame,
    input: InputTracker,
    pending: VecDeque<Event>,
    timing: T,
    spawn_delay: u32,
}

impl Scheduler<StandardTiming> {
    /// Scheduler with the standard level table
    pub fn new(settings: &Settings) -> Self {
        Self::with_timing(settings, StandardTiming)
    }
}

impl<T: LevelTiming> Scheduler<T> {
    pub fn with_timing(settings: &Settings, timing: T) -> Self {
        let seed = settings.randomizer.seed.unwrap_or_else(rand::random);
        info!(seed, "new game");
        Self {
            state: GameState::new(seed, 0),
            paused: false,
            frame: 0,
            input: InputTracker::from_settings(settings),
            pending: VecDeque::new(),
            timing,
            spawn_delay: settings.timing.spawn_delay_frames,
        }
    }

    /// Throw the current game away and start over, keeping the clock running
    pub fn new_game(&mut self, seed: u64) {
        info!(seed, frame = self.frame, "new game");
        self.state = GameState::new(seed, self.frame);
        self.paused = false;
        self.input.clear();
        self.pending.clear();
    }

    /// Queue an event for the next drain
    pub fn push(&mut self, event: Event) {
        self.pending.push_back(event);
    }

    /// Process every queued event in arrival order.
    /// Returns one snapshot per tick that ran.
    pub fn drain(&mut self) -> Vec<GameState> {
        let mut snapshots = Vec::new();
        while let Some(event) = self.pending.pop_front() {
            self.handle(event, &mut snapshots);
        }
        snapshots
    }

    fn handle(&mut self, event: Event, snapshots: &mut Vec<GameState>) {
        match event {
            Event::Frame => {
                self.frame += 1;
                snapshots.push(self.dispatch(Action::Gravity));
                for action in self.input.repeat(self.frame) {
                    snapshots.push(self.dispatch(action));
                }
            }
            Event::Input(buttons) => {
                let events = self.input.update(buttons, self.frame);
                for action in events.actions {
                    snapshots.push(self.dispatch(action));
                }
                if events.pause_toggled {
                    self.paused = !self.paused;
                    debug!(paused = self.paused, frame = self.frame, "pause toggled");
                    snapshots.push(self.dispatch(Action::Idle));
                }
            }
        }
    }

    /// Run one tick with `action` at the current frame
    pub fn dispatch(&mut self, action: Action) -> GameState {
        let ctx = TickContext {
            now: self.frame,
            timing: &self.timing,
            spawn_delay: self.spawn_delay,
        };
        self.state = next_tick(self.state.clone(), action, self.paused, &ctx);
        self.state.clone()
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn frame(&self) -> Frame {
        self.frame
    }

    pub fn paused(&self) -> bool {
        self.paused
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::piece::SPAWN_X;
    use crate::timing::FixedTiming;

    const NO_GRAVITY: FixedTiming = FixedTiming {
        lock_delay: 30,
        gravity_delay: 1_000,
    };
    const EVERY_FRAME: FixedTiming = FixedTiming {
        lock_delay: 30,
        gravity_delay: 1,
    };

    fn init_logging() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    }

    fn seeded(seed: u64) -> Settings {
        let mut settings = Settings::default();
        settings.randomizer.seed = Some(seed);
        settings
    }

    fn frames(scheduler: &mut Scheduler<FixedTiming>, count: usize) {
        for _ in 0..count {
            scheduler.push(Event::Frame);
        }
        scheduler.drain();
    }

    fn press(f: impl FnOnce(&mut Buttons)) -> Event {
        let mut buttons = Buttons::default();
        f(&mut buttons);
        Event::Input(buttons)
    }

    /// Scheduler with the first piece already on the field
    fn running(timing: FixedTiming) -> Scheduler<FixedTiming> {
        let mut scheduler = Scheduler::with_timing(&seeded(21), timing);
        frames(&mut scheduler, 31);
        scheduler
    }

    #[test]
    fn test_first_piece_spawns_after_delay() {
        let mut scheduler = Scheduler::with_timing(&seeded(3), NO_GRAVITY);
        frames(&mut scheduler, 30);
        assert!(scheduler.state().active.is_none());
        frames(&mut scheduler, 1);
        assert_eq!(scheduler.frame(), 31);
        assert!(scheduler.state().active.is_some());
    }

    #[test]
    fn test_one_snapshot_per_tick() {
        let mut scheduler = Scheduler::with_timing(&seeded(3), NO_GRAVITY);
        scheduler.push(Event::Frame);
        scheduler.push(press(|b| b.hold = true));
        // Gravity, then SetInputs and Hold
        assert_eq!(scheduler.drain().len(), 3);
        // Duplicate snapshot produces no ticks
        scheduler.push(press(|b| b.hold = true));
        assert!(scheduler.drain().is_empty());
    }

    #[test]
    fn test_move_and_gravity_interleave_either_way() {
        for timing in [NO_GRAVITY, EVERY_FRAME] {
            let mut outcomes = Vec::new();
            for input_first in [true, false] {
                let mut scheduler = running(timing);
                let left = press(|b| b.left = true);
                if input_first {
                    scheduler.push(left);
                    scheduler.push(Event::Frame);
                } else {
                    scheduler.push(Event::Frame);
                    scheduler.push(left);
                }
                scheduler.drain();
                outcomes.push(scheduler.state().active);
            }
            assert_eq!(outcomes[0], outcomes[1]);
            assert_eq!(outcomes[0].map(|p| p.x), Some(SPAWN_X - 1));
        }
    }

    #[test]
    fn test_held_left_auto_repeats() {
        let mut scheduler = running(NO_GRAVITY);
        scheduler.push(press(|b| b.left = true));
        scheduler.drain();
        assert_eq!(scheduler.state().active.map(|p| p.x), Some(SPAWN_X - 1));

        frames(&mut scheduler, 10);
        assert_eq!(scheduler.state().active.map(|p| p.x), Some(SPAWN_X - 1));
        frames(&mut scheduler, 1);
        assert_eq!(scheduler.state().active.map(|p| p.x), Some(SPAWN_X - 2));

        scheduler.push(Event::Input(Buttons::default()));
        frames(&mut scheduler, 20);
        assert_eq!(scheduler.state().active.map(|p| p.x), Some(SPAWN_X - 2));
    }

    #[test]
    fn test_pause_freezes_game() {
        init_logging();
        let mut scheduler = running(EVERY_FRAME);
        scheduler.push(press(|b| b.pause = true));
        scheduler.push(Event::Input(Buttons::default()));
        scheduler.drain();
        assert!(scheduler.paused());
        assert!(scheduler.state().paused);

        let frozen = scheduler.state().active;
        frames(&mut scheduler, 5);
        scheduler.push(press(|b| b.right = true));
        scheduler.push(Event::Input(Buttons::default()));
        scheduler.drain();
        assert_eq!(scheduler.state().active, frozen);

        scheduler.push(press(|b| b.pause = true));
        scheduler.drain();
        assert!(!scheduler.paused());
        assert!(!scheduler.state().paused);
        frames(&mut scheduler, 1);
        assert_eq!(
            scheduler.state().active.map(|p| p.y),
            frozen.map(|p| p.y + 1)
        );
    }

    #[test]
    fn test_same_seed_same_game() {
        init_logging();
        let script = [
            press(|b| b.hold = true),
            Event::Input(Buttons::default()),
            press(|b| b.up = true),
            Event::Input(Buttons::default()),
        ];
        let play = || {
            let mut scheduler = running(EVERY_FRAME);
            for event in script {
                scheduler.push(event);
            }
            frames(&mut scheduler, 200);
            let state = scheduler.state();
            (
                state.environment.clone(),
                state.recent_pieces().to_vec(),
                state.pieces_issued(),
                state.held,
            )
        };
        assert_eq!(play(), play());
    }

    #[test]
    fn test_new_game_resets() {
        let mut scheduler = running(NO_GRAVITY);
        scheduler.push(press(|b| b.pause = true));
        scheduler.drain();
        scheduler.new_game(99);
        assert!(!scheduler.paused());
        assert!(scheduler.state().active.is_none());
        assert_eq!(scheduler.frame(), 31);
        frames(&mut scheduler, 31);
        assert!(scheduler.state().active.is_some());
    }

    #[test]
    fn test_spawn_delay_from_settings() {
        let mut settings = seeded(4);
        settings.timing.spawn_delay_frames = 5;
        let mut scheduler = Scheduler::with_timing(&settings, NO_GRAVITY);
        frames(&mut scheduler, 6);
        assert!(scheduler.state().active.is_some());
    }
}
