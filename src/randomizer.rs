//! Piece randomizer with anti-repeat history
//!
//! Each new piece is drawn uniformly, but a draw that matches one of the last
//! four history entries is redrawn, up to six draws in total. The sixth draw
//! is kept even if it repeats, so the picker never loops forever.
//! Only the trailing window is retained; sequence numbers keep counting.

use crate::tetromino::PieceKind;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::collections::VecDeque;

/// How many trailing history entries a draw must avoid
pub const ANTI_REPEAT_WINDOW: usize = 4;
/// Total draws before a repeat is accepted
pub const MAX_DRAWS: usize = 6;
/// Entries in a freshly seeded queue: the opening piece plus two extensions
pub const INITIAL_QUEUE_LEN: usize = 3;

/// Kinds that make for an unfair opening (O and S)
const OPENING_EXCLUDED: [PieceKind; 2] = [PieceKind::O, PieceKind::S];

/// One issued piece and its position in the sequence of all pieces issued
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueEntry {
    pub kind: PieceKind,
    pub sequence: u64,
}

/// Uniform choice over the 7 kinds
pub fn pick_random_piece<R: Rng>(rng: &mut R) -> PieceKind {
    PieceKind::all()[rng.gen_range(0..7)]
}

/// Uniform choice over the kinds allowed as a first piece
pub fn pick_opening_piece<R: Rng>(rng: &mut R) -> PieceKind {
    let allowed: Vec<PieceKind> = PieceKind::all()
        .into_iter()
        .filter(|kind| !OPENING_EXCLUDED.contains(kind))
        .collect();
    // `allowed` always holds five kinds
    *allowed.choose(rng).unwrap_or(&PieceKind::I)
}

/// Draw the next entry against the trailing window of `history` and append it.
/// `draw` supplies candidate kinds; it is called at most `MAX_DRAWS` times.
pub fn next_queue_entry(
    history: &mut Vec<QueueEntry>,
    sequence: u64,
    mut draw: impl FnMut() -> PieceKind,
) -> QueueEntry {
    let recent: Vec<PieceKind> = history
        .iter()
        .rev()
        .take(ANTI_REPEAT_WINDOW)
        .map(|entry| entry.kind)
        .collect();

    let mut kind = draw();
    for _ in 1..MAX_DRAWS {
        if !recent.contains(&kind) {
            break;
        }
        kind = draw();
    }

    let entry = QueueEntry { kind, sequence };
    history.push(entry);
    entry
}

/// Seeded piece source. Only the trailing anti-repeat window of the history
/// is kept; `issued` counts every entry ever drawn.
#[derive(Debug, Clone)]
pub struct Randomizer {
    rng: ChaCha8Rng,
    recent: Vec<QueueEntry>,
    issued: u64,
}

impl Randomizer {
    /// Create a randomizer and the initial queue: the opening piece at
    /// sequence 0 followed by two regular draws.
    pub fn new(seed: u64) -> (Self, VecDeque<QueueEntry>) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let opening = QueueEntry {
            kind: pick_opening_piece(&mut rng),
            sequence: 0,
        };
        let mut randomizer = Self {
            rng,
            recent: vec![opening],
            issued: 1,
        };

        let mut queue = VecDeque::with_capacity(INITIAL_QUEUE_LEN);
        queue.push_back(opening);
        while queue.len() < INITIAL_QUEUE_LEN {
            queue.push_back(randomizer.next_entry());
        }
        (randomizer, queue)
    }

    /// Draw and record the next entry
    pub fn next_entry(&mut self) -> QueueEntry {
        let rng = &mut self.rng;
        let entry = next_queue_entry(&mut self.recent, self.issued, || {
            pick_random_piece(&mut *rng)
        });
        if self.recent.len() > ANTI_REPEAT_WINDOW {
            self.recent.remove(0);
        }
        self.issued += 1;
        entry
    }

    /// The last few entries issued, oldest first
    pub fn recent(&self) -> &[QueueEntry] {
        &self.recent
    }

    /// How many entries have been issued in total
    pub fn issued(&self) -> u64 {
        self.issued
    }
}
