//! Line-clear scoring and level progression

/// Levels at multiples of this need a line clear to be reached
pub const CHECKPOINT_INTERVAL: u32 = 100;

/// Points for clearing `lines` rows with a single lock: 10 per line squared
pub fn line_clear_points(lines: u32) -> u64 {
    let lines = lines as u64;
    lines * lines * 10
}

/// Level after a tick.
///
/// Nothing changes unless a piece locked. A lock is worth one level, plus the
/// line count when two or more lines cleared. When the next level is a
/// checkpoint (a multiple of 100) the advance only happens if at least one
/// line cleared on the same tick.
pub fn advance_level(level: u32, piece_locked: bool, completed_lines: u32) -> u32 {
    if !piece_locked {
        return level;
    }
    if (level + 1) % CHECKPOINT_INTERVAL == 0 && completed_lines == 0 {
        return level;
    }
    let line_bonus = if completed_lines > 1 { completed_lines } else { 0 };
    level + 1 + line_bonus
}
