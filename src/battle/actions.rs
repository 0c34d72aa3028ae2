//! Semantic action IDs for Battle Card Matcher click targets.

// ── Start / champion screens ───────────────────────────────────
/// Begin a run at level 1 (also "Play Again" on the champion screen).
pub const NEW_GAME: u16 = 1;
pub const OPEN_LEVEL_SELECT: u16 = 2;

// ── Navigation ─────────────────────────────────────────────────
/// Back to the start screen.
pub const MENU: u16 = 3;
/// Restart the level in progress.
pub const RESTART: u16 = 4;
/// Retry the lost level from the defeat screen.
pub const RETRY: u16 = 5;

// ── Level select ───────────────────────────────────────────────
/// Level base: + 0-based level index.
pub const LEVEL_BASE: u16 = 10;

// ── Card grid ──────────────────────────────────────────────────
/// Card base: + position in the grid (not the card id).
pub const CARD_BASE: u16 = 100;
