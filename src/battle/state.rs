//! Battle Card Matcher game state definitions.

use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::time::Timer;

use super::cards::{seed_from_entropy, Card};
use super::levels::{level, LevelDef, LEVELS, MAX_PLAYER_HP};
use super::sound::SoundCue;

/// Which screen is shown.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Screen {
    Start,
    LevelSelect,
    Playing,
    Victory,
    Defeat,
    Champion,
}

/// State of one level attempt. Replaced wholesale whenever a level is
/// (re)entered, so no timer or pending pair outlives its level.
#[derive(Clone, Debug)]
pub struct Session {
    /// 0-based level index.
    pub level: usize,
    pub player_hp: u32,
    pub enemy_hp: u32,
    pub cards: Vec<Card>,
    /// Ids of face-up cards awaiting resolution (0, 1 or 2 entries).
    pub pending: Vec<usize>,
    /// Set while the resolution delay runs; clicks are ignored meanwhile.
    pub resolving: bool,
    pub matched_pairs: usize,
    /// Consecutive matches without a mismatch.
    pub combo: u32,
    /// Damage dealt by the most recent match.
    pub last_damage: u32,
    pub elapsed_secs: u32,
    pub mistakes: u32,
    pub timers: SessionTimers,
    pub effects: Effects,
}

impl Session {
    pub fn new(level: usize, cards: Vec<Card>) -> Self {
        let enemy_hp = super::levels::level(level).map_or(0, |l| l.enemy_hp);
        Self {
            level,
            player_hp: MAX_PLAYER_HP,
            enemy_hp,
            cards,
            pending: Vec::with_capacity(2),
            resolving: false,
            matched_pairs: 0,
            combo: 0,
            last_damage: 0,
            elapsed_secs: 0,
            mistakes: 0,
            timers: SessionTimers::default(),
            effects: Effects::default(),
        }
    }

    pub fn level_def(&self) -> &'static LevelDef {
        level(self.level).unwrap_or(&LEVELS[0])
    }

    pub fn card(&self, id: usize) -> Option<&Card> {
        self.cards.iter().find(|c| c.id == id)
    }

    pub fn card_mut(&mut self, id: usize) -> Option<&mut Card> {
        self.cards.iter_mut().find(|c| c.id == id)
    }
}

/// One-shot timers belonging to a session.
#[derive(Clone, Debug, Default)]
pub struct SessionTimers {
    /// Resolves the pending pair.
    pub resolve: Timer,
    /// Leaves the victory screen.
    pub advance: Timer,
    /// Ticks accumulated toward the next elapsed second.
    pub second_ticks: u32,
}

/// Cosmetic flags driven by short timers.
#[derive(Clone, Debug, Default)]
pub struct Effects {
    pub player_attacking: Timer,
    pub enemy_attacking: Timer,
    pub player_hit: Timer,
    pub enemy_hit: Timer,
    pub combo_banner: Timer,
}

/// A completed run, as stored in the best-runs table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HighScore {
    /// Completion time in seconds.
    pub time: u32,
    pub mistakes: u32,
    pub date: String,
}

/// Data that survives page reloads.
#[derive(Clone, Debug, PartialEq)]
pub struct Progress {
    /// Sorted by (time, mistakes), at most five entries.
    pub high_scores: Vec<HighScore>,
    /// Highest level number (1-based) that can be started from level select.
    pub unlocked: usize,
}

impl Default for Progress {
    fn default() -> Self {
        Self {
            high_scores: Vec::new(),
            unlocked: 1,
        }
    }
}

/// Top-level game state.
pub struct BattleState {
    pub screen: Screen,
    pub session: Session,
    pub progress: Progress,
    /// Set when `progress` changed and should be written to storage.
    pub progress_dirty: bool,
    /// Whether the last completed run sorted first in the best-runs table.
    pub is_new_high_score: bool,
    /// Sound cues raised since the last drain.
    pub cues: Vec<SoundCue>,
    /// Whether the audio context has been resumed by a user gesture.
    pub audio_resumed: bool,
    pub log: Vec<String>,
    pub rng: ChaCha8Rng,
    /// Returns today's date for high-score records.
    pub today: fn() -> String,
}

const LOG_LIMIT: usize = 30;

impl BattleState {
    pub fn new(progress: Progress) -> Self {
        Self::with_rng(progress, seed_from_entropy())
    }

    pub fn with_rng(progress: Progress, rng: ChaCha8Rng) -> Self {
        Self {
            screen: Screen::Start,
            session: Session::new(0, Vec::new()),
            progress,
            progress_dirty: false,
            is_new_high_score: false,
            cues: Vec::new(),
            audio_resumed: false,
            log: vec!["Match the cards to attack! Wrong matches hurt you!".into()],
            rng,
            today: super::save::today,
        }
    }

    pub fn add_log(&mut self, text: impl Into<String>) {
        self.log.push(text.into());
        if self.log.len() > LOG_LIMIT {
            self.log.remove(0);
        }
    }

    pub fn cue(&mut self, cue: SoundCue) {
        self.cues.push(cue);
    }

    /// Take all queued sound cues.
    pub fn drain_cues(&mut self) -> Vec<SoundCue> {
        std::mem::take(&mut self.cues)
    }

    pub fn is_unlocked(&self, index: usize) -> bool {
        index < LEVELS.len() && index < self.progress.unlocked
    }
}
