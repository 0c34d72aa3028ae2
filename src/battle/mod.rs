//! Battle Card Matcher: a memory card game where matches attack the enemy
//! and mismatches let it strike back.
//!
//! Keys: `n` new game, `l` level select, `1`-`5` pick a level, `a`-`p` flip
//! the card at that grid position, `r` restart / retry, `q` menu.

pub mod actions;
pub mod cards;
pub mod levels;
pub mod logic;
pub mod render;
pub mod save;
pub mod sound;
pub mod state;

use std::cell::RefCell;
use std::rc::Rc;

use ratzilla::ratatui::layout::Rect;
use ratzilla::ratatui::Frame;

use crate::input::{ClickState, InputEvent};

use actions::*;
use levels::LEVEL_COUNT;
use sound::SoundCue;
use state::{BattleState, Progress, Screen};

/// Highest card position reachable from the keyboard (`a`..=`p`).
const MAX_CARD_KEYS: usize = 16;

pub struct BattleGame {
    pub state: BattleState,
}

impl BattleGame {
    pub fn new() -> Self {
        #[cfg(target_arch = "wasm32")]
        let progress = save::load_progress();
        #[cfg(not(target_arch = "wasm32"))]
        let progress = Progress::default();

        Self {
            state: BattleState::new(progress),
        }
    }

    /// Handle an input event. Returns true if the event was consumed.
    pub fn handle_input(&mut self, event: &InputEvent) -> bool {
        let consumed = match event {
            InputEvent::Key(ch) => handle_key(&mut self.state, ch.to_ascii_lowercase()),
            InputEvent::Click(id) => handle_click(&mut self.state, *id),
        };
        self.persist();
        consumed
    }

    pub fn tick(&mut self, delta_ticks: u32) {
        logic::tick(&mut self.state, delta_ticks);
        self.persist();
    }

    pub fn render(&self, f: &mut Frame, area: Rect, click_state: &Rc<RefCell<ClickState>>) {
        render::render(&self.state, f, area, click_state);
    }

    pub fn drain_cues(&mut self) -> Vec<SoundCue> {
        self.state.drain_cues()
    }

    /// Write best runs and unlocks to storage when they changed.
    fn persist(&mut self) {
        if !self.state.progress_dirty {
            return;
        }
        self.state.progress_dirty = false;
        #[cfg(target_arch = "wasm32")]
        save::save_progress(&self.state.progress);
    }
}

// ── Input Handling ──────────────────────────────────────────
//
// The logic functions reject transitions that are not valid on the current
// screen, so the dispatch below only maps inputs to operations.

fn handle_key(state: &mut BattleState, ch: char) -> bool {
    // On the board every letter up to 'p' names a card.
    if state.screen == Screen::Playing && ('a'..='p').contains(&ch) {
        return flip_at(state, (ch as u8 - b'a') as usize);
    }
    match ch {
        'n' => logic::new_run(state),
        'l' => logic::open_level_select(state),
        'q' => logic::go_to_menu(state),
        'r' => logic::restart_level(state) || logic::retry_level(state),
        '1'..='5' => logic::start_level(state, (ch as u8 - b'1') as usize),
        _ => false,
    }
}

fn handle_click(state: &mut BattleState, id: u16) -> bool {
    match id {
        NEW_GAME => logic::new_run(state),
        OPEN_LEVEL_SELECT => logic::open_level_select(state),
        MENU => logic::go_to_menu(state),
        RESTART => logic::restart_level(state),
        RETRY => logic::retry_level(state),
        _ if (LEVEL_BASE..LEVEL_BASE + LEVEL_COUNT as u16).contains(&id) => {
            logic::start_level(state, (id - LEVEL_BASE) as usize)
        }
        _ if (CARD_BASE..CARD_BASE + MAX_CARD_KEYS as u16).contains(&id) => {
            flip_at(state, (id - CARD_BASE) as usize)
        }
        _ => false,
    }
}

/// Flip the card shown at grid position `pos`.
fn flip_at(state: &mut BattleState, pos: usize) -> bool {
    match state.session.cards.get(pos).map(|c| c.id) {
        Some(id) => logic::flip_card(state, id),
        None => false,
    }
}
