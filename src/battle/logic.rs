//! Battle Card Matcher game logic: pure functions over [`BattleState`].
//!
//! Every screen change goes through one of the transition functions below.
//! Delays are [`Timer`](crate::time::Timer)s owned by the current
//! [`Session`], so replacing the session cancels anything still pending.

use crate::time::TICKS_PER_SEC;

use super::cards::generate_cards;
use super::levels::{
    level, ADVANCE_TICKS, COMBO_BANNER_TICKS, HIGH_SCORE_LIMIT, HIT_FLASH_TICKS, LEVEL_COUNT,
    LUNGE_TICKS, RESOLVE_TICKS,
};
use super::sound::SoundCue;
use super::state::{BattleState, HighScore, Screen, Session};

// ── Scoring ──────────────────────────────────────────────────

/// Damage multiplier for a match streak. Highest reached tier wins.
pub fn combo_multiplier(streak: u32) -> f64 {
    match streak {
        s if s >= 5 => 2.0,
        s if s >= 3 => 1.5,
        2 => 1.25,
        _ => 1.0,
    }
}

/// Damage dealt by a match at the given streak, rounded down.
pub fn combo_damage(base: u32, streak: u32) -> u32 {
    (base as f64 * combo_multiplier(streak)).floor() as u32
}

/// `m:ss`
pub fn format_time(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

/// Insert a completed run into the best-runs table, keeping it sorted by
/// (time, mistakes) and capped at five entries.
///
/// Returns true if the run now heads the table. A run that ties the
/// previous leader on both time and mistakes also counts as a new best.
pub fn insert_high_score(scores: &mut Vec<HighScore>, record: HighScore) -> bool {
    let (time, mistakes) = (record.time, record.mistakes);
    scores.push(record);
    scores.sort_by_key(|s| (s.time, s.mistakes));
    scores.truncate(HIGH_SCORE_LIMIT);
    scores
        .first()
        .is_some_and(|best| best.time == time && best.mistakes == mistakes)
}

/// Raise the unlocked level. Never lowers it.
fn raise_unlocked(state: &mut BattleState, number: usize) {
    let number = number.min(LEVEL_COUNT);
    if number > state.progress.unlocked {
        state.progress.unlocked = number;
        state.progress_dirty = true;
    }
}

// ── Screen transitions ───────────────────────────────────────

fn resume_audio(state: &mut BattleState) {
    if !state.audio_resumed {
        state.audio_resumed = true;
        state.cue(SoundCue::ResumeAudio);
    }
}

/// Replace the session with a fresh one for `index` and show the board.
/// `carry_run` keeps the elapsed time and mistake count of the run in
/// progress (auto-advance); manual entries start them from zero.
fn enter_level(state: &mut BattleState, index: usize, carry_run: bool) -> bool {
    let Some(def) = level(index) else {
        return false;
    };
    let cards = generate_cards(def, &mut state.rng);
    let mut session = Session::new(index, cards);
    if carry_run {
        session.elapsed_secs = state.session.elapsed_secs;
        session.mistakes = state.session.mistakes;
    }
    state.session = session;
    state.screen = Screen::Playing;
    state.add_log(format!(
        "Level {}: {}. {} appears!",
        def.number, def.name, def.enemy.name
    ));
    true
}

/// Cancel the session's timers and any flips waiting to resolve.
fn cancel_schedule(state: &mut BattleState) {
    let s = &mut state.session;
    s.timers = Default::default();
    s.pending.clear();
    s.resolving = false;
}

/// Cancel everything the current session still has scheduled, including
/// attack and hit effects.
fn teardown_session(state: &mut BattleState) {
    cancel_schedule(state);
    state.session.effects = Default::default();
}

/// Begin a new run at level 1.
pub fn new_run(state: &mut BattleState) -> bool {
    if !matches!(state.screen, Screen::Start | Screen::Champion) {
        return false;
    }
    resume_audio(state);
    state.is_new_high_score = false;
    enter_level(state, 0, false)
}

pub fn open_level_select(state: &mut BattleState) -> bool {
    if state.screen != Screen::Start {
        return false;
    }
    state.screen = Screen::LevelSelect;
    true
}

/// Back to the start screen. Not available while the victory screen
/// is counting down.
pub fn go_to_menu(state: &mut BattleState) -> bool {
    match state.screen {
        Screen::LevelSelect | Screen::Playing | Screen::Defeat | Screen::Champion => {
            teardown_session(state);
            state.screen = Screen::Start;
            true
        }
        Screen::Start | Screen::Victory => false,
    }
}

/// Start a level picked on the level select screen. Locked levels are refused.
pub fn start_level(state: &mut BattleState, index: usize) -> bool {
    if state.screen != Screen::LevelSelect || !state.is_unlocked(index) {
        return false;
    }
    resume_audio(state);
    state.is_new_high_score = false;
    enter_level(state, index, false)
}

/// Restart the current level mid-fight.
pub fn restart_level(state: &mut BattleState) -> bool {
    if state.screen != Screen::Playing {
        return false;
    }
    teardown_session(state);
    let index = state.session.level;
    enter_level(state, index, false)
}

/// Try the lost level again from the defeat screen.
pub fn retry_level(state: &mut BattleState) -> bool {
    if state.screen != Screen::Defeat {
        return false;
    }
    resume_audio(state);
    let index = state.session.level;
    enter_level(state, index, false)
}

// ── Card play ────────────────────────────────────────────────

/// Flip a card face up. Returns false if the click was ignored.
pub fn flip_card(state: &mut BattleState, id: usize) -> bool {
    if state.screen != Screen::Playing {
        return false;
    }
    let s = &mut state.session;
    if s.resolving || s.pending.len() >= 2 {
        return false;
    }
    match s.card_mut(id) {
        Some(card) if card.is_selectable() => card.flipped = true,
        _ => return false,
    }
    s.pending.push(id);
    if s.pending.len() == 2 {
        s.resolving = true;
        s.timers.resolve.start(RESOLVE_TICKS);
    }
    state.cue(SoundCue::Flip);
    true
}

/// Evaluate the two pending cards once the resolution delay has elapsed.
fn resolve_pending(state: &mut BattleState) {
    let (first, second) = match state.session.pending[..] {
        [a, b] => (a, b),
        _ => {
            state.session.pending.clear();
            state.session.resolving = false;
            return;
        }
    };
    let word_a = state.session.card(first).map(|c| c.word);
    let word_b = state.session.card(second).map(|c| c.word);
    let def = state.session.level_def();

    if word_a.is_some() && word_a == word_b {
        let s = &mut state.session;
        s.combo += 1;
        let combo = s.combo;
        let damage = combo_damage(def.player_damage, combo);
        s.last_damage = damage;
        for id in [first, second] {
            if let Some(card) = s.card_mut(id) {
                card.matched = true;
            }
        }
        s.enemy_hp = s.enemy_hp.saturating_sub(damage);
        s.matched_pairs += 1;
        s.effects.player_attacking.start(LUNGE_TICKS);
        if combo >= 2 {
            s.effects.combo_banner.start(COMBO_BANNER_TICKS);
            state.cue(SoundCue::Combo(combo));
            state.add_log(format!("{}x Combo! {} damage!", combo, damage));
        } else {
            state.add_log(format!("Match! {} damage to {}.", damage, def.enemy.name));
        }
        state.cue(SoundCue::Match(combo));
        state.cue(SoundCue::PlayerAttack);
    } else {
        let s = &mut state.session;
        s.combo = 0;
        s.mistakes += 1;
        for id in [first, second] {
            if let Some(card) = s.card_mut(id) {
                card.flipped = false;
            }
        }
        s.player_hp = s.player_hp.saturating_sub(def.enemy_damage);
        s.effects.enemy_attacking.start(LUNGE_TICKS);
        state.cue(SoundCue::Mismatch);
        state.cue(SoundCue::EnemyAttack);
        state.add_log(format!(
            "Miss! {} hits you for {}.",
            def.enemy.name, def.enemy_damage
        ));
    }

    state.session.pending.clear();
    state.session.resolving = false;
    check_outcome(state);
}

/// Defeat is checked first, so it wins when both sides hit zero together.
fn check_outcome(state: &mut BattleState) {
    if state.screen != Screen::Playing {
        return;
    }
    if state.session.player_hp == 0 {
        // The killing blow's lunge still lands on the defeat screen.
        cancel_schedule(state);
        state.screen = Screen::Defeat;
        state.cue(SoundCue::Defeat);
        let def = state.session.level_def();
        state.add_log(format!("{} defeated you at Level {}.", def.enemy.name, def.number));
    } else if state.session.enemy_hp == 0 {
        state.screen = Screen::Victory;
        state.session.timers.resolve.cancel();
        state.session.timers.advance.start(ADVANCE_TICKS);
        state.cue(SoundCue::Victory);
        let number = state.session.level_def().number;
        if number < LEVEL_COUNT {
            raise_unlocked(state, number + 1);
        }
        state.add_log(format!("Victory! Level {} complete.", number));
    }
}

/// Leave the victory screen: next level, or the champion screen after
/// the last one.
fn advance_after_victory(state: &mut BattleState) {
    let next = state.session.level + 1;
    if next < LEVEL_COUNT {
        state.cue(SoundCue::LevelUp);
        raise_unlocked(state, next + 1);
        enter_level(state, next, true);
        return;
    }

    state.cue(SoundCue::Champion);
    let record = HighScore {
        time: state.session.elapsed_secs,
        mistakes: state.session.mistakes,
        date: (state.today)(),
    };
    state.is_new_high_score = insert_high_score(&mut state.progress.high_scores, record);
    state.progress_dirty = true;
    raise_unlocked(state, LEVEL_COUNT);
    teardown_session(state);
    state.screen = Screen::Champion;
    state.add_log(format!(
        "Champion! {} with {} mistakes.",
        format_time(state.session.elapsed_secs),
        state.session.mistakes
    ));
}

// ── Tick ─────────────────────────────────────────────────────

pub fn tick(state: &mut BattleState, delta_ticks: u32) {
    for _ in 0..delta_ticks {
        tick_once(state);
    }
}

fn tick_once(state: &mut BattleState) {
    let fx = &mut state.session.effects;
    let player_landed = fx.player_attacking.step();
    let enemy_landed = fx.enemy_attacking.step();
    fx.player_hit.step();
    fx.enemy_hit.step();
    fx.combo_banner.step();
    if player_landed {
        fx.enemy_hit.start(HIT_FLASH_TICKS);
        state.cue(SoundCue::EnemyHit);
    }
    if enemy_landed {
        state.session.effects.player_hit.start(HIT_FLASH_TICKS);
        state.cue(SoundCue::PlayerHit);
    }

    match state.screen {
        Screen::Playing => {
            if state.session.timers.resolve.step() {
                resolve_pending(state);
            }
            if state.screen == Screen::Playing {
                let timers = &mut state.session.timers;
                timers.second_ticks += 1;
                if timers.second_ticks >= TICKS_PER_SEC {
                    timers.second_ticks = 0;
                    state.session.elapsed_secs += 1;
                }
            }
        }
        Screen::Victory => {
            if state.session.timers.advance.step() {
                advance_after_victory(state);
            }
        }
        Screen::Start | Screen::LevelSelect | Screen::Defeat | Screen::Champion => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::levels::{LEVELS, MAX_PLAYER_HP};
    use crate::battle::state::Progress;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn fixed_date() -> String {
        "1/2/2026".into()
    }

    fn state() -> BattleState {
        let mut s = BattleState::with_rng(Progress::default(), ChaCha8Rng::seed_from_u64(42));
        s.today = fixed_date;
        s
    }

    /// Both card ids carrying `word` in the current deck (ids are assigned
    /// before the shuffle, so word i owns ids 2i and 2i+1).
    fn ids_of(state: &BattleState, word: &str) -> (usize, usize) {
        let i = state
            .session
            .level_def()
            .words
            .iter()
            .position(|w| *w == word)
            .unwrap();
        (i * 2, i * 2 + 1)
    }

    fn attempt(state: &mut BattleState, a: usize, b: usize) {
        assert!(flip_card(state, a));
        assert!(flip_card(state, b));
        tick(state, RESOLVE_TICKS);
    }

    fn match_word(state: &mut BattleState, word: &str) {
        let (a, b) = ids_of(state, word);
        attempt(state, a, b);
    }

    fn clear_level(state: &mut BattleState) {
        let words = state.session.level_def().words;
        for word in words {
            if state.screen != Screen::Playing {
                break;
            }
            match_word(state, word);
        }
    }

    // ── scoring ─────────────────────────────────────────────

    #[test]
    fn combo_tiers() {
        assert_eq!(combo_multiplier(0), 1.0);
        assert_eq!(combo_multiplier(1), 1.0);
        assert_eq!(combo_multiplier(2), 1.25);
        assert_eq!(combo_multiplier(3), 1.5);
        assert_eq!(combo_multiplier(4), 1.5);
        assert_eq!(combo_multiplier(5), 2.0);
        assert_eq!(combo_multiplier(12), 2.0);
    }

    #[test]
    fn combo_damage_floors() {
        assert_eq!(combo_damage(20, 2), 25);
        assert_eq!(combo_damage(17, 2), 21); // 21.25
        assert_eq!(combo_damage(19, 3), 28); // 28.5
        assert_eq!(combo_damage(19, 5), 38);
    }

    #[test]
    fn format_time_pads_seconds() {
        assert_eq!(format_time(0), "0:00");
        assert_eq!(format_time(9), "0:09");
        assert_eq!(format_time(120), "2:00");
        assert_eq!(format_time(754), "12:34");
    }

    fn score(time: u32, mistakes: u32) -> HighScore {
        HighScore { time, mistakes, date: "d".into() }
    }

    #[test]
    fn high_scores_sorted_and_capped() {
        let mut scores = Vec::new();
        for (t, m) in [(90, 1), (60, 4), (60, 2), (200, 0), (75, 0), (300, 9)] {
            insert_high_score(&mut scores, score(t, m));
        }
        let keys: Vec<(u32, u32)> = scores.iter().map(|s| (s.time, s.mistakes)).collect();
        assert_eq!(keys, vec![(60, 2), (60, 4), (75, 0), (90, 1), (200, 0)]);
    }

    #[test]
    fn new_best_only_when_first() {
        let mut scores = vec![score(130, 2)];
        assert!(insert_high_score(&mut scores, score(120, 3)));
        assert!(!insert_high_score(&mut scores, score(125, 0)));
    }

    #[test]
    fn exact_tie_with_leader_counts_as_new_best() {
        let mut scores = vec![score(100, 1)];
        assert!(insert_high_score(&mut scores, score(100, 1)));
        assert_eq!(scores.len(), 2);
    }

    #[test]
    fn run_pushed_off_full_table_is_not_best() {
        let mut scores: Vec<HighScore> = (1..=5).map(|t| score(t, 0)).collect();
        assert!(!insert_high_score(&mut scores, score(999, 0)));
        assert_eq!(scores.len(), 5);
        assert!(scores.iter().all(|s| s.time != 999));
    }

    // ── transitions ─────────────────────────────────────────

    #[test]
    fn new_run_enters_level_one() {
        let mut s = state();
        assert!(new_run(&mut s));
        assert_eq!(s.screen, Screen::Playing);
        assert_eq!(s.session.level, 0);
        assert_eq!(s.session.player_hp, MAX_PLAYER_HP);
        assert_eq!(s.session.enemy_hp, 40);
        assert_eq!(s.session.cards.len(), 4);
        assert_eq!(s.cues.first(), Some(&SoundCue::ResumeAudio));
    }

    #[test]
    fn audio_resumed_only_once() {
        let mut s = state();
        new_run(&mut s);
        restart_level(&mut s);
        s.screen = Screen::Defeat;
        retry_level(&mut s);
        let resumes = s.cues.iter().filter(|c| **c == SoundCue::ResumeAudio).count();
        assert_eq!(resumes, 1);
    }

    #[test]
    fn level_select_round_trip() {
        let mut s = state();
        assert!(open_level_select(&mut s));
        assert_eq!(s.screen, Screen::LevelSelect);
        assert!(go_to_menu(&mut s));
        assert_eq!(s.screen, Screen::Start);
    }

    #[test]
    fn locked_level_is_refused() {
        let mut s = state();
        open_level_select(&mut s);
        assert!(!start_level(&mut s, 1));
        assert_eq!(s.screen, Screen::LevelSelect);
        assert!(!start_level(&mut s, 99));
        assert!(start_level(&mut s, 0));
        assert_eq!(s.screen, Screen::Playing);
    }

    #[test]
    fn unlocked_level_starts_directly() {
        let mut s = state();
        s.progress.unlocked = 3;
        open_level_select(&mut s);
        assert!(start_level(&mut s, 2));
        assert_eq!(s.session.level, 2);
        assert_eq!(s.session.enemy_hp, 80);
        assert_eq!(s.session.cards.len(), 8);
    }

    #[test]
    fn start_level_only_from_level_select() {
        let mut s = state();
        assert!(!start_level(&mut s, 0));
        assert_eq!(s.screen, Screen::Start);
    }

    #[test]
    fn restart_mid_fight_resets_level() {
        let mut s = state();
        new_run(&mut s);
        let (p, _) = ids_of(&s, "Punch");
        let (k, _) = ids_of(&s, "Kick");
        attempt(&mut s, p, k);
        tick(&mut s, 30);
        assert!(s.session.elapsed_secs > 0);
        assert!(restart_level(&mut s));
        assert_eq!(s.session.player_hp, MAX_PLAYER_HP);
        assert_eq!(s.session.mistakes, 0);
        assert_eq!(s.session.elapsed_secs, 0);
        assert!(s.session.cards.iter().all(|c| !c.flipped));
    }

    #[test]
    fn menu_cancels_pending_resolution() {
        let mut s = state();
        new_run(&mut s);
        let (p, _) = ids_of(&s, "Punch");
        let (k, _) = ids_of(&s, "Kick");
        flip_card(&mut s, p);
        flip_card(&mut s, k);
        assert!(go_to_menu(&mut s));
        assert!(!s.session.timers.resolve.is_armed());
        tick(&mut s, RESOLVE_TICKS * 2);
        assert_eq!(s.screen, Screen::Start);
        assert_eq!(s.session.mistakes, 0);
        assert_eq!(s.session.player_hp, MAX_PLAYER_HP);
    }

    #[test]
    fn restart_cancels_pending_resolution() {
        let mut s = state();
        new_run(&mut s);
        let (p, _) = ids_of(&s, "Punch");
        let (k, _) = ids_of(&s, "Kick");
        flip_card(&mut s, p);
        flip_card(&mut s, k);
        restart_level(&mut s);
        tick(&mut s, RESOLVE_TICKS);
        assert_eq!(s.session.mistakes, 0);
        assert_eq!(s.session.player_hp, MAX_PLAYER_HP);
    }

    #[test]
    fn victory_has_no_exit() {
        let mut s = state();
        s.screen = Screen::Victory;
        assert!(!go_to_menu(&mut s));
        assert!(!restart_level(&mut s));
        assert!(!retry_level(&mut s));
        assert!(!new_run(&mut s));
    }

    // ── clicks ──────────────────────────────────────────────

    #[test]
    fn clicks_ignored_outside_playing() {
        let mut s = state();
        assert!(!flip_card(&mut s, 0));
    }

    #[test]
    fn flipped_card_cannot_be_clicked_again() {
        let mut s = state();
        new_run(&mut s);
        assert!(flip_card(&mut s, 0));
        assert!(!flip_card(&mut s, 0));
        assert_eq!(s.session.pending, vec![0]);
    }

    #[test]
    fn clicks_ignored_while_resolving() {
        let mut s = state();
        new_run(&mut s);
        flip_card(&mut s, 0);
        flip_card(&mut s, 2);
        assert!(s.session.resolving);
        assert!(!flip_card(&mut s, 1));
        tick(&mut s, RESOLVE_TICKS - 1);
        assert!(s.session.resolving);
        tick(&mut s, 1);
        assert!(!s.session.resolving);
        assert!(s.session.pending.is_empty());
        assert!(flip_card(&mut s, 1));
    }

    #[test]
    fn unknown_card_id_ignored() {
        let mut s = state();
        new_run(&mut s);
        assert!(!flip_card(&mut s, 77));
    }

    #[test]
    fn flip_emits_cue() {
        let mut s = state();
        new_run(&mut s);
        s.drain_cues();
        flip_card(&mut s, 0);
        assert_eq!(s.drain_cues(), vec![SoundCue::Flip]);
    }

    // ── resolution ──────────────────────────────────────────

    #[test]
    fn match_marks_both_cards() {
        let mut s = state();
        new_run(&mut s);
        match_word(&mut s, "Kick");
        let (a, b) = ids_of(&s, "Kick");
        for id in [a, b] {
            let c = s.session.card(id).unwrap();
            assert!(c.flipped && c.matched);
            assert!(!c.is_selectable());
        }
        assert_eq!(s.session.matched_pairs, 1);
        assert_eq!(s.session.combo, 1);
    }

    #[test]
    fn mismatch_hides_both_cards() {
        let mut s = state();
        new_run(&mut s);
        let (p, _) = ids_of(&s, "Punch");
        let (k, _) = ids_of(&s, "Kick");
        attempt(&mut s, p, k);
        for id in [p, k] {
            let c = s.session.card(id).unwrap();
            assert!(!c.flipped && !c.matched);
        }
    }

    #[test]
    fn mismatch_and_match_cues() {
        let mut s = state();
        new_run(&mut s);
        let (p1, p2) = ids_of(&s, "Punch");
        let (k, _) = ids_of(&s, "Kick");
        s.drain_cues();
        attempt(&mut s, p1, k);
        tick(&mut s, LUNGE_TICKS);
        assert_eq!(
            s.drain_cues(),
            vec![
                SoundCue::Flip,
                SoundCue::Flip,
                SoundCue::Mismatch,
                SoundCue::EnemyAttack,
                SoundCue::PlayerHit,
            ]
        );
        attempt(&mut s, p1, p2);
        tick(&mut s, LUNGE_TICKS);
        assert_eq!(
            s.drain_cues(),
            vec![
                SoundCue::Flip,
                SoundCue::Flip,
                SoundCue::Match(1),
                SoundCue::PlayerAttack,
                SoundCue::EnemyHit,
            ]
        );
    }

    #[test]
    fn combo_banner_shown_from_second_match() {
        let mut s = state();
        s.progress.unlocked = 3;
        open_level_select(&mut s);
        start_level(&mut s, 2);
        match_word(&mut s, "Fire");
        assert!(!s.session.effects.combo_banner.is_armed());
        s.drain_cues();
        match_word(&mut s, "Ice");
        assert!(s.session.effects.combo_banner.is_armed());
        assert!(s.cues.contains(&SoundCue::Combo(2)));
        tick(&mut s, COMBO_BANNER_TICKS);
        assert!(!s.session.effects.combo_banner.is_armed());
    }

    #[test]
    fn level_one_walkthrough() {
        let mut s = state();
        new_run(&mut s);
        let (p1, p2) = ids_of(&s, "Punch");
        let (k1, k2) = ids_of(&s, "Kick");

        attempt(&mut s, p1, k1);
        assert_eq!(s.session.player_hp, 90);
        assert_eq!(s.session.mistakes, 1);
        assert_eq!(s.session.combo, 0);

        attempt(&mut s, p1, p2);
        assert_eq!(s.session.enemy_hp, 20);
        assert_eq!(s.session.combo, 1);

        attempt(&mut s, k1, k2);
        assert_eq!(s.session.combo, 2);
        assert_eq!(s.session.last_damage, 25);
        assert_eq!(s.session.enemy_hp, 0);
        assert_eq!(s.screen, Screen::Victory);
        assert_eq!(s.progress.unlocked, 2);

        tick(&mut s, ADVANCE_TICKS - 1);
        assert_eq!(s.screen, Screen::Victory);
        tick(&mut s, 1);
        assert_eq!(s.screen, Screen::Playing);
        assert_eq!(s.session.level, 1);
        assert_eq!(s.session.enemy_hp, 60);
        assert_eq!(s.session.player_hp, MAX_PLAYER_HP);
        assert_eq!(s.session.cards.len(), 6);
        assert_eq!(s.session.combo, 0);
        assert_eq!(s.session.matched_pairs, 0);
        // the run's mistakes carry over into the next level
        assert_eq!(s.session.mistakes, 1);
    }

    #[test]
    fn defeat_wins_simultaneous_knockout() {
        let mut s = state();
        new_run(&mut s);
        s.session.player_hp = 0;
        s.session.enemy_hp = 0;
        check_outcome(&mut s);
        assert_eq!(s.screen, Screen::Defeat);
        assert!(s.cues.contains(&SoundCue::Defeat));
        assert!(!s.cues.contains(&SoundCue::Victory));
    }

    #[test]
    fn repeated_mismatches_lead_to_defeat() {
        let mut s = state();
        new_run(&mut s);
        let (p, _) = ids_of(&s, "Punch");
        let (k, _) = ids_of(&s, "Kick");
        for _ in 0..10 {
            attempt(&mut s, p, k);
        }
        assert_eq!(s.session.player_hp, 0);
        assert_eq!(s.screen, Screen::Defeat);
        assert!(!flip_card(&mut s, p));
    }

    #[test]
    fn killing_blow_still_lands_on_defeat_screen() {
        let mut s = state();
        new_run(&mut s);
        s.session.player_hp = s.session.level_def().enemy_damage;
        let (p, _) = ids_of(&s, "Punch");
        let (k, _) = ids_of(&s, "Kick");
        attempt(&mut s, p, k);
        assert_eq!(s.screen, Screen::Defeat);
        tick(&mut s, LUNGE_TICKS);
        assert_eq!(
            s.drain_cues(),
            vec![
                SoundCue::ResumeAudio,
                SoundCue::Flip,
                SoundCue::Flip,
                SoundCue::Mismatch,
                SoundCue::EnemyAttack,
                SoundCue::Defeat,
                SoundCue::PlayerHit,
            ]
        );
        assert!(s.session.effects.player_hit.is_armed());
        // retry starts from a clean slate
        assert!(retry_level(&mut s));
        assert!(!s.session.effects.player_hit.is_armed());
    }

    #[test]
    fn retry_after_defeat_restarts_same_level() {
        let mut s = state();
        s.progress.unlocked = 2;
        open_level_select(&mut s);
        start_level(&mut s, 1);
        s.session.player_hp = 0;
        check_outcome(&mut s);
        assert!(!restart_level(&mut s));
        assert!(retry_level(&mut s));
        assert_eq!(s.screen, Screen::Playing);
        assert_eq!(s.session.level, 1);
        assert_eq!(s.session.player_hp, MAX_PLAYER_HP);
    }

    #[test]
    fn elapsed_time_only_counts_while_playing() {
        let mut s = state();
        tick(&mut s, 50);
        new_run(&mut s);
        assert_eq!(s.session.elapsed_secs, 0);
        tick(&mut s, TICKS_PER_SEC * 3);
        assert_eq!(s.session.elapsed_secs, 3);
        go_to_menu(&mut s);
        tick(&mut s, TICKS_PER_SEC * 5);
        assert_eq!(s.session.elapsed_secs, 3);
    }

    #[test]
    fn auto_advance_keeps_whole_seconds_and_drops_partial_one() {
        let mut s = state();
        new_run(&mut s);
        tick(&mut s, TICKS_PER_SEC * 2 + 3);
        clear_level(&mut s);
        assert_eq!(s.screen, Screen::Victory);
        let secs = s.session.elapsed_secs;
        let partial = s.session.timers.second_ticks;
        assert!(partial > 0);
        tick(&mut s, ADVANCE_TICKS);
        assert_eq!(s.session.level, 1);
        assert_eq!(s.session.elapsed_secs, secs);
        assert_eq!(s.session.timers.second_ticks, 0);
        // the next second needs a full TICKS_PER_SEC on the new level
        tick(&mut s, TICKS_PER_SEC - 1);
        assert_eq!(s.session.elapsed_secs, secs);
        tick(&mut s, 1);
        assert_eq!(s.session.elapsed_secs, secs + 1);
    }

    #[test]
    fn elapsed_time_paused_on_victory_screen() {
        let mut s = state();
        new_run(&mut s);
        clear_level(&mut s);
        assert_eq!(s.screen, Screen::Victory);
        let before = s.session.elapsed_secs;
        tick(&mut s, ADVANCE_TICKS - 1);
        assert_eq!(s.session.elapsed_secs, before);
    }

    // ── progression ─────────────────────────────────────────

    #[test]
    fn full_run_reaches_champion() {
        let mut s = state();
        new_run(&mut s);
        for _ in 0..LEVEL_COUNT {
            clear_level(&mut s);
            assert_eq!(s.screen, Screen::Victory);
            tick(&mut s, ADVANCE_TICKS);
        }
        assert_eq!(s.screen, Screen::Champion);
        assert_eq!(s.progress.unlocked, LEVEL_COUNT);
        assert_eq!(s.progress.high_scores.len(), 1);
        assert_eq!(s.progress.high_scores[0].date, "1/2/2026");
        assert!(s.is_new_high_score);
        assert!(s.progress_dirty);
        assert!(s.cues.contains(&SoundCue::Champion));
    }

    #[test]
    fn champion_scenario_new_best() {
        let mut s = state();
        s.progress.unlocked = 5;
        s.progress.high_scores = vec![score(130, 2)];
        open_level_select(&mut s);
        start_level(&mut s, 4);
        clear_level(&mut s);
        assert_eq!(s.screen, Screen::Victory);
        s.session.elapsed_secs = 120;
        s.session.mistakes = 3;
        tick(&mut s, ADVANCE_TICKS);
        assert_eq!(s.screen, Screen::Champion);
        assert!(s.is_new_high_score);
        assert_eq!(s.progress.high_scores[0].time, 120);
        assert_eq!(s.progress.high_scores[0].mistakes, 3);
        assert_eq!(s.progress.unlocked, 5);
    }

    #[test]
    fn champion_then_play_again() {
        let mut s = state();
        s.screen = Screen::Champion;
        s.is_new_high_score = true;
        assert!(new_run(&mut s));
        assert_eq!(s.session.level, 0);
        assert!(!s.is_new_high_score);
    }

    #[test]
    fn replaying_early_level_never_lowers_unlock() {
        let mut s = state();
        s.progress.unlocked = 4;
        open_level_select(&mut s);
        start_level(&mut s, 0);
        clear_level(&mut s);
        assert_eq!(s.progress.unlocked, 4);
        tick(&mut s, ADVANCE_TICKS);
        assert_eq!(s.progress.unlocked, 4);
        assert!(!s.progress_dirty);
    }

    #[test]
    fn level_lookup_stays_in_range() {
        assert!(LEVELS.iter().all(|l| l.enemy_hp > 0));
        let mut s = state();
        assert!(!enter_level(&mut s, LEVEL_COUNT, false));
        assert_eq!(s.screen, Screen::Start);
    }
}
