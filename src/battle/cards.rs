//! Card set generation and the word → card art lookup.

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use super::levels::LevelDef;

#[derive(Clone, Debug, PartialEq)]
pub struct Card {
    pub id: usize,
    pub word: &'static str,
    pub flipped: bool,
    /// Matched cards stay face up for the rest of the level.
    pub matched: bool,
}

impl Card {
    /// Whether a click on this card may flip it.
    pub fn is_selectable(&self) -> bool {
        !self.flipped && !self.matched
    }
}

/// Build the level's deck: two cards per word (ids `2i` and `2i + 1`),
/// shuffled uniformly.
pub fn generate_cards(level: &LevelDef, rng: &mut ChaCha8Rng) -> Vec<Card> {
    let mut cards: Vec<Card> = level
        .words
        .iter()
        .enumerate()
        .flat_map(|(i, &word)| {
            [i * 2, i * 2 + 1].map(|id| Card {
                id,
                word,
                flipped: false,
                matched: false,
            })
        })
        .collect();
    cards.shuffle(rng);
    cards
}

/// Seed a fresh deck RNG. In the browser the seed comes from
/// `Math.random()`; native builds (tests) use a fixed seed.
pub fn seed_from_entropy() -> ChaCha8Rng {
    #[cfg(target_arch = "wasm32")]
    let seed = (js_sys::Math::random() * u64::MAX as f64) as u64;
    #[cfg(not(target_arch = "wasm32"))]
    let seed = 0x5EED_CA4D;
    ChaCha8Rng::seed_from_u64(seed)
}

/// Card face art for each known word. Unknown words have no art and are
/// rendered as plain text.
pub fn card_art(word: &str) -> Option<&'static str> {
    let art = match word {
        "Punch" => "👊",
        "Kick" => "🦶",
        "Sword" => "🗡",
        "Bow" => "🏹",
        "Axe" => "🪓",
        "Fire" => "🔥",
        "Ice" => "❄",
        "Dark" => "🌑",
        "Light" => "💡",
        "Thunder" => "⚡",
        "Wind" => "🌀",
        "Earth" => "⛰",
        "Water" => "💧",
        "Shadow" => "👤",
        "Holy" => "✨",
        "Dragon" => "🐉",
        "Phoenix" => "🐦",
        "Titan" => "🗿",
        "Demon" => "👹",
        "Angel" => "👼",
        "Reaper" => "💀",
        "Storm" => "⛈",
        "Chaos" => "🌪",
        _ => return None,
    };
    Some(art)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::levels::LEVELS;
    use std::collections::HashMap;

    fn rng(seed: u64) -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(seed)
    }

    #[test]
    fn deck_has_two_of_each_word() {
        for def in &LEVELS {
            let cards = generate_cards(def, &mut rng(7));
            assert_eq!(cards.len(), def.pairs * 2);
            let mut counts: HashMap<&str, usize> = HashMap::new();
            for c in &cards {
                *counts.entry(c.word).or_default() += 1;
            }
            assert_eq!(counts.len(), def.pairs);
            assert!(counts.values().all(|&n| n == 2));
        }
    }

    #[test]
    fn deck_ids_are_unique() {
        let cards = generate_cards(&LEVELS[4], &mut rng(1));
        let mut ids: Vec<usize> = cards.iter().map(|c| c.id).collect();
        ids.sort_unstable();
        assert_eq!(ids, (0..16).collect::<Vec<_>>());
    }

    #[test]
    fn fresh_cards_are_face_down() {
        let cards = generate_cards(&LEVELS[2], &mut rng(3));
        assert!(cards.iter().all(|c| !c.flipped && !c.matched && c.is_selectable()));
    }

    #[test]
    fn same_seed_same_order() {
        let a = generate_cards(&LEVELS[3], &mut rng(99));
        let b = generate_cards(&LEVELS[3], &mut rng(99));
        assert_eq!(a, b);
    }

    #[test]
    fn shuffle_reaches_every_arrangement_of_level_one() {
        // 4 cards of 2 words → 6 distinct word orders.
        let mut r = rng(2024);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..500 {
            let cards = generate_cards(&LEVELS[0], &mut r);
            seen.insert(cards.iter().map(|c| c.word).collect::<Vec<_>>());
        }
        assert_eq!(seen.len(), 6);
    }

    #[test]
    fn every_level_word_has_art() {
        for def in &LEVELS {
            for word in def.words {
                assert!(card_art(word).is_some(), "no art for {}", word);
            }
        }
    }

    #[test]
    fn unknown_word_has_no_art() {
        assert_eq!(card_art("Spoon"), None);
        assert_eq!(card_art("punch"), None);
    }
}
