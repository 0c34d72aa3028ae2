//! Static level and enemy tables.

use crate::time::ms_to_ticks;

pub const MAX_PLAYER_HP: u32 = 100;

/// Number of completed runs kept in the best-runs table.
pub const HIGH_SCORE_LIMIT: usize = 5;

/// Delay between revealing the second card and resolving the attempt.
pub const RESOLVE_TICKS: u32 = ms_to_ticks(800);
/// Victory screen duration before the next level (or champion screen).
pub const ADVANCE_TICKS: u32 = ms_to_ticks(2000);
/// How long the combo banner stays up.
pub const COMBO_BANNER_TICKS: u32 = ms_to_ticks(1000);
/// Attack lunge, after which the defender's hit flash starts.
pub const LUNGE_TICKS: u32 = ms_to_ticks(200);
pub const HIT_FLASH_TICKS: u32 = ms_to_ticks(300);

pub struct EnemyProfile {
    pub glyph: &'static str,
    pub name: &'static str,
    /// Theme key, used to pick the enemy's colour.
    pub theme: &'static str,
    /// Flavour only; abilities have no mechanical effect.
    pub ability: &'static str,
    pub ability_description: &'static str,
}

pub struct LevelDef {
    /// 1-based level number shown to the player.
    pub number: usize,
    pub name: &'static str,
    pub pairs: usize,
    pub words: &'static [&'static str],
    pub enemy_hp: u32,
    /// Damage the enemy deals to the player on a mismatch.
    pub enemy_damage: u32,
    /// Base damage the player deals on a match, before the combo multiplier.
    pub player_damage: u32,
    pub enemy: &'static EnemyProfile,
}

pub static ENEMIES: [EnemyProfile; 5] = [
    EnemyProfile {
        glyph: "🐺",
        name: "Wolf",
        theme: "enemy-wolf",
        ability: "pack",
        ability_description: "Weak but quick attacks",
    },
    EnemyProfile {
        glyph: "🧟",
        name: "Zombie",
        theme: "enemy-zombie",
        ability: "poison",
        ability_description: "Slow but deals poison damage",
    },
    EnemyProfile {
        glyph: "🦇",
        name: "Vampire",
        theme: "enemy-vampire",
        ability: "drain",
        ability_description: "Steals health on hit",
    },
    EnemyProfile {
        glyph: "💀",
        name: "Skeleton",
        theme: "enemy-skeleton",
        ability: "curse",
        ability_description: "Reduces your damage",
    },
    EnemyProfile {
        glyph: "🐲",
        name: "Dragon Lord",
        theme: "enemy-dragon",
        ability: "fire",
        ability_description: "Ultimate power!",
    },
];

pub const LEVEL_COUNT: usize = 5;

pub static LEVELS: [LevelDef; LEVEL_COUNT] = [
    LevelDef {
        number: 1,
        name: "Forest",
        pairs: 2,
        words: &["Punch", "Kick"],
        enemy_hp: 40,
        enemy_damage: 10,
        player_damage: 20,
        enemy: &ENEMIES[0],
    },
    LevelDef {
        number: 2,
        name: "Graveyard",
        pairs: 3,
        words: &["Sword", "Bow", "Axe"],
        enemy_hp: 60,
        enemy_damage: 12,
        player_damage: 20,
        enemy: &ENEMIES[1],
    },
    LevelDef {
        number: 3,
        name: "Castle",
        pairs: 4,
        words: &["Fire", "Ice", "Dark", "Light"],
        enemy_hp: 80,
        enemy_damage: 15,
        player_damage: 20,
        enemy: &ENEMIES[2],
    },
    LevelDef {
        number: 4,
        name: "Dungeon",
        pairs: 6,
        words: &["Thunder", "Wind", "Earth", "Water", "Shadow", "Holy"],
        enemy_hp: 100,
        enemy_damage: 20,
        player_damage: 17,
        enemy: &ENEMIES[3],
    },
    LevelDef {
        number: 5,
        name: "Dragon Lair",
        pairs: 8,
        words: &[
            "Dragon", "Phoenix", "Titan", "Demon", "Angel", "Reaper", "Storm", "Chaos",
        ],
        enemy_hp: 150,
        enemy_damage: 25,
        player_damage: 19,
        enemy: &ENEMIES[4],
    },
];

/// Bounds-checked level lookup by 0-based index.
pub fn level(index: usize) -> Option<&'static LevelDef> {
    LEVELS.get(index)
}
