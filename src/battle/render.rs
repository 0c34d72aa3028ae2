//! Battle Card Matcher rendering: one full-screen view per [`Screen`].
//!
//! The board is header (menu / level badge / restart), arena (health bars,
//! sprites, combo banner), card grid and footer (stats + latest log line).
//! Menus and result screens are centred panels built with [`ClickableList`].

use std::cell::RefCell;
use std::rc::Rc;

use ratzilla::ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratzilla::ratatui::style::{Color, Modifier, Style};
use ratzilla::ratatui::text::{Line, Span};
use ratzilla::ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratzilla::ratatui::Frame;

use crate::input::{is_narrow_layout, ClickState};
use crate::widgets::{fit_columns, grid_cells, ClickableList};

use super::actions::*;
use super::cards::{card_art, Card};
use super::levels::{LEVELS, LEVEL_COUNT, MAX_PLAYER_HP};
use super::logic::format_time;
use super::state::{BattleState, Screen, Session};

const PLAYER_GLYPH: &str = "🥷";
/// Card cells taller than this only add empty space.
const MAX_CARD_HEIGHT: u16 = 5;
/// Room for the one-line card form ("a ?").
const MIN_CARD_WIDTH: u16 = 3;

pub fn render(
    state: &BattleState,
    f: &mut Frame,
    area: Rect,
    click_state: &Rc<RefCell<ClickState>>,
) {
    match state.screen {
        Screen::Start => render_start(state, f, area, click_state),
        Screen::LevelSelect => render_level_select(state, f, area, click_state),
        Screen::Playing => render_board(state, f, area, click_state),
        Screen::Victory => render_victory(state, f, area, click_state),
        Screen::Defeat => render_defeat(state, f, area, click_state),
        Screen::Champion => render_champion(state, f, area, click_state),
    }
}

// ── Helpers ─────────────────────────────────────────────────

/// Health bar text and colour: red at 25% or less, yellow at 50% or less.
fn hp_bar(current: u32, max: u32, width: usize) -> (String, Color) {
    let ratio = if max > 0 { current as f64 / max as f64 } else { 0.0 };
    let filled = ((ratio * width as f64).round() as usize).min(width);
    let bar = "\u{2588}".repeat(filled) + &"\u{2591}".repeat(width - filled);
    let color = if ratio > 0.5 {
        Color::Green
    } else if ratio > 0.25 {
        Color::Yellow
    } else {
        Color::Red
    };
    (bar, color)
}

fn borders_for(area_width: u16) -> Borders {
    if is_narrow_layout(area_width) {
        Borders::TOP | Borders::BOTTOM
    } else {
        Borders::ALL
    }
}

/// Board columns for a card count.
fn grid_columns(card_count: usize, narrow: bool) -> u16 {
    match card_count {
        0..=4 => 2,
        5..=6 => 3,
        7..=8 => 4,
        9..=12 if narrow => 4,
        9..=12 => 6,
        _ if narrow => 4,
        _ => 8,
    }
}

fn theme_color(theme: &str) -> Color {
    match theme {
        "enemy-wolf" => Color::Gray,
        "enemy-zombie" => Color::Green,
        "enemy-vampire" => Color::Magenta,
        "enemy-skeleton" => Color::White,
        "enemy-dragon" => Color::Red,
        _ => Color::Cyan,
    }
}

/// Keyboard letter for a grid position.
fn card_key(pos: usize) -> char {
    (b'a' + pos as u8) as char
}

/// Combo banner text, with the bonus over base damage when there is one.
fn combo_banner(session: &Session) -> Option<String> {
    if !session.effects.combo_banner.is_armed() || session.combo < 2 {
        return None;
    }
    let base = session.level_def().player_damage;
    let mut text = format!("🔥 {}x Combo!", session.combo);
    if session.last_damage > base {
        text.push_str(&format!(" +{} dmg", session.last_damage - base));
    }
    Some(text)
}

/// Draw a bordered panel of lines and register its click targets.
fn render_panel(
    f: &mut Frame,
    area: Rect,
    mut cl: ClickableList,
    border_color: Color,
    title: &str,
    click_state: &Rc<RefCell<ClickState>>,
) {
    let block = Block::default()
        .borders(borders_for(area.width))
        .border_style(Style::default().fg(border_color))
        .title(Span::styled(title.to_string(), Style::default().fg(border_color)));
    let inner = block.inner(area);
    cl.center_vertically(inner.height);

    let top = inner.y.saturating_sub(area.y);
    let bottom = (area.y + area.height).saturating_sub(inner.y + inner.height);
    let mut cs = click_state.borrow_mut();
    cl.register_targets(area, &mut cs, top, bottom, 0, inner.width);
    drop(cs);

    f.render_widget(
        Paragraph::new(cl.into_lines())
            .block(block)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: false }),
        area,
    );
}

// ── Start ───────────────────────────────────────────────────

fn render_start(
    state: &BattleState,
    f: &mut Frame,
    area: Rect,
    click_state: &Rc<RefCell<ClickState>>,
) {
    let bold = Modifier::BOLD;
    let mut cl = ClickableList::new();
    cl.push(Line::from(Span::styled(
        "BATTLE CARD",
        Style::default().fg(Color::White).add_modifier(bold),
    )));
    cl.push(Line::from(Span::styled(
        "MATCHER",
        Style::default().fg(Color::Red).add_modifier(bold),
    )));
    cl.push(Line::from(""));
    cl.push(Line::from(format!(
        "{}   ⚔   {}",
        PLAYER_GLYPH, LEVELS[LEVEL_COUNT - 1].enemy.glyph
    )));
    cl.push(Line::from(""));
    cl.push(Line::from(Span::styled(
        "Match the cards to attack! Wrong matches hurt you!",
        Style::default().fg(Color::Gray),
    )));
    cl.push(Line::from(""));
    cl.push_clickable(
        Line::from(Span::styled(
            "▶ [N] New Game",
            Style::default().fg(Color::Yellow).add_modifier(bold),
        )),
        NEW_GAME,
    );
    cl.push_clickable(
        Line::from(Span::styled("⚡ [L] Select Level", Style::default().fg(Color::Cyan))),
        OPEN_LEVEL_SELECT,
    );

    let scores = &state.progress.high_scores;
    if !scores.is_empty() {
        cl.push(Line::from(""));
        cl.push(Line::from(Span::styled(
            "🏆 Best Runs",
            Style::default().fg(Color::Yellow).add_modifier(bold),
        )));
        for (i, score) in scores.iter().take(3).enumerate() {
            let rank_color = if i == 0 { Color::Yellow } else { Color::DarkGray };
            cl.push(Line::from(vec![
                Span::styled(format!("#{} ", i + 1), Style::default().fg(rank_color)),
                Span::styled(format!("{}  ", score.date), Style::default().fg(Color::White)),
                Span::styled(
                    format!("⏱ {}  ", format_time(score.time)),
                    Style::default().fg(Color::Gray),
                ),
                Span::styled(format!("✗ {}", score.mistakes), Style::default().fg(Color::Red)),
            ]));
        }
    }

    render_panel(f, area, cl, Color::DarkGray, " Battle Card Matcher ", click_state);
}

// ── Level Select ────────────────────────────────────────────

fn render_level_select(
    state: &BattleState,
    f: &mut Frame,
    area: Rect,
    click_state: &Rc<RefCell<ClickState>>,
) {
    let mut cl = ClickableList::new();
    cl.push(Line::from(Span::styled(
        "SELECT LEVEL",
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
    )));

    for (i, def) in LEVELS.iter().enumerate() {
        cl.push(Line::from(""));
        if state.is_unlocked(i) {
            let id = LEVEL_BASE + i as u16;
            let color = theme_color(def.enemy.theme);
            cl.push_clickable(
                Line::from(vec![
                    Span::styled(format!("[{}] ", def.number), Style::default().fg(Color::Yellow)),
                    Span::styled(
                        format!("{} Level {}: {}", def.enemy.glyph, def.number, def.name),
                        Style::default().fg(color).add_modifier(Modifier::BOLD),
                    ),
                ]),
                id,
            );
            cl.push_clickable(
                Line::from(Span::styled(
                    format!("{} • {} pairs", def.enemy.name, def.pairs),
                    Style::default().fg(Color::White),
                )),
                id,
            );
            cl.push_clickable(
                Line::from(Span::styled(
                    format!("{} ({})", def.enemy.ability_description, def.enemy.ability),
                    Style::default().fg(Color::DarkGray),
                )),
                id,
            );
        } else {
            let dim = Style::default().fg(Color::DarkGray);
            cl.push(Line::from(Span::styled(
                format!("🔒 Level {}: {}", def.number, def.name),
                dim,
            )));
            cl.push(Line::from(Span::styled("Complete previous level to unlock", dim)));
        }
    }

    cl.push(Line::from(""));
    cl.push_clickable(
        Line::from(Span::styled("← [Q] Back", Style::default().fg(Color::Cyan))),
        MENU,
    );

    render_panel(f, area, cl, Color::DarkGray, " Select Level ", click_state);
}

// ── Board ───────────────────────────────────────────────────

fn render_board(
    state: &BattleState,
    f: &mut Frame,
    area: Rect,
    click_state: &Rc<RefCell<ClickState>>,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(6),
            Constraint::Min(4),
            Constraint::Length(4),
        ])
        .split(area);

    render_header(state, f, chunks[0], click_state);
    render_arena(state, f, chunks[1]);
    render_cards(state, f, chunks[2], click_state);
    render_footer(state, f, chunks[3]);
}

fn render_header(
    state: &BattleState,
    f: &mut Frame,
    area: Rect,
    click_state: &Rc<RefCell<ClickState>>,
) {
    let narrow = is_narrow_layout(area.width);
    let def = state.session.level_def();
    let block = Block::default()
        .borders(borders_for(area.width))
        .border_style(Style::default().fg(Color::DarkGray));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let (menu, restart, badge) = if narrow {
        ("[Q]", "[R]", format!("{} Lv{} {}", def.enemy.glyph, def.number, def.name))
    } else {
        (
            "[Q] Menu",
            "[R] Restart",
            format!("{} Level {}: {}", def.enemy.glyph, def.number, def.name),
        )
    };
    let button_w = Line::from(restart).width() as u16 + 1;
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(button_w),
            Constraint::Min(0),
            Constraint::Length(button_w),
        ])
        .split(inner);

    let button = Style::default().fg(Color::Cyan);
    f.render_widget(Paragraph::new(Span::styled(menu, button)), cols[0]);
    f.render_widget(
        Paragraph::new(Span::styled(
            badge,
            Style::default()
                .fg(theme_color(def.enemy.theme))
                .add_modifier(Modifier::BOLD),
        ))
        .alignment(Alignment::Center),
        cols[1],
    );
    f.render_widget(
        Paragraph::new(Span::styled(restart, button)).alignment(Alignment::Right),
        cols[2],
    );

    let mut cs = click_state.borrow_mut();
    cs.add_click_target(cols[0], MENU);
    cs.add_click_target(cols[2], RESTART);
}

fn render_arena(state: &BattleState, f: &mut Frame, area: Rect) {
    let session = &state.session;
    let def = session.level_def();
    let fx = &session.effects;
    let block = Block::default()
        .borders(borders_for(area.width))
        .border_style(Style::default().fg(Color::DarkGray));
    let inner = block.inner(area);

    // label + bar + " 100/100"
    let bar_w = (inner.width as usize).saturating_sub(22).clamp(4, 30);
    let label = |name: &str| format!("{:<12}", name.to_uppercase());

    let (player_bar, player_color) = hp_bar(session.player_hp, MAX_PLAYER_HP, bar_w);
    let (enemy_bar, enemy_color) = hp_bar(session.enemy_hp, def.enemy_hp, bar_w);

    let mut lines = vec![
        Line::from(vec![
            Span::styled("♥ ", Style::default().fg(Color::Red)),
            Span::styled(label("You"), Style::default().fg(Color::White)),
            Span::styled(player_bar, Style::default().fg(player_color)),
            Span::raw(format!(" {}/{}", session.player_hp, MAX_PLAYER_HP)),
        ]),
        Line::from(vec![
            Span::styled("♥ ", Style::default().fg(theme_color(def.enemy.theme))),
            Span::styled(label(def.enemy.name), Style::default().fg(Color::White)),
            Span::styled(enemy_bar, Style::default().fg(enemy_color)),
            Span::raw(format!(" {}/{}", session.enemy_hp, def.enemy_hp)),
        ]),
    ];

    // Sprites: a lunge shows as arrows toward the target, a hit as a burst.
    let hit = Style::default().fg(Color::Red).add_modifier(Modifier::BOLD);
    let mut sprites = vec![Span::styled(
        PLAYER_GLYPH,
        if fx.player_hit.is_armed() { hit } else { Style::default() },
    )];
    if fx.player_hit.is_armed() {
        sprites.push(Span::styled("💥", hit));
    }
    sprites.push(Span::styled(
        if fx.player_attacking.is_armed() { " ➤➤  " } else { "     " },
        Style::default().fg(Color::Yellow),
    ));
    sprites.push(Span::styled("⚔", Style::default().fg(Color::DarkGray)));
    sprites.push(Span::styled(
        if fx.enemy_attacking.is_armed() { "  ⬅⬅ " } else { "     " },
        Style::default().fg(theme_color(def.enemy.theme)),
    ));
    if fx.enemy_hit.is_armed() {
        sprites.push(Span::styled("💥", hit));
    }
    sprites.push(Span::styled(
        def.enemy.glyph,
        if fx.enemy_hit.is_armed() { hit } else { Style::default() },
    ));
    lines.push(Line::from(sprites).alignment(Alignment::Center));

    match combo_banner(session) {
        Some(text) => lines.push(
            Line::from(Span::styled(
                text,
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ))
            .alignment(Alignment::Center),
        ),
        None => lines.push(Line::from("")),
    }

    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_cards(
    state: &BattleState,
    f: &mut Frame,
    area: Rect,
    click_state: &Rc<RefCell<ClickState>>,
) {
    let cards = &state.session.cards;
    let block = Block::default()
        .borders(borders_for(area.width))
        .border_style(Style::default().fg(Color::DarkGray));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let cols = grid_columns(cards.len(), is_narrow_layout(area.width));
    let cols = fit_columns(inner, cards.len(), cols, MIN_CARD_WIDTH);
    let cells = grid_cells(inner, cards.len(), cols, MAX_CARD_HEIGHT);

    let mut cs = click_state.borrow_mut();
    for (pos, (card, cell)) in cards.iter().zip(cells).enumerate() {
        render_card(f, card, pos, cell);
        cs.add_click_target(cell, CARD_BASE + pos as u16);
    }
}

fn render_card(f: &mut Frame, card: &Card, pos: usize, cell: Rect) {
    let key = card_key(pos);
    let (color, face) = if card.matched {
        (Color::Green, Some(card))
    } else if card.flipped {
        (Color::Yellow, Some(card))
    } else {
        (Color::Blue, None)
    };
    let style = Style::default().fg(color);
    let art = |c: &Card| card_art(c.word).unwrap_or("");

    // Too short for a border: one line with the key letter.
    if cell.height < 3 {
        let text = match face {
            Some(c) => format!("{} {} {}", key, art(c), c.word),
            None => format!("{} ?", key),
        };
        f.render_widget(
            Paragraph::new(Span::styled(text, style)).alignment(Alignment::Center),
            cell,
        );
        return;
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(style)
        .title(Span::styled(key.to_string(), Style::default().fg(Color::DarkGray)));
    let inner_h = cell.height - 2;
    let lines: Vec<Line> = match face {
        Some(c) if inner_h >= 2 => vec![
            Line::from(art(c)),
            Line::from(Span::styled(c.word.to_uppercase(), style.add_modifier(Modifier::BOLD))),
        ],
        Some(c) => vec![Line::from(Span::styled(format!("{} {}", art(c), c.word), style))],
        None => vec![Line::from(Span::styled("?", style.add_modifier(Modifier::BOLD)))],
    };
    // Centre the face vertically inside the card.
    let mut padded = vec![Line::from(""); (inner_h as usize).saturating_sub(lines.len()) / 2];
    padded.extend(lines);

    f.render_widget(
        Paragraph::new(padded).block(block).alignment(Alignment::Center),
        cell,
    );
}

fn render_footer(state: &BattleState, f: &mut Frame, area: Rect) {
    let session = &state.session;
    let def = session.level_def();
    let block = Block::default()
        .borders(borders_for(area.width))
        .border_style(Style::default().fg(Color::DarkGray));

    let mut stats = vec![Span::styled(
        format!("Pairs: {} / {}   ", session.matched_pairs, def.pairs),
        Style::default().fg(Color::Gray),
    )];
    if session.combo >= 2 {
        stats.push(Span::styled(
            format!("🔥 {}x   ", session.combo),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ));
    }
    stats.push(Span::styled(
        format!("⏱ {}   ", format_time(session.elapsed_secs)),
        Style::default().fg(Color::Gray),
    ));
    stats.push(Span::styled(
        format!("✗ {}", session.mistakes),
        Style::default().fg(Color::Red),
    ));

    let last_log = state.log.last().map(String::as_str).unwrap_or("");
    let lines = vec![
        Line::from(stats).alignment(Alignment::Center),
        Line::from(Span::styled(
            format!("> {}", last_log),
            Style::default().fg(Color::DarkGray),
        )),
    ];
    f.render_widget(Paragraph::new(lines).block(block), area);
}

// ── Result screens ──────────────────────────────────────────

fn render_victory(
    state: &BattleState,
    f: &mut Frame,
    area: Rect,
    click_state: &Rc<RefCell<ClickState>>,
) {
    let session = &state.session;
    let def = session.level_def();
    let mut cl = ClickableList::new();
    cl.push(Line::from("🏆"));
    cl.push(Line::from(Span::styled(
        "VICTORY!",
        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
    )));
    cl.push(Line::from(""));
    cl.push(Line::from(Span::styled(
        format!("Level {} Complete", def.number),
        Style::default().fg(Color::Gray),
    )));
    let next = if def.number < LEVEL_COUNT {
        "Next level starting..."
    } else {
        "The last foe has fallen..."
    };
    cl.push(Line::from(Span::styled(next, Style::default().fg(Color::DarkGray))));
    cl.push(Line::from(""));
    cl.push(Line::from(Span::styled(
        format!(
            "⏱ {}   ✗ {}",
            format_time(session.elapsed_secs),
            session.mistakes
        ),
        Style::default().fg(Color::Gray),
    )));

    render_panel(f, area, cl, Color::Green, "", click_state);
}

fn render_defeat(
    state: &BattleState,
    f: &mut Frame,
    area: Rect,
    click_state: &Rc<RefCell<ClickState>>,
) {
    let def = state.session.level_def();
    let mut cl = ClickableList::new();
    cl.push(Line::from("🛡"));
    cl.push(Line::from(Span::styled(
        "DEFEATED!",
        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
    )));
    cl.push(Line::from(""));
    cl.push(Line::from(Span::styled(
        format!("{} defeated you at Level {}", def.enemy.name, def.number),
        Style::default().fg(Color::Gray),
    )));
    cl.push(Line::from(""));
    cl.push_clickable(
        Line::from(Span::styled(
            "↻ [R] Retry Level",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )),
        RETRY,
    );
    cl.push_clickable(
        Line::from(Span::styled("⌂ [Q] Main Menu", Style::default().fg(Color::Cyan))),
        MENU,
    );

    render_panel(f, area, cl, Color::Red, "", click_state);
}

fn render_champion(
    state: &BattleState,
    f: &mut Frame,
    area: Rect,
    click_state: &Rc<RefCell<ClickState>>,
) {
    let session = &state.session;
    let gold = Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD);
    let mut cl = ClickableList::new();
    cl.push(Line::from("👑"));
    cl.push(Line::from(Span::styled("CHAMPION!", gold)));
    if state.is_new_high_score {
        cl.push(Line::from(Span::styled("★ New Best Score! ★", gold)));
    }
    cl.push(Line::from(""));
    cl.push(Line::from(Span::styled(
        format!("You conquered all {} levels!", LEVEL_COUNT),
        Style::default().fg(Color::Yellow),
    )));
    cl.push(Line::from(""));
    cl.push(Line::from(vec![
        Span::styled("⏱ Time ", Style::default().fg(Color::Gray)),
        Span::styled(
            format_time(session.elapsed_secs),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ),
        Span::styled("   ✗ Mistakes ", Style::default().fg(Color::Gray)),
        Span::styled(
            session.mistakes.to_string(),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ),
    ]));
    cl.push(Line::from(""));
    cl.push_clickable(
        Line::from(Span::styled("⚡ [N] Play Again", gold)),
        NEW_GAME,
    );
    cl.push_clickable(
        Line::from(Span::styled("⌂ [Q] Main Menu", Style::default().fg(Color::Cyan))),
        MENU,
    );

    render_panel(f, area, cl, Color::Yellow, "", click_state);
}
