mod battle;
mod input;
mod time;
mod widgets;

use std::{cell::RefCell, io, rc::Rc};

use ratzilla::event::{KeyCode, MouseButton, MouseEventKind};
use ratzilla::ratatui::Terminal;
use ratzilla::{DomBackend, WebRenderer};

use battle::sound::AudioPlayer;
use battle::BattleGame;
use input::{ClickState, InputEvent};
use time::GameTime;

/// Pointer position relative to the terminal grid, plus the grid's pixel size.
fn grid_relative(mouse_x: u32, mouse_y: u32) -> Option<(f64, f64, f64, f64)> {
    let document = web_sys::window()?.document()?;

    // DomBackend creates a <div> as the grid container inside <body>.
    let grid = document.query_selector("body > div").ok()??;
    let rect = grid.get_bounding_client_rect();

    Some((
        mouse_x as f64 - rect.left(),
        mouse_y as f64 - rect.top(),
        rect.width(),
        rect.height(),
    ))
}

fn now_ms() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map_or(0.0, |p| p.now())
}

fn main() -> io::Result<()> {
    console_error_panic_hook::set_once();

    let game = Rc::new(RefCell::new(BattleGame::new()));
    let click_state = Rc::new(RefCell::new(ClickState::new()));
    let audio = AudioPlayer::new();
    let backend = DomBackend::new()?;
    let terminal = Terminal::new(backend)?;

    // Mouse/touch click handler
    terminal.on_mouse_event({
        let game = game.clone();
        let click_state = click_state.clone();
        move |mouse_event| {
            if mouse_event.event != MouseEventKind::Pressed
                || mouse_event.button != MouseButton::Left
            {
                return;
            }
            let Some((x, y, width, height)) = grid_relative(mouse_event.x, mouse_event.y) else {
                return;
            };

            let hit = click_state.borrow().hit_test_pixels(x, y, width, height);
            if let Some(action_id) = hit {
                game.borrow_mut().handle_input(&InputEvent::Click(action_id));
            }
        }
    });

    // Keyboard handler
    terminal.on_key_event({
        let game = game.clone();
        move |key_event| {
            if let KeyCode::Char(c) = key_event.code {
                game.borrow_mut().handle_input(&InputEvent::Key(c));
            }
        }
    });

    let mut game_time = GameTime::new();
    terminal.draw_web(move |f| {
        let mut game = game.borrow_mut();

        let ticks = game_time.update(now_ms());
        if ticks > 0 {
            game.tick(ticks);
        }
        for cue in game.drain_cues() {
            audio.play(cue);
        }

        let area = f.area();
        click_state.borrow_mut().begin_frame(area);
        game.render(f, area, &click_state);
    });

    Ok(())
}
