mod clock;
mod console;
mod input;
mod miner;
mod time;
mod widgets;

use std::{cell::RefCell, io, rc::Rc};

use clock::HostClock;
use input::{pixel_x_to_col, pixel_y_to_row, ClickState, InputEvent};
use miner::save::Storage;
use miner::store::MinerStore;
use miner::MinerGame;
use ratzilla::event::{KeyCode, MouseButton, MouseEventKind};
use ratzilla::ratatui::Terminal;
use ratzilla::{DomBackend, WebRenderer};
use time::PollTimer;

/// Pending coins refresh and auto-collect run once per interval.
const POLL_INTERVAL_MS: u32 = 1_000;

/// Convert page coordinates to a terminal cell using the grid container's
/// bounding rect.
fn dom_pixel_to_cell(mouse_x: u32, mouse_y: u32, cs: &ClickState) -> Option<(u16, u16)> {
    let document = web_sys::window()?.document()?;

    // DomBackend renders the grid into a <div> directly under <body>.
    let grid = document.query_selector("body > div").ok()??;
    let rect = grid.get_bounding_client_rect();

    let col = pixel_x_to_col(mouse_x as f64 - rect.left(), rect.width(), cs.terminal_cols)?;
    let row = pixel_y_to_row(mouse_y as f64 - rect.top(), rect.height(), cs.terminal_rows)?;
    Some((col, row))
}

/// Monotonic frame timestamp in milliseconds.
fn frame_time_ms() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}

#[cfg(target_arch = "wasm32")]
fn host_storage() -> Box<dyn Storage> {
    Box::new(miner::save::LocalStorage)
}

#[cfg(not(target_arch = "wasm32"))]
fn host_storage() -> Box<dyn Storage> {
    Box::new(miner::save::MemoryStorage::default())
}

fn main() -> io::Result<()> {
    console_error_panic_hook::set_once();

    let mut store = MinerStore::load(HostClock::default(), host_storage());
    if store.is_initialized() {
        console::log("save restored");
    } else {
        store.initialize(None);
        console::log(&format!("new player, referral code {}", store.user().referral_code));
    }

    let game = Rc::new(RefCell::new(MinerGame::new(store)));
    let click_state = Rc::new(RefCell::new(ClickState::new()));
    let timer = Rc::new(RefCell::new(PollTimer::new(POLL_INTERVAL_MS)));

    let backend = DomBackend::new()?;
    let terminal = Terminal::new(backend)?;

    terminal.on_mouse_event({
        let game = game.clone();
        let click_state = click_state.clone();
        move |mouse_event| {
            if mouse_event.event != MouseEventKind::Pressed
                || mouse_event.button != MouseButton::Left
            {
                return;
            }

            let action = {
                let cs = click_state.borrow();
                if cs.terminal_rows == 0 || cs.terminal_cols == 0 {
                    return;
                }
                dom_pixel_to_cell(mouse_event.x, mouse_event.y, &cs)
                    .and_then(|(col, row)| cs.hit_test(col, row))
            };

            if let Some(action) = action {
                game.borrow_mut().handle_input(&InputEvent::Click(action));
            }
        }
    });

    terminal.on_key_event({
        let game = game.clone();
        move |key_event| {
            if let KeyCode::Char(c) = key_event.code {
                game.borrow_mut()
                    .handle_input(&InputEvent::Key(c.to_ascii_lowercase()));
            }
        }
    });

    terminal.draw_web(move |f| {
        let polls = timer.borrow_mut().update(frame_time_ms());
        let mut game = game.borrow_mut();
        game.tick(polls);

        let size = f.area();
        {
            let mut cs = click_state.borrow_mut();
            cs.terminal_cols = size.width;
            cs.terminal_rows = size.height;
            cs.clear_targets();
        }

        game.render(f, size, &click_state);
    });

    Ok(())
}
