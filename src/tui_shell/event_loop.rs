use std::io;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::gesture::{PointerButton, PointerEvent, PointerTarget};

use super::app::App;
use super::{grid, render};

pub(super) fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    loop {
        terminal.draw(|f| render::draw(f, app)).context("draw")?;
        if app.quit {
            return Ok(());
        }

        if event::poll(Duration::from_millis(50)).context("poll")? {
            match event::read().context("read event")? {
                Event::Key(k) if k.kind == KeyEventKind::Press => handle_key(app, k),
                Event::Mouse(m) => handle_mouse(app, m),
                _ => {}
            }
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    if app.selector.is_some() {
        handle_selector_key(app, key);
        return;
    }

    match key.code {
        KeyCode::Char('q') => {
            app.quit = true;
        }
        KeyCode::Esc => {
            if app.last_error.is_some() {
                app.last_error = None;
            } else {
                app.quit = true;
            }
        }
        KeyCode::Char('a') => app.open_selector(),
        KeyCode::Char('r') => app.refresh(),
        KeyCode::Char('[') => app.change_date(-1),
        KeyCode::Char(']') => app.change_date(1),
        _ => {}
    }
}

fn handle_selector_key(app: &mut App, key: KeyEvent) {
    let Some(selector) = app.selector.as_mut() else {
        return;
    };
    match key.code {
        KeyCode::Esc => {
            app.selector = None;
        }
        KeyCode::Up => {
            selector.selected = selector.selected.saturating_sub(1);
        }
        KeyCode::Down => {
            selector.selected = (selector.selected + 1).min(selector.items.len().saturating_sub(1));
        }
        KeyCode::Enter => app.pick_selected_activity(),
        _ => {}
    }
}

fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    // The selector modal owns the screen while it is up.
    if app.selector.is_some() {
        return;
    }

    let target = app
        .grid_area
        .and_then(|area| grid::slot_at(area, mouse.column, mouse.row))
        .map(PointerTarget::Slot)
        .unwrap_or(PointerTarget::Outside);

    let pointer = match mouse.kind {
        MouseEventKind::Down(button) => PointerEvent::Press {
            button: button_of(button),
            target,
        },
        MouseEventKind::Drag(button) => PointerEvent::Move {
            button: Some(button_of(button)),
            target,
        },
        MouseEventKind::Moved => PointerEvent::Move {
            button: None,
            target,
        },
        MouseEventKind::Up(button) => PointerEvent::Release {
            button: button_of(button),
        },
        _ => return,
    };

    let activity = app.current_activity.clone();
    if let Some(pending) = app.gesture.on_pointer(pointer, &mut app.sheet, &activity) {
        app.finish_gesture(pending);
    }
}

fn button_of(button: MouseButton) -> PointerButton {
    match button {
        MouseButton::Left => PointerButton::Primary,
        _ => PointerButton::Secondary,
    }
}
