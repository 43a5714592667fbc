use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tokio::sync::mpsc::UnboundedSender;

use crate::app::{App, FocusPane, InputMode};
use crate::tui::AppEvent;

/// Convert a character index to a byte index for UTF-8 safe string operations
fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

pub fn handle_event(app: &mut App, event: AppEvent, tx: &UnboundedSender<AppEvent>) -> Result<()> {
    match event {
        AppEvent::Key(key) => handle_key(app, key, tx),
        AppEvent::Resize(_, _) => {}
        AppEvent::Tick => {
            app.tick_animation();
        }
        AppEvent::Turn(turn_event) => {
            app.on_turn_event(turn_event);
        }
        AppEvent::Assistants(result) => {
            app.on_assistants(result, tx);
        }
        AppEvent::Components {
            assistant_id,
            result,
        } => {
            app.on_components(&assistant_id, result);
        }
    }
    Ok(())
}

fn handle_key(app: &mut App, key: KeyEvent, tx: &UnboundedSender<AppEvent>) {
    // Global keys that work in any mode
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    match app.input_mode {
        InputMode::Normal => handle_normal_mode(app, key, tx),
        InputMode::Editing => handle_editing_mode(app, key, tx),
    }
}

fn handle_normal_mode(app: &mut App, key: KeyEvent, tx: &UnboundedSender<AppEvent>) {
    match key.code {
        KeyCode::Char('q') => app.should_quit = true,

        // Cycle focus between panes
        KeyCode::Tab => {
            app.focus = match app.focus {
                FocusPane::Assistants => FocusPane::Chat,
                FocusPane::Chat => FocusPane::Input,
                FocusPane::Input => FocusPane::Assistants,
            };
        }

        KeyCode::Char('j') | KeyCode::Down => match app.focus {
            FocusPane::Assistants => app.assistant_nav_down(),
            _ => app.scroll_chat_down(),
        },
        KeyCode::Char('k') | KeyCode::Up => match app.focus {
            FocusPane::Assistants => app.assistant_nav_up(),
            _ => app.scroll_chat_up(),
        },

        // Activate the highlighted assistant, or start typing when the
        // input pane has focus
        KeyCode::Enter => match app.focus {
            FocusPane::Assistants => {
                if let Some(index) = app.assistant_state.selected() {
                    app.select_assistant(index, tx);
                }
            }
            FocusPane::Input => app.input_mode = InputMode::Editing,
            FocusPane::Chat => {}
        },

        KeyCode::Char('i') => {
            app.focus = FocusPane::Input;
            app.input_mode = InputMode::Editing;
        }

        // Toggle the components detail panel
        KeyCode::Char('x') => app.show_components = !app.show_components,

        // Refresh the assistant directory
        KeyCode::Char('r') => app.refresh_assistants(tx),

        // Abort an in-flight response, or dismiss a banner
        KeyCode::Esc => {
            if app.controller.is_loading() {
                app.cancel_turn();
            } else {
                app.controller.clear_error();
                app.directory.error = None;
            }
        }

        _ => {}
    }
}

fn handle_editing_mode(app: &mut App, key: KeyEvent, tx: &UnboundedSender<AppEvent>) {
    match key.code {
        KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Enter => {
            app.submit(tx);
        }
        KeyCode::Backspace => {
            if app.input_cursor > 0 {
                app.input_cursor -= 1;
                let byte_pos = char_to_byte_index(&app.controller.input, app.input_cursor);
                app.controller.input.remove(byte_pos);
            }
        }
        KeyCode::Delete => {
            let char_count = app.controller.input.chars().count();
            if app.input_cursor < char_count {
                let byte_pos = char_to_byte_index(&app.controller.input, app.input_cursor);
                app.controller.input.remove(byte_pos);
            }
        }
        KeyCode::Left => {
            app.input_cursor = app.input_cursor.saturating_sub(1);
        }
        KeyCode::Right => {
            let char_count = app.controller.input.chars().count();
            app.input_cursor = (app.input_cursor + 1).min(char_count);
        }
        KeyCode::Home => {
            app.input_cursor = 0;
        }
        KeyCode::End => {
            app.input_cursor = app.controller.input.chars().count();
        }
        KeyCode::Char(c) => {
            let byte_pos = char_to_byte_index(&app.controller.input, app.input_cursor);
            app.controller.input.insert(byte_pos, c);
            app.input_cursor += 1;
        }
        _ => {}
    }
}
