use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use crate::app::{App, Screen};
use crate::tui::AppEvent;

/// Convert a character index to a byte index for UTF-8 safe string operations
fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

pub fn handle_event(app: &mut App, event: AppEvent) {
    match event {
        AppEvent::Key(key) => handle_key(app, key),
        AppEvent::Resize(_, _) => {}
        AppEvent::Tick => app.tick_animation(),
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    // Global keys that work on any screen
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    match app.screen {
        Screen::Welcome => handle_welcome_key(app, key),
        Screen::Chat => handle_chat_key(app, key),
    }
}

fn handle_welcome_key(app: &mut App, key: KeyEvent) {
    match key.code {
        // Category tabs
        KeyCode::Tab | KeyCode::Right | KeyCode::Char('l') => app.next_section(),
        KeyCode::BackTab | KeyCode::Left | KeyCode::Char('h') => app.prev_section(),

        // Examples within the active category
        KeyCode::Down | KeyCode::Char('j') => app.example_down(),
        KeyCode::Up | KeyCode::Char('k') => app.example_up(),

        // Pick the highlighted example and start chatting
        KeyCode::Enter => app.dismiss_welcome(true),

        // Start chatting without a selection
        KeyCode::Esc | KeyCode::Char('s') => app.dismiss_welcome(false),

        KeyCode::Char('q') => app.should_quit = true,

        _ => {}
    }
}

fn handle_chat_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.should_quit = true,

        KeyCode::Enter => {
            if let Some(text) = app.begin_submit() {
                let agent = app.agent.clone();
                app.pending_reply = Some(tokio::spawn(async move {
                    agent.ask(&text).await
                }));
            }
        }

        // Conversation actions
        KeyCode::Char('l') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.clear_messages();
        }
        KeyCode::Char('t') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.toggle_dark_mode();
        }

        // Transcript scrolling
        KeyCode::Up => app.scroll_up(),
        KeyCode::Down => app.scroll_down(),
        KeyCode::PageUp => app.scroll_half_page_up(),
        KeyCode::PageDown => app.scroll_half_page_down(),

        // Input editing at the char cursor
        KeyCode::Backspace => {
            if app.cursor > 0 {
                app.cursor -= 1;
                let byte_pos = char_to_byte_index(&app.input, app.cursor);
                app.input.remove(byte_pos);
            }
        }
        KeyCode::Delete => {
            let char_count = app.input.chars().count();
            if app.cursor < char_count {
                let byte_pos = char_to_byte_index(&app.input, app.cursor);
                app.input.remove(byte_pos);
            }
        }
        KeyCode::Left => {
            app.cursor = app.cursor.saturating_sub(1);
        }
        KeyCode::Right => {
            let char_count = app.input.chars().count();
            app.cursor = (app.cursor + 1).min(char_count);
        }
        KeyCode::Home => {
            app.cursor = 0;
        }
        KeyCode::End => {
            app.cursor = app.input.chars().count();
        }
        KeyCode::Char(c) => {
            if key.modifiers.contains(KeyModifiers::CONTROL) {
                return;
            }
            let byte_pos = char_to_byte_index(&app.input, app.cursor);
            app.input.insert(byte_pos, c);
            app.cursor += 1;
        }

        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::{AgentClient, DEFAULT_API_URL};
    use crate::config::Config;
    use std::path::PathBuf;

    fn test_app() -> App {
        App::new(
            AgentClient::new(DEFAULT_API_URL),
            Config::default(),
            PathBuf::from("unused"),
        )
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    #[test]
    fn char_to_byte_index_handles_multibyte() {
        let s = "héllo";
        assert_eq!(char_to_byte_index(s, 0), 0);
        assert_eq!(char_to_byte_index(s, 1), 1);
        assert_eq!(char_to_byte_index(s, 2), 3);
        assert_eq!(char_to_byte_index(s, 5), s.len());
    }

    #[test]
    fn input_editing_is_utf8_safe() {
        let mut app = test_app();
        app.screen = Screen::Chat;

        for c in "café".chars() {
            handle_key(&mut app, press(KeyCode::Char(c)));
        }
        assert_eq!(app.input, "café");
        assert_eq!(app.cursor, 4);

        handle_key(&mut app, press(KeyCode::Backspace));
        assert_eq!(app.input, "caf");

        handle_key(&mut app, press(KeyCode::Home));
        handle_key(&mut app, press(KeyCode::Char('x')));
        assert_eq!(app.input, "xcaf");
        assert_eq!(app.cursor, 1);
    }

    #[test]
    fn ctrl_l_clears_the_thread() {
        let mut app = test_app();
        app.screen = Screen::Chat;
        app.input = "hi".to_string();
        app.begin_submit().unwrap();
        app.finish_submit(Ok("hello".to_string()));

        handle_key(&mut app, ctrl('l'));
        assert!(app.messages.is_empty());
    }

    #[test]
    fn ctrl_t_toggles_theme() {
        let mut app = test_app();
        app.screen = Screen::Chat;

        assert!(app.dark_mode);
        handle_key(&mut app, ctrl('t'));
        assert!(!app.dark_mode);
    }

    #[test]
    fn ctrl_c_quits_from_any_screen() {
        let mut app = test_app();
        handle_key(&mut app, ctrl('c'));
        assert!(app.should_quit);
    }

    #[tokio::test]
    async fn enter_on_blank_input_launches_nothing() {
        let mut app = test_app();
        app.screen = Screen::Chat;
        app.input = "   ".to_string();

        handle_key(&mut app, press(KeyCode::Enter));
        assert!(app.pending_reply.is_none());
        assert!(app.messages.is_empty());
    }

    #[tokio::test]
    async fn enter_submits_and_tracks_the_exchange() {
        let mut app = test_app();
        app.screen = Screen::Chat;
        app.input = "Show me all active customers".to_string();

        handle_key(&mut app, press(KeyCode::Enter));
        assert!(app.pending_reply.is_some());
        assert!(app.loading);
        assert_eq!(app.messages.len(), 1);

        if let Some(task) = app.pending_reply.take() {
            task.abort();
        }
    }

    #[test]
    fn welcome_enter_moves_to_chat() {
        let mut app = test_app();
        let dir = tempfile::tempdir().unwrap();
        app.config_path = dir.path().join("config.json");
        assert_eq!(app.screen, Screen::Welcome);

        handle_key(&mut app, press(KeyCode::Down));
        handle_key(&mut app, press(KeyCode::Enter));

        assert_eq!(app.screen, Screen::Chat);
        assert!(!app.input.is_empty());
    }
}
