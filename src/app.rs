use std::path::PathBuf;

use chrono::{DateTime, Local};
use ratatui::widgets::ListState;

use crate::agent::{AgentClient, FALLBACK_REPLY};
use crate::catalog;
use crate::config::Config;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Welcome,
    Chat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    User,
    Agent,
}

/// One entry in the conversation thread. Immutable once appended.
#[derive(Debug, Clone)]
pub struct Message {
    pub id: u64,
    pub content: String,
    pub timestamp: DateTime<Local>,
    pub sender: Sender,
}

pub struct App {
    // Core state
    pub should_quit: bool,
    pub screen: Screen,

    // Conversation state
    pub messages: Vec<Message>,
    next_message_id: u64,
    pub input: String,
    pub cursor: usize, // cursor position in input, in chars
    pub loading: bool,
    pub pending_reply: Option<tokio::task::JoinHandle<anyhow::Result<String>>>,

    // Presentation state
    pub dark_mode: bool,
    pub chat_scroll: u16,
    pub chat_height: u16, // Height of chat area for scroll calculations
    pub chat_width: u16,  // Width of chat area for wrap calculations
    pub animation_frame: u8, // 0-2 for ellipsis animation

    // Welcome overlay state
    pub section_idx: usize,
    pub example_state: ListState,

    // Wiring
    pub agent: AgentClient,
    pub config: Config,
    pub config_path: PathBuf,
}

impl App {
    pub fn new(agent: AgentClient, config: Config, config_path: PathBuf) -> Self {
        let screen = if config.seen_welcome {
            Screen::Chat
        } else {
            Screen::Welcome
        };

        let mut example_state = ListState::default();
        example_state.select(Some(0));

        Self {
            should_quit: false,
            screen,

            messages: Vec::new(),
            next_message_id: 0,
            input: String::new(),
            cursor: 0,
            loading: false,
            pending_reply: None,

            dark_mode: true,
            chat_scroll: 0,
            chat_height: 0,
            chat_width: 0,
            animation_frame: 0,

            section_idx: 0,
            example_state,

            agent,
            config,
            config_path,
        }
    }

    fn push_message(&mut self, content: String, sender: Sender) {
        let id = self.next_message_id;
        self.next_message_id += 1;
        self.messages.push(Message {
            id,
            content,
            timestamp: Local::now(),
            sender,
        });
    }

    /// Accept or reject a submit. Rejects when the input is blank or a
    /// request is already in flight. On accept: appends the user message,
    /// clears the input, sets the loading flag, and returns the text for
    /// the caller to launch against the backend.
    pub fn begin_submit(&mut self) -> Option<String> {
        if self.input.trim().is_empty() || self.loading {
            return None;
        }

        let text = self.input.clone();
        self.push_message(text.clone(), Sender::User);
        self.input.clear();
        self.cursor = 0;
        self.loading = true;
        self.scroll_chat_to_bottom();

        Some(text)
    }

    /// Complete an exchange. Success appends the agent's answer; failure
    /// appends the fixed apology and logs the cause. The loading flag is
    /// cleared on every path.
    pub fn finish_submit(&mut self, result: anyhow::Result<String>) {
        let content = match result {
            Ok(reply) => reply,
            Err(err) => {
                log::error!("agent request failed: {:#}", err);
                FALLBACK_REPLY.to_string()
            }
        };
        self.push_message(content, Sender::Agent);
        self.loading = false;
        self.scroll_chat_to_bottom();
    }

    pub fn clear_messages(&mut self) {
        self.messages.clear();
        self.chat_scroll = 0;
    }

    pub fn toggle_dark_mode(&mut self) {
        self.dark_mode = !self.dark_mode;
    }

    // Welcome overlay navigation
    pub fn next_section(&mut self) {
        self.section_idx = (self.section_idx + 1) % catalog::sections().len();
        self.example_state.select(Some(0));
    }

    pub fn prev_section(&mut self) {
        let len = catalog::sections().len();
        self.section_idx = (self.section_idx + len - 1) % len;
        self.example_state.select(Some(0));
    }

    pub fn example_down(&mut self) {
        let len = catalog::sections()[self.section_idx].examples.len();
        let i = self.example_state.selected().unwrap_or(0);
        self.example_state.select(Some((i + 1).min(len - 1)));
    }

    pub fn example_up(&mut self) {
        let i = self.example_state.selected().unwrap_or(0);
        self.example_state.select(Some(i.saturating_sub(1)));
    }

    pub fn selected_example(&self) -> Option<&'static str> {
        let section = catalog::sections().get(self.section_idx)?;
        let i = self.example_state.selected()?;
        section.examples.get(i).copied()
    }

    /// Close the overlay and persist the first-run flag. When
    /// `take_selection` is set and pre-filling is enabled, the highlighted
    /// example lands in the chat input ready to submit.
    pub fn dismiss_welcome(&mut self, take_selection: bool) {
        if take_selection && self.config.prefill_examples {
            if let Some(example) = self.selected_example() {
                self.input = example.to_string();
                self.cursor = self.input.chars().count();
            }
        }

        self.screen = Screen::Chat;

        if !self.config.seen_welcome {
            self.config.seen_welcome = true;
            if let Err(err) = Config::mark_welcome_seen(&self.config_path) {
                log::warn!("could not persist first-run flag: {:#}", err);
            }
        }
    }

    /// Tick animation frame (called by Tick event)
    pub fn tick_animation(&mut self) {
        if self.loading {
            self.animation_frame = (self.animation_frame + 1) % 3;
        }
    }

    // Transcript scrolling
    pub fn scroll_up(&mut self) {
        self.chat_scroll = self.chat_scroll.saturating_sub(1);
    }

    pub fn scroll_down(&mut self) {
        if self.chat_scroll < self.transcript_lines().saturating_sub(self.chat_height) {
            self.chat_scroll = self.chat_scroll.saturating_add(1);
        }
    }

    pub fn scroll_half_page_up(&mut self) {
        self.chat_scroll = self.chat_scroll.saturating_sub(self.chat_height / 2);
    }

    pub fn scroll_half_page_down(&mut self) {
        let max_scroll = self.transcript_lines().saturating_sub(self.chat_height);
        self.chat_scroll = (self.chat_scroll + self.chat_height / 2).min(max_scroll);
    }

    /// Scroll so the newest message (or the "Thinking" indicator) is visible.
    pub fn scroll_chat_to_bottom(&mut self) {
        let total_lines = self.transcript_lines();
        let visible_height = if self.chat_height > 0 {
            self.chat_height
        } else {
            20
        };

        if total_lines > visible_height {
            self.chat_scroll = total_lines - visible_height;
        } else {
            self.chat_scroll = 0;
        }
    }

    /// Estimate rendered transcript height, wrap-aware.
    fn transcript_lines(&self) -> u16 {
        // Use actual chat width for wrap calculation, default to 50 if not set
        let wrap_width = if self.chat_width > 0 {
            self.chat_width as usize
        } else {
            50
        };

        let mut total_lines: u16 = 0;

        for msg in &self.messages {
            total_lines += 1; // Role line ("You" or "Agent")
            for line in msg.content.lines() {
                // Character count, not byte length, for proper UTF-8 handling
                let char_count = line.chars().count();
                if char_count == 0 {
                    total_lines += 1;
                } else {
                    total_lines += ((char_count / wrap_width) + 1) as u16;
                }
            }
            total_lines += 1; // Blank line after message
        }

        if self.loading {
            total_lines += 2; // "Agent" + "Thinking..."
        }

        total_lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::DEFAULT_API_URL;
    use anyhow::anyhow;

    fn test_app() -> App {
        App::new(
            AgentClient::new(DEFAULT_API_URL),
            Config::default(),
            PathBuf::from("unused"),
        )
    }

    #[test]
    fn blank_input_is_rejected() {
        let mut app = test_app();

        app.input = String::new();
        assert!(app.begin_submit().is_none());

        app.input = "   \t ".to_string();
        assert!(app.begin_submit().is_none());

        assert!(app.messages.is_empty());
        assert!(!app.loading);
    }

    #[test]
    fn submit_while_loading_is_a_noop() {
        let mut app = test_app();

        app.input = "Show me all active customers".to_string();
        assert!(app.begin_submit().is_some());
        assert!(app.loading);

        app.input = "second question".to_string();
        assert!(app.begin_submit().is_none());
        assert_eq!(app.messages.len(), 1);
        assert_eq!(app.input, "second question");
    }

    #[test]
    fn successful_exchange_appends_two_messages_in_order() {
        let mut app = test_app();

        app.input = "Show me all active customers".to_string();
        let text = app.begin_submit().unwrap();
        assert_eq!(text, "Show me all active customers");
        assert!(app.input.is_empty());

        app.finish_submit(Ok("12 active customers found.".to_string()));

        assert_eq!(app.messages.len(), 2);
        assert_eq!(app.messages[0].sender, Sender::User);
        assert_eq!(app.messages[0].content, "Show me all active customers");
        assert_eq!(app.messages[1].sender, Sender::Agent);
        assert_eq!(app.messages[1].content, "12 active customers found.");
        assert!(!app.loading);
    }

    #[test]
    fn failed_exchange_appends_fixed_apology() {
        let mut app = test_app();

        app.input = "Show me all active customers".to_string();
        app.begin_submit().unwrap();
        app.finish_submit(Err(anyhow!("connection refused")));

        assert_eq!(app.messages.len(), 2);
        assert_eq!(app.messages[1].sender, Sender::Agent);
        assert_eq!(app.messages[1].content, FALLBACK_REPLY);
        assert!(!app.loading);
    }

    #[test]
    fn message_ids_are_strictly_increasing() {
        let mut app = test_app();

        for question in ["one", "two", "three"] {
            app.input = question.to_string();
            app.begin_submit().unwrap();
            app.finish_submit(Ok(format!("answer to {question}")));
        }

        let ids: Vec<u64> = app.messages.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn clear_empties_the_thread() {
        let mut app = test_app();

        app.input = "hello".to_string();
        app.begin_submit().unwrap();
        app.finish_submit(Ok("hi".to_string()));
        assert!(!app.messages.is_empty());

        app.clear_messages();
        assert!(app.messages.is_empty());
    }

    #[test]
    fn example_selection_follows_the_normal_submit_contract() {
        let mut app = test_app();
        assert_eq!(app.screen, Screen::Welcome);

        let dir = tempfile::tempdir().unwrap();
        app.config_path = dir.path().join("config.json");

        let expected = app.selected_example().unwrap();
        app.dismiss_welcome(true);
        assert_eq!(app.screen, Screen::Chat);
        assert_eq!(app.input, expected);

        let text = app.begin_submit().unwrap();
        assert_eq!(text, expected);
        app.finish_submit(Ok("done".to_string()));
        assert_eq!(app.messages.len(), 2);
    }

    #[test]
    fn dismiss_without_selection_leaves_input_empty() {
        let mut app = test_app();
        let dir = tempfile::tempdir().unwrap();
        app.config_path = dir.path().join("config.json");

        app.dismiss_welcome(false);
        assert!(app.input.is_empty());
        assert!(Config::load_from(&app.config_path).unwrap().seen_welcome);
    }

    #[test]
    fn prefill_hook_can_be_disabled() {
        let mut app = test_app();
        app.config.prefill_examples = false;
        let dir = tempfile::tempdir().unwrap();
        app.config_path = dir.path().join("config.json");

        app.dismiss_welcome(true);
        assert!(app.input.is_empty());
        assert_eq!(app.screen, Screen::Chat);
    }

    #[test]
    fn welcome_shown_iff_flag_absent() {
        let seen = Config {
            seen_welcome: true,
            ..Config::default()
        };
        let app = App::new(
            AgentClient::new(DEFAULT_API_URL),
            seen,
            PathBuf::from("unused"),
        );
        assert_eq!(app.screen, Screen::Chat);

        assert_eq!(test_app().screen, Screen::Welcome);
    }

    #[test]
    fn section_navigation_wraps() {
        let mut app = test_app();
        let len = catalog::sections().len();

        app.prev_section();
        assert_eq!(app.section_idx, len - 1);
        app.next_section();
        assert_eq!(app.section_idx, 0);
    }

    #[test]
    fn example_navigation_stays_in_bounds() {
        let mut app = test_app();
        let len = catalog::sections()[0].examples.len();

        for _ in 0..len + 3 {
            app.example_down();
        }
        assert_eq!(app.example_state.selected(), Some(len - 1));

        for _ in 0..len + 3 {
            app.example_up();
        }
        assert_eq!(app.example_state.selected(), Some(0));
    }

    #[test]
    fn theme_toggle_flips_flag_only() {
        let mut app = test_app();
        app.input = "pending text".to_string();

        assert!(app.dark_mode);
        app.toggle_dark_mode();
        assert!(!app.dark_mode);
        app.toggle_dark_mode();
        assert!(app.dark_mode);
        assert_eq!(app.input, "pending text");
    }
}
