use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
};
use crate::app::{App, Screen, Sender};
use crate::catalog;

/// Presentation palette. `dark_mode` picks one of the two variants at draw
/// time; nothing else about the UI changes.
pub struct Theme {
    pub bg: Color,
    pub fg: Color,
    pub dim: Color,
    pub border: Color,
    pub user: Color,
    pub agent: Color,
    pub highlight_bg: Color,
    pub highlight_fg: Color,
}

impl Theme {
    fn dark() -> Self {
        Self {
            bg: Color::Reset,
            fg: Color::White,
            dim: Color::DarkGray,
            border: Color::DarkGray,
            user: Color::Cyan,
            agent: Color::Yellow,
            highlight_bg: Color::Cyan,
            highlight_fg: Color::Black,
        }
    }

    fn light() -> Self {
        Self {
            bg: Color::White,
            fg: Color::Black,
            dim: Color::Gray,
            border: Color::Gray,
            user: Color::Blue,
            agent: Color::Magenta,
            highlight_bg: Color::Blue,
            highlight_fg: Color::White,
        }
    }
}

pub fn render(app: &mut App, frame: &mut Frame) {
    let theme = if app.dark_mode {
        Theme::dark()
    } else {
        Theme::light()
    };

    let area = frame.area();
    frame.render_widget(
        Block::default().style(Style::default().bg(theme.bg)),
        area,
    );

    // Main layout: header, body, footer
    let [header_area, body_area, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(app, frame, header_area, &theme);
    render_chat(app, frame, body_area, &theme);
    render_footer(app, frame, footer_area, &theme);

    if app.screen == Screen::Welcome {
        render_welcome_overlay(app, frame, area, &theme);
    }
}

fn render_header(app: &App, frame: &mut Frame, area: Rect, theme: &Theme) {
    let title = Line::from(vec![
        Span::styled(
            " SQL Agent ",
            Style::default()
                .fg(theme.user)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(" Beta ", Style::default().fg(theme.agent)),
        Span::styled(
            format!(" {} ", app.agent.base_url()),
            Style::default().fg(theme.dim),
        ),
        Span::styled(
            format!("v{}", env!("CARGO_PKG_VERSION")),
            Style::default().fg(theme.dim),
        ),
    ]);

    let header = Paragraph::new(title);
    frame.render_widget(header, area);
}

fn render_footer(app: &App, frame: &mut Frame, area: Rect, theme: &Theme) {
    let key_style = Style::default().bg(Color::DarkGray).fg(Color::White);
    let label_style = Style::default().fg(theme.dim);

    let hints = match app.screen {
        Screen::Welcome => vec![
            Span::styled(" ←/→ ", key_style),
            Span::styled(" category ", label_style),
            Span::styled(" ↑/↓ ", key_style),
            Span::styled(" example ", label_style),
            Span::styled(" Enter ", key_style),
            Span::styled(" use it ", label_style),
            Span::styled(" s ", key_style),
            Span::styled(" skip ", label_style),
            Span::styled(" q ", key_style),
            Span::styled(" quit ", label_style),
        ],
        Screen::Chat => vec![
            Span::styled(" Enter ", key_style),
            Span::styled(" send ", label_style),
            Span::styled(" ↑/↓ ", key_style),
            Span::styled(" scroll ", label_style),
            Span::styled(" ^L ", key_style),
            Span::styled(" clear ", label_style),
            Span::styled(" ^T ", key_style),
            Span::styled(
                if app.dark_mode { " light " } else { " dark " },
                label_style,
            ),
            Span::styled(" Esc ", key_style),
            Span::styled(" quit ", label_style),
        ],
    };

    frame.render_widget(Paragraph::new(Line::from(hints)), area);
}

fn render_chat(app: &mut App, frame: &mut Frame, area: Rect, theme: &Theme) {
    let [chat_area, input_area] = Layout::vertical([
        Constraint::Min(0),
        Constraint::Length(3),
    ])
    .areas(area);

    // Store chat area dimensions for scroll calculations (inner size minus borders)
    app.chat_height = chat_area.height.saturating_sub(2);
    app.chat_width = chat_area.width.saturating_sub(2);

    let chat_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border))
        .title(" Conversation ");

    let chat_text = if app.messages.is_empty() && !app.loading {
        Text::from(vec![
            Line::default(),
            Line::from(Span::styled(
                " Welcome to SQL Agent.",
                Style::default().fg(theme.fg).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                " Start a conversation by typing a question about your data below.",
                Style::default().fg(theme.dim),
            )),
        ])
    } else {
        let mut lines: Vec<Line> = Vec::new();

        for msg in &app.messages {
            let (label, color) = match msg.sender {
                Sender::User => ("You", theme.user),
                Sender::Agent => ("Agent", theme.agent),
            };
            lines.push(Line::from(vec![
                Span::styled(
                    label,
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!("  {}", msg.timestamp.format("%H:%M")),
                    Style::default().fg(theme.dim),
                ),
            ]));
            for line in msg.content.lines() {
                lines.push(Line::from(Span::styled(
                    line.to_string(),
                    Style::default().fg(theme.fg),
                )));
            }
            lines.push(Line::default());
        }

        if app.loading {
            lines.push(Line::from(Span::styled(
                "Agent",
                Style::default().fg(theme.agent).add_modifier(Modifier::BOLD),
            )));
            // Animated ellipsis: cycles through ".", "..", "..."
            let dots = ".".repeat((app.animation_frame as usize) + 1);
            lines.push(Line::from(Span::styled(
                format!("Thinking{}", dots),
                Style::default().fg(theme.dim).add_modifier(Modifier::ITALIC),
            )));
        }

        Text::from(lines)
    };

    let chat = Paragraph::new(chat_text)
        .block(chat_block)
        .wrap(Wrap { trim: true })
        .scroll((app.chat_scroll, 0));

    frame.render_widget(chat, chat_area);

    render_input(app, frame, input_area, theme);
}

fn render_input(app: &App, frame: &mut Frame, area: Rect, theme: &Theme) {
    let border_color = if app.loading { theme.dim } else { theme.user };
    let input_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(if app.loading {
            " Waiting for the agent... "
        } else {
            " Ask about your data "
        });

    // Horizontal scroll so the cursor stays visible in a narrow box
    let inner_width = area.width.saturating_sub(2) as usize;
    let scroll_offset = if inner_width == 0 {
        0
    } else if app.cursor >= inner_width {
        app.cursor - inner_width + 1
    } else {
        0
    };

    let visible_text: String = app
        .input
        .chars()
        .skip(scroll_offset)
        .take(inner_width)
        .collect();

    let input = Paragraph::new(visible_text)
        .style(Style::default().fg(theme.user))
        .block(input_block);

    frame.render_widget(input, area);

    if app.screen == Screen::Chat {
        let cursor_x = (app.cursor - scroll_offset) as u16;
        frame.set_cursor_position((area.x + cursor_x + 1, area.y + 1));
    }
}

fn render_welcome_overlay(app: &mut App, frame: &mut Frame, area: Rect, theme: &Theme) {
    let sections = catalog::sections();
    let examples = sections[app.section_idx].examples;

    // Centered popup: intro + tabs + example list + hint
    let popup_width = 76.min(area.width.saturating_sub(4));
    let popup_height = (examples.len() as u16 + 9).min(area.height.saturating_sub(2));

    let popup_x = (area.width.saturating_sub(popup_width)) / 2;
    let popup_y = (area.height.saturating_sub(popup_height)) / 2;
    let popup = Rect::new(popup_x, popup_y, popup_width, popup_height);

    frame.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.user))
        .title(" SQL Command Agent ")
        .title_style(Style::default().fg(theme.user).add_modifier(Modifier::BOLD));
    let inner = block.inner(popup);
    frame.render_widget(block, popup);

    let [intro_area, tabs_area, list_area, hint_area] = Layout::vertical([
        Constraint::Length(2),
        Constraint::Length(2),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(inner);

    let intro = Paragraph::new(vec![
        Line::from(Span::styled(
            "Ask questions about your database in plain English.",
            Style::default().fg(theme.fg),
        )),
        Line::from(Span::styled(
            "Pick an example to get started, or press 's' to skip.",
            Style::default().fg(theme.dim),
        )),
    ]);
    frame.render_widget(intro, intro_area);

    // Category tabs
    let mut tab_spans: Vec<Span> = Vec::new();
    for (i, section) in sections.iter().enumerate() {
        let style = if i == app.section_idx {
            Style::default()
                .fg(theme.highlight_fg)
                .bg(theme.highlight_bg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.dim)
        };
        tab_spans.push(Span::styled(format!(" {} ", section.title), style));
        tab_spans.push(Span::raw(" "));
    }
    frame.render_widget(
        Paragraph::new(Line::from(tab_spans)).wrap(Wrap { trim: true }),
        tabs_area,
    );

    let items: Vec<ListItem> = examples
        .iter()
        .map(|example| ListItem::new(format!(" {} ", example)))
        .collect();

    let list = List::new(items)
        .style(Style::default().fg(theme.fg))
        .highlight_style(
            Style::default()
                .bg(theme.highlight_bg)
                .fg(theme.highlight_fg)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    frame.render_stateful_widget(list, list_area, &mut app.example_state);

    let hint = Paragraph::new(Line::from(Span::styled(
        "The agent turns your question into SQL and summarizes the result.",
        Style::default().fg(theme.dim),
    )));
    frame.render_widget(hint, hint_area);
}
