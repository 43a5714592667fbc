use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame,
};

use vagent_core::model::ChatRole;

use crate::app::{App, FocusPane, InputMode};

pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();

    let [header_area, body_area, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(app, frame, header_area);
    render_body(app, frame, body_area);
    render_footer(app, frame, footer_area);
}

fn render_header(app: &App, frame: &mut Frame, area: Rect) {
    let assistant_label = app
        .selected_assistant()
        .map(|a| format!(" {} ({}) ", a.name, a.model_name))
        .unwrap_or_else(|| " no assistant selected ".to_string());

    let title = Line::from(vec![
        Span::styled(
            " Virtual Assistant ",
            Style::default().fg(Color::Cyan).bold(),
        ),
        Span::styled(assistant_label, Style::default().fg(Color::DarkGray)),
        Span::styled(
            format!("v{}", env!("CARGO_PKG_VERSION")),
            Style::default().fg(Color::DarkGray),
        ),
    ]);

    let header = Paragraph::new(title).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(header, area);
}

fn render_body(app: &mut App, frame: &mut Frame, area: Rect) {
    let [sidebar_area, chat_column] =
        Layout::horizontal([Constraint::Percentage(28), Constraint::Percentage(72)]).areas(area);

    render_assistant_list(app, frame, sidebar_area);

    // Chat column: transcript, optional components detail, optional error
    // banner, input box at the bottom
    let components_height = if app.show_components {
        components_lines(app).len() as u16 + 2 // +2 for borders
    } else {
        0
    };
    let error_height = if banner_text(app).is_some() { 1 } else { 0 };

    let [chat_area, components_area, error_area, input_area] = Layout::vertical([
        Constraint::Min(0),
        Constraint::Length(components_height),
        Constraint::Length(error_height),
        Constraint::Length(3),
    ])
    .areas(chat_column);

    render_chat(app, frame, chat_area);
    if app.show_components {
        render_components(app, frame, components_area);
    }
    if error_height > 0 {
        render_error_banner(app, frame, error_area);
    }
    render_input(app, frame, input_area);
}

fn render_assistant_list(app: &mut App, frame: &mut Frame, area: Rect) {
    let focused = app.focus == FocusPane::Assistants;
    let border_color = if focused { Color::Cyan } else { Color::DarkGray };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(" Assistants ");

    if app.directory.assistants.is_empty() {
        let placeholder = Paragraph::new(Span::styled(
            "No assistants available. Press 'r' to refresh.",
            Style::default().fg(Color::DarkGray),
        ))
        .block(block)
        .wrap(Wrap { trim: true });
        frame.render_widget(placeholder, area);
        return;
    }

    let active_id = app.controller.assistant_id().map(str::to_string);
    let items: Vec<ListItem> = app
        .directory
        .assistants
        .iter()
        .map(|assistant| {
            let marker = if active_id.as_deref() == Some(assistant.id.as_str()) {
                "* "
            } else {
                "  "
            };
            ListItem::new(format!("{}{}", marker, assistant.name))
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(
            Style::default()
                .bg(Color::Cyan)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    frame.render_stateful_widget(list, area, &mut app.assistant_state);
}

fn render_chat(app: &mut App, frame: &mut Frame, area: Rect) {
    // Store chat area dimensions for scroll calculations (inner size minus borders)
    app.chat_height = area.height.saturating_sub(2);
    app.chat_width = area.width.saturating_sub(2);

    let focused = app.focus == FocusPane::Chat;
    let border_color = if focused { Color::Cyan } else { Color::DarkGray };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(" Conversation ");

    let transcript = app.controller.transcript();
    let chat_text = if transcript.is_empty() && !app.controller.is_loading() {
        Text::from(Span::styled(
            "Ask the assistant a question...",
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        let mut lines: Vec<Line> = Vec::new();

        for msg in transcript {
            match msg.role {
                ChatRole::User => {
                    lines.push(Line::from(Span::styled(
                        "You:",
                        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                    )));
                }
                ChatRole::Assistant => {
                    lines.push(Line::from(Span::styled(
                        "AI:",
                        Style::default()
                            .fg(Color::Yellow)
                            .add_modifier(Modifier::BOLD),
                    )));
                }
            }
            for line in msg.content.lines() {
                lines.push(Line::from(line.to_string()));
            }
            lines.push(Line::default());
        }

        if app.controller.is_loading() {
            lines.push(Line::from(Span::styled(
                "AI:",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )));
            // Animated ellipsis: cycles through ".", "..", "..."
            let dots = ".".repeat((app.animation_frame as usize) + 1);
            lines.push(Line::from(Span::styled(
                format!("Thinking{}", dots),
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            )));
        }

        Text::from(lines)
    };

    let chat = Paragraph::new(chat_text)
        .block(block)
        .wrap(Wrap { trim: true })
        .scroll((app.chat_scroll, 0));

    frame.render_widget(chat, area);
}

fn components_lines(app: &App) -> Vec<Line<'static>> {
    let Some(components) = app.directory.components.as_ref() else {
        return vec![Line::from(Span::styled(
            "No component details loaded.",
            Style::default().fg(Color::DarkGray),
        ))];
    };

    let mut lines = Vec::new();

    let server = &components.model_server;
    lines.push(Line::from(vec![
        Span::styled("Model server: ", Style::default().fg(Color::Cyan)),
        Span::raw(format!(
            "{} ({})",
            server.name.as_deref().unwrap_or("unknown"),
            server.model_name.as_deref().unwrap_or("unknown"),
        )),
    ]));

    if components.knowledge_bases.is_empty() {
        lines.push(Line::from(Span::styled(
            "Knowledge bases: none",
            Style::default().fg(Color::DarkGray),
        )));
    } else {
        lines.push(Line::from(Span::styled(
            "Knowledge bases:",
            Style::default().fg(Color::Cyan),
        )));
        for kb in &components.knowledge_bases {
            let external = if kb.is_external { " [external]" } else { "" };
            lines.push(Line::from(format!(
                "  {} v{} ({}){}",
                kb.name, kb.version, kb.embedding_model, external
            )));
        }
    }

    if components.tools.is_empty() {
        lines.push(Line::from(Span::styled(
            "Tools: none",
            Style::default().fg(Color::DarkGray),
        )));
    } else {
        lines.push(Line::from(Span::styled(
            "Tools:",
            Style::default().fg(Color::Cyan),
        )));
        for tool in &components.tools {
            let title = tool.title.as_deref().unwrap_or(&tool.name);
            lines.push(Line::from(format!("  {}", title)));
        }
    }

    lines
}

fn render_components(app: &App, frame: &mut Frame, area: Rect) {
    if area.height == 0 {
        return;
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Magenta))
        .title(" Components (x to hide) ");

    let detail = Paragraph::new(Text::from(components_lines(app)))
        .block(block)
        .wrap(Wrap { trim: true });

    frame.render_widget(detail, area);
}

fn banner_text(app: &App) -> Option<String> {
    app.controller
        .last_error()
        .map(str::to_string)
        .or_else(|| app.directory.error.clone())
}

fn render_error_banner(app: &App, frame: &mut Frame, area: Rect) {
    let Some(text) = banner_text(app) else { return };
    let banner = Paragraph::new(Span::styled(
        format!(" {} ", text),
        Style::default().fg(Color::White).bg(Color::Red),
    ));
    frame.render_widget(banner, area);
}

fn render_input(app: &App, frame: &mut Frame, area: Rect) {
    let focused = app.focus == FocusPane::Input;
    let border_color = if focused || app.input_mode == InputMode::Editing {
        Color::Yellow
    } else {
        Color::DarkGray
    };

    let title = if app.controller.is_loading() {
        " Waiting for response... "
    } else {
        " Message (i to type, Enter to send) "
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(title);

    // Calculate visible portion of input with horizontal scrolling
    // Inner width = total width - 2 (for borders)
    let inner_width = area.width.saturating_sub(2) as usize;
    let cursor_pos = app.input_cursor;

    let scroll_offset = if inner_width == 0 {
        0
    } else if cursor_pos >= inner_width {
        cursor_pos - inner_width + 1
    } else {
        0
    };

    let visible_text: String = app
        .controller
        .input
        .chars()
        .skip(scroll_offset)
        .take(inner_width)
        .collect();

    let input = Paragraph::new(visible_text)
        .style(Style::default().fg(Color::Cyan))
        .block(block);

    frame.render_widget(input, area);
}

fn render_footer(app: &App, frame: &mut Frame, area: Rect) {
    let mode_style = match app.input_mode {
        InputMode::Normal => Style::default().bg(Color::Blue).fg(Color::White),
        InputMode::Editing => Style::default().bg(Color::Yellow).fg(Color::Black),
    };

    let mode_text = match app.input_mode {
        InputMode::Normal => " NORMAL ",
        InputMode::Editing => " INSERT ",
    };

    let key_style = Style::default().bg(Color::DarkGray).fg(Color::White);
    let label_style = Style::default().bg(Color::Black).fg(Color::White);

    let hints = match app.input_mode {
        InputMode::Normal => {
            let mut hints = vec![
                Span::styled(" Tab ", key_style),
                Span::styled(" focus ", label_style),
                Span::styled(" j/k ", key_style),
                Span::styled(" nav ", label_style),
                Span::styled(" Enter ", key_style),
                Span::styled(" select ", label_style),
                Span::styled(" i ", key_style),
                Span::styled(" type ", label_style),
                Span::styled(" x ", key_style),
                Span::styled(" components ", label_style),
                Span::styled(" r ", key_style),
                Span::styled(" refresh ", label_style),
            ];
            if app.controller.is_loading() {
                hints.push(Span::styled(" Esc ", key_style));
                hints.push(Span::styled(" cancel ", label_style));
            }
            hints.push(Span::styled(" q ", key_style));
            hints.push(Span::styled(" quit ", label_style));
            hints
        }
        InputMode::Editing => vec![
            Span::styled(" Enter ", key_style),
            Span::styled(" send ", label_style),
            Span::styled(" Esc ", key_style),
            Span::styled(" done ", label_style),
        ],
    };

    let mut spans = vec![Span::styled(mode_text, mode_style)];
    spans.extend(hints);

    let footer = Paragraph::new(Line::from(spans));
    frame.render_widget(footer, area);
}
