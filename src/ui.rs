use crate::app::{App, AppState};
use crate::attachment::Attachment;
use crate::session::Role;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use regex::Regex;
use std::sync::OnceLock;

const SIDEBAR_WIDTH: u16 = 32;

pub fn render(f: &mut Frame, app: &App) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(0)])
        .split(f.area());

    let attachment_height = if app.attachment.is_some() { 6 } else { 0 };
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),                    // transcript
            Constraint::Length(attachment_height), // attachment panel
            Constraint::Length(1),                 // status line
            Constraint::Length(3),                 // input box
        ])
        .split(columns[1]);

    render_sidebar(f, app, columns[0]);
    render_transcript(f, app, rows[0]);
    if let Some(attachment) = &app.attachment {
        render_attachment(f, attachment, rows[1]);
    }
    render_status(f, app, rows[2]);
    render_input(f, app, rows[3]);
}

fn render_sidebar(f: &mut Frame, app: &App, area: Rect) {
    let key = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
    let dim = Style::default().fg(Color::DarkGray);
    let save_style = if app.attachment.is_some() {
        Style::default()
    } else {
        dim
    };

    let lines = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled("[Ctrl+L] ", key),
            Span::raw("Clear Chat History"),
        ]),
        Line::from(vec![
            Span::styled("[Ctrl+S] ", key),
            Span::styled("Save attachment", save_style),
        ]),
        Line::from(vec![Span::styled("[↑/↓]    ", key), Span::raw("Scroll")]),
        Line::from(vec![Span::styled("[Esc]    ", key), Span::raw("Quit")]),
        Line::from(""),
        Line::from(Span::styled(
            format!(
                "Step {}/{}",
                app.session.cursor(),
                app.session.script_len()
            ),
            dim,
        )),
    ];

    let sidebar = Paragraph::new(lines).block(
        Block::default()
            .title(app.title.as_str())
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray)),
    );

    f.render_widget(sidebar, area);
}

fn transcript_lines(app: &App) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    for message in app.session.transcript() {
        lines.push(role_header(message.role));
        lines.extend(message.content.lines().map(styled_line));
        lines.push(Line::from(""));
    }

    match app.state {
        AppState::Thinking => {
            lines.push(role_header(Role::Assistant));
            lines.push(Line::from(Span::styled(
                "Thinking...",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::ITALIC),
            )));
        }
        AppState::Streaming => {
            lines.push(role_header(Role::Assistant));
            let live = app.live.as_deref().unwrap_or_default();
            let mut body: Vec<Line<'static>> = live.lines().map(styled_line).collect();
            if live.ends_with('\n') || body.is_empty() {
                body.push(Line::from(""));
            }
            if let Some(last) = body.last_mut() {
                last.spans.push(Span::styled("▌", Style::default().fg(Color::Gray)));
            }
            lines.extend(body);
        }
        AppState::Input => {}
    }

    lines
}

fn role_header(role: Role) -> Line<'static> {
    let color = match role {
        Role::User => Color::Green,
        Role::Assistant => Color::Magenta,
    };
    Line::from(Span::styled(
        role.label(),
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    ))
}

fn bold_pattern() -> &'static Regex {
    static BOLD: OnceLock<Regex> = OnceLock::new();
    BOLD.get_or_init(|| Regex::new(r"\*\*(.+?)\*\*").expect("bold pattern is valid"))
}

/// Light markdown: headings, horizontal rules and `**bold**` runs.
fn styled_line(raw: &str) -> Line<'static> {
    let trimmed = raw.trim_start();
    if trimmed.trim_end() == "---" {
        return Line::from(Span::styled(
            "─".repeat(24),
            Style::default().fg(Color::DarkGray),
        ));
    }
    if trimmed.starts_with('#') {
        let heading = trimmed.trim_start_matches('#').trim_start();
        let style = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
        return Line::from(inline_spans(heading, style));
    }
    Line::from(inline_spans(raw, Style::default()))
}

fn inline_spans(text: &str, base: Style) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    let mut last = 0;
    for caps in bold_pattern().captures_iter(text) {
        let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        if whole.start() > last {
            spans.push(Span::styled(text[last..whole.start()].to_string(), base));
        }
        spans.push(Span::styled(
            inner.as_str().to_string(),
            base.add_modifier(Modifier::BOLD),
        ));
        last = whole.end();
    }
    if last < text.len() || spans.is_empty() {
        spans.push(Span::styled(text[last..].to_string(), base));
    }
    spans
}

fn render_transcript(f: &mut Frame, app: &App, area: Rect) {
    let lines = transcript_lines(app);

    let text = if lines.is_empty() {
        Text::from(vec![
            Line::from(""),
            Line::from(Span::styled(
                "💡 Type a message and press Enter",
                Style::default().fg(Color::Gray),
            )),
        ])
    } else {
        Text::from(lines)
    };

    // Count rows with ratatui's own word wrapper so the bottom stays in view.
    let inner_width = area.width.saturating_sub(2);
    let inner_height = usize::from(area.height.saturating_sub(2));
    let paragraph = Paragraph::new(text).wrap(Wrap { trim: false });
    let max_scroll = paragraph.line_count(inner_width).saturating_sub(inner_height);
    let scroll = max_scroll.saturating_sub(usize::from(app.scroll_offset));

    let paragraph = paragraph
        .block(
            Block::default()
                .title("💬 Chat")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .scroll((u16::try_from(scroll).unwrap_or(u16::MAX), 0));

    f.render_widget(paragraph, area);
}

fn render_attachment(f: &mut Frame, attachment: &Attachment, area: Rect) {
    let label = Style::default().fg(Color::Gray);
    let lines = vec![
        Line::from(vec![
            Span::styled("Image: ", label),
            Span::raw(format!(
                "{} ({} bytes)",
                attachment.image.path.display(),
                attachment.image.size
            )),
        ]),
        Line::from(vec![
            Span::styled(format!("{}: ", attachment.download_label), label),
            Span::styled(
                attachment.download.filename.clone(),
                Style::default().add_modifier(Modifier::UNDERLINED),
            ),
            Span::raw(format!(
                " ({} bytes, {}) · Ctrl+S to save",
                attachment.download.size, attachment.download.mime
            )),
        ]),
        Line::from(""),
        Line::from(attachment.closing_note.clone()),
    ];

    let panel = Paragraph::new(lines)
        .block(
            Block::default()
                .title("📎 Attachment")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow)),
        )
        .wrap(Wrap { trim: true });

    f.render_widget(panel, area);
}

fn render_status(f: &mut Frame, app: &App, area: Rect) {
    let (text, color) = match (&app.status, app.state) {
        (Some(status), _) => (status.clone(), Color::Yellow),
        (None, AppState::Thinking) => ("Thinking...".to_string(), Color::Yellow),
        (None, AppState::Streaming) => ("Streaming...".to_string(), Color::Yellow),
        (None, AppState::Input) if app.session.is_exhausted() => (
            "Script finished. Press Ctrl+L to start over.".to_string(),
            Color::Gray,
        ),
        (None, AppState::Input) => ("Ready".to_string(), Color::Gray),
    };

    f.render_widget(Paragraph::new(text).style(Style::default().fg(color)), area);
}

fn render_input(f: &mut Frame, app: &App, area: Rect) {
    let (input_text, style) = match app.state {
        AppState::Input => (format!("{}_", app.input), Style::default().fg(Color::Green)),
        AppState::Thinking => ("Thinking...".to_string(), Style::default().fg(Color::Yellow)),
        AppState::Streaming => ("Streaming...".to_string(), Style::default().fg(Color::Yellow)),
    };

    let input = Paragraph::new(input_text).style(style).block(
        Block::default()
            .title("Your message")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );

    f.render_widget(input, area);
}
