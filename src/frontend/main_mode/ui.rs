use ratatui::prelude::*;
use ratatui::widgets::{Padding, Scrollbar, ScrollbarOrientation, Wrap};
use ratatui::{
    layout::{Constraint, Direction, Layout},
    text::Span,
    widgets::{Block, Borders, Paragraph},
};

use crate::chat_message::{ChatMessage, ChatRole};
use crate::frontend::app::{App, Focus};

pub fn ui(f: &mut ratatui::Frame, area: Rect, app: &mut App) {
    // Create the main layout (vertical)
    let [repo_area, issue_area, feed_area, commit_area, help_area] = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Repository URL input
            Constraint::Length(4), // Issue description input
            Constraint::Min(0),    // Output feed
            Constraint::Length(3), // Commit message input
            Constraint::Length(2), // Key hints and activity
        ])
        .areas(area);

    render_input(f, app, repo_area, Focus::Repo, "Repository URL");
    render_input(f, app, issue_area, Focus::Issue, "Issue description");
    render_feed(f, app, feed_area);
    render_input(f, app, commit_area, Focus::CommitMessage, "Commit message");
    render_help(f, app, help_area);
}

fn render_input(f: &mut ratatui::Frame, app: &mut App, area: Rect, focus: Focus, title: &str) {
    let border_style = if app.focus == focus {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };

    let block = Block::default()
        .title(title.to_string())
        .borders(Borders::ALL)
        .border_style(border_style);

    let input = match focus {
        Focus::Repo => &mut app.repo_input,
        Focus::Issue => &mut app.issue_input,
        Focus::CommitMessage => &mut app.commit_input,
    };
    input.set_block(block);

    f.render_widget(&*input, area);
}

fn render_feed(f: &mut ratatui::Frame, app: &mut App, area: Rect) {
    let feed_content: Text<'static> = app.feed.iter().flat_map(format_feed_message).collect();

    let num_lines = feed_content.lines.len();
    app.num_feed_lines = num_lines;

    // Clamp the scroll position; End leaves a follow-the-tail sentinel
    let viewport = area.height.saturating_sub(2) as usize;
    let max_scroll = num_lines.saturating_sub(viewport).min(u16::MAX as usize) as u16;
    app.vertical_scroll = app.vertical_scroll.min(max_scroll);
    app.vertical_scroll_state = app
        .vertical_scroll_state
        .content_length(num_lines)
        .position(app.vertical_scroll as usize);

    let feed = Paragraph::new(feed_content)
        .block(
            Block::default()
                .title("Output")
                .borders(Borders::ALL)
                .padding(Padding::horizontal(1)),
        )
        .wrap(Wrap { trim: false })
        .scroll((app.vertical_scroll, 0));

    f.render_widget(feed, area);

    f.render_stateful_widget(
        Scrollbar::new(ScrollbarOrientation::VerticalRight)
            .begin_symbol(Some("↑"))
            .end_symbol(Some("↓")),
        area,
        &mut app.vertical_scroll_state,
    );
}

fn render_help(f: &mut ratatui::Frame, app: &App, area: Rect) {
    let mut lines = vec![Line::from(
        "Tab: Next field | Ctrl-S: Process repository | Ctrl-O: Commit changes | Ctrl-E: Show config | Ctrl-Q: Quit",
    )
    .style(Color::Gray)];

    if app.busy {
        let activity = app.activity.as_deref().unwrap_or("Working ...");
        lines.push(Line::from(activity.to_string()).style(Color::Yellow));
    }

    f.render_widget(Paragraph::new(Text::from(lines)), area);
}

fn format_feed_message(message: &ChatMessage) -> Text<'static> {
    match message.role() {
        ChatRole::Diff => format_diff(message.content()),
        role => {
            let prefix = Span::styled(
                format!("{role} » "),
                Style::default().fg(match role {
                    ChatRole::User => Color::Cyan,
                    ChatRole::Error => Color::Red,
                    _ => Color::Yellow,
                }),
            );

            let mut content_lines = message.content().lines();
            let first = content_lines.next().unwrap_or_default().to_string();

            let mut lines = vec![Line::from(vec![prefix, Span::raw(first)])];
            lines.extend(content_lines.map(|line| Line::raw(line.to_string())));
            lines.push(Line::raw(""));
            Text::from(lines)
        }
    }
}

// Diffs are displayed verbatim, with conventional +/- coloring
fn format_diff(diff: &str) -> Text<'static> {
    let mut lines: Vec<Line> = diff
        .lines()
        .map(|line| {
            let style = if line.starts_with("+++") || line.starts_with("---") {
                Style::default().add_modifier(Modifier::BOLD)
            } else if line.starts_with("@@") {
                Style::default().fg(Color::Cyan)
            } else if line.starts_with('+') {
                Style::default().fg(Color::Green)
            } else if line.starts_with('-') {
                Style::default().fg(Color::Red)
            } else {
                Style::default()
            };
            Line::styled(line.to_string(), style)
        })
        .collect();
    lines.push(Line::raw(""));
    Text::from(lines)
}
