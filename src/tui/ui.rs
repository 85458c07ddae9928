use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs},
    Frame,
};

use super::widgets::{analysis, quiz, worlds};
use super::{App, Mode, View};
use crate::store::KvStore;

pub fn draw<S: KvStore>(f: &mut Frame, app: &App<S>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Tab bar
            Constraint::Min(0),    // Content
            Constraint::Length(1), // Status line
            Constraint::Length(1), // Help bar
        ])
        .split(f.area());

    draw_tabs(f, app, chunks[0]);
    draw_content(f, app, chunks[1]);
    draw_status(f, app, chunks[2]);
    draw_help_bar(f, app, chunks[3]);
}

fn draw_tabs<S: KvStore>(f: &mut Frame, app: &App<S>, area: Rect) {
    let tab_titles = vec!["Worlds", "Analysis"];
    let selected = match app.view {
        View::Worlds | View::Quiz => 0,
        View::Analysis => 1,
    };

    let title = format!(" STEM Insight | {} ", app.username);
    let tabs = Tabs::new(tab_titles)
        .block(Block::default().borders(Borders::ALL).title(title))
        .select(selected)
        .style(Style::default().fg(Color::White))
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );

    f.render_widget(tabs, area);
}

fn draw_content<S: KvStore>(f: &mut Frame, app: &App<S>, area: Rect) {
    match app.view {
        View::Worlds => worlds::draw(f, app, area),
        View::Quiz => quiz::draw(f, app, area),
        View::Analysis => analysis::draw(f, app, area),
    }
}

fn draw_status<S: KvStore>(f: &mut Frame, app: &App<S>, area: Rect) {
    let text = app.status.as_deref().unwrap_or("");
    let color = if text.starts_with("Correct") || text.starts_with("Welcome") {
        Color::Green
    } else {
        Color::Yellow
    };
    f.render_widget(
        Paragraph::new(Span::styled(text, Style::default().fg(color))),
        area,
    );
}

fn key(k: &'static str) -> Span<'static> {
    Span::styled(k, Style::default().fg(Color::Cyan))
}

fn draw_help_bar<S: KvStore>(f: &mut Frame, app: &App<S>, area: Rect) {
    let help_text = match app.mode {
        Mode::Typing => vec![
            Span::styled("> ", Style::default().fg(Color::Yellow)),
            Span::raw(app.input.as_str()),
            Span::styled("█", Style::default().fg(Color::Yellow)),
            Span::raw(" | "),
            key("<CR>"),
            Span::raw(" Submit  "),
            key("<Esc>"),
            Span::raw(" Cancel"),
        ],
        Mode::ConfirmReset => vec![
            key("y"),
            Span::raw(" Reset  "),
            key("any"),
            Span::raw(" Cancel"),
        ],
        Mode::Normal => {
            let mut spans = Vec::new();
            match app.view {
                View::Worlds => spans.extend(vec![
                    key("h/l"),
                    Span::raw(" Views  "),
                    key("j/k"),
                    Span::raw(" Nav  "),
                    key("<CR>"),
                    Span::raw(" Play  "),
                    key("R"),
                    Span::raw(" Reset  "),
                ]),
                View::Analysis => spans.extend(vec![
                    key("h/l"),
                    Span::raw(" Views  "),
                    key("^r"),
                    Span::raw(" Refresh  "),
                    key("R"),
                    Span::raw(" Reset  "),
                ]),
                View::Quiz => {
                    let answered = app
                        .quiz
                        .as_ref()
                        .map(|run| run.is_finished() || run.last_outcome().is_some())
                        .unwrap_or(false);
                    if answered {
                        spans.extend(vec![key("<CR>"), Span::raw(" Continue  ")]);
                    } else {
                        spans.extend(vec![
                            key("a-d"),
                            Span::raw(" Choose  "),
                            key("i/<CR>"),
                            Span::raw(" Type answer  "),
                        ]);
                    }
                    spans.extend(vec![key("<Esc>"), Span::raw(" Leave  ")]);
                }
            }
            spans.extend(vec![key("q"), Span::raw(" Quit")]);
            spans
        }
    };

    let help = Paragraph::new(Line::from(help_text)).style(Style::default().bg(Color::DarkGray));

    f.render_widget(help, area);
}
