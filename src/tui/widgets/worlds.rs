use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use crate::models::Biome;
use crate::store::KvStore;
use crate::tui::App;

pub fn draw<S: KvStore>(f: &mut Frame, app: &App<S>, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    draw_list(f, app, chunks[0]);
    draw_detail(f, app, chunks[1]);
}

fn biome_color(biome: Biome) -> Color {
    match biome {
        Biome::Grass => Color::Green,
        Biome::Forest => Color::LightGreen,
        Biome::Desert => Color::Yellow,
    }
}

fn draw_list<S: KvStore>(f: &mut Frame, app: &App<S>, area: Rect) {
    let items: Vec<ListItem> = app
        .worlds
        .items
        .iter()
        .map(|entry| {
            let world = &entry.world;
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("{:<8}", world.label),
                    Style::default()
                        .fg(biome_color(world.biome))
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!("{:<4}", "★".repeat(world.stars as usize)),
                    Style::default().fg(Color::Yellow),
                ),
                Span::styled(
                    format!("{:<8}", world.difficulty),
                    Style::default().fg(Color::Gray),
                ),
                Span::styled(
                    format!("{:<9}", world.grade_text),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::styled(
                    format!("{:>3}%", entry.progress.percentage),
                    Style::default().fg(Color::Cyan),
                ),
            ]))
        })
        .collect();

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Select World ")
        .title_style(Style::default().fg(Color::Cyan));

    let list = List::new(items)
        .block(block)
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    let mut state = ListState::default();
    state.select(app.worlds.selected);

    f.render_stateful_widget(list, area, &mut state);
}

fn draw_detail<S: KvStore>(f: &mut Frame, app: &App<S>, area: Rect) {
    let Some(entry) = app.worlds.selected_item() else {
        f.render_widget(
            Paragraph::new("No worlds.").block(Block::default().borders(Borders::ALL)),
            area,
        );
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(3)])
        .split(area);

    let world = &entry.world;
    let progress = &entry.progress;
    let subjects = if entry.subjects.is_empty() {
        "-".to_string()
    } else {
        entry
            .subjects
            .iter()
            .map(|s| s.label())
            .collect::<Vec<_>>()
            .join(", ")
    };

    let text = vec![
        Line::from(Span::styled(
            world.description,
            Style::default().fg(Color::White),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("Subjects: ", Style::default().fg(Color::Gray)),
            Span::raw(subjects),
        ]),
        Line::from(vec![
            Span::styled("Questions: ", Style::default().fg(Color::Gray)),
            Span::raw(progress.total.to_string()),
        ]),
        Line::from(vec![
            Span::styled("Correct: ", Style::default().fg(Color::Gray)),
            Span::styled(progress.correct.to_string(), Style::default().fg(Color::Green)),
            Span::styled("  Wrong: ", Style::default().fg(Color::Gray)),
            Span::styled(progress.wrong.to_string(), Style::default().fg(Color::Red)),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ", world.label))
        .title_style(Style::default().fg(biome_color(world.biome)));

    let paragraph = Paragraph::new(text).block(block).wrap(Wrap { trim: true });
    f.render_widget(paragraph, chunks[0]);

    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title(" Completion "))
        .gauge_style(Style::default().fg(biome_color(world.biome)))
        .percent(progress.percentage.min(100) as u16)
        .label(format!(
            "{}/{} ({}%)",
            progress.completed, progress.total, progress.percentage
        ));
    f.render_widget(gauge, chunks[1]);
}
