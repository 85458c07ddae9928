use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{BarChart, Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame,
};

use crate::analysis::FULL_MARK;
use crate::ledgers::{SKILL_SCORE_MAX, SKILL_SCORE_START};
use crate::models::Skill;
use crate::store::KvStore;
use crate::tui::App;

pub fn draw<S: KvStore>(f: &mut Frame, app: &App<S>, area: Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(12), // Charts
            Constraint::Min(0),     // Summary
        ])
        .split(area);

    let top = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(40),
            Constraint::Percentage(30),
            Constraint::Percentage(30),
        ])
        .split(rows[0]);

    draw_skill_profile(f, app, top[0]);
    draw_skill_scores(f, app, top[1]);
    draw_blind_spots(f, app, top[2]);
    draw_summary(f, app, rows[1]);
}

fn short_name(skill: Skill) -> &'static str {
    match skill {
        Skill::Knowledge => "Know",
        Skill::Calculation => "Calc",
        Skill::Logic => "Logic",
        Skill::Observation => "Obs",
    }
}

fn draw_skill_profile<S: KvStore>(f: &mut Frame, app: &App<S>, area: Rect) {
    let data: Vec<(&str, u64)> = app
        .analysis
        .skills
        .iter()
        .map(|stat| (short_name(stat.skill), stat.score as u64))
        .collect();

    let chart = BarChart::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Accuracy by Skill ")
                .title_style(Style::default().fg(Color::Cyan)),
        )
        .data(data.as_slice())
        .bar_width(6)
        .bar_gap(2)
        .max(FULL_MARK as u64)
        .bar_style(Style::default().fg(Color::Cyan))
        .value_style(Style::default().fg(Color::Black).bg(Color::Cyan));

    f.render_widget(chart, area);
}

fn draw_skill_scores<S: KvStore>(f: &mut Frame, app: &App<S>, area: Rect) {
    let items: Vec<ListItem> = Skill::ALL
        .iter()
        .map(|skill| {
            let score = app
                .skill_scores
                .get(skill)
                .copied()
                .unwrap_or(SKILL_SCORE_START);
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("{:<12}", skill.as_str()),
                    Style::default().fg(Color::White),
                ),
                Span::styled(score_bar(score), Style::default().fg(Color::Green)),
                Span::styled(format!(" {:>3}", score), Style::default().fg(Color::Yellow)),
            ]))
        })
        .collect();

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Skill Scores ")
        .title_style(Style::default().fg(Color::Green));

    f.render_widget(List::new(items).block(block), area);
}

fn score_bar(score: u32) -> String {
    let filled = (score.min(SKILL_SCORE_MAX) / 20) as usize;
    format!("{}{}", "█".repeat(filled), "░".repeat(5 - filled))
}

fn draw_blind_spots<S: KvStore>(f: &mut Frame, app: &App<S>, area: Rect) {
    let items: Vec<ListItem> = if app.analysis.blind_spots.is_empty() {
        vec![ListItem::new(Span::styled(
            "No mistakes yet",
            Style::default().fg(Color::DarkGray),
        ))]
    } else {
        app.analysis
            .blind_spots
            .iter()
            .enumerate()
            .map(|(i, spot)| {
                let style = if i == 0 {
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::White)
                };
                ListItem::new(Line::from(vec![
                    Span::styled(format!("{:<16}", spot.name), style),
                    Span::styled(format!("{:>3}", spot.count), Style::default().fg(Color::Yellow)),
                ]))
            })
            .collect()
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Blind Spots ")
        .title_style(Style::default().fg(Color::Red));

    f.render_widget(List::new(items).block(block), area);
}

fn draw_summary<S: KvStore>(f: &mut Frame, app: &App<S>, area: Rect) {
    let mut text = Vec::new();
    if let Some(weakness) = app.analysis.primary_weakness() {
        text.push(Line::from(vec![
            Span::styled("Primary weakness: ", Style::default().fg(Color::Gray)),
            Span::styled(
                weakness.name.as_str(),
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ),
        ]));
        text.push(Line::from(""));
    }
    text.push(Line::from(app.analysis.summary.as_str()));

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Report ")
        .title_style(Style::default().fg(Color::Magenta));

    let paragraph = Paragraph::new(text).block(block).wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn score_bar_scales_to_five_cells() {
        assert_eq!(score_bar(0), "░░░░░");
        assert_eq!(score_bar(50), "██░░░");
        assert_eq!(score_bar(100), "█████");
        assert_eq!(score_bar(250), "█████");
    }
}
