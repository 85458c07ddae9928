use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Wrap},
    Frame,
};

use crate::models::{choice_letter, AnswerOutcome, Question, QuestionFormat};
use crate::quiz::QuizRun;
use crate::store::KvStore;
use crate::tui::{App, Mode};

pub fn draw<S: KvStore>(f: &mut Frame, app: &App<S>, area: Rect) {
    let Some(run) = &app.quiz else {
        return;
    };

    if run.is_finished() {
        draw_results(f, run, area);
        return;
    }

    let Some(question) = run.current(app.session()) else {
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(8),    // Question
            Constraint::Length(7), // Feedback
        ])
        .split(area);

    draw_question(f, app, run, question, chunks[0]);
    draw_feedback(f, run.last_outcome(), chunks[1]);
}

fn draw_question<S: KvStore>(
    f: &mut Frame,
    app: &App<S>,
    run: &QuizRun,
    question: &Question,
    area: Rect,
) {
    let mut text = vec![
        Line::from(vec![
            Span::styled(
                format!("[{}] ", question.subject.label()),
                Style::default().fg(Color::Magenta),
            ),
            Span::styled(
                format!("Grade {} | {}", question.grade, question.skill.as_str()),
                Style::default().fg(Color::DarkGray),
            ),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            question.prompt.as_str(),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];

    let outcome = run.last_outcome();
    match &question.format {
        QuestionFormat::MultipleChoice {
            options,
            answer_index,
        } => {
            for (i, option) in options.iter().enumerate() {
                let style = match outcome {
                    Some(_) if i == *answer_index => Style::default().fg(Color::Green),
                    Some(_) => Style::default().fg(Color::DarkGray),
                    None => Style::default().fg(Color::White),
                };
                text.push(Line::from(Span::styled(
                    format!("  {}) {}", choice_letter(i), option),
                    style,
                )));
            }
        }
        QuestionFormat::ShortAnswer { .. } => {
            let shown = if app.mode == Mode::Typing {
                format!("  > {}█", app.input)
            } else if outcome.is_some() {
                String::from("  (answered)")
            } else {
                String::from("  Press i to type your answer")
            };
            text.push(Line::from(Span::styled(
                shown,
                Style::default().fg(Color::Yellow),
            )));
        }
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(
            " {} | Question {}/{} | Score {} ",
            run.biome().label(),
            run.position() + 1,
            run.len(),
            run.score()
        ))
        .title_style(Style::default().fg(Color::Cyan));

    let paragraph = Paragraph::new(text).block(block).wrap(Wrap { trim: false });
    f.render_widget(paragraph, area);
}

fn draw_feedback(f: &mut Frame, outcome: Option<&AnswerOutcome>, area: Rect) {
    let (title, color, text) = match outcome {
        None => (" Feedback ", Color::DarkGray, vec![Line::from("")]),
        Some(o) if o.is_correct => (
            " Correct ",
            Color::Green,
            vec![Line::from(o.analysis.as_str())],
        ),
        Some(o) => (
            " Wrong ",
            Color::Red,
            vec![
                Line::from(vec![
                    Span::styled("Answer: ", Style::default().fg(Color::Gray)),
                    Span::styled(o.correct_answer.as_str(), Style::default().fg(Color::Green)),
                ]),
                Line::from(o.analysis.as_str()),
            ],
        ),
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .title_style(Style::default().fg(color));

    let paragraph = Paragraph::new(text).block(block).wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

fn draw_results(f: &mut Frame, run: &QuizRun, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(5), Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    let percentage = run.final_percentage();
    let text = vec![
        Line::from(Span::styled(
            format!("{} cleared!", run.biome().label()),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(format!(
            "Score: {}/{} ({}%)",
            run.score(),
            run.len(),
            percentage
        )),
    ];
    let paragraph = Paragraph::new(text).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Results ")
            .title_style(Style::default().fg(Color::Cyan)),
    );
    f.render_widget(paragraph, chunks[0]);

    let color = match percentage {
        80..=100 => Color::Green,
        50..=79 => Color::Yellow,
        _ => Color::Red,
    };
    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL))
        .gauge_style(Style::default().fg(color))
        .percent(percentage.min(100) as u16);
    f.render_widget(gauge, chunks[1]);
}
