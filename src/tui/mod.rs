mod ui;
mod widgets;

use std::collections::BTreeMap;
use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use crate::analysis::Analysis;
use crate::error::{Error, Result};
use crate::models::{QuestionFormat, Skill};
use crate::progress::WorldProgress;
use crate::quiz::QuizRun;
use crate::session::Session;
use crate::store::KvStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Worlds,
    Quiz,
    Analysis,
}

impl View {
    fn next(&self) -> Self {
        match self {
            View::Worlds => View::Analysis,
            View::Analysis => View::Worlds,
            View::Quiz => View::Quiz,
        }
    }

    fn prev(&self) -> Self {
        self.next()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Normal,
    /// Typing a short answer.
    Typing,
    ConfirmReset,
}

pub struct StatefulList<T> {
    pub items: Vec<T>,
    pub selected: Option<usize>,
}

impl<T> StatefulList<T> {
    fn with_items(items: Vec<T>) -> Self {
        let selected = if items.is_empty() { None } else { Some(0) };
        Self { items, selected }
    }

    fn next(&mut self) {
        if self.items.is_empty() {
            return;
        }
        let i = match self.selected {
            Some(i) if i >= self.items.len() - 1 => 0,
            Some(i) => i + 1,
            None => 0,
        };
        self.selected = Some(i);
    }

    fn previous(&mut self) {
        if self.items.is_empty() {
            return;
        }
        let i = match self.selected {
            Some(0) => self.items.len() - 1,
            Some(i) => i - 1,
            None => 0,
        };
        self.selected = Some(i);
    }

    fn selected_item(&self) -> Option<&T> {
        self.selected.and_then(|i| self.items.get(i))
    }
}

pub struct App<S: KvStore> {
    session: Session<S>,
    pub view: View,
    pub mode: Mode,
    pub worlds: StatefulList<WorldProgress>,
    pub quiz: Option<QuizRun>,
    pub input: String,
    pub analysis: Analysis,
    pub skill_scores: BTreeMap<Skill, u32>,
    pub username: String,
    pub status: Option<String>,
    pub should_quit: bool,
}

impl<S: KvStore> App<S> {
    pub fn new(session: Session<S>) -> Self {
        let mut app = Self {
            worlds: StatefulList::with_items(session.world_overview()),
            analysis: session.analysis(),
            skill_scores: session.skill_scores().scores(),
            username: session.profile().username(),
            session,
            view: View::Worlds,
            mode: Mode::Normal,
            quiz: None,
            input: String::new(),
            status: None,
            should_quit: false,
        };
        app.status = Some(format!("Welcome, {}!", app.username));
        app
    }

    pub fn session(&self) -> &Session<S> {
        &self.session
    }

    pub fn refresh_data(&mut self) {
        let selected = self.worlds.selected;
        self.worlds = StatefulList::with_items(self.session.world_overview());
        if selected.is_some_and(|i| i < self.worlds.items.len()) {
            self.worlds.selected = selected;
        }
        self.analysis = self.session.analysis();
        self.skill_scores = self.session.skill_scores().scores();
        self.username = self.session.profile().username();
    }

    fn start_quiz(&mut self) {
        let Some(entry) = self.worlds.selected_item() else {
            return;
        };
        let run = QuizRun::start(&self.session, entry.world.biome);
        if run.is_empty() {
            self.status = Some(format!("{} has no questions yet.", entry.world.label));
            return;
        }
        self.status = None;
        self.input.clear();
        self.quiz = Some(run);
        self.view = View::Quiz;
    }

    fn leave_quiz(&mut self) {
        self.quiz = None;
        self.mode = Mode::Normal;
        self.input.clear();
        self.view = View::Worlds;
        self.refresh_data();
    }

    /// Grade `response` against the current quiz question. Invalid input is
    /// reported in the status line; storage failures are returned.
    fn submit(&mut self, response: &str) -> Result<()> {
        let Some(run) = self.quiz.as_mut() else {
            return Ok(());
        };
        match run.answer(&self.session, response) {
            Ok(outcome) => {
                self.status = Some(if outcome.is_correct {
                    "Correct!".to_string()
                } else {
                    format!("Wrong. Correct answer: {}", outcome.correct_answer)
                });
                self.mode = Mode::Normal;
                self.input.clear();
                Ok(())
            }
            Err(e @ (Error::InvalidChoice { .. } | Error::EmptyAnswer)) => {
                self.status = Some(e.to_string());
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    fn handle_typing(&mut self, key: KeyCode) -> Result<()> {
        match key {
            KeyCode::Esc => {
                self.mode = Mode::Normal;
                self.input.clear();
            }
            KeyCode::Enter => {
                let response = self.input.clone();
                self.submit(&response)?;
            }
            KeyCode::Backspace => {
                self.input.pop();
            }
            KeyCode::Char(c) => self.input.push(c),
            _ => {}
        }
        Ok(())
    }

    fn handle_confirm_reset(&mut self, key: KeyCode) -> Result<()> {
        self.mode = Mode::Normal;
        if matches!(key, KeyCode::Char('y') | KeyCode::Char('Y')) {
            self.session.reset()?;
            self.refresh_data();
            self.status = Some("Progress reset.".to_string());
        } else {
            self.status = None;
        }
        Ok(())
    }

    fn handle_quiz_key(&mut self, key: KeyCode) -> Result<()> {
        let Some(run) = self.quiz.as_mut() else {
            self.view = View::Worlds;
            return Ok(());
        };

        if run.is_finished() {
            if matches!(key, KeyCode::Enter | KeyCode::Esc | KeyCode::Char('h')) {
                self.leave_quiz();
            }
            return Ok(());
        }

        if run.last_outcome().is_some() {
            match key {
                KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Char('n') | KeyCode::Char('l') => {
                    run.advance();
                    self.status = None;
                }
                KeyCode::Esc | KeyCode::Char('h') => self.leave_quiz(),
                _ => {}
            }
            return Ok(());
        }

        let is_choice = matches!(
            run.current(&self.session).map(|q| &q.format),
            Some(QuestionFormat::MultipleChoice { .. })
        );

        match key {
            KeyCode::Esc => self.leave_quiz(),
            KeyCode::Char(c) if is_choice && c.is_ascii_alphanumeric() && c != 'h' => {
                self.submit(&c.to_string())?;
            }
            KeyCode::Char('h') => self.leave_quiz(),
            KeyCode::Enter | KeyCode::Char('i') if !is_choice => {
                self.mode = Mode::Typing;
                self.input.clear();
            }
            _ => {}
        }
        Ok(())
    }

    pub fn handle_key(&mut self, key: KeyCode, modifiers: KeyModifiers) -> Result<()> {
        match self.mode {
            Mode::Typing => return self.handle_typing(key),
            Mode::ConfirmReset => return self.handle_confirm_reset(key),
            Mode::Normal => {}
        }

        if key == KeyCode::Char('q') {
            self.should_quit = true;
            return Ok(());
        }

        if self.view == View::Quiz {
            return self.handle_quiz_key(key);
        }

        match key {
            // Refresh: Ctrl+r
            KeyCode::Char('r') if modifiers.contains(KeyModifiers::CONTROL) => {
                self.refresh_data();
            }

            KeyCode::Char('R') => {
                self.mode = Mode::ConfirmReset;
                self.status = Some("Reset all progress? (y/N)".to_string());
            }

            KeyCode::Char('h') | KeyCode::Left | KeyCode::BackTab => {
                self.view = self.view.prev();
                self.refresh_data();
            }
            KeyCode::Char('l') | KeyCode::Right | KeyCode::Tab => {
                self.view = self.view.next();
                self.refresh_data();
            }

            KeyCode::Char('j') | KeyCode::Down if self.view == View::Worlds => {
                self.worlds.next()
            }
            KeyCode::Char('k') | KeyCode::Up if self.view == View::Worlds => {
                self.worlds.previous()
            }
            KeyCode::Char('g') if !self.worlds.items.is_empty() => {
                self.worlds.selected = Some(0);
            }
            KeyCode::Char('G') if !self.worlds.items.is_empty() => {
                self.worlds.selected = Some(self.worlds.items.len() - 1);
            }

            KeyCode::Enter if self.view == View::Worlds => self.start_quiz(),

            _ => {}
        }
        Ok(())
    }
}

pub fn run<S: KvStore>(session: Session<S>) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(session);

    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn run_app<S: KvStore>(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App<S>,
) -> Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                app.handle_key(key.code, key.modifiers)?;
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}
