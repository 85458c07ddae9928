mod analysis;
mod bank;
mod config;
mod db;
mod error;
mod ledgers;
mod models;
mod profile;
mod progress;
mod quiz;
mod records;
mod session;
mod store;
mod tui;

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use bank::QuestionBank;
use config::Config;
use db::Database;
use error::Error;
use models::{Biome, JsonOutput, ProgressKind, QuestionFormat, Skill, Subject};
use session::Session;
use store::{DetachedStore, KvStore, MemoryStore};

#[derive(Parser)]
#[command(name = "stem-insight")]
#[command(about = "A biome quiz that tracks what you know and where you slip")]
#[command(version)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Database file (overrides STEM_INSIGHT_DB)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the database
    Init,

    /// Set the display name
    Login {
        /// Display name
        name: String,
    },

    /// Forget the display name
    Logout,

    /// List the worlds and your progress in each
    Worlds,

    /// List questions
    Questions {
        /// Filter by biome
        #[arg(long, short)]
        biome: Option<String>,

        /// Filter by subject
        #[arg(long, short)]
        subject: Option<String>,
    },

    /// Pick the next question to practise in a biome (stochastic selection)
    Next {
        /// Biome: grass/forest/desert
        biome: String,
    },

    /// Answer a question
    Answer {
        /// Question ID
        id: String,

        /// Choice letter or number, or the short answer text
        response: String,
    },

    /// Show completion for a subject or biome
    Progress {
        /// Subject or biome name
        identifier: String,

        /// What the identifier names: subject/biome
        #[arg(long, short, default_value = "subject")]
        kind: String,
    },

    /// List answer records
    Records,

    /// Show attempt counts per subject
    Stats,

    /// Show skill scores
    Skills {
        /// Only this skill
        skill: Option<String>,
    },

    /// Show the skill profile and blind spots
    Analysis,

    /// Clear answer history, attempt counts and skill scores
    Reset {
        /// Skip the confirmation
        #[arg(long, short)]
        yes: bool,
    },

    /// Launch interactive terminal UI
    Tui {
        /// Play without saving anything
        #[arg(long)]
        guest: bool,
    },
}

fn main() {
    config::init_logging();
    let cli = Cli::parse();
    let json = cli.json;

    if let Err(e) = run(cli) {
        if json {
            println!("{}", error_json(&e.to_string()));
        } else {
            eprintln!("Error: {}", e);
        }
        std::process::exit(1);
    }
}

fn error_json(message: &str) -> String {
    serde_json::to_string(&JsonOutput::<()>::err(message))
        .unwrap_or_else(|_| r#"{"success":false,"data":null,"error":null}"#.to_string())
}

/// Where this invocation keeps its answers.
enum Backend {
    Sqlite(Database, PathBuf),
    Guest(MemoryStore),
    Detached,
}

fn open_backend(command: &Commands, config: &Config) -> error::Result<Backend> {
    if matches!(command, Commands::Tui { guest: true }) {
        return Ok(Backend::Guest(MemoryStore::new()));
    }

    match &config.db_path {
        Some(path) => {
            let db = Database::open(path)?;
            db.init()?;
            log::debug!("using database at {}", path.display());
            Ok(Backend::Sqlite(db, path.clone()))
        }
        None => {
            log::warn!("no config directory found, progress will not be saved");
            Ok(Backend::Detached)
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::resolve(cli.db.clone());

    match open_backend(&cli.command, &config)? {
        Backend::Sqlite(db, path) => {
            if matches!(cli.command, Commands::Init) {
                return print_init(&db, &path, cli.json);
            }
            execute(cli, Session::new(QuestionBank::builtin(), db))
        }
        Backend::Guest(store) => execute(cli, Session::new(QuestionBank::builtin(), store)),
        Backend::Detached => execute(cli, Session::new(QuestionBank::builtin(), DetachedStore)),
    }
}

fn print_init(db: &Database, path: &Path, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let keys = db.keys()?;
    if json {
        println!(
            "{}",
            serde_json::to_string(&JsonOutput::ok(serde_json::json!({
                "path": path,
                "keys": keys
            })))?
        );
    } else {
        println!("Database initialized at: {}", path.display());
        for key in keys {
            let updated = db.updated_at(&key)?.unwrap_or_default();
            println!("  {:<24} {}", key, updated);
        }
    }
    Ok(())
}

fn execute<S: KvStore>(cli: Cli, session: Session<S>) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Init => {
            return Err(Error::Unavailable(
                "no database location; pass --db or set STEM_INSIGHT_DB".to_string(),
            )
            .into());
        }

        Commands::Login { name } => {
            let name = session.profile().login(&name)?;
            if cli.json {
                println!(
                    "{}",
                    serde_json::to_string(&JsonOutput::ok(serde_json::json!({
                        "username": name
                    })))?
                );
            } else {
                println!("Welcome, {}!", name);
            }
        }

        Commands::Logout => {
            session.profile().logout()?;
            if cli.json {
                println!("{}", serde_json::to_string(&JsonOutput::<()>::ok(()))?);
            } else {
                println!("Logged out.");
            }
        }

        Commands::Worlds => {
            let overview = session.world_overview();
            if cli.json {
                println!("{}", serde_json::to_string(&JsonOutput::ok(&overview))?);
            } else {
                println!("Player: {}", session.profile().username());
                println!();
                println!(
                    "{:<8} {:<8} {:<8} {:<6} {:<10} SUBJECTS",
                    "BIOME", "WORLD", "LEVEL", "STARS", "PROGRESS"
                );
                println!("{}", "-".repeat(60));
                for entry in overview {
                    let subjects: Vec<&str> =
                        entry.subjects.iter().map(|s| s.as_str()).collect();
                    println!(
                        "{:<8} {:<8} {:<8} {:<6} {:<10} {}",
                        entry.world.biome.as_str(),
                        entry.world.label,
                        entry.world.difficulty,
                        "*".repeat(entry.world.stars as usize),
                        format!(
                            "{}/{} {}%",
                            entry.progress.completed,
                            entry.progress.total,
                            entry.progress.percentage
                        ),
                        if subjects.is_empty() {
                            "-".to_string()
                        } else {
                            subjects.join(", ")
                        }
                    );
                }
            }
        }

        Commands::Questions { biome, subject } => {
            let biome = biome.as_deref().map(parse_biome).transpose()?;
            let subject = subject.as_deref().map(parse_subject).transpose()?;
            let questions = session.bank().filter(biome, subject);

            if cli.json {
                println!("{}", serde_json::to_string(&JsonOutput::ok(&questions))?);
            } else if questions.is_empty() {
                println!("No questions found.");
            } else {
                println!("{:<6} {:<7} {:<6} {:<12} PROMPT", "ID", "BIOME", "SUBJ", "SKILL");
                println!("{}", "-".repeat(78));
                for q in questions {
                    println!(
                        "{:<6} {:<7} {:<6} {:<12} {}",
                        q.id,
                        q.biome.as_str(),
                        q.subject.as_str(),
                        q.skill.as_str(),
                        truncate(&q.prompt, 44)
                    );
                }
            }
        }

        Commands::Next { biome } => {
            let biome = parse_biome(&biome)?;
            if let Some(q) = session.next_question(biome) {
                if cli.json {
                    println!("{}", serde_json::to_string(&JsonOutput::ok(q))?);
                } else {
                    println!("=== {} ({}) ===", biome.label(), q.subject.label());
                    println!();
                    println!("[{}] {}", q.id, q.prompt);
                    match &q.format {
                        QuestionFormat::MultipleChoice { options, .. } => {
                            for (i, option) in options.iter().enumerate() {
                                println!("  {}) {}", models::choice_letter(i), option);
                            }
                        }
                        QuestionFormat::ShortAnswer { .. } => {
                            println!("  (short answer)");
                        }
                    }
                    println!();
                    println!("Answer with:");
                    println!("  stem-insight answer {} <response>", q.id);
                }
            } else if cli.json {
                println!("{}", serde_json::to_string(&JsonOutput::<()>::ok(()))?);
            } else {
                println!("No questions in {} yet.", biome.label());
            }
        }

        Commands::Answer { id, response } => {
            let outcome = session.submit(&id, &response)?;
            if cli.json {
                println!("{}", serde_json::to_string(&JsonOutput::ok(&outcome))?);
            } else {
                if outcome.is_correct {
                    println!("Correct!");
                } else {
                    println!("Wrong. Correct answer: {}", outcome.correct_answer);
                }
                println!();
                println!("{}", outcome.analysis);
            }
        }

        Commands::Progress { identifier, kind } => {
            let kind = ProgressKind::from_str(&kind).ok_or(Error::InvalidKind(kind))?;
            let progress = session.progress(&identifier.to_lowercase(), kind);
            if cli.json {
                println!("{}", serde_json::to_string(&JsonOutput::ok(&progress))?);
            } else {
                println!("=== {} {} ===", kind.as_str(), progress.identifier);
                println!(
                    "Completed: {}/{} ({}%)",
                    progress.completed, progress.total, progress.percentage
                );
                println!("Correct: {}", progress.correct);
                println!("Wrong: {}", progress.wrong);
            }
        }

        Commands::Records => {
            let records = session.records().get_records();
            if cli.json {
                println!("{}", serde_json::to_string(&JsonOutput::ok(&records))?);
            } else if records.is_empty() {
                println!("No answers recorded.");
            } else {
                println!(
                    "{:<6} {:<7} {:<6} {:<12} {:<16} {:<6} WHEN",
                    "ID", "BIOME", "SUBJ", "SKILL", "BLIND SPOT", "OK"
                );
                println!("{}", "-".repeat(78));
                for r in records {
                    println!(
                        "{:<6} {:<7} {:<6} {:<12} {:<16} {:<6} {}",
                        r.question_id,
                        r.biome.as_str(),
                        r.subject.as_str(),
                        r.skill.as_str(),
                        truncate(&r.blind_spot, 15),
                        if r.is_correct { "yes" } else { "no" },
                        r.timestamp.format("%Y-%m-%d %H:%M")
                    );
                }
            }
        }

        Commands::Stats => {
            let attempts = session.subject_stats().all();
            let completion: Vec<_> = progress::subject_list(session.bank())
                .into_iter()
                .map(|s| session.progress(s.as_str(), ProgressKind::Subject))
                .collect();
            if cli.json {
                println!(
                    "{}",
                    serde_json::to_string(&JsonOutput::ok(serde_json::json!({
                        "attempts": attempts,
                        "completion": completion
                    })))?
                );
            } else {
                println!("=== Attempts per Subject ===");
                for subject in Subject::ALL {
                    let tally = session.subject_stats().get(subject);
                    println!(
                        "{:<10} {:>3}/{:<3} ({:.0}% accuracy)",
                        subject.label(),
                        tally.correct,
                        tally.total,
                        tally.accuracy()
                    );
                }
                println!();
                println!("=== Completion per Subject ===");
                for p in completion {
                    let label = Subject::from_str(&p.identifier)
                        .map(|s| s.label())
                        .unwrap_or("?");
                    println!(
                        "{:<10} {:>3}/{:<3} ({}%)",
                        label, p.completed, p.total, p.percentage
                    );
                }
            }
        }

        Commands::Skills { skill } => {
            let ledger = session.skill_scores();
            let skills = match skill {
                Some(name) => vec![Skill::from_str(&name).ok_or(Error::UnknownSkill(name))?],
                None => Skill::ALL.to_vec(),
            };
            let scores: Vec<(Skill, u32)> = skills.iter().map(|s| (*s, ledger.score(*s))).collect();

            if cli.json {
                let map: std::collections::BTreeMap<Skill, u32> = scores.into_iter().collect();
                println!("{}", serde_json::to_string(&JsonOutput::ok(&map))?);
            } else {
                println!("=== Skill Scores ===");
                for (skill, score) in scores {
                    println!(
                        "{:<12} {:>3}/{} {}",
                        skill.as_str(),
                        score,
                        ledgers::SKILL_SCORE_MAX,
                        bar(score, ledgers::SKILL_SCORE_MAX, 20)
                    );
                }
            }
        }

        Commands::Analysis => {
            let analysis = session.analysis();
            if cli.json {
                println!("{}", serde_json::to_string(&JsonOutput::ok(&analysis))?);
            } else {
                println!("=== Skill Profile (accuracy) ===");
                for stat in &analysis.skills {
                    println!(
                        "{:<12} {:>3}% {}",
                        stat.skill.as_str(),
                        stat.score,
                        bar(stat.score, stat.full_mark, 20)
                    );
                }
                println!();
                println!("=== Blind Spots ===");
                if analysis.blind_spots.is_empty() {
                    println!("None yet.");
                } else {
                    for spot in &analysis.blind_spots {
                        println!("{:<16} {}", spot.name, spot.count);
                    }
                }
                println!();
                if let Some(weakness) = analysis.primary_weakness() {
                    println!("Primary weakness: {}", weakness.name);
                }
                println!("{}", analysis.summary);
            }
        }

        Commands::Reset { yes } => {
            if !yes {
                return Err("Reset clears all answers and scores. Re-run with --yes".into());
            }
            session.reset()?;
            if cli.json {
                println!("{}", serde_json::to_string(&JsonOutput::<()>::ok(()))?);
            } else {
                println!("Progress reset.");
            }
        }

        Commands::Tui { .. } => {
            tui::run(session)?;
        }
    }

    Ok(())
}

fn parse_biome(s: &str) -> Result<Biome, Error> {
    Biome::from_str(s).ok_or_else(|| Error::UnknownBiome(s.to_string()))
}

fn parse_subject(s: &str) -> Result<Subject, Error> {
    Subject::from_str(s).ok_or_else(|| Error::UnknownSubject(s.to_string()))
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}

fn bar(value: u32, max: u32, width: usize) -> String {
    let filled = if max == 0 {
        0
    } else {
        (value.min(max) as usize * width) / max as usize
    };
    format!("[{}{}]", "#".repeat(filled), ".".repeat(width - filled))
}
