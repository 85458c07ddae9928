use std::path::PathBuf;

pub const DB_ENV_VAR: &str = "STEM_INSIGHT_DB";
pub const LOG_ENV_VAR: &str = "STEM_INSIGHT_LOG";
pub const DEFAULT_LOG_FILTER: &str = "warn";

const APP_DIR_NAME: &str = "stem-insight";
const DEFAULT_DB_NAME: &str = "stem-insight.db";

#[derive(Debug, Clone)]
pub struct Config {
    /// `None` when there is nowhere to keep a database.
    pub db_path: Option<PathBuf>,
}

impl Config {
    /// `--db` wins over the environment, which wins over the config directory.
    pub fn resolve(db_override: Option<PathBuf>) -> Self {
        let db_path = pick_db_path(
            db_override,
            std::env::var(DB_ENV_VAR).ok(),
            dirs::config_dir(),
        );
        Self { db_path }
    }
}

fn pick_db_path(
    db_override: Option<PathBuf>,
    env_path: Option<String>,
    config_dir: Option<PathBuf>,
) -> Option<PathBuf> {
    if let Some(path) = db_override {
        return Some(path);
    }
    if let Some(path) = env_path {
        return Some(PathBuf::from(path));
    }

    let app_dir = config_dir?.join(APP_DIR_NAME);
    if let Err(e) = std::fs::create_dir_all(&app_dir) {
        log::warn!("could not create {}: {}", app_dir.display(), e);
    }
    Some(app_dir.join(DEFAULT_DB_NAME))
}

/// Set up `env_logger`, reading the filter from `STEM_INSIGHT_LOG`.
pub fn init_logging() {
    let env = env_logger::Env::default().filter_or(LOG_ENV_VAR, DEFAULT_LOG_FILTER);
    // A second init (tests, embedding) is harmless.
    let _ = env_logger::Builder::from_env(env).try_init();
}
