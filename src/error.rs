use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("terminal error: {0}")]
    Io(#[from] std::io::Error),

    #[error("unknown question '{0}'")]
    UnknownQuestion(String),

    #[error("unknown biome '{0}'. Use: grass, forest, or desert")]
    UnknownBiome(String),

    #[error("unknown subject '{0}'. Use: math, bio, or chem")]
    UnknownSubject(String),

    #[error("unknown skill '{0}'. Use: knowledge, calculation, logic, or observation")]
    UnknownSkill(String),

    #[error("invalid kind '{0}'. Use: subject or biome")]
    InvalidKind(String),

    #[error("invalid choice '{response}': pick one of {first}-{last}")]
    InvalidChoice {
        response: String,
        first: char,
        last: char,
    },

    #[error("answer must not be empty")]
    EmptyAnswer,

    #[error("username must not be empty")]
    EmptyUsername,
}

pub type Result<T> = std::result::Result<T, Error>;
