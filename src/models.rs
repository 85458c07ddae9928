use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// Worlds a question can live in
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Biome {
    Grass,
    Forest,
    Desert,
}

impl Biome {
    #[cfg(test)]
    pub const ALL: [Biome; 3] = [Biome::Grass, Biome::Forest, Biome::Desert];

    pub fn as_str(&self) -> &'static str {
        match self {
            Biome::Grass => "grass",
            Biome::Forest => "forest",
            Biome::Desert => "desert",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "grass" | "plains" | "g" => Some(Biome::Grass),
            "forest" | "f" => Some(Biome::Forest),
            "desert" | "badlands" | "d" => Some(Biome::Desert),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Biome::Grass => "Plains",
            Biome::Forest => "Forest",
            Biome::Desert => "Desert",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Subject {
    Math,
    Bio,
    Chem,
}

impl Subject {
    pub const ALL: [Subject; 3] = [Subject::Math, Subject::Bio, Subject::Chem];

    pub fn as_str(&self) -> &'static str {
        match self {
            Subject::Math => "math",
            Subject::Bio => "bio",
            Subject::Chem => "chem",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "math" | "maths" | "m" => Some(Subject::Math),
            "bio" | "biology" | "b" => Some(Subject::Bio),
            "chem" | "chemistry" | "c" => Some(Subject::Chem),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Subject::Math => "Math",
            Subject::Bio => "Biology",
            Subject::Chem => "Chemistry",
        }
    }
}

// The cognitive dimension a question targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Skill {
    Knowledge,
    Calculation,
    Logic,
    Observation,
}

impl Skill {
    pub const ALL: [Skill; 4] = [
        Skill::Knowledge,
        Skill::Calculation,
        Skill::Logic,
        Skill::Observation,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Skill::Knowledge => "Knowledge",
            Skill::Calculation => "Calculation",
            Skill::Logic => "Logic",
            Skill::Observation => "Observation",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "knowledge" => Some(Skill::Knowledge),
            "calculation" => Some(Skill::Calculation),
            "logic" => Some(Skill::Logic),
            "observation" => Some(Skill::Observation),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum QuestionFormat {
    MultipleChoice {
        options: Vec<String>,
        answer_index: usize,
    },
    ShortAnswer {
        answer_text: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    pub biome: Biome,
    pub subject: Subject,
    pub grade: u8,
    pub prompt: String,
    pub format: QuestionFormat,
    pub analysis: String,
    pub skill: Skill,
    pub blind_spot: String,
}

impl Question {
    /// Human readable form of the expected answer.
    pub fn correct_answer(&self) -> String {
        match &self.format {
            QuestionFormat::MultipleChoice {
                options,
                answer_index,
            } => match options.get(*answer_index) {
                Some(option) => format!("{}) {}", choice_letter(*answer_index), option),
                None => choice_letter(*answer_index).to_string(),
            },
            QuestionFormat::ShortAnswer { answer_text } => answer_text.clone(),
        }
    }
}

pub fn choice_letter(index: usize) -> char {
    (b'A' + (index % 26) as u8) as char
}

/// Outcome of the most recent attempt at one question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerRecord {
    pub question_id: String,
    pub subject: Subject,
    pub biome: Biome,
    pub skill: Skill,
    pub blind_spot: String,
    pub is_correct: bool,
    pub timestamp: DateTime<Utc>,
}

// Attempt tally per subject; counts repeats
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectStats {
    pub correct: u32,
    pub total: u32,
}

impl SubjectStats {
    pub fn accuracy(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            (self.correct as f64 / self.total as f64) * 100.0
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProgressKind {
    Subject,
    Biome,
}

impl ProgressKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProgressKind::Subject => "subject",
            ProgressKind::Biome => "biome",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "subject" | "s" => Some(ProgressKind::Subject),
            "biome" | "world" | "b" | "w" => Some(ProgressKind::Biome),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    pub identifier: String,
    pub kind: ProgressKind,
    pub total: u32,
    pub correct: u32,
    pub wrong: u32,
    pub completed: u32,
    pub percentage: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillStat {
    pub skill: Skill,
    pub score: u32,
    pub full_mark: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlindSpotCount {
    pub name: String,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerOutcome {
    pub question_id: String,
    pub is_correct: bool,
    pub correct_answer: String,
    pub analysis: String,
}

// JSON output wrapper for CLI
#[derive(Debug, Serialize)]
pub struct JsonOutput<T: Serialize> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T: Serialize> JsonOutput<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(msg.into()),
        }
    }
}
