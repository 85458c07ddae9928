use serde::Serialize;

use crate::error::{Error, Result};
use crate::models::{choice_letter, Biome, Question, QuestionFormat, Skill, Subject};

/// Presentation metadata for a biome on the world-select screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct World {
    pub biome: Biome,
    pub label: &'static str,
    pub difficulty: &'static str,
    pub stars: u8,
    pub grade_text: &'static str,
    pub description: &'static str,
}

pub const WORLDS: [World; 3] = [
    World {
        biome: Biome::Grass,
        label: "Plains",
        difficulty: "Easy",
        stars: 1,
        grade_text: "Grade 6",
        description: "Peaceful lands. Good for beginners.",
    },
    World {
        biome: Biome::Forest,
        label: "Forest",
        difficulty: "Normal",
        stars: 2,
        grade_text: "Grade 7",
        description: "Dense trees. Watch out for shadows.",
    },
    World {
        biome: Biome::Desert,
        label: "Desert",
        difficulty: "Hard",
        stars: 3,
        grade_text: "Grade 8",
        description: "Harsh environment. Survival mode.",
    },
];

pub struct QuestionBank {
    questions: Vec<Question>,
}

impl QuestionBank {
    pub fn new(questions: Vec<Question>) -> Self {
        Self { questions }
    }

    pub fn all(&self) -> &[Question] {
        &self.questions
    }

    pub fn get(&self, id: &str) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == id)
    }

    pub fn by_biome(&self, biome: Biome) -> Vec<&Question> {
        self.questions.iter().filter(|q| q.biome == biome).collect()
    }

    pub fn filter(&self, biome: Option<Biome>, subject: Option<Subject>) -> Vec<&Question> {
        self.questions
            .iter()
            .filter(|q| biome.map_or(true, |b| q.biome == b))
            .filter(|q| subject.map_or(true, |s| q.subject == s))
            .collect()
    }

    /// Built-in catalog shipped with the binary.
    pub fn builtin() -> Self {
        Self::new(vec![
            // Forest
            multiple_choice(
                "f-1",
                Biome::Forest,
                Subject::Bio,
                7,
                "Which layer of the rainforest receives the most sunlight?",
                &["Forest Floor", "Understory", "Canopy", "Emergent Layer"],
                3,
                "The Emergent Layer consists of the tallest trees, which poke out above the canopy.",
                Skill::Knowledge,
                "Concept Error",
            ),
            short_answer(
                "f-2",
                Biome::Forest,
                Subject::Math,
                7,
                "A bamboo tree grows 3 cm per hour. How many centimeters in 24 hours?",
                "72",
                "3 cm/hr x 24 hr = 72 cm.",
                Skill::Calculation,
                "Careless",
            ),
            multiple_choice(
                "f-3",
                Biome::Forest,
                Subject::Chem,
                7,
                "Which gas do leaves release during photosynthesis?",
                &["Carbon dioxide", "Oxygen", "Nitrogen", "Methane"],
                1,
                "Plants take in carbon dioxide and release oxygen as a by-product.",
                Skill::Knowledge,
                "Misreading",
            ),
            // Desert
            multiple_choice(
                "d-1",
                Biome::Desert,
                Subject::Bio,
                7,
                "Which adaptation helps camels survive in the desert?",
                &["Thick fur", "Webbed feet", "Storing fat in humps", "Gills"],
                2,
                "Camels store fat in their humps, which can be broken down for energy and water.",
                Skill::Observation,
                "Misreading",
            ),
            short_answer(
                "d-2",
                Biome::Desert,
                Subject::Math,
                8,
                "Temp drops from 40°C to -5°C. Difference?",
                "45",
                "40 - (-5) = 45.",
                Skill::Logic,
                "Concept Error",
            ),
            short_answer(
                "d-3",
                Biome::Desert,
                Subject::Math,
                8,
                "A cactus stores 12 L of water and loses 1.5 L per week. After how many weeks is it empty?",
                "8",
                "12 / 1.5 = 8 weeks.",
                Skill::Calculation,
                "Complex Logic",
            ),
            // Grass
            multiple_choice(
                "g-1",
                Biome::Grass,
                Subject::Bio,
                6,
                "Which animal is a primary consumer?",
                &["Lion", "Zebra", "Vulture", "Hyena"],
                1,
                "Zebras eat grass, making them primary consumers.",
                Skill::Knowledge,
                "Concept Error",
            ),
            short_answer(
                "g-2",
                Biome::Grass,
                Subject::Math,
                6,
                "A field is 20 m long and 15 m wide. What is its area in square meters?",
                "300",
                "20 m x 15 m = 300 m².",
                Skill::Calculation,
                "Careless",
            ),
        ])
    }
}

#[allow(clippy::too_many_arguments)]
fn multiple_choice(
    id: &str,
    biome: Biome,
    subject: Subject,
    grade: u8,
    prompt: &str,
    options: &[&str],
    answer_index: usize,
    analysis: &str,
    skill: Skill,
    blind_spot: &str,
) -> Question {
    Question {
        id: id.to_string(),
        biome,
        subject,
        grade,
        prompt: prompt.to_string(),
        format: QuestionFormat::MultipleChoice {
            options: options.iter().map(|o| o.to_string()).collect(),
            answer_index,
        },
        analysis: analysis.to_string(),
        skill,
        blind_spot: blind_spot.to_string(),
    }
}

#[allow(clippy::too_many_arguments)]
fn short_answer(
    id: &str,
    biome: Biome,
    subject: Subject,
    grade: u8,
    prompt: &str,
    answer_text: &str,
    analysis: &str,
    skill: Skill,
    blind_spot: &str,
) -> Question {
    Question {
        id: id.to_string(),
        biome,
        subject,
        grade,
        prompt: prompt.to_string(),
        format: QuestionFormat::ShortAnswer {
            answer_text: answer_text.to_string(),
        },
        analysis: analysis.to_string(),
        skill,
        blind_spot: blind_spot.to_string(),
    }
}

/// Decide whether `response` answers `question` correctly.
///
/// Multiple choice accepts a letter (`b`) or a 1-based number (`2`).
/// Short answers are compared loosely: case and anything outside `[a-z0-9]`
/// are ignored, and a response containing the expected answer counts.
pub fn grade(question: &Question, response: &str) -> Result<bool> {
    let response = response.trim();
    if response.is_empty() {
        return Err(Error::EmptyAnswer);
    }

    match &question.format {
        QuestionFormat::MultipleChoice {
            options,
            answer_index,
        } => {
            let picked = parse_choice(response, options.len())?;
            Ok(picked == *answer_index)
        }
        QuestionFormat::ShortAnswer { answer_text } => {
            let given = normalize(response);
            let expected = normalize(answer_text);
            Ok(given == expected || (!expected.is_empty() && given.contains(&expected)))
        }
    }
}

fn parse_choice(response: &str, option_count: usize) -> Result<usize> {
    let invalid = || Error::InvalidChoice {
        response: response.to_string(),
        first: 'A',
        last: choice_letter(option_count.saturating_sub(1)),
    };

    let index = if let Ok(n) = response.parse::<usize>() {
        n.checked_sub(1).ok_or_else(invalid)?
    } else {
        let mut chars = response.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if c.is_ascii_alphabetic() => {
                (c.to_ascii_uppercase() as u8 - b'A') as usize
            }
            _ => return Err(invalid()),
        }
    };

    if index < option_count {
        Ok(index)
    } else {
        Err(invalid())
    }
}

fn normalize(s: &str) -> String {
    s.to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    mod bank_tests {
        use super::*;
        use std::collections::HashSet;

        #[test]
        fn builtin_ids_are_unique() {
            let bank = QuestionBank::builtin();
            let ids: HashSet<&str> = bank.all().iter().map(|q| q.id.as_str()).collect();
            assert_eq!(ids.len(), bank.all().len());
        }

        #[test]
        fn builtin_multiple_choice_answers_in_range() {
            let bank = QuestionBank::builtin();
            for q in bank.all() {
                if let QuestionFormat::MultipleChoice {
                    options,
                    answer_index,
                } = &q.format
                {
                    assert!(*answer_index < options.len(), "bad answer for {}", q.id);
                }
            }
        }

        #[test]
        fn every_world_has_questions() {
            let bank = QuestionBank::builtin();
            for world in WORLDS {
                assert!(!bank.by_biome(world.biome).is_empty());
            }
        }

        #[test]
        fn get_finds_by_id() {
            let bank = QuestionBank::builtin();
            assert_eq!(bank.get("d-2").unwrap().subject, Subject::Math);
            assert!(bank.get("x-9").is_none());
        }

        #[test]
        fn filter_by_biome_and_subject() {
            let bank = QuestionBank::builtin();
            let qs = bank.filter(Some(Biome::Desert), Some(Subject::Math));
            assert_eq!(qs.len(), 2);
            assert!(qs
                .iter()
                .all(|q| q.biome == Biome::Desert && q.subject == Subject::Math));
        }

        #[test]
        fn filter_without_constraints_returns_all() {
            let bank = QuestionBank::builtin();
            assert_eq!(bank.filter(None, None).len(), bank.all().len());
        }

        #[test]
        fn by_biome_keeps_bank_order() {
            let bank = QuestionBank::builtin();
            let ids: Vec<&str> = bank
                .by_biome(Biome::Forest)
                .iter()
                .map(|q| q.id.as_str())
                .collect();
            assert_eq!(ids, vec!["f-1", "f-2", "f-3"]);
        }
    }

    mod grade_tests {
        use super::*;

        fn bank() -> QuestionBank {
            QuestionBank::builtin()
        }

        #[test]
        fn multiple_choice_letter() {
            let bank = bank();
            let q = bank.get("g-1").unwrap();
            assert!(grade(q, "b").unwrap());
            assert!(grade(q, "B").unwrap());
            assert!(!grade(q, "a").unwrap());
        }

        #[test]
        fn multiple_choice_number_is_one_based() {
            let bank = bank();
            let q = bank.get("g-1").unwrap();
            assert!(grade(q, "2").unwrap());
            assert!(!grade(q, "1").unwrap());
        }

        #[test]
        fn multiple_choice_out_of_range() {
            let bank = bank();
            let q = bank.get("g-1").unwrap();
            assert!(matches!(
                grade(q, "e"),
                Err(Error::InvalidChoice { last: 'D', .. })
            ));
            assert!(matches!(grade(q, "0"), Err(Error::InvalidChoice { .. })));
            assert!(matches!(grade(q, "5"), Err(Error::InvalidChoice { .. })));
            assert!(matches!(grade(q, "zebra"), Err(Error::InvalidChoice { .. })));
        }

        #[test]
        fn short_answer_exact() {
            let bank = bank();
            let q = bank.get("f-2").unwrap();
            assert!(grade(q, "72").unwrap());
            assert!(!grade(q, "27").unwrap());
        }

        #[test]
        fn short_answer_ignores_units_and_case() {
            let bank = bank();
            let q = bank.get("f-2").unwrap();
            assert!(grade(q, "72 cm").unwrap());
            assert!(grade(q, " 72CM ").unwrap());
        }

        #[test]
        fn short_answer_negative_sign_is_stripped() {
            let bank = bank();
            let q = bank.get("d-2").unwrap();
            assert!(grade(q, "45").unwrap());
            assert!(grade(q, "45°C").unwrap());
        }

        #[test]
        fn empty_response_rejected() {
            let bank = bank();
            let q = bank.get("f-2").unwrap();
            assert!(matches!(grade(q, "   "), Err(Error::EmptyAnswer)));
        }

        #[test]
        fn normalize_strips_punctuation() {
            assert_eq!(normalize("Hello, World! 42"), "helloworld42");
        }
    }
}
