use std::collections::HashMap;

use serde::Serialize;

use crate::bank::{QuestionBank, World, WORLDS};
use crate::models::{AnswerRecord, Progress, ProgressKind, Subject};

/// Completion of the bank questions matching `identifier`.
///
/// Only unique questions count: each question contributes at most once, via
/// its latest record. Records for questions missing from the bank are ignored.
pub fn get_progress(
    bank: &QuestionBank,
    records: &[AnswerRecord],
    identifier: &str,
    kind: ProgressKind,
) -> Progress {
    let latest: HashMap<&str, bool> = records
        .iter()
        .map(|r| (r.question_id.as_str(), r.is_correct))
        .collect();

    let mut total = 0u32;
    let mut correct = 0u32;
    let mut wrong = 0u32;

    for q in bank.all() {
        let matches = match kind {
            ProgressKind::Subject => q.subject.as_str() == identifier,
            ProgressKind::Biome => q.biome.as_str() == identifier,
        };
        if !matches {
            continue;
        }
        total += 1;
        match latest.get(q.id.as_str()) {
            Some(true) => correct += 1,
            Some(false) => wrong += 1,
            None => {}
        }
    }

    let completed = correct + wrong;
    Progress {
        identifier: identifier.to_string(),
        kind,
        total,
        correct,
        wrong,
        completed,
        percentage: percentage(completed, total),
    }
}

/// `round(100 * part / whole)`, or 0 when `whole` is 0.
pub(crate) fn percentage(part: u32, whole: u32) -> u32 {
    if whole == 0 {
        0
    } else {
        (part as f64 / whole as f64 * 100.0).round() as u32
    }
}

/// Distinct subjects in the order they first appear in the bank.
pub fn subject_list(bank: &QuestionBank) -> Vec<Subject> {
    let mut subjects = Vec::new();
    for q in bank.all() {
        if !subjects.contains(&q.subject) {
            subjects.push(q.subject);
        }
    }
    subjects
}

#[derive(Debug, Clone, Serialize)]
pub struct WorldProgress {
    pub world: World,
    pub progress: Progress,
    pub subjects: Vec<Subject>,
}

/// One entry per world, as shown on the world-select screen.
pub fn world_overview(bank: &QuestionBank, records: &[AnswerRecord]) -> Vec<WorldProgress> {
    WORLDS
        .iter()
        .map(|world| {
            let mut subjects = Vec::new();
            for q in bank.by_biome(world.biome) {
                if !subjects.contains(&q.subject) {
                    subjects.push(q.subject);
                }
            }
            WorldProgress {
                world: *world,
                progress: get_progress(bank, records, world.biome.as_str(), ProgressKind::Biome),
                subjects,
            }
        })
        .collect()
}
