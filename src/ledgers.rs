//! Running tallies kept alongside the answer records.
//!
//! Neither ledger is derived from the records: both are bumped once per
//! attempt, repeats included, so they measure effort rather than completion.

use std::collections::BTreeMap;

use crate::error::Result;
use crate::models::{Skill, Subject, SubjectStats};
use crate::store::{self, KvStore, SKILL_SCORES_KEY, SUBJECT_STATS_KEY};

pub const SKILL_SCORE_START: u32 = 50;
pub const SKILL_SCORE_MAX: u32 = 100;
const SKILL_SCORE_GAIN: u32 = 10;
const SKILL_SCORE_LOSS: u32 = 5;

pub struct SubjectStatsLedger<'a, S: KvStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: KvStore + ?Sized> SubjectStatsLedger<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    pub fn record_attempt(&self, subject: Subject, is_correct: bool) -> Result<()> {
        let mut stats = self.all();
        let entry = stats.entry(subject).or_default();
        entry.total += 1;
        if is_correct {
            entry.correct += 1;
        }
        store::save_json(self.store, SUBJECT_STATS_KEY, &stats)
    }

    pub fn get(&self, subject: Subject) -> SubjectStats {
        self.all().get(&subject).copied().unwrap_or_default()
    }

    pub fn all(&self) -> BTreeMap<Subject, SubjectStats> {
        store::load_json(self.store, SUBJECT_STATS_KEY)
    }

    pub fn clear(&self) -> Result<()> {
        self.store.remove(SUBJECT_STATS_KEY)
    }
}

pub struct SkillScoreLedger<'a, S: KvStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: KvStore + ?Sized> SkillScoreLedger<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    pub fn scores(&self) -> BTreeMap<Skill, u32> {
        store::load_json(self.store, SKILL_SCORES_KEY)
    }

    /// Current score; a skill never answered sits at the starting score.
    pub fn score(&self, skill: Skill) -> u32 {
        self.scores()
            .get(&skill)
            .copied()
            .unwrap_or(SKILL_SCORE_START)
    }

    pub fn update(&self, skill: Skill, is_correct: bool) -> Result<u32> {
        let mut scores = self.scores();
        let current = scores.get(&skill).copied().unwrap_or(SKILL_SCORE_START);
        let next = apply_delta(current, is_correct);
        scores.insert(skill, next);
        store::save_json(self.store, SKILL_SCORES_KEY, &scores)?;
        log::debug!("{} score {} -> {}", skill.as_str(), current, next);
        Ok(next)
    }

    pub fn clear(&self) -> Result<()> {
        self.store.remove(SKILL_SCORES_KEY)
    }
}

fn apply_delta(current: u32, is_correct: bool) -> u32 {
    if is_correct {
        (current + SKILL_SCORE_GAIN).min(SKILL_SCORE_MAX)
    } else {
        current.saturating_sub(SKILL_SCORE_LOSS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    mod subject_stats_tests {
        use super::*;

        #[test]
        fn unseen_subject_is_zeroed() {
            let store = MemoryStore::new();
            let ledger = SubjectStatsLedger::new(&store);
            assert_eq!(ledger.get(Subject::Chem), SubjectStats::default());
        }

        #[test]
        fn counts_every_attempt() {
            let store = MemoryStore::new();
            let ledger = SubjectStatsLedger::new(&store);

            ledger.record_attempt(Subject::Math, false).unwrap();
            ledger.record_attempt(Subject::Math, true).unwrap();
            ledger.record_attempt(Subject::Math, true).unwrap();

            assert_eq!(
                ledger.get(Subject::Math),
                SubjectStats {
                    correct: 2,
                    total: 3
                }
            );
        }

        #[test]
        fn subjects_are_independent() {
            let store = MemoryStore::new();
            let ledger = SubjectStatsLedger::new(&store);

            ledger.record_attempt(Subject::Math, true).unwrap();
            ledger.record_attempt(Subject::Bio, false).unwrap();

            let all = ledger.all();
            assert_eq!(all.len(), 2);
            assert_eq!(all[&Subject::Bio].correct, 0);
            assert_eq!(all[&Subject::Bio].total, 1);
        }

        #[test]
        fn persists_as_subject_keyed_object() {
            let store = MemoryStore::new();
            SubjectStatsLedger::new(&store)
                .record_attempt(Subject::Bio, true)
                .unwrap();

            let raw = store.get("subject_stats").unwrap().unwrap();
            assert_eq!(raw, "{\"bio\":{\"correct\":1,\"total\":1}}");
        }

        #[test]
        fn clear_resets() {
            let store = MemoryStore::new();
            let ledger = SubjectStatsLedger::new(&store);
            ledger.record_attempt(Subject::Math, true).unwrap();

            ledger.clear().unwrap();

            assert!(ledger.all().is_empty());
        }
    }

    mod skill_score_tests {
        use super::*;

        #[test]
        fn unseen_skill_starts_at_50() {
            let store = MemoryStore::new();
            let ledger = SkillScoreLedger::new(&store);
            assert_eq!(ledger.score(Skill::Logic), 50);
        }

        #[test]
        fn correct_adds_10() {
            let store = MemoryStore::new();
            let ledger = SkillScoreLedger::new(&store);
            assert_eq!(ledger.update(Skill::Logic, true).unwrap(), 60);
            assert_eq!(ledger.score(Skill::Logic), 60);
        }

        #[test]
        fn incorrect_subtracts_5() {
            let store = MemoryStore::new();
            let ledger = SkillScoreLedger::new(&store);
            assert_eq!(ledger.update(Skill::Knowledge, false).unwrap(), 45);
        }

        #[test]
        fn caps_at_100() {
            let store = MemoryStore::new();
            let ledger = SkillScoreLedger::new(&store);
            for _ in 0..10 {
                ledger.update(Skill::Calculation, true).unwrap();
            }
            assert_eq!(ledger.score(Skill::Calculation), 100);
        }

        #[test]
        fn floors_at_0() {
            let store = MemoryStore::new();
            let ledger = SkillScoreLedger::new(&store);
            for _ in 0..20 {
                ledger.update(Skill::Observation, false).unwrap();
            }
            assert_eq!(ledger.score(Skill::Observation), 0);
        }

        #[test]
        fn zero_score_is_not_reset_to_start() {
            let store = MemoryStore::new();
            let ledger = SkillScoreLedger::new(&store);
            for _ in 0..10 {
                ledger.update(Skill::Observation, false).unwrap();
            }
            assert_eq!(ledger.score(Skill::Observation), 0);

            assert_eq!(ledger.update(Skill::Observation, true).unwrap(), 10);
        }

        #[test]
        fn persists_with_skill_names() {
            let store = MemoryStore::new();
            SkillScoreLedger::new(&store)
                .update(Skill::Logic, true)
                .unwrap();
            let raw = store.get("skillScores").unwrap().unwrap();
            assert_eq!(raw, "{\"Logic\":60}");
        }

        #[test]
        fn clear_returns_to_start() {
            let store = MemoryStore::new();
            let ledger = SkillScoreLedger::new(&store);
            ledger.update(Skill::Logic, true).unwrap();
            ledger.clear().unwrap();
            assert_eq!(ledger.score(Skill::Logic), 50);
        }

        #[test]
        fn apply_delta_bounds() {
            assert_eq!(apply_delta(95, true), 100);
            assert_eq!(apply_delta(3, false), 0);
            assert_eq!(apply_delta(50, false), 45);
        }
    }
}
