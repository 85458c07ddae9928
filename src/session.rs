use rand::Rng;

use crate::analysis::Analysis;
use crate::bank::{self, QuestionBank};
use crate::error::{Error, Result};
use crate::ledgers::{SkillScoreLedger, SubjectStatsLedger};
use crate::models::{AnswerOutcome, AnswerRecord, Biome, Progress, ProgressKind, Question};
use crate::profile::Profile;
use crate::progress::{self, WorldProgress};
use crate::records::{AttemptDraft, RecordStore};
use crate::store::KvStore;

/// A student's view of the quiz: the question bank plus their stored state.
pub struct Session<S: KvStore> {
    bank: QuestionBank,
    store: S,
}

impl<S: KvStore> Session<S> {
    pub fn new(bank: QuestionBank, store: S) -> Self {
        Self { bank, store }
    }

    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn records(&self) -> RecordStore<'_, S> {
        RecordStore::new(&self.store)
    }

    pub fn subject_stats(&self) -> SubjectStatsLedger<'_, S> {
        SubjectStatsLedger::new(&self.store)
    }

    pub fn skill_scores(&self) -> SkillScoreLedger<'_, S> {
        SkillScoreLedger::new(&self.store)
    }

    pub fn profile(&self) -> Profile<'_, S> {
        Profile::new(&self.store)
    }

    /// Grade a response and record it everywhere an answer is tracked.
    pub fn submit(&self, question_id: &str, response: &str) -> Result<AnswerOutcome> {
        let question = self
            .bank
            .get(question_id)
            .ok_or_else(|| Error::UnknownQuestion(question_id.to_string()))?;

        let is_correct = bank::grade(question, response)?;

        self.records()
            .save_record(AttemptDraft::for_question(question, is_correct))?;
        self.subject_stats()
            .record_attempt(question.subject, is_correct)?;
        self.skill_scores().update(question.skill, is_correct)?;

        Ok(AnswerOutcome {
            question_id: question.id.clone(),
            is_correct,
            correct_answer: question.correct_answer(),
            analysis: question.analysis.clone(),
        })
    }

    pub fn progress(&self, identifier: &str, kind: ProgressKind) -> Progress {
        progress::get_progress(&self.bank, &self.records().get_records(), identifier, kind)
    }

    pub fn world_overview(&self) -> Vec<WorldProgress> {
        progress::world_overview(&self.bank, &self.records().get_records())
    }

    pub fn analysis(&self) -> Analysis {
        Analysis::from_records(&self.records().get_records())
    }

    /// Pick a question from `biome`, favouring ones not yet answered and ones
    /// answered wrong last time.
    pub fn next_question(&self, biome: Biome) -> Option<&Question> {
        let mut rng = rand::thread_rng();
        self.next_question_with(biome, &mut rng)
    }

    pub fn next_question_with<R: Rng>(
        &self,
        biome: Biome,
        rng: &mut R,
    ) -> Option<&Question> {
        let candidates = self.bank.by_biome(biome);
        if candidates.is_empty() {
            return None;
        }

        let records = self.records().get_records();
        let weights: Vec<f64> = candidates
            .iter()
            .map(|q| selection_weight(&records, q))
            .collect();

        let total_weight: f64 = weights.iter().sum();
        let mut random_point = rng.gen::<f64>() * total_weight;

        for (i, weight) in weights.iter().enumerate() {
            random_point -= weight;
            if random_point <= 0.0 {
                return Some(candidates[i]);
            }
        }

        // Fallback to last
        candidates.last().copied()
    }

    /// Wipe progress: answer history and both ledgers. The username stays.
    pub fn reset(&self) -> Result<()> {
        self.records().clear_history()?;
        self.subject_stats().clear()?;
        self.skill_scores().clear()?;
        log::info!("progress reset");
        Ok(())
    }
}

fn selection_weight(records: &[AnswerRecord], question: &Question) -> f64 {
    match records.iter().find(|r| r.question_id == question.id) {
        None => 3.0,
        Some(r) if !r.is_correct => 2.0,
        Some(_) => 1.0,
    }
}
