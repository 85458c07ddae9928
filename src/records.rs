use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::models::{AnswerRecord, Biome, Question, Skill, Subject};
use crate::store::{self, KvStore, RECORDS_KEY};

/// Everything about an attempt except when it happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptDraft {
    pub question_id: String,
    pub subject: Subject,
    pub biome: Biome,
    pub skill: Skill,
    pub blind_spot: String,
    pub is_correct: bool,
}

impl AttemptDraft {
    pub fn for_question(question: &Question, is_correct: bool) -> Self {
        Self {
            question_id: question.id.clone(),
            subject: question.subject,
            biome: question.biome,
            skill: question.skill,
            blind_spot: question.blind_spot.clone(),
            is_correct,
        }
    }

    pub fn into_record(self, timestamp: DateTime<Utc>) -> AnswerRecord {
        AnswerRecord {
            question_id: self.question_id,
            subject: self.subject,
            biome: self.biome,
            skill: self.skill,
            blind_spot: self.blind_spot,
            is_correct: self.is_correct,
            timestamp,
        }
    }
}

/// Last-attempt-wins answer records, one per question.
pub struct RecordStore<'a, S: KvStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: KvStore + ?Sized> RecordStore<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    pub fn save_record(&self, attempt: AttemptDraft) -> Result<()> {
        self.save_record_at(attempt, Utc::now())
    }

    pub fn save_record_at(&self, attempt: AttemptDraft, timestamp: DateTime<Utc>) -> Result<()> {
        let mut records = self.get_records();
        let before = records.len();
        records.retain(|r| r.question_id != attempt.question_id);

        log::info!(
            "saving record for {} (correct: {}, replaced: {})",
            attempt.question_id,
            attempt.is_correct,
            before != records.len()
        );

        records.push(attempt.into_record(timestamp));
        store::save_json(self.store, RECORDS_KEY, &records)
    }

    pub fn get_records(&self) -> Vec<AnswerRecord> {
        store::load_json(self.store, RECORDS_KEY)
    }

    pub fn clear_history(&self) -> Result<()> {
        log::info!("clearing answer history");
        self.store.remove(RECORDS_KEY)
    }
}
