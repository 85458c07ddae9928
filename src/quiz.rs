use crate::error::{Error, Result};
use crate::models::{AnswerOutcome, Biome, Question};
use crate::progress::percentage;
use crate::session::Session;
use crate::store::KvStore;

/// One pass through a biome's questions, in bank order.
#[derive(Debug, Clone)]
pub struct QuizRun {
    biome: Biome,
    question_ids: Vec<String>,
    index: usize,
    score: u32,
    last_outcome: Option<AnswerOutcome>,
}

impl QuizRun {
    pub fn start<S: KvStore>(session: &Session<S>, biome: Biome) -> Self {
        let question_ids = session
            .bank()
            .by_biome(biome)
            .into_iter()
            .map(|q| q.id.clone())
            .collect();
        log::debug!("starting quiz run in {}", biome.as_str());
        Self {
            biome,
            question_ids,
            index: 0,
            score: 0,
            last_outcome: None,
        }
    }

    pub fn biome(&self) -> Biome {
        self.biome
    }

    pub fn len(&self) -> usize {
        self.question_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.question_ids.is_empty()
    }

    /// Zero-based position of the current question.
    pub fn position(&self) -> usize {
        self.index
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn last_outcome(&self) -> Option<&AnswerOutcome> {
        self.last_outcome.as_ref()
    }

    pub fn current<'s, S: KvStore>(&self, session: &'s Session<S>) -> Option<&'s Question> {
        self.question_ids
            .get(self.index)
            .and_then(|id| session.bank().get(id))
    }

    /// Answer the current question. A second answer to the same question is
    /// ignored and the first outcome is returned again.
    pub fn answer<S: KvStore>(
        &mut self,
        session: &Session<S>,
        response: &str,
    ) -> Result<AnswerOutcome> {
        if let Some(outcome) = &self.last_outcome {
            return Ok(outcome.clone());
        }
        let id = self.question_ids.get(self.index).ok_or_else(|| {
            Error::UnknownQuestion(format!("#{} in {}", self.index + 1, self.biome.as_str()))
        })?;

        let outcome = session.submit(id, response)?;
        if outcome.is_correct {
            self.score += 1;
        }
        self.last_outcome = Some(outcome.clone());
        Ok(outcome)
    }

    /// Move past an answered question. Returns false when nothing is left.
    pub fn advance(&mut self) -> bool {
        if self.last_outcome.is_none() || self.is_finished() {
            return !self.is_finished();
        }
        self.last_outcome = None;
        self.index += 1;
        !self.is_finished()
    }

    pub fn is_finished(&self) -> bool {
        self.index >= self.question_ids.len()
    }

    pub fn final_percentage(&self) -> u32 {
        percentage(self.score, self.question_ids.len() as u32)
    }
}
