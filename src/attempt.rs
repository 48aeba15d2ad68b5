use crate::error::{CatalogError, Entity};
use crate::models::{AssessmentTopic, Difficulty, QuestionRecord};
use indexmap::IndexMap;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Picks up to `size` questions uniformly without replacement. The result
/// keeps authoring order, since some categories rely on adjacent questions.
///
/// `size` falls back to the topic's `attempt_size`, then to the whole bank.
pub fn draw_attempt<'a, R: Rng + ?Sized>(
    topic: &'a AssessmentTopic,
    size: Option<usize>,
    rng: &mut R,
) -> Vec<&'a QuestionRecord> {
    let len = topic.questions.len();
    let amount = size.or(topic.attempt_size).unwrap_or(len).min(len);
    let mut picked = rand::seq::index::sample(rng, len, amount).into_vec();
    picked.sort_unstable();
    picked.into_iter().map(|i| &topic.questions[i]).collect()
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmittedAnswer {
    pub question_id: String,
    #[serde(default)]
    pub answer: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Default, PartialEq, Eq)]
pub struct Tally {
    pub correct: u32,
    pub total: u32,
}

impl Tally {
    fn record(&mut self, correct: bool) {
        self.total += 1;
        if correct {
            self.correct += 1;
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionResult {
    pub question_id: String,
    pub submitted: Option<String>,
    pub is_correct: bool,
    pub correct_answer: String,
    pub explanation: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptReport {
    pub topic_id: String,
    pub total: u32,
    pub answered: u32,
    pub correct: u32,
    pub score_pct: f64,
    pub by_category: IndexMap<String, Tally>,
    pub by_difficulty: IndexMap<Difficulty, Tally>,
    pub results: Vec<QuestionResult>,
}

impl AttemptReport {
    pub fn correct_pct(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            (self.correct as f64) * 100.0 / (self.total as f64)
        }
    }
}

/// Scores an attempt. Each listed question counts once, unanswered ones as
/// wrong; repeated entries for the same question after the first are
/// ignored. Unknown question ids fail the whole attempt.
///
/// Only the submitted entries are scored, so leaving a question out removes
/// it from `total`. Use [`grade_drawn`] when the drawn question list is known.
pub fn grade(topic: &AssessmentTopic, answers: &[SubmittedAnswer]) -> Result<AttemptReport, CatalogError> {
    let mut report = AttemptReport {
        topic_id: topic.id.clone(),
        total: 0,
        answered: 0,
        correct: 0,
        score_pct: 0.0,
        by_category: IndexMap::new(),
        by_difficulty: IndexMap::new(),
        results: Vec::with_capacity(answers.len()),
    };

    let mut seen = HashSet::new();
    for submitted in answers {
        let question = topic
            .question(&submitted.question_id)
            .ok_or_else(|| CatalogError::not_found(Entity::Question, format!("{}/{}", topic.id, submitted.question_id)))?;
        if !seen.insert(question.id.as_str()) {
            continue;
        }

        let is_correct = submitted.answer.as_deref().is_some_and(|a| question.is_correct(a));
        report.total += 1;
        if submitted.answer.is_some() {
            report.answered += 1;
        }
        if is_correct {
            report.correct += 1;
        }
        report.by_category.entry(question.category.clone()).or_default().record(is_correct);
        report.by_difficulty.entry(question.difficulty).or_default().record(is_correct);
        report.results.push(QuestionResult {
            question_id: question.id.clone(),
            submitted: submitted.answer.clone(),
            is_correct,
            correct_answer: question.correct_answer.clone(),
            explanation: question.explanation.clone(),
        });
    }

    report.score_pct = report.correct_pct();
    Ok(report)
}

/// Scores against the questions handed out for the attempt. Drawn questions
/// missing from `answers` count as unanswered; answers for questions that
/// were not drawn fail with `NotFound`. Results follow the drawn order.
pub fn grade_drawn(
    topic: &AssessmentTopic,
    drawn: &[String],
    answers: &[SubmittedAnswer],
) -> Result<AttemptReport, CatalogError> {
    let drawn_ids: HashSet<&str> = drawn.iter().map(String::as_str).collect();
    let mut submitted: HashMap<&str, &SubmittedAnswer> = HashMap::with_capacity(answers.len());
    for answer in answers {
        if !drawn_ids.contains(answer.question_id.as_str()) {
            return Err(CatalogError::not_found(Entity::Question, format!("{}/{}", topic.id, answer.question_id)));
        }
        submitted.entry(answer.question_id.as_str()).or_insert(answer);
    }

    let full: Vec<SubmittedAnswer> = drawn
        .iter()
        .map(|id| SubmittedAnswer {
            question_id: id.clone(),
            answer: submitted.get(id.as_str()).and_then(|a| a.answer.clone()),
        })
        .collect();
    grade(topic, &full)
}
