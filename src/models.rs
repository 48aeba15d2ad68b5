use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Card icon. Topics and dashboards use emoji, dashboard modules name a
/// component from the frontend icon set.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum Icon {
    Emoji(String),
    Component(String),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct QuestionRecord {
    pub id: String,
    pub prompt: String,
    pub options: Vec<String>,
    pub correct_answer: String,
    pub explanation: String,
    pub category: String,
    pub difficulty: Difficulty,
}

impl QuestionRecord {
    /// Answers are matched by value, not by option position.
    pub fn is_correct(&self, answer: &str) -> bool {
        self.correct_answer == answer
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentTopic {
    pub id: String,
    pub title: String,
    pub description: String,
    pub icon: Icon,
    pub route: String,
    pub questions: Vec<QuestionRecord>,
    /// Minutes.
    pub time_limit: u32,
    pub question_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attempt_size: Option<usize>,
}

impl AssessmentTopic {
    pub fn question(&self, id: &str) -> Option<&QuestionRecord> {
        self.questions.iter().find(|q| q.id == id)
    }

    /// Distinct categories in the order they first appear in the bank.
    pub fn categories(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.questions
            .iter()
            .map(|q| q.category.as_str())
            .filter(|c| seen.insert(*c))
            .collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DashboardModule {
    pub number: u32,
    pub title: String,
    pub description: String,
    pub icon: Icon,
    pub level: String,
    pub route: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum LearningLevel {
    Beginner,
    Intermediate,
    Advanced,
}

/// One lesson inside a learning topic. `content` is markdown.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Subtopic {
    pub id: String,
    pub title: String,
    pub description: String,
    pub estimated_time: String,
    pub difficulty: LearningLevel,
    pub content: String,
    #[serde(default)]
    pub code_examples: Vec<String>,
    #[serde(default)]
    pub key_points: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LearningTopic {
    pub id: String,
    pub title: String,
    pub category: String,
    pub description: String,
    pub estimated_time: String,
    pub difficulty: LearningLevel,
    #[serde(default)]
    pub prerequisites: Vec<String>,
    pub subtopics: Vec<Subtopic>,
}

impl LearningTopic {
    pub fn subtopic(&self, id: &str) -> Option<&Subtopic> {
        self.subtopics.iter().find(|s| s.id == id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DashboardConfig {
    pub id: String,
    pub title: String,
    pub description: String,
    pub icon: Icon,
    pub route: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub modules: Vec<DashboardModule>,
    /// Attached from a separate learning-path document and served through
    /// its own endpoints, so it never appears in dashboard JSON.
    #[serde(skip)]
    pub learning_topics: Vec<LearningTopic>,
}
