//! Advisory consistency checks over authored catalog data.
//!
//! Nothing here runs while serving requests. The `catalog-check` binary and
//! the test suite call [`validate_catalog`] and report every issue at once.

use crate::models::{AssessmentTopic, DashboardConfig, LearningTopic};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::fmt;
use thiserror::Error;

pub const MIN_OPTIONS: usize = 2;
pub const MAX_OPTIONS: usize = 6;

static SLUG: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-z0-9]+(-[a-z0-9]+)*$").expect("slug pattern compiles"));

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Namespace {
    Topic,
    Dashboard,
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Namespace::Topic => "topic",
            Namespace::Dashboard => "dashboard",
        })
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ValidationError {
    #[error("{topic_id}: question {question_id} has correct answer {answer:?} which is not one of its options")]
    OrphanAnswer { topic_id: String, question_id: String, answer: String },

    #[error("{topic_id}: question id {question_id} is used at positions {first} and {duplicate}")]
    DuplicateQuestionId { topic_id: String, question_id: String, first: usize, duplicate: usize },

    #[error("{topic_id}: declared question count {declared} does not match the {actual} questions in the bank")]
    CountMismatch { topic_id: String, declared: usize, actual: usize },

    #[error("{topic_id}: question {question_id} repeats the prompt of {original_id}")]
    DuplicatePrompt { topic_id: String, question_id: String, original_id: String },

    #[error("{topic_id}: question {question_id} lists option {option:?} more than once")]
    DuplicateOption { topic_id: String, question_id: String, option: String },

    #[error("{topic_id}: question {question_id} has {count} options, expected 2 to 6")]
    OptionCount { topic_id: String, question_id: String, count: usize },

    #[error("{owner}: {field} must not be empty")]
    EmptyField { owner: String, field: String },

    #[error("{topic_id}: attempt size {attempt_size} must be between 1 and the {available} questions in the bank")]
    InvalidAttemptSize { topic_id: String, attempt_size: usize, available: usize },

    #[error("dashboard {dashboard_id}: learning topic {topic_id} is declared more than once")]
    DuplicateLearningTopic { dashboard_id: String, topic_id: String },

    #[error("dashboard {dashboard_id}: learning topic {topic_id} repeats subtopic {subtopic_id}")]
    DuplicateSubtopic { dashboard_id: String, topic_id: String, subtopic_id: String },

    #[error("{topic_id}: time limit must be a positive number of minutes")]
    InvalidTimeLimit { topic_id: String },

    #[error("{namespace} id {id:?} is not a lowercase slug")]
    InvalidId { namespace: Namespace, id: String },

    #[error("{namespace} id {id} is declared more than once")]
    DuplicateId { namespace: Namespace, id: String },

    #[error("{owner}: route {route:?} must start with '/'")]
    InvalidRoute { owner: String, route: String },

    #[error("route {route} is claimed by both {first} and {second}")]
    RouteCollision { route: String, first: String, second: String },
}

impl ValidationError {
    pub fn severity(&self) -> Severity {
        match self {
            ValidationError::DuplicatePrompt { .. } => Severity::Warning,
            _ => Severity::Error,
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity() == Severity::Error
    }
}

pub fn has_errors(issues: &[ValidationError]) -> bool {
    issues.iter().any(ValidationError::is_error)
}

fn normalize_prompt(prompt: &str) -> String {
    prompt.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase()
}

/// Checks one topic and its question bank. Returns every issue found; an
/// empty list means the topic is consistent.
pub fn validate_topic(topic: &AssessmentTopic) -> Vec<ValidationError> {
    let mut issues = Vec::new();
    let topic_id = topic.id.as_str();
    let owner = format!("topic {topic_id}");

    for (field, value) in [("title", &topic.title), ("description", &topic.description)] {
        if value.trim().is_empty() {
            issues.push(ValidationError::EmptyField { owner: owner.clone(), field: field.into() });
        }
    }
    if topic.time_limit == 0 {
        issues.push(ValidationError::InvalidTimeLimit { topic_id: topic_id.into() });
    }
    if topic.question_count != topic.questions.len() {
        issues.push(ValidationError::CountMismatch {
            topic_id: topic_id.into(),
            declared: topic.question_count,
            actual: topic.questions.len(),
        });
    }

    if let Some(attempt_size) = topic.attempt_size {
        if attempt_size == 0 || attempt_size > topic.questions.len() {
            issues.push(ValidationError::InvalidAttemptSize {
                topic_id: topic_id.into(),
                attempt_size,
                available: topic.questions.len(),
            });
        }
    }

    let mut ids: HashMap<&str, usize> = HashMap::new();
    let mut prompts: HashMap<String, &str> = HashMap::new();
    for (i, q) in topic.questions.iter().enumerate() {
        match ids.get(q.id.as_str()) {
            Some(&first) => issues.push(ValidationError::DuplicateQuestionId {
                topic_id: topic_id.into(),
                question_id: q.id.clone(),
                first,
                duplicate: i,
            }),
            None => {
                ids.insert(q.id.as_str(), i);
            }
        }

        for (field, value) in [
            ("id", &q.id),
            ("prompt", &q.prompt),
            ("explanation", &q.explanation),
            ("category", &q.category),
        ] {
            if value.trim().is_empty() {
                issues.push(ValidationError::EmptyField {
                    owner: owner.clone(),
                    field: format!("questions[{i}].{field}"),
                });
            }
        }

        if !(MIN_OPTIONS..=MAX_OPTIONS).contains(&q.options.len()) {
            issues.push(ValidationError::OptionCount {
                topic_id: topic_id.into(),
                question_id: q.id.clone(),
                count: q.options.len(),
            });
        }
        let mut seen_options = HashSet::new();
        for option in &q.options {
            if !seen_options.insert(option.as_str()) {
                issues.push(ValidationError::DuplicateOption {
                    topic_id: topic_id.into(),
                    question_id: q.id.clone(),
                    option: option.clone(),
                });
            }
        }
        if !q.options.contains(&q.correct_answer) {
            issues.push(ValidationError::OrphanAnswer {
                topic_id: topic_id.into(),
                question_id: q.id.clone(),
                answer: q.correct_answer.clone(),
            });
        }

        let key = normalize_prompt(&q.prompt);
        match prompts.get(&key) {
            Some(original) => issues.push(ValidationError::DuplicatePrompt {
                topic_id: topic_id.into(),
                question_id: q.id.clone(),
                original_id: (*original).to_string(),
            }),
            None => {
                prompts.insert(key, q.id.as_str());
            }
        }
    }

    issues
}

fn check_id<'a>(namespace: Namespace, id: &'a str, seen: &mut HashSet<&'a str>, issues: &mut Vec<ValidationError>) {
    if !SLUG.is_match(id) {
        issues.push(ValidationError::InvalidId { namespace, id: id.into() });
    }
    if !seen.insert(id) {
        issues.push(ValidationError::DuplicateId { namespace, id: id.into() });
    }
}

fn non_empty(owner: &str, fields: &[(&str, &str)], issues: &mut Vec<ValidationError>) {
    for (field, value) in fields {
        if value.trim().is_empty() {
            issues.push(ValidationError::EmptyField { owner: owner.into(), field: field.to_string() });
        }
    }
}

/// Learning topic ids are unique per dashboard and subtopic ids per topic.
/// Every topic needs at least one subtopic and every subtopic needs content.
fn validate_learning_path(dashboard_id: &str, topics: &[LearningTopic], issues: &mut Vec<ValidationError>) {
    let mut topic_ids = HashSet::new();
    for topic in topics {
        let owner = format!("dashboard {dashboard_id} learning topic {}", topic.id);
        if !topic_ids.insert(topic.id.as_str()) {
            issues.push(ValidationError::DuplicateLearningTopic {
                dashboard_id: dashboard_id.into(),
                topic_id: topic.id.clone(),
            });
        }
        non_empty(
            &owner,
            &[
                ("id", topic.id.as_str()),
                ("title", topic.title.as_str()),
                ("category", topic.category.as_str()),
                ("description", topic.description.as_str()),
            ],
            issues,
        );
        if topic.subtopics.is_empty() {
            issues.push(ValidationError::EmptyField { owner: owner.clone(), field: "subtopics".into() });
        }

        let mut subtopic_ids = HashSet::new();
        for (i, sub) in topic.subtopics.iter().enumerate() {
            if !subtopic_ids.insert(sub.id.as_str()) {
                issues.push(ValidationError::DuplicateSubtopic {
                    dashboard_id: dashboard_id.into(),
                    topic_id: topic.id.clone(),
                    subtopic_id: sub.id.clone(),
                });
            }
            let fields = [("id", &sub.id), ("title", &sub.title), ("content", &sub.content)];
            for (field, value) in fields {
                if value.trim().is_empty() {
                    issues.push(ValidationError::EmptyField {
                        owner: owner.clone(),
                        field: format!("subtopics[{i}].{field}"),
                    });
                }
            }
        }
    }
}

fn check_route(route: &str, owner: String, routes: &mut HashMap<String, String>, issues: &mut Vec<ValidationError>) {
    if !route.starts_with('/') {
        issues.push(ValidationError::InvalidRoute { owner: owner.clone(), route: route.into() });
    }
    let key = crate::navigation::normalize_route(route).to_string();
    match routes.get(&key) {
        Some(first) => issues.push(ValidationError::RouteCollision {
            route: key,
            first: first.clone(),
            second: owner,
        }),
        None => {
            routes.insert(key, owner);
        }
    }
}

/// Runs [`validate_topic`] on every topic and adds the catalog-wide checks:
/// id format and uniqueness per namespace, and route uniqueness across
/// topics, dashboards and dashboard modules.
pub fn validate_catalog(topics: &[AssessmentTopic], dashboards: &[DashboardConfig]) -> Vec<ValidationError> {
    let mut issues = Vec::new();
    let mut routes = HashMap::new();

    let mut topic_ids = HashSet::new();
    for topic in topics {
        check_id(Namespace::Topic, &topic.id, &mut topic_ids, &mut issues);
        check_route(&topic.route, format!("topic {}", topic.id), &mut routes, &mut issues);
        issues.extend(validate_topic(topic));
    }

    let mut dashboard_ids = HashSet::new();
    for dashboard in dashboards {
        let owner = format!("dashboard {}", dashboard.id);
        check_id(Namespace::Dashboard, &dashboard.id, &mut dashboard_ids, &mut issues);
        check_route(&dashboard.route, owner.clone(), &mut routes, &mut issues);
        non_empty(
            &owner,
            &[("title", dashboard.title.as_str()), ("description", dashboard.description.as_str())],
            &mut issues,
        );
        for module in &dashboard.modules {
            check_route(
                &module.route,
                format!("dashboard {} module {}", dashboard.id, module.number),
                &mut routes,
                &mut issues,
            );
        }
        validate_learning_path(&dashboard.id, &dashboard.learning_topics, &mut issues);
    }

    issues
}
