//! Embedded catalog content and the process-wide instance built from it.
//!
//! Authoring data lives in `data/` as JSON and is compiled into the binary.
//! [`content`] parses and indexes it on first use; every later call returns
//! the same immutable instance.

use crate::catalog::AssessmentCatalog;
use crate::dashboards::DashboardRegistry;
use crate::error::{CatalogError, Entity};
use crate::models::{AssessmentTopic, DashboardConfig, Icon, LearningTopic, QuestionRecord};
use crate::navigation::Destination;
use crate::validation::{validate_catalog, ValidationError};
use once_cell::sync::OnceCell;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::{info, warn};

const ASSESSMENTS_JSON: &str = include_str!("../data/assessments.json");
const DASHBOARDS_JSON: &str = include_str!("../data/dashboards.json");

const QUESTION_BANKS: &[(&str, &str)] = &[
    ("react", include_str!("../data/questions/react.json")),
    ("nodejs", include_str!("../data/questions/nodejs.json")),
    ("clean-code", include_str!("../data/questions/clean-code.json")),
    ("python", include_str!("../data/questions/python.json")),
    ("databases", include_str!("../data/questions/databases.json")),
    ("docker", include_str!("../data/questions/docker.json")),
    ("kubernetes", include_str!("../data/questions/kubernetes.json")),
    ("containerization", include_str!("../data/questions/containerization.json")),
    ("frontend-fundamentals", include_str!("../data/questions/frontend-fundamentals.json")),
    ("backend-fundamentals", include_str!("../data/questions/backend-fundamentals.json")),
];

const LEARNING_PATHS: &[(&str, &str)] = &[("react", include_str!("../data/learning/react.json"))];

static CONTENT: OnceCell<Content> = OnceCell::new();

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct TopicEntry {
    id: String,
    title: String,
    description: String,
    icon: Icon,
    route: String,
    time_limit: u32,
    #[serde(default)]
    question_count: Option<usize>,
    #[serde(default)]
    attempt_size: Option<usize>,
    #[serde(default)]
    question_bank: Option<String>,
}

/// Raw JSON documents a catalog is built from.
#[derive(Debug, Clone, Copy)]
pub struct Sources<'a> {
    pub assessments: &'a str,
    pub dashboards: &'a str,
    /// `(bank name, JSON array of questions)` pairs.
    pub banks: &'a [(&'a str, &'a str)],
    /// `(dashboard id, JSON array of learning topics)` pairs.
    pub learning_paths: &'a [(&'a str, &'a str)],
}

pub fn embedded_sources() -> Sources<'static> {
    Sources {
        assessments: ASSESSMENTS_JSON,
        dashboards: DASHBOARDS_JSON,
        banks: QUESTION_BANKS,
        learning_paths: LEARNING_PATHS,
    }
}

fn parse<'de, T: Deserialize<'de>>(source_name: &str, raw: &'de str) -> Result<T, CatalogError> {
    serde_json::from_str(raw).map_err(|source| CatalogError::Parse {
        source_name: source_name.to_string(),
        source,
    })
}

/// Parsed but not yet indexed content. Duplicate ids and colliding routes
/// survive at this stage so [`RawContent::validate`] can report them.
#[derive(Debug, Clone)]
pub struct RawContent {
    pub topics: Vec<AssessmentTopic>,
    pub dashboards: Vec<DashboardConfig>,
}

impl RawContent {
    pub fn parse(sources: &Sources<'_>) -> Result<Self, CatalogError> {
        let entries: Vec<TopicEntry> = parse("assessments", sources.assessments)?;
        let mut dashboards: Vec<DashboardConfig> = parse("dashboards", sources.dashboards)?;
        for &(dashboard_id, raw) in sources.learning_paths {
            let learning_topics: Vec<LearningTopic> = parse(&format!("learning path {dashboard_id}"), raw)?;
            let dashboard = dashboards
                .iter_mut()
                .find(|d| d.id == dashboard_id)
                .ok_or_else(|| CatalogError::not_found(Entity::Dashboard, dashboard_id))?;
            if !dashboard.learning_topics.is_empty() {
                return Err(CatalogError::Duplicate { entity: Entity::LearningPath, key: dashboard_id.to_string() });
            }
            dashboard.learning_topics = learning_topics;
        }

        let mut banks: HashMap<&str, Vec<QuestionRecord>> = HashMap::with_capacity(sources.banks.len());
        for &(name, raw) in sources.banks {
            let questions: Vec<QuestionRecord> = parse(&format!("question bank {name}"), raw)?;
            if banks.insert(name, questions).is_some() {
                return Err(CatalogError::Duplicate { entity: Entity::QuestionBank, key: name.to_string() });
            }
        }

        let mut claimed: HashMap<String, String> = HashMap::new();
        let mut topics = Vec::with_capacity(entries.len());
        for entry in entries {
            let bank = entry.question_bank.unwrap_or_else(|| entry.id.clone());
            // a bank belongs to exactly one topic
            if let Some(owner) = claimed.get(&bank) {
                warn!(bank = %bank, owner = %owner, topic = %entry.id, "question bank already claimed");
                return Err(CatalogError::Duplicate { entity: Entity::QuestionBank, key: bank });
            }
            let questions = banks.remove(bank.as_str()).ok_or_else(|| CatalogError::MissingQuestionBank {
                topic_id: entry.id.clone(),
                bank: bank.clone(),
            })?;
            claimed.insert(bank, entry.id.clone());
            topics.push(AssessmentTopic {
                question_count: entry.question_count.unwrap_or(questions.len()),
                id: entry.id,
                title: entry.title,
                description: entry.description,
                icon: entry.icon,
                route: entry.route,
                questions,
                time_limit: entry.time_limit,
                attempt_size: entry.attempt_size,
            });
        }
        for name in banks.keys() {
            warn!(bank = %name, "question bank is not referenced by any topic");
        }

        Ok(Self { topics, dashboards })
    }

    pub fn validate(&self) -> Vec<ValidationError> {
        validate_catalog(&self.topics, &self.dashboards)
    }
}

/// Indexed, read-only catalog content.
#[derive(Debug, Clone, Default)]
pub struct Content {
    catalog: AssessmentCatalog,
    dashboards: DashboardRegistry,
}

impl Content {
    pub fn from_raw(raw: RawContent) -> Result<Self, CatalogError> {
        let catalog = AssessmentCatalog::new(raw.topics)?;
        let dashboards = DashboardRegistry::new(raw.dashboards)?;
        if let Some(topic) = catalog.list_topics().find(|t| dashboards.owns_route(&t.route)) {
            return Err(CatalogError::Duplicate { entity: Entity::Route, key: topic.route.clone() });
        }
        Ok(Self { catalog, dashboards })
    }

    pub fn from_sources(sources: &Sources<'_>) -> Result<Self, CatalogError> {
        Self::from_raw(RawContent::parse(sources)?)
    }

    pub fn catalog(&self) -> &AssessmentCatalog {
        &self.catalog
    }

    pub fn dashboards(&self) -> &DashboardRegistry {
        &self.dashboards
    }

    /// Assessment topics take precedence; dashboards and their modules are
    /// tried only when no topic owns the path.
    pub fn resolve(&self, path: &str) -> Option<Destination<'_>> {
        self.catalog
            .resolve_route(path)
            .map(Destination::Topic)
            .or_else(|| self.dashboards.resolve_route(path))
    }
}

/// The process-wide catalog, built from the embedded sources on first call.
pub fn content() -> Result<&'static Content, CatalogError> {
    CONTENT.get_or_try_init(|| {
        let content = Content::from_sources(&embedded_sources())?;
        info!(
            topics = content.catalog.len(),
            questions = content.catalog.question_total(),
            dashboards = content.dashboards.len(),
            "catalog initialized"
        );
        Ok(content)
    })
}
