use crate::error::{CatalogError, Entity};
use crate::models::{AssessmentTopic, QuestionRecord};
use crate::navigation::normalize_route;
use indexmap::IndexMap;
use std::collections::HashMap;

/// Immutable index over every assessment topic, keyed by id in authoring
/// order and by route for reverse lookups.
#[derive(Debug, Clone, Default)]
pub struct AssessmentCatalog {
    topics: IndexMap<String, AssessmentTopic>,
    by_route: HashMap<String, usize>,
}

impl AssessmentCatalog {
    /// Fails when two topics share an id or a route, since either would make
    /// lookups ambiguous.
    pub fn new(topics: Vec<AssessmentTopic>) -> Result<Self, CatalogError> {
        let mut index: IndexMap<String, AssessmentTopic> = IndexMap::with_capacity(topics.len());
        let mut by_route: HashMap<String, usize> = HashMap::with_capacity(topics.len());
        for topic in topics {
            let route = normalize_route(&topic.route).to_string();
            if index.contains_key(&topic.id) {
                return Err(CatalogError::Duplicate { entity: Entity::Topic, key: topic.id });
            }
            if by_route.contains_key(&route) {
                return Err(CatalogError::Duplicate { entity: Entity::Route, key: route });
            }
            tracing::debug!(topic = %topic.id, route = %route, questions = topic.questions.len(), "indexed topic");
            by_route.insert(route, index.len());
            index.insert(topic.id.clone(), topic);
        }
        Ok(Self { topics: index, by_route })
    }

    pub fn len(&self) -> usize {
        self.topics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }

    pub fn list_topics(&self) -> impl ExactSizeIterator<Item = &AssessmentTopic> + '_ {
        self.topics.values()
    }

    pub fn get_topic(&self, id: &str) -> Result<&AssessmentTopic, CatalogError> {
        self.topics
            .get(id)
            .ok_or_else(|| CatalogError::not_found(Entity::Topic, id))
    }

    pub fn get_questions(&self, topic_id: &str) -> Result<&[QuestionRecord], CatalogError> {
        self.get_topic(topic_id).map(|t| t.questions.as_slice())
    }

    /// Returns `None` rather than an error so callers can fall through to
    /// the dashboard registry.
    pub fn resolve_route(&self, path: &str) -> Option<&AssessmentTopic> {
        self.by_route
            .get(normalize_route(path))
            .and_then(|&i| self.topics.get_index(i))
            .map(|(_, topic)| topic)
    }

    pub fn question_total(&self) -> usize {
        self.topics.values().map(|t| t.questions.len()).sum()
    }
}
