use crate::error::{CatalogError, Entity};
use crate::models::{DashboardConfig, LearningTopic};
use crate::navigation::{normalize_route, Destination};
use indexmap::IndexMap;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy)]
enum RouteTarget {
    Dashboard(usize),
    Module(usize, usize),
}

/// Learning-path dashboards in declaration order. Card order on the home
/// page follows this order.
#[derive(Debug, Clone, Default)]
pub struct DashboardRegistry {
    dashboards: IndexMap<String, DashboardConfig>,
    by_route: HashMap<String, RouteTarget>,
}

impl DashboardRegistry {
    pub fn new(dashboards: Vec<DashboardConfig>) -> Result<Self, CatalogError> {
        let mut index: IndexMap<String, DashboardConfig> = IndexMap::with_capacity(dashboards.len());
        let mut by_route: HashMap<String, RouteTarget> = HashMap::new();
        for dashboard in dashboards {
            if index.contains_key(&dashboard.id) {
                return Err(CatalogError::Duplicate { entity: Entity::Dashboard, key: dashboard.id });
            }
            let position = index.len();
            let routes = std::iter::once((dashboard.route.as_str(), RouteTarget::Dashboard(position))).chain(
                dashboard
                    .modules
                    .iter()
                    .enumerate()
                    .map(|(m, module)| (module.route.as_str(), RouteTarget::Module(position, m))),
            );
            for (route, target) in routes {
                let route = normalize_route(route).to_string();
                if by_route.insert(route.clone(), target).is_some() {
                    return Err(CatalogError::Duplicate { entity: Entity::Route, key: route });
                }
            }
            tracing::debug!(dashboard = %dashboard.id, modules = dashboard.modules.len(), "indexed dashboard");
            index.insert(dashboard.id.clone(), dashboard);
        }
        Ok(Self { dashboards: index, by_route })
    }

    pub fn len(&self) -> usize {
        self.dashboards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dashboards.is_empty()
    }

    pub fn list_dashboards(&self) -> impl ExactSizeIterator<Item = &DashboardConfig> + '_ {
        self.dashboards.values()
    }

    pub fn get_dashboard(&self, id: &str) -> Result<&DashboardConfig, CatalogError> {
        self.dashboards
            .get(id)
            .ok_or_else(|| CatalogError::not_found(Entity::Dashboard, id))
    }

    /// Learning topics attached to a dashboard, in authoring order. Empty for
    /// dashboards without a learning path.
    pub fn list_learning_topics(&self, dashboard_id: &str) -> Result<&[LearningTopic], CatalogError> {
        self.get_dashboard(dashboard_id).map(|d| d.learning_topics.as_slice())
    }

    pub fn get_learning_topic(&self, dashboard_id: &str, topic_id: &str) -> Result<&LearningTopic, CatalogError> {
        self.get_dashboard(dashboard_id)?
            .learning_topics
            .iter()
            .find(|t| t.id == topic_id)
            .ok_or_else(|| CatalogError::not_found(Entity::LearningTopic, format!("{dashboard_id}/{topic_id}")))
    }

    pub fn resolve_route(&self, path: &str) -> Option<Destination<'_>> {
        let target = *self.by_route.get(normalize_route(path))?;
        match target {
            RouteTarget::Dashboard(i) => self
                .dashboards
                .get_index(i)
                .map(|(_, dashboard)| Destination::Dashboard(dashboard)),
            RouteTarget::Module(i, m) => {
                let (_, dashboard) = self.dashboards.get_index(i)?;
                let module = dashboard.modules.get(m)?;
                Some(Destination::DashboardModule { dashboard, module })
            }
        }
    }

    pub(crate) fn owns_route(&self, path: &str) -> bool {
        self.by_route.contains_key(normalize_route(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::tests::learning_topic;
    use crate::models::{DashboardModule, Icon};

    fn dashboard(id: &str, route: &str) -> DashboardConfig {
        DashboardConfig {
            id: id.into(),
            title: format!("{id} dashboard"),
            description: "Learning path".into(),
            icon: Icon::Emoji("🚀".into()),
            route: route.into(),
            modules: Vec::new(),
            learning_topics: Vec::new(),
        }
    }

    fn registry() -> DashboardRegistry {
        let mut data = dashboard("data-engineering-learning", "/data-engineering");
        data.modules = (1..=2)
            .map(|n| DashboardModule {
                number: n,
                title: format!("Module {n}"),
                description: "desc".into(),
                icon: Icon::Component("Database".into()),
                level: "Beginner".into(),
                route: format!("/data-engineering/module/{n}"),
            })
            .collect();
        let mut react = dashboard("react", "/react");
        react.learning_topics = vec![
            learning_topic("hooks-fundamentals", &["introduction-to-hooks", "useState-hook"]),
            learning_topic("state-management", &["context-api"]),
        ];
        DashboardRegistry::new(vec![dashboard("dsa", "/dashboard/dsa"), data, react, dashboard("devops", "/devops")]).unwrap()
    }

    #[test]
    fn lists_in_declaration_order() {
        let r = registry();
        let ids: Vec<_> = r.list_dashboards().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["dsa", "data-engineering-learning", "react", "devops"]);
        assert_eq!(r.len(), 4);
    }

    #[test]
    fn get_dashboard_is_idempotent() {
        let r = registry();
        let first = r.get_dashboard("devops").unwrap().clone();
        let second = r.get_dashboard("devops").unwrap();
        assert_eq!(&first, second);
    }

    #[test]
    fn unknown_dashboard_is_not_found() {
        let err = registry().get_dashboard("nonexistent").unwrap_err();
        assert!(matches!(err, CatalogError::NotFound { entity: Entity::Dashboard, ref key } if key == "nonexistent"));
    }

    #[test]
    fn resolves_dashboards_and_modules() {
        let r = registry();
        assert!(matches!(r.resolve_route("/devops"), Some(Destination::Dashboard(d)) if d.id == "devops"));
        match r.resolve_route("/data-engineering/module/2/") {
            Some(Destination::DashboardModule { dashboard, module }) => {
                assert_eq!(dashboard.id, "data-engineering-learning");
                assert_eq!(module.number, 2);
            }
            other => panic!("unexpected destination: {other:?}"),
        }
        assert!(r.resolve_route("/assessments/react").is_none());
    }

    #[test]
    fn duplicate_route_is_rejected() {
        let err = DashboardRegistry::new(vec![dashboard("react", "/react"), dashboard("react-path", "/react")]).unwrap_err();
        assert!(matches!(err, CatalogError::Duplicate { entity: Entity::Route, .. }));
    }

    #[test]
    fn learning_topics_are_listed_and_found() {
        let r = registry();
        let ids: Vec<_> = r.list_learning_topics("react").unwrap().iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["hooks-fundamentals", "state-management"]);
        assert!(r.list_learning_topics("devops").unwrap().is_empty());

        let hooks = r.get_learning_topic("react", "hooks-fundamentals").unwrap();
        assert_eq!(hooks.subtopic("useState-hook").unwrap().title, "useState-hook lesson");

        let err = r.get_learning_topic("react", "redux").unwrap_err();
        assert!(matches!(err, CatalogError::NotFound { entity: Entity::LearningTopic, ref key } if key == "react/redux"));
        let err = r.list_learning_topics("vue").unwrap_err();
        assert!(matches!(err, CatalogError::NotFound { entity: Entity::Dashboard, .. }));
    }
}
