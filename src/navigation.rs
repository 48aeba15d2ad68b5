use crate::models::{AssessmentTopic, DashboardConfig, DashboardModule};

/// Strips one trailing `/` so `/react/` and `/react` resolve alike. The root
/// path is left untouched.
pub fn normalize_route(path: &str) -> &str {
    if path.len() > 1 {
        path.strip_suffix('/').unwrap_or(path)
    } else {
        path
    }
}

/// Where a navigable path leads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination<'a> {
    Topic(&'a AssessmentTopic),
    Dashboard(&'a DashboardConfig),
    DashboardModule {
        dashboard: &'a DashboardConfig,
        module: &'a DashboardModule,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_ignored() {
        assert_eq!(normalize_route("/assessments/react/"), "/assessments/react");
        assert_eq!(normalize_route("/assessments/react"), "/assessments/react");
        assert_eq!(normalize_route("/"), "/");
        assert_eq!(normalize_route(""), "");
    }
}
