use axum::{http::StatusCode, response::{IntoResponse, Response}, Json};
use serde::Serialize;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Topic,
    Dashboard,
    Route,
    Question,
    QuestionBank,
    LearningPath,
    LearningTopic,
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Entity::Topic => "topic",
            Entity::Dashboard => "dashboard",
            Entity::Route => "route",
            Entity::Question => "question",
            Entity::QuestionBank => "question bank",
            Entity::LearningPath => "learning path",
            Entity::LearningTopic => "learning topic",
        })
    }
}

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("{entity} not found: {key}")]
    NotFound { entity: Entity, key: String },

    #[error("{entity} {key} is declared more than once")]
    Duplicate { entity: Entity, key: String },

    #[error("question bank {bank} referenced by topic {topic_id} does not exist")]
    MissingQuestionBank { topic_id: String, bank: String },

    #[error("failed to parse {source_name}: {source}")]
    Parse {
        source_name: String,
        #[source]
        source: serde_json::Error,
    },
}

impl CatalogError {
    pub fn not_found(entity: Entity, key: impl Into<String>) -> Self {
        CatalogError::NotFound { entity, key: key.into() }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, CatalogError::NotFound { .. })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorDetail {
    pub field: String,
    pub issue: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    pub error: ErrorPayload,
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorPayload {
    pub code: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<ErrorDetail>,
    pub request_id: String,
}

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub code: &'static str,
    pub message: String,
    pub details: Vec<ErrorDetail>,
    pub request_id: String,
}

impl AppError {
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>, request_id: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
            details: Vec::new(),
            request_id: request_id.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>, request_id: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "VALIDATION_ERROR", message, request_id)
    }

    pub fn with_details(mut self, details: Vec<ErrorDetail>) -> Self {
        self.details = details;
        self
    }

    pub fn from_catalog(err: CatalogError, request_id: impl Into<String>) -> Self {
        match &err {
            CatalogError::NotFound { entity, key } => Self::new(
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                err.to_string(),
                request_id,
            )
            .with_details(vec![ErrorDetail {
                field: entity.to_string(),
                issue: format!("{key} does not exist"),
            }]),
            _ => {
                tracing::error!("catalog failure while serving request: {}", err);
                Self::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "catalog unavailable",
                    request_id,
                )
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let payload = ErrorBody {
            error: ErrorPayload {
                code: self.code,
                message: self.message,
                details: self.details,
                request_id: self.request_id,
            },
        };
        (self.status, Json(payload)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_maps_to_404() {
        let err = AppError::from_catalog(CatalogError::not_found(Entity::Dashboard, "nonexistent"), "req-1");
        assert_eq!(err.status, StatusCode::NOT_FOUND);
        assert_eq!(err.code, "NOT_FOUND");
        assert_eq!(err.message, "dashboard not found: nonexistent");
        assert_eq!(err.details[0].field, "dashboard");
    }

    #[test]
    fn load_failures_are_internal() {
        let err = AppError::from_catalog(
            CatalogError::Duplicate { entity: Entity::Topic, key: "react".into() },
            "req-2",
        );
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.details.is_empty());
    }
}
