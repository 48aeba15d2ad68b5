use crate::attempt::{draw_attempt, grade, grade_drawn, AttemptReport, SubmittedAnswer};
use crate::error::{AppError, CatalogError, Entity};
use crate::models::{
    AssessmentTopic, DashboardConfig, DashboardModule, Difficulty, Icon, LearningLevel, LearningTopic, QuestionRecord,
};
use crate::navigation::Destination;
use crate::state::AppState;
use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::Json;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::info;

fn request_id_from_headers(headers: &HeaderMap) -> String {
    headers
        .get("x-request-id")
        .and_then(|h| h.to_str().ok())
        .map(|s| s.to_string())
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string())
}

fn catalog_error(req_id: &str) -> impl FnOnce(CatalogError) -> AppError + '_ {
    move |err| AppError::from_catalog(err, req_id)
}

#[derive(Debug, Serialize)]
pub struct ListResponse<T> {
    pub items: Vec<T>,
    pub total: usize,
}

impl<T> From<Vec<T>> for ListResponse<T> {
    fn from(items: Vec<T>) -> Self {
        Self { total: items.len(), items }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicSummary {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub icon: &'static Icon,
    pub route: &'static str,
    pub time_limit: u32,
    pub question_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attempt_size: Option<usize>,
    pub categories: Vec<&'static str>,
}

impl From<&'static AssessmentTopic> for TopicSummary {
    fn from(topic: &'static AssessmentTopic) -> Self {
        Self {
            id: &topic.id,
            title: &topic.title,
            description: &topic.description,
            icon: &topic.icon,
            route: &topic.route,
            time_limit: topic.time_limit,
            question_count: topic.question_count,
            attempt_size: topic.attempt_size,
            categories: topic.categories(),
        }
    }
}

/// A question as handed out for an attempt, without its answer key.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionView {
    pub id: &'static str,
    pub prompt: &'static str,
    pub options: &'static [String],
    pub category: &'static str,
    pub difficulty: Difficulty,
}

impl From<&'static QuestionRecord> for QuestionView {
    fn from(q: &'static QuestionRecord) -> Self {
        Self {
            id: &q.id,
            prompt: &q.prompt,
            options: &q.options,
            category: &q.category,
            difficulty: q.difficulty,
        }
    }
}

pub async fn list_topics(State(state): State<AppState>) -> Json<ListResponse<TopicSummary>> {
    let items: Vec<TopicSummary> = state.content.catalog().list_topics().map(TopicSummary::from).collect();
    Json(items.into())
}

pub async fn get_topic(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<TopicSummary>, AppError> {
    let req_id = request_id_from_headers(&headers);
    let topic = state.content.catalog().get_topic(&id).map_err(catalog_error(&req_id))?;
    Ok(Json(topic.into()))
}

pub async fn get_questions(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<ListResponse<&'static QuestionRecord>>, AppError> {
    let req_id = request_id_from_headers(&headers);
    let questions = state.content.catalog().get_questions(&id).map_err(catalog_error(&req_id))?;
    Ok(Json(questions.iter().collect::<Vec<_>>().into()))
}

#[derive(Debug, Deserialize)]
pub struct AttemptQuery {
    pub size: Option<usize>,
    pub seed: Option<u64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptOut {
    pub topic_id: &'static str,
    pub time_limit: u32,
    pub questions: Vec<QuestionView>,
}

pub async fn start_attempt(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Query(query): Query<AttemptQuery>,
) -> Result<Json<AttemptOut>, AppError> {
    let req_id = request_id_from_headers(&headers);
    if query.size == Some(0) {
        return Err(AppError::bad_request("size must be positive", req_id));
    }
    let topic = state.content.catalog().get_topic(&id).map_err(catalog_error(&req_id))?;
    let mut rng = match query.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let questions: Vec<QuestionView> = draw_attempt(topic, query.size, &mut rng)
        .into_iter()
        .map(QuestionView::from)
        .collect();
    info!(topic = %topic.id, questions = questions.len(), request_id = %req_id, "attempt drawn");
    Ok(Json(AttemptOut {
        topic_id: &topic.id,
        time_limit: topic.time_limit,
        questions,
    }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradePayload {
    /// Ids handed out by the attempt endpoint. When present, omitted
    /// questions are graded as unanswered.
    #[serde(default)]
    pub question_ids: Vec<String>,
    pub answers: Vec<SubmittedAnswer>,
}

pub async fn grade_attempt(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(payload): Json<GradePayload>,
) -> Result<Json<AttemptReport>, AppError> {
    let req_id = request_id_from_headers(&headers);
    let topic = state.content.catalog().get_topic(&id).map_err(catalog_error(&req_id))?;
    let graded = if payload.question_ids.is_empty() {
        grade(topic, &payload.answers)
    } else {
        grade_drawn(topic, &payload.question_ids, &payload.answers)
    };
    let report = graded.map_err(|err| match err {
        CatalogError::NotFound { entity: Entity::Question, key } => {
            AppError::bad_request(format!("unknown question {key}"), req_id.clone())
        }
        other => AppError::from_catalog(other, req_id.clone()),
    })?;
    info!(topic = %topic.id, score = report.score_pct, request_id = %req_id, "attempt graded");
    Ok(Json(report))
}

pub async fn list_dashboards(State(state): State<AppState>) -> Json<ListResponse<&'static DashboardConfig>> {
    let items: Vec<_> = state.content.dashboards().list_dashboards().collect();
    Json(items.into())
}

pub async fn get_dashboard(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<&'static DashboardConfig>, AppError> {
    let req_id = request_id_from_headers(&headers);
    let dashboard = state.content.dashboards().get_dashboard(&id).map_err(catalog_error(&req_id))?;
    Ok(Json(dashboard))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LearningTopicSummary {
    pub id: &'static str,
    pub title: &'static str,
    pub category: &'static str,
    pub description: &'static str,
    pub estimated_time: &'static str,
    pub difficulty: LearningLevel,
    pub prerequisites: &'static [String],
    pub subtopics: Vec<&'static str>,
}

impl From<&'static LearningTopic> for LearningTopicSummary {
    fn from(topic: &'static LearningTopic) -> Self {
        Self {
            id: &topic.id,
            title: &topic.title,
            category: &topic.category,
            description: &topic.description,
            estimated_time: &topic.estimated_time,
            difficulty: topic.difficulty,
            prerequisites: &topic.prerequisites,
            subtopics: topic.subtopics.iter().map(|s| s.title.as_str()).collect(),
        }
    }
}

pub async fn list_learning_topics(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<ListResponse<LearningTopicSummary>>, AppError> {
    let req_id = request_id_from_headers(&headers);
    let topics = state.content.dashboards().list_learning_topics(&id).map_err(catalog_error(&req_id))?;
    let items: Vec<LearningTopicSummary> = topics.iter().map(LearningTopicSummary::from).collect();
    Ok(Json(items.into()))
}

pub async fn get_learning_topic(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path((id, topic_id)): Path<(String, String)>,
) -> Result<Json<&'static LearningTopic>, AppError> {
    let req_id = request_id_from_headers(&headers);
    let topic = state
        .content
        .dashboards()
        .get_learning_topic(&id, &topic_id)
        .map_err(catalog_error(&req_id))?;
    Ok(Json(topic))
}

#[derive(Debug, Deserialize)]
pub struct ResolveQuery {
    pub path: String,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum DestinationOut {
    Topic {
        topic: TopicSummary,
    },
    Dashboard {
        dashboard: &'static DashboardConfig,
    },
    DashboardModule {
        dashboard_id: &'static str,
        module: &'static DashboardModule,
    },
}

impl From<Destination<'static>> for DestinationOut {
    fn from(destination: Destination<'static>) -> Self {
        match destination {
            Destination::Topic(topic) => DestinationOut::Topic { topic: topic.into() },
            Destination::Dashboard(dashboard) => DestinationOut::Dashboard { dashboard },
            Destination::DashboardModule { dashboard, module } => DestinationOut::DashboardModule {
                dashboard_id: &dashboard.id,
                module,
            },
        }
    }
}

pub async fn resolve_route(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<ResolveQuery>,
) -> Result<Json<DestinationOut>, AppError> {
    let req_id = request_id_from_headers(&headers);
    let destination = state
        .content
        .resolve(&query.path)
        .ok_or_else(|| AppError::from_catalog(CatalogError::not_found(Entity::Route, query.path.as_str()), req_id))?;
    Ok(Json(destination.into()))
}
