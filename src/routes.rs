use crate::handlers;
use crate::state::AppState;
use axum::http::{HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::warn;

fn parse_origins(origins: &[String]) -> Vec<HeaderValue> {
    origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(err) => {
                warn!("ignoring invalid CORS origin {:?}: {}", origin, err);
                None
            }
        })
        .collect()
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(parse_origins(origins))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            axum::http::header::ACCEPT,
            axum::http::HeaderName::from_static("x-request-id"),
        ])
}

pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.cors_origins);

    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/api/v1/topics", get(handlers::list_topics))
        .route("/api/v1/topics/:id", get(handlers::get_topic))
        .route("/api/v1/topics/:id/questions", get(handlers::get_questions))
        .route("/api/v1/topics/:id/attempt", get(handlers::start_attempt))
        .route("/api/v1/topics/:id/grade", post(handlers::grade_attempt))
        .route("/api/v1/dashboards", get(handlers::list_dashboards))
        .route("/api/v1/dashboards/:id", get(handlers::get_dashboard))
        .route("/api/v1/dashboards/:id/topics", get(handlers::list_learning_topics))
        .route("/api/v1/dashboards/:id/topics/:topic_id", get(handlers::get_learning_topic))
        .route("/api/v1/navigation/resolve", get(handlers::resolve_route))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
