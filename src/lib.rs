pub mod attempt;
pub mod catalog;
pub mod config;
pub mod content;
pub mod dashboards;
pub mod error;
pub mod handlers;
pub mod models;
pub mod navigation;
pub mod routes;
pub mod state;
pub mod validation;

pub fn build_state() -> anyhow::Result<state::AppState> {
    let config = config::Config::from_env();
    let content = content::content()?;
    Ok(state::AppState::new(content, config))
}
