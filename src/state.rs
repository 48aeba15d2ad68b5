use crate::config::Config;
use crate::content::Content;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub content: &'static Content,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(content: &'static Content, config: Config) -> Self {
        Self {
            content,
            config: Arc::new(config),
        }
    }
}
