use std::sync::Arc;

use potato_dal::Pool;

pub const DEFAULT_PAGE_SIZE: u32 = 12;
pub const DEFAULT_SEARCH_LIMIT: usize = 4;

#[derive(Clone)]
pub struct AppState {
    state: Arc<AppStateInner>,
}

impl AppState {
    pub fn new(app_config: AppConfig, pool: Pool) -> Self {
        AppState {
            state: Arc::new(AppStateInner { pool, app_config }),
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.state.app_config
    }

    pub fn pool(&self) -> &Pool {
        &self.state.pool
    }
}

struct AppStateInner {
    pool: Pool,
    app_config: AppConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Games per page in full listing
    pub page_size: u32,
    /// Max number of games returned by search
    pub search_limit: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            search_limit: DEFAULT_SEARCH_LIMIT,
        }
    }
}
