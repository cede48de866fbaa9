use std::sync::Arc;

use sqlx::PgPool;

use crate::core::config::Settings;
use crate::services::completion::TextCompletion;

/// Per-process context handed to every handler; built once in `run()`.
#[derive(Clone)]
pub(crate) struct AppState {
    inner: Arc<InnerState>,
}

struct InnerState {
    settings: Settings,
    db: PgPool,
    completion: Arc<dyn TextCompletion>,
}

impl AppState {
    pub(crate) fn new(settings: Settings, db: PgPool, completion: Arc<dyn TextCompletion>) -> Self {
        Self { inner: Arc::new(InnerState { settings, db, completion }) }
    }

    pub(crate) fn settings(&self) -> &Settings {
        &self.inner.settings
    }

    pub(crate) fn db(&self) -> &PgPool {
        &self.inner.db
    }

    pub(crate) fn completion(&self) -> &dyn TextCompletion {
        self.inner.completion.as_ref()
    }
}
