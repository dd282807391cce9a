use std::sync::{Arc, Mutex, PoisonError};

use log::error;
use rusqlite::Connection;
use tutorial_core::{ServiceResult, SqliteTutorialRepository, TutorialService};

use crate::{config::ApiConfig, error::AppError};

/// Shared per-process state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    db: Arc<Mutex<Connection>>,
    pub api: Arc<ApiConfig>,
}

impl AppState {
    pub fn new(conn: Connection, api: ApiConfig) -> Self {
        Self {
            db: Arc::new(Mutex::new(conn)),
            api: Arc::new(api),
        }
    }

    /// Runs one service call on the blocking pool against the shared connection.
    ///
    /// The outer error covers blocking-pool failures only; service outcomes are
    /// returned untouched for the handler to map.
    pub async fn with_service<T, F>(&self, op: F) -> Result<ServiceResult<T>, AppError>
    where
        T: Send + 'static,
        F: for<'c> FnOnce(&TutorialService<SqliteTutorialRepository<'c>>) -> ServiceResult<T>
            + Send
            + 'static,
    {
        let db = Arc::clone(&self.db);
        let joined = tokio::task::spawn_blocking(move || {
            // A panicked handler leaves the connection itself usable.
            let conn = db.lock().unwrap_or_else(PoisonError::into_inner);
            let service = TutorialService::new(SqliteTutorialRepository::new(&conn));
            op(&service)
        })
        .await;

        match joined {
            Ok(result) => Ok(result),
            Err(err) => {
                error!("event=blocking_task module=server status=error error={err}");
                Err(AppError::Internal("Database is unavailable.".to_string()))
            }
        }
    }
}
