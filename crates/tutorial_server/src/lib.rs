//! REST server for the tutorial catalogue.
//!
//! # Routes
//! - `GET /` welcome message
//! - `GET|POST|DELETE /api/tutorials` list (optional `?title=`), create, delete all
//! - `GET /api/tutorials/published` published tutorials only
//! - `GET|PUT|DELETE /api/tutorials/:id` fetch, partial update, delete
//!
//! `POST` and `PUT` bodies may be JSON or `application/x-www-form-urlencoded`.
//! Every error body has the shape `{"message": "..."}`.
//!
//! # Configuration
//! Read from the environment by [`config::ServerConfig::from_env`]: `PORT`,
//! `BIND_ADDR`, `DATABASE_PATH` (`:memory:` for a throwaway store),
//! `LOG_LEVEL`, `LOG_DIR`, `CORS_ALLOW_ORIGIN`, `MAX_BODY_BYTES`.

use std::{future::Future, io, time::Duration};

use axum::{
    extract::DefaultBodyLimit,
    http::{header::CONTENT_TYPE, Method},
    middleware::from_fn,
    routing::get,
    Router,
};
use log::{error, info};
use rusqlite::Connection;
use thiserror::Error;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tutorial_core::db::{open_db, open_db_in_memory, DbError};

pub mod config;
pub mod error;
mod middleware;
pub mod routes;
pub mod state;

pub use config::{ApiConfig, ConfigError, DatabaseLocation, ServerConfig};
pub use error::AppError;
pub use routes::MessageResponse;
pub use state::AppState;

use middleware::request_logging_middleware;
use routes::{
    create_tutorial_handler, delete_all_tutorials_handler, delete_tutorial_handler,
    delete_published_handler, get_tutorial_handler, list_published_handler,
    list_tutorials_handler, update_published_handler, update_tutorial_handler, welcome_handler,
};

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("failed to open database: {0}")]
    Database(#[from] DbError),

    #[error("server I/O error: {0}")]
    Io(#[from] io::Error),
}

pub fn build_router(state: AppState) -> Router {
    let allow_origin = match &state.api.cors_allow_origin {
        Some(origin) => AllowOrigin::exact(origin.clone()),
        None => AllowOrigin::any(),
    };
    let cors = CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .route("/", get(welcome_handler))
        .route(
            "/api/tutorials",
            get(list_tutorials_handler)
                .post(create_tutorial_handler)
                .delete(delete_all_tutorials_handler),
        )
        .route(
            "/api/tutorials/published",
            get(list_published_handler)
                .put(update_published_handler)
                .delete(delete_published_handler),
        )
        .route(
            "/api/tutorials/:id",
            get(get_tutorial_handler)
                .put(update_tutorial_handler)
                .delete(delete_tutorial_handler),
        )
        .layer(DefaultBodyLimit::max(state.api.max_body_bytes))
        .layer(cors)
        .layer(from_fn(request_logging_middleware))
        .with_state(state)
}

/// Opens the configured store with migrations applied.
pub fn open_database(location: &DatabaseLocation) -> Result<Connection, DbError> {
    match location {
        DatabaseLocation::File(path) => open_db(path),
        DatabaseLocation::InMemory => open_db_in_memory(),
    }
}

/// Serves the router on an already-bound listener until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, state: AppState, shutdown: F) -> io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown)
        .await
}

/// Opens storage, binds the configured address and serves until SIGINT/SIGTERM.
pub async fn run(config: ServerConfig) -> Result<(), ServerError> {
    info!(
        "event=server_start module=server status=start version={}",
        tutorial_core::core_version()
    );
    let conn = open_database(&config.database)?;
    let state = AppState::new(conn, config.api.clone());

    let address = config.socket_addr();
    let listener = TcpListener::bind(address).await.map_err(|err| {
        error!("event=server_bind module=server status=error address={address} error={err}");
        err
    })?;
    info!("event=server_bind module=server status=ok address={address}");

    serve(listener, state, shutdown_signal()).await?;

    info!("event=server_stop module=server status=ok");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("event=shutdown module=server status=start signal=ctrl_c"),
            Err(err) => {
                error!("event=shutdown module=server status=error error_code=ctrl_c_handler error={err}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("event=shutdown module=server status=start signal=terminate");
            }
            Err(err) => {
                error!("event=shutdown module=server status=error error_code=sigterm_handler error={err}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
