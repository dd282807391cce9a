use std::process::ExitCode;

use log::{error, info};
use tutorial_core::init_logging;
use tutorial_server::{run, ServerConfig};

#[tokio::main]
async fn main() -> ExitCode {
    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("configuration error: {err}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(err) = init_logging(&config.log_level, config.log_dir.as_deref()) {
        eprintln!("logging setup failed: {err}");
        return ExitCode::FAILURE;
    }
    info!(
        "event=config_loaded module=server status=ok address={} database={:?} max_body_bytes={}",
        config.socket_addr(),
        config.database,
        config.api.max_body_bytes
    );

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=server_exit module=server status=error error={err}");
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
