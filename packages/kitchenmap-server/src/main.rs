use std::process::ExitCode;

use kitchenmap_core::AppConfig;
use tracing::error;

#[tokio::main]
async fn main() -> ExitCode {
    kitchenmap_server::init_tracing();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    match kitchenmap_server::start_server(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Server stopped with an error");
            ExitCode::FAILURE
        }
    }
}
