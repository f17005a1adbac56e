//! Uploads `cert.pem` / `key.pem` to Qiniu and switches `$DOMAIN` over to the new
//! certificate with HTTPS forced. Mostly useful for comparing against the shell
//! version, so it logs every intermediate value at debug level.

use std::process::ExitCode;

use anyhow::Context;
use qiniu_cert_uploader::{
    infra::{components::AppComponents, config::Config, errors::AppError},
    pipeline,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "info,qiniu_cert_uploader=debug,qiniu_cert_shared=debug";

/// `RUST_LOG` if set, else `LOG_LEVEL`, else the debug-heavy default.
fn init_tracing() -> Result<(), anyhow::Error> {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        let level =
            std::env::var("LOG_LEVEL").unwrap_or_else(|_| DEFAULT_LOG_FILTER.to_string());
        EnvFilter::try_new(&level)
            .with_context(|| format!("invalid log level filter: {level}"))?
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    if let Err(e) = init_tracing() {
        eprintln!("{e:#}");
        return ExitCode::FAILURE;
    }

    match start().await {
        Ok(completed) => {
            info!(
                cert_id = %completed.certificate_id,
                "Certificate upload and domain configuration complete"
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn start() -> Result<pipeline::Completed, AppError> {
    let config = Config::load_env().map_err(AppError::MissingConfiguration)?;
    let app_components = AppComponents::create(config)?;

    info!("Uploading certificate to Qiniu");
    pipeline::run(&app_components.config, &app_components.qiniu_client).await
}
