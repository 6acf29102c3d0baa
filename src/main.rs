use anyhow::Context;
use bridge_desktop::{ReqwestHttpClient, StdinAuthorizationPrompt, TokioFileSystem};
use core_runtime::config::UploaderConfig;
use drive_uploader::{init_logging, load_credentials, run_upload};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env is fine; the environment may already be populated
    let dotenv_path = dotenvy::dotenv().ok();

    let config = UploaderConfig::from_env().context("Failed to read configuration")?;
    init_logging(config.logging.clone()).context("Failed to initialize logging")?;
    config.warn_missing_settings();

    if let Some(path) = dotenv_path {
        info!(path = %path.display(), "Loaded environment file");
    }

    let http = Arc::new(ReqwestHttpClient::new().context("Failed to build HTTP client")?);
    let fs = Arc::new(TokioFileSystem::new());
    let prompt = Arc::new(StdinAuthorizationPrompt::new());

    let tokens = load_credentials(&config, http.clone(), fs.clone(), prompt)
        .await
        .context("Failed to obtain Google credentials")?;

    let report = run_upload(&config, &tokens, http, fs)
        .await
        .context("Upload run failed")?;

    info!(
        uploaded = report.uploaded.len(),
        skipped = report.skipped_existing.len(),
        failed = report.failed.len(),
        "Upload run finished"
    );

    Ok(())
}
