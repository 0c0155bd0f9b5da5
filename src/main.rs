//! Wiring & DI. Entry point: bootstrap adapters, inject into services, run UI.
//! No business logic here.

use dotenv::dotenv;
use poll_manage::adapters::http::HttpPollGateway;
use poll_manage::adapters::persistence::{FsDownload, PollJsonStore};
use poll_manage::adapters::ui::{InquireConfirm, TuiInputPort};
use poll_manage::domain::display::parse_time_zone;
use poll_manage::ports::{ConfirmPort, DownloadPort, InputPort, PollSourcePort, PollUpdatePort};
use poll_manage::shared::config::AppConfig;
use poll_manage::usecases::{ExportService, ManagePollService};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let env_loaded = dotenv();
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    match &env_loaded {
        Ok(path) => info!(path = %path.display(), "loaded .env"),
        Err(_) => info!(cwd = %cwd.display(), "no .env found (check CWD)"),
    }

    let cfg = AppConfig::load().unwrap_or_else(|e| {
        warn!(error = %e, "config not loaded, using defaults");
        AppConfig::default()
    });

    // --- Poll source + update collaborator: remote API or local JSON file ---
    let (source, updater): (Arc<dyn PollSourcePort>, Arc<dyn PollUpdatePort>) =
        if cfg.is_api_configured() {
            let api_url = cfg.api_url.clone().unwrap_or_default();
            info!(url = %api_url, "using remote poll API");
            let gateway = Arc::new(HttpPollGateway::new(
                api_url,
                cfg.poll_id.clone().unwrap_or_default(),
                cfg.api_token.clone(),
            ));
            (
                Arc::clone(&gateway) as Arc<dyn PollSourcePort>,
                gateway as Arc<dyn PollUpdatePort>,
            )
        } else {
            let poll_path = PathBuf::from(cfg.poll_path_or_default());
            if !poll_path.exists() {
                anyhow::bail!(
                    "Poll file {} not found. Set POLL_MANAGE_POLL_PATH or POLL_MANAGE_API_URL + POLL_MANAGE_POLL_ID.",
                    poll_path.display()
                );
            }
            info!(path = %poll_path.display(), "using local poll file");
            let store = Arc::new(PollJsonStore::new(&poll_path));
            (
                Arc::clone(&store) as Arc<dyn PollSourcePort>,
                store as Arc<dyn PollUpdatePort>,
            )
        };

    let viewer_tz = cfg
        .display_time_zone
        .as_deref()
        .map(parse_time_zone)
        .transpose()
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    // --- Services ---
    let confirm: Arc<dyn ConfirmPort> = Arc::new(InquireConfirm);
    let manage = Arc::new(ManagePollService::new(updater, confirm));

    let export_dir = cfg.export_dir_or_default();
    info!(path = %export_dir, "export directory");
    let download: Arc<dyn DownloadPort> = Arc::new(FsDownload::new(&export_dir));
    let export = Arc::new(ExportService::new(download, viewer_tz));

    let input_port: Arc<dyn InputPort> = Arc::new(TuiInputPort::new(source, manage, export));

    // --- Run (manage menu) ---
    input_port
        .run()
        .await
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    Ok(())
}
