use std::path::PathBuf;

use anyhow::{Context, Result};
use clipfetch::config::{Config, CONFIG_FILE};
use clipfetch::logging::init_logging;
use clipfetch::{DownloadResult, VideoResolutionService};
use time::macros::format_description;
use time::OffsetDateTime;
use tokio::signal::unix::{signal, SignalKind};
use tracing::{error, info};

async fn save(config: &Config, result: &DownloadResult) -> Result<PathBuf> {
    let stamp = OffsetDateTime::now_utc()
        .format(format_description!("[year][month][day]-[hour][minute][second]"))?;
    let path = config.output_dir.join(format!(
        "{}-{}.mp4",
        result.platform.name().to_lowercase(),
        stamp
    ));
    tokio::fs::write(&path, result.bytes())
        .await
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(path)
}

fn describe(result: &DownloadResult) -> String {
    let mut parts = vec![format!("{} video", result.platform)];
    if let Some(author) = &result.author {
        parts.push(format!("author @{author}"));
    }
    if let Some(duration) = result.duration_seconds {
        parts.push(format!("duration {duration}s"));
    }
    parts.push(format!(
        "size {:.2} MB",
        result.size_bytes() as f64 / (1024.0 * 1024.0)
    ));
    parts.join(", ")
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();

    let config = match Config::get_config() {
        Ok(c) => c,
        Err(e) => {
            error!("Error reading {}: {}", CONFIG_FILE, e);
            std::process::exit(1);
        }
    };

    let text = std::env::args().skip(1).collect::<Vec<_>>().join(" ");
    if text.trim().is_empty() {
        eprintln!("usage: clipfetch <text containing a TikTok or Shopee link>");
        std::process::exit(2);
    }

    let service = VideoResolutionService::from_config(&config).context("building HTTP client")?;
    info!("resolving {text:?}");

    let mut sigterm = signal(SignalKind::terminate()).context("creating SIGTERM handler")?;

    // Dropping the resolution future aborts any in-flight request
    let outcome = tokio::select! {
        outcome = service.resolve_and_download(&text) => outcome,
        _ = tokio::signal::ctrl_c() => {
            info!("Received SIGINT, exiting");
            return Ok(());
        }
        _ = sigterm.recv() => {
            info!("Received SIGTERM, exiting");
            return Ok(());
        }
    };

    match outcome {
        Ok(result) => {
            let path = save(&config, &result).await?;
            info!("{} saved to {}", describe(&result), path.display());
            Ok(())
        }
        Err(failure) => {
            error!(kind = %failure.kind, "{failure}");
            std::process::exit(1);
        }
    }
}
