use abrscraper::{fetch, process};
use anyhow::Result;
use reqwest::Client;
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};
use tokio::time::sleep;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

/// Where extracted residential-address CSVs land.
static OUT_DIR: &str = "rsdt_data";
/// Courtesy pause between prefectures.
const REQUEST_DELAY: Duration = Duration::from_secs(1);

#[tokio::main]
async fn main() -> Result<()> {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env).init();
    info!("startup");

    let out_dir = PathBuf::from(OUT_DIR);
    fs::create_dir_all(&out_dir)?;

    // Prefecture codes are fixed: 01 through 47.
    let client = Client::new();
    for code in (1..=47).map(|n| format!("{:02}", n)) {
        info!("processing prefecture {}", code);
        if let Err(e) = process_prefecture(&client, &code, &out_dir).await {
            error!("{} failed: {}", code, e);
        }
        sleep(REQUEST_DELAY).await;
    }

    info!("all prefectures processed");
    Ok(())
}

/// Fetch one prefecture's residential-address position archive and
/// normalize every extracted CSV in place.
async fn process_prefecture(client: &Client, code: &str, out_dir: &Path) -> Result<()> {
    let csv_paths =
        fetch::zips::fetch_and_extract(client, &fetch::urls::rsdt_pos_url(code), out_dir).await?;

    for path in csv_paths {
        let target = path.clone();
        tokio::task::spawn_blocking(move || process::normalize_lines(&target)).await??;
        info!("normalized {}", path.display());
    }
    Ok(())
}
