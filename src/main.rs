use abrscraper::{codes, fetch, process};
use anyhow::{Context, Result};
use reqwest::Client;
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};
use tokio::time::sleep;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

/// Input list of municipality codes to process.
static CODE_LIST: &str = "lg_code/lg_code.csv";
/// Where extracted and joined parcel CSVs land.
static OUT_DIR: &str = "parcel_data";
/// Courtesy pause between municipalities so the registry host is not hammered.
const REQUEST_DELAY: Duration = Duration::from_secs(1);

#[tokio::main]
async fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env).init();
    info!("startup");

    // ─── 2) configure dirs ───────────────────────────────────────────
    let out_dir = PathBuf::from(OUT_DIR);
    fs::create_dir_all(&out_dir)?;

    // ─── 3) load municipality codes ──────────────────────────────────
    let city_codes = codes::load_city_codes(CODE_LIST)?;
    info!("{} municipality codes to process", city_codes.len());

    // ─── 4) fetch + join, one municipality at a time ─────────────────
    let client = Client::new();
    for code in &city_codes {
        info!("processing municipality {}", code);
        if let Err(e) = process_city(&client, code, &out_dir).await {
            error!("{} failed: {}", code, e);
        }
        sleep(REQUEST_DELAY).await;
    }

    info!("all municipalities processed");
    Ok(())
}

/// Fetch both archives for one municipality, then join the parcel numbers
/// into its position reference file. The master CSV is consumed by the join.
async fn process_city(client: &Client, code: &str, out_dir: &Path) -> Result<()> {
    let pos_path =
        fetch::zips::fetch_and_extract(client, &fetch::urls::parcel_pos_url(code), out_dir)
            .await?
            .into_iter()
            .next()
            .context("position reference archive held no CSV entry")?;

    let master_path =
        fetch::zips::fetch_and_extract(client, &fetch::urls::parcel_master_url(code), out_dir)
            .await?
            .into_iter()
            .next()
            .context("parcel master archive held no CSV entry")?;

    tokio::task::spawn_blocking(move || {
        process::join::join_parcel_files(&pos_path, &master_path)
    })
    .await?
}
