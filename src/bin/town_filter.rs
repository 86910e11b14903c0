use abrscraper::process::filter::{filter_file, FilterColumn};
use anyhow::Result;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

/// Town master export to reduce, rewritten in place.
static INPUT_CSV: &str = "demo/mt_town_all.csv";
/// Position of the prefecture name column in the town master.
const PREF_COLUMN: usize = 3;
/// Prefecture whose rows are kept.
static TARGET_PREF: &str = "神奈川県";

fn main() -> Result<()> {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env).init();

    let kept = filter_file(INPUT_CSV, &FilterColumn::Index(PREF_COLUMN), TARGET_PREF)?;
    info!("kept {} rows for {}", kept, TARGET_PREF);
    Ok(())
}
