// src/process/mod.rs
use anyhow::{Context, Result};
use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

pub mod filter;
pub mod join;
pub mod rows;

/// Temporary sibling path for in-place rewrites: `foo.csv` -> `foo.csv.tmp`.
/// Staying in the same directory keeps the final rename atomic.
pub fn tmp_sibling(path: &Path) -> PathBuf {
    let mut os = path.as_os_str().to_os_string();
    os.push(".tmp");
    PathBuf::from(os)
}

/// Rewrite `path` line by line through a temporary sibling and swap it into
/// place. The registry archives ship CRLF line endings; the rewritten file
/// uses plain newlines and ends with one.
#[tracing::instrument(level = "debug", skip_all, fields(path = %path.as_ref().display()))]
pub fn normalize_lines<P: AsRef<Path>>(path: P) -> Result<()> {
    let path = path.as_ref();

    let tmp_path = tmp_sibling(path);
    let reader = BufReader::new(
        File::open(path).with_context(|| format!("opening {}", path.display()))?,
    );
    let mut writer = BufWriter::new(
        File::create(&tmp_path).with_context(|| format!("creating {}", tmp_path.display()))?,
    );
    for line in reader.lines() {
        writeln!(writer, "{}", line?)?;
    }
    writer.flush()?;
    drop(writer);

    fs::rename(&tmp_path, path).with_context(|| format!("replacing {}", path.display()))?;
    Ok(())
}
