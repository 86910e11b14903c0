// src/fetch/zips.rs
use anyhow::{Context, Result};
use reqwest::Client;
use std::fs::{self, File};
use std::io::{self, Cursor};
use std::path::{Path, PathBuf};
use tokio::task;
use tracing::debug;
use url::Url;
use zip::ZipArchive;

/// Download the ZIP at `url_str` and extract every file entry into
/// `dest_dir`. Returns the extracted paths whose names end in `.csv`, in
/// archive order. A non-success status surfaces as an error here; the
/// per-municipality loop decides whether to carry on.
pub async fn fetch_and_extract(
    client: &Client,
    url_str: &str,
    dest_dir: impl AsRef<Path>,
) -> Result<Vec<PathBuf>> {
    let url = Url::parse(url_str).with_context(|| format!("parsing url {}", url_str))?;
    let resp = client
        .get(url.as_str())
        .send()
        .await
        .with_context(|| format!("GET {}", url))?
        .error_for_status()?;
    let bytes = resp.bytes().await?;
    debug!(url = %url, bytes = bytes.len(), "downloaded archive");

    let dest_dir = dest_dir.as_ref().to_path_buf();
    task::spawn_blocking(move || extract_csv_entries(Cursor::new(bytes), &dest_dir)).await?
}

/// Extract every file entry of the archive into `dest_dir`, creating the
/// directory as needed, and report the `.csv` entries that landed.
pub fn extract_csv_entries<R: io::Read + io::Seek>(
    archive: R,
    dest_dir: &Path,
) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dest_dir)
        .with_context(|| format!("creating output directory {}", dest_dir.display()))?;

    let mut archive = ZipArchive::new(archive).context("reading ZIP archive")?;
    let mut csv_paths = Vec::new();

    for i in 0..archive.len() {
        let mut entry = archive
            .by_index(i)
            .with_context(|| format!("accessing ZIP entry #{}", i))?;
        if !entry.is_file() {
            continue;
        }
        let name = entry.name().to_string();

        let out_path = dest_dir.join(&name);
        if let Some(parent) = out_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut out = File::create(&out_path)
            .with_context(|| format!("creating {}", out_path.display()))?;
        io::copy(&mut entry, &mut out)
            .with_context(|| format!("extracting {}", name))?;

        if name.to_lowercase().ends_with(".csv") {
            csv_paths.push(out_path);
        }
    }

    Ok(csv_paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::FileOptions;
    use zip::CompressionMethod;

    fn sample_zip() -> Vec<u8> {
        let mut buf = Vec::new();
        {
            let mut zip = zip::ZipWriter::new(Cursor::new(&mut buf));
            let options: FileOptions<'_, ()> =
                FileOptions::default().compression_method(CompressionMethod::Stored);
            zip.add_directory("docs/", options).unwrap();
            zip.start_file("mt_parcel_pos_city142051.csv", options)
                .unwrap();
            zip.write_all(b"prc_id,x\nA1,foo\n").unwrap();
            zip.start_file("docs/readme.txt", options).unwrap();
            zip.write_all(b"not a dataset\n").unwrap();
            zip.finish().unwrap();
        }
        buf
    }

    #[test]
    fn extracts_files_and_reports_csv_entries_only() -> Result<()> {
        let dir = tempfile::tempdir()?;

        let csvs = extract_csv_entries(Cursor::new(sample_zip()), dir.path())?;

        assert_eq!(
            csvs,
            vec![dir.path().join("mt_parcel_pos_city142051.csv")]
        );
        assert_eq!(
            fs::read_to_string(dir.path().join("mt_parcel_pos_city142051.csv"))?,
            "prc_id,x\nA1,foo\n"
        );
        assert_eq!(
            fs::read_to_string(dir.path().join("docs/readme.txt"))?,
            "not a dataset\n"
        );
        Ok(())
    }

    #[test]
    fn garbage_bytes_are_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = extract_csv_entries(Cursor::new(b"not a zip".to_vec()), dir.path());
        assert!(result.is_err());
    }
}
