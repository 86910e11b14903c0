// src/process/filter.rs
use anyhow::{Context, Result};
use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use tracing::info;

use crate::process::rows::{field_at, split_fields, Header};
use crate::process::tmp_sibling;

/// Which column of the stream the filter matches against.
#[derive(Debug, Clone)]
pub enum FilterColumn {
    Name(String),
    Index(usize),
}

/// Copy the header through, then only the data rows whose configured
/// column, trimmed of surrounding whitespace, equals `target` exactly.
/// Kept rows pass through verbatim. Returns the number of rows kept.
pub fn write_filtered<R: BufRead, W: Write>(
    reader: R,
    column: &FilterColumn,
    target: &str,
    mut out: W,
) -> Result<u64> {
    let mut lines = reader.lines();

    let idx = match lines.next() {
        Some(first) => {
            let first = first?;
            writeln!(out, "{}", first)?;
            match column {
                FilterColumn::Index(i) => Some(*i),
                FilterColumn::Name(name) => Header::parse(&first).index_of(name),
            }
        }
        None => return Ok(0),
    };

    let mut kept = 0u64;
    for line in lines {
        let line = line?;
        let fields = split_fields(&line);
        if field_at(&fields, idx).trim() == target {
            writeln!(out, "{}", line)?;
            kept += 1;
        }
    }

    Ok(kept)
}

/// Filter `path` in place through a temporary sibling, keeping the header
/// and the matching rows. The temp file is renamed over the original once
/// fully written.
#[tracing::instrument(level = "info", skip_all, fields(path = %path.as_ref().display()))]
pub fn filter_file<P: AsRef<Path>>(path: P, column: &FilterColumn, target: &str) -> Result<u64> {
    let path = path.as_ref();

    let tmp_path = tmp_sibling(path);
    let reader = BufReader::new(
        File::open(path).with_context(|| format!("opening {}", path.display()))?,
    );
    let mut writer = BufWriter::new(
        File::create(&tmp_path).with_context(|| format!("creating {}", tmp_path.display()))?,
    );
    let kept = write_filtered(reader, column, target, &mut writer)?;
    writer.flush()?;
    drop(writer);

    fs::rename(&tmp_path, path).with_context(|| format!("replacing {}", path.display()))?;

    info!(kept, "filtered rows");
    Ok(kept)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn filter_to_string(input: &str, column: &FilterColumn, target: &str) -> (String, u64) {
        let mut out = Vec::new();
        let kept = write_filtered(Cursor::new(input), column, target, &mut out).unwrap();
        (String::from_utf8(out).unwrap(), kept)
    }

    #[test]
    fn header_always_copied_even_without_matches() {
        let (out, kept) = filter_to_string(
            "town_id,name,code,pref\n1,a,01,東京都\n",
            &FilterColumn::Index(3),
            "神奈川県",
        );
        assert_eq!(out, "town_id,name,code,pref\n");
        assert_eq!(kept, 0);
    }

    #[test]
    fn keeps_trimmed_matches_and_drops_others() {
        let input = "town_id,name,code,pref\n\
                     1,a,01, 神奈川県 \n\
                     2,b,02,東京都\n\
                     3,c,03,神奈川県\n";
        let (out, kept) = filter_to_string(input, &FilterColumn::Index(3), "神奈川県");
        assert_eq!(
            out,
            "town_id,name,code,pref\n1,a,01, 神奈川県 \n3,c,03,神奈川県\n"
        );
        assert_eq!(kept, 2);
    }

    #[test]
    fn column_by_name_resolves_against_header() {
        let input = "code,pref\n1,神奈川県\n2,東京都\n";
        let (out, kept) = filter_to_string(
            input,
            &FilterColumn::Name("pref".to_string()),
            "神奈川県",
        );
        assert_eq!(out, "code,pref\n1,神奈川県\n");
        assert_eq!(kept, 1);
    }

    #[test]
    fn unknown_column_name_keeps_header_only() {
        let (out, kept) = filter_to_string(
            "code,pref\n1,神奈川県\n",
            &FilterColumn::Name("prefecture".to_string()),
            "神奈川県",
        );
        assert_eq!(out, "code,pref\n");
        assert_eq!(kept, 0);
    }

    #[test]
    fn filter_file_replaces_input_in_place() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("mt_town_all.csv");
        fs::write(&path, "a,b,c,pref\n1,2,3,神奈川県\n4,5,6,大阪府\n")?;

        let kept = filter_file(&path, &FilterColumn::Index(3), "神奈川県")?;

        assert_eq!(kept, 1);
        assert_eq!(
            fs::read_to_string(&path)?,
            "a,b,c,pref\n1,2,3,神奈川県\n"
        );
        assert!(!tmp_sibling(&path).exists());
        Ok(())
    }
}
