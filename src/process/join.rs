// src/process/join.rs
use anyhow::{Context, Result};
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use tracing::info;

use crate::process::rows::{field_at, split_fields, Header};
use crate::process::tmp_sibling;

/// Column carrying the parcel identifier in both datasets.
pub const KEY_COLUMN: &str = "prc_id";

/// Parcel-number columns projected from the master into the joined output,
/// in output order.
pub const PROJECTED_COLUMNS: [&str; 3] = ["prc_num1", "prc_num2", "prc_num3"];

/// The three parcel-number components held per parcel id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParcelNumbers {
    pub num1: String,
    pub num2: String,
    pub num3: String,
}

/// Drain the parcel-master stream into a lookup keyed by parcel id.
///
/// Column positions are resolved once against the header; a column the file
/// does not carry projects as the empty string for every row, and a missing
/// key column keys every row under "". A later row with the same id
/// overwrites the earlier one.
pub fn load_parcel_master<R: BufRead>(reader: R) -> Result<HashMap<String, ParcelNumbers>> {
    let mut table = HashMap::new();
    let mut lines = reader.lines();

    let (key_idx, num_idx) = match lines.next() {
        Some(first) => {
            let header = Header::parse(&first?);
            (
                header.index_of(KEY_COLUMN),
                PROJECTED_COLUMNS.map(|name| header.index_of(name)),
            )
        }
        None => return Ok(table),
    };

    for line in lines {
        let line = line?;
        let fields = split_fields(&line);
        table.insert(
            field_at(&fields, key_idx).to_string(),
            ParcelNumbers {
                num1: field_at(&fields, num_idx[0]).to_string(),
                num2: field_at(&fields, num_idx[1]).to_string(),
                num3: field_at(&fields, num_idx[2]).to_string(),
            },
        );
    }

    Ok(table)
}

/// Stream the position-reference rows through the join.
///
/// The header goes out first with the three projected column names appended;
/// every data line follows in input order as the raw line text plus the
/// matched parcel numbers, or three empty fields when the id is not in the
/// table. One output line per input line, nothing buffered, nothing dropped.
/// Returns the number of data rows written.
pub fn write_joined<R: BufRead, W: Write>(
    reader: R,
    table: &HashMap<String, ParcelNumbers>,
    mut out: W,
) -> Result<u64> {
    let mut lines = reader.lines();

    let key_idx = match lines.next() {
        Some(first) => {
            let first = first?;
            writeln!(
                out,
                "{},{},{},{}",
                first, PROJECTED_COLUMNS[0], PROJECTED_COLUMNS[1], PROJECTED_COLUMNS[2]
            )?;
            Header::parse(&first).index_of(KEY_COLUMN)
        }
        None => return Ok(0),
    };

    let unmatched = ParcelNumbers::default();
    let mut rows = 0u64;
    for line in lines {
        let line = line?;
        let fields = split_fields(&line);
        let nums = table
            .get(field_at(&fields, key_idx))
            .unwrap_or(&unmatched);
        writeln!(out, "{},{},{},{}", line, nums.num1, nums.num2, nums.num3)?;
        rows += 1;
    }

    Ok(rows)
}

/// Join the position-reference file against its parcel master, in place.
///
/// The joined output is written to a temporary sibling and renamed over
/// `pos_path` before the master file is removed; at any interruption point
/// the canonical path holds either the original or the fully joined file.
#[tracing::instrument(level = "info", skip_all, fields(pos = %pos_path.as_ref().display()))]
pub fn join_parcel_files<P: AsRef<Path>, Q: AsRef<Path>>(pos_path: P, master_path: Q) -> Result<()> {
    let pos_path = pos_path.as_ref();
    let master_path = master_path.as_ref();

    let master = File::open(master_path)
        .with_context(|| format!("opening parcel master {}", master_path.display()))?;
    let table = load_parcel_master(BufReader::new(master))?;

    let tmp_path = tmp_sibling(pos_path);
    let reader = BufReader::new(
        File::open(pos_path)
            .with_context(|| format!("opening position reference {}", pos_path.display()))?,
    );
    let mut writer = BufWriter::new(
        File::create(&tmp_path)
            .with_context(|| format!("creating {}", tmp_path.display()))?,
    );
    let rows = write_joined(reader, &table, &mut writer)?;
    writer.flush()?;
    drop(writer);

    fs::rename(&tmp_path, pos_path)
        .with_context(|| format!("replacing {}", pos_path.display()))?;
    fs::remove_file(master_path)
        .with_context(|| format!("removing consumed master {}", master_path.display()))?;

    info!(rows, master_keys = table.len(), "joined parcel numbers");
    Ok(())
}
