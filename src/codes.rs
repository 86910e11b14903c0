// src/codes.rs
use anyhow::{Context, Result};
use regex::Regex;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Read the municipality codes out of an `lg_code.csv` file. The code is
/// the first comma-separated field of each line; lines whose first field is
/// not a 5 or 6 digit number (headers, blanks) are skipped.
pub fn load_city_codes<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
    let path = path.as_ref();
    let file =
        File::open(path).with_context(|| format!("opening code list {}", path.display()))?;
    let code_pattern = Regex::new(r"^\d{5,6}$").expect("code pattern should be valid");

    let mut codes = Vec::new();
    for line in BufReader::new(file).lines() {
        let line = line?;
        let code = line.split(',').next().unwrap_or("").trim();
        if code_pattern.is_match(code) {
            codes.push(code.to_string());
        }
    }
    Ok(codes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn keeps_only_five_or_six_digit_codes() -> Result<()> {
        let mut tmp = tempfile::NamedTempFile::new()?;
        writeln!(tmp, "lg_code,pref_name,city_name")?;
        writeln!(tmp, "142051,神奈川県,鎌倉市")?;
        writeln!(tmp, " 011002 ,北海道,札幌市")?;
        writeln!(tmp, "1420,short")?;
        writeln!(tmp)?;
        writeln!(tmp, "abc123,not a code")?;

        let codes = load_city_codes(tmp.path())?;
        assert_eq!(codes, vec!["142051", "011002"]);
        Ok(())
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(load_city_codes("no/such/lg_code.csv").is_err());
    }
}
