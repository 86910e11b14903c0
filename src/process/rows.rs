// src/process/rows.rs
//
// Line-oriented access to the registry CSV exports. The exports are plain
// comma-separated text with no quoting and no embedded delimiters, so rows
// are split on the literal comma only. Feeding quoted CSV through here is
// unsupported.

/// Split one record line into its raw fields.
pub fn split_fields(line: &str) -> Vec<&str> {
    line.split(',').collect()
}

/// Column positions resolved against a header row.
#[derive(Debug, Clone)]
pub struct Header {
    names: Vec<String>,
}

impl Header {
    pub fn parse(line: &str) -> Self {
        Self {
            names: split_fields(line).iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Position of `name` in the header, or `None` when absent.
    /// Duplicate names resolve to the first occurrence.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }
}

/// Value of `fields` at `idx`. An unresolved column or a row shorter than
/// the header both yield the empty string rather than an error.
pub fn field_at<'a>(fields: &[&'a str], idx: Option<usize>) -> &'a str {
    idx.and_then(|i| fields.get(i).copied()).unwrap_or("")
}
