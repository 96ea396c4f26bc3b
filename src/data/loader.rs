use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::io::Read;
use std::path::Path;

use thiserror::Error;

use super::model::{Dataset, Row};

/// Why a dataset could not be loaded. The caller turns any of these into an
/// empty dataset plus a failed load status.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("header row is empty")]
    EmptyHeader,
    #[error("unsupported file extension: .{0}")]
    UnsupportedExtension(String),
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load a registration dataset from a `.csv` file.
pub fn load_file(path: &Path) -> Result<Dataset, LoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();
    if ext != "csv" && ext != "txt" {
        return Err(LoadError::UnsupportedExtension(ext));
    }

    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_reader(file)
}

/// Parse comma-delimited text with a header row.
///
/// The header names the fields; every following non-blank line becomes one
/// [`Row`]. A line with fewer values than the header is padded with empty
/// values, surplus values on a longer line are dropped, so every row ends up
/// with exactly the header's field set.
pub fn parse_reader<R: Read>(input: R) -> Result<Dataset, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(input);

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .enumerate()
        .map(|(i, h)| {
            // Spreadsheet exports like to lead with a byte-order mark.
            if i == 0 {
                h.trim_start_matches('\u{feff}').to_string()
            } else {
                h.to_string()
            }
        })
        .collect();

    if headers.iter().all(|h| h.trim().is_empty()) {
        return Err(LoadError::EmptyHeader);
    }

    let duplicates = duplicate_columns(&headers);
    if !duplicates.is_empty() {
        log::warn!("Repeated header names keep only their last value per row: {duplicates:?}");
    }

    let mut rows = Vec::new();
    let mut skewed_lines = 0usize;

    for result in reader.records() {
        let record = result?;
        if is_blank(&record) {
            continue;
        }

        if record.len() != headers.len() {
            skewed_lines += 1;
            log::debug!(
                "line {}: {} values for {} columns, aligning by position",
                record.position().map(|p| p.line()).unwrap_or(0),
                record.len(),
                headers.len()
            );
        }

        let fields: BTreeMap<String, String> = headers
            .iter()
            .enumerate()
            .map(|(i, name)| (name.clone(), record.get(i).unwrap_or("").to_string()))
            .collect();
        rows.push(Row::new(fields));
    }

    Ok(Dataset::new(headers, rows, skewed_lines))
}

/// Header names that occur more than once, each listed once in file order.
fn duplicate_columns(headers: &[String]) -> Vec<&str> {
    let mut seen = BTreeSet::new();
    let mut repeated = Vec::new();
    for name in headers {
        if !seen.insert(name.as_str()) && !repeated.contains(&name.as_str()) {
            repeated.push(name.as_str());
        }
    }
    repeated
}

fn is_blank(record: &csv::StringRecord) -> bool {
    record.is_empty() || (record.len() == 1 && record[0].is_empty())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::data::model::fields;

    const SAMPLE: &str = "\
Make,Model,Model Year,Electric Vehicle Type,City,Electric Range
TESLA,MODEL 3,2020,Battery Electric Vehicle (BEV),Seattle,266

NISSAN,LEAF,2019,Battery Electric Vehicle (BEV),Tacoma,150
";

    #[test]
    fn parses_rows_in_order_and_skips_blank_lines() {
        let ds = parse_reader(SAMPLE.as_bytes()).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.column_names.len(), 6);
        assert_eq!(ds.rows[0].get(fields::MAKE), Some("TESLA"));
        assert_eq!(ds.rows[1].get(fields::CITY), Some("Tacoma"));
        assert_eq!(ds.skewed_lines, 0);
    }

    #[test]
    fn short_and_long_lines_are_aligned_by_position() {
        let text = "Make,Model,City\nTESLA,MODEL Y\nKIA,NIRO,Olympia,extra\nBMW,I3,Kent\n";
        let ds = parse_reader(text.as_bytes()).unwrap();
        assert_eq!(ds.len(), 3);
        assert_eq!(ds.skewed_lines, 2);

        assert_eq!(ds.rows[0].get(fields::CITY), Some(""));
        assert_eq!(ds.rows[1].get(fields::CITY), Some("Olympia"));
        assert_eq!(ds.rows[1].len(), 3);
        // A skewed neighbour must not bleed into a well-formed row.
        assert_eq!(ds.rows[2].get(fields::MODEL), Some("I3"));
        assert_eq!(ds.rows[2].get(fields::CITY), Some("Kent"));
    }

    #[test]
    fn quoted_commas_stay_in_one_field() {
        let text = "Make,Electric Utility\nTESLA,\"PUGET SOUND ENERGY INC,CITY OF TACOMA\"\n";
        let ds = parse_reader(text.as_bytes()).unwrap();
        assert_eq!(
            ds.rows[0].get(fields::ELECTRIC_UTILITY),
            Some("PUGET SOUND ENERGY INC,CITY OF TACOMA")
        );
    }

    #[test]
    fn repeated_header_names_collapse_to_the_last_value() {
        let text = "Make,City,Make,City,Make\nTESLA,Kent,KIA,Renton,BMW\n";
        let ds = parse_reader(text.as_bytes()).unwrap();
        assert_eq!(ds.column_names.len(), 5);
        assert_eq!(ds.rows[0].len(), 2);
        assert_eq!(ds.rows[0].get(fields::MAKE), Some("BMW"));
        assert_eq!(ds.rows[0].get(fields::CITY), Some("Renton"));
        assert_eq!(duplicate_columns(&ds.column_names), vec!["Make", "City"]);
        assert!(duplicate_columns(&["A".to_string(), "B".to_string()]).is_empty());
    }

    #[test]
    fn empty_source_is_a_load_failure() {
        assert!(matches!(parse_reader("".as_bytes()), Err(LoadError::EmptyHeader)));
        assert!(matches!(parse_reader(",,\n".as_bytes()), Err(LoadError::EmptyHeader)));
    }

    #[test]
    fn header_only_yields_no_rows() {
        let ds = parse_reader("Make,Model\n".as_bytes()).unwrap();
        assert!(ds.is_empty());
        assert_eq!(ds.column_names, vec!["Make", "Model"]);
    }

    #[test]
    fn byte_order_mark_is_stripped_from_first_header() {
        let ds = parse_reader("\u{feff}Make,Model\nKIA,EV6\n".as_bytes()).unwrap();
        assert_eq!(ds.rows[0].get(fields::MAKE), Some("KIA"));
    }

    #[test]
    fn load_file_reads_csv_from_disk() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();
        let ds = load_file(file.path()).unwrap();
        assert_eq!(ds.len(), 2);
    }

    #[test]
    fn missing_file_reports_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_file(&dir.path().join("absent.csv")).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }

    #[test]
    fn unsupported_extension_is_rejected() {
        let err = load_file(Path::new("vehicles.parquet")).unwrap_err();
        assert!(matches!(err, LoadError::UnsupportedExtension(ext) if ext == "parquet"));
    }
}
