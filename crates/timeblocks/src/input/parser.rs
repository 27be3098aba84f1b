//! CSV/TSV measurement loader with delimiter detection.

use std::collections::HashSet;
use std::io::{BufRead, BufReader};

use chrono::NaiveDateTime;
use csv::StringRecord;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::source::format_name;
use super::timestamp::parse_timestamp;
use crate::error::{Result, TimeblocksError};
use crate::store::Measurement;

/// Delimiters to try when auto-detecting.
const DELIMITERS: &[u8] = &[b'\t', b',', b';', b'|'];

/// Header names for the columns the loader reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnNames {
    /// Unique measurement identifier.
    pub id: String,
    /// Specimen identifier.
    pub specimen: String,
    /// Measurement start timestamp.
    pub start: String,
    /// Measurement end timestamp.
    pub end: String,
    /// Optional measurement label.
    pub label: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            id: "idx".to_string(),
            specimen: "specimen".to_string(),
            start: "start_time".to_string(),
            end: "end_time".to_string(),
            label: "measurement".to_string(),
        }
    }
}

/// Loader configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Delimiter to use (None = auto-detect).
    pub delimiter: Option<u8>,
    /// Quote character.
    pub quote: u8,
    /// Column header names.
    pub columns: ColumnNames,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            delimiter: None,
            quote: b'"',
            columns: ColumnNames::default(),
        }
    }
}

impl LoaderConfig {
    /// Text form of every setting that changes what a load produces.
    pub fn fingerprint(&self) -> String {
        let c = &self.columns;
        format!(
            "delimiter={:?};quote={};columns={}|{}|{}|{}|{}",
            self.delimiter, self.quote, c.id, c.specimen, c.start, c.end, c.label
        )
    }
}

/// Positions of the loader's columns within a header row.
struct ColumnIndex {
    id: usize,
    specimen: usize,
    start: usize,
    end: usize,
    label: Option<usize>,
}

impl ColumnIndex {
    fn resolve(headers: &StringRecord, names: &ColumnNames) -> Result<Self> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name.trim()))
        };
        let require = |name: &str| {
            find(name).ok_or_else(|| TimeblocksError::in_header(name, "required column is missing"))
        };

        Ok(Self {
            id: require(&names.id)?,
            specimen: require(&names.specimen)?,
            start: require(&names.start)?,
            end: require(&names.end)?,
            label: find(&names.label),
        })
    }
}

/// Reads measurement tables.
pub struct Loader {
    config: LoaderConfig,
}

impl Loader {
    /// Create a new loader with default configuration.
    pub fn new() -> Self {
        Self {
            config: LoaderConfig::default(),
        }
    }

    /// Create a loader with custom configuration.
    pub fn with_config(config: LoaderConfig) -> Self {
        Self { config }
    }

    /// The delimiter this loader will use for `bytes`.
    pub fn delimiter_for(&self, bytes: &[u8]) -> Result<u8> {
        match self.config.delimiter {
            Some(d) => Ok(d),
            None => detect_delimiter(bytes),
        }
    }

    /// Parse raw bytes into measurements.
    ///
    /// Any malformed row fails the whole load; nothing is returned partially.
    pub fn parse_bytes(&self, bytes: &[u8]) -> Result<(Vec<Measurement>, &'static str)> {
        let delimiter = self.delimiter_for(bytes)?;

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(true)
            .quote(self.config.quote)
            .flexible(true)
            .from_reader(bytes);

        let headers = reader.headers().map_err(header_error)?.clone();
        let columns = ColumnIndex::resolve(&headers, &self.config.columns)?;
        let names = &self.config.columns;

        let mut measurements = Vec::new();
        let mut seen_ids = HashSet::new();

        for (row_idx, result) in reader.records().enumerate() {
            let row = row_idx + 1;
            let record = result.map_err(|e| record_error(e, row, &headers))?;

            if record.iter().all(|cell| cell.trim().is_empty()) {
                continue;
            }

            let measurement = parse_record(&record, row, &columns, names)?;
            if !seen_ids.insert(measurement.id) {
                return Err(TimeblocksError::at_row(
                    row,
                    &names.id,
                    format!("duplicate id {}", measurement.id),
                ));
            }
            measurements.push(measurement);
        }

        debug!(
            rows = measurements.len(),
            format = format_name(delimiter),
            "parsed measurement table"
        );

        Ok((measurements, format_name(delimiter)))
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

fn header_error(error: csv::Error) -> TimeblocksError {
    match error.kind() {
        csv::ErrorKind::Utf8 { .. } => TimeblocksError::in_header("", "header row is not valid UTF-8"),
        _ => TimeblocksError::Csv(error),
    }
}

/// Undecodable cells are reported against their column like any other bad value.
fn record_error(error: csv::Error, row: usize, headers: &StringRecord) -> TimeblocksError {
    let column = match error.kind() {
        csv::ErrorKind::Utf8 { err, .. } => {
            Some(headers.get(err.field()).map(str::trim).unwrap_or("").to_string())
        }
        _ => None,
    };

    match column {
        Some(column) => TimeblocksError::at_row(row, column, "value is not valid UTF-8"),
        None => TimeblocksError::Csv(error),
    }
}

fn parse_record(
    record: &StringRecord,
    row: usize,
    columns: &ColumnIndex,
    names: &ColumnNames,
) -> Result<Measurement> {
    let cell = |index: usize| record.get(index).map(str::trim).unwrap_or("");
    let required = |index: usize, name: &str| {
        let value = cell(index);
        if value.is_empty() {
            Err(TimeblocksError::at_row(row, name, "value is missing"))
        } else {
            Ok(value)
        }
    };

    let raw_id = required(columns.id, &names.id)?;
    let id: i64 = raw_id.parse().map_err(|_| {
        TimeblocksError::at_row(row, &names.id, format!("not an integer: '{}'", raw_id))
    })?;

    let specimen = required(columns.specimen, &names.specimen)?.to_string();

    let timestamp = |index: usize, name: &str| -> Result<NaiveDateTime> {
        let raw = required(index, name)?;
        parse_timestamp(raw).ok_or_else(|| {
            TimeblocksError::at_row(row, name, format!("not a timestamp: '{}'", raw))
        })
    };
    let start = timestamp(columns.start, &names.start)?;
    let end = timestamp(columns.end, &names.end)?;

    if end < start {
        return Err(TimeblocksError::at_row(
            row,
            &names.end,
            format!("end {} is before start {}", end, start),
        ));
    }

    let mut measurement = Measurement::new(id, specimen, start, end);
    if let Some(index) = columns.label {
        let label = cell(index);
        if !label.is_empty() {
            measurement = measurement.with_label(label);
        }
    }

    Ok(measurement)
}

/// Pick the delimiter that splits the most sampled lines into as many
/// fields as the header does.
///
/// Timestamp cells contain spaces, dashes and colons but none of the
/// candidate delimiters, so a free-text label column is the only cell that
/// can disagree with the header. Earlier entries in `DELIMITERS` win ties.
fn detect_delimiter(bytes: &[u8]) -> Result<u8> {
    let sample: Vec<String> = BufReader::new(bytes)
        .lines()
        .take(10)
        .filter_map(|l| l.ok())
        .filter(|l| !l.trim().is_empty())
        .collect();

    let Some(header) = sample.first() else {
        return Err(TimeblocksError::in_header("", "source has no header row"));
    };

    let best = DELIMITERS
        .iter()
        .enumerate()
        .filter_map(|(rank, &delim)| {
            let separators = unquoted_count(header, delim);
            if separators == 0 {
                return None;
            }
            let agreeing = sample
                .iter()
                .filter(|line| unquoted_count(line, delim) == separators)
                .count();
            Some(((agreeing, separators, DELIMITERS.len() - rank), delim))
        })
        .max_by_key(|&(key, _)| key)
        .map(|(_, delim)| delim);

    Ok(best.unwrap_or(b','))
}

/// Occurrences of `delimiter` outside double-quoted cells.
fn unquoted_count(line: &str, delimiter: u8) -> usize {
    let delimiter = delimiter as char;
    line.chars()
        .scan(false, |quoted, ch| {
            if ch == '"' {
                *quoted = !*quoted;
            }
            Some(ch == delimiter && !*quoted)
        })
        .filter(|&hit| hit)
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "idx,specimen,measurement,start_time,end_time";

    fn parse(content: &str) -> Result<Vec<Measurement>> {
        Loader::new().parse_bytes(content.as_bytes()).map(|(m, _)| m)
    }

    #[test]
    fn test_detect_comma_with_timestamps() {
        let data = b"idx,specimen,start_time,end_time\n\
                     1,A,2024-03-01 08:00:00,2024-03-01 08:30:00\n";
        assert_eq!(detect_delimiter(data).unwrap(), b',');
    }

    #[test]
    fn test_detect_tab_with_quoted_comma_label() {
        let data = b"idx\tspecimen\tmeasurement\tstart_time\tend_time\n\
                     1\tA\t\"dry, 2nd pass\"\t2024-03-01 08:00\t2024-03-01 08:30\n";
        assert_eq!(detect_delimiter(data).unwrap(), b'\t');
    }

    #[test]
    fn test_detect_single_column_falls_back_to_comma() {
        assert_eq!(detect_delimiter(b"idx\n1\n").unwrap(), b',');
    }

    #[test]
    fn test_parse_csv() {
        let content = format!(
            "{}\n1,FOF2-1,baseline,2024-03-01 08:00:00,2024-03-01 08:30:00\n\
             2,FOF2-2,,2024-03-01 09:00:00,2024-03-01 09:10:00\n",
            HEADER
        );
        let (rows, format) = Loader::new().parse_bytes(content.as_bytes()).unwrap();

        assert_eq!(format, "csv");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].id, 1);
        assert_eq!(rows[0].specimen, "FOF2-1");
        assert_eq!(rows[0].measurement.as_deref(), Some("baseline"));
        assert_eq!(rows[1].measurement, None);
    }

    #[test]
    fn test_parse_tsv_with_reordered_headers() {
        let content = "End_Time\tIDX\tSpecimen\tStart_Time\n\
                       2024-03-01 08:30:00\t5\tA\t2024-03-01 08:00:00\n";
        let (rows, format) = Loader::new().parse_bytes(content.as_bytes()).unwrap();

        assert_eq!(format, "tsv");
        assert_eq!(rows[0].id, 5);
        assert_eq!(rows[0].specimen, "A");
        assert!(rows[0].end > rows[0].start);
    }

    #[test]
    fn test_header_only_is_empty() {
        let rows = parse(&format!("{}\n", HEADER)).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn test_blank_rows_are_skipped() {
        let content = format!(
            "{}\n1,A,,2024-03-01 08:00,2024-03-01 09:00\n,,,,\n",
            HEADER
        );
        assert_eq!(parse(&content).unwrap().len(), 1);
    }

    #[test]
    fn test_missing_required_column() {
        let err = parse("idx,specimen,start_time\n1,A,2024-03-01\n").unwrap_err();
        match err {
            TimeblocksError::DataFormat { row, column, .. } => {
                assert_eq!(row, None);
                assert_eq!(column, "end_time");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_unparsable_timestamp() {
        let content = format!(
            "{}\n1,A,,2024-03-01 08:00,2024-03-01 09:00\n2,A,,soon,2024-03-01 09:00\n",
            HEADER
        );
        match parse(&content).unwrap_err() {
            TimeblocksError::DataFormat { row, column, message } => {
                assert_eq!(row, Some(2));
                assert_eq!(column, "start_time");
                assert!(message.contains("soon"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_specimen_value() {
        let content = format!("{}\n1,  ,,2024-03-01 08:00,2024-03-01 09:00\n", HEADER);
        assert!(matches!(
            parse(&content),
            Err(TimeblocksError::DataFormat { row: Some(1), ref column, .. }) if column == "specimen"
        ));
    }

    #[test]
    fn test_non_integer_id() {
        let content = format!("{}\nx1,A,,2024-03-01 08:00,2024-03-01 09:00\n", HEADER);
        assert!(matches!(
            parse(&content),
            Err(TimeblocksError::DataFormat { ref column, .. }) if column == "idx"
        ));
    }

    #[test]
    fn test_end_before_start() {
        let content = format!("{}\n1,A,,2024-03-01 09:00,2024-03-01 08:00\n", HEADER);
        assert!(matches!(
            parse(&content),
            Err(TimeblocksError::DataFormat { ref column, .. }) if column == "end_time"
        ));
    }

    #[test]
    fn test_duplicate_id() {
        let content = format!(
            "{}\n1,A,,2024-03-01 08:00,2024-03-01 09:00\n1,B,,2024-03-01 08:00,2024-03-01 09:00\n",
            HEADER
        );
        match parse(&content).unwrap_err() {
            TimeblocksError::DataFormat { row, message, .. } => {
                assert_eq!(row, Some(2));
                assert!(message.contains("duplicate"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_empty_source() {
        assert!(matches!(
            parse(""),
            Err(TimeblocksError::DataFormat { row: None, .. })
        ));
    }

    #[test]
    fn test_custom_column_names() {
        let config = LoaderConfig {
            delimiter: Some(b';'),
            columns: ColumnNames {
                id: "id".to_string(),
                specimen: "sample".to_string(),
                start: "begin".to_string(),
                end: "finish".to_string(),
                ..ColumnNames::default()
            },
            ..LoaderConfig::default()
        };
        let content = "id;sample;begin;finish\n3;S;2024-03-01 08:00;2024-03-01 08:05\n";
        let (rows, format) = Loader::with_config(config)
            .parse_bytes(content.as_bytes())
            .unwrap();

        assert_eq!(format, "csv-semicolon");
        assert_eq!(rows[0].specimen, "S");
    }

    #[test]
    fn test_invalid_utf8_value() {
        let mut content =
            format!("{}\n1,S,,2024-01-01 08:00,2024-01-01 08:30\n2,S,,", HEADER).into_bytes();
        content.extend_from_slice(&[0xff, 0xfe]);
        content.extend_from_slice(b",2024-01-01 09:00\n");

        match Loader::new().parse_bytes(&content).unwrap_err() {
            TimeblocksError::DataFormat { row, column, message } => {
                assert_eq!(row, Some(2));
                assert_eq!(column, "start_time");
                assert!(message.contains("UTF-8"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_invalid_utf8_header() {
        let mut content = b"idx,specimen,start_time,".to_vec();
        content.extend_from_slice(&[0xff]);
        content.extend_from_slice(b"\n1,S,2024-01-01 08:00,2024-01-01 08:30\n");

        assert!(matches!(
            Loader::new().parse_bytes(&content),
            Err(TimeblocksError::DataFormat { row: None, .. })
        ));
    }
}
