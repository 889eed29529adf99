//! Reads the semicolon-separated punctuality dataset into a [`TripTable`].

use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::time::Instant;

use csv::{ReaderBuilder, Trim};
use flate2::read::GzDecoder;
use tracing::{debug, info};

use super::calendar::{CalendarFields, parse_timestamp};
use super::types::{RawTripRow, TripRecord, TripTable};
use crate::error::{Result, TardisError};

pub const DELIMITER: u8 = b';';
pub const DATE_COLUMN: &str = "date";

const REQUIRED_COLUMNS: &[&str] = &[
    "departure_station",
    "arrival_station",
    "avg_dep_delay",
    "avg_arr_delay",
];

/// Loads the dataset at `path`, gunzipping it first when the file name
/// ends in `.gz`.
///
/// # Errors
///
/// Returns [`TardisError::Load`] if the file is missing, a required column
/// is absent, or any row fails to parse.
#[tracing::instrument(fields(path = %path.display()))]
pub fn load_table(path: &Path) -> Result<TripTable> {
    let started = Instant::now();
    let file = File::open(path).map_err(|e| TardisError::load(path, e))?;

    let table = if path.extension().and_then(|e| e.to_str()) == Some("gz") {
        debug!("Reading gzip-compressed dataset");
        read_table(GzDecoder::new(file), path)?
    } else {
        read_table(file, path)?
    };

    info!(
        rows = table.len(),
        has_dates = table.has_dates(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Dataset loaded"
    );
    Ok(table)
}

/// Parses dataset rows from any reader. `source` is only used in errors.
pub fn read_table<R: Read>(reader: R, source: &Path) -> Result<TripTable> {
    let mut rdr = ReaderBuilder::new()
        .delimiter(DELIMITER)
        .trim(Trim::Headers)
        .from_reader(reader);

    let headers = rdr
        .headers()
        .map_err(|e| TardisError::load(source, e))?
        .clone();

    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|col| !headers.iter().any(|h| h == *col))
        .collect();
    if !missing.is_empty() {
        return Err(TardisError::load(
            source,
            format!("missing required column(s): {}", missing.join(", ")),
        ));
    }

    let has_dates = headers.iter().any(|h| h == DATE_COLUMN);

    let mut records = Vec::new();
    for (idx, result) in rdr.deserialize::<RawTripRow>().enumerate() {
        let raw = result.map_err(|e| TardisError::load(source, e))?;
        // header is line 1
        let line = idx + 2;
        records.push(into_record(raw, line, source)?);
    }

    Ok(TripTable::new(records, has_dates))
}

fn into_record(raw: RawTripRow, line: usize, source: &Path) -> Result<TripRecord> {
    let departure_station = raw.departure_station.trim().to_string();
    let arrival_station = raw.arrival_station.trim().to_string();

    if departure_station.is_empty() || arrival_station.is_empty() {
        return Err(TardisError::load(
            source,
            format!("line {line}: station name is empty"),
        ));
    }

    if !raw.avg_dep_delay.is_finite() || !raw.avg_arr_delay.is_finite() {
        return Err(TardisError::load(
            source,
            format!("line {line}: delay values must be finite numbers"),
        ));
    }

    let calendar = match raw.date.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(value) => {
            let ts = parse_timestamp(value).ok_or_else(|| {
                TardisError::load(source, format!("line {line}: unparseable date '{value}'"))
            })?;
            Some(CalendarFields::from_timestamp(ts))
        }
    };

    let delay_comments = raw
        .arrival_delay_comments
        .filter(|c| !c.trim().is_empty());

    Ok(TripRecord {
        departure_station,
        arrival_station,
        avg_dep_delay: raw.avg_dep_delay,
        avg_arr_delay: raw.avg_arr_delay,
        delay_comments,
        calendar,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::Compression;
    use flate2::write::GzEncoder;
    use std::env;
    use std::fs;
    use std::io::Write;

    fn parse(text: &str) -> Result<TripTable> {
        read_table(text.as_bytes(), Path::new("inline.csv"))
    }

    fn temp_path(name: &str) -> std::path::PathBuf {
        env::temp_dir().join(name)
    }

    #[test]
    fn test_read_table_with_dates() {
        let table = parse(
            "date;service;departure_station;arrival_station;\
             avg_dep_delay;avg_arr_delay;arrival_delay_comments\n\
             2018-01;National;PARIS LYON;MARSEILLE ST CHARLES;1.5;6.2;Travaux\n\
             2019-07;National;LYON PART DIEU;PARIS LYON;0.8;2.1;\n",
        )
        .unwrap();

        assert!(table.has_dates());
        assert_eq!(table.len(), 2);

        let first = &table.records()[0];
        assert_eq!(first.departure_station, "PARIS LYON");
        assert_eq!(first.month(), Some(1));
        assert_eq!(first.year(), Some(2018));
        assert_eq!(first.delay_comments.as_deref(), Some("Travaux"));

        let second = &table.records()[1];
        assert_eq!(second.year(), Some(2019));
        assert_eq!(second.delay_comments, None);
    }

    #[test]
    fn test_read_table_without_date_column() {
        let table = parse(
            "departure_station;arrival_station;avg_dep_delay;avg_arr_delay\n\
             NANTES;PARIS MONTPARNASSE;2.0;3.0\n",
        )
        .unwrap();

        assert!(!table.has_dates());
        assert_eq!(table.records()[0].month(), None);
        assert_eq!(table.records()[0].hour(), None);
    }

    #[test]
    fn test_multiline_comment_is_kept_whole() {
        let table = parse(
            "departure_station;arrival_station;avg_dep_delay;avg_arr_delay;arrival_delay_comments\n\
             NANTES;PARIS MONTPARNASSE;2.0;3.0;\"Travaux\nMétéo\"\n",
        )
        .unwrap();

        assert_eq!(
            table.records()[0].delay_comments.as_deref(),
            Some("Travaux\nMétéo")
        );
    }

    #[test]
    fn test_missing_required_column() {
        let err = parse("departure_station;arrival_station;avg_dep_delay\nA;B;1.0\n").unwrap_err();
        assert!(matches!(err, TardisError::Load { .. }));
        assert!(err.to_string().contains("avg_arr_delay"));
    }

    #[test]
    fn test_malformed_number() {
        let err = parse(
            "departure_station;arrival_station;avg_dep_delay;avg_arr_delay\nA;B;abc;1.0\n",
        )
        .unwrap_err();
        assert!(matches!(err, TardisError::Load { .. }));
    }

    #[test]
    fn test_bad_date_fails_fast() {
        let err = parse(
            "date;departure_station;arrival_station;avg_dep_delay;avg_arr_delay\n\
             yesterday;A;B;1.0;1.0\n",
        )
        .unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn test_empty_station_rejected() {
        let err = parse(
            "departure_station;arrival_station;avg_dep_delay;avg_arr_delay\n ;B;1.0;1.0\n",
        )
        .unwrap_err();
        assert!(err.to_string().contains("station name is empty"));
    }

    #[test]
    fn test_load_table_missing_file() {
        let err = load_table(Path::new("/definitely/not/here.csv")).unwrap_err();
        assert!(matches!(err, TardisError::Load { .. }));
    }

    #[test]
    fn test_load_table_gzip() {
        let path = temp_path("tardis_test_dataset.csv.gz");
        let _ = fs::remove_file(&path);

        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        let csv = "departure_station;arrival_station;avg_dep_delay;avg_arr_delay\nA;B;1.0;4.0\n";
        encoder.write_all(csv.as_bytes()).unwrap();
        fs::write(&path, encoder.finish().unwrap()).unwrap();

        let table = load_table(&path).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.records()[0].avg_arr_delay, 4.0);

        fs::remove_file(&path).unwrap();
    }
}
