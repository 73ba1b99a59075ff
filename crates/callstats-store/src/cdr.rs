//! CDR snapshot reader.
//!
//! The export is a headed CSV with many columns; only `Date & Time` and `To`
//! matter. Every column is read as `Utf8` so that odd values in unrelated
//! columns never fail the run. Short rows are padded with nulls, which read
//! back as empty cells. Parsing of the two kept fields happens in the
//! normaliser, row by row.

use std::fs::File;
use std::io::{Read, Seek};
use std::path::Path;
use std::sync::Arc;

use arrow::array::{Array, AsArray, StringArray};
use arrow::csv::ReaderBuilder;
use arrow::csv::reader::Format;
use arrow::datatypes::{DataType, Field, Schema};
use callstats_core::CallRecord;
use tracing::info;

use crate::StoreError;

pub const DATE_TIME_COLUMN: &str = "Date & Time";
pub const DESTINATION_COLUMN: &str = "To";

/// Read every row of a CDR export at `path`.
pub fn read_cdr(path: &Path) -> Result<Vec<CallRecord>, StoreError> {
    if !path.is_file() {
        return Err(StoreError::InputNotFound(path.to_path_buf()));
    }
    let file = File::open(path).map_err(|source| StoreError::InputUnreadable {
        path: path.to_path_buf(),
        source,
    })?;
    let records = read_cdr_from(file, path)?;
    info!(path = %path.display(), rows = records.len(), "read CDR snapshot");
    Ok(records)
}

/// Read a CDR export from any seekable source; `path` only labels errors.
pub fn read_cdr_from<R: Read + Seek>(mut reader: R, path: &Path) -> Result<Vec<CallRecord>, StoreError> {
    let malformed = |source| StoreError::InputMalformed {
        path: path.to_path_buf(),
        source,
    };

    let format = Format::default().with_header(true);
    let (header, _) = format.infer_schema(&mut reader, Some(0)).map_err(malformed)?;
    reader.rewind().map_err(|source| StoreError::InputUnreadable {
        path: path.to_path_buf(),
        source,
    })?;

    let fields: Vec<Field> = header
        .fields()
        .iter()
        .map(|f| Field::new(f.name(), DataType::Utf8, true))
        .collect();
    let schema = Arc::new(Schema::new(fields));

    let column = |name: &str| {
        schema.index_of(name).map_err(|_| StoreError::MissingColumn {
            path: path.to_path_buf(),
            column: name.to_string(),
        })
    };
    let ts_idx = column(DATE_TIME_COLUMN)?;
    let to_idx = column(DESTINATION_COLUMN)?;

    let csv = ReaderBuilder::new(schema.clone())
        .with_format(format)
        .with_truncated_rows(true)
        .build(reader)
        .map_err(malformed)?;

    let mut records = Vec::new();
    for batch in csv {
        let batch = batch.map_err(malformed)?;
        let timestamps = batch.column(ts_idx).as_string::<i32>();
        let destinations = batch.column(to_idx).as_string::<i32>();
        for row in 0..batch.num_rows() {
            records.push(CallRecord::new(
                records.len() + 1,
                cell(timestamps, row),
                cell(destinations, row),
            ));
        }
    }
    Ok(records)
}

fn cell(col: &StringArray, row: usize) -> &str {
    if col.is_null(row) { "" } else { col.value(row) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn read(text: &str) -> Result<Vec<CallRecord>, StoreError> {
        read_cdr_from(Cursor::new(text.as_bytes().to_vec()), Path::new("test.csv"))
    }

    #[test]
    fn reads_required_columns() {
        let records = read(
            "Date & Time,From,To,Duration\n\
             01/05/2024 09:05,07700900000,0123456789*202,00:01:12\n\
             01/05/2024 09:07,07700900001,0123456789*200,00:00:40\n",
        )
        .unwrap();
        assert_eq!(
            records,
            vec![
                CallRecord::new(1, "01/05/2024 09:05", "0123456789*202"),
                CallRecord::new(2, "01/05/2024 09:07", "0123456789*200"),
            ]
        );
    }

    #[test]
    fn quoted_fields_and_empty_cells() {
        let records = read(
            "To,Date & Time\n\
             \"Sales, main line *201\",01/05/2024 10:00\n\
             ,01/05/2024 10:01\n",
        )
        .unwrap();
        assert_eq!(records[0].destination, "Sales, main line *201");
        assert_eq!(records[1].destination, "");
        assert_eq!(records[1].timestamp, "01/05/2024 10:01");
    }

    #[test]
    fn unparseable_values_are_kept_for_the_normaliser() {
        let records = read("Date & Time,To\n31-02-2024 99:99,x*202\n").unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].timestamp, "31-02-2024 99:99");
    }

    #[test]
    fn short_rows_read_as_empty_cells() {
        let records = read(
            "Date & Time,From,To,Duration\n\
             01/05/2024 09:05,07700900000,0123456789*202,00:01:12\n\
             01/05/2024 09:07,07700900001\n\
             01/05/2024 09:10,07700900002,0123456789*200,00:00:40\n\
             01/05/2024 09:12\n",
        )
        .unwrap();
        assert_eq!(
            records,
            vec![
                CallRecord::new(1, "01/05/2024 09:05", "0123456789*202"),
                CallRecord::new(2, "01/05/2024 09:07", ""),
                CallRecord::new(3, "01/05/2024 09:10", "0123456789*200"),
                CallRecord::new(4, "01/05/2024 09:12", ""),
            ]
        );
    }

    #[test]
    fn short_rows_do_not_fail_a_summary() {
        let records = read(
            "Date & Time,From,To\n\
             01/05/2024 09:05,07700900000,0123456789*202\n\
             01/05/2024 09:07,07700900001\n\
             31-02-2024\n",
        )
        .unwrap();
        let now = chrono::NaiveDateTime::parse_from_str("2024-05-01 12:00", "%Y-%m-%d %H:%M")
            .unwrap();
        let summaries =
            callstats_core::summarize(&records, &callstats_core::SummaryConfig::sample(), now)
                .unwrap();
        assert_eq!(summaries.stats.rows_read, 3);
        assert_eq!(summaries.stats.resolved, 1);
        assert_eq!(summaries.stats.unresolved, 1);
        assert_eq!(summaries.stats.malformed, 1);
        assert_eq!(summaries.daily.calls_for("Jess"), 1);
    }

    #[test]
    fn header_only_is_empty() {
        assert!(read("Date & Time,To\n").unwrap().is_empty());
    }

    #[test]
    fn missing_column_is_fatal() {
        let err = read("Date & Time,From\n01/05/2024 09:05,x\n").unwrap_err();
        assert!(matches!(err, StoreError::MissingColumn { column, .. } if column == "To"));
    }

    #[test]
    fn empty_input_is_missing_columns() {
        assert!(matches!(
            read("").unwrap_err(),
            StoreError::MissingColumn { .. }
        ));
    }

    #[test]
    fn missing_file_is_fatal() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("01-05-2024.csv");
        assert!(matches!(
            read_cdr(&path).unwrap_err(),
            StoreError::InputNotFound(p) if p == path
        ));
    }

    #[test]
    fn reads_from_disk() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("01-05-2024.csv");
        std::fs::write(&path, "Date & Time,To\n01/05/2024 09:05,x*202\n").unwrap();
        assert_eq!(read_cdr(&path).unwrap().len(), 1);
    }
}
