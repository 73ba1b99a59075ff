/// Arrow schemas and record batches for the summary artifacts.
///
/// Column names are part of the dashboard contract and must not change.
pub mod artifact {
    use std::sync::Arc;

    use arrow::array::{ArrayRef, Float64Array, StringArray, UInt32Array, UInt64Array};
    use arrow::datatypes::{DataType, Field, Schema};
    use arrow::error::ArrowError;
    use arrow::record_batch::RecordBatch;

    use crate::enrich::SummaryTable;

    pub const HOUR: &str = "Hour";
    pub const NAME: &str = "Name";
    pub const CALLS: &str = "Calls";
    pub const AVERAGE_CALLS: &str = "Average Calls";
    pub const TOTAL_CALLS: &str = "Total Calls";

    /// Schema for `daily_summary.csv`, `weekly_summary.csv`, `monthly_summary.csv`.
    pub fn period_summary_schema() -> Schema {
        Schema::new(vec![
            Field::new(NAME, DataType::Utf8, false),
            Field::new(CALLS, DataType::UInt64, false),
            Field::new(AVERAGE_CALLS, DataType::Float64, false),
            Field::new(TOTAL_CALLS, DataType::UInt64, false),
        ])
    }

    /// Schema for `hourly_summary_<date>.csv`.
    pub fn hourly_summary_schema() -> Schema {
        Schema::new(vec![
            Field::new(HOUR, DataType::UInt32, false),
            Field::new(NAME, DataType::Utf8, false),
            Field::new(CALLS, DataType::UInt64, false),
            Field::new(TOTAL_CALLS, DataType::UInt64, false),
        ])
    }

    /// One row per visible staff member of a daily/weekly/monthly table.
    pub fn period_summary_batch(table: &SummaryTable) -> Result<RecordBatch, ArrowError> {
        let rows = &table.rows;
        let columns: Vec<ArrayRef> = vec![
            Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.staff.as_str()))),
            Arc::new(UInt64Array::from_iter_values(rows.iter().map(|r| r.calls))),
            Arc::new(Float64Array::from_iter_values(rows.iter().map(|r| r.window_average))),
            Arc::new(UInt64Array::from_iter_values(rows.iter().map(|r| r.window_total))),
        ];
        RecordBatch::try_new(Arc::new(period_summary_schema()), columns)
    }

    /// One row per (hour, visible staff member) of the hourly table.
    ///
    /// Fails if the table holds non-hourly windows: the `Hour` column is
    /// non-nullable.
    pub fn hourly_summary_batch(table: &SummaryTable) -> Result<RecordBatch, ArrowError> {
        let rows = &table.rows;
        let columns: Vec<ArrayRef> = vec![
            Arc::new(UInt32Array::from_iter(rows.iter().map(|r| r.window.hour()))),
            Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.staff.as_str()))),
            Arc::new(UInt64Array::from_iter_values(rows.iter().map(|r| r.calls))),
            Arc::new(UInt64Array::from_iter_values(rows.iter().map(|r| r.window_total))),
        ];
        RecordBatch::try_new(Arc::new(hourly_summary_schema()), columns)
    }
}
