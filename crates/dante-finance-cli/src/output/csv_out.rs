use serde_json::Value;
use std::io;

use super::{flatten_fields, format_scalar, result_of, schedule_rows, Pagination, SCHEDULE_COLUMNS};

/// Write output as CSV to stdout: one row per schedule period when the
/// result has a schedule, otherwise two-column `field,value`.
pub fn print_csv(value: &Value, pagination: &Pagination) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());
    let result = result_of(value);

    if let Some(rows) = schedule_rows(result) {
        let (page_rows, _) = pagination.slice(rows);
        let _ = wtr.write_record(SCHEDULE_COLUMNS);
        for row in page_rows {
            let record: Vec<String> = SCHEDULE_COLUMNS
                .iter()
                .map(|col| row.get(*col).map(format_scalar).unwrap_or_default())
                .collect();
            let _ = wtr.write_record(&record);
        }
    } else {
        let mut fields = Vec::new();
        flatten_fields(result, "", &mut fields);
        let _ = wtr.write_record(["field", "value"]);
        for (key, val) in &fields {
            let _ = wtr.write_record([key.as_str(), val.as_str()]);
        }
    }

    let _ = wtr.flush();
}
