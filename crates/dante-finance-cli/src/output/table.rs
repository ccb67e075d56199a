use serde_json::Value;
use tabled::{builder::Builder, Table};

use super::{flatten_fields, format_scalar, result_of, schedule_rows, Pagination, SCHEDULE_COLUMNS};

/// Render a computation envelope as a summary table, followed by the
/// (paginated) schedule rows when the result carries a schedule.
pub fn print_table(value: &Value, pagination: &Pagination) {
    let result = result_of(value);

    let mut fields = Vec::new();
    flatten_fields(result, "", &mut fields);

    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in &fields {
        builder.push_record([key.as_str(), val.as_str()]);
    }
    println!("{}", Table::from(builder));

    if let Some(rows) = schedule_rows(result) {
        print_schedule(rows, pagination);
    }

    if let Some(Value::Array(warnings)) = value.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings {
                if let Value::String(s) = w {
                    println!("  - {}", s);
                }
            }
        }
    }

    if let Some(Value::String(meth)) = value.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

fn print_schedule(rows: &[Value], pagination: &Pagination) {
    if rows.is_empty() {
        return;
    }

    let (page_rows, page_info) = pagination.slice(rows);

    let mut builder = Builder::default();
    builder.push_record(SCHEDULE_COLUMNS);
    for row in page_rows {
        builder.push_record(
            SCHEDULE_COLUMNS
                .iter()
                .map(|col| row.get(*col).map(format_scalar).unwrap_or_default()),
        );
    }

    println!();
    println!("{}", Table::from(builder));
    if let Some((page, total_pages)) = page_info {
        println!("Page {} of {} ({} periods)", page, total_pages, rows.len());
    }
}
