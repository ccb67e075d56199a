pub mod csv_out;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use serde_json::Value;

/// Page selection for schedule rows. Only table and CSV output paginate.
#[derive(Debug, Clone, Copy)]
pub struct Pagination {
    pub page: Option<usize>,
    pub page_size: usize,
}

impl Pagination {
    /// Rows for the selected page plus `(page, total_pages)` when paginating.
    pub fn slice<'a>(&self, rows: &'a [Value]) -> (&'a [Value], Option<(usize, usize)>) {
        let page = match self.page {
            Some(page) if self.page_size > 0 => page.max(1),
            _ => return (rows, None),
        };
        let total_pages = rows.len().div_ceil(self.page_size).max(1);
        let page = page.min(total_pages);
        let start = (page - 1) * self.page_size;
        let end = (start + self.page_size).min(rows.len());
        (&rows[start.min(end)..end], Some((page, total_pages)))
    }
}

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value, pagination: &Pagination) {
    match format {
        OutputFormat::Json => match serde_json::to_string_pretty(value) {
            Ok(s) => println!("{}", s),
            Err(e) => eprintln!("JSON serialization error: {}", e),
        },
        OutputFormat::Table => table::print_table(value, pagination),
        OutputFormat::Csv => csv_out::print_csv(value, pagination),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}

/// The result object inside the computation envelope, or the value itself.
pub(crate) fn result_of(value: &Value) -> &Value {
    value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value)
}

/// Column order for schedule rows.
pub(crate) const SCHEDULE_COLUMNS: [&str; 6] = [
    "period",
    "payment_date",
    "payment_amount",
    "interest_portion",
    "principal_portion",
    "remaining_balance",
];

/// Schedule rows of an amortization result, complete or partial.
pub(crate) fn schedule_rows(result: &Value) -> Option<&Vec<Value>> {
    let outcome = result.get("outcome")?;
    outcome
        .get("schedule")
        .or_else(|| outcome.get("partial_schedule"))
        .and_then(Value::as_array)
}

/// Flatten nested objects into dotted `(field, value)` pairs, skipping
/// arrays of objects (rendered separately as row tables).
pub(crate) fn flatten_fields(value: &Value, prefix: &str, out: &mut Vec<(String, String)>) {
    let Value::Object(map) = value else {
        out.push((prefix.to_string(), format_scalar(value)));
        return;
    };
    for (key, val) in map {
        let field = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        match val {
            Value::Object(_) => flatten_fields(val, &field, out),
            Value::Array(items) if items.iter().any(Value::is_object) => {}
            _ => out.push((field, format_scalar(val))),
        }
    }
}

pub(crate) fn format_scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        Value::Array(arr) => arr.iter().map(format_scalar).collect::<Vec<_>>().join(", "),
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}
