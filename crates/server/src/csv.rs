//! CSV export for admin downloads.
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::response::{IntoResponse, Response};
use haven_core::{Row, Value};

/// Header row plus one line per row, in `columns` order. Missing columns
/// render as empty fields.
pub fn rows_to_csv(columns: &[&str], rows: &[Row]) -> String {
    let mut out = String::new();
    push_record(&mut out, columns.iter().map(|c| c.to_string()));

    for row in rows {
        push_record(
            &mut out,
            columns
                .iter()
                .map(|c| row.get(c).map(cell).unwrap_or_default()),
        );
    }

    out
}

pub fn csv_response(filename: &str, body: String) -> Response {
    (
        [
            (CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        body,
    )
        .into_response()
}

/// Text that a spreadsheet would evaluate as a formula is prefixed with
/// `'`. Numbers are left alone so negative amounts stay numeric.
fn cell(value: &Value) -> String {
    match value {
        Value::Text(text) if text.starts_with(['=', '+', '-', '@', '\t', '\r']) => {
            format!("'{text}")
        }
        other => other.to_plain_string(),
    }
}

fn push_record(out: &mut String, fields: impl Iterator<Item = String>) {
    for (i, field) in fields.enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str(&escape(&field));
    }
    out.push_str("\r\n");
}

fn escape(field: &str) -> String {
    if field.contains([',', '"', '\r', '\n']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
