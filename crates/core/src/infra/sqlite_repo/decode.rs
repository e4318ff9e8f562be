use sqlx::sqlite::SqliteRow;
use sqlx::{Column, Row as _, TypeInfo, ValueRef};

use crate::domain::model::{Row, Value};
use crate::infra::error::DbError;

/// Decodes by runtime storage class, not declared column type.
pub fn decode_row(row: &SqliteRow) -> Result<Row, DbError> {
    let mut out = Row::new();

    for column in row.columns() {
        let idx = column.ordinal();
        let raw = row.try_get_raw(idx)?;
        let is_null = raw.is_null();
        let type_name = raw.type_info().name().to_string();

        let value = if is_null {
            Value::Null
        } else {
            match type_name.as_str() {
                "INTEGER" | "BOOLEAN" => Value::Integer(row.try_get_unchecked::<i64, _>(idx)?),
                "REAL" => Value::Real(row.try_get_unchecked::<f64, _>(idx)?),
                "BLOB" => Value::Blob(row.try_get_unchecked::<Vec<u8>, _>(idx)?),
                "TEXT" | "DATETIME" | "DATE" | "TIME" => {
                    Value::Text(row.try_get_unchecked::<String, _>(idx)?)
                }
                "NUMERIC" => match row.try_get_unchecked::<i64, _>(idx) {
                    Ok(v) => Value::Integer(v),
                    Err(_) => Value::Real(row.try_get_unchecked::<f64, _>(idx)?),
                },
                other => {
                    return Err(DbError::Decode {
                        column: column.name().to_string(),
                        type_name: other.to_string(),
                    });
                }
            }
        };

        out.insert(column.name(), value);
    }

    Ok(out)
}
