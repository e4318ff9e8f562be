use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{Column, Row as _, TypeInfo, ValueRef};

use crate::domain::model::{Row, Value};
use crate::infra::error::DbError;

/// Same text shape SQLite stores for `CURRENT_TIMESTAMP`.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn decode_row(row: &PgRow) -> Result<Row, DbError> {
    let mut out = Row::new();

    for column in row.columns() {
        let idx = column.ordinal();
        let is_null = row.try_get_raw(idx)?.is_null();
        let type_name = column.type_info().name().to_string();

        let value = if is_null {
            Value::Null
        } else {
            match type_name.as_str() {
                "INT2" => Value::Integer(i64::from(row.try_get::<i16, _>(idx)?)),
                "INT4" => Value::Integer(i64::from(row.try_get::<i32, _>(idx)?)),
                "INT8" => Value::Integer(row.try_get::<i64, _>(idx)?),
                "FLOAT4" => Value::Real(f64::from(row.try_get::<f32, _>(idx)?)),
                "FLOAT8" => Value::Real(row.try_get::<f64, _>(idx)?),
                "BOOL" => Value::Bool(row.try_get::<bool, _>(idx)?),
                "BYTEA" => Value::Blob(row.try_get::<Vec<u8>, _>(idx)?),
                "TEXT" | "VARCHAR" | "BPCHAR" | "NAME" | "CHAR" => {
                    Value::Text(row.try_get::<String, _>(idx)?)
                }
                "TIMESTAMP" => Value::Text(
                    row.try_get::<NaiveDateTime, _>(idx)?
                        .format(TIMESTAMP_FORMAT)
                        .to_string(),
                ),
                "TIMESTAMPTZ" => Value::Text(
                    row.try_get::<DateTime<Utc>, _>(idx)?
                        .format(TIMESTAMP_FORMAT)
                        .to_string(),
                ),
                "DATE" => Value::Text(row.try_get::<NaiveDate, _>(idx)?.to_string()),
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
