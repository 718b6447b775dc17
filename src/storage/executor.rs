//! Runs validated statements and decodes their rows.

use crate::domain::result::{CellValue, ResultSet};
use crate::domain::sql::{enforce_limit, ValidatedStatement};
use crate::error::PipelineError;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde_json::Value as JsonValue;
use sqlx::postgres::types::{Oid, PgInterval, PgMoney, PgTimeTz};
use sqlx::postgres::{PgRow, PgTypeKind};
use sqlx::{Column, Decode, PgPool, Postgres, Row, Type, TypeInfo};

/// Statement text after the row cap is applied; this is what gets sent.
pub fn limited_sql(statement: &ValidatedStatement, max_rows: u32) -> String {
    enforce_limit(statement.as_str(), max_rows)
}

/// Executes `statement` with the row cap on one pooled connection.
///
/// The connection goes back to the pool when it is dropped, on every path.
pub async fn execute(
    pool: &PgPool,
    statement: &ValidatedStatement,
    max_rows: u32,
) -> Result<ResultSet, PipelineError> {
    let sql = limited_sql(statement, max_rows);

    let mut conn = pool.acquire().await.map_err(PipelineError::from_sqlx)?;

    tracing::debug!(sql = %sql, "executing statement");
    let rows = sqlx::query(&sql)
        .persistent(false)
        .fetch_all(&mut *conn)
        .await
        .map_err(PipelineError::from_sqlx)?;

    Ok(rows_to_result_set(&rows))
}

pub fn rows_to_result_set(rows: &[PgRow]) -> ResultSet {
    let Some(first) = rows.first() else {
        return ResultSet::empty();
    };

    let columns: Vec<String> = first.columns().iter().map(|c| c.name().to_string()).collect();
    let rows = rows
        .iter()
        .map(|row| (0..columns.len()).map(|idx| decode_cell(row, idx)).collect())
        .collect();

    ResultSet { columns, rows }
}

fn get<'r, T, F>(row: &'r PgRow, idx: usize, wrap: F) -> Result<CellValue, sqlx::Error>
where
    T: Decode<'r, Postgres> + Type<Postgres>,
    F: FnOnce(T) -> CellValue,
{
    Ok(row
        .try_get::<Option<T>, _>(idx)?
        .map(wrap)
        .unwrap_or(CellValue::Null))
}

/// One-dimensional arrays become JSON arrays; `NULL` elements stay `null`.
///
/// The column type was already matched by name, so the array wrapper skips
/// sqlx's compatibility check and decodes elements with `T`'s codec.
fn get_array<T, F>(row: &PgRow, idx: usize, wrap: F) -> Result<CellValue, sqlx::Error>
where
    T: for<'a> Decode<'a, Postgres> + Type<Postgres>,
    F: Fn(T) -> CellValue,
{
    Ok(row
        .try_get_unchecked::<Option<Vec<Option<T>>>, _>(idx)?
        .map(|items| {
            CellValue::Json(JsonValue::Array(
                items
                    .into_iter()
                    .map(|item| item.map(&wrap).unwrap_or(CellValue::Null).to_json())
                    .collect(),
            ))
        })
        .unwrap_or(CellValue::Null))
}

fn interval(v: PgInterval) -> CellValue {
    CellValue::Interval {
        months: v.months,
        days: v.days,
        microseconds: v.microseconds,
    }
}

fn time_tz(v: PgTimeTz<NaiveTime, FixedOffset>) -> CellValue {
    CellValue::TimeTz(v.time, v.offset)
}

// lc_monetary is assumed to use two fractional digits.
fn money(v: PgMoney) -> CellValue {
    CellValue::Numeric(v.to_decimal(2))
}

fn bytea(v: Vec<u8>) -> CellValue {
    let hex: String = v.iter().map(|b| format!("{:02x}", b)).collect();
    CellValue::Text(format!("\\x{}", hex))
}

fn decode_scalar(row: &PgRow, idx: usize, type_name: &str) -> Option<Result<CellValue, sqlx::Error>> {
    let decoded = match type_name {
        "BOOL" => get::<bool, _>(row, idx, CellValue::Bool),
        "INT2" => get::<i16, _>(row, idx, |v| CellValue::Int(v.into())),
        "INT4" => get::<i32, _>(row, idx, |v| CellValue::Int(v.into())),
        "INT8" => get::<i64, _>(row, idx, CellValue::Int),
        "OID" => get::<Oid, _>(row, idx, |v| CellValue::Int(v.0.into())),
        "FLOAT4" => get::<f32, _>(row, idx, |v| CellValue::Float(v.into())),
        "FLOAT8" => get::<f64, _>(row, idx, CellValue::Float),
        "NUMERIC" => get::<Decimal, _>(row, idx, CellValue::Numeric),
        "MONEY" => get::<PgMoney, _>(row, idx, money),
        "TEXT" | "VARCHAR" | "BPCHAR" | "NAME" | "CITEXT" => get::<String, _>(row, idx, CellValue::Text),
        "TIMESTAMPTZ" => get::<DateTime<Utc>, _>(row, idx, CellValue::Timestamp),
        "TIMESTAMP" => get::<NaiveDateTime, _>(row, idx, CellValue::LocalTimestamp),
        "DATE" => get::<NaiveDate, _>(row, idx, CellValue::Date),
        "TIME" => get::<NaiveTime, _>(row, idx, CellValue::Time),
        "TIMETZ" => get::<PgTimeTz<NaiveTime, FixedOffset>, _>(row, idx, time_tz),
        "INTERVAL" => get::<PgInterval, _>(row, idx, interval),
        "UUID" => get::<uuid::Uuid, _>(row, idx, CellValue::Uuid),
        "JSON" | "JSONB" => get::<JsonValue, _>(row, idx, CellValue::Json),
        "BYTEA" => get::<Vec<u8>, _>(row, idx, bytea),
        _ => return None,
    };
    Some(decoded)
}

fn decode_array(row: &PgRow, idx: usize, element: &str) -> Option<Result<CellValue, sqlx::Error>> {
    let decoded = match element {
        "BOOL" => get_array::<bool, _>(row, idx, CellValue::Bool),
        "INT2" => get_array::<i16, _>(row, idx, |v| CellValue::Int(v.into())),
        "INT4" => get_array::<i32, _>(row, idx, |v| CellValue::Int(v.into())),
        "INT8" => get_array::<i64, _>(row, idx, CellValue::Int),
        "OID" => get_array::<Oid, _>(row, idx, |v| CellValue::Int(v.0.into())),
        "FLOAT4" => get_array::<f32, _>(row, idx, |v| CellValue::Float(v.into())),
        "FLOAT8" => get_array::<f64, _>(row, idx, CellValue::Float),
        "NUMERIC" => get_array::<Decimal, _>(row, idx, CellValue::Numeric),
        "MONEY" => get_array::<PgMoney, _>(row, idx, money),
        "TEXT" | "VARCHAR" | "BPCHAR" | "NAME" => get_array::<String, _>(row, idx, CellValue::Text),
        "TIMESTAMPTZ" => get_array::<DateTime<Utc>, _>(row, idx, CellValue::Timestamp),
        "TIMESTAMP" => get_array::<NaiveDateTime, _>(row, idx, CellValue::LocalTimestamp),
        "DATE" => get_array::<NaiveDate, _>(row, idx, CellValue::Date),
        "TIME" => get_array::<NaiveTime, _>(row, idx, CellValue::Time),
        "INTERVAL" => get_array::<PgInterval, _>(row, idx, interval),
        "UUID" => get_array::<uuid::Uuid, _>(row, idx, CellValue::Uuid),
        "JSON" | "JSONB" => get_array::<JsonValue, _>(row, idx, CellValue::Json),
        _ => return None,
    };
    Some(decoded)
}

fn decode_cell(row: &PgRow, idx: usize) -> CellValue {
    let type_info = row.columns()[idx].type_info();
    let type_name = type_info.name().to_ascii_uppercase();

    let decoded = match type_name.strip_suffix("[]") {
        Some(element) => decode_array(row, idx, element),
        None => decode_scalar(row, idx, &type_name),
    };

    // Enum labels are sent as UTF-8 text in both wire formats.
    let decoded = decoded.or_else(|| match type_info.kind() {
        PgTypeKind::Enum(_) => Some(
            row.try_get_unchecked::<Option<String>, _>(idx)
                .map(|v| v.map(CellValue::Text).unwrap_or(CellValue::Null)),
        ),
        _ => None,
    });

    match decoded {
        Some(Ok(cell)) => cell,
        Some(Err(e)) => {
            tracing::warn!(column = idx, type_name = %type_name, error = %e, "undecodable value; emitting null");
            CellValue::Null
        }
        None => {
            tracing::warn!(column = idx, type_name = %type_name, "unsupported column type; emitting null");
            CellValue::Null
        }
    }
}
