//! Tabular query output and its JSON flattening.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::ser::{Serialize, Serializer};
use serde_json::{Map, Value as JsonValue};

/// A decoded cell. Kept typed until it is put on the wire.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Numeric(Decimal),
    Text(String),
    Timestamp(DateTime<Utc>),
    LocalTimestamp(NaiveDateTime),
    Date(NaiveDate),
    Time(NaiveTime),
    TimeTz(NaiveTime, FixedOffset),
    /// Postgres keeps the three parts apart; a month is not a fixed length.
    Interval {
        months: i32,
        days: i32,
        microseconds: i64,
    },
    Uuid(uuid::Uuid),
    Json(JsonValue),
}

const SECONDS_PER_DAY: f64 = 86_400.0;
const DAYS_PER_MONTH: f64 = 30.0;

fn float_to_json(v: f64) -> JsonValue {
    serde_json::Number::from_f64(v)
        .map(JsonValue::Number)
        .unwrap_or(JsonValue::Null)
}

impl CellValue {
    /// Flattens to the transport form: temporal values become ISO-8601 text,
    /// arbitrary-precision numbers become floats and intervals become a number
    /// of seconds, counting a month as 30 days.
    pub fn to_json(&self) -> JsonValue {
        match self {
            CellValue::Null => JsonValue::Null,
            CellValue::Bool(b) => JsonValue::Bool(*b),
            CellValue::Int(i) => JsonValue::from(*i),
            CellValue::Float(f) => float_to_json(*f),
            CellValue::Numeric(d) => d.to_f64().map(float_to_json).unwrap_or(JsonValue::Null),
            CellValue::Text(s) => JsonValue::String(s.clone()),
            CellValue::Timestamp(ts) => JsonValue::String(ts.to_rfc3339()),
            CellValue::LocalTimestamp(ts) => {
                JsonValue::String(ts.format("%Y-%m-%dT%H:%M:%S%.f").to_string())
            }
            CellValue::Date(d) => JsonValue::String(d.format("%Y-%m-%d").to_string()),
            CellValue::Time(t) => JsonValue::String(t.format("%H:%M:%S%.f").to_string()),
            CellValue::TimeTz(t, offset) => {
                JsonValue::String(format!("{}{}", t.format("%H:%M:%S%.f"), offset))
            }
            CellValue::Interval {
                months,
                days,
                microseconds,
            } => {
                let days = f64::from(*months) * DAYS_PER_MONTH + f64::from(*days);
                float_to_json(days * SECONDS_PER_DAY + *microseconds as f64 / 1_000_000.0)
            }
            CellValue::Uuid(u) => JsonValue::String(u.to_string()),
            CellValue::Json(v) => v.clone(),
        }
    }
}

impl Serialize for CellValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

/// Columns plus rows; every row has one cell per column.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultSet {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl ResultSet {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Rows as `column -> value` objects in column order.
    ///
    /// A repeated column name keeps the last value, as a JSON object cannot
    /// hold the same key twice.
    pub fn rows_as_json(&self) -> Vec<Map<String, JsonValue>> {
        self.rows
            .iter()
            .map(|row| {
                self.columns
                    .iter()
                    .zip(row.iter())
                    .map(|(col, cell)| (col.clone(), cell.to_json()))
                    .collect()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;
    use std::str::FromStr;

    #[test]
    fn temporal_values_become_iso_text() {
        let ts = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap();
        assert_eq!(CellValue::Timestamp(ts).to_json(), json!("2024-03-01T12:30:00+00:00"));

        let local = NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_milli_opt(8, 5, 9, 250)
            .unwrap();
        assert_eq!(CellValue::LocalTimestamp(local).to_json(), json!("2024-03-01T08:05:09.250"));

        let date = NaiveDate::from_ymd_opt(2023, 12, 31).unwrap();
        assert_eq!(CellValue::Date(date).to_json(), json!("2023-12-31"));

        let time = NaiveTime::from_hms_opt(23, 59, 1).unwrap();
        assert_eq!(CellValue::Time(time).to_json(), json!("23:59:01"));
    }

    #[test]
    fn interval_becomes_seconds() {
        let day_and_two_hours = CellValue::Interval {
            months: 0,
            days: 1,
            microseconds: 2 * 3_600 * 1_000_000,
        };
        assert_eq!(day_and_two_hours.to_json(), json!(93_600.0));

        let month_less_a_half_second = CellValue::Interval {
            months: 1,
            days: 0,
            microseconds: -500_000,
        };
        assert_eq!(month_less_a_half_second.to_json(), json!(2_591_999.5));
    }

    #[test]
    fn time_with_zone_keeps_offset() {
        let t = NaiveTime::from_hms_opt(10, 0, 0).unwrap();
        let offset = FixedOffset::east_opt(2 * 3_600).unwrap();
        assert_eq!(CellValue::TimeTz(t, offset).to_json(), json!("10:00:00+02:00"));
    }

    #[test]
    fn numeric_becomes_float() {
        let d = Decimal::from_str("1234.50").unwrap();
        assert_eq!(CellValue::Numeric(d).to_json(), json!(1234.5));
    }

    #[test]
    fn primitives_pass_through() {
        assert_eq!(CellValue::Null.to_json(), JsonValue::Null);
        assert_eq!(CellValue::Bool(true).to_json(), json!(true));
        assert_eq!(CellValue::Int(-7).to_json(), json!(-7));
        assert_eq!(CellValue::Text("Acme".into()).to_json(), json!("Acme"));
        assert_eq!(CellValue::Json(json!({"a": 1})).to_json(), json!({"a": 1}));
        assert_eq!(CellValue::Float(f64::NAN).to_json(), JsonValue::Null);
    }

    #[test]
    fn rows_keep_column_order() {
        let set = ResultSet {
            columns: vec!["zeta".into(), "alpha".into()],
            rows: vec![vec![CellValue::Int(1), CellValue::Text("x".into())]],
        };
        let rows = set.rows_as_json();
        let keys: Vec<&String> = rows[0].keys().collect();
        assert_eq!(keys, vec!["zeta", "alpha"]);

        let serialized = serde_json::to_string(&rows).unwrap();
        assert_eq!(serialized, r#"[{"zeta":1,"alpha":"x"}]"#);
    }

    #[test]
    fn empty_set() {
        let set = ResultSet::empty();
        assert_eq!(set.row_count(), 0);
        assert!(set.rows_as_json().is_empty());
    }
}
