//! Conversions between [`Value`] and Postgres wire types.

use crate::driver::FetchStyle;
use crate::value::{Row, Value};
use bytes::BytesMut;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use rust_decimal::Decimal;
use std::error::Error;
use tokio_postgres::types::{IsNull, ToSql, Type};
use uuid::Uuid;

type BoxError = Box<dyn Error + Sync + Send>;

fn is_text(ty: &Type) -> bool {
    matches!(
        *ty,
        Type::TEXT | Type::VARCHAR | Type::BPCHAR | Type::NAME | Type::UNKNOWN
    )
}

fn unsupported(value: &str, ty: &Type) -> BoxError {
    format!("cannot bind {value} to a column of type {ty}").into()
}

/// Values are coerced to the parameter type the server inferred, so
/// `Value::Int` binds to `int2`, `int4`, `int8` or `numeric` alike and text
/// binds to numeric, uuid, date or timestamp columns when it parses. A
/// coercion that would change the value is an error.
impl ToSql for Value {
    fn to_sql(&self, ty: &Type, out: &mut BytesMut) -> Result<IsNull, BoxError> {
        match self {
            Value::Null => Ok(IsNull::Yes),
            Value::Bool(v) => match *ty {
                Type::BOOL => v.to_sql(ty, out),
                _ if is_text(ty) => v.to_string().to_sql(ty, out),
                _ => Err(unsupported("a boolean", ty)),
            },
            Value::Int(v) => int_to_sql(*v, ty, out),
            Value::Float(v) => match *ty {
                Type::FLOAT4 => float4_from_f64(*v)?.to_sql(ty, out),
                Type::FLOAT8 => v.to_sql(ty, out),
                Type::NUMERIC => Decimal::try_from(*v)?.to_sql(ty, out),
                Type::JSON | Type::JSONB => serde_json::Value::from(*v).to_sql(ty, out),
                _ if is_text(ty) => v.to_string().to_sql(ty, out),
                _ => Err(unsupported("a float", ty)),
            },
            Value::Text(s) => text_to_sql(s, ty, out),
            Value::Bytes(b) => match *ty {
                Type::BYTEA => b.as_slice().to_sql(ty, out),
                _ => Err(unsupported("bytes", ty)),
            },
            Value::Json(j) => match *ty {
                Type::JSON | Type::JSONB => j.to_sql(ty, out),
                _ if is_text(ty) => j.to_string().to_sql(ty, out),
                _ => Err(unsupported("a JSON document", ty)),
            },
        }
    }

    fn accepts(_: &Type) -> bool {
        true
    }

    tokio_postgres::types::to_sql_checked!();
}

fn int_to_sql(v: i64, ty: &Type, out: &mut BytesMut) -> Result<IsNull, BoxError> {
    match *ty {
        Type::INT2 => i16::try_from(v)?.to_sql(ty, out),
        Type::INT4 => i32::try_from(v)?.to_sql(ty, out),
        Type::INT8 => v.to_sql(ty, out),
        Type::OID => u32::try_from(v)?.to_sql(ty, out),
        Type::FLOAT4 => float4_from_int(v)?.to_sql(ty, out),
        Type::FLOAT8 => float8_from_int(v)?.to_sql(ty, out),
        Type::NUMERIC => Decimal::from(v).to_sql(ty, out),
        Type::BOOL => (v != 0).to_sql(ty, out),
        Type::JSON | Type::JSONB => serde_json::Value::from(v).to_sql(ty, out),
        _ if is_text(ty) => v.to_string().to_sql(ty, out),
        _ => Err(unsupported("an integer", ty)),
    }
}

fn text_to_sql(s: &str, ty: &Type, out: &mut BytesMut) -> Result<IsNull, BoxError> {
    match *ty {
        Type::INT2 => s.trim().parse::<i16>()?.to_sql(ty, out),
        Type::INT4 => s.trim().parse::<i32>()?.to_sql(ty, out),
        Type::INT8 => s.trim().parse::<i64>()?.to_sql(ty, out),
        Type::FLOAT4 => float4_from_f64(s.trim().parse()?)?.to_sql(ty, out),
        Type::FLOAT8 => s.trim().parse::<f64>()?.to_sql(ty, out),
        Type::NUMERIC => s.trim().parse::<Decimal>()?.to_sql(ty, out),
        Type::BOOL => s.trim().parse::<bool>()?.to_sql(ty, out),
        Type::UUID => Uuid::parse_str(s)?.to_sql(ty, out),
        Type::TIMESTAMPTZ => DateTime::parse_from_rfc3339(s)?
            .with_timezone(&Utc)
            .to_sql(ty, out),
        Type::TIMESTAMP => parse_naive_datetime(s)?.to_sql(ty, out),
        Type::DATE => s.parse::<NaiveDate>()?.to_sql(ty, out),
        Type::TIME => s.parse::<NaiveTime>()?.to_sql(ty, out),
        Type::JSON | Type::JSONB => serde_json::from_str::<serde_json::Value>(s)?.to_sql(ty, out),
        Type::BYTEA => s.as_bytes().to_sql(ty, out),
        _ if <&str as ToSql>::accepts(ty) => s.to_sql(ty, out),
        _ => Err(unsupported("text", ty)),
    }
}

fn float4_from_f64(v: f64) -> Result<f32, BoxError> {
    let narrowed = v as f32;
    if narrowed.is_infinite() && v.is_finite() {
        return Err(format!("{v} is out of range for float4").into());
    }
    Ok(narrowed)
}

fn float4_from_int(v: i64) -> Result<f32, BoxError> {
    let converted = v as f32;
    if converted as i128 != i128::from(v) {
        return Err(format!("{v} cannot be represented exactly as float4").into());
    }
    Ok(converted)
}

fn float8_from_int(v: i64) -> Result<f64, BoxError> {
    let converted = v as f64;
    if converted as i128 != i128::from(v) {
        return Err(format!("{v} cannot be represented exactly as float8").into());
    }
    Ok(converted)
}

fn parse_naive_datetime(s: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    s.parse::<NaiveDateTime>()
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f"))
}

/// Decode a result row, keyed by column name or position.
pub(crate) fn decode_row(
    row: &tokio_postgres::Row,
    style: FetchStyle,
) -> Result<Row, tokio_postgres::Error> {
    let mut decoded = Row::with_capacity(row.len());
    for (idx, column) in row.columns().iter().enumerate() {
        let key = match style {
            FetchStyle::Assoc => column.name().to_string(),
            FetchStyle::Num => idx.to_string(),
        };
        decoded.insert(key, decode_column(row, idx, column.type_())?);
    }
    Ok(decoded)
}

fn decode_column(
    row: &tokio_postgres::Row,
    idx: usize,
    ty: &Type,
) -> Result<Value, tokio_postgres::Error> {
    let value: Value = match *ty {
        Type::BOOL => row.try_get::<_, Option<bool>>(idx)?.into(),
        Type::INT2 => row.try_get::<_, Option<i16>>(idx)?.into(),
        Type::INT4 => row.try_get::<_, Option<i32>>(idx)?.into(),
        Type::INT8 => row.try_get::<_, Option<i64>>(idx)?.into(),
        Type::OID => row.try_get::<_, Option<u32>>(idx)?.into(),
        Type::FLOAT4 => row.try_get::<_, Option<f32>>(idx)?.into(),
        Type::FLOAT8 => row.try_get::<_, Option<f64>>(idx)?.into(),
        Type::NUMERIC => row
            .try_get::<_, Option<Decimal>>(idx)?
            .map(|v| v.to_string())
            .into(),
        Type::BYTEA => row.try_get::<_, Option<Vec<u8>>>(idx)?.into(),
        Type::JSON | Type::JSONB => row.try_get::<_, Option<serde_json::Value>>(idx)?.into(),
        Type::UUID => row
            .try_get::<_, Option<Uuid>>(idx)?
            .map(|v| v.to_string())
            .into(),
        Type::TIMESTAMPTZ => row
            .try_get::<_, Option<DateTime<Utc>>>(idx)?
            .map(|v| v.to_rfc3339())
            .into(),
        Type::TIMESTAMP => row
            .try_get::<_, Option<NaiveDateTime>>(idx)?
            .map(|v| v.to_string())
            .into(),
        Type::DATE => row
            .try_get::<_, Option<NaiveDate>>(idx)?
            .map(|v| v.to_string())
            .into(),
        Type::TIME => row
            .try_get::<_, Option<NaiveTime>>(idx)?
            .map(|v| v.to_string())
            .into(),
        _ => row.try_get::<_, Option<String>>(idx)?.into(),
    };
    Ok(value)
}
