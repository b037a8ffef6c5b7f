use crate::{Error, Result};
use serde_json::{Map, Value};

/// Keys every payload from the monitoring device must carry.
pub const REQUIRED_FIELDS: [&str; 5] = ["nivel", "temp", "umid", "luz", "pres"];

/// One telemetry sample from the paint-line monitoring device
#[derive(Debug, Clone, PartialEq)]
pub struct SensorReading {
    /// Paint tank level
    pub nivel: f64,
    /// Temperature
    pub temp: f64,
    /// Relative humidity
    pub umid: f64,
    /// Light intensity (raw sensor units)
    pub luz: i64,
    /// Presence detected near the line
    pub pres: bool,
}

impl SensorReading {
    /// Parse and coerce a raw request body.
    ///
    /// Anything that is not a non-empty JSON object is `NoPayload`. Presence of
    /// all required keys is checked before any value is coerced, so a payload
    /// that is both incomplete and malformed is reported as incomplete.
    pub fn from_payload(body: &[u8]) -> Result<Self> {
        let value: Value = serde_json::from_slice(body).map_err(|_| Error::NoPayload)?;

        let fields = match value {
            Value::Object(map) if !map.is_empty() => map,
            _ => return Err(Error::NoPayload),
        };

        if !REQUIRED_FIELDS.iter().all(|name| fields.contains_key(*name)) {
            return Err(Error::MissingFields);
        }

        Ok(Self {
            nivel: coerce_float("nivel", field(&fields, "nivel")?)?,
            temp: coerce_float("temp", field(&fields, "temp")?)?,
            umid: coerce_float("umid", field(&fields, "umid")?)?,
            luz: coerce_integer("luz", field(&fields, "luz")?)?,
            pres: coerce_bool("pres", field(&fields, "pres")?)?,
        })
    }
}

fn field<'a>(fields: &'a Map<String, Value>, name: &str) -> Result<&'a Value> {
    fields.get(name).ok_or(Error::MissingFields)
}

fn coercion(field: &'static str, target: &'static str, value: &Value) -> Error {
    Error::Coercion {
        field,
        target,
        value: value.to_string(),
    }
}

fn coerce_float(field: &'static str, value: &Value) -> Result<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    parsed
        .filter(|v| v.is_finite())
        .ok_or_else(|| coercion(field, "float", value))
}

fn coerce_integer(field: &'static str, value: &Value) -> Result<i64> {
    let parsed = match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            // Fractional readings are truncated toward zero
            n.as_f64()
                .filter(|f| f.is_finite() && *f >= i64::MIN as f64 && *f < i64::MAX as f64)
                .map(|f| f.trunc() as i64)
        }),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };

    parsed.ok_or_else(|| coercion(field, "integer", value))
}

fn coerce_bool(field: &'static str, value: &Value) -> Result<bool> {
    let parsed = match value {
        Value::Bool(b) => Some(*b),
        // Some firmware serializes every number as a float
        Value::Number(n) => match n.as_f64() {
            Some(f) if f == 1.0 => Some(true),
            Some(f) if f == 0.0 => Some(false),
            _ => None,
        },
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" => Some(true),
            "false" | "0" => Some(false),
            _ => None,
        },
        _ => None,
    };

    parsed.ok_or_else(|| coercion(field, "boolean", value))
}
