//! Field mapping tables and tolerant JSON readers shared by the normalizers.

use serde_json::{Map, Value};

use crate::datasets::Dataset;
use crate::domain::team_slug;
use crate::error::ApiError;

/// One output column and the upstream keys it may arrive under.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Field {
    pub column: &'static str,
    pub keys: &'static [&'static str],
    pub required: bool,
}

impl Field {
    pub const fn required(column: &'static str, keys: &'static [&'static str]) -> Self {
        Self {
            column,
            keys,
            required: true,
        }
    }

    pub const fn optional(column: &'static str, keys: &'static [&'static str]) -> Self {
        Self {
            column,
            keys,
            required: false,
        }
    }
}

/// Splits a payload into its object elements.
///
/// `null` is an empty result. Anything other than an array is a schema error;
/// non-object elements are skipped with a warning.
pub(crate) fn objects(
    dataset: Dataset,
    payload: &Value,
) -> Result<Vec<&Map<String, Value>>, ApiError> {
    let items = match payload {
        Value::Array(items) => items,
        Value::Null => return Ok(Vec::new()),
        other => {
            return Err(ApiError::Schema {
                endpoint: dataset.endpoint().to_owned(),
                message: format!("expected a JSON array, got {}", type_name(other)),
            })
        }
    };

    Ok(items
        .iter()
        .enumerate()
        .filter_map(|(index, item)| match item {
            Value::Object(object) => Some(object),
            other => {
                tracing::warn!(
                    dataset = dataset.as_str(),
                    index,
                    found = type_name(other),
                    "skipping non-object element"
                );
                None
            }
        })
        .collect())
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Read access to one upstream object with null fallbacks.
pub(crate) struct Row<'a> {
    dataset: Dataset,
    object: &'a Map<String, Value>,
}

impl<'a> Row<'a> {
    pub fn new(dataset: Dataset, object: &'a Map<String, Value>) -> Self {
        Self { dataset, object }
    }

    /// First non-null value among the field's keys. Logs drift when a
    /// required field has none.
    pub fn raw(&self, field: &Field) -> Option<&'a Value> {
        let found = field
            .keys
            .iter()
            .filter_map(|key| self.object.get(*key))
            .find(|value| !value.is_null());

        if found.is_none() && field.required {
            tracing::warn!(
                dataset = self.dataset.as_str(),
                column = field.column,
                keys = ?field.keys,
                "required field missing from payload"
            );
        }
        found
    }

    pub fn string(&self, field: &Field) -> Option<String> {
        self.raw(field).and_then(as_string)
    }

    pub fn team(&self, field: &Field) -> Option<String> {
        self.string(field)
            .map(|name| team_slug(&name))
            .filter(|slug| !slug.is_empty())
    }

    pub fn int(&self, field: &Field) -> Option<i64> {
        self.raw(field).and_then(as_int)
    }

    pub fn float(&self, field: &Field) -> Option<f64> {
        self.raw(field).and_then(as_float)
    }

    pub fn boolean(&self, field: &Field) -> Option<bool> {
        self.raw(field).and_then(as_bool)
    }

    /// A media outlet list: a plain string, or an array joined with `", "`.
    pub fn outlets(&self, field: &Field) -> Option<String> {
        match self.raw(field)? {
            Value::Array(items) => {
                let names = items.iter().filter_map(as_string).collect::<Vec<_>>();
                (!names.is_empty()).then(|| names.join(", "))
            }
            other => as_string(other),
        }
    }

    pub fn array(&self, field: &Field) -> Option<&'a Vec<Value>> {
        self.raw(field).and_then(Value::as_array)
    }
}

fn as_string(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => {
            let trimmed = text.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_owned())
        }
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

fn as_float(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    number.is_finite().then_some(number)
}

fn as_int(value: &Value) -> Option<i64> {
    if let Some(number) = value.as_i64() {
        return Some(number);
    }
    if let Value::String(text) = value {
        if let Ok(number) = text.trim().parse::<i64>() {
            return Some(number);
        }
    }
    as_float(value)
        .filter(|number| number.fract() == 0.0 && number.abs() < i64::MAX as f64)
        .map(|number| number as i64)
}

fn as_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(flag) => Some(*flag),
        Value::String(text) => match text.trim().to_ascii_lowercase().as_str() {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        },
        _ => None,
    }
}
