//! Typed access to decoded document records.
//!
//! The container format is decoded elsewhere into a [`serde_json::Value`]
//! tree. [`Record`] wraps one object of that tree and offers typed getters
//! that report [`DocumentError`]s positioned by the record's path.

use serde_json::{Map, Value};

use crate::{
    error::DocumentError,
    geometry::{Bounds, Point, Size},
};

/// A borrowed object node of the decoded document tree.
#[derive(Debug, Clone)]
pub struct Record<'a> {
    fields: &'a Map<String, Value>,
    path: String,
}

impl<'a> Record<'a> {
    /// Wraps `value`, which must be an object.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::WrongType`] if `value` is not an object.
    pub fn new(value: &'a Value, path: impl Into<String>) -> Result<Self, DocumentError> {
        let path = path.into();
        match value {
            Value::Object(fields) => Ok(Self { fields, path }),
            _ => Err(DocumentError::WrongType {
                path,
                expected: "an object",
            }),
        }
    }

    /// Returns the slash-separated path of this record
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the path of a key inside this record
    pub fn path_of(&self, key: &str) -> String {
        format!("{}/{key}", self.path)
    }

    /// Returns the raw value of a key, if present
    pub fn get(&self, key: &str) -> Option<&'a Value> {
        self.fields.get(key)
    }

    /// Returns true if the key is present
    pub fn has(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// Iterates over all fields in the record
    pub fn iter(&self) -> impl Iterator<Item = (&'a String, &'a Value)> + use<'a> {
        self.fields.iter()
    }

    fn required(&self, key: &str) -> Result<&'a Value, DocumentError> {
        self.get(key).ok_or_else(|| DocumentError::MissingKey {
            path: self.path_of(key),
        })
    }

    fn wrong_type(&self, key: &str, expected: &'static str) -> DocumentError {
        DocumentError::WrongType {
            path: self.path_of(key),
            expected,
        }
    }

    /// Returns an optional string field.
    pub fn str(&self, key: &str) -> Result<Option<&'a str>, DocumentError> {
        match self.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) => Ok(Some(s)),
            Some(_) => Err(self.wrong_type(key, "a string")),
        }
    }

    /// Returns an optional integer field.
    pub fn int(&self, key: &str) -> Result<Option<i64>, DocumentError> {
        match self.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => value
                .as_i64()
                .map(Some)
                .ok_or_else(|| self.wrong_type(key, "an integer")),
        }
    }

    /// Returns a required integer field.
    pub fn required_int(&self, key: &str) -> Result<i64, DocumentError> {
        self.required(key)?;
        self.int(key)?.ok_or_else(|| self.wrong_type(key, "an integer"))
    }

    /// Returns an optional number field.
    pub fn float(&self, key: &str) -> Result<Option<f64>, DocumentError> {
        match self.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => value
                .as_f64()
                .map(Some)
                .ok_or_else(|| self.wrong_type(key, "a number")),
        }
    }

    /// Returns an optional boolean field.
    ///
    /// Integers are accepted as booleans since the host format stores
    /// flags either way.
    pub fn bool(&self, key: &str) -> Result<Option<bool>, DocumentError> {
        match self.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Bool(b)) => Ok(Some(*b)),
            Some(Value::Number(n)) => Ok(Some(n.as_i64() != Some(0))),
            Some(_) => Err(self.wrong_type(key, "a boolean")),
        }
    }

    /// Returns an optional nested record.
    pub fn record(&self, key: &str) -> Result<Option<Record<'a>>, DocumentError> {
        match self.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => Record::new(value, self.path_of(key)).map(Some),
        }
    }

    /// Returns an optional list field.
    pub fn list(&self, key: &str) -> Result<Option<&'a [Value]>, DocumentError> {
        match self.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Array(items)) => Ok(Some(items)),
            Some(_) => Err(self.wrong_type(key, "a list")),
        }
    }

    /// Returns a required list field.
    pub fn required_list(&self, key: &str) -> Result<&'a [Value], DocumentError> {
        self.required(key)?;
        self.list(key)?.ok_or_else(|| self.wrong_type(key, "a list"))
    }

    /// Returns the records of a list field, each positioned by index.
    pub fn records(&self, key: &str) -> Result<Vec<Record<'a>>, DocumentError> {
        let items = self.list(key)?.unwrap_or_default();
        Self::records_of(items, &self.path_of(key))
    }

    /// Returns the records of a required list field.
    pub fn required_records(&self, key: &str) -> Result<Vec<Record<'a>>, DocumentError> {
        let items = self.required_list(key)?;
        Self::records_of(items, &self.path_of(key))
    }

    fn records_of(items: &'a [Value], path: &str) -> Result<Vec<Record<'a>>, DocumentError> {
        items
            .iter()
            .enumerate()
            .map(|(index, item)| Record::new(item, format!("{path}/{index}")))
            .collect()
    }

    /// Returns a list of strings; scalars are accepted as one-element lists.
    pub fn strings(&self, key: &str) -> Result<Vec<String>, DocumentError> {
        match self.get(key) {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| scalar_to_string(item).ok_or_else(|| self.wrong_type(key, "a list of strings")))
                .collect(),
            Some(value) => scalar_to_string(value)
                .map(|s| vec![s])
                .ok_or_else(|| self.wrong_type(key, "a string")),
        }
    }

    /// Reads a rectangle stored as `"{{x, y}, {w, h}}"` or `[x, y, w, h]`.
    pub fn bounds(&self, key: &str) -> Result<Option<Bounds>, DocumentError> {
        let invalid = |text: String| DocumentError::InvalidGeometry {
            path: self.path_of(key),
            text,
        };

        match self.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(text)) => Bounds::parse(text)
                .map(Some)
                .ok_or_else(|| invalid(text.clone())),
            Some(value) => {
                let parsed = match value.as_array().and_then(|items| numbers(items)).as_deref() {
                    Some(&[x, y, w, h]) => Some(Bounds::new(Point::new(x, y), Size::new(w, h))),
                    _ => None,
                };
                parsed.map(Some).ok_or_else(|| invalid(value.to_string()))
            }
        }
    }

    /// Reads a list of points stored as `"{x, y}"` strings or `[x, y]` pairs.
    pub fn points(&self, key: &str) -> Result<Vec<Point>, DocumentError> {
        let Some(items) = self.list(key)? else {
            return Ok(Vec::new());
        };

        items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                let point = match item {
                    Value::String(text) => Point::parse(text),
                    Value::Array(pair) => match numbers(pair).as_deref() {
                        Some(&[x, y]) => Some(Point::new(x, y)),
                        _ => None,
                    },
                    _ => None,
                };
                point.ok_or_else(|| DocumentError::InvalidGeometry {
                    path: format!("{}/{index}", self.path_of(key)),
                    text: item.to_string(),
                })
            })
            .collect()
    }
}

/// Renders a scalar as a string; objects and lists yield `None`.
pub fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

fn numbers(items: &[Value]) -> Option<Vec<f64>> {
    items.iter().map(Value::as_f64).collect()
}
