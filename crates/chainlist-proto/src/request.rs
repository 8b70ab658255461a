//! Request bodies and their validation.
//!
//! Bodies are parsed into a loose JSON value first and then checked field by
//! field, so that every rejection carries a message the visualizer can show
//! as-is. Nothing here touches the list: a body either validates completely
//! or the request is refused.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

use crate::ValidationError;

/// 2^63 as a float; the first value past `i64::MAX`.
const I64_BOUND: f64 = 9_223_372_036_854_775_808.0;

/// Where an insert attaches the new node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    /// New node becomes the head.
    Start,
    /// New node becomes the tail.
    #[default]
    End,
}

impl Position {
    /// Wire name of the position.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::End => "end",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Position {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "start" => Ok(Self::Start),
            "end" => Ok(Self::End),
            other => Err(ValidationError::InvalidPosition(other.to_string())),
        }
    }
}

/// Validated body of `POST /api/linkedlist/insert`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct InsertRequest {
    /// Value to insert.
    pub value: i64,
    /// Where to insert it.
    pub position: Position,
}

impl InsertRequest {
    /// Create an insert request.
    pub fn new(value: i64, position: Position) -> Self {
        Self { value, position }
    }

    /// Parse and validate a JSON request body.
    ///
    /// `position` is optional and defaults to [`Position::End`].
    pub fn from_json(body: &[u8]) -> Result<Self, ValidationError> {
        let fields = parse_object(body)?;
        let value = parse_value(fields.get("value"))?;
        let position = match fields.get("position") {
            None | Some(Value::Null) => Position::default(),
            Some(Value::String(s)) => s.parse()?,
            Some(other) => return Err(ValidationError::InvalidPosition(other.to_string())),
        };

        Ok(Self { value, position })
    }
}

/// Validated body of `DELETE /api/linkedlist/delete`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DeleteRequest {
    /// Value of the node to remove (first match from the head).
    pub value: i64,
}

impl DeleteRequest {
    /// Create a delete request.
    pub fn new(value: i64) -> Self {
        Self { value }
    }

    /// Parse and validate a JSON request body.
    pub fn from_json(body: &[u8]) -> Result<Self, ValidationError> {
        let fields = parse_object(body)?;
        let value = parse_value(fields.get("value"))?;
        Ok(Self { value })
    }
}

/// Interpret a `value` field as a signed integer.
///
/// Accepts JSON integers, floats without a fractional part (`5.0`), and
/// strings holding a decimal integer. `null` counts as missing.
pub fn parse_value(raw: Option<&Value>) -> Result<i64, ValidationError> {
    match raw {
        None | Some(Value::Null) => Err(ValidationError::MissingValue),
        Some(Value::Number(n)) => number_to_i64(n),
        Some(Value::String(s)) => {
            s.trim().parse::<i64>().map_err(|_| ValidationError::NotANumber(format!("{s:?}")))
        },
        Some(other) => Err(ValidationError::NotANumber(other.to_string())),
    }
}

fn parse_object(body: &[u8]) -> Result<Map<String, Value>, ValidationError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(ValidationError::MissingValue);
    }

    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(fields)) => Ok(fields),
        Ok(_) => Err(ValidationError::MissingValue),
        Err(e) => Err(ValidationError::MalformedJson(e.to_string())),
    }
}

#[allow(clippy::cast_possible_truncation)]
fn number_to_i64(n: &Number) -> Result<i64, ValidationError> {
    if let Some(v) = n.as_i64() {
        return Ok(v);
    }
    if n.is_u64() {
        return Err(ValidationError::OutOfRange(n.to_string()));
    }

    match n.as_f64() {
        Some(f) if f.fract() != 0.0 => Err(ValidationError::Fractional(n.to_string())),
        // range checked, fraction is zero: the cast is exact
        Some(f) if (-I64_BOUND..I64_BOUND).contains(&f) => Ok(f as i64),
        _ => Err(ValidationError::OutOfRange(n.to_string())),
    }
}
