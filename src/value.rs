/*!
# Value Model

Defines the decoded JSON tree that paths are resolved against, and the
[`Literal`] a caller supplies as the expected side of a comparison.

Numbers keep their numeral text so that `3` and `3.0` stay distinguishable
after decoding:

```
use http_assert::value::JSONValue;
let value = JSONValue::try_from(r#"{"int": 3, "float": 3.0}"#).unwrap();
let JSONValue::Object(map) = value else { unreachable!() };
assert_eq!(map["int"], JSONValue::Number("3".into()));
assert_eq!(map["float"], JSONValue::Number("3.0".into()));
```
*/
use std::collections::HashMap;
use std::fmt;

/// Primary JSON AST definition
#[derive(PartialEq, Eq, Debug, Clone)]
pub enum JSONValue {
    /// Represents a JSON object with string keys and values of any type
    Object(Box<HashMap<String, Self>>),
    /// Represents a JSON array containing values of any type
    Array(Vec<Self>),
    /// Represents a JSON number, kept as its numeral text
    Number(String),
    /// Represents a JSON string value
    JString(String),
    /// Represents a JSON Boolean value
    Boolean(bool),
    /// Represents a JSON null value
    Null,
}

impl JSONValue {
    /// Short name of the variant, used in diagnostics.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Object(_) => "object",
            Self::Array(_) => "array",
            Self::Number(_) => "number",
            Self::JString(_) => "string",
            Self::Boolean(_) => "boolean",
            Self::Null => "null",
        }
    }

    /// Whether a path can descend into this value.
    #[must_use]
    pub const fn is_container(&self) -> bool {
        matches!(self, Self::Object(_) | Self::Array(_))
    }

    /// Decode raw bytes (e.g. an HTTP body) into a value tree.
    ///
    /// # Errors
    ///
    /// Returns a [`serde_json::Error`] if the bytes are not valid JSON.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        let value: serde_json::Value = serde_json::from_slice(bytes)?;
        Ok(value.into())
    }

    /// Convert to compact JSON string
    #[must_use]
    pub fn to_json(&self) -> String {
        serde_json::Value::from(self).to_string()
    }
}

/// Generic textual form of a value, used by the numeric coercion in
/// [`crate::compare`]. Strings are written without quotes.
impl fmt::Display for JSONValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(text) | Self::JString(text) => write!(f, "{text}"),
            Self::Boolean(b) => write!(f, "{b}"),
            Self::Null => write!(f, "null"),
            Self::Object(_) | Self::Array(_) => write!(f, "{}", self.to_json()),
        }
    }
}

impl From<serde_json::Value> for JSONValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Boolean(b),
            serde_json::Value::Number(number) => {
                Self::Number(number.to_string())
            }
            serde_json::Value::String(str) => Self::JString(str),
            serde_json::Value::Array(values) => {
                Self::Array(values.into_iter().map(Self::from).collect())
            }
            serde_json::Value::Object(map) => {
                let converted_obj: HashMap<String, Self> =
                    map.into_iter().map(|(k, v)| (k, Self::from(v))).collect();
                Self::Object(Box::new(converted_obj))
            }
        }
    }
}

impl From<&JSONValue> for serde_json::Value {
    fn from(value: &JSONValue) -> Self {
        match value {
            JSONValue::Null => Self::Null,
            JSONValue::Boolean(b) => Self::Bool(*b),
            // Numeral text came from serde_json, so it re-parses.
            JSONValue::Number(text) => serde_json::from_str(text)
                .unwrap_or_else(|_| Self::String(text.clone())),
            JSONValue::JString(s) => Self::String(s.clone()),
            JSONValue::Array(values) => {
                Self::Array(values.iter().map(Self::from).collect())
            }
            JSONValue::Object(map) => Self::Object(
                map.iter().map(|(k, v)| (k.clone(), Self::from(v))).collect(),
            ),
        }
    }
}

// `TryFrom` over `From` since input string may be malformed -> conversion is
// falliable
impl TryFrom<&str> for JSONValue {
    type Error = serde_json::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::from_slice(value.as_bytes())
    }
}

/// An expected value supplied by the caller of an assertion.
#[derive(PartialEq, Debug, Clone)]
pub enum Literal {
    /// No value; classifies as unknown and never compares equal
    Null,
    /// A boolean
    Bool(bool),
    /// An integer
    Int(i64),
    /// A floating point number
    Float(f64),
    /// A string
    Str(String),
    /// A list of strings
    Strings(Vec<String>),
    /// A list of integers
    Ints(Vec<i64>),
    /// A list of floats
    Floats(Vec<f64>),
    /// A list of arbitrary JSON values
    Array(Vec<JSONValue>),
    /// A JSON object
    Object(HashMap<String, JSONValue>),
}

/// Mirrors [`JSONValue`]'s textual form so both sides of a numeric
/// comparison go through the same format-then-reparse step.
impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Str(s) => write!(f, "{s}"),
            Self::Strings(items) => write!(f, "{items:?}"),
            Self::Ints(items) => write!(f, "{items:?}"),
            Self::Floats(items) => write!(f, "{items:?}"),
            Self::Array(items) => {
                write!(f, "{}", JSONValue::Array(items.clone()).to_json())
            }
            Self::Object(map) => {
                write!(f, "{}", JSONValue::Object(Box::new(map.clone())).to_json())
            }
        }
    }
}

macro_rules! literal_from_int {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Literal {
                fn from(value: $ty) -> Self {
                    Self::Int(i64::from(value))
                }
            }
        )*
    };
}

literal_from_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<bool> for Literal {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

macro_rules! literal_from_wide_int {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Literal {
                /// Values above `i64::MAX` become floats.
                fn from(value: $ty) -> Self {
                    i64::try_from(value).map_or_else(
                        |_| {
                            let text = value.to_string();
                            Self::Float(text.parse().unwrap_or(f64::MAX))
                        },
                        Self::Int,
                    )
                }
            }
        )*
    };
}

literal_from_wide_int!(u64, usize);

impl From<f32> for Literal {
    /// Goes through the f32's shortest text so `1.1_f32` stays `1.1`.
    fn from(value: f32) -> Self {
        Self::Float(
            value
                .to_string()
                .parse()
                .unwrap_or_else(|_| f64::from(value)),
        )
    }
}

impl From<f64> for Literal {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for Literal {
    fn from(value: &str) -> Self {
        Self::Str(value.to_owned())
    }
}

impl From<String> for Literal {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<Vec<String>> for Literal {
    fn from(value: Vec<String>) -> Self {
        Self::Strings(value)
    }
}

impl From<Vec<&str>> for Literal {
    fn from(value: Vec<&str>) -> Self {
        Self::Strings(value.into_iter().map(str::to_owned).collect())
    }
}

impl From<Vec<i64>> for Literal {
    fn from(value: Vec<i64>) -> Self {
        Self::Ints(value)
    }
}

impl From<Vec<f64>> for Literal {
    fn from(value: Vec<f64>) -> Self {
        Self::Floats(value)
    }
}

/// Used by the CLI, where expected values arrive as JSON text.
impl From<serde_json::Value> for Literal {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(b),
            serde_json::Value::Number(n) => n.as_i64().map_or_else(
                || n.as_f64().map_or_else(|| Self::Str(n.to_string()), Self::Float),
                Self::Int,
            ),
            serde_json::Value::String(s) => Self::Str(s),
            serde_json::Value::Array(values) => {
                Self::Array(values.into_iter().map(JSONValue::from).collect())
            }
            serde_json::Value::Object(map) => Self::Object(
                map.into_iter().map(|(k, v)| (k, JSONValue::from(v))).collect(),
            ),
        }
    }
}
