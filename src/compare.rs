/*!
# Typed Comparison

Classifies decoded values and caller literals into a [`TypeTag`], then
evaluates equality and ordering between an expected [`Literal`] and an actual
[`JSONValue`] under that tag.

Numeric comparisons format both operands to text and re-parse them as the
tag's number type. A literal that does not survive the re-parse (e.g. `1.5`
under [`TypeTag::Int`]) makes the comparison `false` rather than promoting it:

```
use http_assert::compare::{TypeTag, equal};
use http_assert::value::{JSONValue, Literal};

let actual = JSONValue::Number("1".into());
assert!(equal(&Literal::Int(1), &actual, TypeTag::Int));
assert!(!equal(&Literal::Float(1.5), &actual, TypeTag::Int));
```
*/
use std::{fmt, str::FromStr};

use crate::value::{JSONValue, Literal};

/// Comparison-relevant type of a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeTag {
    /// `true` / `false`
    Bool,
    /// A number whose text parses as a 64-bit integer
    Int,
    /// Any other number
    Float,
    /// A string
    String,
    /// An object
    Object,
    /// An array made only of strings
    ArrayOfString,
    /// An array made only of integers
    ArrayOfInt,
    /// An array made only of numbers, at least one fractional
    ArrayOfFloat,
    /// Any other array
    ArrayOfObject,
    /// Null, or a number that parses as neither integer nor float
    Unknown,
}

impl TypeTag {
    const fn name(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Float => "float",
            Self::String => "string",
            Self::Object => "object",
            Self::ArrayOfString => "array-string",
            Self::ArrayOfInt => "array-int",
            Self::ArrayOfFloat => "array-float",
            Self::ArrayOfObject => "array-object",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a type name is not one of the [`TypeTag`] names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownTypeName(pub String);

impl std::error::Error for UnknownTypeName {}

impl fmt::Display for UnknownTypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown type name `{}` (expected one of bool, int, float, \
             string, object, array-string, array-int, array-float, \
             array-object, unknown)",
            self.0
        )
    }
}

impl FromStr for TypeTag {
    type Err = UnknownTypeName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = match s {
            "bool" => Self::Bool,
            "int" => Self::Int,
            "float" => Self::Float,
            "string" => Self::String,
            "object" => Self::Object,
            "array-string" => Self::ArrayOfString,
            "array-int" => Self::ArrayOfInt,
            "array-float" => Self::ArrayOfFloat,
            "array-object" => Self::ArrayOfObject,
            "unknown" => Self::Unknown,
            other => return Err(UnknownTypeName(other.to_owned())),
        };
        Ok(tag)
    }
}

/// Ordering operator applied as `actual <op> expected`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ordering {
    /// Strictly greater than
    Gt,
    /// Greater than or equal
    Gte,
    /// Strictly less than
    Lt,
    /// Less than or equal
    Lte,
}

impl Ordering {
    fn holds<T: PartialOrd>(self, actual: &T, expected: &T) -> bool {
        match self {
            Self::Gt => actual > expected,
            Self::Gte => actual >= expected,
            Self::Lt => actual < expected,
            Self::Lte => actual <= expected,
        }
    }
}

impl fmt::Display for Ordering {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let op = match self {
            Self::Gt => "gt",
            Self::Gte => "gte",
            Self::Lt => "lt",
            Self::Lte => "lte",
        };
        f.write_str(op)
    }
}

impl FromStr for Ordering {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "gt" => Ok(Self::Gt),
            "gte" => Ok(Self::Gte),
            "lt" => Ok(Self::Lt),
            "lte" => Ok(Self::Lte),
            other => Err(format!("unknown ordering operator `{other}`")),
        }
    }
}

/// Element kinds seen while scanning an array.
#[derive(Clone, Copy, PartialEq, Eq)]
enum ElementKind {
    String,
    Int,
    Float,
    Other,
}

/// Fold element kinds into one array tag. Integers widen to floats; every
/// other mix, and the empty array, is [`TypeTag::ArrayOfObject`].
fn classify_elements<I>(kinds: I) -> TypeTag
where
    I: IntoIterator<Item = ElementKind>,
{
    let mut acc: Option<ElementKind> = None;
    for kind in kinds {
        acc = match (acc, kind) {
            (_, ElementKind::Other) => return TypeTag::ArrayOfObject,
            (None, k) => Some(k),
            (Some(a), k) if a == k => Some(a),
            (
                Some(ElementKind::Int | ElementKind::Float),
                ElementKind::Int | ElementKind::Float,
            ) => Some(ElementKind::Float),
            _ => return TypeTag::ArrayOfObject,
        };
    }
    match acc {
        Some(ElementKind::String) => TypeTag::ArrayOfString,
        Some(ElementKind::Int) => TypeTag::ArrayOfInt,
        Some(ElementKind::Float) => TypeTag::ArrayOfFloat,
        Some(ElementKind::Other) | None => TypeTag::ArrayOfObject,
    }
}

/// Integer text is tested before float text, so `3` is an int and `3.0` a
/// float.
fn classify_numeral(text: &str) -> TypeTag {
    if text.parse::<i64>().is_ok() {
        TypeTag::Int
    } else if text.parse::<f64>().is_ok() {
        TypeTag::Float
    } else {
        TypeTag::Unknown
    }
}

/// Classify a decoded JSON value.
#[must_use]
pub fn classify_decoded(value: &JSONValue) -> TypeTag {
    match value {
        JSONValue::Null => TypeTag::Unknown,
        JSONValue::Boolean(_) => TypeTag::Bool,
        JSONValue::Number(text) => classify_numeral(text),
        JSONValue::JString(_) => TypeTag::String,
        JSONValue::Object(_) => TypeTag::Object,
        JSONValue::Array(items) => {
            classify_elements(items.iter().map(|item| {
                match classify_decoded(item) {
                    TypeTag::String => ElementKind::String,
                    TypeTag::Int => ElementKind::Int,
                    TypeTag::Float => ElementKind::Float,
                    _ => ElementKind::Other,
                }
            }))
        }
    }
}

/// Classify a caller-supplied literal. Agrees with [`classify_decoded`] on
/// every shape both can express.
#[must_use]
pub fn classify_literal(value: &Literal) -> TypeTag {
    match value {
        Literal::Null => TypeTag::Unknown,
        Literal::Bool(_) => TypeTag::Bool,
        Literal::Int(_) => TypeTag::Int,
        Literal::Float(_) => TypeTag::Float,
        Literal::Str(_) => TypeTag::String,
        Literal::Object(_) => TypeTag::Object,
        // empty lists fall through to `ArrayOfObject` like a decoded `[]`
        Literal::Strings(items) => {
            classify_elements(items.iter().map(|_| ElementKind::String))
        }
        Literal::Ints(items) => {
            classify_elements(items.iter().map(|_| ElementKind::Int))
        }
        Literal::Floats(items) => {
            classify_elements(items.iter().map(|_| ElementKind::Float))
        }
        Literal::Array(items) => {
            classify_decoded(&JSONValue::Array(items.clone()))
        }
    }
}

/// Format-then-reparse coercion shared by every numeric comparison.
fn coerce<T: FromStr>(value: &impl ToString) -> Option<T> {
    value.to_string().parse().ok()
}

fn coerce_pair<T: FromStr>(
    expected: &Literal,
    actual: &JSONValue,
) -> Option<(T, T)> {
    Some((coerce(expected)?, coerce(actual)?))
}

/// Evaluate the per-type equality rule. `None` means the tag is unsupported
/// or a numeric operand could not be coerced; a kind mismatch under the
/// String or Bool tag is a plain `Some(false)`.
#[allow(clippy::float_cmp)]
fn equality(
    expected: &Literal,
    actual: &JSONValue,
    tag: TypeTag,
) -> Option<bool> {
    match tag {
        TypeTag::String => match (expected, actual) {
            (Literal::Str(e), JSONValue::JString(a)) => Some(e == a),
            _ => Some(false),
        },
        TypeTag::Int => {
            coerce_pair::<i64>(expected, actual).map(|(e, a)| e == a)
        }
        TypeTag::Float => {
            coerce_pair::<f64>(expected, actual).map(|(e, a)| e == a)
        }
        TypeTag::Bool => match (expected, actual) {
            (Literal::Bool(e), JSONValue::Boolean(a)) => Some(e == a),
            _ => Some(false),
        },
        TypeTag::Object
        | TypeTag::ArrayOfString
        | TypeTag::ArrayOfInt
        | TypeTag::ArrayOfFloat
        | TypeTag::ArrayOfObject
        | TypeTag::Unknown => None,
    }
}

/// Whether `actual` equals `expected` under `tag`.
///
/// Structural types and [`TypeTag::Unknown`] always yield `false`.
#[must_use]
pub fn equal(expected: &Literal, actual: &JSONValue, tag: TypeTag) -> bool {
    equality(expected, actual, tag).unwrap_or(false)
}

/// Whether `actual` differs from `expected` under `tag`.
///
/// This is not `!equal(..)`: unsupported tags and failed numeric coercions
/// are `false` here too.
#[must_use]
pub fn not_equal(expected: &Literal, actual: &JSONValue, tag: TypeTag) -> bool {
    equality(expected, actual, tag).is_some_and(|eq| !eq)
}

/// Whether `actual <op> expected` holds under `tag`.
///
/// Only [`TypeTag::Int`] and [`TypeTag::Float`] are ordered; every other
/// tag yields `false`.
#[must_use]
pub fn compare(
    expected: &Literal,
    actual: &JSONValue,
    op: Ordering,
    tag: TypeTag,
) -> bool {
    match tag {
        TypeTag::Int => coerce_pair::<i64>(expected, actual)
            .is_some_and(|(e, a)| op.holds(&a, &e)),
        TypeTag::Float => coerce_pair::<f64>(expected, actual)
            .is_some_and(|(e, a)| op.holds(&a, &e)),
        TypeTag::Bool
        | TypeTag::String
        | TypeTag::Object
        | TypeTag::ArrayOfString
        | TypeTag::ArrayOfInt
        | TypeTag::ArrayOfFloat
        | TypeTag::ArrayOfObject
        | TypeTag::Unknown => false,
    }
}
