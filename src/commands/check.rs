//! `check` subcommand.
use crate::assert::{AssertError, Assertion, Body};
use crate::compare::{Ordering, TypeTag};
use crate::value::{JSONValue, Literal};

/// One check requested on the command line, applied in order.
#[derive(Debug, Clone, PartialEq)]
pub enum Check {
    /// `--has PATH`
    Has(String),
    /// `--where PATH=VALUE`
    Where(String, Literal),
    /// `--where-not PATH=VALUE`
    WhereNot(String, Literal),
    /// `--where-type PATH=TYPE`
    WhereType(String, TypeTag),
    /// `--length PATH=N`
    Length(String, usize),
    /// `--gt`, `--gte`, `--lt`, `--lte` with `PATH=VALUE`
    Ord(String, Ordering, Literal),
}

impl Check {
    /// Append this check to `chain`.
    #[must_use]
    pub fn apply(&self, chain: Assertion<Body>) -> Assertion<Body> {
        match self {
            Self::Has(path) => chain.has(path),
            Self::Where(path, value) => chain.where_(path, value.clone()),
            Self::WhereNot(path, value) => chain.where_not(path, value.clone()),
            Self::WhereType(path, tag) => chain.where_type(path, *tag),
            Self::Length(path, len) => chain.has_length(path, *len),
            Self::Ord(path, op, value) => chain.where_ord(path, *op, value.clone()),
        }
    }
}

/// Split `PATH=VALUE` at the first `=`.
///
/// # Errors
///
/// Returns a message for clap when there is no `=` or the path is empty.
pub fn split_key_value(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((path, value)) if !path.is_empty() => {
            Ok((path.to_owned(), value.to_owned()))
        }
        Some(_) => Err(format!("missing path before `=` in `{raw}`")),
        None => Err(format!("expected PATH=VALUE, got `{raw}`")),
    }
}

/// Expected values are read as JSON, so `123` is an int and `"123"` a
/// string. Anything that is not valid JSON is taken as a raw string.
#[must_use]
pub fn parse_literal(raw: &str) -> Literal {
    serde_json::from_str::<serde_json::Value>(raw)
        .map_or_else(|_| Literal::Str(raw.to_owned()), Literal::from)
}

/// Value parser for `PATH=VALUE` flags.
///
/// # Errors
///
/// See [`split_key_value`].
pub fn parse_expectation(raw: &str) -> Result<(String, Literal), String> {
    let (path, value) = split_key_value(raw)?;
    Ok((path, parse_literal(&value)))
}

/// Value parser for `--where-type PATH=TYPE`.
///
/// # Errors
///
/// Fails on a malformed pair or an unknown type name.
pub fn parse_type_check(raw: &str) -> Result<(String, TypeTag), String> {
    let (path, name) = split_key_value(raw)?;
    let tag = name.parse::<TypeTag>().map_err(|e| e.to_string())?;
    Ok((path, tag))
}

/// Value parser for `--length PATH=N`.
///
/// # Errors
///
/// Fails on a malformed pair or a length that is not a non-negative integer.
pub fn parse_length_check(raw: &str) -> Result<(String, usize), String> {
    let (path, len) = split_key_value(raw)?;
    let len = len
        .parse::<usize>()
        .map_err(|e| format!("invalid length `{len}`: {e}"))?;
    Ok((path, len))
}

/// Decode `body` and run every check against it.
///
/// A body that is not JSON yields a chain that is already fatal.
#[must_use]
pub fn evaluate(body: &[u8], checks: &[Check]) -> Assertion<Body> {
    let chain = match JSONValue::from_slice(body) {
        Ok(value) => Assertion::new(Body::from(value)),
        Err(err) => Assertion::broken(
            Body::from(JSONValue::Null),
            AssertError::UnreadableBody(err),
        ),
    };
    checks.iter().fold(chain, |chain, check| check.apply(chain))
}
