/*!
# Assertion Chains

Wraps an [`http::Response`] and exposes fluent checks over its status,
headers and JSON body. Each step consumes the chain and returns it with an
updated [`AssertionState`]; once a step fails, later steps are skipped and
[`Assertion::check`] reports the first failure.

```
use http_assert::Http;

let response = http::Response::builder()
    .status(200)
    .header("x-request-id", "abc")
    .body(r#"{"int": 123, "arr": [{"str": "array"}]}"#)
    .unwrap();
let http = Http::new(response);

assert!(http.assert_status(200));
assert!(http.assert_header().has("x-request-id").check().unwrap());
assert!(
    http.assert_body()
        .where_("int", 123)
        .where_("arr.0.str", "array")
        .has_length("arr", 1)
        .check()
        .unwrap()
);
```
*/
use std::collections::HashMap;
use std::{error::Error, fmt};

use http::HeaderMap;
use log::debug;

use crate::compare::{
    Ordering, TypeTag, classify_decoded, classify_literal, compare, equal,
    not_equal,
};
use crate::path::{ResolveError, resolve};
use crate::value::{JSONValue, Literal};

/// A fatal condition that stops an assertion chain.
#[derive(Debug)]
pub enum AssertError {
    /// The response body is not valid JSON.
    UnreadableBody(serde_json::Error),
    /// A path was resolved against a body of the wrong shape.
    Resolve(ResolveError),
}

impl Error for AssertError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::UnreadableBody(err) => Some(err),
            Self::Resolve(err) => Some(err),
        }
    }
}

impl fmt::Display for AssertError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnreadableBody(err) => {
                write!(f, "cannot read the response body: {err}")
            }
            Self::Resolve(err) => write!(f, "{err}"),
        }
    }
}

impl From<ResolveError> for AssertError {
    fn from(err: ResolveError) -> Self {
        Self::Resolve(err)
    }
}

/// Running result of a chain.
#[derive(Debug)]
pub enum AssertionState {
    /// Every step so far has passed.
    Holding,
    /// A step did not hold; later steps were not evaluated.
    Failed {
        /// Description of the failing step, e.g. `where int == 123`
        step: String,
    },
    /// The chain could not be evaluated at all.
    Fatal(AssertError),
}

impl AssertionState {
    /// Returns `true` while no step has failed.
    #[must_use]
    pub const fn is_holding(&self) -> bool {
        matches!(self, Self::Holding)
    }

    /// Fold the outcome of one step into the state.
    #[must_use]
    pub fn advance(self, step: String, outcome: Result<bool, AssertError>) -> Self {
        match (self, outcome) {
            (Self::Holding, Ok(true)) => Self::Holding,
            (Self::Holding, Ok(false)) => Self::Failed { step },
            (Self::Holding, Err(err)) => Self::Fatal(err),
            (settled, _) => settled,
        }
    }
}

/// Something an [`Assertion`] chain can look values up in.
pub trait Subject {
    /// Find the value addressed by `key`, `Ok(None)` when absent.
    ///
    /// # Errors
    ///
    /// Returns an [`AssertError`] when the subject cannot be queried at all.
    fn lookup(&self, key: &str) -> Result<Option<&JSONValue>, AssertError>;

    /// Whether `key` addresses a value.
    ///
    /// # Errors
    ///
    /// See [`Subject::lookup`].
    fn has(&self, key: &str) -> Result<bool, AssertError> {
        Ok(self.lookup(key)?.is_some())
    }
}

/// Response headers as a flat object of lowercase name to first value.
#[derive(Debug, Clone)]
pub struct Headers(JSONValue);

impl From<&HeaderMap> for Headers {
    fn from(map: &HeaderMap) -> Self {
        let mut fields = HashMap::new();
        for name in map.keys() {
            // non-UTF-8 values are left out
            if let Some(value) = map.get(name).and_then(|v| v.to_str().ok()) {
                fields.insert(
                    name.as_str().to_owned(),
                    JSONValue::JString(value.to_owned()),
                );
            }
        }
        Self(JSONValue::Object(Box::new(fields)))
    }
}

impl Subject for Headers {
    /// Header names are matched whole and case-insensitively; dots are not
    /// path separators here.
    fn lookup(&self, key: &str) -> Result<Option<&JSONValue>, AssertError> {
        let JSONValue::Object(fields) = &self.0 else {
            return Ok(None);
        };
        Ok(fields.get(&key.to_ascii_lowercase()))
    }

    /// An empty header value counts as absent.
    fn has(&self, key: &str) -> Result<bool, AssertError> {
        Ok(self
            .lookup(key)?
            .is_some_and(|v| !matches!(v, JSONValue::JString(s) if s.is_empty())))
    }
}

/// A decoded JSON body, queried with dotted paths.
#[derive(Debug, Clone)]
pub struct Body(JSONValue);

impl Body {
    /// The decoded tree.
    #[must_use]
    pub const fn value(&self) -> &JSONValue {
        &self.0
    }
}

impl From<JSONValue> for Body {
    fn from(value: JSONValue) -> Self {
        Self(value)
    }
}

impl Subject for Body {
    fn lookup(&self, key: &str) -> Result<Option<&JSONValue>, AssertError> {
        Ok(resolve(key, &self.0)?)
    }
}

/// A fluent chain of checks over one [`Subject`].
#[derive(Debug)]
pub struct Assertion<S> {
    subject: S,
    state: AssertionState,
}

impl<S: Subject> Assertion<S> {
    /// Start a chain over `subject`.
    pub const fn new(subject: S) -> Self {
        Self {
            subject,
            state: AssertionState::Holding,
        }
    }

    /// Start a chain that is already fatally broken.
    pub const fn broken(subject: S, err: AssertError) -> Self {
        Self {
            subject,
            state: AssertionState::Fatal(err),
        }
    }

    /// The subject under test.
    pub const fn subject(&self) -> &S {
        &self.subject
    }

    /// The current state of the chain.
    pub const fn state(&self) -> &AssertionState {
        &self.state
    }

    /// Consume the chain and return its state.
    pub fn into_state(self) -> AssertionState {
        self.state
    }

    /// Run one step unless the chain has already settled.
    fn step<F>(self, describe: impl FnOnce() -> String, eval: F) -> Self
    where
        F: FnOnce(&S) -> Result<bool, AssertError>,
    {
        let step = describe();
        if !self.state.is_holding() {
            debug!("skipped: {step}");
            return self;
        }
        let outcome = eval(&self.subject);
        debug!("{step}: {outcome:?}");
        Self {
            state: self.state.advance(step, outcome),
            subject: self.subject,
        }
    }

    /// Run `eval` against the value at `key`; a missing value fails the step.
    fn step_on<F>(self, describe: impl FnOnce() -> String, key: &str, eval: F) -> Self
    where
        F: FnOnce(&JSONValue) -> bool,
    {
        self.step(describe, |subject| {
            Ok(subject.lookup(key)?.is_some_and(eval))
        })
    }

    /// `key` addresses a value.
    #[must_use]
    pub fn has(self, key: &str) -> Self {
        self.step(|| format!("has {key}"), |s| s.has(key))
    }

    /// Every key addresses a value.
    #[must_use]
    pub fn has_all<I, K>(self, keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        keys.into_iter().fold(self, |chain, key| chain.has(key.as_ref()))
    }

    /// The value at `key` equals `expected`, compared under the expected
    /// value's type.
    #[must_use]
    pub fn where_(self, key: &str, expected: impl Into<Literal>) -> Self {
        let expected: Literal = expected.into();
        let tag = classify_literal(&expected);
        self.step_on(
            || format!("where {key} == {expected}"),
            key,
            |actual| equal(&expected, actual, tag),
        )
    }

    /// The value at `key` differs from `expected`.
    #[must_use]
    pub fn where_not(self, key: &str, expected: impl Into<Literal>) -> Self {
        let expected: Literal = expected.into();
        let tag = classify_literal(&expected);
        self.step_on(
            || format!("where {key} != {expected}"),
            key,
            |actual| not_equal(&expected, actual, tag),
        )
    }

    /// The value at `key` classifies as `tag`.
    #[must_use]
    pub fn where_type(self, key: &str, tag: TypeTag) -> Self {
        self.step_on(
            || format!("where {key} is {tag}"),
            key,
            |actual| classify_decoded(actual) == tag,
        )
    }

    /// The value at `key` is an array of `len` elements.
    #[must_use]
    pub fn has_length(self, key: &str, len: usize) -> Self {
        self.step_on(
            || format!("has length {key} == {len}"),
            key,
            |actual| matches!(actual, JSONValue::Array(items) if items.len() == len),
        )
    }

    /// `actual <op> expected` for the value at `key`.
    #[must_use]
    pub fn where_ord(
        self,
        key: &str,
        op: Ordering,
        expected: impl Into<Literal>,
    ) -> Self {
        let expected: Literal = expected.into();
        let tag = classify_literal(&expected);
        self.step_on(
            || format!("where {key} {op} {expected}"),
            key,
            |actual| compare(&expected, actual, op, tag),
        )
    }

    /// The value at `key` is greater than `expected`.
    #[must_use]
    pub fn where_gt(self, key: &str, expected: impl Into<Literal>) -> Self {
        self.where_ord(key, Ordering::Gt, expected)
    }

    /// The value at `key` is at least `expected`.
    #[must_use]
    pub fn where_gte(self, key: &str, expected: impl Into<Literal>) -> Self {
        self.where_ord(key, Ordering::Gte, expected)
    }

    /// The value at `key` is less than `expected`.
    #[must_use]
    pub fn where_lt(self, key: &str, expected: impl Into<Literal>) -> Self {
        self.where_ord(key, Ordering::Lt, expected)
    }

    /// The value at `key` is at most `expected`.
    #[must_use]
    pub fn where_lte(self, key: &str, expected: impl Into<Literal>) -> Self {
        self.where_ord(key, Ordering::Lte, expected)
    }

    /// Terminal check of the chain.
    ///
    /// # Errors
    ///
    /// Returns the [`AssertError`] that made the chain fatal, so malformed
    /// input is reported apart from an assertion that did not hold.
    pub fn check(self) -> Result<bool, AssertError> {
        match self.state {
            AssertionState::Holding => Ok(true),
            AssertionState::Failed { .. } => Ok(false),
            AssertionState::Fatal(err) => Err(err),
        }
    }
}

/// An HTTP response under test.
#[derive(Debug)]
pub struct Http<B> {
    response: http::Response<B>,
}

impl<B: AsRef<[u8]>> Http<B> {
    /// Wrap a response.
    pub const fn new(response: http::Response<B>) -> Self {
        Self { response }
    }

    /// The wrapped response.
    pub const fn response(&self) -> &http::Response<B> {
        &self.response
    }

    /// Whether the status code equals `status`.
    pub fn assert_status(&self, status: u16) -> bool {
        self.response.status().as_u16() == status
    }

    /// Start a chain over the response headers.
    pub fn assert_header(&self) -> Assertion<Headers> {
        Assertion::new(Headers::from(self.response.headers()))
    }

    /// Start a chain over the JSON body. A body that does not decode makes
    /// the chain fatal.
    pub fn assert_body(&self) -> Assertion<Body> {
        match JSONValue::from_slice(self.response.body().as_ref()) {
            Ok(value) => Assertion::new(Body(value)),
            Err(err) => {
                debug!("response body is not JSON: {err}");
                Assertion::broken(
                    Body(JSONValue::Null),
                    AssertError::UnreadableBody(err),
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn respond(body: &str) -> Http<String> {
        Http::new(
            http::Response::builder()
                .status(200)
                .header("x-test-value", "test")
                .header("x-count", "5")
                .header("x-empty", "")
                .body(body.to_owned())
                .unwrap(),
        )
    }

    #[test]
    fn status() {
        let http = respond("{}");
        assert!(http.assert_status(200));
        assert!(!http.assert_status(201));
    }

    #[test]
    fn header_has_and_where() {
        let http = respond("{}");
        assert!(
            http.assert_header()
                .has("x-test-value")
                .where_("x-test-value", "test")
                .check()
                .unwrap()
        );
        assert!(
            !http.assert_header()
                .has("x-test-value")
                .where_("x-test-value", "123")
                .check()
                .unwrap()
        );
    }

    #[test]
    fn header_names_are_case_insensitive_and_empty_is_absent() {
        let http = respond("{}");
        assert!(http.assert_header().has("X-Test-Value").check().unwrap());
        assert!(!http.assert_header().has("x-empty").check().unwrap());
        assert!(!http.assert_header().has("x-missing").check().unwrap());
    }

    #[test]
    fn numeric_header_values_coerce() {
        let http = respond("{}");
        assert!(
            http.assert_header()
                .where_("x-count", 5)
                .where_gt("x-count", 4)
                .where_type("x-count", TypeTag::String)
                .check()
                .unwrap()
        );
    }

    #[test]
    fn body_has() {
        let http = respond(r#"{"message": "Hello World", "obj": {"str": "Hellow"}}"#);
        assert!(http.assert_body().has("message").has("obj.str").check().unwrap());
        assert!(
            http.assert_body()
                .has_all(["message", "obj", "obj.str"])
                .check()
                .unwrap()
        );
        assert!(
            !http.assert_body()
                .has_all(["message", "obj", "obj.strs"])
                .check()
                .unwrap()
        );
    }

    #[test]
    fn body_where() {
        let http = respond(
            r#"{"int": 123, "float": 1.5, "bool": false, "str": "Hello World",
                "object": {"str": "Hello World"}, "arr": [{"str": "array"}]}"#,
        );
        assert!(
            http.assert_body()
                .where_("int", 123)
                .where_("float", 1.5)
                .where_("bool", false)
                .where_("str", "Hello World")
                .where_("object.str", "Hello World")
                .where_("arr.0.str", "array")
                .check()
                .unwrap()
        );
        assert!(
            http.assert_body()
                .where_not("int", 1234)
                .where_not("object.str", "Hello Worlds")
                .check()
                .unwrap()
        );
    }

    #[test]
    fn where_not_holds_across_kinds() {
        let http = respond(r#"{"int": 5, "flag": true, "str": "true"}"#);
        assert!(
            http.assert_body()
                .where_not("int", "hello")
                .where_not("flag", "true")
                .where_not("str", true)
                .check()
                .unwrap()
        );
        assert!(!http.assert_body().where_("int", "hello").check().unwrap());
    }

    #[test]
    fn native_widths_as_expected_values() {
        let items = vec!["a", "b", "c"];
        let http = respond(r#"{"count": 3, "ratio": 1.1}"#);
        assert!(
            http.assert_body()
                .where_("count", items.len())
                .where_("ratio", 1.1_f32)
                .where_gte("count", 3_u64)
                .check()
                .unwrap()
        );
    }

    #[test]
    fn body_where_type() {
        let http =
            respond(r#"{"int": 1, "str": "Hello", "obj": {"str": false}, "arr":[{"idx": 1.5}]}"#);
        assert!(
            http.assert_body()
                .where_type("int", TypeTag::Int)
                .where_type("str", TypeTag::String)
                .where_type("obj.str", TypeTag::Bool)
                .where_type("arr.0.idx", TypeTag::Float)
                .where_type("arr", TypeTag::ArrayOfObject)
                .check()
                .unwrap()
        );
    }

    #[test]
    fn body_length() {
        let http = respond(r#"{"arr": [1, 2, 3]}"#);
        assert!(http.assert_body().has_length("arr", 3).check().unwrap());
        assert!(!http.assert_body().has_length("arr", 2).check().unwrap());
        assert!(!http.assert_body().has_length("missing", 0).check().unwrap());
    }

    #[test]
    fn body_ordering() {
        let http = respond(r#"{"int": 2, "obj": {"int": 2}}"#);
        assert!(
            http.assert_body()
                .where_gte("int", 1)
                .where_gte("obj.int", 2)
                .where_gt("int", 1)
                .where_lt("obj.int", 3)
                .where_lte("int", 2)
                .check()
                .unwrap()
        );
        assert!(!http.assert_body().where_gte("int", 3).check().unwrap());
        assert!(!http.assert_body().where_gt("int", 2).check().unwrap());
        assert!(!http.assert_body().where_lt("int", 2).check().unwrap());
        assert!(!http.assert_body().where_lte("int", 1).check().unwrap());
        // missing values never satisfy an ordering
        assert!(!http.assert_body().where_gte("obj.missing", 0).check().unwrap());
    }

    #[test]
    fn first_failure_sticks() {
        let http = respond(r#"{"int": 2}"#);
        let chain = http.assert_body().where_("int", 3).where_("int", 2);
        match chain.state() {
            AssertionState::Failed { step } => assert_eq!(step, "where int == 3"),
            other => panic!("unexpected state {other:?}"),
        }
        assert!(!chain.check().unwrap());
    }

    #[test]
    fn state_transitions() {
        let state = AssertionState::Holding.advance("a".into(), Ok(true));
        assert!(state.is_holding());
        let state = state.advance("b".into(), Ok(false));
        let state = state.advance("c".into(), Ok(true));
        assert!(matches!(state, AssertionState::Failed { ref step } if step == "b"));
        let state = state.advance(
            "d".into(),
            Err(AssertError::Resolve(ResolveError::UnsupportedRootShape {
                found: "null",
            })),
        );
        assert!(matches!(state, AssertionState::Failed { .. }));
    }

    #[test]
    fn unreadable_body_is_fatal() {
        let http = respond("not json");
        let err = http.assert_body().has("a").check().unwrap_err();
        assert!(matches!(err, AssertError::UnreadableBody(_)));
    }

    #[test]
    fn scalar_body_is_fatal() {
        let http = respond("42");
        let err = http.assert_body().where_("a", 1).check().unwrap_err();
        assert_eq!(
            err.to_string(),
            "body must be a JSON object or array, found number"
        );
    }

    #[test]
    fn fatal_error_is_not_reached_after_failure() {
        let http = respond("[1]");
        assert!(!http.assert_body().has("5").has("0").check().unwrap());
        let body = Body::from(JSONValue::Null);
        let chain = Assertion::new(body).has("a").has("b");
        assert!(chain.check().is_err());
    }

    #[test]
    fn array_root_bodies() {
        let http = respond(r#"[{"id": 7}]"#);
        assert!(http.assert_body().where_("0.id", 7).check().unwrap());
    }
}
