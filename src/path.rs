/*!
# Path Resolution

Dotted path expressions address a value nested inside a [`JSONValue`] tree,
e.g. `"obj.arr.0.field"`. Tokens that parse as an integer are array indexes;
everything else is an object field.

```
use http_assert::path::resolve;
use http_assert::value::JSONValue;

let body = JSONValue::try_from(r#"{"arr": [{"str": "array"}]}"#).unwrap();
let found = resolve("arr.0.str", &body).unwrap();
assert_eq!(found, Some(&JSONValue::JString("array".into())));
assert_eq!(resolve("arr.1.str", &body).unwrap(), None);
```

## Limitations

- There is no escaping: a key containing `.` cannot be addressed.
- An all-digit token is always an index, so it never matches an object key
  such as `{"0": ...}`.
*/
use std::{error::Error, fmt, str::FromStr};

use log::trace;

use crate::value::JSONValue;

/// One step of a [`PathExpression`].
#[derive(Hash, PartialEq, Eq, Debug, Clone)]
pub enum Segment {
    /// Array index, e.g. the `0` in "arr.0". Negative values never match.
    Index(i64),
    /// Object field, e.g. the `str` in "obj.str"
    Field(String),
}

impl Segment {
    fn parse(token: &str) -> Self {
        token
            .parse::<i64>()
            .map_or_else(|_| Self::Field(token.to_owned()), Self::Index)
    }

    /// Look this segment up in `node`. Kind mismatches are misses.
    fn step<'a>(&self, node: &'a JSONValue) -> Option<&'a JSONValue> {
        match (self, node) {
            (Self::Field(key), JSONValue::Object(map)) => map.get(key),
            (Self::Index(idx), JSONValue::Array(items)) => {
                usize::try_from(*idx).ok().and_then(|i| items.get(i))
            }
            _ => None,
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(idx) => write!(f, "{idx}"),
            Self::Field(name) => write!(f, "{name}"),
        }
    }
}

/// A parsed dotted path. An empty path has no segments and resolves to
/// nothing.
#[derive(PartialEq, Eq, Debug, Clone, Default)]
pub struct PathExpression {
    segments: Vec<Segment>,
}

impl PathExpression {
    /// The segments in traversal order.
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Returns `true` if the path has no segments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Resolve this path against `root`.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::UnsupportedRootShape`] when `root` is neither
    /// an object nor an array. A path that simply does not match is
    /// `Ok(None)`.
    pub fn resolve<'a>(
        &self,
        root: &'a JSONValue,
    ) -> Result<Option<&'a JSONValue>, ResolveError> {
        if !root.is_container() {
            return Err(ResolveError::UnsupportedRootShape {
                found: root.kind(),
            });
        }
        if self.is_empty() {
            return Ok(None);
        }

        let mut node = root;
        for segment in &self.segments {
            let Some(next) = segment.step(node) else {
                trace!("`{self}`: no match for `{segment}` in {}", node.kind());
                return Ok(None);
            };
            trace!("`{self}`: `{segment}` -> {}", next.kind());
            node = next;
        }
        Ok(Some(node))
    }
}

impl From<&str> for PathExpression {
    fn from(path: &str) -> Self {
        if path.is_empty() {
            return Self::default();
        }
        Self {
            segments: path.split('.').map(Segment::parse).collect(),
        }
    }
}

impl FromStr for PathExpression {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

impl fmt::Display for PathExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                write!(f, ".")?;
            }
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}

/// Represents the fatal outcome of resolving a path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// The root value cannot contain fields or elements.
    UnsupportedRootShape {
        /// Kind of the value that was found instead
        found: &'static str,
    },
}

impl Error for ResolveError {}

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedRootShape { found } => {
                write!(f, "body must be a JSON object or array, found {found}")
            }
        }
    }
}

/// Resolve a dotted `path` against `root`.
///
/// # Errors
///
/// See [`PathExpression::resolve`].
pub fn resolve<'a>(
    path: &str,
    root: &'a JSONValue,
) -> Result<Option<&'a JSONValue>, ResolveError> {
    PathExpression::from(path).resolve(root)
}
