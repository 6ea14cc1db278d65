/*!
# `http-assert` Library

Fluent assertions over HTTP responses. Body fields are addressed with dotted
paths (see [`path`]) and compared under a small type system (see
[`compare`]); [`assert`] ties both to an [`http::Response`].
*/

pub mod assert;
pub mod commands;
pub mod compare;
pub mod path;
pub mod utils;
pub mod value;

// Re-exports
pub use assert::{Assertion, AssertionState, Http};
pub use compare::{Ordering, TypeTag};
pub use path::resolve;
pub use value::{JSONValue, Literal};
