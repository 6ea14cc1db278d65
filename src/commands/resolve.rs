//! `resolve` subcommand.
use anyhow::{Context, Result};
use log::debug;
use std::io::Write;

use crate::path::PathExpression;
use crate::utils::write_colored_result;
use crate::value::JSONValue;

/// Print the value `path` addresses in `body`, or nothing when it does not
/// resolve. Returns whether a value was found.
///
/// # Errors
///
/// Fails when `body` is not JSON, is not an object or array, or the output
/// cannot be written.
pub fn print_resolved<W: Write>(
    writer: &mut W,
    body: &[u8],
    path: &str,
    pretty: bool,
) -> Result<bool> {
    let root = JSONValue::from_slice(body).context("Failed to parse JSON")?;
    let path = PathExpression::from(path);
    let found = path
        .resolve(&root)
        .with_context(|| format!("Failed to resolve `{path}`"))?;

    match found {
        Some(value) => {
            write_colored_result(writer, value, &path, pretty, true)?;
            Ok(true)
        }
        None => {
            debug!("`{path}` did not resolve");
            Ok(false)
        }
    }
}
