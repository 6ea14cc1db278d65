//! Miscellaneous utility functions.

use anyhow::Context as _;
use colored::Colorize;
use std::io::Write;
use std::io::{self, ErrorKind};

use crate::assert::AssertionState;
use crate::path::PathExpression;
use crate::value::JSONValue;

/// Write the verdict of a chain as a single colored line.
///
/// # Errors
///
/// Returns an error if writing to `writer` fails.
pub fn write_verdict<W: Write>(
    writer: &mut W,
    state: &AssertionState,
    steps: usize,
) -> io::Result<()> {
    match state {
        AssertionState::Holding => {
            writeln!(writer, "{} {steps} checks passed", "PASS".green().bold())
        }
        AssertionState::Failed { step } => {
            writeln!(writer, "{} {step}", "FAIL".red().bold())
        }
        AssertionState::Fatal(err) => {
            writeln!(writer, "{} {err}", "ERROR".red().bold())
        }
    }
}

// ==============================================================================
// Colorized JSON Output
// ==============================================================================

/// Write a single resolved value (path header + colorized JSON value) to
/// `writer`. Silently returns `Ok(())` on broken pipe so that piping to tools
/// like `less` or `head` exits cleanly.
///
/// # Errors
///
/// Returns an error if writing to `writer` fails.
pub fn write_colored_result<W: Write>(
    writer: &mut W,
    value: &JSONValue,
    path: &PathExpression,
    pretty: bool,
    show_path: bool,
) -> anyhow::Result<()> {
    let result = (|| -> io::Result<()> {
        if show_path && !path.is_empty() {
            writeln!(writer, "{}:", path.to_string().bold().magenta())?;
        }
        write_colored_json(writer, value, 0, pretty)?;
        writeln!(writer)?;
        Ok(())
    })();

    match result {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == ErrorKind::BrokenPipe => Ok(()),
        Err(err) => Err(err).context("write colorized JSON to stdout"),
    }
}

/// Recursively write a JSON value with syntax highlighting.
fn write_colored_json<W: Write>(
    writer: &mut W,
    value: &JSONValue,
    indent: usize,
    pretty: bool,
) -> io::Result<()> {
    let next_indent = indent + 2;

    match value {
        JSONValue::Null => write!(writer, "{}", "null".red().dimmed()),
        JSONValue::Boolean(b) => {
            write!(writer, "{}", b.to_string().yellow().bold())
        }
        JSONValue::Number(n) => write!(writer, "{}", n.as_str().yellow()),
        JSONValue::JString(s) => {
            // NOTE: Re-serialize to get proper JSON escaping and quoting.
            let quoted = serde_json::Value::String(s.clone()).to_string();
            write!(writer, "{}", quoted.green())
        }
        JSONValue::Array(arr) => {
            write!(writer, "[")?;
            for (i, item) in arr.iter().enumerate() {
                if pretty {
                    writeln!(writer)?;
                    write!(writer, "{:width$}", "", width = next_indent)?;
                }
                write_colored_json(writer, item, next_indent, pretty)?;
                if i < arr.len() - 1 {
                    write!(writer, ",")?;
                }
            }
            if pretty && !arr.is_empty() {
                writeln!(writer)?;
                write!(writer, "{:width$}", "", width = indent)?;
            }
            write!(writer, "]")
        }
        JSONValue::Object(obj) => {
            write!(writer, "{{")?;
            // Sort keys so output is stable across runs.
            let mut entries: Vec<_> = obj.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            for (i, (key, val)) in entries.iter().enumerate() {
                if pretty {
                    writeln!(writer)?;
                    write!(writer, "{:width$}", "", width = next_indent)?;
                }
                // Key with quotes -> colored cyan.
                let quoted_key =
                    serde_json::Value::String((*key).clone()).to_string();
                write!(writer, "{}", quoted_key.cyan())?;
                if pretty {
                    write!(writer, ": ")?;
                } else {
                    write!(writer, ":")?;
                }
                write_colored_json(writer, val, next_indent, pretty)?;
                if i < entries.len() - 1 {
                    write!(writer, ",")?;
                }
            }
            if pretty && !entries.is_empty() {
                writeln!(writer)?;
                write!(writer, "{:width$}", "", width = indent)?;
            }
            write!(writer, "}}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain<F: FnOnce(&mut Vec<u8>)>(write: F) -> String {
        colored::control::set_override(false);
        let mut out = Vec::new();
        write(&mut out);
        String::from_utf8(out).expect("utf-8 output")
    }

    #[test]
    fn compact_output_is_valid_json() {
        let value =
            JSONValue::try_from(r#"{"b":[1,2.5],"a":"q\"uote"}"#).unwrap();
        let out = plain(|w| {
            write_colored_result(w, &value, &"x".into(), false, false).unwrap();
        });
        assert_eq!(out, "{\"a\":\"q\\\"uote\",\"b\":[1,2.5]}\n");
    }

    #[test]
    fn path_header_is_written() {
        let value = JSONValue::Number("32".into());
        let out = plain(|w| {
            write_colored_result(w, &value, &"obj.age".into(), true, true)
                .unwrap();
        });
        assert_eq!(out, "obj.age:\n32\n");
    }
}
