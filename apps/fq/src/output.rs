//! JSON output.

use std::io::Write;

use anyhow::Result;
use serde::Serialize;
use serde_json::{Value as JsonValue, ser::PrettyFormatter};

/// Write `value` followed by a newline. Pretty output is indented with four
/// spaces.
pub fn write_json<W: Write>(out: &mut W, value: &JsonValue, pretty: bool) -> Result<()> {
    if pretty {
        let mut serializer =
            serde_json::Serializer::with_formatter(&mut *out, PrettyFormatter::with_indent(b"    "));
        value.serialize(&mut serializer)?;
    } else {
        serde_json::to_writer(&mut *out, value)?;
    }
    writeln!(out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_should_write_compact_json() {
        let mut out = Vec::new();
        write_json(&mut out, &json!([{"a": 1}]), false).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "[{\"a\":1}]\n");
    }

    #[test]
    fn test_should_write_pretty_json() {
        let mut out = Vec::new();
        write_json(&mut out, &json!({"a": 1}), true).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "{\n    \"a\": 1\n}\n");
    }
}
