//! JSON I/O handling for CLI
//!
//! - Input: one JSON query object via stdin (may span lines)
//! - Output: one JSON object per line via stdout
//! - UTF-8 only

use std::io::{self, Read, Write};

use serde_json::{json, Value};

use super::errors::{CliError, CliResult};

/// Read one JSON request from a reader
pub fn read_request_from(mut reader: impl Read) -> CliResult<Value> {
    let mut input = String::new();
    reader.read_to_string(&mut input)?;

    if input.trim().is_empty() {
        return Err(CliError::io_error("Empty input"));
    }

    let value: Value = serde_json::from_str(&input)?;
    Ok(value)
}

/// Read one JSON request from stdin
pub fn read_request() -> CliResult<Value> {
    read_request_from(io::stdin().lock())
}

/// Success envelope
pub fn ok_response(data: Value) -> Value {
    json!({
        "status": "ok",
        "data": data
    })
}

/// Error envelope
pub fn error_response(code: &str, message: &str) -> Value {
    json!({
        "status": "error",
        "code": code,
        "message": message
    })
}

/// Write a response object to stdout
pub fn write_json(response: &Value) -> CliResult<()> {
    let mut stdout = io::stdout();
    serde_json::to_writer(&mut stdout, response)?;
    writeln!(stdout)?;
    stdout.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_multiline_request() {
        let input = "{\n  \"WHERE\": {},\n  \"OPTIONS\": {\"COLUMNS\": [\"rooms_seats\"]}\n}\n";
        let value = read_request_from(input.as_bytes()).unwrap();
        assert!(value["OPTIONS"]["COLUMNS"].is_array());
    }

    #[test]
    fn test_empty_input_is_error() {
        assert!(read_request_from("   \n".as_bytes()).is_err());
    }

    #[test]
    fn test_envelopes() {
        assert_eq!(ok_response(json!([])), json!({"status": "ok", "data": []}));
        assert_eq!(
            error_response("QUERY_MALFORMED", "bad"),
            json!({"status": "error", "code": "QUERY_MALFORMED", "message": "bad"})
        );
    }
}
