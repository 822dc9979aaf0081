use serde::de::DeserializeOwned;
use std::io::{self, Read};

/// Deserialise a request document piped on stdin.
///
/// `None` when stdin is a terminal or carries only whitespace, so the
/// caller falls through to the individual flags.
pub fn read_piped<T: DeserializeOwned>() -> Result<Option<T>, Box<dyn std::error::Error>> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }
    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;
    parse_document(&buffer)
}

fn parse_document<T: DeserializeOwned>(raw: &str) -> Result<Option<T>, Box<dyn std::error::Error>> {
    let body = raw.trim();
    if body.is_empty() {
        log::debug!("stdin is empty: using command-line flags");
        return Ok(None);
    }
    log::debug!("reading request document from stdin ({} bytes)", body.len());
    serde_json::from_str(body)
        .map(Some)
        .map_err(|e| format!("Failed to parse stdin: {e}").into())
}
