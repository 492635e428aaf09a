use serde::de::DeserializeOwned;

/// Decodes a JSON payload captured from a child process's stdout.
///
/// Surrounding whitespace is ignored. Invalid UTF-8 is reported through the
/// same error type as malformed JSON.
pub fn parse_json_bytes<T: DeserializeOwned>(bytes: &[u8]) -> serde_json::Result<T> {
    let trimmed = bytes.trim_ascii();
    serde_json::from_slice(trimmed)
}
