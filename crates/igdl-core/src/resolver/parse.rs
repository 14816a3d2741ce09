//! Extract a direct media URL from a resolver response body.

use serde_json::{Map, Value};

use crate::error::ResolveError;

/// Top-level keys checked in priority order. The first key present decides.
const URL_KEYS: [&str; 5] = ["downloadUrl", "url", "link", "sd", "hd"];

/// Parses a resolver JSON body and returns the direct media URL.
///
/// Checks `downloadUrl`, `url`, `link`, `sd`, `hd` at the top level; failing
/// those, `data.url` when `data` is an object, or `data[0].url` when `data` is
/// a non-empty array of objects.
pub fn parse_media_url(body: &str) -> Result<String, ResolveError> {
    let value: Value = serde_json::from_str(body)
        .map_err(|e| ResolveError::Parse(format!("invalid JSON: {}", e)))?;
    let object = value
        .as_object()
        .ok_or_else(|| ResolveError::Parse("response is not a JSON object".to_string()))?;

    if let Some((key, found)) = URL_KEYS
        .iter()
        .find_map(|key| object.get(*key).map(|v| (*key, v)))
    {
        return non_empty_string(key, found);
    }

    match object.get("data") {
        Some(Value::Object(data)) => url_field(data, "data.url"),
        Some(Value::Array(items)) => match items.first() {
            Some(Value::Object(first)) => url_field(first, "data[0].url"),
            Some(_) => Err(ResolveError::Parse("data[0] is not an object".to_string())),
            None => Err(ResolveError::Parse("data array is empty".to_string())),
        },
        Some(_) => Err(ResolveError::Parse(
            "data is neither an object nor an array".to_string(),
        )),
        None => Err(ResolveError::Parse("no media URL field in response".to_string())),
    }
}

fn url_field(object: &Map<String, Value>, path: &str) -> Result<String, ResolveError> {
    match object.get("url") {
        Some(v) => non_empty_string(path, v),
        None => Err(ResolveError::Parse(format!("{} missing", path))),
    }
}

fn non_empty_string(path: &str, value: &Value) -> Result<String, ResolveError> {
    match value.as_str().map(str::trim) {
        Some(s) if !s.is_empty() => Ok(s.to_string()),
        Some(_) => Err(ResolveError::Parse(format!("{} is empty", path))),
        None => Err(ResolveError::Parse(format!("{} is not a string", path))),
    }
}
