use serde_json::{Map, Value};

use crate::error::{CompassError, Result};

/// Recover the JSON object in a model reply.
///
/// Tries the whole text first; valid JSON that is not an object is an error.
/// Otherwise takes the span from the first `{` to the brace that brings the
/// nesting depth back to zero and parses that. Braces inside JSON strings are
/// counted too.
pub fn extract_json_object(text: &str) -> Result<Map<String, Value>> {
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(map)) => return Ok(map),
        Ok(_) => return Err(CompassError::Parse("Response is JSON but not an object".into())),
        Err(_) => {}
    }

    let start = text
        .find('{')
        .ok_or_else(|| CompassError::Parse("No JSON object found in response".into()))?;

    let mut depth = 0usize;
    let mut end = None;
    for (i, ch) in text[start..].char_indices() {
        match ch {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    end = Some(start + i + 1);
                    break;
                }
            }
            _ => {}
        }
    }

    let end = end.ok_or_else(|| CompassError::Parse("Unmatched braces in JSON".into()))?;

    match serde_json::from_str::<Value>(&text[start..end]) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(CompassError::Parse("Extracted JSON is not an object".into())),
        Err(e) => Err(CompassError::Parse(e.to_string())),
    }
}
