use crate::error::Result;

/// JSON Schema (draft-07) of the `{events: [...]}` response body
pub const EVENTS_RESPONSE_SCHEMA: &str = include_str!("../schemas/events-response.schema.json");

pub fn events_response_schema() -> Result<serde_json::Value> {
    Ok(serde_json::from_str(EVENTS_RESPONSE_SCHEMA)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_schema_parses() {
        let schema = events_response_schema().unwrap();
        assert_eq!(schema["required"][0], "events");
        assert!(schema["definitions"]["event"]["required"]
            .as_array()
            .unwrap()
            .iter()
            .any(|f| f == "timeFromNow"));
    }
}
