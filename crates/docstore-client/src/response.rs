//! Response model for the document data service.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The raw JSON reply of the data service, forwarded verbatim.
///
/// The adapter treats the reply as opaque, but find-style replies carry a
/// result set that consumers split into one message per record. The result
/// set lives in the `processed` array of the reply object; a reply that is
/// itself a bare array is accepted as a result set too.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DataResponse(Value);

impl DataResponse {
    /// Wrap a raw JSON reply.
    pub fn new(raw: Value) -> Self {
        Self(raw)
    }

    /// The raw reply as received.
    pub fn raw(&self) -> &Value {
        &self.0
    }

    /// Consume the response, yielding the raw reply.
    pub fn into_raw(self) -> Value {
        self.0
    }

    /// The reply's `status` field, when present.
    pub fn status(&self) -> Option<&str> {
        self.0.get("status").and_then(Value::as_str)
    }

    /// Number of records in the result set.
    pub fn match_count(&self) -> usize {
        self.records().len()
    }

    /// The records of the result set: the `processed` array of an object
    /// reply, the elements of a bare-array reply, or empty.
    pub fn records(&self) -> Vec<Value> {
        match &self.0 {
            Value::Array(items) => items.clone(),
            Value::Object(map) => map
                .get("processed")
                .and_then(Value::as_array)
                .cloned()
                .unwrap_or_default(),
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_records_from_processed_array() {
        let response = DataResponse::new(json!({
            "status": "COMPLETE",
            "matchCount": 2,
            "processed": [
                {"name": "Canada", "iso2Code": "CA"},
                {"name": "Chile", "iso2Code": "CL"}
            ]
        }));
        let records = response.records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["iso2Code"], "CA");
        assert_eq!(records[1]["iso2Code"], "CL");
        assert_eq!(response.match_count(), 2);
    }

    #[test]
    fn test_records_from_bare_array() {
        let response = DataResponse::new(json!([{"a": 1}, {"a": 2}, {"a": 3}]));
        assert_eq!(response.records().len(), 3);
    }

    #[test]
    fn test_records_missing_processed_is_empty() {
        let response = DataResponse::new(json!({"status": "COMPLETE"}));
        assert!(response.records().is_empty());
        assert_eq!(response.match_count(), 0);
    }

    #[test]
    fn test_records_non_collection_reply_is_empty() {
        let response = DataResponse::new(json!("ok"));
        assert!(response.records().is_empty());
    }

    #[test]
    fn test_records_processed_not_an_array_is_empty() {
        let response = DataResponse::new(json!({"processed": "oops"}));
        assert!(response.records().is_empty());
    }

    #[test]
    fn test_status() {
        let response = DataResponse::new(json!({"status": "ERROR"}));
        assert_eq!(response.status(), Some("ERROR"));

        let response = DataResponse::new(json!({}));
        assert!(response.status().is_none());
    }

    #[test]
    fn test_raw_and_into_raw() {
        let raw = json!({"processed": [], "status": "COMPLETE"});
        let response = DataResponse::new(raw.clone());
        assert_eq!(response.raw(), &raw);
        assert_eq!(response.into_raw(), raw);
    }

    #[test]
    fn test_serde_transparent() {
        let raw = json!({"processed": [{"x": 1}]});
        let response = DataResponse::new(raw.clone());
        let serialized = serde_json::to_value(&response).unwrap();
        // Serializes to the raw reply, no wrapper object
        assert_eq!(serialized, raw);

        let back: DataResponse = serde_json::from_value(serialized).unwrap();
        assert_eq!(back, response);
    }
}
