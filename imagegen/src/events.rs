use serde_json::{Map, Value};

pub const STATUS_SUCCEEDED: &str = "succeeded";
pub const STATUS_FAILED: &str = "failed";
pub const UNKNOWN_FAILURE: &str = "unknown error";

/// One progress/result record from the generation stream.
///
/// Fields are read leniently: a record is only dropped when it is not a JSON
/// object, never because one field has an unexpected type.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerationEvent {
    pub progress: Option<f64>,
    pub status: Option<String>,
    pub results: Vec<GeneratedImage>,
    pub error: Option<String>,
    pub failure_reason: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeneratedImage {
    pub url: Option<String>,
}

impl GenerationEvent {
    pub fn from_record(record: &Map<String, Value>) -> Self {
        let results = match record.get("results") {
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| GeneratedImage {
                    url: item.as_object().and_then(|obj| text_field(obj, "url")),
                })
                .collect(),
            _ => Vec::new(),
        };
        Self {
            progress: number_field(record, "progress"),
            status: text_field(record, "status"),
            results,
            error: text_field(record, "error"),
            failure_reason: text_field(record, "failure_reason"),
        }
    }

    pub fn progress(&self) -> f64 {
        self.progress.unwrap_or(0.0)
    }

    /// `status == "succeeded"` or progress reached 100.
    pub fn signals_success(&self) -> bool {
        self.status.as_deref() == Some(STATUS_SUCCEEDED) || self.progress() == 100.0
    }

    pub fn signals_failure(&self) -> bool {
        self.status.as_deref() == Some(STATUS_FAILED)
    }

    pub fn first_url(&self) -> Option<&str> {
        self.results
            .first()?
            .url
            .as_deref()
            .filter(|url| !url.is_empty())
    }

    pub fn failure_reason(&self) -> String {
        [&self.error, &self.failure_reason]
            .into_iter()
            .flatten()
            .find(|reason| !reason.is_empty())
            .cloned()
            .unwrap_or_else(|| UNKNOWN_FAILURE.to_string())
    }
}

/// Strings as-is; other non-null values as their JSON text.
fn text_field(record: &Map<String, Value>, key: &str) -> Option<String> {
    match record.get(key)? {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        other => Some(other.to_string()),
    }
}

/// Numbers, or strings holding a number.
fn number_field(record: &Map<String, Value>, key: &str) -> Option<f64> {
    match record.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

/// Decode one framed payload. Payloads that are not a JSON object yield `None`.
pub fn parse_event(payload: &str) -> Option<GenerationEvent> {
    match serde_json::from_str::<Value>(payload) {
        Ok(Value::Object(record)) => Some(GenerationEvent::from_record(&record)),
        Ok(_) => {
            tracing::debug!("Skipping non-object stream record: {payload}");
            None
        }
        Err(e) => {
            tracing::debug!("Skipping malformed stream record ({e}): {payload}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_progress_record() {
        let event = parse_event(r#"{"id":"abc","progress":40,"status":"running"}"#).unwrap();
        assert_eq!(event.progress(), 40.0);
        assert!(!event.signals_success());
        assert!(!event.signals_failure());
    }

    #[test]
    fn test_malformed_records_skipped() {
        assert!(parse_event("{not json").is_none());
        assert!(parse_event("[DONE]").is_none());
        assert!(parse_event("42").is_none());
        assert!(parse_event(r#"["progress",10]"#).is_none());
    }

    #[test]
    fn test_odd_field_types_do_not_drop_record() {
        let event = parse_event(r#"{"progress":"55","status":"running"}"#).unwrap();
        assert_eq!(event.progress(), 55.0);

        let event = parse_event(r#"{"progress":"forty","status":"running"}"#).unwrap();
        assert_eq!(event.progress(), 0.0);
        assert_eq!(event.status.as_deref(), Some("running"));
    }

    #[test]
    fn test_structured_error_is_surfaced() {
        let event =
            parse_event(r#"{"status":"failed","error":{"code":429,"message":"quota exceeded"}}"#)
                .unwrap();
        assert!(event.signals_failure());
        let reason = event.failure_reason();
        assert!(reason.contains("quota exceeded"));
        assert!(reason.contains("429"));

        let event =
            parse_event(r#"{"status":"failed","progress":"0","failure_reason":"quota exceeded"}"#)
                .unwrap();
        assert!(event.signals_failure());
        assert_eq!(event.failure_reason(), "quota exceeded");
    }

    #[test]
    fn test_success_by_progress() {
        let event = parse_event(r#"{"progress":100,"results":[{"url":"https://x/1.png"}]}"#).unwrap();
        assert!(event.signals_success());
        assert_eq!(event.first_url(), Some("https://x/1.png"));
    }

    #[test]
    fn test_success_with_empty_results() {
        let event = parse_event(r#"{"status":"succeeded","results":[]}"#).unwrap();
        assert!(event.signals_success());
        assert_eq!(event.first_url(), None);
        let event = parse_event(r#"{"status":"succeeded","results":null}"#).unwrap();
        assert_eq!(event.first_url(), None);
        let event = parse_event(r#"{"status":"succeeded","results":["oops"]}"#).unwrap();
        assert_eq!(event.first_url(), None);
    }

    #[test]
    fn test_failure_reason_fallbacks() {
        let event = parse_event(r#"{"status":"failed","error":"quota exceeded"}"#).unwrap();
        assert!(event.signals_failure());
        assert_eq!(event.failure_reason(), "quota exceeded");

        let event =
            parse_event(r#"{"status":"failed","error":"","failure_reason":"nsfw"}"#).unwrap();
        assert_eq!(event.failure_reason(), "nsfw");

        let event = parse_event(r#"{"status":"failed","error":null}"#).unwrap();
        assert_eq!(event.failure_reason(), UNKNOWN_FAILURE);
    }
}
