use crate::api::response_meta;
use crate::{Error, Result};
use bridge_proto::FetchOptions;
use reqwest::header::CONTENT_TYPE;
use reqwest::Method;
use serde_json::{json, Map, Value};

/// Response fields a caller may project out of a fetch.
pub const RESPONSE_FIELDS: &[&str] = &["status", "status_text", "headers", "body", "url"];

/// Reject projections naming fields the worker cannot extract.
pub fn validate_fields(fields: &[String]) -> Result<()> {
    for field in fields {
        if !RESPONSE_FIELDS.contains(&field.as_str()) {
            return Err(Error::InvalidRequest(format!(
                "unknown response field: {}",
                field
            )));
        }
    }
    Ok(())
}

/// Restrict the full response record to the requested fields, in order.
pub fn project_fields(full: &Map<String, Value>, fields: &[String]) -> Value {
    let mut out = Map::new();
    for field in fields {
        if let Some(value) = full.get(field) {
            out.insert(field.clone(), value.clone());
        }
    }
    Value::Object(out)
}

/// Perform a generic HTTP fetch and return only the requested response
/// fields.
///
/// The full response object cannot be serialized back across the boundary,
/// so the caller pre-declares what it needs. Retry, redirect limiting, and
/// exception muting are the caller's responsibility.
pub async fn fetch(
    client: &reqwest::Client,
    url: &str,
    options: &FetchOptions,
    fields: &[String],
) -> Result<Value> {
    validate_fields(fields)?;

    let method_name = options.method.as_deref().unwrap_or("GET");
    let method = Method::from_bytes(method_name.to_ascii_uppercase().as_bytes())
        .map_err(|_| Error::InvalidRequest(format!("unknown http method: {}", method_name)))?;

    let mut request = client.request(method, url);
    for (key, value) in &options.headers {
        request = request.header(key, value);
    }
    if let Some(content_type) = &options.content_type {
        request = request.header(CONTENT_TYPE, content_type);
    }
    if let Some(token) = &options.bearer_token {
        request = request.bearer_auth(token);
    }
    if let Some(payload) = &options.payload {
        request = request.body(payload.clone());
    }

    let response = request
        .send()
        .await
        .map_err(|e| Error::Network(e.to_string()))?;
    let meta = response_meta(&response);
    let final_url = response.url().to_string();
    let body = response
        .text()
        .await
        .map_err(|e| Error::Network(e.to_string()))?;

    let mut full = Map::new();
    full.insert("status".to_string(), json!(meta.status));
    full.insert("status_text".to_string(), json!(meta.status_text));
    full.insert("headers".to_string(), serde_json::to_value(&meta.headers)?);
    full.insert("body".to_string(), Value::String(body));
    full.insert("url".to_string(), Value::String(final_url));

    Ok(project_fields(&full, fields))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_record() -> Map<String, Value> {
        let mut full = Map::new();
        full.insert("status".to_string(), json!(200));
        full.insert("status_text".to_string(), json!("OK"));
        full.insert("headers".to_string(), json!({"content-type": "text/plain"}));
        full.insert("body".to_string(), json!("hello"));
        full.insert("url".to_string(), json!("https://example.com/"));
        full
    }

    #[test]
    fn test_projection_contains_exactly_requested_fields() {
        let projected = project_fields(&full_record(), &["status".to_string()]);
        let object = projected.as_object().unwrap();

        assert_eq!(object.len(), 1);
        assert_eq!(object.get("status"), Some(&json!(200)));
    }

    #[test]
    fn test_projection_preserves_request_order() {
        let projected = project_fields(
            &full_record(),
            &["body".to_string(), "status".to_string()],
        );
        let keys: Vec<_> = projected.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["body".to_string(), "status".to_string()]);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = validate_fields(&["cookies".to_string()]).unwrap_err();
        assert!(matches!(err, Error::InvalidRequest(_)));
    }
}
