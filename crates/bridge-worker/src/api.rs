use crate::auth::TokenProvider;
use crate::{Error, Result};
use bridge_proto::{ApiReply, ResponseMeta, SurfaceSpec};
use reqwest::Method;
use serde_json::Value;
use std::collections::BTreeMap;

/// Map a surface method name to an HTTP verb.
pub fn http_method(method: &str) -> Method {
    match method {
        "get" | "list" | "export" | "watch" => Method::GET,
        "create" | "copy" | "insert" | "generate" => Method::POST,
        "update" | "patch" => Method::PATCH,
        "set" | "replace" => Method::PUT,
        "delete" | "remove" => Method::DELETE,
        _ => Method::POST,
    }
}

/// Split operation parameters into a path id, a request body, and query
/// parameters.
///
/// The id key is `id` or the singular of the property path suffixed with
/// `Id` ("files" → "fileId"); a `requestBody` entry becomes the JSON body;
/// every other entry becomes a query parameter.
pub fn split_params(
    prop: &str,
    params: &Value,
) -> (Option<String>, Option<Value>, Vec<(String, String)>) {
    let mut path_id = None;
    let mut body = None;
    let mut query = Vec::new();
    let id_key = id_key_for(prop);

    if let Value::Object(map) = params {
        for (key, value) in map {
            if key == "requestBody" {
                body = Some(value.clone());
                continue;
            }

            if path_id.is_none() && (key == "id" || *key == id_key) {
                if let Some(id) = value.as_str() {
                    path_id = Some(id.to_string());
                    continue;
                }
            }

            query.push((key.clone(), scalar_string(value)));
        }
    }

    (path_id, body, query)
}

fn id_key_for(prop: &str) -> String {
    let singular = prop.strip_suffix('s').unwrap_or(prop);
    format!("{}Id", singular)
}

fn scalar_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Project status and headers into the finite boundary form.
///
/// Never the raw native response object, which cannot cross the boundary.
pub fn response_meta(response: &reqwest::Response) -> ResponseMeta {
    let status = response.status();
    let mut headers = BTreeMap::new();
    for (name, value) in response.headers() {
        if let Ok(text) = value.to_str() {
            headers.insert(name.as_str().to_string(), text.to_string());
        }
    }

    ResponseMeta {
        status: status.as_u16(),
        status_text: status.canonical_reason().unwrap_or("").to_string(),
        headers,
    }
}

/// Invoke `prop.method(params)` on the surface with an authenticated client.
pub async fn invoke(
    provider: &TokenProvider,
    surface: &SurfaceSpec,
    prop: &str,
    method: &str,
    params: &Value,
    scopes: Vec<String>,
) -> Result<ApiReply> {
    let grant = provider.token(&scopes).await?;

    let (path_id, body, query) = split_params(prop, params);
    let mut url = format!("{}/{}", surface.base_url.trim_end_matches('/'), prop);
    if let Some(id) = path_id {
        url.push('/');
        url.push_str(&id);
    }

    let mut request = provider
        .http()
        .request(http_method(method), &url)
        .bearer_auth(&grant.access_token)
        .query(&query);
    if let Some(body) = body {
        request = request.json(&body);
    }

    tracing::debug!(surface = %surface.name, %url, method, "invoking api surface");

    let response = request
        .send()
        .await
        .map_err(|e| Error::Network(e.to_string()))?;
    let meta = response_meta(&response);
    let text = response
        .text()
        .await
        .map_err(|e| Error::Network(e.to_string()))?;

    if !meta.is_success() {
        return Err(Error::ApiCall {
            status: meta.status,
            body: text,
        });
    }

    let data = if text.is_empty() {
        Value::Null
    } else {
        serde_json::from_str(&text).unwrap_or(Value::String(text))
    };

    Ok(ApiReply { data, meta })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_method_mapping() {
        assert_eq!(http_method("list"), Method::GET);
        assert_eq!(http_method("get"), Method::GET);
        assert_eq!(http_method("create"), Method::POST);
        assert_eq!(http_method("update"), Method::PATCH);
        assert_eq!(http_method("delete"), Method::DELETE);
        assert_eq!(http_method("frobnicate"), Method::POST);
    }

    #[test]
    fn test_split_params_extracts_path_id() {
        let params = json!({"fileId": "abc", "fields": "id,name"});
        let (path_id, body, query) = split_params("files", &params);

        assert_eq!(path_id.as_deref(), Some("abc"));
        assert!(body.is_none());
        assert_eq!(query, vec![("fields".to_string(), "id,name".to_string())]);
    }

    #[test]
    fn test_split_params_extracts_request_body() {
        let params = json!({"spreadsheetId": "s1", "requestBody": {"title": "New"}});
        let (path_id, body, query) = split_params("spreadsheets", &params);

        assert_eq!(path_id.as_deref(), Some("s1"));
        assert_eq!(body, Some(json!({"title": "New"})));
        assert!(query.is_empty());
    }

    #[test]
    fn test_split_params_without_id() {
        let params = json!({"pageSize": 10});
        let (path_id, _, query) = split_params("files", &params);

        assert!(path_id.is_none());
        assert_eq!(query, vec![("pageSize".to_string(), "10".to_string())]);
    }
}
