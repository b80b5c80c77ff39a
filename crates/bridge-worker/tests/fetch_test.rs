use bridge_proto::{boundary, FetchOptions, SurfaceSpec};
use bridge_worker::auth::TokenProvider;
use bridge_worker::{api, fetch, media, Error};
use serde_json::json;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::thread;

/// Serve one HTTP response on a fresh local port and return its base URL.
fn serve_once(status_line: &'static str, content_type: &'static str, body: &'static [u8]) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();

    thread::spawn(move || {
        if let Ok((mut stream, _)) = listener.accept() {
            let mut buf = [0u8; 8192];
            let _ = stream.read(&mut buf);
            let header = format!(
                "HTTP/1.1 {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                status_line,
                content_type,
                body.len()
            );
            let _ = stream.write_all(header.as_bytes());
            let _ = stream.write_all(body);
        }
    });

    format!("http://{}", addr)
}

fn provider_for(token_url: &str) -> TokenProvider {
    TokenProvider::new(token_url, token_url, "client-1")
}

fn storage_surface(base_url: String) -> SurfaceSpec {
    SurfaceSpec {
        name: "storage".to_string(),
        base_url,
        scopes: Vec::new(),
        media_path: Some("files/{id}".to_string()),
    }
}

#[tokio::test]
async fn fetch_projects_exactly_requested_fields() {
    let url = serve_once("200 OK", "text/plain", b"hello");
    let client = reqwest::Client::new();

    let result = fetch::fetch(
        &client,
        &url,
        &FetchOptions::default(),
        &["status".to_string()],
    )
    .await
    .unwrap();

    let object = result.as_object().unwrap();
    assert_eq!(object.len(), 1);
    assert_eq!(object["status"], 200);
}

#[tokio::test]
async fn fetch_extracts_body_and_status() {
    let url = serve_once("200 OK", "text/plain", b"hello");
    let client = reqwest::Client::new();

    let result = fetch::fetch(
        &client,
        &url,
        &FetchOptions::default(),
        &["status".to_string(), "body".to_string()],
    )
    .await
    .unwrap();

    assert_eq!(result["status"], 200);
    assert_eq!(result["body"], "hello");
    assert!(result.get("headers").is_none());
}

#[tokio::test]
async fn media_buffers_full_content_length() {
    let token_url = serve_once(
        "200 OK",
        "application/json",
        br#"{"access_token":"tok","expires_in":3600}"#,
    );
    let media_body: &'static [u8] = b"0123456789abcdef";
    let media_url = serve_once("200 OK", "application/octet-stream", media_body);

    let provider = provider_for(&token_url);
    let surface = storage_surface(media_url);

    let reply = media::fetch_media(&provider, &surface, "file-1", Vec::new())
        .await
        .unwrap();

    assert_eq!(reply.meta.status, 200);
    let data = boundary::decode_bytes_base64(&reply.data.unwrap()).unwrap();
    assert_eq!(data.len(), media_body.len());
    assert_eq!(data, media_body);
}

#[tokio::test]
async fn api_invoke_on_missing_resource_is_api_failure() {
    let token_url = serve_once(
        "200 OK",
        "application/json",
        br#"{"access_token":"tok","expires_in":3600}"#,
    );
    let api_url = serve_once(
        "404 Not Found",
        "application/json",
        br#"{"error":{"code":404,"message":"File not found"}}"#,
    );

    let provider = provider_for(&token_url);
    let surface = storage_surface(api_url);

    let err = api::invoke(
        &provider,
        &surface,
        "files",
        "get",
        &json!({"fileId": "X"}),
        Vec::new(),
    )
    .await
    .unwrap_err();

    match err {
        Error::ApiCall { status, body } => {
            assert_eq!(status, 404);
            assert!(body.contains("File not found"));
        }
        other => panic!("expected api call failure, got {other:?}"),
    }
}

#[tokio::test]
async fn media_non_success_returns_no_data() {
    let token_url = serve_once(
        "200 OK",
        "application/json",
        br#"{"access_token":"tok","expires_in":3600}"#,
    );
    let media_url = serve_once("404 Not Found", "application/json", br#"{"error":"gone"}"#);

    let provider = provider_for(&token_url);
    let surface = storage_surface(media_url);

    let reply = media::fetch_media(&provider, &surface, "missing", Vec::new())
        .await
        .unwrap();

    assert_eq!(reply.meta.status, 404);
    assert!(reply.data.is_none());
}
