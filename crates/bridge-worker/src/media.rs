use crate::api::response_meta;
use crate::auth::TokenProvider;
use crate::{Error, Result};
use bridge_proto::{boundary, MediaReply, SurfaceSpec};
use bytes::BytesMut;
use futures::StreamExt;

/// Whether a response status permits interpreting the body as binary media.
pub fn should_buffer(status: u16) -> bool {
    (200..300).contains(&status)
}

/// Fetch a streamed binary resource and fully drain it into memory.
///
/// Live streams cannot cross the boundary, so the worker buffers the entire
/// body before exiting. Resources are assumed to fit in memory; arbitrarily
/// large media is a known limitation.
pub async fn fetch_media(
    provider: &TokenProvider,
    surface: &SurfaceSpec,
    resource_id: &str,
    scopes: Vec<String>,
) -> Result<MediaReply> {
    let grant = provider.token(&scopes).await?;

    let url = format!(
        "{}/{}",
        surface.base_url.trim_end_matches('/'),
        surface.media_path_for(resource_id)
    );

    tracing::debug!(surface = %surface.name, %url, "fetching media");

    let response = provider
        .http()
        .get(&url)
        .query(&[("alt", "media")])
        .bearer_auth(&grant.access_token)
        .send()
        .await
        .map_err(|e| Error::Network(e.to_string()))?;

    let meta = response_meta(&response);

    // non-success bodies are not streams; return the metadata alone
    if !should_buffer(meta.status) {
        return Ok(MediaReply { data: None, meta });
    }

    let mut stream = response.bytes_stream();
    let mut buffer = BytesMut::new();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| Error::Network(e.to_string()))?;
        buffer.extend_from_slice(&chunk);
    }

    Ok(MediaReply {
        data: Some(boundary::encode_bytes_base64(&buffer)),
        meta,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_success_statuses_buffer() {
        assert!(should_buffer(200));
        assert!(should_buffer(206));
        assert!(!should_buffer(304));
        assert!(!should_buffer(404));
        assert!(!should_buffer(500));
    }
}
