use crate::Result;
use bridge_proto::Charset;

/// In-memory binary payload with optional content type and name.
///
/// The emulated host passes these between services; they never hold live
/// handles, only bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Blob {
    data: Vec<u8>,
    content_type: Option<String>,
    name: Option<String>,
}

impl Blob {
    /// Create a blob from raw bytes.
    pub fn new(data: impl Into<Vec<u8>>) -> Self {
        Self {
            data: data.into(),
            content_type: None,
            name: None,
        }
    }

    /// Create a blob from text; defaults the content type to `text/plain`.
    pub fn from_text(text: &str) -> Self {
        Self {
            data: text.as_bytes().to_vec(),
            content_type: Some("text/plain".to_string()),
            name: None,
        }
    }

    /// Set the content type.
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Set the name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// The blob's bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.data
    }

    /// The blob's content type, if set.
    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    /// The blob's name, if set.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Decode the bytes as text in the given charset.
    pub fn data_as_string(&self, charset: Charset) -> Result<String> {
        Ok(charset.bytes_to_string(&self.data)?)
    }

    /// An independent copy of this blob.
    pub fn copy(&self) -> Self {
        self.clone()
    }

    /// Replace the bytes.
    pub fn set_bytes(&mut self, data: impl Into<Vec<u8>>) -> &mut Self {
        self.data = data.into();
        self
    }

    /// Replace the bytes from text in the given charset.
    pub fn set_data_from_string(&mut self, text: &str, charset: Charset) -> Result<&mut Self> {
        self.data = charset.string_to_bytes(text)?;
        Ok(self)
    }

    /// Replace the content type.
    pub fn set_content_type(&mut self, content_type: impl Into<String>) -> &mut Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Derive the content type from the name's file extension.
    ///
    /// Leaves the content type unchanged when the extension is unknown.
    pub fn set_content_type_from_extension(&mut self) -> Option<&str> {
        let extension = self
            .name
            .as_deref()
            .and_then(|name| name.rsplit_once('.'))
            .map(|(_, ext)| ext.to_ascii_lowercase())?;

        if let Some(content_type) = content_type_for_extension(&extension) {
            self.content_type = Some(content_type.to_string());
        }
        self.content_type.as_deref()
    }

    /// Replace the name.
    pub fn set_name(&mut self, name: impl Into<String>) -> &mut Self {
        self.name = Some(name.into());
        self
    }
}

fn content_type_for_extension(extension: &str) -> Option<&'static str> {
    let content_type = match extension {
        "txt" => "text/plain",
        "csv" => "text/csv",
        "html" | "htm" => "text/html",
        "css" => "text/css",
        "md" => "text/markdown",
        "js" => "text/javascript",
        "json" => "application/json",
        "xml" => "application/xml",
        "pdf" => "application/pdf",
        "zip" => "application/zip",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "webp" => "image/webp",
        _ => return None,
    };
    Some(content_type)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_blob_defaults_content_type() {
        let blob = Blob::from_text("hello");
        assert_eq!(blob.content_type(), Some("text/plain"));
        assert_eq!(blob.bytes(), b"hello");
    }

    #[test]
    fn test_byte_blob_has_no_content_type() {
        let blob = Blob::new(vec![0u8, 1, 2]);
        assert_eq!(blob.content_type(), None);
    }

    #[test]
    fn test_data_as_string_respects_charset() {
        let mut blob = Blob::new(Vec::new());
        blob.set_data_from_string("café", Charset::Latin1).unwrap();
        assert_eq!(blob.bytes().len(), 4);
        assert_eq!(blob.data_as_string(Charset::Latin1).unwrap(), "café");
    }

    #[test]
    fn test_copy_is_independent() {
        let original = Blob::from_text("hello").with_name("a.txt");
        let mut copied = original.copy();
        copied.set_bytes(b"changed".to_vec());

        assert_eq!(original.bytes(), b"hello");
        assert_eq!(copied.name(), Some("a.txt"));
    }

    #[test]
    fn test_content_type_from_extension() {
        let mut blob = Blob::new(Vec::new());
        blob.set_name("report.pdf");
        assert_eq!(
            blob.set_content_type_from_extension(),
            Some("application/pdf")
        );
    }

    #[test]
    fn test_unknown_extension_leaves_content_type() {
        let mut blob = Blob::from_text("x");
        blob.set_name("data.unknownext");
        assert_eq!(blob.set_content_type_from_extension(), Some("text/plain"));
    }
}
