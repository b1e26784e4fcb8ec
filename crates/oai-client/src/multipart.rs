//! Multipart form parameters for upload endpoints.

use reqwest::multipart::{Form, Part};
use serde_json::Value;
use std::path::{Path, PathBuf};

use oai_core::Result;

/// One multipart field value.
#[derive(Debug, Clone, PartialEq)]
pub enum FormValue {
    Text(String),
    /// Sent as text: strings verbatim, anything else as its JSON rendering.
    Json(Value),
    /// A local file, streamed from disk when the request is sent.
    File(PathBuf),
}

/// Ordered multipart fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MultipartParams {
    fields: Vec<(String, FormValue)>,
}

impl MultipartParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.push(name, FormValue::Text(value.into()))
    }

    pub fn json(self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.push(name, FormValue::Json(value.into()))
    }

    pub fn file(self, name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        self.push(name, FormValue::File(path.into()))
    }

    pub fn push(mut self, name: impl Into<String>, value: FormValue) -> Self {
        self.fields.push((name.into(), value));
        self
    }

    pub fn get(&self, name: &str) -> Option<&FormValue> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value)
    }

    pub fn fields(&self) -> &[(String, FormValue)] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Describe how each field will be encoded, without touching the disk.
    pub fn prepare(&self) -> Vec<(String, PreparedPart)> {
        self.fields
            .iter()
            .map(|(name, value)| (name.clone(), PreparedPart::from_value(value)))
            .collect()
    }

    /// Open every file and build the form.
    pub(crate) async fn into_form(self) -> Result<Form> {
        // Paths go out as given; the default encoding would escape '/'.
        let mut form = Form::new().percent_encode_noop();

        for (name, part) in self.prepare() {
            form = match part {
                PreparedPart::Text(text) => form.text(name, text),
                PreparedPart::File {
                    path,
                    file_name,
                    content_type,
                } => form.part(name, file_part(&path, file_name, content_type).await?),
            };
        }

        Ok(form)
    }
}

/// Wire shape of one field.
#[derive(Debug, Clone, PartialEq)]
pub enum PreparedPart {
    Text(String),
    File {
        path: PathBuf,
        /// The path as given by the caller.
        file_name: String,
        /// Declared content type; empty means none is sent.
        content_type: String,
    },
}

impl PreparedPart {
    fn from_value(value: &FormValue) -> Self {
        match value {
            FormValue::Text(text) => Self::Text(text.clone()),
            FormValue::Json(Value::String(text)) => Self::Text(text.clone()),
            FormValue::Json(other) => Self::Text(other.to_string()),
            FormValue::File(path) => Self::File {
                path: path.clone(),
                file_name: path.display().to_string(),
                content_type: String::new(),
            },
        }
    }
}

async fn file_part(path: &Path, file_name: String, content_type: String) -> Result<Part> {
    let file = tokio::fs::File::open(path).await?;
    let length = file.metadata().await?.len();

    let part = Part::stream_with_length(file, length).file_name(file_name);
    if content_type.is_empty() {
        Ok(part)
    } else {
        Ok(part.mime_str(&content_type)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_builder_keeps_order() {
        let params = MultipartParams::new()
            .text("model", "whisper-1")
            .file("file", "/tmp/audio.mp3")
            .json("temperature", 0.2);

        let names: Vec<_> = params.fields().iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["model", "file", "temperature"]);
        assert_eq!(params.len(), 3);
    }

    #[test]
    fn test_get_by_name() {
        let params = MultipartParams::new().file("file", "data.jsonl");
        assert_eq!(
            params.get("file"),
            Some(&FormValue::File(PathBuf::from("data.jsonl")))
        );
        assert!(params.get("purpose").is_none());
    }

    #[test]
    fn test_prepare_file_uses_path_and_empty_content_type() {
        let params = MultipartParams::new().file("image", "/srv/uploads/otter.png");
        let prepared = params.prepare();

        assert_eq!(
            prepared[0],
            (
                "image".to_string(),
                PreparedPart::File {
                    path: PathBuf::from("/srv/uploads/otter.png"),
                    file_name: "/srv/uploads/otter.png".to_string(),
                    content_type: String::new(),
                }
            )
        );
    }

    #[test]
    fn test_prepare_passes_non_file_values_through() {
        let params = MultipartParams::new()
            .text("purpose", "fine-tune")
            .json("prompt", "a sea otter")
            .json("n", 2)
            .json("flags", json!({"hd": true}));

        let prepared: Vec<_> = params.prepare().into_iter().map(|(_, p)| p).collect();
        assert_eq!(
            prepared,
            vec![
                PreparedPart::Text("fine-tune".to_string()),
                PreparedPart::Text("a sea otter".to_string()),
                PreparedPart::Text("2".to_string()),
                PreparedPart::Text(r#"{"hd":true}"#.to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_into_form_missing_file() {
        let params = MultipartParams::new().file("file", "/nonexistent/oai/upload.jsonl");
        let err = params.into_form().await.unwrap_err();
        assert!(matches!(err, oai_core::Error::Io(_)));
    }

    #[tokio::test]
    async fn test_into_form_with_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audio.wav");
        std::fs::write(&path, b"RIFF").unwrap();

        let form = MultipartParams::new()
            .text("model", "whisper-1")
            .file("file", &path)
            .into_form()
            .await
            .unwrap();
        assert!(!form.boundary().is_empty());
    }
}
