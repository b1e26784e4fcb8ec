use serde_json::Value;
use std::path::Path;
use tracing::debug;

use oai_core::{Error, Result};

use crate::{Dispatcher, FormValue, MultipartParams};

/// Multipart field holding the uploaded file.
const FILE_FIELD: &str = "file";

/// `/files`: uploaded JSON Lines documents.
#[derive(Debug, Clone, Copy)]
pub struct Files<'c> {
    dispatcher: &'c Dispatcher,
}

impl<'c> Files<'c> {
    pub(crate) fn new(dispatcher: &'c Dispatcher) -> Self {
        Self { dispatcher }
    }

    pub async fn list(&self) -> Result<Option<Value>> {
        self.dispatcher.get("/files").await
    }

    /// Upload a JSON Lines file.
    ///
    /// `parameters` must carry the document under `file` as a
    /// [`FormValue::File`]. Every non-blank line is checked to be JSON before
    /// anything is sent; the first bad line fails the call.
    pub async fn upload(&self, parameters: MultipartParams) -> Result<Option<Value>> {
        match parameters.get(FILE_FIELD) {
            Some(FormValue::File(path)) => validate_jsonl(path).await?,
            Some(_) => {
                return Err(Error::InvalidInput(format!(
                    "`{}` must be a file path",
                    FILE_FIELD
                )))
            }
            None => {
                return Err(Error::InvalidInput(format!(
                    "missing `{}` parameter",
                    FILE_FIELD
                )))
            }
        }

        self.dispatcher.multipart_post("/files", parameters).await
    }

    pub async fn retrieve(&self, id: &str) -> Result<Option<Value>> {
        self.dispatcher.get(&format!("/files/{}", id)).await
    }

    /// Fetch the stored document. JSON Lines content decodes to an array.
    pub async fn content(&self, id: &str) -> Result<Option<Value>> {
        self.dispatcher.get(&format!("/files/{}/content", id)).await
    }

    pub async fn delete(&self, id: &str) -> Result<Option<Value>> {
        self.dispatcher.delete(&format!("/files/{}", id)).await
    }
}

/// Check that every non-blank line of the file is a JSON document.
pub(crate) async fn validate_jsonl(path: &Path) -> Result<()> {
    let content = tokio::fs::read_to_string(path).await?;

    let mut lines = 0;
    for (index, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        serde_json::from_str::<Value>(line).map_err(|e| {
            Error::InvalidInput(format!(
                "{} - found on line {} of {}",
                e,
                index + 1,
                path.display()
            ))
        })?;
        lines += 1;
    }

    debug!(path = %path.display(), lines, "Validated JSON Lines upload");
    Ok(())
}
