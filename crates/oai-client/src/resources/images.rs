use serde_json::Value;

use oai_core::Result;

use crate::{Dispatcher, MultipartParams, PostParams};

/// `/images`: generation, edits and variations.
///
/// Edits and variations upload source images, so their `image` and `mask`
/// fields should be [`FormValue::File`](crate::FormValue::File) values.
#[derive(Debug, Clone, Copy)]
pub struct Images<'c> {
    dispatcher: &'c Dispatcher,
}

impl<'c> Images<'c> {
    pub(crate) fn new(dispatcher: &'c Dispatcher) -> Self {
        Self { dispatcher }
    }

    pub async fn generate<'a>(&self, parameters: impl Into<PostParams<'a>>) -> Result<Option<Value>> {
        self.dispatcher.post("/images/generations", parameters).await
    }

    pub async fn edit(&self, parameters: MultipartParams) -> Result<Option<Value>> {
        self.dispatcher.multipart_post("/images/edits", parameters).await
    }

    pub async fn variations(&self, parameters: MultipartParams) -> Result<Option<Value>> {
        self.dispatcher
            .multipart_post("/images/variations", parameters)
            .await
    }
}
