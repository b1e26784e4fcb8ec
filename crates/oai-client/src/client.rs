//! The client entry object.

use serde_json::Value;

use oai_core::{ClientConfig, Result};

use crate::resources::{Engines, Files, Finetunes, Images, Models};
use crate::{Dispatcher, MultipartParams, PostParams};

/// Entry point for the API.
///
/// Holds its own immutable configuration, so several clients with different
/// credentials can be used side by side. Cloning is cheap.
#[derive(Debug, Clone)]
pub struct Client {
    dispatcher: Dispatcher,
}

impl Client {
    /// Create a new client with the given configuration.
    pub fn new(config: ClientConfig) -> Result<Self> {
        Ok(Self {
            dispatcher: Dispatcher::new(config)?,
        })
    }

    /// Create from `OPENAI_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::new(ClientConfig::from_env())
    }

    /// Create from the default config file, falling back to the environment.
    pub fn load() -> Result<Self> {
        Self::new(ClientConfig::load()?)
    }

    pub fn config(&self) -> &ClientConfig {
        self.dispatcher.config()
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// `POST /chat/completions`. Pass [`Parameters::streaming`](crate::Parameters::streaming)
    /// to receive deltas as they arrive.
    pub async fn chat<'a>(&self, parameters: impl Into<PostParams<'a>>) -> Result<Option<Value>> {
        self.dispatcher.post("/chat/completions", parameters).await
    }

    pub async fn completions<'a>(
        &self,
        parameters: impl Into<PostParams<'a>>,
    ) -> Result<Option<Value>> {
        self.dispatcher.post("/completions", parameters).await
    }

    pub async fn edits<'a>(&self, parameters: impl Into<PostParams<'a>>) -> Result<Option<Value>> {
        self.dispatcher.post("/edits", parameters).await
    }

    pub async fn embeddings<'a>(
        &self,
        parameters: impl Into<PostParams<'a>>,
    ) -> Result<Option<Value>> {
        self.dispatcher.post("/embeddings", parameters).await
    }

    pub async fn moderations<'a>(
        &self,
        parameters: impl Into<PostParams<'a>>,
    ) -> Result<Option<Value>> {
        self.dispatcher.post("/moderations", parameters).await
    }

    /// `POST /audio/transcriptions` with the audio under a `file` field.
    pub async fn transcribe(&self, parameters: MultipartParams) -> Result<Option<Value>> {
        self.dispatcher
            .multipart_post("/audio/transcriptions", parameters)
            .await
    }

    /// `POST /audio/translations` with the audio under a `file` field.
    pub async fn translate(&self, parameters: MultipartParams) -> Result<Option<Value>> {
        self.dispatcher
            .multipart_post("/audio/translations", parameters)
            .await
    }

    pub fn files(&self) -> Files<'_> {
        Files::new(&self.dispatcher)
    }

    pub fn models(&self) -> Models<'_> {
        Models::new(&self.dispatcher)
    }

    pub fn finetunes(&self) -> Finetunes<'_> {
        Finetunes::new(&self.dispatcher)
    }

    pub fn images(&self) -> Images<'_> {
        Images::new(&self.dispatcher)
    }

    pub fn engines(&self) -> Engines<'_> {
        Engines::new(&self.dispatcher)
    }
}
