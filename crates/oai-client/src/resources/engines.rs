use serde_json::Value;

use oai_core::Result;

use crate::Dispatcher;

/// `/engines`: the legacy listing that predates `/models`.
#[derive(Debug, Clone, Copy)]
pub struct Engines<'c> {
    dispatcher: &'c Dispatcher,
}

impl<'c> Engines<'c> {
    pub(crate) fn new(dispatcher: &'c Dispatcher) -> Self {
        Self { dispatcher }
    }

    pub async fn list(&self) -> Result<Option<Value>> {
        self.dispatcher.get("/engines").await
    }

    pub async fn retrieve(&self, id: &str) -> Result<Option<Value>> {
        self.dispatcher.get(&format!("/engines/{}", id)).await
    }
}
