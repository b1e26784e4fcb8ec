use serde_json::Value;

use oai_core::Result;

use crate::Dispatcher;

/// `/models`: models available to the account.
#[derive(Debug, Clone, Copy)]
pub struct Models<'c> {
    dispatcher: &'c Dispatcher,
}

impl<'c> Models<'c> {
    pub(crate) fn new(dispatcher: &'c Dispatcher) -> Self {
        Self { dispatcher }
    }

    pub async fn list(&self) -> Result<Option<Value>> {
        self.dispatcher.get("/models").await
    }

    pub async fn retrieve(&self, id: &str) -> Result<Option<Value>> {
        self.dispatcher.get(&format!("/models/{}", id)).await
    }
}
