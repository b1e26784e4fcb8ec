use serde_json::Value;

use oai_core::Result;

use crate::{Dispatcher, Parameters, PostParams};

/// `/fine-tunes`: fine-tune jobs.
#[derive(Debug, Clone, Copy)]
pub struct Finetunes<'c> {
    dispatcher: &'c Dispatcher,
}

impl<'c> Finetunes<'c> {
    pub(crate) fn new(dispatcher: &'c Dispatcher) -> Self {
        Self { dispatcher }
    }

    pub async fn list(&self) -> Result<Option<Value>> {
        self.dispatcher.get("/fine-tunes").await
    }

    pub async fn create<'a>(&self, parameters: impl Into<PostParams<'a>>) -> Result<Option<Value>> {
        self.dispatcher.post("/fine-tunes", parameters).await
    }

    pub async fn retrieve(&self, id: &str) -> Result<Option<Value>> {
        self.dispatcher.get(&format!("/fine-tunes/{}", id)).await
    }

    pub async fn cancel(&self, id: &str) -> Result<Option<Value>> {
        self.dispatcher
            .post(&format!("/fine-tunes/{}/cancel", id), Parameters::new())
            .await
    }

    pub async fn events(&self, id: &str) -> Result<Option<Value>> {
        self.dispatcher
            .get(&format!("/fine-tunes/{}/events", id))
            .await
    }

    /// Delete the model a finished job produced.
    pub async fn delete(&self, fine_tuned_model: &str) -> Result<Option<Value>> {
        self.dispatcher
            .delete(&format!("/models/{}", fine_tuned_model))
            .await
    }
}
