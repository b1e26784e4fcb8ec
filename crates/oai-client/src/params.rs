//! Request parameter types.
//!
//! JSON endpoints take a [`PostParams`]: either a plain parameter map, or a
//! parameter map paired with a [`StreamHandler`]. The handler never reaches
//! the wire; the outgoing body carries `"stream": true` in its place.

use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;

use oai_core::{Error, Result};

use crate::streaming::StreamHandler;

/// Key the upstream API reads to switch to incremental delivery.
pub const STREAM_KEY: &str = "stream";

/// String-keyed map of JSON values sent as a request body.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Parameters(Map<String, Value>);

impl Parameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a parameter, replacing any previous value under the same key.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Pair these parameters with a handler for incremental delivery.
    pub fn streaming<'a>(
        self,
        handler: impl FnMut(Vec<Value>, usize) + Send + 'a,
    ) -> PostParams<'a> {
        PostParams::Streaming(self, Box::new(handler))
    }

    /// Force the upstream streaming flag on.
    pub(crate) fn with_stream_flag(mut self) -> Self {
        self.0.insert(STREAM_KEY.to_string(), Value::Bool(true));
        self
    }
}

impl From<Map<String, Value>> for Parameters {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl TryFrom<Value> for Parameters {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(Error::InvalidInput(format!(
                "parameters must be a JSON object, got {}",
                json_kind(&other)
            ))),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Parameters for a JSON POST, resolved once by the caller.
pub enum PostParams<'a> {
    /// Wait for the whole response and decode it as one body.
    Plain(Parameters),
    /// Deliver decoded fragments to the handler as chunks arrive.
    Streaming(Parameters, StreamHandler<'a>),
}

impl<'a> PostParams<'a> {
    pub fn is_streaming(&self) -> bool {
        matches!(self, Self::Streaming(..))
    }

    /// Split into the outgoing body and the local handler, if any.
    ///
    /// A streaming request always goes out with `"stream": true`.
    pub fn into_parts(self) -> (Parameters, Option<StreamHandler<'a>>) {
        match self {
            Self::Plain(parameters) => (parameters, None),
            Self::Streaming(parameters, handler) => (parameters.with_stream_flag(), Some(handler)),
        }
    }
}

impl From<Parameters> for PostParams<'_> {
    fn from(parameters: Parameters) -> Self {
        Self::Plain(parameters)
    }
}

impl fmt::Debug for PostParams<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Plain(parameters) => f.debug_tuple("Plain").field(parameters).finish(),
            Self::Streaming(parameters, _) => f
                .debug_tuple("Streaming")
                .field(parameters)
                .field(&"<handler>")
                .finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_try_from_object() {
        let params = Parameters::try_from(json!({"model": "gpt-3.5-turbo", "n": 2})).unwrap();
        assert_eq!(params.len(), 2);
        assert_eq!(params.get("model"), Some(&json!("gpt-3.5-turbo")));
    }

    #[test]
    fn test_try_from_non_object_is_rejected() {
        let err = Parameters::try_from(json!(["model"])).unwrap_err();
        assert!(err.to_string().contains("an array"));
    }

    #[test]
    fn test_plain_params_serialize_unchanged() {
        let params = Parameters::new()
            .with("model", "gpt-3.5-turbo")
            .with("stream", false);
        let (body, handler) = PostParams::from(params.clone()).into_parts();

        assert!(handler.is_none());
        assert_eq!(body, params);
        assert_eq!(serde_json::to_value(&body).unwrap()["stream"], json!(false));
    }

    #[test]
    fn test_streaming_params_carry_boolean_flag() {
        let params = Parameters::new().with("model", "gpt-3.5-turbo");
        let post = params.streaming(|_, _| {});
        assert!(post.is_streaming());

        let (body, handler) = post.into_parts();
        assert!(handler.is_some());

        let serialized = serde_json::to_string(&body).unwrap();
        assert!(serialized.contains(r#""stream":true"#));
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({"model": "gpt-3.5-turbo", "stream": true})
        );
    }

    #[test]
    fn test_streaming_flag_overrides_caller_value() {
        let params = Parameters::new().with("stream", "yes please");
        let (body, _) = params.streaming(|_, _| {}).into_parts();
        assert_eq!(body.get("stream"), Some(&Value::Bool(true)));
    }

    #[test]
    fn test_streaming_handler_is_retained() {
        let mut seen = Vec::new();
        {
            let (_, handler) = Parameters::new()
                .streaming(|fragments, bytes| seen.push((fragments, bytes)))
                .into_parts();
            let mut handler = handler.unwrap();
            handler(vec![json!({"x": 1})], 12);
        }
        assert_eq!(seen, vec![(vec![json!({"x": 1})], 12)]);
    }

    #[test]
    fn test_debug_hides_handler() {
        let post = Parameters::new().with("a", 1).streaming(|_, _| {});
        let debug = format!("{:?}", post);
        assert!(debug.starts_with("Streaming"));
        assert!(debug.contains("<handler>"));
    }
}
