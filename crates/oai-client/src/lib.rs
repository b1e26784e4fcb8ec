//! # oai-client
//!
//! Client for the OpenAI REST API that speaks dynamic JSON.
//!
//! Requests are parameter maps, responses come back as
//! `serde_json::Value`. This crate provides:
//! - A [`Dispatcher`] issuing GET, JSON POST, multipart POST and DELETE
//! - Body decoding, including bodies made of newline-joined objects
//! - Incremental decoding of streamed completions, pushed to a handler or
//!   pulled as a [`FragmentStream`]
//! - The [`Client`] entry object and its sub-resources (files, models,
//!   fine-tunes, images, engines)
//!
//! # Example
//!
//! ```rust,no_run
//! use oai_client::{Client, ClientConfig, Parameters};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> oai_client::Result<()> {
//!     let client = Client::new(ClientConfig::new("sk-..."))?;
//!
//!     let params = Parameters::try_from(json!({
//!         "model": "gpt-3.5-turbo",
//!         "messages": [{"role": "user", "content": "Hello!"}],
//!     }))?;
//!
//!     // Whole response
//!     let response = client.chat(params.clone()).await?;
//!     println!("{:?}", response);
//!
//!     // Streamed response
//!     client
//!         .chat(params.streaming(|fragments, _bytes| {
//!             for fragment in fragments {
//!                 print!("{}", fragment["choices"][0]["delta"]["content"].as_str().unwrap_or(""));
//!             }
//!         }))
//!         .await?;
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod decode;
pub mod dispatcher;
pub mod multipart;
pub mod params;
pub mod resources;
pub mod streaming;

// Re-export core types
pub use oai_core::*;

pub use client::Client;
pub use decode::{decode_body, decode_text};
pub use dispatcher::Dispatcher;
pub use multipart::{FormValue, MultipartParams, PreparedPart};
pub use params::{Parameters, PostParams};
pub use resources::{Engines, Files, Finetunes, Images, Models};
pub use streaming::{
    decode_chunk, fragment_stream, FragmentBatch, FragmentStream, StreamHandler,
};
