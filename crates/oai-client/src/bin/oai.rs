//! oai command-line front end
//!
//! Usage:
//!   oai models
//!   oai model gpt-3.5-turbo
//!   oai chat gpt-3.5-turbo "Say hello" --stream
//!   oai files
//!
//! Configuration comes from ~/.config/oai/config.toml or OPENAI_* variables.
//! Logging honours RUST_LOG and LOG_FORMAT=json.

use oai_client::{Client, Parameters, Result};
use serde_json::{json, Value};
use std::env;
use std::io::{self, Write};
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug)]
enum Command {
    Models,
    Model(String),
    Chat {
        model: String,
        prompt: String,
        stream: bool,
    },
    Files,
}

fn usage() -> &'static str {
    "usage: oai <models | model <id> | chat <model> <prompt> [--stream] | files>"
}

fn parse_args() -> std::result::Result<Command, String> {
    let args: Vec<String> = env::args().skip(1).collect();

    match args.first().map(String::as_str) {
        Some("models") => Ok(Command::Models),
        Some("files") => Ok(Command::Files),
        Some("model") => args
            .get(1)
            .map(|id| Command::Model(id.clone()))
            .ok_or_else(|| "model: missing <id>".to_string()),
        Some("chat") => {
            let stream = args.iter().any(|a| a == "--stream");
            let positional: Vec<&String> = args[1..].iter().filter(|a| *a != "--stream").collect();
            match positional.as_slice() {
                [model, prompt] => Ok(Command::Chat {
                    model: model.to_string(),
                    prompt: prompt.to_string(),
                    stream,
                }),
                _ => Err("chat: expected <model> <prompt>".to_string()),
            }
        }
        Some(other) => Err(format!("unknown command: {}", other)),
        None => Err(usage().to_string()),
    }
}

fn init_logging() {
    let log_format = env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "oai=info,oai_client=info".into());

    let registry = tracing_subscriber::registry().with(env_filter);

    // Logs go to stderr so stdout stays clean JSON.
    if log_format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn print_json(value: Option<Value>) -> Result<()> {
    match value {
        Some(value) => println!("{}", serde_json::to_string_pretty(&value)?),
        None => println!("(no content)"),
    }
    Ok(())
}

/// Write each fragment's `choices[0].delta.content` and flush.
fn write_deltas<W: Write>(out: &mut W, fragments: &[Value]) -> io::Result<()> {
    for fragment in fragments {
        if let Some(content) = fragment["choices"][0]["delta"]["content"].as_str() {
            out.write_all(content.as_bytes())?;
        }
    }
    out.flush()
}

async fn run(command: Command) -> Result<()> {
    let client = Client::load()?;

    match command {
        Command::Models => print_json(client.models().list().await?),
        Command::Model(id) => print_json(client.models().retrieve(&id).await?),
        Command::Files => print_json(client.files().list().await?),
        Command::Chat {
            model,
            prompt,
            stream,
        } => {
            let params = Parameters::try_from(json!({
                "model": model,
                "messages": [{"role": "user", "content": prompt}],
            }))?;

            if !stream {
                return print_json(client.chat(params).await?);
            }

            let mut write_error: Option<io::Error> = None;
            client
                .chat(params.streaming(|fragments, _bytes| {
                    if write_error.is_some() {
                        return;
                    }
                    if let Err(e) = write_deltas(&mut io::stdout().lock(), &fragments) {
                        write_error = Some(e);
                    }
                }))
                .await?;

            if let Some(e) = write_error {
                return Err(e.into());
            }
            println!();
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    init_logging();

    let command = match parse_args() {
        Ok(command) => command,
        Err(message) => {
            eprintln!("{}", message);
            eprintln!("{}", usage());
            return ExitCode::FAILURE;
        }
    };

    match run(command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Command failed");
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_write_deltas_concatenates_content() {
        let fragments = vec![
            json!({"choices": [{"delta": {"role": "assistant"}}]}),
            json!({"choices": [{"delta": {"content": "Hel"}}]}),
            json!({"choices": [{"delta": {"content": "lo"}}]}),
        ];
        let mut out = Vec::new();
        write_deltas(&mut out, &fragments).unwrap();
        assert_eq!(out, b"Hello");
    }

    #[test]
    fn test_write_deltas_reports_write_failure() {
        let fragments = vec![json!({"choices": [{"delta": {"content": "x"}}]})];
        let err = write_deltas(&mut BrokenPipe, &fragments).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
    }
}
