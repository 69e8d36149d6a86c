use std::io::{self, BufRead, IsTerminal, Write};
use std::sync::Arc;

use anyhow::Context;
use serde_json::{json, Value};

use crate::cli::OutputFormat;
use crate::config::{AppConfig, CONFIG};
use crate::database::{DatabaseManager, DictionaryStore};

/// Output a success message in the appropriate format
pub fn output_success(output_format: OutputFormat, message: &str, data: Option<Value>) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": true,
                "message": message
            });

            if let (Some(target), Some(Value::Object(extra))) = (response.as_object_mut(), data) {
                target.extend(extra);
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

/// Output an error message in the appropriate format
pub fn output_error(output_format: OutputFormat, message: &str, error_code: Option<&str>) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": false,
                "error": message
            });

            if let Some(code) = error_code {
                response["error_code"] = json!(code);
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            eprintln!("Error: {}", message);
        }
    }
    Ok(())
}

/// Output an empty collection in the appropriate format
pub fn output_empty_collection(output_format: OutputFormat, collection_name: &str, message: &str) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&json!({
                    collection_name: []
                }))?
            );
        }
        OutputFormat::Text => {
            println!("{}", message);
        }
    }
    Ok(())
}

/// Print a JSON value as-is, for commands whose text output is built by the caller
pub fn output_json(value: &Value) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// The store the server would open with the current environment
pub async fn open_local_store() -> anyhow::Result<(AppConfig, Arc<dyn DictionaryStore>)> {
    let config = (*CONFIG).clone();
    let store = DatabaseManager::open_store(&config)
        .await
        .context("failed to open dictionary store")?;
    Ok((config, store))
}

/// Use the given secret, or read one line from stdin (prompting on a terminal)
pub fn read_secret(provided: Option<String>, prompt: &str) -> anyhow::Result<String> {
    if let Some(secret) = provided {
        return Ok(secret);
    }

    let stdin = io::stdin();
    if stdin.is_terminal() {
        eprint!("{}: ", prompt);
        io::stderr().flush()?;
    }

    let mut line = String::new();
    stdin.lock().read_line(&mut line)?;
    let secret = line.trim_end_matches(['\r', '\n']).to_string();
    if secret.is_empty() {
        anyhow::bail!("{} is required", prompt);
    }
    Ok(secret)
}
