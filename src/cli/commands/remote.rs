use std::time::Duration;

use anyhow::Context;
use clap::Subcommand;
use serde_json::Value;

use crate::cli::utils::{output_error, output_json};
use crate::cli::OutputFormat;

#[derive(Subcommand)]
pub enum RemoteCommands {
    #[command(about = "Check server health from the /health endpoint")]
    Health,

    #[command(about = "Search published words")]
    Search {
        #[arg(help = "Search text")]
        query: Option<String>,
        #[arg(long, help = "Grammatical category code (repeatable)")]
        category: Vec<String>,
        #[arg(long, help = "Usage style code (repeatable)")]
        style: Vec<String>,
        #[arg(long, help = "Initial letter")]
        letter: Option<String>,
        #[arg(long)]
        page: Option<usize>,
    },

    #[command(about = "Show the word of the day")]
    Daily {
        #[arg(long, help = "Date as YYYY-MM-DD (defaults to today)")]
        date: Option<String>,
    },
}

pub async fn handle(server: &str, cmd: RemoteCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let base = server.trim_end_matches('/');
    let client = reqwest::Client::builder().timeout(Duration::from_secs(10)).build()?;

    let request = match &cmd {
        RemoteCommands::Health => client.get(format!("{}/health", base)),
        RemoteCommands::Search { query, category, style, letter, page } => {
            let mut params: Vec<(&str, String)> = Vec::new();
            if let Some(q) = query {
                params.push(("q", q.clone()));
            }
            params.extend(category.iter().map(|c| ("category", c.clone())));
            params.extend(style.iter().map(|s| ("style", s.clone())));
            if let Some(letter) = letter {
                params.push(("letter", letter.clone()));
            }
            if let Some(page) = page {
                params.push(("page", page.to_string()));
            }
            client.get(format!("{}/api/search", base)).query(&params)
        }
        RemoteCommands::Daily { date } => {
            let request = client.get(format!("{}/api/word-of-the-day", base));
            match date {
                Some(date) => request.query(&[("date", date)]),
                None => request,
            }
        }
    };

    let response = request.send().await.with_context(|| format!("failed to reach {}", base))?;
    let status = response.status();
    let body: Value = response.json().await.context("server returned a non-JSON body")?;

    // /health answers 503 with a regular envelope when degraded
    if !status.is_success() && !matches!(cmd, RemoteCommands::Health) {
        let message = body
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("request failed")
            .to_string();
        output_error(output_format, &message, body.get("code").and_then(Value::as_str))?;
        anyhow::bail!("server answered {}", status);
    }

    match output_format {
        OutputFormat::Json => output_json(&body),
        OutputFormat::Text => {
            print_text(&cmd, &body);
            Ok(())
        }
    }
}

fn print_text(cmd: &RemoteCommands, body: &Value) {
    let data = &body["data"];
    match cmd {
        RemoteCommands::Health => {
            println!("Status: {}", data["status"].as_str().unwrap_or("unknown"));
            if let Some(error) = body.get("error").and_then(Value::as_str) {
                println!("Error: {}", error);
            }
        }
        RemoteCommands::Search { .. } => {
            println!(
                "{} results (page {} of {})",
                data["total"].as_u64().unwrap_or(0),
                data["page"].as_u64().unwrap_or(1),
                data["total_pages"].as_u64().unwrap_or(0)
            );
            for item in data["items"].as_array().into_iter().flatten() {
                println!("  {}", item["lemma"].as_str().unwrap_or("?"));
            }
        }
        RemoteCommands::Daily { .. } => {
            let word = &data["word"];
            println!("{}: {}", data["date"].as_str().unwrap_or("?"), word["lemma"].as_str().unwrap_or("?"));
            for meaning in word["meanings"].as_array().into_iter().flatten() {
                println!(
                    "  {}. {}",
                    meaning["number"].as_u64().unwrap_or(0),
                    meaning["meaning"].as_str().unwrap_or("")
                );
            }
        }
    }
}
