use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Subcommand;
use serde_json::json;

use crate::cli::utils::{open_local_store, output_json, output_success};
use crate::cli::OutputFormat;
use crate::database::Corpus;
use crate::services::DictionaryService;

#[derive(Subcommand)]
pub enum CorpusCommands {
    #[command(about = "Import words from a corpus file (full object or bare array of words)")]
    Import {
        #[arg(help = "Path to the JSON file")]
        file: PathBuf,
    },

    #[command(about = "Export every word as a JSON array")]
    Export {
        #[arg(help = "Destination file")]
        file: PathBuf,
    },

    #[command(about = "Word counts by status, meanings and accounts")]
    Stats,
}

pub async fn handle(cmd: CorpusCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let (config, store) = open_local_store().await?;
    let dictionary = DictionaryService::new(store.clone(), Arc::new(config));

    match cmd {
        CorpusCommands::Import { file } => {
            let raw = tokio::fs::read_to_string(&file)
                .await
                .with_context(|| format!("failed to read {}", file.display()))?;
            let corpus = Corpus::from_json(&raw).with_context(|| format!("{} is not a corpus file", file.display()))?;

            let summary = dictionary.import(corpus.words).await?;
            if matches!(output_format, OutputFormat::Text) {
                for lemma in &summary.skipped {
                    println!("  skipped duplicate '{}'", lemma);
                }
            }
            output_success(
                output_format,
                &format!("Imported {} words ({} skipped)", summary.imported, summary.skipped.len()),
                Some(json!({ "imported": summary.imported, "skipped": summary.skipped })),
            )
        }
        CorpusCommands::Export { file } => {
            let mut words = store.words().await?;
            words.sort_by_key(|w| w.id);

            let body = serde_json::to_vec_pretty(&words)?;
            tokio::fs::write(&file, body)
                .await
                .with_context(|| format!("failed to write {}", file.display()))?;

            output_success(
                output_format,
                &format!("Exported {} words to {}", words.len(), file.display()),
                Some(json!({ "exported": words.len(), "file": file.display().to_string() })),
            )
        }
        CorpusCommands::Stats => {
            let stats = dictionary.stats().await?;
            match output_format {
                OutputFormat::Json => output_json(&serde_json::to_value(&stats)?),
                OutputFormat::Text => {
                    println!("Backend:  {}", stats.backend);
                    println!("Words:    {}", stats.words);
                    for (status, count) in &stats.by_status {
                        println!("  {:<10} {}", status.as_str(), count);
                    }
                    println!("Meanings: {}", stats.meanings);
                    println!("Accounts: {}", stats.users);
                    Ok(())
                }
            }
        }
    }
}
