use anyhow::Context;
use serde_json::json;

use crate::auth::password::hash_password;
use crate::cli::utils::{output_success, read_secret};
use crate::cli::OutputFormat;
use crate::config::CONFIG;

pub fn handle(password: Option<String>, output_format: OutputFormat) -> anyhow::Result<()> {
    let password = read_secret(password, "Password")?;
    let hash = hash_password(&password, CONFIG.session.password_cost).context("Failed to hash password")?;

    match output_format {
        OutputFormat::Json => output_success(output_format, "Password hashed", Some(json!({ "hash": hash }))),
        OutputFormat::Text => {
            println!("{}", hash);
            Ok(())
        }
    }
}
