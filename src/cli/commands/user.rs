use clap::Subcommand;
use serde_json::json;

use crate::auth::Role;
use crate::cli::utils::{open_local_store, output_empty_collection, output_json, output_success, read_secret};
use crate::cli::OutputFormat;
use crate::database::models::NewUser;
use crate::services::UserService;

#[derive(Subcommand)]
pub enum UserCommands {
    #[command(about = "Create a staff account (the first account is always a superadmin)")]
    Add {
        #[arg(help = "Username")]
        username: String,
        #[arg(help = "Email")]
        email: String,
        #[arg(long, default_value = "lexicographer", help = "lexicographer, editor, admin or superadmin")]
        role: Role,
        #[arg(long, help = "Password (read from stdin if not provided)")]
        password: Option<String>,
    },

    #[command(about = "List staff accounts")]
    List,
}

pub async fn handle(cmd: UserCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let (config, store) = open_local_store().await?;
    let users = UserService::new(store.clone(), std::sync::Arc::new(config));

    match cmd {
        UserCommands::Add { username, email, role, password } => {
            let password = read_secret(password, "Password")?;

            let first = store.users().await?.is_empty();
            let user = if first {
                if role != Role::Superadmin {
                    tracing::info!("No accounts yet, creating {} as superadmin", username);
                }
                users.bootstrap_superadmin(&username, &email, &password).await?
            } else {
                users.register(NewUser { username, email, password, role }).await?
            };

            output_success(
                output_format,
                &format!("Created {} ({})", user.username, user.role),
                Some(json!({ "user": user })),
            )
        }
        UserCommands::List => {
            let list = users.list_users().await?;
            if list.is_empty() {
                return output_empty_collection(output_format, "users", "No accounts yet");
            }

            match output_format {
                OutputFormat::Json => output_json(&json!({ "users": list })),
                OutputFormat::Text => {
                    println!("{:<24} {:<14} {:<8} {}", "USERNAME", "ROLE", "ACTIVE", "EMAIL");
                    for user in list {
                        println!("{:<24} {:<14} {:<8} {}", user.username, user.role, user.active, user.email);
                    }
                    Ok(())
                }
            }
        }
    }
}
