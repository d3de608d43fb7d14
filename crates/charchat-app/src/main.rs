use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use rustyline::DefaultEditor;

use charchat_client::{ApiClient, ClientConfig};

mod cli;
mod repl;

use cli::{Cli, Command};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = match &cli.api_url {
        Some(url) => ClientConfig::new(url),
        None => ClientConfig::from_env(),
    }
    .with_verbose(cli.verbose);
    let client = ApiClient::new(config)?;

    match cli.command {
        Some(Command::Register { ref username }) => {
            let password = prompt_password()?;
            client.register(username, &password).await?;
            println!("{} Account created, you can log in now.", "✅".green());
        }
        Some(Command::Login { ref username }) => {
            let password = prompt_password()?;
            client.login(username, &password).await?;
            println!("{} Logged in as {}.", "✅".green(), username.bright_cyan());
        }
        Some(Command::Logout) => {
            client.logout()?;
            println!("{} Session token cleared.", "👋".yellow());
        }
        Some(Command::Sessions) => {
            repl::print_sessions(&client).await?;
        }
        Some(Command::Health) => {
            if client.health().await {
                println!("{} Backend is reachable at {}", "✅".green(), client.base_url());
            } else {
                println!("{} Backend is not responding at {}", "❌".red(), client.base_url());
                std::process::exit(1);
            }
        }
        None => {
            repl::run(&client, &cli).await?;
        }
    }

    Ok(())
}

fn prompt_password() -> Result<String> {
    let mut editor = DefaultEditor::new()?;
    let password = editor.readline("password: ")?;
    Ok(password.trim().to_string())
}
