use anyhow::Result;
use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use charchat_client::{ApiClient, ApiError};
use charchat_models::{ChatMessage, CreativitySettings, SessionId};

use crate::cli::Cli;

/// Run the interactive chat loop
pub async fn run(client: &ApiClient, cli: &Cli) -> Result<()> {
    println!("{}", "💬 charchat".bright_cyan().bold());
    println!("{}", format!("Backend: {}", client.base_url()).bright_black());
    println!(
        "{}",
        "Type a message to chat, '/help' for commands, 'exit' to leave\n".bright_black()
    );

    let mut editor = DefaultEditor::new()?;
    ensure_login(client, &mut editor).await?;

    // Character banner; display data is best-effort and never blocks chatting
    let character_name = match client.get_character(&cli.character).await {
        Ok(character) => {
            println!("\n{}", character.name.bright_magenta().bold());
            if let Some(category) = &character.category {
                println!("{}", category.bright_black());
            }
            if !character.description.is_empty() {
                println!("{}", character.description.bright_black());
            }
            character.name
        }
        Err(e) => {
            println!(
                "{}",
                format!("(could not load character details: {})", e).bright_black()
            );
            cli.character.clone()
        }
    };

    let creativity = cli.temperature.map(|temperature| CreativitySettings {
        temperature: Some(temperature),
        ..Default::default()
    });

    let mut conversation_id: Option<SessionId> = None;
    let mut new_session = true;
    print_greeting(&character_name);

    loop {
        let line = match editor.readline(&format!("{} ", "you ›".bright_green())) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        editor.add_history_entry(line).ok();

        match line {
            "exit" | "quit" => break,
            "/help" => print_help(),
            "/logout" => {
                client.logout()?;
                println!("{} Logged out.", "👋".yellow());
                ensure_login(client, &mut editor).await?;
            }
            "/new" => {
                conversation_id = None;
                new_session = true;
                print_greeting(&character_name);
            }
            "/sessions" => {
                if let Err(e) = print_sessions(client).await {
                    print_error(&e);
                }
            }
            command if command.starts_with("/open ") => {
                let id = parse_session_id(&command["/open ".len()..]);
                match client.get_session_messages(&id).await {
                    Ok(messages) => {
                        print_transcript(&messages, &character_name);
                        conversation_id = Some(id);
                        new_session = false;
                    }
                    Err(ApiError::Unauthenticated) => {
                        println!("{} {}", "🔒".yellow(), ApiError::Unauthenticated);
                        ensure_login(client, &mut editor).await?;
                    }
                    Err(e) => print_error(&e.into()),
                }
            }
            command if command.starts_with("/delete ") => {
                let id = parse_session_id(&command["/delete ".len()..]);
                match client.delete_session(&id).await {
                    Ok(()) => {
                        println!("{} Session {} deleted.", "🗑️".yellow(), id);
                        if conversation_id.as_ref() == Some(&id) {
                            conversation_id = None;
                            new_session = true;
                        }
                    }
                    Err(ApiError::Unauthenticated) => {
                        println!("{} {}", "🔒".yellow(), ApiError::Unauthenticated);
                        ensure_login(client, &mut editor).await?;
                    }
                    Err(e) => print_error(&e.into()),
                }
            }
            command if command.starts_with('/') => {
                println!("{} Unknown command: {}", "❓".yellow(), command);
                print_help();
            }
            text => {
                match client
                    .send_message(
                        &cli.character,
                        text,
                        new_session,
                        conversation_id.as_ref(),
                        creativity.as_ref(),
                    )
                    .await
                {
                    Ok(turn) => {
                        if let Some(id) = turn.session_id {
                            conversation_id = Some(id);
                        }
                        new_session = false;
                        // A history payload may include the echoed user message;
                        // show only the latest assistant reply
                        if let Some(reply) = turn.messages.iter().rev().find(|m| !m.is_user()) {
                            print_character_line(&character_name, &reply.content);
                        }
                    }
                    Err(ApiError::Unauthenticated) => {
                        println!("{} {}", "🔒".yellow(), ApiError::Unauthenticated);
                        ensure_login(client, &mut editor).await?;
                    }
                    Err(e) => print_error(&e.into()),
                }
            }
        }
    }

    println!("{}", "Goodbye!".bright_black());
    Ok(())
}

/// Prompt for credentials until a login succeeds. Skipped entirely when a
/// valid session is already stored.
async fn ensure_login(client: &ApiClient, editor: &mut DefaultEditor) -> Result<()> {
    if client.is_authenticated() {
        if let Some(info) = client.user_info() {
            let who = info
                .username
                .or(info.user_id)
                .unwrap_or_else(|| "you".to_string());
            println!("{}", format!("Welcome back, {}!", who).bright_cyan());
        }
        return Ok(());
    }

    println!(
        "{}",
        "Log in to continue (type 'register' to create an account)".bright_black()
    );
    loop {
        let username = editor.readline("username: ")?;
        let username = username.trim().to_string();
        if username.is_empty() {
            continue;
        }

        if username == "register" {
            let new_username = editor.readline("new username: ")?;
            let password = editor.readline("password: ")?;
            match client.register(new_username.trim(), password.trim()).await {
                Ok(_) => println!("{} Account created, now log in.", "✅".green()),
                Err(e) => print_error(&e.into()),
            }
            continue;
        }

        let password = editor.readline("password: ")?;
        match client.login(&username, password.trim()).await {
            Ok(()) => {
                println!("{} Logged in as {}.", "✅".green(), username.bright_cyan());
                return Ok(());
            }
            Err(e) => print_error(&e.into()),
        }
    }
}

/// List stored chat sessions
pub async fn print_sessions(client: &ApiClient) -> Result<()> {
    let sessions = client.get_sessions().await?;
    if sessions.is_empty() {
        println!("{}", "No stored sessions yet.".bright_black());
        return Ok(());
    }

    println!("{}", "Your sessions:".bright_yellow());
    for session in &sessions {
        let mut line = format!("  {} — {}", session.session_id, session.character);
        if let Some(title) = &session.title {
            line.push_str(&format!(" · {}", title));
        }
        if let Some(count) = session.message_count {
            line.push_str(&format!(" ({} messages)", count));
        }
        println!("{}", line);
    }
    println!(
        "{}",
        "Use '/open <id>' to continue one of them.".bright_black()
    );
    Ok(())
}

fn print_transcript(messages: &[ChatMessage], character_name: &str) {
    for message in messages {
        if message.is_user() {
            println!("{} {}", "you ›".bright_green(), message.content);
        } else {
            print_character_line(character_name, &message.content);
        }
    }
}

fn print_character_line(character_name: &str, content: &str) {
    println!(
        "{} {}",
        format!("{} ›", character_name).bright_magenta(),
        content
    );
}

fn print_greeting(character_name: &str) {
    print_character_line(
        character_name,
        &format!(
            "Hello! I'm {}. What would you like to talk about?",
            character_name
        ),
    );
}

fn print_error(error: &anyhow::Error) {
    println!("{} {}", "❌".red(), error);
}

/// Numeric-looking ids become numbers so they match what the backend issued
fn parse_session_id(raw: &str) -> SessionId {
    let raw = raw.trim();
    match raw.parse::<i64>() {
        Ok(n) => SessionId::Number(n),
        Err(_) => SessionId::Text(raw.to_string()),
    }
}

fn print_help() {
    println!("{}", "Commands:".bright_yellow());
    println!("  /sessions        list your stored sessions");
    println!("  /open <id>       continue a stored session");
    println!("  /delete <id>     delete a stored session");
    println!("  /new             start a fresh conversation");
    println!("  /logout          clear the stored session token");
    println!("  /help            show this help");
    println!("  exit, quit       leave charchat");
}
