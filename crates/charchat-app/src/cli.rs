use clap::{Parser, Subcommand};

/// Terminal client for the character chat service
#[derive(Parser, Debug)]
#[command(name = "charchat", version, about)]
pub struct Cli {
    /// Backend base URL (defaults to the hosted service)
    #[arg(long, env = "CHARCHAT_API_URL")]
    pub api_url: Option<String>,

    /// Character to chat with
    #[arg(short, long, default_value = "revanth-reddy")]
    pub character: String,

    /// Sampling temperature forwarded to the backend
    #[arg(long)]
    pub temperature: Option<f64>,

    /// Show HTTP request/response debug output
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a new account
    Register { username: String },
    /// Log in and store the session token
    Login { username: String },
    /// Clear the stored session token
    Logout,
    /// List stored chat sessions
    Sessions,
    /// Check whether the backend is reachable
    Health,
}
