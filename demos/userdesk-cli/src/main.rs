//! Userdesk CLI Demo
//!
//! Signs in against the Userdesk backend and browses its users. The session
//! token is kept in the local store between runs, so `login` once and the
//! other commands are authenticated.
//!
//! Run with:
//!   cargo run -p userdesk-cli -- login --username emilys --password emilyspass
//!   cargo run -p userdesk-cli -- whoami
//!   cargo run -p userdesk-cli -- list --limit 5
//!   cargo run -p userdesk-cli -- --preset jsonplaceholder config

use std::sync::Arc;

use clap::{Parser, Subcommand};
use console::style;
use serde_json::json;
use userdesk_sdk::auth::{FileLocalStore, session_for};
use userdesk_sdk::{
    ApiConfigOverrides, ApiPreset, AuthApi, AuthOutcome, Authenticator, ConfigResolver,
    Environment, HttpClient, SessionBridge, TokenStore, User, UsersApi, UsersResponse,
};

/// Userdesk command-line client
#[derive(Parser, Debug)]
#[command(name = "userdesk-cli")]
#[command(about = "Sign in and browse users on the Userdesk backend")]
struct Args {
    /// Deployment environment (development, staging, production)
    #[arg(long, short = 'e')]
    env: Option<Environment>,

    /// API preset (dummyjson, jsonplaceholder, custom)
    #[arg(long, short = 'p')]
    preset: Option<ApiPreset>,

    /// Base URL, overriding environment and preset
    #[arg(long)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sign in and remember the session token
    Login {
        /// Account username
        #[arg(long, short = 'u')]
        username: String,
        /// Account password
        #[arg(long)]
        password: String,
    },
    /// Forget the session token
    Logout,
    /// Show the signed-in user
    Whoami,
    /// List users
    List {
        /// Page size
        #[arg(long, short = 'l')]
        limit: Option<u32>,
        /// Offset
        #[arg(long, short = 's')]
        skip: Option<u32>,
    },
    /// Search users
    Search {
        /// Search text
        query: String,
        /// Page size
        #[arg(long, short = 'l')]
        limit: Option<u32>,
    },
    /// Show one user
    User {
        /// User ID
        id: u64,
    },
    /// Print the resolved configuration
    Config,
}

fn resolve_config(args: &Args) -> anyhow::Result<userdesk_sdk::ApiConfig> {
    let mut resolver = match args.env {
        Some(env) => ConfigResolver::for_environment(env),
        None => ConfigResolver::new(),
    }
    .environment(ApiConfigOverrides::from_server_env()?);
    if let Some(preset) = args.preset {
        resolver = resolver.preset(preset);
    }
    if let Some(base_url) = &args.base_url {
        resolver = resolver.overrides(ApiConfigOverrides::base_url(base_url.clone()));
    }
    Ok(resolver.resolve()?)
}

fn print_user(user: &User) {
    println!(
        "  {} {} {}",
        style(format!("#{}", user.id)).dim(),
        style(user.full_name()).bold(),
        style(format!("<{}>", user.email)).cyan()
    );
}

fn page_summary(page: &UsersResponse) -> String {
    if page.users.is_empty() {
        return format!("No users (total {})", page.total);
    }
    format!(
        "{}-{} of {}{}",
        page.skip + 1,
        page.skip + page.users.len() as u64,
        page.total,
        if page.has_next() { " (more available)" } else { "" }
    )
}

fn print_page(page: &UsersResponse) {
    for user in &page.users {
        print_user(user);
    }
    println!("{}", style(page_summary(page)).dim());
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize tracing (quiet by default, use RUST_LOG=debug to see requests)
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = resolve_config(&args)?;
    let tokens = TokenStore::with_local_store(Arc::new(FileLocalStore::new()));
    let client = HttpClient::new(config, tokens.clone())?;

    match args.command {
        Command::Login { username, password } => {
            let auth = Authenticator::new(client);
            match auth
                .sign_in(json!({"username": username, "password": password}))
                .await
            {
                AuthOutcome::Success(user) => {
                    SessionBridge::new(tokens).sync(Some(&session_for(&user)));
                    println!(
                        "{} Signed in as {}",
                        style("✓").green(),
                        style(user.name.as_deref().unwrap_or(&user.id)).bold()
                    );
                }
                AuthOutcome::InvalidCredentials => {
                    anyhow::bail!("Invalid username or password");
                }
                AuthOutcome::TransportFailure(e) => {
                    anyhow::bail!("Backend unavailable: {e}");
                }
            }
        }
        Command::Logout => {
            AuthApi::new(client).logout();
            println!("{} Signed out", style("✓").green());
        }
        Command::Whoami => {
            if !tokens.is_set() {
                anyhow::bail!("Not signed in, run `userdesk-cli login` first");
            }
            let user = AuthApi::new(client).profile().await?;
            print_user(&user);
        }
        Command::List { limit, skip } => {
            let page = UsersApi::new(client).fetch_users(limit, skip).await?;
            print_page(&page);
        }
        Command::Search { query, limit } => {
            let page = UsersApi::new(client).search_users(&query, limit).await?;
            if page.users.is_empty() {
                println!("No users match {}", style(&query).bold());
            } else {
                print_page(&page);
            }
        }
        Command::User { id } => {
            let user = UsersApi::new(client).get_user(id).await?;
            print_user(&user);
            println!(
                "    {} {}, {}",
                style("works at").dim(),
                user.company.name,
                user.company.title
            );
        }
        Command::Config => {
            println!("{}", serde_json::to_string_pretty(&client.config())?);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_summary() {
        let empty = UsersResponse {
            users: Vec::new(),
            total: 0,
            skip: 0,
            limit: 30,
        };
        assert_eq!(page_summary(&empty), "No users (total 0)");

        let past_end = UsersResponse {
            skip: 300,
            total: 208,
            ..empty
        };
        assert_eq!(page_summary(&past_end), "No users (total 208)");
    }
}
