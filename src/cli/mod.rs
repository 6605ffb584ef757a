mod commands;
pub mod error;
pub mod utils;

use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::api::AppState;
use crate::auth::JwtIssuer;
use crate::config::{AuthConfig, DEFAULT_TOKEN_TTL_SECS, generate_jwt_secret, get_db_path};
use crate::db::{Database, Id, NewPost, SqliteDatabase};
use error::CliResult;
use utils::Rendered;

#[derive(Parser)]
#[command(name = "forum")]
#[command(author, version, about = "Q&A forum storage CLI", long_about = None)]
pub struct Cli {
    /// Database file path (defaults to XDG data directory: ~/.local/share/forum/forum.db)
    #[arg(long, global = true, env = "FORUM_DB")]
    pub db: Option<PathBuf>,

    /// Secret used to sign and verify session tokens
    #[arg(long, global = true, env = "FORUM_JWT_SECRET", hide_env_values = true)]
    pub jwt_secret: Option<String>,

    /// Session token lifetime in seconds
    #[arg(long, global = true, default_value_t = DEFAULT_TOKEN_TTL_SECS)]
    pub token_ttl: u64,

    /// Output format for lists (table or json)
    #[arg(long, global = true, default_value = "table", value_parser = ["table", "json"])]
    pub format: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Post management commands
    Posts {
        #[command(subcommand)]
        command: PostCommands,
    },
    /// User management commands
    Users {
        #[command(subcommand)]
        command: UserCommands,
    },
}

#[derive(Subcommand)]
enum PostCommands {
    /// Create a post and link it to a tag
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        body: String,
        /// Owning user ID
        #[arg(long)]
        user_id: Id,
        /// Tag name (created if it doesn't exist)
        #[arg(long)]
        tag: String,
        /// Description stored when the tag is first created
        #[arg(long)]
        tag_description: Option<String>,
    },
    /// Remove a post with its answers, comments and tag link
    Remove { id: Id },
    /// Show a post (counts a view)
    Show { id: Id },
    /// List posts
    List {
        /// Order by answers plus comments instead of recency
        #[arg(long, conflicts_with = "tag")]
        top: bool,
        /// Only posts with this tag
        #[arg(long)]
        tag: Option<String>,
    },
}

#[derive(Subcommand)]
enum UserCommands {
    /// Register a user and print a session token
    Register { username: String, password: String },
    /// Log in and print a session token
    Login { username: String, password: String },
    /// List users by post count
    List,
    /// Show a user with activity counts (counts a view)
    Show { id: Id },
    /// Show the profile a session token belongs to
    Me { token: String },
}

/// Initialize tracing subscriber with env filter, writing to stderr
fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "forum=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn auth_config(cli: &Cli) -> AuthConfig {
    let secret = cli.jwt_secret.clone().unwrap_or_else(|| {
        warn!("no JWT secret configured, tokens will only verify within this process");
        generate_jwt_secret()
    });

    AuthConfig {
        token_ttl_secs: cli.token_ttl,
        ..AuthConfig::new(secret)
    }
}

async fn dispatch(
    state: &AppState<SqliteDatabase>,
    command: Commands,
    format: &str,
) -> CliResult<Rendered> {
    match command {
        Commands::Posts { command } => match command {
            PostCommands::Create {
                title,
                body,
                user_id,
                tag,
                tag_description,
            } => {
                let post = NewPost {
                    title,
                    body,
                    user_id,
                    tagname: tag,
                };
                commands::post::create_post(state, &post, tag_description.as_deref()).await
            }
            PostCommands::Remove { id } => commands::post::remove_post(state, id).await,
            PostCommands::Show { id } => commands::post::show_post(state, id).await,
            PostCommands::List { top, tag } => {
                commands::post::list_posts(state, top, tag.as_deref(), format).await
            }
        },
        Commands::Users { command } => match command {
            UserCommands::Register { username, password } => {
                commands::user::register_user(state, &username, &password).await
            }
            UserCommands::Login { username, password } => {
                commands::user::login_user(state, &username, &password).await
            }
            UserCommands::List => commands::user::list_users(state, format).await,
            UserCommands::Show { id } => commands::user::show_user(state, id).await,
            UserCommands::Me { token } => commands::user::whoami(state, &token).await,
        },
    }
}

/// Parse arguments, run one command against the database and print its result.
///
/// Returns whether the command succeeded.
pub async fn run() -> CliResult<bool> {
    let mut cli = Cli::parse();
    init_tracing();

    let Some(command) = cli.command.take() else {
        Cli::command().print_help()?;
        return Ok(true);
    };

    let db_path = cli.db.clone().unwrap_or_else(get_db_path);
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    info!(path = %db_path.display(), "opening database");
    let db = SqliteDatabase::open(&db_path).await?;
    db.migrate().await?;

    let state: AppState<SqliteDatabase, JwtIssuer> =
        AppState::from_config(db.clone(), &auth_config(&cli));
    let result = dispatch(&state, command, &cli.format).await;
    db.close().await;

    let rendered = result?;
    println!("{}", rendered.text);
    Ok(rendered.success)
}
