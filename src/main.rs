use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tournament_master::app::App;
use tournament_master::config::ClientConfig;
use tournament_master::error::{ApiError, ConfigError};
use tournament_master::navigation::{RecordingNavigator, Route};
use tournament_master::net::types::{DeckPatch, NewDeck, User};
use tournament_master::util::guards::GuardOutcome;
use tracing_subscriber::EnvFilter;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("http client setup failed: {0}")]
    Client(#[from] ApiError),
    #[error("redirected to {0}")]
    Redirect(Route),
    #[error("sign-in failed; the authorization code was rejected")]
    SignInFailed,
    #[error("no signed-in user; pass a user id")]
    MissingUserId,
    #[error("{0}")]
    Action(String),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "tm", about = "Tournament Master API client")]
struct Cli {
    #[arg(long, env = "API_BASE_URL")]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Exchange an OAuth authorization code for a session.
    Login { code: String },
    Logout,
    Whoami,
    Users(UsersCommand),
    Cards(CardsCommand),
    Decks(DecksCommand),
}

#[derive(Args, Debug)]
struct UsersCommand {
    #[command(subcommand)]
    command: UsersSubcommand,
}

#[derive(Subcommand, Debug)]
enum UsersSubcommand {
    List,
    Usernames {
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    Find {
        username: String,
    },
    Delete {
        user_id: String,
    },
}

#[derive(Args, Debug)]
struct CardsCommand {
    #[command(subcommand)]
    command: CardsSubcommand,
}

#[derive(Subcommand, Debug)]
enum CardsSubcommand {
    List {
        #[arg(long, help = "Defaults to the signed-in user")]
        user_id: Option<String>,
    },
    Add {
        user_id: String,
        multiverse_id: String,
    },
    Remove {
        card_id: String,
        #[arg(long)]
        user_id: Option<String>,
    },
    Show {
        multiverse_id: String,
    },
}

#[derive(Args, Debug)]
struct DecksCommand {
    #[command(subcommand)]
    command: DecksSubcommand,
}

#[derive(Subcommand, Debug)]
enum DecksSubcommand {
    List {
        #[arg(long, help = "Defaults to the signed-in user")]
        user_id: Option<String>,
    },
    Show {
        deck_id: String,
    },
    Create {
        name: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long, help = "Create the deck for another user")]
        user_id: Option<String>,
    },
    Update {
        deck_id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    Delete {
        deck_id: String,
    },
    AddCard {
        deck_id: String,
        user_card_id: String,
        #[arg(long, help = "Owner of the deck, when it is not yours")]
        user_id: Option<String>,
    },
    RemoveCard {
        deck_id: String,
        user_card_id: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    match dotenvy::dotenv() {
        Ok(path) => tracing::debug!(path = %path.display(), "loaded .env"),
        Err(err) if err.not_found() => {}
        Err(err) => tracing::warn!(error = %err, "failed to load .env"),
    }

    let cli = Cli::parse();
    let base_url = cli.base_url;
    let config = ClientConfig::from_lookup(|key| match key {
        "API_BASE_URL" => base_url.clone(),
        _ => env_var(key),
    })?;
    let app = App::from_config(config, Arc::new(RecordingNavigator::new()))?;

    match cli.command {
        Command::Login { code } => run_login(&app, &code).await,
        Command::Logout => {
            app.auth.logout();
            println!("signed out");
            Ok(())
        }
        Command::Whoami => {
            guard(app.require_auth().await)?;
            let user = app.auth.user();
            print_json(&serde_json::json!({
                "displayName": user.as_ref().map(User::display_name),
                "user": user,
            }))
        }
        Command::Users(users) => run_users(&app, users).await,
        Command::Cards(cards) => run_cards(&app, cards).await,
        Command::Decks(decks) => run_decks(&app, decks).await,
    }
}

async fn run_login(app: &App, code: &str) -> Result<(), CliError> {
    if !app.auth.handle_auth_callback(code).await {
        return Err(CliError::SignInFailed);
    }
    if let Some(message) = app.auth.last_error() {
        return Err(CliError::Action(message));
    }
    print_json(&app.auth.user())
}

async fn run_users(app: &App, users: UsersCommand) -> Result<(), CliError> {
    let store = &app.users;
    match users.command {
        UsersSubcommand::List => {
            guard(app.require_admin().await)?;
            store.fetch_all_users().await;
            check(store.error())?;
            print_json(&store.users())
        }
        UsersSubcommand::Usernames { page } => {
            guard(app.require_auth().await)?;
            store.fetch_usernames(page).await;
            check(store.error())?;
            let state = store.snapshot();
            print_json(&serde_json::json!({
                "usernames": state.usernames,
                "page": state.page,
                "totalPages": state.total_pages,
                "total": state.total,
                "nextPage": state.next_page(),
            }))
        }
        UsersSubcommand::Find { username } => {
            guard(app.require_auth().await)?;
            let user = store.fetch_by_username(&username).await;
            check(store.error())?;
            print_json(&user)
        }
        UsersSubcommand::Delete { user_id } => {
            guard(app.require_admin().await)?;
            let deleted = store.delete_user(&user_id).await;
            check(store.error())?;
            print_json(&serde_json::json!({ "deleted": deleted }))
        }
    }
}

async fn run_cards(app: &App, cards: CardsCommand) -> Result<(), CliError> {
    let store = &app.cards;
    match cards.command {
        CardsSubcommand::List { user_id } => {
            guard(app.require_auth().await)?;
            let user_id = user_or_self(app, user_id)?;
            store.fetch_user_cards(&user_id).await;
            check(store.error())?;
            print_json(&store.user_cards())
        }
        CardsSubcommand::Add { user_id, multiverse_id } => {
            guard(app.require_admin().await)?;
            store.add_card_to_user(&user_id, &multiverse_id).await;
            check(store.error())?;
            print_json(&store.user_cards())
        }
        CardsSubcommand::Remove { card_id, user_id } => {
            guard(app.require_auth().await)?;
            let user_id = user_or_self(app, user_id)?;
            store.remove_card(&card_id, &user_id).await;
            check(store.error())?;
            print_json(&store.user_cards())
        }
        CardsSubcommand::Show { multiverse_id } => {
            guard(app.require_auth().await)?;
            let card = store.fetch_card(&multiverse_id).await;
            check(store.error())?;
            print_json(&card)
        }
    }
}

async fn run_decks(app: &App, decks: DecksCommand) -> Result<(), CliError> {
    let store = &app.decks;
    guard(app.require_auth().await)?;
    match decks.command {
        DecksSubcommand::List { user_id } => {
            let user_id = user_or_self(app, user_id)?;
            store.fetch_user_decks(&user_id).await;
            check(store.error())?;
            print_json(&store.user_decks())
        }
        DecksSubcommand::Show { deck_id } => {
            let deck = store.fetch_deck(&deck_id).await;
            check(store.error())?;
            print_json(&deck)
        }
        DecksSubcommand::Create { name, description, user_id } => {
            let deck = NewDeck { name, description };
            let created = match user_id {
                Some(user_id) => store.create_deck_for_user(&deck, &user_id).await,
                None => store.create_deck(&deck).await,
            };
            check(store.error())?;
            print_json(&created)
        }
        DecksSubcommand::Update { deck_id, name, description } => {
            let updated = store.update_deck(&deck_id, &DeckPatch { name, description }).await;
            check(store.error())?;
            print_json(&updated)
        }
        DecksSubcommand::Delete { deck_id } => {
            let deleted = store.remove_deck(&deck_id).await;
            check(store.error())?;
            print_json(&serde_json::json!({ "deleted": deleted }))
        }
        DecksSubcommand::AddCard { deck_id, user_card_id, user_id } => {
            let deck = match user_id {
                Some(user_id) => store.add_user_card_to_deck_for_user(&user_id, &deck_id, &user_card_id).await,
                None => store.add_user_card_to_deck(&deck_id, &user_card_id).await,
            };
            check(store.error())?;
            print_json(&deck)
        }
        DecksSubcommand::RemoveCard { deck_id, user_card_id } => {
            let deck = store.remove_user_card_from_deck(&deck_id, &user_card_id).await;
            check(store.error())?;
            print_json(&deck)
        }
    }
}

fn guard(outcome: GuardOutcome) -> Result<(), CliError> {
    match outcome {
        GuardOutcome::Allow => Ok(()),
        GuardOutcome::Redirect(route) => {
            eprintln!("redirect: {route}");
            Err(CliError::Redirect(route))
        }
    }
}

fn check(error: Option<String>) -> Result<(), CliError> {
    match error {
        Some(message) => Err(CliError::Action(message)),
        None => Ok(()),
    }
}

fn user_or_self(app: &App, user_id: Option<String>) -> Result<String, CliError> {
    user_id.or_else(|| app.auth.user().map(|user| user.id)).ok_or(CliError::MissingUserId)
}

fn env_var(key: &str) -> Option<String> {
    match std::env::var(key) {
        Ok(value) => Some(value),
        Err(_) => None,
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}
