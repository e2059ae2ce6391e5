//! CLI entry and dispatch.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use orbita::api::ApiClient;
use orbita::auth::TokenStore;
use orbita::config::{Config, paths};
use orbita::onboarding::{ProfileStore, ProfileSync};

mod commands;

#[derive(Parser)]
#[command(name = "orbita")]
#[command(version)]
#[command(about = "Terminal client for the Orbita student platform")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Log in to the platform
    Login {
        #[arg(long)]
        email: String,
        /// Account password (or set ORBITA_PASSWORD)
        #[arg(long, env = "ORBITA_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Create an account and log in
    Register {
        #[arg(long)]
        email: String,
        #[arg(long, value_name = "NAME")]
        full_name: String,
        /// Account password (or set ORBITA_PASSWORD)
        #[arg(long, env = "ORBITA_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Log out and clear stored credentials
    Logout,
    /// Show the session, profile and required onboarding step
    Status,
    /// Browse and choose a main specialization
    Specialty {
        #[command(subcommand)]
        command: SpecialtyCommands,
    },
    /// Browse and choose a minor (orbit)
    Minor {
        #[command(subcommand)]
        command: MinorCommands,
    },
    /// Show learning progress
    Progress,
    /// Create a default config file
    Init,
}

#[derive(clap::Subcommand)]
enum SpecialtyCommands {
    /// List available specializations
    List,
    /// Set the main specialization
    Set {
        #[arg(value_name = "SPECIALIZATION_ID")]
        id: u64,
    },
}

#[derive(clap::Subcommand)]
enum MinorCommands {
    /// List available minors
    List,
    /// Select a minor
    Select {
        #[arg(value_name = "MINOR_ID")]
        id: u64,
    },
}

/// Shared command context: the pipeline client plus onboarding state.
pub struct App {
    pub store: Arc<TokenStore>,
    pub client: ApiClient,
    pub profile: Arc<ProfileStore>,
    pub sync: ProfileSync,
}

impl App {
    fn init() -> Result<Self> {
        let config = Config::load()?;
        let base_url = config.effective_base_url()?;

        let store = Arc::new(TokenStore::open_default()?);

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().context("Failed to build HTTP client")?;
        let client = ApiClient::with_http(http, base_url, Arc::clone(&store));

        let profile = Arc::new(ProfileStore::new());
        let expired_profile = Arc::clone(&profile);
        client.on_session_expired(move || expired_profile.reset());

        let sync = ProfileSync::new(Arc::clone(&profile));

        Ok(Self {
            store,
            client,
            profile,
            sync,
        })
    }
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    if let Commands::Init = cli.command {
        let path = paths::config_path();
        Config::init(&path)?;
        println!("Created config at {}", path.display());
        return Ok(());
    }

    let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;
    runtime.block_on(dispatch(cli))
}

async fn dispatch(cli: Cli) -> Result<()> {
    let app = App::init()?;

    match cli.command {
        Commands::Login { email, password } => commands::auth::login(&app, &email, &password).await,
        Commands::Register {
            email,
            full_name,
            password,
        } => commands::auth::register(&app, &email, &full_name, &password).await,
        Commands::Logout => commands::auth::logout(&app),
        Commands::Status => commands::onboarding::status(&app).await,
        Commands::Specialty { command } => match command {
            SpecialtyCommands::List => commands::onboarding::specialty_list(&app).await,
            SpecialtyCommands::Set { id } => commands::onboarding::specialty_set(&app, id).await,
        },
        Commands::Minor { command } => match command {
            MinorCommands::List => commands::onboarding::minor_list(&app).await,
            MinorCommands::Select { id } => commands::onboarding::minor_select(&app, id).await,
        },
        Commands::Progress => commands::progress::show(&app).await,
        Commands::Init => unreachable!("handled before runtime start"),
    }
}
