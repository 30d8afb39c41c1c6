mod api;
mod config;
mod router;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use soulforge_agent::{ChatAgent, ContextWindow, PromptBuilder, SessionStore};
use soulforge_commands::build_default_dispatcher;
use soulforge_config::{config_file_path, load_and_prepare, process_env, LlmSettings, RuntimeConfig, SoulForgeConfig};
use soulforge_core::KvStore;
use soulforge_logging::init_logger;
use soulforge_providers::OpenAiCompatClient;
use soulforge_storage::{FileSessionBackend, SqliteKvStore};

use api::AppState;
use config::ServeConfig;
use router::{InboundTurn, TurnRouter};

#[derive(Parser)]
#[command(name = "soulforge")]
#[command(about = "SoulForge: persona chat agent with long-term memory")]
#[command(version)]
struct Cli {
    /// Data directory holding `config/agent/config.yaml`
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Port to bind the HTTP server to
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Chat over stdin, one message per line
    Chat {
        /// Identity whose conversation to continue
        #[arg(long)]
        identity: String,
        /// Treat the local user as a super administrator
        #[arg(long)]
        admin: bool,
    },
    /// Query a running server's health endpoint
    Status {
        #[arg(short, long)]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let serve_config = ServeConfig::from_env();

    if let Commands::Status { port } = cli.command {
        let port = port.unwrap_or(serve_config.port);
        return print_status(&serve_config.bind_address, port).await;
    }

    let data_dir = cli.data_dir.clone().unwrap_or_else(soulforge_config::data_dir);
    let config = load_and_prepare(&config_file_path(&data_dir), &process_env()).await?;
    init_logger(config.log_dir().as_deref(), config.log_level());

    let router = build_turn_router(&config).await?;

    match cli.command {
        Commands::Serve { port } => {
            let serve_config = ServeConfig {
                port: port.unwrap_or(serve_config.port),
                ..serve_config
            };
            run_server(serve_config, router).await?;
        }
        Commands::Chat { identity, admin } => run_chat(router, identity, admin).await?,
        Commands::Status { .. } => {}
    }

    Ok(())
}

/// Wire storage, settings, completion client, agent and commands together.
async fn build_turn_router(config: &SoulForgeConfig) -> Result<TurnRouter> {
    let kv_path = config.kv_path();
    let store: Option<Arc<dyn KvStore>> = match SqliteKvStore::open(&kv_path) {
        Ok(store) => Some(Arc::new(store)),
        Err(e) => {
            warn!(path = %kv_path.display(), error = %e, "KV store unavailable, LLM changes will not persist");
            None
        }
    };

    let settings = Arc::new(RuntimeConfig::new(LlmSettings::default(), config.llm.as_ref(), store));
    info!(settings = ?settings.get().await, "LLM settings resolved");

    let client = Arc::new(OpenAiCompatClient::new(Arc::clone(&settings))?);
    let sessions = Arc::new(SessionStore::new(Arc::new(FileSessionBackend::new(
        config.session_dir(),
    ))));
    let system_prompt = PromptBuilder::load(&config.persona_path()).await;
    let window = ContextWindow::new(config.max_context_turns());
    info!(
        max_turns = window.max_turns(),
        sessions = %config.session_dir().display(),
        "Chat agent ready"
    );

    let agent = Arc::new(ChatAgent::new(sessions, client, window, system_prompt));
    let commands = Arc::new(build_default_dispatcher(settings));
    Ok(TurnRouter::new(agent, commands))
}

async fn run_server(config: ServeConfig, router: TurnRouter) -> Result<()> {
    let app = api::build_router(Arc::new(AppState { router })).layer(CorsLayer::permissive());
    let addr = format!("{}:{}", config.bind_address, config.port);

    info!(addr = %addr, "HTTP API listening");

    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn run_chat(router: TurnRouter, identity: String, admin: bool) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let turn = InboundTurn {
            sender_id: identity.clone(),
            text: line,
            is_super_admin: admin,
        };
        if let Some(reply) = router.route(&turn).await {
            println!("{reply}");
        }
    }
    Ok(())
}

async fn print_status(bind_address: &str, port: u16) -> Result<()> {
    let host = if bind_address == "0.0.0.0" { "127.0.0.1" } else { bind_address };
    match reqwest::get(format!("http://{host}:{port}/api/health")).await {
        Ok(resp) => {
            let body: serde_json::Value = resp.json().await?;
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
        Err(_) => println!("SoulForge is not running on port {port}"),
    }
    Ok(())
}
