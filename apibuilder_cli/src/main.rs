mod commands;
mod output;

use std::sync::Arc;

use anyhow::Result;
use apibuilder::transport::TokenStore;
use apibuilder::{ApiEndpoint, Endpoint, Requester, RequesterConfig, Server};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "apibuilder")]
#[command(about = "Preview or send requests through a declarative endpoint tree")]
struct Cli {
    /// Base URL every path is resolved against
    #[arg(long, env = "APIBUILDER_BASE_URL", global = true)]
    base_url: Option<String>,

    /// Token for protected requests
    #[arg(long, env = "APIBUILDER_TOKEN", global = true, hide_env_values = true)]
    token: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the URL and request data without sending
    Preview(commands::preview::PreviewArgs),
    /// Send the request and print the reply
    Call(commands::call::CallArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("apibuilder=info".parse()?),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let base_url = cli
        .base_url
        .ok_or_else(|| anyhow::anyhow!("--base-url or APIBUILDER_BASE_URL is required"))?;
    let tokens = match cli.token {
        Some(token) => TokenStore::new(token),
        None => TokenStore::empty(),
    };
    let requester = Requester::new(&RequesterConfig::from_env(), Arc::new(tokens))?;
    let root = Endpoint::with_server(Arc::new(Server::new(base_url)), None);
    let api = ApiEndpoint::with_requester(root, Arc::new(requester));

    match &cli.command {
        Commands::Preview(args) => commands::preview::run(args, &api).await?,
        Commands::Call(args) => commands::call::run(args, &api).await?,
    }

    Ok(())
}
