//! Chainlist server binary.
//!
//! # Usage
//!
//! ```bash
//! # Serve on the port the visualizer expects, seeded with 1, 2, 3
//! chainlist-server
//!
//! # Custom address and seed values
//! chainlist-server --bind 127.0.0.1:8080 --initial 10,20,30
//!
//! # Start empty, only allow one origin
//! chainlist-server --empty --allow-origin http://localhost:3000
//! ```

use chainlist_server::{Server, ServerRuntimeConfig};
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Chainlist server
#[derive(Parser, Debug)]
#[command(name = "chainlist-server")]
#[command(about = "Linked list API server for the chainlist visualizer")]
#[command(version)]
struct Args {
    /// Address to bind to
    #[arg(short, long, default_value = "0.0.0.0:5000")]
    bind: String,

    /// Values appended to the list at startup (comma separated)
    #[arg(long, value_delimiter = ',', allow_negative_numbers = true, default_values_t = [1, 2, 3])]
    initial: Vec<i64>,

    /// Start with an empty list
    #[arg(long, conflicts_with = "initial")]
    empty: bool,

    /// Largest accepted request body in bytes
    #[arg(long, default_value = "65536")]
    max_body_bytes: usize,

    /// Value of Access-Control-Allow-Origin
    #[arg(long, default_value = "*")]
    allow_origin: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::registry().with(fmt::layer()).with(filter).init();

    tracing::info!("Chainlist server starting");
    tracing::info!("Binding to {}", args.bind);

    let config = ServerRuntimeConfig {
        bind_address: args.bind,
        initial_values: if args.empty { Vec::new() } else { args.initial },
        max_body_bytes: args.max_body_bytes,
        allow_origin: args.allow_origin,
    };

    if config.allow_origin == "*" {
        tracing::warn!("CORS allows any origin");
    }

    let server = Server::bind(config).await?;

    tracing::info!("Server listening on {}", server.local_addr()?);

    server
        .run_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to listen for shutdown signal: {}", e);
                std::future::pending::<()>().await;
            }
        })
        .await?;

    Ok(())
}
