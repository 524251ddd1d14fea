//! RocketShoes CLI - Drive the cart from a terminal.
//!
//! # Usage
//!
//! ```bash
//! # Show the cart
//! rocketshoes show
//!
//! # Print the stored JSON snapshot
//! rocketshoes show --json
//!
//! # Add one unit of product 1
//! rocketshoes add 1
//!
//! # Set product 1 to 3 units
//! rocketshoes update 1 3
//!
//! # Remove product 1
//! rocketshoes remove 1
//! ```
//!
//! Configuration comes from the environment (see `rocketshoes_cart::config`).
//! Failed operations are shown as toasts on stderr and exit with status 1.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use rocketshoes_cart::{CartConfig, CartManager, FileStore, KeyValueStore, TracingNotifier};
use rocketshoes_core::ProductId;
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "rocketshoes")]
#[command(author, version, about = "RocketShoes cart tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the cart
    Show {
        /// Print the persisted JSON snapshot instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Add one unit of a product
    Add {
        /// Product id
        product_id: ProductId,
    },
    /// Remove a product from the cart
    Remove {
        /// Product id
        product_id: ProductId,
    },
    /// Set the amount of a product already in the cart
    Update {
        /// Product id
        product_id: ProductId,

        /// New amount (zero or less is ignored)
        #[arg(allow_negative_numbers = true)]
        amount: i64,
    },
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &CartConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

fn init_tracing() {
    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "rocketshoes=info,rocketshoes_cart=info,rocketshoes_cli=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match CartConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            init_tracing();
            tracing::error!("Invalid configuration: {e}");
            std::process::exit(2);
        }
    };

    // Sentry must be initialized before the tracing subscriber
    let _sentry_guard = init_sentry(&config);
    init_tracing();

    if let Err(e) = run(cli, &config).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: &CartConfig) -> Result<(), Box<dyn std::error::Error>> {
    let cart = CartManager::from_config(config, TracingNotifier).await?;
    tracing::debug!(
        api = %config.api.base_url,
        store = %config.storage_dir.display(),
        key = %cart.storage_key(),
        "Cart loaded"
    );

    match cli.command {
        Commands::Show { json: true } => {
            let raw = FileStore::new(&config.storage_dir)
                .get(&config.storage_key)
                .await?;
            commands::cart::show_snapshot(raw.as_deref());
        }
        Commands::Show { json: false } => commands::cart::show(&cart.cart()),
        Commands::Add { product_id } => {
            cart.add_product(product_id).await?;
            commands::cart::show(&cart.cart());
        }
        Commands::Remove { product_id } => {
            cart.remove_product(product_id).await?;
            commands::cart::show(&cart.cart());
        }
        Commands::Update { product_id, amount } => {
            cart.update_product_amount(product_id, amount).await?;
            commands::cart::show(&cart.cart());
        }
    }
    Ok(())
}
