mod auth;
mod dashboard;
mod groupings;
mod media;
mod new_arrivals;
mod orders;
mod prompt;

use chrono::NaiveDate;
use clap::{CommandFactory, Parser, Subcommand};
use kaushalya_client::{ApiClient, MutationOutcome, SessionStore};
use kaushalya_core::{AppConfig, Money};
use tracing_subscriber::EnvFilter;

use crate::groupings::GroupingCommands;
use crate::media::MediaCommands;
use crate::new_arrivals::NewArrivalsCommands;
use crate::orders::{CustomersCommands, OrdersCommands};

#[derive(Debug, Parser)]
#[command(name = "kaushalya")]
#[command(about = "Kaushalya Art storefront admin console")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Sign in as the configured admin account
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Remove the saved session
    Logout,
    /// Show dashboard totals and top states
    Stats,
    /// Browse, export and invoice orders
    Orders {
        #[command(subcommand)]
        command: OrdersCommands,
    },
    /// Browse and export registered customers
    Customers {
        #[command(subcommand)]
        command: CustomersCommands,
    },
    /// Manage catalog categories and their products
    Catalog {
        #[command(subcommand)]
        command: GroupingCommands,
    },
    /// Manage accessory groupings and their products
    Accessory {
        #[command(subcommand)]
        command: GroupingCommands,
    },
    /// Manage best-seller groupings and their products
    Bestseller {
        #[command(subcommand)]
        command: GroupingCommands,
    },
    /// Manage new-arrival entries
    NewArrivals {
        #[command(subcommand)]
        command: NewArrivalsCommands,
    },
    /// Show or replace the storefront banner media
    Media {
        #[command(subcommand)]
        command: MediaCommands,
    },
    /// Compute the discount label for a price pair
    Discount {
        /// Original price
        #[arg(long)]
        real: Money,
        /// Selling price
        #[arg(long)]
        discount: Money,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = kaushalya_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    let store = SessionStore::new(&config.session_path);
    match command {
        Commands::Login { email, password } => auth::run_login(&config, &store, &email, &password),
        Commands::Logout => auth::run_logout(&store),
        Commands::Discount { real, discount } => {
            groupings::run_discount(real, discount);
            Ok(())
        }
        Commands::Stats => dashboard::run_stats(api_client(&config, &store)?).await,
        Commands::Orders { command } => {
            orders::run_orders(api_client(&config, &store)?, &config.export_dir, command).await
        }
        Commands::Customers { command } => {
            orders::run_customers(api_client(&config, &store)?, &config.export_dir, command).await
        }
        Commands::Catalog { command } => {
            groupings::run_grouping::<kaushalya_client::Catalog>(api_client(&config, &store)?, command)
                .await
        }
        Commands::Accessory { command } => {
            groupings::run_grouping::<kaushalya_client::Accessory>(
                api_client(&config, &store)?,
                command,
            )
            .await
        }
        Commands::Bestseller { command } => {
            groupings::run_grouping::<kaushalya_client::BestSeller>(
                api_client(&config, &store)?,
                command,
            )
            .await
        }
        Commands::NewArrivals { command } => {
            new_arrivals::run_new_arrivals(api_client(&config, &store)?, command).await
        }
        Commands::Media { command } => media::run_media(api_client(&config, &store)?, command).await,
    }
}

/// Client for commands that talk to the backend. Requires a saved session.
fn api_client(config: &AppConfig, store: &SessionStore) -> anyhow::Result<ApiClient> {
    let session = store.require()?;
    Ok(ApiClient::from_config(config, Some(&session))?)
}

/// Format an optional date for display, with a dash for `None`.
fn fmt_date(date: Option<NaiveDate>) -> String {
    date.map_or_else(
        || "\u{2014}".to_string(),
        |d| d.format("%Y-%m-%d").to_string(),
    )
}

/// Truncate `text` to `max` characters, marking the cut with `...`.
fn clip(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        format!("{}...", text.chars().take(max).collect::<String>())
    } else {
        text.to_owned()
    }
}

fn report_outcome(outcome: &MutationOutcome, fallback: &str) {
    println!("{}", outcome.message.as_deref().unwrap_or(fallback));
    if !outcome.refreshed {
        tracing::warn!("saved, but the list could not be reloaded");
    }
}
