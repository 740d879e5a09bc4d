//! P2P Exchange CLI
//!
//! Command-line interface for the exchange API, plus an offline quote
//! calculator over the built-in reference rates.

use anyhow::Result;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;

use exchange_rates::StaticRates;
use p2p_client::ExchangeClient;
use p2p_types::{ConversionQuote, CurrencyCode, RateProvider, SignupRequest};

#[derive(Parser)]
#[command(name = "p2p")]
#[command(author, version, about = "P2P currency exchange CLI client", long_about = None)]
struct Cli {
    /// Base URL of the exchange API
    #[arg(long, env = "P2P_API_URL", default_value = "http://localhost:3000")]
    api_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Wallet operations
    Wallet {
        #[command(subcommand)]
        action: WalletCommands,
    },
    /// Show the latest rate table for a base currency
    Rates {
        /// Base currency code
        base: CurrencyCode,
    },
    /// Quote a conversion including the 0.2% service fee
    Quote {
        /// Amount in the source currency
        amount: Decimal,
        /// Source currency code
        #[arg(long)]
        from: CurrencyCode,
        /// Target currency code
        #[arg(long)]
        to: CurrencyCode,
        /// Use the built-in reference rates instead of calling the API
        #[arg(long)]
        offline: bool,
    },
    /// Register a new user
    Signup {
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long)]
        email: String,
        /// Password (min. 8 characters)
        #[arg(long, env = "P2P_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Check API health
    Health,
}

#[derive(Subcommand)]
enum WalletCommands {
    /// List all wallet balances
    Balances,
    /// Credit a wallet, creating it on first use
    Credit {
        /// Currency code (case-insensitive)
        currency: CurrencyCode,
        /// Amount to add
        amount: Decimal,
    },
    /// Check whether a wallet exists
    Verify {
        /// Currency code (case-insensitive)
        currency: CurrencyCode,
    },
}

/// Quotes against the built-in reference table, without a server.
async fn offline_quote(
    from: CurrencyCode,
    to: CurrencyCode,
    amount: Decimal,
) -> Result<ConversionQuote> {
    let rate = StaticRates::builtin().rate(&from, &to).await?;
    Ok(ConversionQuote::new(from, to, amount, rate)?)
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let client = ExchangeClient::new(&cli.api_url);

    match cli.command {
        Commands::Health => {
            let health = client.health().await?;
            if health.database == "up" {
                println!("✓ API is healthy (database up)");
            } else {
                println!("✗ API is up but the database is {}", health.database);
                std::process::exit(1);
            }
        }

        Commands::Wallet { action } => match action {
            WalletCommands::Balances => {
                let wallets = client.balances().await?;
                println!("{}", serde_json::to_string_pretty(&wallets)?);
            }
            WalletCommands::Credit { currency, amount } => {
                let wallet = client.credit(currency, amount).await?;
                println!("{}", serde_json::to_string_pretty(&wallet)?);
            }
            WalletCommands::Verify { currency } => {
                let lookup = client.verify_wallet(&currency).await?;
                println!("{}", serde_json::to_string_pretty(&lookup)?);
            }
        },

        Commands::Rates { base } => {
            let rates = client.rates(&base).await?;
            println!("{}", serde_json::to_string_pretty(&rates)?);
        }

        Commands::Quote {
            amount,
            from,
            to,
            offline,
        } => {
            let quote = if offline {
                offline_quote(from, to, amount).await?
            } else {
                client.quote(from, to, amount).await?
            };
            println!("{}", serde_json::to_string_pretty(&quote)?);
        }

        Commands::Signup {
            first_name,
            last_name,
            email,
            password,
        } => {
            let req = SignupRequest {
                first_name,
                last_name,
                email,
                password,
            };
            let created = client.signup(&req).await?;
            println!("✓ {} ({})", created.message, created.user_id);
        }
    }

    Ok(())
}
