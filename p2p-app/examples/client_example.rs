//! Client example demonstrating the wallet, quote and signup flows against a running server.
//!
//! Run with: cargo run -p p2p-app --example client_example --no-default-features --features sqlite

use std::net::SocketAddr;
use std::sync::Arc;

use exchange_rates::StaticRates;
use p2p_client::ExchangeClient;
use p2p_hex::{ExchangeService, inbound::HttpServer};
use p2p_repo::{PoolSettings, build_repo};
use p2p_types::{CurrencyCode, SignupRequest};
use rust_decimal_macros::dec;
use tempfile::tempdir;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt().with_env_filter("info").init();

    // Use a temp file-backed SQLite DB
    let tmp = tempdir()?;
    let db_path = tmp.path().join("exchange.db");
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());

    // Bind first so the client can connect as soon as the server task runs
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr: SocketAddr = listener.local_addr()?;

    println!("🚀 Starting server on {addr}...");
    println!("   Database: {db_url}");

    let repo = build_repo(&db_url, &PoolSettings::default()).await?;
    let service = ExchangeService::new(repo, Arc::new(StaticRates::builtin()));
    let router = HttpServer::new(service).router();

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, router.into_make_service()).await {
            eprintln!("server error: {e}");
        }
    });

    let client = ExchangeClient::new(format!("http://{addr}"));
    let usd = CurrencyCode::parse("usd")?;
    let eur = CurrencyCode::parse("EUR")?;

    // ─────────────────────────────────────────────────────────────────────────
    // Demo: quote, fund, verify, sign up
    // ─────────────────────────────────────────────────────────────────────────

    let health = client.health().await?;
    println!("✅ Server {} (database {})", health.status, health.database);

    let quote = client.quote(usd.clone(), eur.clone(), dec!(100)).await?;
    println!(
        "✅ Quote: 100 {} → {} {} (rate {}, fee {}, total {})",
        quote.from_currency,
        quote.conversion.base_amount,
        quote.to_currency,
        quote.rate,
        quote.conversion.fee,
        quote.conversion.total
    );

    let wallet = client.credit(usd.clone(), dec!(50)).await?;
    println!("✅ Funded {} wallet: {}", wallet.currency, wallet.balance);

    let wallet = client.credit(usd.clone(), dec!(25)).await?;
    println!("✅ Funded {} wallet: {}", wallet.currency, wallet.balance);

    let lookup = client.verify_wallet(&eur).await?;
    println!("✅ EUR wallet exists: {} ({})", lookup.exists, lookup.message);

    let signup = SignupRequest {
        first_name: "Ada".into(),
        last_name: "Lovelace".into(),
        email: "ada@example.com".into(),
        password: "correct horse".into(),
    };
    let created = client.signup(&signup).await?;
    println!("✅ {} (id={})", created.message, created.user_id);

    match client.signup(&signup).await {
        Err(e) => println!("✅ Duplicate signup rejected: {e}"),
        Ok(_) => println!("❌ Duplicate signup was accepted"),
    }

    println!("\n📋 All wallets:");
    for wallet in client.balances().await? {
        println!("   - {}: {}", wallet.currency, wallet.balance);
    }

    println!("\n🎉 Example completed successfully!");

    Ok(())
}
