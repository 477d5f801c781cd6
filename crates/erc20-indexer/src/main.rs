//! Command-line front end: query ERC-20 balances for one or more addresses.
//!
//! Usage: erc20-indexer [--json] [ADDRESS]...

use std::sync::Arc;

use clap::Parser;
use erc20_indexer::wallet::RpcWallet;
use erc20_indexer::{view, AlchemyProvider, Config, QueryController, QueryState};
use log::warn;

#[derive(Debug, Parser)]
#[command(name = "erc20-indexer", about = "Show every ERC-20 token balance held by an address")]
struct Args {
    /// Print results as JSON instead of rows.
    #[arg(long)]
    json: bool,

    /// Addresses to query, in order.
    addresses: Vec<String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args = Args::parse();
    let config = Config::from_env()?;

    let provider = Arc::new(AlchemyProvider::with_url(config.provider_url.clone()));
    let controller = QueryController::new(provider);

    if let Some(url) = &config.wallet_rpc_url {
        let wallet = RpcWallet::new(url.clone());
        match controller.connect_wallet(&wallet).await {
            Ok(Some(_)) => print_state(&controller.state(), args.json)?,
            Ok(None) => {}
            Err(e) => warn!("wallet connect failed, continuing without it: {e}"),
        }
    }

    for address in &args.addresses {
        controller.query(address).await;
        print_state(&controller.state(), args.json)?;
    }

    println!("\nRecent queries:");
    for address in controller.recent_addresses().await {
        println!("  {address}");
    }

    Ok(())
}

fn print_state(state: &QueryState, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    match state {
        QueryState::Idle => println!("Please make a query!"),
        QueryState::Loading { address } => println!("{address}: loading..."),
        QueryState::Error { address, message } => eprintln!("{address}: {message}"),
        QueryState::Done { address, result } => {
            println!("\nERC-20 token balances of {address}:");
            if json {
                println!("{}", result.to_json()?);
                return Ok(());
            }
            if result.is_empty() {
                println!("  (none)");
            }
            for (line, metadata) in view::render_lines(result).iter().zip(result.metadata()) {
                println!("  {line}");
                if let Some(logo) = &metadata.logo {
                    println!("  {:<10} {logo}", "");
                }
            }
        }
    }
    Ok(())
}
