use std::{
    io::Write,
    path::PathBuf,
    time::Duration,
};

use clap::Parser;
use serde_json::Value;

use admin::{AdminContext, ManagerAction, ManagerUpdate, MintTo, NewCollection, NewEvent};
use batch::{run_airdrop, AirdropOptions, StampMinter};
use chain::SuiRpcClient;
use cli::{Cli, Command};
use config::Config;
use logger::init_default_logger;
use record::SuccessLog;
use signer::SuiSigner;

mod admin;
mod batch;
mod chain;
mod cli;
mod config;
mod constants;
mod error;
mod loader;
mod logger;
mod record;
mod signer;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    let _guard = init_default_logger();

    let cli = Cli::parse();
    let config = Config::read_default().await;

    let client = SuiRpcClient::new(
        &config.rpc_url,
        Duration::from_secs(config.request_timeout_secs),
    )?;

    match cli.command {
        Command::Airdrop { file, dry_run, yes } => {
            let mut config = config;
            if dry_run {
                config.dry_run = true;
            }
            if yes {
                config.confirm_each_batch = false;
            }

            airdrop(&client, &config, file).await?;
        }

        Command::NewCollection { collection_type } => {
            let signer = SuiSigner::from_env()?;
            let ctx = context(&client, &signer, &config);
            let digest = NewCollection { collection_type }.execute(&ctx).await?;
            tracing::info!("Transaction successful: {digest}");
        }

        Command::NewEvent {
            name,
            description,
            image_url,
        } => {
            let signer = SuiSigner::from_env()?;
            let ctx = context(&client, &signer, &config);
            let digest = NewEvent {
                name,
                description,
                image_url,
            }
            .execute(&ctx)
            .await?;
            tracing::info!("Transaction successful: {digest}");
        }

        Command::AddManager { manager } => {
            let signer = SuiSigner::from_env()?;
            let ctx = context(&client, &signer, &config);
            let digest = ManagerUpdate {
                manager,
                action: ManagerAction::Add,
            }
            .execute(&ctx)
            .await?;
            tracing::info!("Transaction successful: {digest}");
        }

        Command::RemoveManager { manager } => {
            let signer = SuiSigner::from_env()?;
            let ctx = context(&client, &signer, &config);
            let digest = ManagerUpdate {
                manager,
                action: ManagerAction::Remove,
            }
            .execute(&ctx)
            .await?;
            tracing::info!("Transaction successful: {digest}");
        }

        Command::MintTo {
            recipient,
            collection_type,
            event,
        } => {
            let signer = SuiSigner::from_env()?;
            let ctx = context(&client, &signer, &config);
            let digest = MintTo {
                collection_type: collection_type.unwrap_or_else(|| config.collection_type.clone()),
                event_name: event.unwrap_or_else(|| config.event_name.clone()),
                recipient,
            }
            .execute(&ctx)
            .await?;
            tracing::info!("Transaction successful: {digest}");
        }

        Command::List => {
            let collections = admin::fetch_collections(&client).await?;
            tracing::info!("Registered collections: {}", collections.len());
            for collection in &collections {
                tracing::info!("  {} ({})", collection.name, collection.id);
            }

            let events = admin::fetch_events(&client).await?;
            tracing::info!("Registered events: {}", events.len());
            for event in &events {
                tracing::info!("  {} ({})", event.name, event.id);
            }
        }

        Command::Stamps {
            owner,
            collection_type,
        } => {
            let collection_type =
                collection_type.unwrap_or_else(|| config.collection_type.clone());
            let stamps = admin::fetch_stamps(&client, &owner, &collection_type).await?;

            tracing::info!("{} stamps owned by {owner}", stamps.len());
            for stamp in &stamps {
                if let Some(id) = stamp.pointer("/data/objectId").and_then(Value::as_str) {
                    tracing::info!("  {id}");
                }
            }
        }
    }

    Ok(())
}

fn context<'a>(
    client: &'a SuiRpcClient,
    signer: &'a SuiSigner,
    config: &'a Config,
) -> AdminContext<'a> {
    AdminContext {
        client,
        signer,
        config,
    }
}

async fn airdrop(
    client: &SuiRpcClient,
    config: &Config,
    file: Option<PathBuf>,
) -> eyre::Result<()> {
    let signer = SuiSigner::from_env()?;
    tracing::info!("Using signer address: {}", signer.address());

    let path = file.unwrap_or_else(|| PathBuf::from(&config.addresses_file));
    let addresses = loader::load_address_list(&path).await?;
    tracing::info!("Total addresses: {}", addresses.len());

    // Sanity check against chain state; non-fatal if the fetch fails.
    match admin::fetch_events(client).await {
        Ok(events) if !events.iter().any(|e| e.name == config.event_name) => {
            tracing::warn!(
                "Event '{}' is not among the {} registered events",
                config.event_name,
                events.len()
            );
        }
        Ok(_) => {}
        Err(e) => tracing::warn!("Failed to fetch registered events: {e}"),
    }

    if config.dry_run {
        tracing::info!("Dry-run mode: batches are simulated, nothing is recorded");
    }

    let minter = StampMinter {
        client,
        signer: &signer,
        config,
    };

    let opts = AirdropOptions {
        batch_size: config.batch_size,
        batch_delay: Duration::from_millis(config.batch_delay_ms),
        continue_on_failure: config.continue_on_failure,
        confirm_each_batch: config.confirm_each_batch,
    };

    let log = SuccessLog::new(&config.success_log);
    let mut confirm = prompt_confirm;

    let summary = run_airdrop(&minter, &addresses, &opts, &log, &mut confirm).await?;

    tracing::info!("=== SUMMARY ===");
    tracing::info!(
        "Batches: {} | Success: {} | Failed: {}",
        summary.total_batches,
        summary.succeeded,
        summary.failed
    );
    if !config.dry_run && summary.succeeded > 0 {
        tracing::info!("Records saved to {}", config.success_log);
    }

    Ok(())
}

fn prompt_confirm(batch_no: usize, total: usize) -> bool {
    print!("Batch {batch_no}/{total}: press y to sign and submit [y/N] ");
    let _ = std::io::stdout().flush();

    let mut line = String::new();
    if std::io::stdin().read_line(&mut line).is_err() {
        return false;
    }

    matches!(line.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
