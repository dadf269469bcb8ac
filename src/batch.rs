use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;

use crate::{
    chain::{BatchTransactionParams, MoveCallParams, SuiRpcClient},
    config::Config,
    constants::{CONFIG_OBJECT_ID, PACKAGE_ID, STAMP_MODULE},
    error::Error,
    record::SuccessLog,
    signer::SuiSigner,
};

/// Deterministic, order-preserving chunking: batch k holds
/// `[k*size, min((k+1)*size, len))`. Panics if `size` is zero; callers
/// validate the configured size first (see `run_airdrop`).
pub fn create_batches<T>(items: &[T], size: usize) -> Vec<&[T]> {
    assert!(size > 0, "batch size must be positive");
    items.chunks(size).collect()
}

#[derive(Debug, Clone)]
pub struct BatchReceipt {
    pub digest: String,
    pub dry_run: bool,
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub total_batches: usize,
    pub succeeded: usize,
    pub failed: usize,
}

#[derive(Debug, Clone)]
pub struct AirdropOptions {
    pub batch_size: usize,
    pub batch_delay: Duration,
    pub continue_on_failure: bool,
    pub confirm_each_batch: bool,
}

/// One transaction per batch: build, sign, submit, classify. Kept behind a
/// trait so the loop can be driven without a node.
#[async_trait]
pub trait MintSubmitter: Send + Sync {
    async fn submit_batch(&self, batch: &[String], index: usize) -> Result<BatchReceipt, Error>;
}

/// Production submitter: one `mint_to` Move call per address, all sharing
/// the config object and event name, built node-side as a single
/// transaction.
pub struct StampMinter<'a> {
    pub client: &'a SuiRpcClient,
    pub signer: &'a SuiSigner,
    pub config: &'a Config,
}

#[async_trait]
impl MintSubmitter for StampMinter<'_> {
    async fn submit_batch(&self, batch: &[String], _index: usize) -> Result<BatchReceipt, Error> {
        let calls: Vec<BatchTransactionParams> = batch
            .iter()
            .map(|address| {
                BatchTransactionParams::MoveCallRequestParams(MoveCallParams {
                    package_object_id: PACKAGE_ID.to_string(),
                    module: STAMP_MODULE.to_string(),
                    function: "mint_to".to_string(),
                    type_arguments: vec![self.config.collection_type.clone()],
                    arguments: vec![
                        json!(CONFIG_OBJECT_ID),
                        json!(&self.config.event_name),
                        json!(address),
                    ],
                })
            })
            .collect();

        let tx = self
            .client
            .batch_transaction(self.signer.address(), &calls, self.config.gas_budget)
            .await?;

        let response = if self.config.dry_run {
            self.client.dry_run(&tx.tx_bytes).await?
        } else {
            let signature = self.signer.sign_tx_bytes(&tx.tx_bytes)?;
            self.client.execute(&tx.tx_bytes, &signature).await?
        };

        if !response.is_success() {
            return Err(Error::submission(response.failure_reason()));
        }

        Ok(BatchReceipt {
            digest: response.digest.unwrap_or_else(|| "dry-run".to_string()),
            dry_run: self.config.dry_run,
        })
    }
}

/// Drives the whole airdrop: partition, per-batch confirm/submit/classify,
/// success-log append, pacing between batches. Per-batch errors are caught
/// and counted here and never escape the loop; only an empty list or a
/// non-positive batch size aborts before any submission.
pub async fn run_airdrop<S: MintSubmitter + ?Sized>(
    submitter: &S,
    addresses: &[String],
    opts: &AirdropOptions,
    log: &SuccessLog,
    confirm: &mut dyn FnMut(usize, usize) -> bool,
) -> Result<RunSummary, Error> {
    if addresses.is_empty() {
        return Err(Error::configuration("no addresses loaded"));
    }
    if opts.batch_size == 0 {
        return Err(Error::configuration("batch size must be positive"));
    }

    let batches = create_batches(addresses, opts.batch_size);
    let mut summary = RunSummary {
        total_batches: batches.len(),
        ..Default::default()
    };

    tracing::info!(
        "Created {} batches of up to {} addresses",
        batches.len(),
        opts.batch_size
    );

    for (index, batch) in batches.iter().enumerate() {
        if index > 0 {
            tokio::time::sleep(opts.batch_delay).await;
        }

        let batch_no = index + 1;

        if opts.confirm_each_batch && !confirm(batch_no, summary.total_batches) {
            // Clean termination, not a batch failure: remaining batches are skipped.
            tracing::warn!("Batch {batch_no} not submitted: {}", Error::Cancelled);
            break;
        }

        tracing::info!(
            "Processing batch {batch_no}/{} ({} addresses)",
            summary.total_batches,
            batch.len()
        );

        match submitter.submit_batch(batch, index).await {
            Ok(receipt) => {
                summary.succeeded += 1;
                tracing::info!("Batch {batch_no} successful: {}", receipt.digest);

                if !receipt.dry_run {
                    if let Err(e) = log.append(batch_no, batch, &receipt.digest).await {
                        tracing::error!("Failed to record batch {batch_no}: {e}");
                    }
                }
            }
            Err(e) => {
                summary.failed += 1;
                tracing::error!("Batch {batch_no} failed: {e}");

                if !opts.continue_on_failure {
                    tracing::warn!("Aborting remaining batches");
                    break;
                }
            }
        }
    }

    Ok(summary)
}
