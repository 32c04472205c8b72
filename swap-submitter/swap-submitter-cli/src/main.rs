//! Entrypoint for the swap submitter
#![deny(missing_docs)]
#![deny(clippy::missing_docs_in_private_items)]
#![deny(unsafe_code)]

use std::{error::Error, process::ExitCode, sync::Arc};

use clap::Parser;
use swap_submitter::{
    analytics::TelemetrySink,
    cli::Cli,
    clock::SystemClock,
    ledger::StandbyLedger,
    telemetry::setup_logging,
    tokens::TokenBalanceCache,
    transaction_client::RpcTransactionSender,
    workflow::SwapSubmitter,
};
use tracing::{info, warn};

/// Submit a single quoted swap and print its report
#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn Error>> {
    let cli = Cli::parse();
    cli.validate()?;
    setup_logging(cli.json_logs);

    // Load the inputs
    let swap = cli.read_swap().await?;
    let tokens = TokenBalanceCache::from_file(&cli.token_balances_path).await?;
    if tokens.is_empty() {
        warn!("token balance cache at {} is empty", cli.token_balances_path);
    }

    // Build the submitter
    let sender = RpcTransactionSender::new(
        &cli.rpc_url,
        cli.get_signer()?,
        cli.confirmations,
        cli.get_receipt_timeout(),
    )?;
    let submitter = SwapSubmitter::new(
        Arc::new(sender),
        Arc::new(tokens),
        Arc::new(TelemetrySink),
        Arc::new(SystemClock),
        cli.submitter_config()?,
    );

    let report = submitter.submit(&swap).await;

    println!("{}", serde_json::to_string_pretty(&report)?);

    // Reconcile the ledger with the submission
    let ledger = StandbyLedger::new();
    if ledger.reconcile(&report.ledger_updates) {
        info!(
            "ledger holds {} pending, {} confirmed",
            ledger.pending().len(),
            ledger.confirmed().len()
        );
    }

    if report.outcome.is_confirmed() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}
