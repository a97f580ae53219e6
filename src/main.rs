//! `thor-tx`: build, send and track Thor transactions from the command line.
//!
//! Private keys are read from `THOR_PRIVATE_KEY` (origin) and, for local fee
//! delegation, `THOR_DELEGATOR_PRIVATE_KEY`.

use alloy::primitives::{Address, B256, U256};
use clap::{Parser, Subcommand};
use serde_json::json;
use std::path::PathBuf;
use std::time::Duration;

use thor_tx::client::TransactionReceipt;
use thor_tx::config::{load_config, ConfirmationConfig, ThorConfig};
use thor_tx::encoding::decode_hex;
use thor_tx::gas::intrinsic_gas;
use thor_tx::observability::{init_logging, metrics};
use thor_tx::signer::local::{DELEGATOR_KEY_ENV_VAR, PRIVATE_KEY_ENV_VAR};
use thor_tx::{
    Clause, LocalSigner, PendingTx, PollPolicy, RemoteDelegator, Thor, ThorError, Transaction,
    TxSigner,
};

#[derive(Parser)]
#[command(name = "thor-tx")]
#[command(about = "Build, send and track Thor transactions", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the node URL from the configuration.
    #[arg(short, long)]
    node: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the intrinsic gas of a single clause
    IntrinsicGas {
        /// Destination; omit for contract creation
        #[arg(long)]
        to: Option<Address>,
        /// Clause data as hex
        #[arg(long, default_value = "0x")]
        data: String,
    },
    /// Decode a raw transaction
    Decode {
        /// 0x-prefixed encoded transaction
        raw: String,
    },
    /// Show the current best block
    BestBlock,
    /// Build, sign and submit a single-clause transaction
    Send {
        #[arg(long)]
        to: Address,
        /// Amount in wei, decimal or 0x-prefixed hex
        #[arg(long, default_value = "0")]
        value: String,
        /// Clause data as hex
        #[arg(long, default_value = "0x")]
        data: String,
        /// Gas limit; simulated when omitted
        #[arg(long)]
        gas: Option<u64>,
        /// Have a gas payer co-sign the transaction
        #[arg(long)]
        delegate: bool,
        /// Wait for the receipt after submitting
        #[arg(long)]
        wait: bool,
        /// Wall-clock budget in seconds for --wait instead of the block budget
        #[arg(long, requires = "wait")]
        timeout: Option<u64>,
    },
    /// Wait for the receipt of a submitted transaction
    Wait {
        id: B256,
        /// Wall-clock budget in seconds instead of the block budget
        #[arg(long)]
        timeout: Option<u64>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ThorConfig::default(),
    };
    if let Some(node) = cli.node {
        config.node.url = node;
    }

    init_logging(&config.observability.log_level);

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    match cli.command {
        Commands::IntrinsicGas { to, data } => {
            let clause = Clause::new(to).with_data(decode_hex(&data)?);
            println!("{}", intrinsic_gas(&[clause])?);
        }
        Commands::Decode { raw } => {
            let tx = Transaction::from_hex(&raw)?;
            println!("{}", serde_json::to_string_pretty(&describe(&tx))?);
        }
        Commands::BestBlock => {
            let thor = connect(&config).await?;
            let best = thor.blocks().best().await?;
            println!("{}", serde_json::to_string_pretty(&best)?);
        }
        Commands::Send {
            to,
            value,
            data,
            gas,
            delegate,
            wait,
            timeout,
        } => {
            let thor = connect(&config).await?;
            let origin = LocalSigner::from_env(PRIVATE_KEY_ENV_VAR)?;
            let delegator = if delegate {
                Some(delegator(&config)?)
            } else {
                None
            };

            let value: U256 = value
                .parse()
                .map_err(|e| format!("Invalid value '{}': {}", value, e))?;
            let clause = Clause::transfer(to, value).with_data(decode_hex(&data)?);
            let mut transactor = thor.transactor(vec![clause]);
            if let Some(gas) = gas {
                transactor = transactor.gas(gas);
            }

            let pending = transactor.send(&origin, delegator.as_deref()).await?;
            println!("{}", pending.id());

            if wait {
                let receipt = confirm(&pending, &config.confirmation, timeout).await?;
                print_receipt(&receipt)?;
            }
        }
        Commands::Wait { id, timeout } => {
            let thor = connect(&config).await?;
            let receipt = confirm(&thor.pending(id), &config.confirmation, timeout).await?;
            print_receipt(&receipt)?;
        }
    }

    Ok(())
}

async fn connect(config: &ThorConfig) -> Result<Thor, ThorError> {
    Ok(Thor::connect(&config.node)
        .await?
        .with_defaults(&config.transactions))
}

/// Wait for `pending` over the configured block budget, starting at the next
/// block and capped by `wait_timeout_secs`, or for `timeout` seconds when given.
async fn confirm(
    pending: &PendingTx,
    config: &ConfirmationConfig,
    timeout: Option<u64>,
) -> Result<TransactionReceipt, ThorError> {
    match timeout {
        Some(secs) => {
            let policy = PollPolicy::timeout_from_config(config, Duration::from_secs(secs));
            pending.wait_with(&policy).await
        }
        None => pending.wait_from_next_block(PollPolicy::from_config(config)).await,
    }
}

/// Local delegator key if present, otherwise the configured service.
fn delegator(config: &ThorConfig) -> Result<Box<dyn TxSigner>, Box<dyn std::error::Error>> {
    if std::env::var(DELEGATOR_KEY_ENV_VAR).is_ok() {
        return Ok(Box::new(LocalSigner::from_env(DELEGATOR_KEY_ENV_VAR)?));
    }

    let delegation = &config.delegation;
    match (&delegation.url, &delegation.gas_payer) {
        (Some(url), Some(gas_payer)) => {
            let timeout_secs = if delegation.timeout_secs == 0 {
                config.node.timeout_secs
            } else {
                delegation.timeout_secs
            };
            Ok(Box::new(RemoteDelegator::new(
                url,
                gas_payer.parse()?,
                Duration::from_secs(timeout_secs),
            )?))
        }
        _ => Err(format!(
            "--delegate needs {} or a [delegation] section in the configuration",
            DELEGATOR_KEY_ENV_VAR
        )
        .into()),
    }
}

fn describe(tx: &Transaction) -> serde_json::Value {
    let mut value = json!({
        "chainTag": tx.chain_tag(),
        "blockRef": tx.block_ref(),
        "expiration": tx.expiration(),
        "clauses": tx.clauses(),
        "gasPriceCoef": tx.gas_price_coef(),
        "gas": tx.gas(),
        "dependsOn": tx.depends_on(),
        "nonce": tx.nonce(),
        "delegated": tx.is_delegated(),
        "signingHash": tx.signing_hash(),
    });

    if tx.is_signed() {
        value["id"] = json!(tx.id().ok());
        value["origin"] = json!(tx.origin().ok());
        value["delegator"] = json!(tx.delegator().ok().flatten());
    }
    value
}

fn print_receipt(receipt: &TransactionReceipt) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(receipt)?);
    if receipt.reverted {
        eprintln!("Warning: transaction {} reverted", receipt.meta.tx_id);
    }
    Ok(())
}
