//! Creates an asset on a ledger node, transfers it, and reads both back.
//!
//! Configuration comes from the environment:
//!
//! ```text
//! TESSERA_BASE_URL=https://test.ipdb.io \
//! TESSERA_APP_ID=... TESSERA_APP_KEY=... \
//!   cargo run --example submit
//! ```
//!
//! Set `RUST_LOG=tessera_driver=debug` to watch the driver work, and
//! `LOG_FORMAT=json` for machine-readable logs.

use anyhow::{Context, Result};
use serde::Serialize;

use tessera_driver::api::SubmitOutcome;
use tessera_driver::config::ClientConfig;
use tessera_driver::crypto::Keypair;
use tessera_driver::logging::{init_logging, LogFormat};
use tessera_driver::transaction::{verify_transaction, Operation, OutputRef, TransactionBuilder};
use tessera_driver::TransactionsApi;

#[derive(Serialize)]
struct Bicycle {
    serial_number: String,
    manufacturer: String,
    #[serde(skip)]
    _local_notes: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let format = LogFormat::from_str_lossy(&std::env::var("LOG_FORMAT").unwrap_or_default());
    init_logging("info", format);

    let config = ClientConfig::from_env().context("reading TESSERA_* configuration")?;
    let api = TransactionsApi::new(&config)?;

    let alice = Keypair::generate();
    let bob = Keypair::generate();
    println!("alice: {}", alice.public_key());
    println!("bob:   {}", bob.public_key());

    // CREATE, awaiting the verdict.
    let bicycle = Bicycle {
        serial_number: "abcd1234".into(),
        manufacturer: "bkfab".into(),
        _local_notes: "not for the ledger".into(),
    };
    let create = TransactionBuilder::create()
        .add_assets(&bicycle)?
        .add_metadata("planet", "earth")?
        .build_and_sign(&alice)?;
    let create = api.submit(&create).await.context("submitting CREATE")?;
    let asset_id = create.id().context("signed transaction has an id")?.to_owned();
    println!("created asset {}", asset_id);

    // TRANSFER to bob, delivered on a channel.
    let transfer = TransactionBuilder::transfer(asset_id.clone())
        .spend(OutputRef::new(asset_id.clone(), 0))?
        .add_output(1, &bob.public_key())?
        .build_and_sign(&alice)?;
    match api.submit_detached(transfer)?.await? {
        SubmitOutcome::Accepted(_) => println!("transferred to bob"),
        SubmitOutcome::Malformed(info) => anyhow::bail!("transfer rejected: {}", info),
        SubmitOutcome::OtherError(info) => anyhow::bail!("transfer failed: {}", info),
    }

    // Read everything back and check it locally.
    for operation in [Operation::Create, Operation::Transfer] {
        let found = api.get_transactions_by_asset_id(&asset_id, operation).await?;
        for tx in &found {
            verify_transaction(tx)?;
            println!("{} {}", operation, tx.id().unwrap_or_default());
        }
    }

    Ok(())
}
