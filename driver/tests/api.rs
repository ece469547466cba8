//! Integration tests for the submission and query client against an
//! in-process mock ledger.

mod common;

use std::time::Duration;

use axum::http::StatusCode;

use common::{unreachable_base_url, LedgerState, MockLedger};
use tessera_driver::api::{ClientError, SubmitError, SubmitOutcome, TransportError};
use tessera_driver::config::{ClientConfig, SubmitMode};
use tessera_driver::crypto::Keypair;
use tessera_driver::transaction::{Operation, OutputRef, Transaction, TransactionBuilder};
use tessera_driver::TransactionsApi;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn signed_create(keypair: &Keypair) -> Transaction {
    TransactionBuilder::create()
        .add_asset("firstname", "John")
        .unwrap()
        .add_asset("lastname", "Smith")
        .unwrap()
        .add_metadata("what", "My first transaction")
        .unwrap()
        .build_and_sign(keypair)
        .unwrap()
}

fn unsigned_create(keypair: &Keypair) -> Transaction {
    TransactionBuilder::create()
        .add_asset("firstname", "John")
        .unwrap()
        .build_unsigned(&keypair.public_key())
        .unwrap()
}

// ---------------------------------------------------------------------------
// Submission
// ---------------------------------------------------------------------------

#[tokio::test]
async fn signed_transaction_is_accepted() {
    let ledger = MockLedger::start().await;
    let api = ledger.client();
    let tx = signed_create(&Keypair::generate());

    let accepted = api.submit(&tx).await.unwrap();
    assert_eq!(accepted, tx);
    assert_eq!(ledger.stored(), vec![tx]);
}

#[tokio::test]
async fn unsigned_transaction_is_malformed() {
    let ledger = MockLedger::start().await;
    let api = ledger.client();

    let outcome = api.send(&unsigned_create(&Keypair::generate())).await.unwrap();
    match outcome {
        SubmitOutcome::Malformed(info) => {
            assert_eq!(info.status, Some(400));
            assert!(info.body.contains("unsigned"));
        }
        other => panic!("expected Malformed, got {:?}", other),
    }
    assert!(ledger.stored().is_empty());
}

#[tokio::test]
async fn unsigned_submit_returns_malformed_error() {
    let ledger = MockLedger::start().await;
    let api = ledger.client();

    let err = api.submit(&unsigned_create(&Keypair::generate())).await.unwrap_err();
    assert!(matches!(err, SubmitError::Malformed(_)));
    assert_eq!(err.response().unwrap().status, Some(400));
}

#[tokio::test]
async fn missing_credentials_is_other_error() {
    let ledger = MockLedger::start().await;
    let config = ClientConfig::builder()
        .base_url(ledger.base_url())
        .build()
        .unwrap();
    let api = TransactionsApi::new(&config).unwrap();

    let outcome = api.send(&signed_create(&Keypair::generate())).await.unwrap();
    assert!(matches!(
        outcome,
        SubmitOutcome::OtherError(ref info) if info.status == Some(401)
    ));
}

#[tokio::test]
async fn server_error_is_other_error() {
    let ledger = MockLedger::start_with(LedgerState {
        forced_status: Some(StatusCode::INTERNAL_SERVER_ERROR),
        ..Default::default()
    })
    .await;

    let err = ledger
        .client()
        .submit(&signed_create(&Keypair::generate()))
        .await
        .unwrap_err();
    assert!(matches!(err, SubmitError::Other(ref info) if info.status == Some(500)));
}

#[tokio::test]
async fn unreachable_ledger_is_other_error() {
    let config = ClientConfig::builder()
        .base_url(unreachable_base_url().await)
        .timeout(Duration::from_secs(2))
        .build()
        .unwrap();
    let api = TransactionsApi::new(&config).unwrap();

    let outcome = api.send(&signed_create(&Keypair::generate())).await.unwrap();
    match outcome {
        SubmitOutcome::OtherError(info) => {
            assert_eq!(info.status, None);
            assert!(!info.message.is_empty());
        }
        other => panic!("expected OtherError, got {:?}", other),
    }
}

#[tokio::test]
async fn submit_mode_is_sent_as_query_parameter() {
    let ledger = MockLedger::start().await;
    let config = ClientConfig::builder()
        .base_url(ledger.base_url())
        .add_token("app_id", common::APP_ID)
        .submit_mode(SubmitMode::Async)
        .build()
        .unwrap();
    let api = TransactionsApi::new(&config).unwrap();

    api.submit(&signed_create(&Keypair::generate())).await.unwrap();
    ledger.client().submit(&signed_create(&Keypair::generate())).await.unwrap();

    assert_eq!(*ledger.state.modes.lock(), vec!["async", "commit"]);
}

#[tokio::test]
async fn detached_submission_delivers_one_outcome() {
    let ledger = MockLedger::start().await;
    let api = ledger.client();

    let accepted = api.submit_detached(signed_create(&Keypair::generate())).unwrap();
    let rejected = api.submit_detached(unsigned_create(&Keypair::generate())).unwrap();

    assert!(accepted.await.unwrap().is_accepted());
    assert!(matches!(rejected.await.unwrap(), SubmitOutcome::Malformed(_)));
}

#[tokio::test]
async fn callback_submission_invokes_callback_once() {
    let ledger = MockLedger::start().await;
    let api = ledger.client();
    let (sender, mut receiver) = tokio::sync::mpsc::unbounded_channel();

    let handle = api
        .submit_with(signed_create(&Keypair::generate()), move |outcome| {
            sender.send(outcome).unwrap();
        })
        .unwrap();
    handle.await.unwrap();

    assert!(receiver.recv().await.unwrap().is_accepted());
    // The sender moved into the callback is gone once it ran.
    assert!(receiver.recv().await.is_none());
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

#[tokio::test]
async fn query_without_matches_is_empty() {
    let ledger = MockLedger::start().await;
    let found = ledger
        .client()
        .get_transactions_by_asset_id(&"0".repeat(64), Operation::Create)
        .await
        .unwrap();
    assert!(found.is_empty());
}

#[tokio::test]
async fn query_returns_submitted_transactions() {
    let ledger = MockLedger::start().await;
    let api = ledger.client();
    let owner = Keypair::generate();
    let recipient = Keypair::generate();

    let create = api.submit(&signed_create(&owner)).await.unwrap();
    let asset_id = create.id().unwrap().to_owned();
    let transfer = TransactionBuilder::transfer(asset_id.clone())
        .spend(OutputRef::new(asset_id.clone(), 0))
        .unwrap()
        .add_output(1, &recipient.public_key())
        .unwrap()
        .build_and_sign(&owner)
        .unwrap();
    api.submit(&transfer).await.unwrap();

    let creates = api
        .get_transactions_by_asset_id(&asset_id, Operation::Create)
        .await
        .unwrap();
    assert_eq!(creates, vec![create.clone()]);

    let transfers = api
        .get_transactions_by_asset_id(&asset_id, Operation::Transfer)
        .await
        .unwrap();
    assert_eq!(transfers, vec![transfer]);
    tessera_driver::transaction::verify_transaction(&transfers[0]).unwrap();
}

#[tokio::test]
async fn get_transaction_by_id() {
    let ledger = MockLedger::start().await;
    let api = ledger.client();
    let tx = api.submit(&signed_create(&Keypair::generate())).await.unwrap();

    let found = api.get_transaction(tx.id().unwrap()).await.unwrap();
    assert_eq!(found, Some(tx));

    let missing = api.get_transaction(&"f".repeat(64)).await.unwrap();
    assert!(missing.is_none());
}

#[tokio::test]
async fn query_http_error_is_transport_error() {
    let ledger = MockLedger::start_with(LedgerState {
        forced_status: Some(StatusCode::SERVICE_UNAVAILABLE),
        ..Default::default()
    })
    .await;

    let err = ledger
        .client()
        .get_transactions_by_asset_id("abc", Operation::Create)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ClientError::Transport(TransportError::Status { status: 503, .. })
    ));
}

#[tokio::test]
async fn query_against_wrong_prefix_is_transport_error() {
    let ledger = MockLedger::start().await;
    // No such route on the mock, so axum answers 404.
    let config = ClientConfig::builder()
        .base_url(format!("{}/missing-prefix", ledger.base_url()))
        .build()
        .unwrap();
    let api = TransactionsApi::new(&config).unwrap();

    let err = api
        .get_transactions_by_asset_id("abc", Operation::Create)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ClientError::Transport(TransportError::Status { status: 404, .. })
    ));
}

#[tokio::test]
async fn get_transaction_with_path_characters_in_id() {
    let ledger = MockLedger::start().await;
    let api = ledger.client();
    api.submit(&signed_create(&Keypair::generate())).await.unwrap();

    // Escaped into one segment, so it reaches the by-id route and misses.
    let found = api.get_transaction("../transactions?asset_id=x").await.unwrap();
    assert!(found.is_none());
}

#[tokio::test]
async fn query_against_unreachable_ledger_fails() {
    let config = ClientConfig::builder()
        .base_url(unreachable_base_url().await)
        .build()
        .unwrap();
    let api = TransactionsApi::new(&config).unwrap();

    let err = api
        .get_transactions_by_asset_id("abc", Operation::Create)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ClientError::Transport(TransportError::Request(_))
    ));
}
