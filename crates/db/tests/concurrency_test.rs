//! Races between calls on separate pooled connections.
//!
//! These run on a file-backed database with several connections and a
//! multi-threaded runtime, so the store's locking decides the outcome rather
//! than a single queued connection. A call that loses a race either sees the
//! winner's write (`NotFound` on a stale version) or fails with a
//! persistence error and leaves nothing behind.

mod common;

use std::time::Duration;

use common::{TENANT, date, seed_ledger, seed_transaction, setup_file};
use gledger_core::ledger::DetailLine;
use gledger_db::entities::organizations;
use gledger_db::{AccountFields, AccountRepository, AccountTypeRepository, TransactionRepository, store};
use gledger_shared::{ErrorCode, types::AccountId};
use rust_decimal_macros::dec;
use sea_orm::TransactionTrait;

const RACERS: usize = 8;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_racing_batches_commit_whole_or_nothing() {
    let (db, _dir) = setup_file(8).await;
    let ledger = seed_ledger(&db, TENANT).await;
    let id = seed_transaction(&db, TENANT, &ledger, date(2020, 6, 1)).await;
    let repo = TransactionRepository::new(db);
    let cash = AccountId::from_uuid(ledger.cash);
    let revenue = AccountId::from_uuid(ledger.revenue);

    let handles: Vec<_> = (0..RACERS)
        .map(|_| {
            let repo = repo.clone();
            tokio::spawn(async move {
                repo.add_details(
                    TENANT,
                    id,
                    vec![DetailLine::debit(cash, dec!(1)), DetailLine::credit(revenue, dec!(1))],
                )
                .await
            })
        })
        .collect();

    let mut committed = 0;
    for handle in handles {
        match handle.await.expect("task panicked") {
            Ok(numbered) => {
                committed += 1;
                assert_eq!(numbered.len(), 2);
                assert_eq!(numbered[1].sequence_number, numbered[0].sequence_number + 1);
            }
            Err(err) => assert_eq!(err.code(), ErrorCode::Persistence, "unexpected failure: {err}"),
        }
    }
    assert!(committed >= 1, "at least one batch must commit");

    // Every committed batch landed whole; losers wrote nothing.
    let wrapper = repo.get_wrapper(TENANT, id).await.unwrap();
    let seqs: Vec<i32> = wrapper.details.iter().map(|d| d.sequence_number).collect();
    assert_eq!(seqs, (1..=2 * committed).collect::<Vec<_>>());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_racing_updates_from_same_version_one_wins() {
    let (db, _dir) = setup_file(8).await;
    let repo = AccountTypeRepository::new(db);
    repo.create(TENANT, 7, "asset".to_string()).await.unwrap();

    let handles: Vec<_> = (0..RACERS)
        .map(|n| {
            let repo = repo.clone();
            tokio::spawn(async move { repo.update(TENANT, 7, 1, format!("asset-{n}")).await })
        })
        .collect();

    let mut winners = 0;
    for handle in handles {
        match handle.await.expect("task panicked") {
            Ok(version) => {
                winners += 1;
                assert_eq!(version, 2);
            }
            Err(err) => assert!(
                matches!(err.code(), ErrorCode::NotFound | ErrorCode::Persistence),
                "unexpected failure: {err}"
            ),
        }
    }
    assert_eq!(winners, 1);
    assert_eq!(repo.get(TENANT, 7).await.unwrap().version, 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_account_create_cannot_outlive_racing_organization_delete() {
    let (db, _dir) = setup_file(4).await;
    let ledger = seed_ledger(&db, TENANT).await;
    let accounts = AccountRepository::new(db.clone());

    // Soft-delete the organization in a transaction that stays open while
    // the account create runs its reference check.
    let deleting = db.begin().await.unwrap();
    store::soft_delete::<organizations::Entity, _>(&deleting, TENANT, ledger.organization_id, 1)
        .await
        .expect("soft delete inside transaction");

    let create = tokio::spawn({
        let accounts = accounts.clone();
        let organization_id = ledger.organization_id;
        async move {
            accounts
                .create(
                    TENANT,
                    AccountFields {
                        organization_id,
                        account_type_id: 1,
                        account_name: "petty-cash".to_string(),
                        account_description: "late account".to_string(),
                    },
                )
                .await
        }
    });

    tokio::time::sleep(Duration::from_millis(300)).await;
    deleting.commit().await.expect("commit soft delete");

    let err = create
        .await
        .expect("task panicked")
        .expect_err("account must not reference a deleted organization");
    assert!(
        matches!(err.code(), ErrorCode::NotFound | ErrorCode::Persistence),
        "unexpected failure: {err}"
    );

    // Only the two seeded accounts exist, and no row was written for the
    // rejected one.
    let names: Vec<String> = accounts
        .list(TENANT)
        .await
        .unwrap()
        .into_iter()
        .map(|a| a.account_name)
        .collect();
    assert!(!names.contains(&"petty-cash".to_string()));
}
