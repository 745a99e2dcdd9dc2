#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Integration tests for `IndexManager` against a real database.

mod common;
use common::{TestIndex, unique};

use chrono::{TimeZone, Utc};
use membership_index::{NO_TRANSACTION, Triple};

#[tokio::test]
async fn add_commit_then_query_returns_the_triple() {
    let index = TestIndex::new().await;
    let tx = unique("tx-s1");
    let source = unique("src/A");
    let subject = unique("s/1");
    let triple = Triple::new(subject.clone(), "p/member", "o/1");

    index
        .manager
        .add_membership(&tx, &source, &triple, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
        .await
        .expect("add should succeed");
    index.manager.commit(&tx).await.expect("commit should succeed");

    let result = index
        .manager
        .get_membership(NO_TRANSACTION, &subject.clone().into())
        .await
        .expect("query should succeed");

    assert_eq!(result, vec![Triple::new(subject, "p/member", "o/1")]);
}

#[tokio::test]
async fn end_within_same_transaction_is_withdrawal() {
    let index = TestIndex::new().await;
    let tx = unique("tx-s2");
    let source = unique("src/A");
    let subject = unique("s/2");
    let triple = Triple::new(subject.clone(), "p/m", "o/2");
    let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let t1 = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();

    index.manager.add_membership(&tx, &source, &triple, t0).await.expect("add");
    index.manager.end_membership(&tx, &source, &triple, t1).await.expect("end");
    index.manager.commit(&tx).await.expect("commit");

    let result = index
        .manager
        .get_membership(NO_TRANSACTION, &subject.into())
        .await
        .expect("query");
    assert!(result.is_empty(), "withdrawn triple should never reach the committed table");
}

#[tokio::test]
async fn end_date_of_previously_committed_triple_is_visible_only_in_the_past() {
    let index = TestIndex::new().await;
    let tx1 = unique("tx3-add");
    let tx3 = unique("tx3-end");
    let source = unique("src/A");
    let subject = unique("s/1");
    let triple = Triple::new(subject.clone(), "p/member", "o/1");

    index
        .manager
        .add_membership(&tx1, &source, &triple, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
        .await
        .expect("add");
    index.manager.commit(&tx1).await.expect("commit");

    index
        .manager
        .end_membership(&tx3, &source, &triple, Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap())
        .await
        .expect("end");
    index.manager.commit(&tx3).await.expect("commit");

    let live = index
        .manager
        .get_membership(NO_TRANSACTION, &subject.clone().into())
        .await
        .expect("query live");
    assert!(live.is_empty());

    let before_end = format!("{subject}@2024-03-01T00:00:00Z");
    let during = index
        .manager
        .get_membership(NO_TRANSACTION, &before_end.into())
        .await
        .expect("query memento before end");
    assert_eq!(during, vec![Triple::new(subject.clone(), "p/member", "o/1")]);

    let after_end = format!("{subject}@2024-07-01T00:00:00Z");
    let after = index
        .manager
        .get_membership(NO_TRANSACTION, &after_end.into())
        .await
        .expect("query memento after end");
    assert!(after.is_empty());
}

#[tokio::test]
async fn source_wide_end_closes_every_live_triple_from_that_source() {
    let index = TestIndex::new().await;
    let tx_add = unique("tx4-add");
    let tx_end = unique("tx4-end");
    let source = unique("src/B");
    let subject_a = unique("s/4a");
    let subject_b = unique("s/4b");
    let triple_a = Triple::new(subject_a.clone(), "p/m", "o/4a");
    let triple_b = Triple::new(subject_b.clone(), "p/m", "o/4b");
    let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let end_time = Utc.with_ymd_and_hms(2024, 9, 1, 0, 0, 0).unwrap();

    index.manager.add_membership(&tx_add, &source, &triple_a, t0).await.expect("add a");
    index.manager.add_membership(&tx_add, &source, &triple_b, t0).await.expect("add b");
    index.manager.commit(&tx_add).await.expect("commit adds");

    index
        .manager
        .end_membership_for_source(&tx_end, &source, end_time)
        .await
        .expect("end source");
    index.manager.commit(&tx_end).await.expect("commit end");

    assert!(
        index.manager.get_membership(NO_TRANSACTION, &subject_a.into()).await.expect("query a").is_empty()
    );
    assert!(
        index.manager.get_membership(NO_TRANSACTION, &subject_b.into()).await.expect("query b").is_empty()
    );
}

#[tokio::test]
async fn force_delete_after_timestamp_removes_only_straddling_rows() {
    let index = TestIndex::new().await;
    let tx_add = unique("tx5-add");
    let tx_force = unique("tx5-force");
    let source = unique("src/C");
    let subject_early = unique("s/5early");
    let subject_straddle = unique("s/5straddle");
    let threshold = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();

    let early = Triple::new(subject_early.clone(), "p/m", "o/5e");
    index
        .manager
        .add_membership_until(
            &tx_add,
            &source,
            &early,
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap(),
        )
        .await
        .expect("add early");

    let straddling = Triple::new(subject_straddle.clone(), "p/m", "o/5s");
    index
        .manager
        .add_membership(&tx_add, &source, &straddling, Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap())
        .await
        .expect("add straddling");

    index.manager.commit(&tx_add).await.expect("commit adds");

    index
        .manager
        .delete_membership_for_source_after(&tx_force, &source, Some(threshold))
        .await
        .expect("force delete");
    index.manager.commit(&tx_force).await.expect("commit force delete");

    let committed = index.manager.log_membership_table().await.expect("dump committed");
    assert!(
        committed.iter().any(|row| row.subject_id == subject_early),
        "row wholly before the threshold should survive"
    );
    assert!(
        committed.iter().all(|row| row.subject_id != subject_straddle),
        "straddling row should have been force-deleted"
    );
}

#[tokio::test]
async fn rollback_leaves_no_trace() {
    let index = TestIndex::new().await;
    let tx = unique("tx6");
    let source = unique("src/D");
    let subject = unique("s/6");
    let triple = Triple::new(subject.clone(), "p/m", "o/6");

    index
        .manager
        .add_membership(&tx, &source, &triple, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
        .await
        .expect("add");
    index.manager.rollback(&tx).await.expect("rollback");

    let result = index
        .manager
        .get_membership(NO_TRANSACTION, &subject.into())
        .await
        .expect("query");
    assert!(result.is_empty());

    let staging = index.manager.log_staging_table().await.expect("dump staging");
    assert!(staging.iter().all(|row| row.tx_id != tx));
}

#[tokio::test]
async fn delete_membership_references_purges_staged_and_committed_rows() {
    let index = TestIndex::new().await;
    let tx_add = unique("tx7-add");
    let tx_purge = unique("tx7-purge");
    let source = unique("src/E");
    let subject = unique("s/7");
    let object = unique("o/7");
    let triple = Triple::new(subject.clone(), "p/m", object.clone());

    index
        .manager
        .add_membership(&tx_add, &source, &triple, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
        .await
        .expect("add");
    index.manager.commit(&tx_add).await.expect("commit");

    index
        .manager
        .delete_membership_references(&tx_purge, &object)
        .await
        .expect("purge references");

    let result = index
        .manager
        .get_membership(NO_TRANSACTION, &subject.into())
        .await
        .expect("query");
    assert!(result.is_empty(), "purged object should leave no committed triple");
}
