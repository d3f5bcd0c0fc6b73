//! CRUD reconciliation against a list page.

mod common;

use campus_list::{BulkDeleteOutcome, ConfirmPrompt, CrudKind, DeleteOutcome, ListPage};
use campus_model::ItemId;
use campus_source::AdapterError;
use common::{ProbeAdapter, fields};
use serde_json::json;

fn approve(_: &ConfirmPrompt) -> bool {
    true
}

fn decline(_: &ConfirmPrompt) -> bool {
    false
}

#[tokio::test]
async fn test_declined_delete_sends_nothing() {
    let adapter = ProbeAdapter::new(5).shared();
    let mut list = ListPage::new(adapter.clone());
    list.refresh().await;

    let id = ItemId::new("c1");
    let outcome = list.crud().delete(&id, decline).await.unwrap();

    assert_eq!(outcome, DeleteOutcome::Aborted);
    assert_eq!(adapter.delete_count(), 0);
    assert!(list.page().find(&id).is_some());
    assert_eq!(list.page().total, 5);
}

#[tokio::test]
async fn test_confirmed_delete_removes_row_and_selection() {
    let adapter = ProbeAdapter::new(5).shared();
    let mut list = ListPage::new(adapter.clone());
    list.refresh().await;

    let id = ItemId::new("c2");
    list.selection_mut().toggle(&id);

    let mut prompts = Vec::new();
    let outcome = list
        .crud()
        .delete(&id, |prompt: &ConfirmPrompt| {
            prompts.push(prompt.to_string());
            true
        })
        .await
        .unwrap();

    assert_eq!(outcome, DeleteOutcome::Deleted);
    assert_eq!(prompts, vec!["Delete courses 'c2'? This cannot be undone."]);
    assert!(list.page().find(&id).is_none());
    assert_eq!(list.page().total, 4);
    assert!(list.selection().is_empty());
    assert!(adapter.stored("c2").await.is_none());
}

#[tokio::test]
async fn test_failed_delete_leaves_page_untouched() {
    let adapter = ProbeAdapter::new(3).with_failing_delete("c3").shared();
    let mut list = ListPage::new(adapter);
    list.refresh().await;
    let before = list.page().clone();

    let error = list
        .crud()
        .delete(&ItemId::new("c3"), approve)
        .await
        .unwrap_err();

    assert_eq!(error.kind, CrudKind::Delete);
    assert_eq!(error.cause.status(), Some(500));
    assert_eq!(list.page(), &before);
}

#[tokio::test]
async fn test_update_merges_into_visible_row() {
    let adapter = ProbeAdapter::new(5).shared();
    let mut list = ListPage::new(adapter.clone());
    list.refresh().await;

    let id = ItemId::new("c1");
    let stored = list
        .crud()
        .update(&id, fields(json!({"title": "Renamed"})))
        .await
        .unwrap();

    assert_eq!(stored.text("title").as_deref(), Some("Renamed"));
    let row = list.page().find(&id).unwrap();
    assert_eq!(row.text("title").as_deref(), Some("Renamed"));
    assert_eq!(row.text("status").as_deref(), Some("draft"));

    list.refresh().await;
    let refetched = list.page().find(&id).unwrap();
    assert_eq!(refetched.text("title").as_deref(), Some("Renamed"));
}

#[tokio::test]
async fn test_update_of_hidden_item_only_updates_remote() {
    let adapter = ProbeAdapter::new(30).shared();
    let mut list = ListPage::new(adapter.clone());
    list.refresh().await;
    let before = list.page().clone();

    list.crud()
        .update(&ItemId::new("c25"), fields(json!({"title": "Elsewhere"})))
        .await
        .unwrap();

    assert_eq!(list.page(), &before);
    let stored = adapter.stored("c25").await.unwrap();
    assert_eq!(stored.text("title").as_deref(), Some("Elsewhere"));
}

#[tokio::test]
async fn test_update_unknown_item_reports_not_found() {
    let adapter = ProbeAdapter::new(2).shared();
    let mut list = ListPage::new(adapter);
    list.refresh().await;

    let error = list
        .crud()
        .update(&ItemId::new("missing"), fields(json!({"title": "x"})))
        .await
        .unwrap_err();

    assert_eq!(error.kind, CrudKind::Update);
    assert!(matches!(error.cause, AdapterError::NotFound { .. }));
    assert!(error.user_message().starts_with("Could not update the item."));
}

#[tokio::test]
async fn test_create_refetches_current_page() {
    let adapter = ProbeAdapter::new(3).shared();
    let mut list = ListPage::new(adapter.clone());
    list.refresh().await;
    let fetches = adapter.fetch_count();

    let created = list
        .crud()
        .create(fields(json!({"title": "Fresh", "status": "draft"})))
        .await
        .unwrap();

    assert_eq!(adapter.fetch_count(), fetches + 1);
    assert_eq!(list.page().total, 4);
    assert!(list.page().find(&created.id).is_some());
}

#[tokio::test]
async fn test_bulk_delete_reports_partial_failure() {
    let adapter = ProbeAdapter::new(5).with_failing_delete("c3").shared();
    let mut list = ListPage::new(adapter.clone());
    list.refresh().await;

    for id in ["c1", "c2", "c3"] {
        list.selection_mut().toggle(&ItemId::new(id));
    }

    let mut asked = 0;
    let outcome = list
        .crud()
        .delete_selected(|prompt: &ConfirmPrompt| {
            asked += 1;
            prompt.count() == 3
        })
        .await;

    let BulkDeleteOutcome::Completed(report) = outcome else {
        panic!("expected completed bulk delete");
    };
    assert_eq!(asked, 1);
    assert_eq!(report.deleted, vec![ItemId::new("c1"), ItemId::new("c2")]);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].0, ItemId::new("c3"));
    assert_eq!(report.failed[0].1.kind, CrudKind::Delete);
    assert!(!report.is_complete());

    assert_eq!(list.page().total, 3);
    assert!(list.page().find(&ItemId::new("c3")).is_some());
    assert_eq!(list.selection().len(), 1);
    assert!(list.selection().is_selected(&ItemId::new("c3")));
}

#[tokio::test]
async fn test_bulk_delete_declined_or_empty() {
    let adapter = ProbeAdapter::new(5).shared();
    let mut list = ListPage::new(adapter.clone());
    list.refresh().await;

    assert_eq!(
        list.crud().delete_selected(approve).await,
        BulkDeleteOutcome::Empty
    );

    list.selection_mut().toggle(&ItemId::new("c1"));
    assert_eq!(
        list.crud().delete_selected(decline).await,
        BulkDeleteOutcome::Aborted
    );
    assert_eq!(adapter.delete_count(), 0);
    assert_eq!(list.selection().len(), 1);
}
