use std::sync::Arc;

use metrika_uploader::common::models::{DocumentId, UploadFile};
use metrika_uploader::uploader::clock::ManualClock;
use metrika_uploader::uploader::{StoreError, TaskStore, UploadStatus};

fn create_test_store() -> TaskStore {
    TaskStore::new(Arc::new(ManualClock::new()))
}

fn create_test_file(name: &str) -> UploadFile {
    UploadFile::new(name, "application/pdf", vec![0u8; 16])
}

#[test]
fn test_insert_starts_uploading_with_zero_progress() {
    let store = create_test_store();
    let id = store.insert(create_test_file("a.pdf"));

    let task = store.get(&id).expect("task exists");
    assert_eq!(task.status, UploadStatus::Uploading);
    assert_eq!(task.progress, 0);
    assert!(task.document_id.is_none());
    assert!(task.error.is_none());
    assert!(store.has_active());
}

#[test]
fn test_progress_never_decreases() {
    let store = create_test_store();
    let id = store.insert(create_test_file("a.pdf"));

    store.set_progress(&id, 40).unwrap();
    store.set_progress(&id, 25).unwrap();
    assert_eq!(store.get(&id).unwrap().progress, 40);

    store.set_progress(&id, 250).unwrap();
    assert_eq!(store.get(&id).unwrap().progress, 100);
}

#[test]
fn test_leaving_uploading_pins_progress_to_100() {
    let store = create_test_store();
    let id = store.insert(create_test_file("a.pdf"));
    store.set_progress(&id, 60).unwrap();

    store.transition(&id, UploadStatus::Processing).unwrap();

    let task = store.get(&id).unwrap();
    assert_eq!(task.status, UploadStatus::Processing);
    assert_eq!(task.progress, 100);

    // 上传阶段之后的进度更新被忽略
    store.set_progress(&id, 10).unwrap();
    assert_eq!(store.get(&id).unwrap().progress, 100);
}

#[test]
fn test_backward_transitions_are_rejected() {
    let store = create_test_store();
    let id = store.insert(create_test_file("a.pdf"));
    store.transition(&id, UploadStatus::Processing).unwrap();
    store.transition(&id, UploadStatus::Analyzing).unwrap();

    let err = store.transition(&id, UploadStatus::Processing).unwrap_err();
    assert!(matches!(
        err,
        StoreError::InvalidTransition {
            from: UploadStatus::Analyzing,
            to: UploadStatus::Processing
        }
    ));

    store.transition(&id, UploadStatus::Completed).unwrap();
    assert!(store.fail(&id, "late failure").is_err());
    assert_eq!(store.get(&id).unwrap().status, UploadStatus::Completed);
}

#[test]
fn test_fail_records_error_message() {
    let store = create_test_store();
    let id = store.insert(create_test_file("a.pdf"));

    store.fail(&id, "sunucu hatası").unwrap();

    let task = store.get(&id).unwrap();
    assert_eq!(task.status, UploadStatus::Error);
    assert_eq!(task.error.as_deref(), Some("sunucu hatası"));
    assert!(!store.has_active());
}

#[test]
fn test_document_id_is_set_at_most_once() {
    let store = create_test_store();
    let id = store.insert(create_test_file("a.pdf"));

    store.set_document_id(&id, DocumentId("doc-1".into())).unwrap();
    let err = store.set_document_id(&id, DocumentId("doc-2".into())).unwrap_err();

    assert!(matches!(err, StoreError::DocumentIdAlreadySet(_)));
    assert_eq!(store.get(&id).unwrap().document_id, Some(DocumentId("doc-1".into())));
}

#[test]
fn test_only_terminal_tasks_can_be_removed() {
    let store = create_test_store();
    let active = store.insert(create_test_file("a.pdf"));
    let done = store.insert(create_test_file("b.pdf"));
    store.fail(&done, "boom").unwrap();

    assert!(matches!(store.remove(&active), Err(StoreError::TaskActive(_))));
    assert_eq!(store.remove(&done).unwrap().id, done);
    assert!(matches!(store.remove(&done), Err(StoreError::TaskNotFound(_))));
    assert_eq!(store.len(), 1);
}

#[test]
fn test_clear_finished_keeps_active_tasks() {
    let store = create_test_store();
    let active = store.insert(create_test_file("a.pdf"));
    let done = store.insert(create_test_file("b.pdf"));
    store.fail(&done, "boom").unwrap();

    assert_eq!(store.clear_finished(), 1);
    let ids: Vec<String> = store.snapshot().into_iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![active]);
}

#[tokio::test]
async fn test_subscribers_see_every_mutation() {
    let store = create_test_store();
    let mut rx = store.subscribe();

    let id = store.insert(create_test_file("a.pdf"));
    assert!(rx.has_changed().unwrap());
    assert_eq!(rx.borrow_and_update().len(), 1);

    store.set_progress(&id, 30).unwrap();
    assert!(rx.has_changed().unwrap());
    assert_eq!(rx.borrow_and_update()[0].progress, 30);

    // 没有实际变化时不通知
    store.set_progress(&id, 10).unwrap();
    assert!(!rx.has_changed().unwrap());
}
