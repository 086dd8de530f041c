use std::sync::{Arc, atomic::Ordering};

use super::{MemoryNoteStore, note, note_list};
use quill_service::{Error, NoteDraft};

#[tokio::test]
async fn add_rejects_blank_draft_without_store_call() {
	let store = MemoryNoteStore::new();
	let notes = note_list(&store).await;

	notes.set_draft("   ", "Buy milk");

	let err = notes.add().await.expect_err("Expected blank title to be rejected.");

	assert!(matches!(err, Error::InvalidInput { .. }));
	assert_eq!(store.writes.load(Ordering::SeqCst), 0);
	assert_eq!(notes.draft(), NoteDraft::new("   ", "Buy milk"));
}

#[tokio::test]
async fn add_persists_note_and_clears_draft() {
	let store = MemoryNoteStore::new();
	let older = note("older", "first", 10);

	store.seed(older.clone());

	let notes = note_list(&store).await;

	notes.set_draft("Groceries", "Buy milk");

	let added = notes.add().await.expect("Failed to add note.");
	let listed = notes.notes();

	assert_eq!(notes.draft(), NoteDraft::default());
	assert_eq!(added.user_id, "user-a");
	assert_eq!(added.summary, None);
	assert_eq!(listed.len(), 2);
	assert_eq!(listed[0].note_id, added.note_id);
	assert_eq!(listed[1].note_id, older.note_id);
}

#[tokio::test]
async fn failed_add_keeps_draft() {
	let store = MemoryNoteStore::new();
	let notes = note_list(&store).await;

	store.fail_writes.store(true, Ordering::SeqCst);
	notes.set_draft("Groceries", "Buy milk");

	let err = notes.add().await.expect_err("Expected write failure.");

	assert!(matches!(err, Error::StoreWrite { .. }));
	assert_eq!(notes.draft(), NoteDraft::new("Groceries", "Buy milk"));
	assert!(notes.notes().is_empty());
}

#[tokio::test]
async fn failed_delete_restores_exact_snapshot() {
	let store = MemoryNoteStore::new();

	store.seed(note("a", "alpha", 3));
	store.seed(note("b", "beta", 2));
	store.seed(note("c", "gamma", 1));

	let notes = note_list(&store).await;
	let before = notes.notes();
	let target = before[1].note_id;

	// Reads fail too, so the trailing refresh cannot mask the rollback.
	store.fail_writes.store(true, Ordering::SeqCst);
	store.fail_reads.store(true, Ordering::SeqCst);

	let err = notes.delete(target).await.expect_err("Expected write failure.");

	assert!(matches!(err, Error::StoreWrite { .. }));
	assert_eq!(notes.notes(), before);
}

#[tokio::test]
async fn delete_removes_note_before_store_confirms() {
	let store = MemoryNoteStore::gated();
	let doomed = note("doomed", "bye", 1);

	store.seed(doomed.clone());

	let notes = note_list(&store).await;
	let doomed_id = doomed.note_id;
	let task = tokio::spawn({
		let notes = Arc::clone(&notes);

		async move { notes.delete(doomed_id).await }
	});

	store.write_entered().await;

	assert!(notes.get(doomed_id).is_none());

	store.release_write();
	task.await.expect("Delete task panicked.").expect("Failed to delete note.");

	assert!(notes.notes().is_empty());
	assert!(store.stored(doomed_id).is_none());
}

#[tokio::test]
async fn delete_of_already_deleted_note_converges() {
	let store = MemoryNoteStore::new();
	let gone = note("gone", "removed elsewhere", 1);

	store.seed(gone.clone());

	let notes = note_list(&store).await;

	store.remove(gone.note_id);
	notes.delete(gone.note_id).await.expect("Deleting an absent note must succeed.");

	assert!(notes.get(gone.note_id).is_none());
}

#[tokio::test]
async fn update_replaces_fields_and_clears_summary() {
	let store = MemoryNoteStore::new();
	let mut original = note("Groceries", "Buy milk", 1);

	original.summary = Some("- milk".to_string());
	store.seed(original.clone());

	let notes = note_list(&store).await;

	notes.update(original.note_id, "Errands", "Walk dog").await.expect("Failed to update note.");

	let local = notes.get(original.note_id).expect("Note must stay listed.");
	let stored = store.stored(original.note_id).expect("Note must stay stored.");

	assert_eq!((local.title.as_str(), local.content.as_str()), ("Errands", "Walk dog"));
	assert_eq!(local.summary, None);
	assert_eq!(stored.summary, None);
	assert!(stored.updated_at.is_some());
	assert_eq!(local.created_at, original.created_at);
}

#[tokio::test]
async fn failed_update_restores_exact_snapshot() {
	let store = MemoryNoteStore::new();
	let mut original = note("Groceries", "Buy milk", 1);

	original.summary = Some("- milk".to_string());
	store.seed(original.clone());
	store.seed(note("Other", "untouched", 5));

	let notes = note_list(&store).await;
	let before = notes.notes();

	store.fail_writes.store(true, Ordering::SeqCst);
	store.fail_reads.store(true, Ordering::SeqCst);

	let err = notes
		.update(original.note_id, "Errands", "Walk dog")
		.await
		.expect_err("Expected write failure.");

	assert!(matches!(err, Error::StoreWrite { .. }));
	assert_eq!(notes.notes(), before);
}

#[tokio::test]
async fn update_after_concurrent_delete_fails_and_drops_note() {
	let store = MemoryNoteStore::new();
	let n1 = note("n1", "first", 1);

	store.seed(n1.clone());

	let notes = note_list(&store).await;

	store.remove(n1.note_id);

	let err = notes
		.update(n1.note_id, "n1", "changed")
		.await
		.expect_err("Expected update of a deleted note to fail.");

	assert!(matches!(err, Error::StoreWrite { .. }));
	assert!(notes.get(n1.note_id).is_none());
}

#[tokio::test]
async fn refresh_failure_keeps_local_list() {
	let store = MemoryNoteStore::new();

	store.seed(note("kept", "still here", 1));

	let notes = note_list(&store).await;
	let before = notes.notes();

	store.fail_reads.store(true, Ordering::SeqCst);

	assert!(matches!(notes.refresh().await, Err(Error::StoreRead { .. })));
	assert_eq!(notes.notes(), before);
}
