use std::sync::{Arc, Mutex, MutexGuard};

use time::OffsetDateTime;
use uuid::Uuid;

use crate::{Error, Note, NoteDraft, NoteStore, Result};

/// The local list of one owner's notes, kept in step with a `NoteStore`.
///
/// Deletes and edits are applied to the local list before the store call and rolled back to the
/// exact prior list when the call fails. Every mutation ends with a refresh from the store, so the
/// list converges to the persisted state whether or not the mutation succeeded. Locks are never
/// held across an await.
pub struct NoteList {
	store: Arc<dyn NoteStore>,
	user_id: String,
	notes: Mutex<Vec<Note>>,
	draft: Mutex<NoteDraft>,
}
impl NoteList {
	pub fn new(store: Arc<dyn NoteStore>, user_id: impl Into<String>) -> Self {
		Self {
			store,
			user_id: user_id.into(),
			notes: Mutex::new(Vec::new()),
			draft: Mutex::new(NoteDraft::default()),
		}
	}

	pub fn user_id(&self) -> &str {
		&self.user_id
	}

	/// Snapshot of the local list, newest first after a refresh.
	pub fn notes(&self) -> Vec<Note> {
		lock(&self.notes).clone()
	}

	pub fn get(&self, note_id: Uuid) -> Option<Note> {
		lock(&self.notes).iter().find(|note| note.note_id == note_id).cloned()
	}

	pub fn draft(&self) -> NoteDraft {
		lock(&self.draft).clone()
	}

	pub fn set_draft(&self, title: impl Into<String>, content: impl Into<String>) {
		*lock(&self.draft) = NoteDraft::new(title, content);
	}

	/// Replaces the local list with the store's. The local list is untouched on failure.
	pub async fn refresh(&self) -> Result<()> {
		let fetched = self.store.list(&self.user_id).await?;

		*lock(&self.notes) = fetched;

		Ok(())
	}

	/// Persists the current draft as a new note and clears the draft on success.
	pub async fn add(&self) -> Result<Note> {
		let draft = self.draft();

		if !draft.is_eligible() {
			return Err(Error::InvalidInput {
				message: "Title and content must be non-empty.".to_string(),
			});
		}

		let note = Note {
			note_id: Uuid::new_v4(),
			user_id: self.user_id.clone(),
			title: draft.title,
			content: draft.content,
			summary: None,
			created_at: OffsetDateTime::now_utc(),
			updated_at: None,
		};
		let result = self.store.insert(&note).await;

		if result.is_ok() {
			lock(&self.draft).clear();
		}

		self.reconcile().await;

		result.map(|()| note)
	}

	pub async fn delete(&self, note_id: Uuid) -> Result<()> {
		let snapshot = {
			let mut notes = lock(&self.notes);
			let snapshot = notes.clone();

			notes.retain(|note| note.note_id != note_id);

			snapshot
		};
		let result = self.store.delete(&self.user_id, note_id).await;

		if let Err(err) = &result {
			tracing::warn!(%note_id, error = %err, "Delete failed; restoring local list.");

			*lock(&self.notes) = snapshot;
		}

		self.reconcile().await;

		result
	}

	/// Rewrites title and content. Any existing summary is discarded.
	pub async fn update(&self, note_id: Uuid, title: &str, content: &str) -> Result<()> {
		let snapshot = {
			let mut notes = lock(&self.notes);
			let snapshot = notes.clone();

			if let Some(note) = notes.iter_mut().find(|note| note.note_id == note_id) {
				note.title = title.to_string();
				note.content = content.to_string();
				note.summary = None;
			}

			snapshot
		};
		let result = self.store.update(&self.user_id, note_id, title, content).await;

		if let Err(err) = &result {
			tracing::warn!(%note_id, error = %err, "Update failed; restoring local list.");

			*lock(&self.notes) = snapshot;
		}

		self.reconcile().await;

		result
	}

	/// Stores a summary produced from `source_content`. Rejected by the store when the note was
	/// edited since.
	pub async fn save_summary(
		&self,
		note_id: Uuid,
		summary: &str,
		source_content: &str,
	) -> Result<()> {
		let result = self.store.set_summary(&self.user_id, note_id, summary, source_content).await;

		if result.is_ok() {
			let mut notes = lock(&self.notes);

			if let Some(note) = notes
				.iter_mut()
				.find(|note| note.note_id == note_id && note.content == source_content)
			{
				note.summary = Some(summary.to_string());
			}
		}

		self.reconcile().await;

		result
	}

	async fn reconcile(&self) {
		if let Err(err) = self.refresh().await {
			tracing::warn!(user_id = %self.user_id, error = %err, "Failed to refresh notes.");
		}
	}
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
	mutex.lock().unwrap_or_else(|err| err.into_inner())
}
