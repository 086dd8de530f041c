use time::OffsetDateTime;
use uuid::Uuid;

use crate::{BoxFuture, Error, Note, NoteStore, Result};
use quill_storage::{db::Db, queries};

/// `NoteStore` backed by the Postgres `notes` table.
pub struct PgNoteStore {
	db: Db,
}
impl PgNoteStore {
	pub fn new(db: Db) -> Self {
		Self { db }
	}

	async fn list_inner(&self, user_id: &str) -> Result<Vec<Note>> {
		queries::list_notes_for_owner(&self.db, user_id).await.map_err(read_error)
	}

	async fn insert_inner(&self, note: &Note) -> Result<()> {
		queries::insert_note(&self.db, note).await.map_err(write_error)
	}

	async fn update_inner(
		&self,
		user_id: &str,
		note_id: Uuid,
		title: &str,
		content: &str,
	) -> Result<()> {
		queries::update_note_content(
			&self.db,
			user_id,
			note_id,
			title,
			content,
			OffsetDateTime::now_utc(),
		)
		.await
		.map_err(write_error)
	}

	async fn set_summary_inner(
		&self,
		user_id: &str,
		note_id: Uuid,
		summary: &str,
		source_content: &str,
	) -> Result<()> {
		queries::update_note_summary(
			&self.db,
			user_id,
			note_id,
			summary,
			source_content,
			OffsetDateTime::now_utc(),
		)
		.await
		.map_err(write_error)
	}

	async fn delete_inner(&self, user_id: &str, note_id: Uuid) -> Result<()> {
		let removed = queries::delete_note(&self.db, user_id, note_id).await.map_err(write_error)?;

		if !removed {
			tracing::debug!(%note_id, "Delete matched no note.");
		}

		Ok(())
	}
}

impl NoteStore for PgNoteStore {
	fn list<'a>(&'a self, user_id: &'a str) -> BoxFuture<'a, Result<Vec<Note>>> {
		Box::pin(self.list_inner(user_id))
	}

	fn insert<'a>(&'a self, note: &'a Note) -> BoxFuture<'a, Result<()>> {
		Box::pin(self.insert_inner(note))
	}

	fn update<'a>(
		&'a self,
		user_id: &'a str,
		note_id: Uuid,
		title: &'a str,
		content: &'a str,
	) -> BoxFuture<'a, Result<()>> {
		Box::pin(self.update_inner(user_id, note_id, title, content))
	}

	fn set_summary<'a>(
		&'a self,
		user_id: &'a str,
		note_id: Uuid,
		summary: &'a str,
		source_content: &'a str,
	) -> BoxFuture<'a, Result<()>> {
		Box::pin(self.set_summary_inner(user_id, note_id, summary, source_content))
	}

	fn delete<'a>(&'a self, user_id: &'a str, note_id: Uuid) -> BoxFuture<'a, Result<()>> {
		Box::pin(self.delete_inner(user_id, note_id))
	}
}

fn read_error(err: quill_storage::Error) -> Error {
	Error::StoreRead { message: err.to_string() }
}

fn write_error(err: quill_storage::Error) -> Error {
	Error::StoreWrite { message: err.to_string() }
}
