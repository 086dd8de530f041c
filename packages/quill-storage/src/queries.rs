use time::OffsetDateTime;
use uuid::Uuid;

use crate::{Error, Result, db::Db, models::Note};

pub async fn list_notes_for_owner(db: &Db, user_id: &str) -> Result<Vec<Note>> {
	let notes = sqlx::query_as::<_, Note>(
		"\
SELECT note_id, user_id, title, content, summary, created_at, updated_at
FROM notes
WHERE user_id = $1
ORDER BY created_at DESC",
	)
	.bind(user_id)
	.fetch_all(&db.pool)
	.await?;

	Ok(notes)
}

pub async fn get_note(db: &Db, user_id: &str, note_id: Uuid) -> Result<Option<Note>> {
	let note = sqlx::query_as::<_, Note>(
		"\
SELECT note_id, user_id, title, content, summary, created_at, updated_at
FROM notes
WHERE note_id = $1 AND user_id = $2",
	)
	.bind(note_id)
	.bind(user_id)
	.fetch_optional(&db.pool)
	.await?;

	Ok(note)
}

pub async fn insert_note(db: &Db, note: &Note) -> Result<()> {
	sqlx::query(
		"\
INSERT INTO notes (
	note_id,
	user_id,
	title,
	content,
	summary,
	created_at,
	updated_at
)
VALUES ($1, $2, $3, $4, $5, $6, $7)",
	)
	.bind(note.note_id)
	.bind(note.user_id.as_str())
	.bind(note.title.as_str())
	.bind(note.content.as_str())
	.bind(note.summary.as_deref())
	.bind(note.created_at)
	.bind(note.updated_at)
	.execute(&db.pool)
	.await?;

	Ok(())
}

/// Rewrites title and content. Any stored summary is cleared in the same statement.
pub async fn update_note_content(
	db: &Db,
	user_id: &str,
	note_id: Uuid,
	title: &str,
	content: &str,
	now: OffsetDateTime,
) -> Result<()> {
	let result = sqlx::query(
		"\
UPDATE notes
SET
	title = $1,
	content = $2,
	summary = NULL,
	updated_at = $3
WHERE note_id = $4 AND user_id = $5",
	)
	.bind(title)
	.bind(content)
	.bind(now)
	.bind(note_id)
	.bind(user_id)
	.execute(&db.pool)
	.await?;

	if result.rows_affected() == 0 {
		return Err(Error::NotFound(format!("note {note_id}")));
	}

	Ok(())
}

/// Stores a summary only while the note still holds the content it was generated from.
pub async fn update_note_summary(
	db: &Db,
	user_id: &str,
	note_id: Uuid,
	summary: &str,
	source_content: &str,
	now: OffsetDateTime,
) -> Result<()> {
	let result = sqlx::query(
		"\
UPDATE notes
SET
	summary = $1,
	updated_at = $2
WHERE note_id = $3 AND user_id = $4 AND content = $5",
	)
	.bind(summary)
	.bind(now)
	.bind(note_id)
	.bind(user_id)
	.bind(source_content)
	.execute(&db.pool)
	.await?;

	if result.rows_affected() == 0 {
		return Err(Error::NotFound(format!("note {note_id} with unchanged content")));
	}

	Ok(())
}

/// Returns whether a row was removed. Deleting an absent note is not an error.
pub async fn delete_note(db: &Db, user_id: &str, note_id: Uuid) -> Result<bool> {
	let result = sqlx::query("DELETE FROM notes WHERE note_id = $1 AND user_id = $2")
		.bind(note_id)
		.bind(user_id)
		.execute(&db.pool)
		.await?;

	Ok(result.rows_affected() > 0)
}
