use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Note {
	pub note_id: Uuid,
	pub user_id: String,
	pub title: String,
	pub content: String,
	pub summary: Option<String>,
	pub created_at: OffsetDateTime,
	pub updated_at: Option<OffsetDateTime>,
}
