pub mod gateway;
pub mod http_gateway;
pub mod notes;
pub mod store;
pub mod summarize;

mod error;

pub use error::{Error, Result};
pub use gateway::Gateway;
pub use http_gateway::HttpGateway;
pub use notes::NoteList;
pub use quill_domain::draft::NoteDraft;
pub use quill_storage::models::Note;
pub use store::PgNoteStore;
pub use summarize::{SummarizeOutcome, Summarizer, SummaryStatus};

use std::{future::Future, pin::Pin};

use serde_json::Value;
use uuid::Uuid;

use quill_config::LlmProviderConfig;
use quill_providers::summarizer;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Text-generation backend called by the gateway.
pub trait CompletionProvider
where
	Self: Send + Sync,
{
	fn complete<'a>(
		&'a self,
		cfg: &'a LlmProviderConfig,
		messages: &'a [Value],
		temperature: f32,
	) -> BoxFuture<'a, color_eyre::Result<Option<String>>>;
}

/// Turns note content into a summary, either in process or across HTTP.
pub trait SummaryGateway
where
	Self: Send + Sync,
{
	fn summarize<'a>(&'a self, content: &'a str) -> BoxFuture<'a, Result<String>>;
}

/// Owner-scoped CRUD over persisted notes.
pub trait NoteStore
where
	Self: Send + Sync,
{
	/// Every note of `user_id`, newest first.
	fn list<'a>(&'a self, user_id: &'a str) -> BoxFuture<'a, Result<Vec<Note>>>;

	fn insert<'a>(&'a self, note: &'a Note) -> BoxFuture<'a, Result<()>>;

	/// Rewrites title and content and clears the summary. Fails with `StoreWrite` when the note
	/// does not exist.
	fn update<'a>(
		&'a self,
		user_id: &'a str,
		note_id: Uuid,
		title: &'a str,
		content: &'a str,
	) -> BoxFuture<'a, Result<()>>;

	/// Stores `summary` if the note still holds `source_content`.
	fn set_summary<'a>(
		&'a self,
		user_id: &'a str,
		note_id: Uuid,
		summary: &'a str,
		source_content: &'a str,
	) -> BoxFuture<'a, Result<()>>;

	/// Deleting an absent note succeeds.
	fn delete<'a>(&'a self, user_id: &'a str, note_id: Uuid) -> BoxFuture<'a, Result<()>>;
}

pub(crate) struct DefaultProvider;

impl CompletionProvider for DefaultProvider {
	fn complete<'a>(
		&'a self,
		cfg: &'a LlmProviderConfig,
		messages: &'a [Value],
		temperature: f32,
	) -> BoxFuture<'a, color_eyre::Result<Option<String>>> {
		Box::pin(summarizer::complete(cfg, messages, temperature))
	}
}
