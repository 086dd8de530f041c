use uuid::Uuid;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Invalid input: {message}")]
	InvalidInput { message: String },
	#[error("Payload too large: {message}")]
	PayloadTooLarge { message: String },
	#[error("Summarization failed: {message}")]
	SummarizationFailed { message: String },
	#[error("Store write failed: {message}")]
	StoreWrite { message: String },
	#[error("Store read failed: {message}")]
	StoreRead { message: String },
	#[error("Unknown note: {note_id}.")]
	UnknownNote { note_id: Uuid },
}
