use std::{
	collections::HashMap,
	sync::{Arc, Mutex, MutexGuard},
	time::Duration,
};

use uuid::Uuid;

use crate::{Error, NoteList, Result, SummaryGateway};
use quill_config::PacingStage;

const DEFAULT_STAGE: &str = "summarizing";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SummaryStatus {
	Idle,
	Pending { stage: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SummarizeOutcome {
	Summarized { note_id: Uuid, summary: String },
	/// A summarization for the note was already running; nothing was started.
	AlreadyPending,
}

/// Drives per-note summarization: at most one run per note, visible completion no sooner than
/// the configured pacing.
pub struct Summarizer {
	notes: Arc<NoteList>,
	gateway: Arc<dyn SummaryGateway>,
	pacing: Vec<PacingStage>,
	in_flight: Mutex<HashMap<Uuid, String>>,
}
impl Summarizer {
	pub fn new(
		notes: Arc<NoteList>,
		gateway: Arc<dyn SummaryGateway>,
		pacing: Vec<PacingStage>,
	) -> Self {
		Self { notes, gateway, pacing, in_flight: Mutex::new(HashMap::new()) }
	}

	pub fn notes(&self) -> &Arc<NoteList> {
		&self.notes
	}

	pub fn status(&self, note_id: Uuid) -> SummaryStatus {
		match lock(&self.in_flight).get(&note_id) {
			Some(stage) => SummaryStatus::Pending { stage: stage.clone() },
			None => SummaryStatus::Idle,
		}
	}

	pub async fn summarize(&self, note_id: Uuid) -> Result<SummarizeOutcome> {
		let Some(note) = self.notes.get(note_id) else {
			return Err(Error::UnknownNote { note_id });
		};
		let Some(_guard) = self.claim(note_id) else {
			tracing::debug!(%note_id, "Summarization already pending.");

			return Ok(SummarizeOutcome::AlreadyPending);
		};
		let (summary, ()) =
			tokio::join!(self.gateway.summarize(&note.content), self.pace(note_id));
		let summary = summary.inspect_err(|err| {
			tracing::warn!(%note_id, error = %err, "Summarization failed.");
		})?;

		self.notes.save_summary(note_id, &summary, &note.content).await.inspect_err(|err| {
			tracing::warn!(%note_id, error = %err, "Failed to store summary.");
		})?;

		Ok(SummarizeOutcome::Summarized { note_id, summary })
	}

	fn claim(&self, note_id: Uuid) -> Option<InFlightGuard<'_>> {
		let mut in_flight = lock(&self.in_flight);

		if in_flight.contains_key(&note_id) {
			return None;
		}

		let stage = self.pacing.first().map_or(DEFAULT_STAGE, |stage| stage.label.as_str());

		in_flight.insert(note_id, stage.to_string());

		Some(InFlightGuard { in_flight: &self.in_flight, note_id })
	}

	async fn pace(&self, note_id: Uuid) {
		for stage in &self.pacing {
			if let Some(current) = lock(&self.in_flight).get_mut(&note_id) {
				current.clone_from(&stage.label);
			}

			tracing::debug!(%note_id, stage = %stage.label, "Summarization stage.");

			tokio::time::sleep(Duration::from_millis(stage.delay_ms)).await;
		}
	}
}

struct InFlightGuard<'a> {
	in_flight: &'a Mutex<HashMap<Uuid, String>>,
	note_id: Uuid,
}
impl Drop for InFlightGuard<'_> {
	fn drop(&mut self) {
		lock(self.in_flight).remove(&self.note_id);
	}
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
	mutex.lock().unwrap_or_else(|err| err.into_inner())
}
