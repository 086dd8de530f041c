use std::{
	sync::{Arc, atomic::Ordering},
	time::Duration,
};

use tokio::time::Instant;
use uuid::Uuid;

use super::{MemoryNoteStore, ScriptedGateway, note, note_list};
use quill_config::PacingStage;
use quill_service::{Error, SummarizeOutcome, Summarizer, SummaryStatus};

const GROCERIES: &str = "Buy milk, walk dog, finish report";
const BULLETS: &str = "- Buy milk\n- Walk dog\n- Finish report";

fn stage(label: &str, delay_ms: u64) -> PacingStage {
	PacingStage { label: label.to_string(), delay_ms }
}

#[tokio::test]
async fn successful_summary_is_stored_and_listed() {
	let store = MemoryNoteStore::new();
	let target = note("Today", GROCERIES, 1);

	store.seed(target.clone());

	let notes = note_list(&store).await;
	let gateway = Arc::new(ScriptedGateway::replying(BULLETS));
	let summarizer = Summarizer::new(notes.clone(), gateway.clone(), Vec::new());
	let outcome = summarizer.summarize(target.note_id).await.expect("Failed to summarize.");

	assert_eq!(
		outcome,
		SummarizeOutcome::Summarized { note_id: target.note_id, summary: BULLETS.to_string() }
	);
	assert_eq!(notes.get(target.note_id).and_then(|n| n.summary).as_deref(), Some(BULLETS));
	assert_eq!(store.stored(target.note_id).and_then(|n| n.summary).as_deref(), Some(BULLETS));
	assert_eq!(summarizer.status(target.note_id), SummaryStatus::Idle);
	assert_eq!(gateway.calls(), 1);
}

#[tokio::test]
async fn unknown_note_is_rejected_without_gateway_call() {
	let store = MemoryNoteStore::new();
	let notes = note_list(&store).await;
	let gateway = Arc::new(ScriptedGateway::replying(BULLETS));
	let summarizer = Summarizer::new(notes, gateway.clone(), Vec::new());
	let missing = Uuid::new_v4();
	let err = summarizer.summarize(missing).await.expect_err("Expected unknown note.");

	assert!(matches!(err, Error::UnknownNote { note_id } if note_id == missing));
	assert_eq!(gateway.calls(), 0);
}

#[tokio::test]
async fn second_trigger_while_pending_is_a_no_op() {
	let store = MemoryNoteStore::new();
	let x = note("x", "first note", 2);
	let y = note("y", "second note", 1);

	store.seed(x.clone());
	store.seed(y.clone());

	let notes = note_list(&store).await;
	let gateway = Arc::new(ScriptedGateway::replying(BULLETS).gating("first note"));
	let summarizer = Arc::new(Summarizer::new(notes, gateway.clone(), Vec::new()));
	let x_id = x.note_id;
	let first = tokio::spawn({
		let summarizer = Arc::clone(&summarizer);

		async move { summarizer.summarize(x_id).await }
	});

	gateway.entered().await;

	assert!(matches!(summarizer.status(x_id), SummaryStatus::Pending { .. }));

	let repeat = summarizer.summarize(x_id).await.expect("Repeat trigger must not fail.");

	assert_eq!(repeat, SummarizeOutcome::AlreadyPending);

	// Other notes are not blocked by the pending one.
	let other = summarizer.summarize(y.note_id).await.expect("Failed to summarize y.");

	assert!(matches!(other, SummarizeOutcome::Summarized { note_id, .. } if note_id == y.note_id));
	assert_eq!(gateway.calls(), 2);

	gateway.release();

	let outcome = first.await.expect("Summarize task panicked.").expect("Failed to summarize x.");

	assert!(matches!(outcome, SummarizeOutcome::Summarized { note_id, .. } if note_id == x_id));
	assert_eq!(summarizer.status(x_id), SummaryStatus::Idle);
	assert_eq!(gateway.calls(), 2);
}

#[tokio::test(start_paused = true)]
async fn fast_gateway_waits_for_pacing() {
	let store = MemoryNoteStore::new();
	let target = note("Today", GROCERIES, 1);

	store.seed(target.clone());

	let notes = note_list(&store).await;
	let gateway = Arc::new(ScriptedGateway::replying(BULLETS));
	let summarizer = Summarizer::new(
		notes,
		gateway,
		vec![stage("analyzing", 5_000), stage("summarizing", 3_000)],
	);
	let started = Instant::now();

	summarizer.summarize(target.note_id).await.expect("Failed to summarize.");

	let elapsed = started.elapsed();

	assert!(elapsed >= Duration::from_secs(8));
	assert!(elapsed < Duration::from_secs(9));
}

#[tokio::test(start_paused = true)]
async fn slow_gateway_outlasts_pacing() {
	let store = MemoryNoteStore::new();
	let target = note("Today", GROCERIES, 1);

	store.seed(target.clone());

	let notes = note_list(&store).await;
	let gateway = Arc::new(ScriptedGateway::replying(BULLETS).with_delay(Duration::from_secs(10)));
	let summarizer = Summarizer::new(notes, gateway, vec![stage("summarizing", 2_000)]);
	let started = Instant::now();

	summarizer.summarize(target.note_id).await.expect("Failed to summarize.");

	let elapsed = started.elapsed();

	assert!(elapsed >= Duration::from_secs(10));
	assert!(elapsed < Duration::from_secs(11));
}

#[tokio::test(start_paused = true)]
async fn pending_status_follows_pacing_stages() {
	let store = MemoryNoteStore::new();
	let target = note("Today", GROCERIES, 1);

	store.seed(target.clone());

	let notes = note_list(&store).await;
	let gateway = Arc::new(ScriptedGateway::replying(BULLETS));
	let summarizer = Arc::new(Summarizer::new(
		notes,
		gateway,
		vec![stage("analyzing", 5_000), stage("summarizing", 3_000)],
	));
	let note_id = target.note_id;
	let task = tokio::spawn({
		let summarizer = Arc::clone(&summarizer);

		async move { summarizer.summarize(note_id).await }
	});

	tokio::time::sleep(Duration::from_secs(1)).await;

	assert_eq!(
		summarizer.status(note_id),
		SummaryStatus::Pending { stage: "analyzing".to_string() }
	);

	tokio::time::sleep(Duration::from_secs(5)).await;

	assert_eq!(
		summarizer.status(note_id),
		SummaryStatus::Pending { stage: "summarizing".to_string() }
	);

	task.await.expect("Summarize task panicked.").expect("Failed to summarize.");

	assert_eq!(summarizer.status(note_id), SummaryStatus::Idle);
}

#[tokio::test]
async fn gateway_failure_leaves_note_unsummarized() {
	let store = MemoryNoteStore::new();
	let target = note("Today", GROCERIES, 1);

	store.seed(target.clone());

	let notes = note_list(&store).await;
	let summarizer =
		Summarizer::new(notes.clone(), Arc::new(ScriptedGateway::failing()), Vec::new());
	let err = summarizer.summarize(target.note_id).await.expect_err("Expected failure.");

	assert!(matches!(err, Error::SummarizationFailed { .. }));
	assert_eq!(summarizer.status(target.note_id), SummaryStatus::Idle);
	assert_eq!(notes.get(target.note_id).and_then(|n| n.summary), None);
	assert_eq!(store.writes.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn store_failure_is_surfaced_and_nothing_applied() {
	let store = MemoryNoteStore::new();
	let target = note("Today", GROCERIES, 1);

	store.seed(target.clone());

	let notes = note_list(&store).await;
	let summarizer =
		Summarizer::new(notes.clone(), Arc::new(ScriptedGateway::replying(BULLETS)), Vec::new());

	store.fail_writes.store(true, Ordering::SeqCst);

	let err = summarizer.summarize(target.note_id).await.expect_err("Expected write failure.");

	assert!(matches!(err, Error::StoreWrite { .. }));
	assert_eq!(summarizer.status(target.note_id), SummaryStatus::Idle);
	assert_eq!(notes.get(target.note_id).and_then(|n| n.summary), None);
}

#[tokio::test]
async fn edit_while_pending_discards_stale_summary() {
	let store = MemoryNoteStore::new();
	let target = note("Today", GROCERIES, 1);

	store.seed(target.clone());

	let notes = note_list(&store).await;
	let gateway = Arc::new(ScriptedGateway::replying(BULLETS).gating(GROCERIES));
	let summarizer = Arc::new(Summarizer::new(notes.clone(), gateway.clone(), Vec::new()));
	let note_id = target.note_id;
	let task = tokio::spawn({
		let summarizer = Arc::clone(&summarizer);

		async move { summarizer.summarize(note_id).await }
	});

	gateway.entered().await;
	notes.update(note_id, "Today", "Only the report").await.expect("Failed to update note.");
	gateway.release();

	let err = task
		.await
		.expect("Summarize task panicked.")
		.expect_err("Expected the stale summary to be rejected.");
	let local = notes.get(note_id).expect("Note must stay listed.");

	assert!(matches!(err, Error::StoreWrite { .. }));
	assert_eq!(local.content, "Only the report");
	assert_eq!(local.summary, None);
	assert_eq!(store.stored(note_id).and_then(|n| n.summary), None);
}
