pub mod render;

use std::{path::PathBuf, sync::Arc};

use clap::{Parser, Subcommand};
use color_eyre::eyre;
use tokio::task::JoinSet;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use quill_config::{Client, Config};
use quill_service::{
	HttpGateway, Note, NoteList, PgNoteStore, SummarizeOutcome, Summarizer,
};
use quill_storage::db::Db;

#[derive(Debug, Parser)]
#[command(
	version = quill_cli::VERSION,
	rename_all = "kebab",
	styles = quill_cli::styles(),
)]
pub struct Args {
	#[arg(long, short = 'c', value_name = "FILE")]
	pub config: PathBuf,
	/// Overrides `client.user_id`.
	#[arg(long, value_name = "ID")]
	pub user_id: Option<String>,
	#[command(subcommand)]
	pub command: Command,
}

#[derive(Debug, Subcommand)]
#[command(rename_all = "kebab")]
pub enum Command {
	/// Show every note, newest first.
	List,
	Add {
		#[arg(long)]
		title: String,
		#[arg(long)]
		content: String,
	},
	/// Replace a note's title and content. Its summary is discarded.
	Edit {
		#[arg(value_name = "ID")]
		note_id: Uuid,
		#[arg(long)]
		title: String,
		#[arg(long)]
		content: String,
	},
	Delete {
		#[arg(value_name = "ID")]
		note_id: Uuid,
	},
	/// Summarize notes through the gateway; several ids run concurrently.
	Summarize {
		#[arg(value_name = "ID", required = true, num_args = 1..)]
		note_ids: Vec<Uuid>,
	},
}

pub async fn run(args: Args) -> color_eyre::Result<()> {
	let config = quill_config::load(&args.config)?;

	init_tracing(&config);

	let Some(client) = config.client.as_ref() else {
		return Err(eyre::eyre!("The client section is required to run the terminal client."));
	};
	let user_id = resolve_user_id(args.user_id.as_deref(), client)?;
	let db = Db::connect(&config.storage.postgres).await?;

	db.ensure_schema().await?;

	let notes = Arc::new(NoteList::new(Arc::new(PgNoteStore::new(db)), user_id));

	notes.refresh().await?;

	match args.command {
		Command::List => println!("{}", render::notes(&notes.notes())),
		Command::Add { title, content } => {
			notes.set_draft(&title, &content);

			let note = add_note(&notes, title, content).await?;

			println!("{}", render::note(&note));
		},
		Command::Edit { note_id, title, content } => {
			notes.update(note_id, &title, &content).await?;

			if let Some(note) = notes.get(note_id) {
				println!("{}", render::note(&note));
			}
		},
		Command::Delete { note_id } => {
			notes.delete(note_id).await?;

			println!("Deleted {note_id}.");
		},
		Command::Summarize { note_ids } => summarize(&config, client, notes, note_ids).await?,
	}

	Ok(())
}

async fn summarize(
	config: &Config,
	client: &Client,
	notes: Arc<NoteList>,
	note_ids: Vec<Uuid>,
) -> color_eyre::Result<()> {
	let gateway = Arc::new(HttpGateway::new(&client.gateway_url));
	let summarizer =
		Arc::new(Summarizer::new(notes, gateway, config.summarize.pacing.clone()));
	let mut tasks = JoinSet::new();

	for note_id in note_ids {
		let summarizer = Arc::clone(&summarizer);

		tasks.spawn(async move { (note_id, summarizer.summarize(note_id).await) });
	}

	let mut failed = 0_usize;

	while let Some(joined) = tasks.join_next().await {
		let (note_id, result) = joined?;

		match result {
			Ok(SummarizeOutcome::Summarized { note_id, summary }) =>
				println!("{}", render::summary(note_id, &summary)),
			Ok(SummarizeOutcome::AlreadyPending) => println!("{note_id}: already summarizing."),
			Err(err) => {
				failed += 1;

				eprintln!("{note_id}: {err}");
			},
		}
	}

	if failed > 0 {
		return Err(eyre::eyre!("{failed} summarization(s) failed."));
	}

	Ok(())
}

/// Adds a note and returns it as listed after the refresh, so its timestamp matches `list`.
async fn add_note(notes: &NoteList, title: String, content: String) -> color_eyre::Result<Note> {
	notes.set_draft(title, content);

	let added = notes.add().await?;

	Ok(notes.get(added.note_id).unwrap_or(added))
}

fn resolve_user_id(flag: Option<&str>, client: &Client) -> color_eyre::Result<String> {
	flag.map(str::trim)
		.filter(|value| !value.is_empty())
		.map(str::to_string)
		.or_else(|| client.user_id.clone())
		.ok_or_else(|| eyre::eyre!("Set --user-id or client.user_id."))
}

fn init_tracing(config: &Config) {
	let filter =
		EnvFilter::try_new(&config.service.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

	tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}
