//! Throwaway Postgres databases carrying the `notes` schema, for tests gated on `QUILL_PG_DSN`.

mod error;

pub use error::{Error, Result};

use std::{env, future::Future, str::FromStr, thread};

use sqlx::{
	ConnectOptions, Connection, Executor,
	postgres::{PgConnectOptions, PgConnection},
};
use tokio::runtime::{Builder, Runtime};
use uuid::Uuid;

use quill_config::Postgres;
use quill_storage::db::Db;

const DSN_VAR: &str = "QUILL_PG_DSN";
const ADMIN_DATABASES: [&str; 2] = ["postgres", "template1"];

pub fn env_dsn() -> Option<String> {
	env::var(DSN_VAR).ok().filter(|dsn| !dsn.trim().is_empty())
}

/// Runs `f` against a fresh database with the schema applied, then drops the database.
///
/// Prints a skip notice and returns when `QUILL_PG_DSN` is unset.
pub fn run_with_db<F, Fut>(test_name: &str, f: F)
where
	F: FnOnce(Db) -> Fut,
	Fut: Future<Output = ()>,
{
	let Some(base_dsn) = env_dsn() else {
		eprintln!("Skipping {test_name}; set {DSN_VAR} to run this test.");

		return;
	};
	let runtime = Runtime::new().expect("Failed to build test runtime.");

	runtime.block_on(async {
		let notes_db =
			NotesDatabase::create(&base_dsn).await.expect("Failed to create test database.");
		let db = notes_db.connect().await.expect("Failed to prepare test database.");

		f(db).await;

		if let Err(err) = notes_db.drop_database().await {
			eprintln!("Test database cleanup warning for {test_name}: {err}.");
		}
	});
}

/// A uniquely named database created from the base DSN. Dropped on `drop_database` or, after a
/// panic, on drop.
pub struct NotesDatabase {
	name: String,
	dsn: String,
	admin: PgConnectOptions,
	dropped: bool,
}
impl NotesDatabase {
	pub async fn create(base_dsn: &str) -> Result<Self> {
		let base = PgConnectOptions::from_str(base_dsn)
			.map_err(|err| Error::Message(format!("Invalid {DSN_VAR}: {err}.")))?;
		let (admin, mut conn) = admin_connection(&base).await?;
		let name = format!("quill_notes_{}", Uuid::new_v4().simple());

		conn.execute(format!(r#"CREATE DATABASE "{name}""#).as_str()).await?;

		let dsn = base.database(&name).to_url_lossy().to_string();

		Ok(Self { name, dsn, admin, dropped: false })
	}

	/// Opens a small pool and applies the `notes` schema.
	pub async fn connect(&self) -> Result<Db> {
		let db = Db::connect(&Postgres { dsn: self.dsn.clone(), pool_max_conns: 2 }).await?;

		db.ensure_schema().await?;

		Ok(db)
	}

	pub async fn drop_database(mut self) -> Result<()> {
		self.dropped = true;

		drop_database(&self.name, &self.admin).await
	}
}
impl Drop for NotesDatabase {
	fn drop(&mut self) {
		if self.dropped {
			return;
		}

		let name = self.name.clone();
		let admin = self.admin.clone();
		// Cleanup runs on a runtime of its own.
		let handle = thread::spawn(move || {
			let result = Builder::new_current_thread()
				.enable_all()
				.build()
				.map_err(|err| Error::Message(err.to_string()))
				.and_then(|runtime| runtime.block_on(drop_database(&name, &admin)));

			if let Err(err) = result {
				eprintln!("Failed to drop test database {name}: {err}.");
			}
		});
		let _ = handle.join();
	}
}

async fn admin_connection(base: &PgConnectOptions) -> Result<(PgConnectOptions, PgConnection)> {
	let mut last_err = None;

	for database in ADMIN_DATABASES {
		let options = base.clone().database(database);

		match PgConnection::connect_with(&options).await {
			Ok(conn) => return Ok((options, conn)),
			Err(err) => last_err = Some(err),
		}
	}

	Err(Error::Message(format!("No admin database reachable: {last_err:?}.")))
}

async fn drop_database(name: &str, admin: &PgConnectOptions) -> Result<()> {
	let mut conn = PgConnection::connect_with(admin).await?;

	// Pools handed to tests may still hold connections.
	sqlx::query("SELECT pg_terminate_backend(pid) FROM pg_stat_activity WHERE datname = $1")
		.bind(name)
		.execute(&mut conn)
		.await?;
	conn.execute(format!(r#"DROP DATABASE IF EXISTS "{name}""#).as_str()).await?;

	Ok(())
}
