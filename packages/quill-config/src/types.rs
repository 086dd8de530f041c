use serde::Deserialize;
use serde_json::{Map, Value};

/// Upper bound on note content accepted for summarization, in characters.
pub const MAX_CONTENT_CHARS: u32 = 5_000;

#[derive(Clone, Debug, Deserialize)]
pub struct Config {
	pub service: Service,
	pub storage: Storage,
	pub providers: Providers,
	#[serde(default)]
	pub summarize: Summarize,
	pub security: Security,
	pub client: Option<Client>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Service {
	pub http_bind: String,
	pub log_level: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Storage {
	pub postgres: Postgres,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Postgres {
	pub dsn: String,
	pub pool_max_conns: u32,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Providers {
	pub summarizer: LlmProviderConfig,
}

#[derive(Clone, Debug, Deserialize)]
pub struct LlmProviderConfig {
	pub provider_id: String,
	pub api_base: String,
	pub api_key: String,
	pub path: String,
	pub model: String,
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Summarize {
	/// Upper bound on note content accepted by the gateway, counted in characters.
	pub max_content_chars: u32,
	/// Returned verbatim when the model produces no usable text.
	pub fallback_summary: String,
	/// Minimum visible latency of one summarization, split into labelled stages that run in
	/// order while the gateway call is in flight.
	pub pacing: Vec<PacingStage>,
}
impl Default for Summarize {
	fn default() -> Self {
		Self {
			max_content_chars: MAX_CONTENT_CHARS,
			fallback_summary: "Could not generate summary.".to_string(),
			pacing: vec![PacingStage { label: "summarizing".to_string(), delay_ms: 2_000 }],
		}
	}
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct PacingStage {
	pub label: String,
	pub delay_ms: u64,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Security {
	pub bind_localhost_only: bool,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Client {
	pub gateway_url: String,
	/// Opaque id issued by the identity provider. May be overridden on the command line.
	pub user_id: Option<String>,
}
