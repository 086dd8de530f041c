use std::sync::Arc;

use serde_json::Value;

use crate::{BoxFuture, CompletionProvider, DefaultProvider, Error, Result, SummaryGateway};
use quill_config::{Config, LlmProviderConfig, Summarize};
use quill_domain::{
	content_gate::{self, RejectCode},
	prompt,
};

const INVALID_CONTENT: &str = "Invalid content provided.";
const CONTENT_TOO_LONG: &str = "Note is too long to summarize.";
const SUMMARIZE_FAILED: &str = "Failed to summarize note.";

/// Validates note content and forwards it to the text-generation model.
///
/// Stateless and never retries. Every failure leaves here as `InvalidInput`,
/// `PayloadTooLarge`, or `SummarizationFailed`.
pub struct Gateway {
	provider_cfg: LlmProviderConfig,
	cfg: Summarize,
	provider: Arc<dyn CompletionProvider>,
}
impl Gateway {
	pub fn new(provider_cfg: LlmProviderConfig, cfg: Summarize) -> Self {
		Self { provider_cfg, cfg, provider: Arc::new(DefaultProvider) }
	}

	pub fn with_provider(
		provider_cfg: LlmProviderConfig,
		cfg: Summarize,
		provider: Arc<dyn CompletionProvider>,
	) -> Self {
		Self { provider_cfg, cfg, provider }
	}

	pub fn from_config(config: &Config) -> Self {
		Self::new(config.providers.summarizer.clone(), config.summarize.clone())
	}

	/// Entry point for untyped request bodies: `content` must be present and a string.
	pub async fn summarize_payload(&self, payload: &Value) -> Result<String> {
		let Some(content) = payload.get("content").and_then(Value::as_str) else {
			return Err(Error::InvalidInput { message: INVALID_CONTENT.to_string() });
		};

		self.summarize_content(content).await
	}

	pub async fn summarize_content(&self, content: &str) -> Result<String> {
		content_gate::content_gate(content, &self.cfg).map_err(|code| match code {
			RejectCode::RejectEmpty => Error::InvalidInput { message: INVALID_CONTENT.to_string() },
			RejectCode::RejectTooLong =>
				Error::PayloadTooLarge { message: CONTENT_TOO_LONG.to_string() },
		})?;

		let messages = prompt::summary_messages(content)
			.iter()
			.map(serde_json::to_value)
			.collect::<Result<Vec<_>, _>>()
			.map_err(|err| {
				tracing::error!(error = %err, "Failed to encode summary prompt.");

				Error::SummarizationFailed { message: SUMMARIZE_FAILED.to_string() }
			})?;

		match self.provider.complete(&self.provider_cfg, &messages, prompt::TEMPERATURE).await {
			Ok(Some(summary)) => Ok(summary),
			Ok(None) => {
				tracing::warn!(
					provider_id = %self.provider_cfg.provider_id,
					"Summarizer returned no text; using fallback summary."
				);

				Ok(self.cfg.fallback_summary.clone())
			},
			Err(err) => {
				tracing::error!(
					provider_id = %self.provider_cfg.provider_id,
					error = %err,
					"Summarizer call failed."
				);

				Err(Error::SummarizationFailed { message: SUMMARIZE_FAILED.to_string() })
			},
		}
	}
}

impl SummaryGateway for Gateway {
	fn summarize<'a>(&'a self, content: &'a str) -> BoxFuture<'a, Result<String>> {
		Box::pin(self.summarize_content(content))
	}
}
