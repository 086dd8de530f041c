use std::time::Duration;

use color_eyre::Result;
use reqwest::Client;
use serde_json::Value;

/// Sends one chat-completions request and returns the first choice's text, if any.
///
/// Transport failures and non-success statuses are errors. A well-formed response that carries
/// no text yields `Ok(None)` so the caller can decide on a fallback.
pub async fn complete(
	cfg: &quill_config::LlmProviderConfig,
	messages: &[Value],
	temperature: f32,
) -> Result<Option<String>> {
	let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
	let url = format!("{}{}", cfg.api_base, cfg.path);
	let body = serde_json::json!({
		"model": cfg.model,
		"temperature": temperature,
		"messages": messages,
	});
	let res = client
		.post(url)
		.headers(crate::auth_headers(&cfg.api_key, &cfg.default_headers)?)
		.json(&body)
		.send()
		.await?;
	let json: Value = res.error_for_status()?.json().await?;

	Ok(parse_completion_text(&json))
}

fn parse_completion_text(json: &Value) -> Option<String> {
	json.get("choices")
		.and_then(|v| v.as_array())
		.and_then(|arr| arr.first())
		.and_then(|choice| choice.get("message"))
		.and_then(|msg| msg.get("content"))
		.and_then(|c| c.as_str())
		.filter(|text| !text.trim().is_empty())
		.map(str::to_string)
}
