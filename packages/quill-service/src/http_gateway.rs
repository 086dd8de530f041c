use reqwest::{Client, StatusCode};
use serde_json::Value;

use crate::{BoxFuture, Error, Result, SummaryGateway};

/// Calls a remote gateway's `POST /v1/summarize`.
#[derive(Clone)]
pub struct HttpGateway {
	client: Client,
	url: String,
}
impl HttpGateway {
	pub fn new(base_url: &str) -> Self {
		Self {
			client: Client::new(),
			url: format!("{}/v1/summarize", base_url.trim_end_matches('/')),
		}
	}

	pub fn url(&self) -> &str {
		&self.url
	}

	async fn post(&self, content: &str) -> Result<String> {
		let response = self
			.client
			.post(self.url.as_str())
			.json(&serde_json::json!({ "content": content }))
			.send()
			.await
			.map_err(|err| Error::SummarizationFailed {
				message: format!("Gateway request failed: {err}"),
			})?;
		let status = response.status();
		let bytes = response.bytes().await.map_err(|err| Error::SummarizationFailed {
			message: format!("Gateway response error: {err}"),
		})?;
		let parsed = serde_json::from_slice::<Value>(&bytes).unwrap_or(Value::Null);

		decode_response(status, &parsed)
	}
}

impl SummaryGateway for HttpGateway {
	fn summarize<'a>(&'a self, content: &'a str) -> BoxFuture<'a, Result<String>> {
		Box::pin(self.post(content))
	}
}

fn decode_response(status: StatusCode, body: &Value) -> Result<String> {
	if status.is_success() {
		return body
			.get("summary")
			.and_then(Value::as_str)
			.map(str::to_string)
			.ok_or_else(|| Error::SummarizationFailed {
				message: "Gateway response is missing summary.".to_string(),
			});
	}

	let message = body
		.get("error")
		.and_then(Value::as_str)
		.map(str::to_string)
		.unwrap_or_else(|| format!("Gateway returned {status}."));

	Err(match status {
		StatusCode::BAD_REQUEST => Error::InvalidInput { message },
		StatusCode::PAYLOAD_TOO_LARGE => Error::PayloadTooLarge { message },
		_ => Error::SummarizationFailed { message },
	})
}
