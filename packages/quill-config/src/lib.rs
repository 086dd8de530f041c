mod error;
mod types;

pub use error::{Error, Result};
pub use types::{
	Client, Config, LlmProviderConfig, MAX_CONTENT_CHARS, PacingStage, Postgres, Providers,
	Security, Service, Storage, Summarize,
};

use std::{fs, path::Path};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;
	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.http_bind.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.http_bind must be non-empty.".to_string(),
		});
	}
	if cfg.storage.postgres.dsn.trim().is_empty() {
		return Err(Error::Validation {
			message: "storage.postgres.dsn must be non-empty.".to_string(),
		});
	}
	if cfg.storage.postgres.pool_max_conns == 0 {
		return Err(Error::Validation {
			message: "storage.postgres.pool_max_conns must be greater than zero.".to_string(),
		});
	}

	let summarizer = &cfg.providers.summarizer;

	for (label, value) in [
		("providers.summarizer.api_base", &summarizer.api_base),
		("providers.summarizer.api_key", &summarizer.api_key),
		("providers.summarizer.model", &summarizer.model),
	] {
		if value.trim().is_empty() {
			return Err(Error::Validation { message: format!("{label} must be non-empty.") });
		}
	}

	if summarizer.timeout_ms == 0 {
		return Err(Error::Validation {
			message: "providers.summarizer.timeout_ms must be greater than zero.".to_string(),
		});
	}
	if cfg.summarize.max_content_chars == 0 {
		return Err(Error::Validation {
			message: "summarize.max_content_chars must be greater than zero.".to_string(),
		});
	}
	if cfg.summarize.max_content_chars > MAX_CONTENT_CHARS {
		return Err(Error::Validation {
			message: format!("summarize.max_content_chars must be at most {MAX_CONTENT_CHARS}."),
		});
	}
	if cfg.summarize.fallback_summary.trim().is_empty() {
		return Err(Error::Validation {
			message: "summarize.fallback_summary must be non-empty.".to_string(),
		});
	}
	if cfg.summarize.pacing.iter().any(|stage| stage.label.trim().is_empty()) {
		return Err(Error::Validation {
			message: "summarize.pacing labels must be non-empty.".to_string(),
		});
	}

	if let Some(client) = cfg.client.as_ref() {
		if client.gateway_url.trim().is_empty() {
			return Err(Error::Validation {
				message: "client.gateway_url must be non-empty.".to_string(),
			});
		}
		if !client.gateway_url.starts_with("http://") && !client.gateway_url.starts_with("https://")
		{
			return Err(Error::Validation {
				message: "client.gateway_url must be an http or https URL.".to_string(),
			});
		}
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	if cfg.providers.summarizer.api_base.ends_with('/') && cfg.providers.summarizer.path.starts_with('/')
	{
		let trimmed = cfg.providers.summarizer.api_base.trim_end_matches('/').to_string();

		cfg.providers.summarizer.api_base = trimmed;
	}

	if let Some(client) = cfg.client.as_mut() {
		client.gateway_url = client.gateway_url.trim().trim_end_matches('/').to_string();

		if client.user_id.as_deref().map(|id| id.trim().is_empty()).unwrap_or(false) {
			client.user_id = None;
		}
	}
}
