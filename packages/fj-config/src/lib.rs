mod error;
mod types;

pub use error::{Error, Result};
pub use types::{
	Config, IdentityProviderConfig, Journal, LlmProviderConfig, Postgres, Providers,
	RecognizerProviderConfig, Render, Service, Storage,
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
	if cfg.storage.postgres.acquire_timeout_ms == 0 {
		return Err(Error::Validation {
			message: "storage.postgres.acquire_timeout_ms must be greater than zero.".to_string(),
		});
	}

	for (label, key) in [
		("recognizer", &cfg.providers.recognizer.api_key),
		("analyzer", &cfg.providers.analyzer.api_key),
		("identity", &cfg.providers.identity.api_key),
	] {
		if key.trim().is_empty() {
			return Err(Error::Validation {
				message: format!("Provider {label} api_key must be non-empty."),
			});
		}
	}
	for (label, timeout_ms) in [
		("recognizer", cfg.providers.recognizer.timeout_ms),
		("analyzer", cfg.providers.analyzer.timeout_ms),
		("identity", cfg.providers.identity.timeout_ms),
	] {
		if timeout_ms == 0 {
			return Err(Error::Validation {
				message: format!("Provider {label} timeout_ms must be greater than zero."),
			});
		}
	}

	let min_confidence = cfg.providers.recognizer.min_confidence;

	if !min_confidence.is_finite() || !(0.0..=1.0).contains(&min_confidence) {
		return Err(Error::Validation {
			message: "providers.recognizer.min_confidence must be in the range 0.0-1.0."
				.to_string(),
		});
	}

	let temperature = cfg.providers.analyzer.temperature;

	if !temperature.is_finite() || !(0.0..=2.0).contains(&temperature) {
		return Err(Error::Validation {
			message: "providers.analyzer.temperature must be in the range 0.0-2.0.".to_string(),
		});
	}
	if cfg.providers.analyzer.model.trim().is_empty() {
		return Err(Error::Validation {
			message: "providers.analyzer.model must be non-empty.".to_string(),
		});
	}
	if cfg.journal.context_limit == 0 {
		return Err(Error::Validation {
			message: "journal.context_limit must be greater than zero.".to_string(),
		});
	}
	if cfg.journal.dashboard_limit == 0 {
		return Err(Error::Validation {
			message: "journal.dashboard_limit must be greater than zero.".to_string(),
		});
	}

	for (label, value) in
		[("render.scale", cfg.render.scale), ("render.stroke_width", cfg.render.stroke_width)]
	{
		if !value.is_finite() || value <= 0.0 {
			return Err(Error::Validation {
				message: format!("{label} must be a finite number greater than zero."),
			});
		}
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	cfg.providers.recognizer.languages.retain(|language| !language.trim().is_empty());

	if cfg.providers.recognizer.languages.is_empty() {
		cfg.providers.recognizer.languages.push("en-US".to_string());
	}

	cfg.providers.analyzer.model = cfg.providers.analyzer.model.trim().to_string();
}
