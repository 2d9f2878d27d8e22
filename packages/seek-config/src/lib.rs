mod error;
mod types;

pub use error::{Error, Result};
pub use types::{Calendar, Config, EmbeddingProviderConfig, Providers, Search};

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
	if !matches!(cfg.search.default_mode.as_str(), "keyword" | "semantic" | "hybrid") {
		return Err(Error::Validation {
			message: "search.default_mode must be one of keyword, semantic, or hybrid.".to_string(),
		});
	}
	if !cfg.search.default_alpha.is_finite() {
		return Err(Error::Validation {
			message: "search.default_alpha must be a finite number.".to_string(),
		});
	}
	if !(0.0..=1.0).contains(&cfg.search.default_alpha) {
		return Err(Error::Validation {
			message: "search.default_alpha must be in the range 0.0-1.0.".to_string(),
		});
	}
	if cfg.search.default_top_k == 0 {
		return Err(Error::Validation {
			message: "search.default_top_k must be greater than zero.".to_string(),
		});
	}
	if !cfg.search.semantic_threshold.is_finite() {
		return Err(Error::Validation {
			message: "search.semantic_threshold must be a finite number.".to_string(),
		});
	}
	if !(-1.0..=1.0).contains(&cfg.search.semantic_threshold) {
		return Err(Error::Validation {
			message: "search.semantic_threshold must be in the range -1.0-1.0.".to_string(),
		});
	}
	if cfg.search.embedding_timeout_ms == 0 {
		return Err(Error::Validation {
			message: "search.embedding_timeout_ms must be greater than zero.".to_string(),
		});
	}
	if cfg.calendar.utc_offset_seconds().is_none() {
		return Err(Error::Validation {
			message: "calendar.utc_offset must look like +HH:MM or -HH:MM.".to_string(),
		});
	}
	if !types::WEEKDAYS.contains(&cfg.calendar.week_start.as_str()) {
		return Err(Error::Validation {
			message: "calendar.week_start must be a weekday name such as monday or sunday."
				.to_string(),
		});
	}

	if let Some(embedding) = cfg.providers.embedding.as_ref() {
		for (label, value) in [
			("providers.embedding.api_base", &embedding.api_base),
			("providers.embedding.api_key", &embedding.api_key),
			("providers.embedding.model", &embedding.model),
		] {
			if value.trim().is_empty() {
				return Err(Error::Validation { message: format!("{label} must be non-empty.") });
			}
		}

		if embedding.dimensions == 0 {
			return Err(Error::Validation {
				message: "providers.embedding.dimensions must be greater than zero.".to_string(),
			});
		}
		if embedding.timeout_ms == 0 {
			return Err(Error::Validation {
				message: "providers.embedding.timeout_ms must be greater than zero.".to_string(),
			});
		}
		if embedding.default_headers.values().any(|value| !value.is_string()) {
			return Err(Error::Validation {
				message: "providers.embedding.default_headers values must be strings.".to_string(),
			});
		}
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	cfg.search.default_mode = cfg.search.default_mode.trim().to_ascii_lowercase();
	cfg.calendar.week_start = cfg.calendar.week_start.trim().to_ascii_lowercase();

	if let Some(embedding) = cfg.providers.embedding.as_mut() {
		embedding.api_base = embedding.api_base.trim_end_matches('/').to_string();
	}
}
