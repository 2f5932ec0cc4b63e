use std::time::Duration;

use base64::{Engine as _, engine::general_purpose::STANDARD};
use reqwest::Client;
use serde::Deserialize;

use crate::Result;

#[derive(Debug, Deserialize)]
struct RecognizeResponse {
	#[serde(default)]
	lines: Vec<RecognizedLine>,
}

#[derive(Debug, Deserialize)]
struct RecognizedLine {
	text: String,
	#[serde(default)]
	confidence: Option<f32>,
}

/// Transcribes one rendered canvas. `Ok(None)` means the service found no text.
pub async fn recognize(
	cfg: &fj_config::RecognizerProviderConfig,
	png: &[u8],
) -> Result<Option<String>> {
	let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
	let url = format!("{}{}", cfg.api_base, cfg.path);
	let body = serde_json::json!({
		"model": cfg.model,
		"image": {
			"mime_type": "image/png",
			"data": STANDARD.encode(png),
		},
		"languages": cfg.languages,
	});
	let res = client
		.post(&url)
		.headers(crate::auth_headers(&cfg.api_key, &cfg.default_headers)?)
		.json(&body)
		.send()
		.await?;
	let json: serde_json::Value = res.error_for_status()?.json().await?;

	parse_recognition(json, cfg.min_confidence)
}

fn parse_recognition(json: serde_json::Value, min_confidence: f32) -> Result<Option<String>> {
	let parsed: RecognizeResponse = serde_json::from_value(json)?;
	let lines = parsed
		.lines
		.iter()
		.filter(|line| line.confidence.is_none_or(|confidence| confidence >= min_confidence))
		.map(|line| line.text.trim())
		.filter(|text| !text.is_empty())
		.collect::<Vec<_>>();

	if lines.is_empty() {
		return Ok(None);
	}

	Ok(Some(lines.join(" ")))
}
