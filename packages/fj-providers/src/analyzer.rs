use std::time::Duration;

use reqwest::Client;
use serde_json::Value;

use fj_domain::Analysis;

use crate::{Error, Result};

pub const SYSTEM_PROMPT: &str = "\
You are a personal life assistant.
Based on the user's journal entries (the current one and, when provided, previous ones for context), analyze and organize the output into two sections:

1. Tasks To Accomplish:
   Generate a list of clear, actionable reminders based on the user's current entry, considering context from previous entries if available (e.g. following up on the focus for tomorrow). These should be specific tasks the user can complete.

2. Life Insights:
   Provide 2-3 meaningful observations about recurring patterns, habits, emotions, or goals mentioned across the entries, or just the current one otherwise. Compare and contrast if possible. These insights should help the user reflect and grow.

Format your entire response as a structured JSON object like this:

{
  \"tasks\": [\"Task 1\", \"Task 2\", \"Task 3\"],
  \"insights\": [\"Insight 1\", \"Insight 2\", \"Insight 3\"]
}

Only output valid JSON. No extra commentary, no markdown, no explanations.";

/// Sends the compiled journal text to the chat-completion endpoint. One attempt, no retries.
pub async fn analyze(cfg: &fj_config::LlmProviderConfig, text: &str) -> Result<Analysis> {
	let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
	let url = format!("{}{}", cfg.api_base, cfg.path);
	let body = request_body(cfg, text);
	let res = client
		.post(&url)
		.headers(crate::auth_headers(&cfg.api_key, &cfg.default_headers)?)
		.json(&body)
		.send()
		.await?;
	let json: Value = res.error_for_status()?.json().await?;

	parse_analysis(json)
}

pub fn request_body(cfg: &fj_config::LlmProviderConfig, text: &str) -> Value {
	serde_json::json!({
		"model": cfg.model,
		"temperature": cfg.temperature,
		"messages": [
			{ "role": "system", "content": SYSTEM_PROMPT },
			{ "role": "user", "content": text },
		],
	})
}

pub fn parse_analysis(json: Value) -> Result<Analysis> {
	let Some(content) = json
		.get("choices")
		.and_then(|v| v.as_array())
		.and_then(|arr| arr.first())
		.and_then(|choice| choice.get("message"))
		.and_then(|msg| msg.get("content"))
		.and_then(|c| c.as_str())
	else {
		return Err(Error::InvalidResponse {
			message: "Analyzer response is missing choices[0].message.content.".to_string(),
		});
	};

	serde_json::from_str(strip_code_fence(content)).map_err(|err| Error::InvalidResponse {
		message: format!("Analyzer content is not a valid tasks/insights object: {err}"),
	})
}

fn strip_code_fence(content: &str) -> &str {
	let trimmed = content.trim();
	let Some(rest) = trimmed.strip_prefix("```") else {
		return trimmed;
	};
	let rest = rest.strip_prefix("json").unwrap_or(rest);

	rest.strip_suffix("```").unwrap_or(rest).trim()
}
