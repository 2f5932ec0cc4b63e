use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;

use crate::{Error, Result};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignUpResponse {
	local_id: Option<String>,
}

/// Creates an anonymous account and returns its user id.
pub async fn sign_in_anonymously(cfg: &fj_config::IdentityProviderConfig) -> Result<String> {
	let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
	let url = format!("{}{}", cfg.api_base, cfg.path);
	let res = client
		.post(&url)
		.query(&[("key", cfg.api_key.as_str())])
		.json(&serde_json::json!({ "returnSecureToken": true }))
		.send()
		.await?;
	let parsed: SignUpResponse = res.error_for_status()?.json().await?;

	parsed.local_id.filter(|id| !id.trim().is_empty()).ok_or_else(|| Error::InvalidResponse {
		message: "Identity response is missing localId.".to_string(),
	})
}
