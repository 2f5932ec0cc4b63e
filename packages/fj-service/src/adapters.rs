//! Production adapters: HTTP providers and the Postgres entry store.
//!
//! Provider errors stop here. They are logged and turned into `None` or an empty result so the
//! pipeline only ever branches on optional values.

use std::sync::Arc;

use uuid::Uuid;

use fj_config::{IdentityProviderConfig, LlmProviderConfig, RecognizerProviderConfig};
use fj_domain::{Analysis, JournalEntry, NewJournalEntry};
use fj_providers::{analyzer, identity, recognizer};
use fj_storage::{db::Db, queries};

use crate::{Analyzer, BoxFuture, EntryStore, IdentityProvider, Recognizer, Result};

pub struct HttpRecognizer {
	cfg: RecognizerProviderConfig,
}
impl HttpRecognizer {
	pub fn new(cfg: RecognizerProviderConfig) -> Self {
		Self { cfg }
	}
}
impl Recognizer for HttpRecognizer {
	fn recognize<'a>(&'a self, png: &'a [u8]) -> BoxFuture<'a, Option<String>> {
		Box::pin(async move {
			match recognizer::recognize(&self.cfg, png).await {
				Ok(text) => text,
				Err(err) => {
					tracing::warn!(error = %err, "Handwriting recognition failed.");

					None
				},
			}
		})
	}
}

pub struct HttpAnalyzer {
	cfg: LlmProviderConfig,
}
impl HttpAnalyzer {
	pub fn new(cfg: LlmProviderConfig) -> Self {
		Self { cfg }
	}
}
impl Analyzer for HttpAnalyzer {
	fn analyze<'a>(&'a self, text: &'a str) -> BoxFuture<'a, Option<Analysis>> {
		Box::pin(async move {
			match analyzer::analyze(&self.cfg, text).await {
				Ok(analysis) => Some(analysis),
				Err(err) => {
					tracing::error!(
						error = %err,
						model = %self.cfg.model,
						"Journal analysis failed."
					);

					None
				},
			}
		})
	}
}

pub struct HttpIdentity {
	cfg: IdentityProviderConfig,
}
impl HttpIdentity {
	pub fn new(cfg: IdentityProviderConfig) -> Self {
		Self { cfg }
	}
}
impl IdentityProvider for HttpIdentity {
	fn sign_in_anonymously<'a>(&'a self) -> BoxFuture<'a, Option<String>> {
		Box::pin(async move {
			match identity::sign_in_anonymously(&self.cfg).await {
				Ok(user_id) => Some(user_id),
				Err(err) => {
					tracing::error!(error = %err, "Anonymous sign-in failed.");

					None
				},
			}
		})
	}
}

pub struct PgEntryStore {
	db: Arc<Db>,
}
impl PgEntryStore {
	pub fn new(db: Arc<Db>) -> Self {
		Self { db }
	}
}
impl EntryStore for PgEntryStore {
	fn fetch_recent<'a>(
		&'a self,
		user_id: &'a str,
		limit: u32,
	) -> BoxFuture<'a, Vec<JournalEntry>> {
		Box::pin(async move {
			if user_id.trim().is_empty() || limit == 0 {
				return Vec::new();
			}

			match queries::fetch_recent_entries(&self.db, user_id, limit).await {
				Ok(entries) => entries,
				Err(err) => {
					tracing::warn!(
						error = %err,
						user_id,
						"Failed to fetch recent journal entries."
					);

					Vec::new()
				},
			}
		})
	}

	fn create<'a>(&'a self, entry: &'a NewJournalEntry) -> BoxFuture<'a, Result<Uuid>> {
		Box::pin(async move {
			let (entry_id, created_at) = queries::insert_entry(&self.db, entry).await?;

			tracing::info!(
				%entry_id,
				user_id = %entry.user_id,
				%created_at,
				"Journal entry saved."
			);

			Ok(entry_id)
		})
	}
}
