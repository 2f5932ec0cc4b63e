pub mod adapters;
pub mod dashboard;
pub mod identity;
pub mod journal;
pub mod pipeline;

mod error;

pub use adapters::{HttpAnalyzer, HttpIdentity, HttpRecognizer, PgEntryStore};
pub use dashboard::{AnswerCard, Dashboard, EntryCard};
pub use error::{Error, Result};
pub use identity::{IdentityFeed, IdentitySubscription};
pub use journal::Journal;
pub use pipeline::{CapturePipeline, Navigation, Observer, PipelineOutcome};

use std::{future::Future, pin::Pin, sync::Arc};

use uuid::Uuid;

use fj_domain::{Analysis, JournalEntry, NewJournalEntry};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Image to text. Every failure resolves to `None`.
pub trait Recognizer
where
	Self: Send + Sync,
{
	fn recognize<'a>(&'a self, png: &'a [u8]) -> BoxFuture<'a, Option<String>>;
}

/// Compiled journal text to tasks and insights. Every failure resolves to `None`.
pub trait Analyzer
where
	Self: Send + Sync,
{
	fn analyze<'a>(&'a self, text: &'a str) -> BoxFuture<'a, Option<Analysis>>;
}

pub trait EntryStore
where
	Self: Send + Sync,
{
	/// Newest first, at most `limit` entries. Empty on a blank user id or a store failure.
	fn fetch_recent<'a>(
		&'a self,
		user_id: &'a str,
		limit: u32,
	) -> BoxFuture<'a, Vec<JournalEntry>>;

	/// Persists the entry and returns the store-assigned id.
	fn create<'a>(&'a self, entry: &'a NewJournalEntry) -> BoxFuture<'a, Result<Uuid>>;
}

pub trait IdentityProvider
where
	Self: Send + Sync,
{
	fn sign_in_anonymously<'a>(&'a self) -> BoxFuture<'a, Option<String>>;
}

#[derive(Clone)]
pub struct Adapters {
	pub recognizer: Arc<dyn Recognizer>,
	pub analyzer: Arc<dyn Analyzer>,
	pub store: Arc<dyn EntryStore>,
}
