use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::prompt::Answers;

/// A persisted journal entry. Immutable once written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
	pub id: Uuid,
	pub user_id: String,
	#[serde(with = "time::serde::rfc3339")]
	pub created_at: OffsetDateTime,
	pub answers: Answers,
	pub tasks: Vec<String>,
	pub insights: Vec<String>,
}

/// The client-side shape of an entry before the store assigns its id and timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewJournalEntry {
	pub user_id: String,
	pub answers: Answers,
	pub tasks: Vec<String>,
	pub insights: Vec<String>,
}

/// Structured output of the analysis endpoint. Both fields are required on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Analysis {
	pub tasks: Vec<String>,
	pub insights: Vec<String>,
}
