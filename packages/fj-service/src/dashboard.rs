use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

use fj_domain::{JournalEntry, Prompt};

use crate::journal::Journal;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dashboard {
	pub tasks: Vec<String>,
	pub insights: Vec<String>,
	pub entries: Vec<EntryCard>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryCard {
	pub id: Uuid,
	#[serde(with = "time::serde::rfc3339")]
	pub created_at: OffsetDateTime,
	pub answers: Vec<AnswerCard>,
	pub tasks: Vec<String>,
	pub insights: Vec<String>,
}
impl From<JournalEntry> for EntryCard {
	fn from(entry: JournalEntry) -> Self {
		let answers = entry
			.answers
			.iter()
			.map(|(prompt, text)| AnswerCard {
				prompt,
				label: prompt.label(),
				text: text.to_string(),
			})
			.collect();

		Self {
			id: entry.id,
			created_at: entry.created_at,
			answers,
			tasks: entry.tasks,
			insights: entry.insights,
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnswerCard {
	pub prompt: Prompt,
	pub label: &'static str,
	pub text: String,
}

impl Journal {
	/// Current tasks and insights plus the most recent entries of the signed-in user.
	///
	/// When the session holds no analysis yet, tasks and insights are aggregated from the listed
	/// entries, newest first and without duplicates.
	pub async fn dashboard(&self) -> Dashboard {
		let session = self.snapshot();
		let entries = match session.session_id() {
			Some(user_id) =>
				self.adapters().store.fetch_recent(user_id, self.dashboard_limit()).await,
			None => Vec::new(),
		};
		let (tasks, insights) = if session.tasks.is_empty() && session.insights.is_empty() {
			(
				aggregate(entries.iter().map(|entry| entry.tasks.as_slice())),
				aggregate(entries.iter().map(|entry| entry.insights.as_slice())),
			)
		} else {
			(session.tasks, session.insights)
		};

		Dashboard { tasks, insights, entries: entries.into_iter().map(EntryCard::from).collect() }
	}
}

fn aggregate<'a>(lists: impl Iterator<Item = &'a [String]>) -> Vec<String> {
	let mut out: Vec<String> = Vec::new();

	for item in lists.flatten() {
		let trimmed = item.trim();

		if trimmed.is_empty() || out.iter().any(|existing| existing == trimmed) {
			continue;
		}

		out.push(trimmed.to_string());
	}

	out
}
