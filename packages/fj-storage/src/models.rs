use time::OffsetDateTime;
use uuid::Uuid;

use fj_domain::{Answers, JournalEntry};

use crate::{Error, Result};

#[derive(Debug, sqlx::FromRow)]
pub struct JournalEntryRow {
	pub entry_id: Uuid,
	pub user_id: String,
	pub created_at: OffsetDateTime,
	pub answers: Vec<String>,
	pub tasks: Vec<String>,
	pub insights: Vec<String>,
}
impl JournalEntryRow {
	pub fn into_entry(self) -> Result<JournalEntry> {
		let answers = Answers::try_from(self.answers)
			.map_err(|message| Error::InvalidRow(format!("entry {}: {message}", self.entry_id)))?;

		Ok(JournalEntry {
			id: self.entry_id,
			user_id: self.user_id,
			created_at: self.created_at,
			answers,
			tasks: self.tasks,
			insights: self.insights,
		})
	}
}
