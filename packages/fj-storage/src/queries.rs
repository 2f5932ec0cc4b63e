use time::OffsetDateTime;
use uuid::Uuid;

use fj_domain::{JournalEntry, NewJournalEntry};

use crate::{Error, Result, db::Db, models::JournalEntryRow};

/// Inserts an entry. The database assigns `entry_id` and `created_at`.
pub async fn insert_entry(db: &Db, entry: &NewJournalEntry) -> Result<(Uuid, OffsetDateTime)> {
	if entry.user_id.trim().is_empty() {
		return Err(Error::InvalidArgument("user_id must be non-empty.".to_string()));
	}

	let row: (Uuid, OffsetDateTime) = sqlx::query_as(
		"\
INSERT INTO journal_entries (
	user_id,
	answers,
	tasks,
	insights
)
VALUES (
	$1,
	$2,
	$3,
	$4
)
RETURNING entry_id, created_at",
	)
	.bind(entry.user_id.as_str())
	.bind(entry.answers.as_slice())
	.bind(entry.tasks.as_slice())
	.bind(entry.insights.as_slice())
	.fetch_one(&db.pool)
	.await?;

	Ok(row)
}

/// Newest first, at most `limit` rows. Ties on `created_at` fall back to `entry_id`.
pub async fn fetch_recent_entries(
	db: &Db,
	user_id: &str,
	limit: u32,
) -> Result<Vec<JournalEntry>> {
	let rows: Vec<JournalEntryRow> = sqlx::query_as(
		"\
SELECT entry_id, user_id, created_at, answers, tasks, insights
FROM journal_entries
WHERE user_id = $1
ORDER BY created_at DESC, entry_id DESC
LIMIT $2",
	)
	.bind(user_id)
	.bind(i64::from(limit))
	.fetch_all(&db.pool)
	.await?;

	rows.into_iter().map(JournalEntryRow::into_entry).collect()
}
