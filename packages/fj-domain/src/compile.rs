use std::fmt::Write as _;

use crate::{entry::JournalEntry, prompt::Answers};

/// Builds the analysis prompt from the current answers and up to `limit` previous entries.
///
/// `recent` must already be ordered newest first. Output is deterministic for equal inputs.
pub fn compile_prompt(answers: &Answers, recent: &[JournalEntry], limit: usize) -> String {
	let mut out = String::from("Current Entry:\n");

	for (position, (prompt, answer)) in answers.iter().enumerate() {
		if position > 0 {
			out.push('\n');
		}

		let _ = writeln!(out, "{}. {}", position + 1, prompt.question());
		let _ = writeln!(out, "{answer}");
	}

	let previous = &recent[..recent.len().min(limit)];

	if previous.is_empty() {
		return out;
	}

	let _ = write!(out, "\n\nPrevious {} Entries (newest→oldest):\n", previous.len());

	for (position, entry) in previous.iter().enumerate() {
		let _ = write!(out, "\nEntry {}:\n", position + 1);

		for (prompt, answer) in entry.answers.iter() {
			let _ = writeln!(out, "{}: {answer}", prompt.label());
		}

		if !entry.tasks.is_empty() {
			let _ = writeln!(out, "Tasks: {}", entry.tasks.join(", "));
		}
		if !entry.insights.is_empty() {
			let _ = writeln!(out, "Insights: {}", entry.insights.join(", "));
		}
	}

	out
}
