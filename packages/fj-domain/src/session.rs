use serde::Serialize;

use crate::prompt::Answers;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelinePhase {
	#[default]
	Idle,
	Recognizing,
	Compiling,
	Analyzing,
	Persisting,
	Done,
	Failed,
}

/// Process-lifetime state shared by the capture pipeline and the identity listener.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SessionState {
	pub user_id: Option<String>,
	pub draft_answers: Answers,
	pub tasks: Vec<String>,
	pub insights: Vec<String>,
	pub is_loading: bool,
	pub phase: PipelinePhase,
}
impl SessionState {
	/// Applies an identity change. A new id only replaces an unset one.
	///
	/// Returns `true` when the state changed.
	pub fn apply_identity(&mut self, user_id: Option<String>) -> bool {
		match (user_id, self.user_id.is_some()) {
			(Some(user_id), false) => {
				self.user_id = Some(user_id);

				true
			},
			(None, true) => {
				self.user_id = None;

				true
			},
			_ => false,
		}
	}

	pub fn session_id(&self) -> Option<&str> {
		self.user_id.as_deref().filter(|user_id| !user_id.trim().is_empty())
	}
}
