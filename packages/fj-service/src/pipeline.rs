//! The capture-and-analysis run.
//!
//! `Idle → Recognizing → Compiling → Analyzing → Persisting → Done`, with `Failed` reachable only
//! from `Analyzing`. Recognition failures degrade to empty answers; an analysis failure ends the
//! run without persisting anything.

use serde::Serialize;
use uuid::Uuid;

use fj_domain::{
	Analysis, Answers, Canvas, NewJournalEntry, PROMPT_COUNT, PipelinePhase, Prompt,
	RenderOptions, SessionState, compile_prompt,
};

use crate::Adapters;

/// Receives the session after every phase transition of a run.
pub type Observer<'a> = dyn FnMut(&SessionState) + Send + 'a;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Navigation {
	Dashboard,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineOutcome {
	/// The run succeeded. `entry_id` is `None` when the analysis could not be persisted.
	Done { navigate: Navigation, entry_id: Option<Uuid>, analysis: Analysis },
	/// The analysis call failed; nothing was persisted.
	Failed,
	/// No session identity is established; no adapter was called.
	NoSession,
}
impl PipelineOutcome {
	pub fn phase(&self) -> PipelinePhase {
		match self {
			Self::Done { .. } => PipelinePhase::Done,
			Self::Failed => PipelinePhase::Failed,
			Self::NoSession => PipelinePhase::Idle,
		}
	}
}

pub struct CapturePipeline {
	adapters: Adapters,
	render: RenderOptions,
	context_limit: u32,
}
impl CapturePipeline {
	pub fn new(adapters: Adapters, render: RenderOptions, context_limit: u32) -> Self {
		Self { adapters, render, context_limit }
	}

	pub fn adapters(&self) -> &Adapters {
		&self.adapters
	}

	/// Runs one capture against `session`.
	pub async fn run(
		&self,
		session: &mut SessionState,
		canvases: &[Canvas; PROMPT_COUNT],
	) -> PipelineOutcome {
		self.run_observed(session, canvases, &mut |_: &SessionState| {}).await
	}

	/// Like [`Self::run`], calling `observe` after every phase transition.
	///
	/// The run works on the caller's `session` only; `observe` is where a host copies progress
	/// into shared state. No lock is held by the pipeline across an await. Entries are persisted
	/// under the user id the run started with.
	pub async fn run_observed(
		&self,
		session: &mut SessionState,
		canvases: &[Canvas; PROMPT_COUNT],
		observe: &mut Observer<'_>,
	) -> PipelineOutcome {
		let Some(user_id) = session.session_id().map(str::to_owned) else {
			tracing::warn!("Journal analysis requested without a session identity.");

			return PipelineOutcome::NoSession;
		};

		session.is_loading = true;

		let outcome = self.run_with_session(session, &user_id, canvases, observe).await;

		session.is_loading = false;

		transition(session, PipelinePhase::Idle, observe);

		outcome
	}

	async fn run_with_session(
		&self,
		session: &mut SessionState,
		user_id: &str,
		canvases: &[Canvas; PROMPT_COUNT],
		observe: &mut Observer<'_>,
	) -> PipelineOutcome {
		transition(session, PipelinePhase::Recognizing, observe);

		// The recent-entries fetch has no data dependency on recognition.
		let (answers, recent) = tokio::join!(
			self.recognize_all(canvases),
			self.adapters.store.fetch_recent(user_id, self.context_limit),
		);

		session.draft_answers = answers;

		transition(session, PipelinePhase::Compiling, observe);

		let text = compile_prompt(&session.draft_answers, &recent, self.context_limit as usize);

		tracing::debug!(
			previous_entries = recent.len(),
			chars = text.len(),
			"Compiled journal prompt."
		);

		transition(session, PipelinePhase::Analyzing, observe);

		let Some(analysis) = self.adapters.analyzer.analyze(&text).await else {
			transition(session, PipelinePhase::Failed, observe);

			return PipelineOutcome::Failed;
		};

		session.tasks = analysis.tasks.clone();
		session.insights = analysis.insights.clone();

		transition(session, PipelinePhase::Persisting, observe);

		let entry = NewJournalEntry {
			user_id: user_id.to_string(),
			answers: session.draft_answers.clone(),
			tasks: analysis.tasks.clone(),
			insights: analysis.insights.clone(),
		};
		let entry_id = match self.adapters.store.create(&entry).await {
			Ok(entry_id) => Some(entry_id),
			Err(err) => {
				tracing::error!(error = %err, user_id, "Failed to persist journal entry.");

				None
			},
		};

		transition(session, PipelinePhase::Done, observe);

		PipelineOutcome::Done { navigate: Navigation::Dashboard, entry_id, analysis }
	}

	async fn recognize_all(&self, canvases: &[Canvas; PROMPT_COUNT]) -> Answers {
		let [focus, gratitude, fulfillment, progress] = canvases;
		let (focus, gratitude, fulfillment, progress) = tokio::join!(
			self.recognize_canvas(Prompt::Focus, focus),
			self.recognize_canvas(Prompt::Gratitude, gratitude),
			self.recognize_canvas(Prompt::Fulfillment, fulfillment),
			self.recognize_canvas(Prompt::Progress, progress),
		);

		Answers::new([focus, gratitude, fulfillment, progress])
	}

	async fn recognize_canvas(&self, prompt: Prompt, canvas: &Canvas) -> String {
		if canvas.is_blank() {
			tracing::debug!(canvas = prompt.label(), "Canvas is blank; skipping recognition.");

			return String::new();
		}

		let render = self.render;
		let owned = canvas.clone();
		let png = match tokio::task::spawn_blocking(move || owned.render_png(&render)).await {
			Ok(Ok(png)) => png,
			Ok(Err(err)) => {
				tracing::warn!(error = %err, canvas = prompt.label(), "Failed to render canvas.");

				return String::new();
			},
			Err(err) => {
				tracing::error!(
					error = %err,
					canvas = prompt.label(),
					"Canvas render task failed."
				);

				return String::new();
			},
		};

		match self.adapters.recognizer.recognize(&png).await {
			Some(text) => {
				tracing::debug!(
					canvas = prompt.label(),
					strokes = canvas.stroke_count(),
					chars = text.len(),
					"Recognized canvas text."
				);

				text
			},
			None => {
				tracing::info!(canvas = prompt.label(), "No text recognized for canvas.");

				String::new()
			},
		}
	}
}

fn transition(session: &mut SessionState, phase: PipelinePhase, observe: &mut Observer<'_>) {
	tracing::debug!(from = ?session.phase, to = ?phase, "Capture pipeline transition.");

	session.phase = phase;

	observe(session);
}
