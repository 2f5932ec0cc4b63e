use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::watch;

use fj_domain::{Canvas, PROMPT_COUNT, SessionState};

use crate::{
	Adapters, Error, Result,
	identity::{IdentityFeed, IdentitySubscription},
	pipeline::{CapturePipeline, PipelineOutcome},
};

/// Owns the session state and serializes capture runs against it.
///
/// A run works on its own copy of the session and merges progress back at every phase
/// transition, so the session lock is only ever held for a copy. Observers read snapshots from a
/// `watch` channel.
pub struct Journal {
	pipeline: CapturePipeline,
	dashboard_limit: u32,
	session: Arc<Mutex<SessionState>>,
	run_gate: tokio::sync::Mutex<()>,
	updates: Arc<watch::Sender<SessionState>>,
	_identity: IdentitySubscription,
}
impl Journal {
	/// Must be called inside a Tokio runtime; the identity listener is spawned here.
	pub fn new(pipeline: CapturePipeline, dashboard_limit: u32, identity: &IdentityFeed) -> Self {
		let session = Arc::new(Mutex::new(SessionState::default()));
		let (updates, _) = watch::channel(SessionState::default());
		let updates = Arc::new(updates);
		let subscription = identity.subscribe(session.clone(), updates.clone());

		Self {
			pipeline,
			dashboard_limit,
			session,
			run_gate: tokio::sync::Mutex::new(()),
			updates,
			_identity: subscription,
		}
	}

	pub fn adapters(&self) -> &Adapters {
		self.pipeline.adapters()
	}

	pub fn dashboard_limit(&self) -> u32 {
		self.dashboard_limit
	}

	pub fn snapshot(&self) -> SessionState {
		self.updates.borrow().clone()
	}

	pub fn subscribe(&self) -> watch::Receiver<SessionState> {
		self.updates.subscribe()
	}

	/// Runs one capture. A second trigger while a run is active is refused with
	/// [`Error::Busy`] instead of being queued.
	pub async fn analyze(&self, canvases: &[Canvas; PROMPT_COUNT]) -> Result<PipelineOutcome> {
		let Ok(_run) = self.run_gate.try_lock() else {
			return Err(Error::Busy);
		};
		let mut run = self.lock_session().clone();
		let outcome = self
			.pipeline
			.run_observed(&mut run, canvases, &mut |state: &SessionState| self.merge_run(state))
			.await;

		tracing::info!(phase = ?outcome.phase(), "Journal analysis finished.");

		Ok(outcome)
	}

	// Identity belongs to the identity listener; everything else belongs to the run.
	fn merge_run(&self, run: &SessionState) {
		let mut session = self.lock_session();

		session.draft_answers = run.draft_answers.clone();
		session.tasks = run.tasks.clone();
		session.insights = run.insights.clone();
		session.is_loading = run.is_loading;
		session.phase = run.phase;

		self.updates.send_replace(session.clone());
	}

	fn lock_session(&self) -> MutexGuard<'_, SessionState> {
		self.session.lock().unwrap_or_else(PoisonError::into_inner)
	}
}
