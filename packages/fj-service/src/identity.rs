use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::{
	sync::{mpsc, watch},
	task::JoinHandle,
};

use fj_domain::SessionState;

use crate::IdentityProvider;

/// Publishes sign-in and sign-out events. `None` means signed out.
///
/// Every listener receives every event in order, so a sign-out immediately followed by a
/// sign-in is observed as both.
pub struct IdentityFeed {
	state: Mutex<FeedState>,
}
impl IdentityFeed {
	pub fn new() -> Self {
		Self { state: Mutex::new(FeedState { current: None, listeners: Vec::new() }) }
	}

	pub fn current(&self) -> Option<String> {
		self.lock().current.clone()
	}

	pub fn sign_in(&self, user_id: impl Into<String>) {
		let user_id = user_id.into();

		tracing::info!(user_id = %user_id, "Session signed in.");

		self.publish(Some(user_id));
	}

	pub fn sign_out(&self) {
		tracing::info!("Session signed out.");

		self.publish(None);
	}

	/// Runs the anonymous bootstrap once. A failure leaves the session unset.
	pub async fn bootstrap(&self, provider: &dyn IdentityProvider) -> Option<String> {
		let user_id = provider.sign_in_anonymously().await?;

		self.sign_in(user_id.clone());

		Some(user_id)
	}

	/// Registers a listener that applies identity events to `session` and publishes the
	/// resulting state. The listener first receives the current identity. Dropping the returned
	/// handle unregisters it.
	pub fn subscribe(
		&self,
		session: Arc<Mutex<SessionState>>,
		updates: Arc<watch::Sender<SessionState>>,
	) -> IdentitySubscription {
		let (tx, mut rx) = mpsc::unbounded_channel();

		{
			let mut state = self.lock();

			if tx.send(state.current.clone()).is_ok() {
				state.listeners.push(tx);
			}
		}

		let handle = tokio::spawn(async move {
			while let Some(user_id) = rx.recv().await {
				let mut state = session.lock().unwrap_or_else(PoisonError::into_inner);

				if state.apply_identity(user_id) {
					tracing::debug!(user_id = ?state.user_id, "Session identity updated.");

					updates.send_replace(state.clone());
				}
			}
		});

		IdentitySubscription { handle }
	}

	fn publish(&self, user_id: Option<String>) {
		let mut state = self.lock();

		state.current = user_id.clone();
		state.listeners.retain(|tx| tx.send(user_id.clone()).is_ok());
	}

	fn lock(&self) -> MutexGuard<'_, FeedState> {
		self.state.lock().unwrap_or_else(PoisonError::into_inner)
	}
}
impl Default for IdentityFeed {
	fn default() -> Self {
		Self::new()
	}
}

struct FeedState {
	current: Option<String>,
	listeners: Vec<mpsc::UnboundedSender<Option<String>>>,
}

pub struct IdentitySubscription {
	handle: JoinHandle<()>,
}
impl Drop for IdentitySubscription {
	fn drop(&mut self) {
		self.handle.abort();
	}
}
