use std::sync::Arc;

use fj_domain::RenderOptions;
use fj_service::{
	Adapters, CapturePipeline, HttpAnalyzer, HttpIdentity, HttpRecognizer, IdentityFeed,
	IdentityProvider, Journal, PgEntryStore,
};
use fj_storage::db::Db;

#[derive(Clone)]
pub struct AppState {
	pub journal: Arc<Journal>,
	pub identity: Arc<IdentityFeed>,
	pub identity_provider: Arc<dyn IdentityProvider>,
}
impl AppState {
	/// Connects storage, wires the HTTP providers and starts the anonymous sign-in in the
	/// background.
	pub async fn new(config: fj_config::Config) -> color_eyre::Result<Self> {
		let db = Db::connect(&config.storage.postgres).await?;

		db.ensure_schema().await?;

		let providers = config.providers;
		let adapters = Adapters {
			recognizer: Arc::new(HttpRecognizer::new(providers.recognizer)),
			analyzer: Arc::new(HttpAnalyzer::new(providers.analyzer)),
			store: Arc::new(PgEntryStore::new(Arc::new(db))),
		};
		let render =
			RenderOptions { scale: config.render.scale, stroke_width: config.render.stroke_width };
		let pipeline = CapturePipeline::new(adapters, render, config.journal.context_limit);
		let identity = Arc::new(IdentityFeed::new());
		let journal = Journal::new(pipeline, config.journal.dashboard_limit, &identity);
		let provider: Arc<dyn IdentityProvider> = Arc::new(HttpIdentity::new(providers.identity));

		tokio::spawn({
			let identity = identity.clone();
			let provider = provider.clone();

			async move {
				if identity.bootstrap(provider.as_ref()).await.is_none() {
					tracing::warn!("Running without a session; journal analysis is unavailable.");
				}
			}
		});

		Ok(Self::from_parts(Arc::new(journal), identity, provider))
	}

	pub fn from_parts(
		journal: Arc<Journal>,
		identity: Arc<IdentityFeed>,
		identity_provider: Arc<dyn IdentityProvider>,
	) -> Self {
		Self { journal, identity, identity_provider }
	}
}
