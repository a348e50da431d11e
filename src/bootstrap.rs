use std::sync::Arc;

use crate::adapters::repositories::PgFeedStore;
use crate::dependencies::{config, connection_pool, identity_verifier, object_storage};
use crate::services::response::ServiceError;
use crate::state::AppState;

pub struct Bootstrap;
impl Bootstrap {
	/// Wires the production adapters from configuration, applying pending
	/// migrations first when `RUN_MIGRATIONS` is set.
	pub async fn app_state() -> Result<AppState, ServiceError> {
		let config = config()?;
		let pool = connection_pool().await?;

		if config.run_migrations {
			tracing::info!("Running database migrations...");
			sqlx::migrate!("./migrations")
				.run(pool)
				.await
				.map_err(|err| ServiceError::Internal(format!("migration failed: {err}")))?;
		}

		Ok(AppState::new(
			Arc::new(PgFeedStore::new(pool.clone())),
			object_storage()?,
			identity_verifier()?,
			config.posts_per_page,
		))
	}
}
