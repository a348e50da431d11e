use std::sync::Arc;

use crate::adapters::{identity::IdentityVerifier, repositories::FeedStore, storage::ObjectStorage};

/// Handles shared by every request. Cloning is cheap; nothing in here is
/// mutated per request.
#[derive(Clone)]
pub struct AppState {
	pub store: Arc<dyn FeedStore>,
	pub storage: Arc<dyn ObjectStorage>,
	pub identity: Arc<dyn IdentityVerifier>,
	pub posts_per_page: i64,
}

impl AppState {
	pub fn new(
		store: Arc<dyn FeedStore>,
		storage: Arc<dyn ObjectStorage>,
		identity: Arc<dyn IdentityVerifier>,
		posts_per_page: i64,
	) -> Self {
		Self {
			store,
			storage,
			identity,
			posts_per_page,
		}
	}
}
