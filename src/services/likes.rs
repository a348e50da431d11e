use super::{parse_body, resolve_caller};
use crate::adapters::repositories::StoreError;
use crate::common::middleware_identity::Identity;
use crate::domain::like::LikeRequest;
use crate::services::response::{LikeResponse, ServiceError};
use crate::state::AppState;

pub struct LikeHandler;
impl LikeHandler {
	/// Liking twice is not an error; the existing like stands.
	pub async fn like(
		state: &AppState,
		identity: &Identity,
		body: &[u8],
	) -> Result<LikeResponse, ServiceError> {
		let subject = identity.require()?;
		let post_id = parse_body::<LikeRequest>(body)?.validate()?;
		let user = resolve_caller(state, subject).await?;

		if state.store.find_post(post_id).await?.is_none() {
			return Err(ServiceError::NotFound("post not found".into()));
		}

		match state.store.insert_like(post_id, user.id).await {
			Ok(_) => tracing::debug!(post_id = %post_id, user_id = %user.id, "Post liked"),
			Err(StoreError::UniqueViolation) => tracing::debug!(post_id = %post_id, user_id = %user.id, "Post already liked"),
			Err(err) => return Err(err.into()),
		}
		Ok(LikeResponse { success: true, liked: true })
	}

	pub async fn unlike(
		state: &AppState,
		identity: &Identity,
		body: &[u8],
	) -> Result<LikeResponse, ServiceError> {
		let subject = identity.require()?;
		let post_id = parse_body::<LikeRequest>(body)?.validate()?;
		let user = resolve_caller(state, subject).await?;

		state.store.delete_like(post_id, user.id).await?;
		Ok(LikeResponse { success: true, liked: false })
	}
}
