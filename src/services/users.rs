use super::{parse_body, resolve_viewer};
use crate::common::middleware_identity::Identity;
use crate::domain::user::{SyncUserRequest, User, UserProfile};
use crate::services::response::ServiceError;
use crate::state::AppState;

pub struct UserHandler;
impl UserHandler {
	/// Profile of the user with `external_id`, with the relation to the caller.
	pub async fn profile(
		state: &AppState,
		identity: &Identity,
		external_id: &str,
	) -> Result<UserProfile, ServiceError> {
		let user = state
			.store
			.find_user_by_external_id(external_id.trim())
			.await?
			.ok_or_else(|| ServiceError::NotFound("user not found".into()))?;
		let stats = state.store.user_stats(user.id).await?;

		let (is_following, is_own_profile) = match resolve_viewer(state, identity.subject()).await? {
			Some(viewer) if viewer.id == user.id => (false, true),
			Some(viewer) => (state.store.is_following(viewer.id, user.id).await?, false),
			None => (false, false),
		};

		Ok(UserProfile {
			user,
			stats,
			is_following,
			is_own_profile,
		})
	}

	/// Creates the caller's record on first sign-in, renames it afterwards.
	pub async fn sync(
		state: &AppState,
		identity: &Identity,
		body: &[u8],
	) -> Result<User, ServiceError> {
		let subject = identity.require()?;
		let name = parse_body::<SyncUserRequest>(body)?.validate()?;

		let user = state.store.upsert_user(subject, &name).await?;
		tracing::info!(user_id = %user.id, "User synced");
		Ok(user)
	}
}
