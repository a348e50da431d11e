use super::{parse_body, resolve_caller};
use crate::adapters::repositories::StoreError;
use crate::common::middleware_identity::Identity;
use crate::domain::follow::{ensure_not_self, FollowRequest};
use crate::services::response::{FollowResponse, ServiceError};
use crate::state::AppState;

pub struct FollowHandler;
impl FollowHandler {
	/// Returns whether a new follow row was created alongside the response.
	/// Following someone already followed succeeds without a `follow` body.
	pub async fn follow(
		state: &AppState,
		identity: &Identity,
		body: &[u8],
	) -> Result<(bool, FollowResponse), ServiceError> {
		let subject = identity.require()?;
		let target_external_id = parse_body::<FollowRequest>(body)?.validate()?;
		ensure_not_self(subject, target_external_id.as_str())?;
		let follower = resolve_caller(state, subject).await?;

		let target = state
			.store
			.find_user_by_external_id(&target_external_id)
			.await?
			.ok_or_else(|| ServiceError::NotFound("user to follow not found".into()))?;
		ensure_not_self(follower.id, target.id)?;

		match state.store.insert_follow(follower.id, target.id).await {
			Ok(follow) => {
				tracing::info!(follower_id = %follower.id, following_id = %target.id, "Follow created");
				Ok((
					true,
					FollowResponse {
						success: true,
						follow: Some(follow),
					},
				))
			}
			Err(StoreError::UniqueViolation) => Ok((
				false,
				FollowResponse {
					success: true,
					follow: None,
				},
			)),
			Err(StoreError::CheckViolation) => Err(ServiceError::BadRequest("you cannot follow yourself".into())),
			Err(err) => Err(err.into()),
		}
	}

	pub async fn unfollow(
		state: &AppState,
		identity: &Identity,
		body: &[u8],
	) -> Result<FollowResponse, ServiceError> {
		let subject = identity.require()?;
		let target_external_id = parse_body::<FollowRequest>(body)?.validate()?;
		let follower = resolve_caller(state, subject).await?;

		let target = state
			.store
			.find_user_by_external_id(&target_external_id)
			.await?
			.ok_or_else(|| ServiceError::NotFound("user to unfollow not found".into()))?;

		state.store.delete_follow(follower.id, target.id).await?;
		Ok(FollowResponse {
			success: true,
			follow: None,
		})
	}
}

#[cfg(test)]
mod test {
	use serde_json::json;

	use super::FollowHandler;
	use crate::adapters::repositories::FeedStore;
	use crate::common::middleware_identity::Identity;
	use crate::services::{fixtures::Fixture, response::ServiceError};

	fn body(following_id: &str) -> Vec<u8> {
		json!({ "followingId": following_id }).to_string().into_bytes()
	}

	#[tokio::test]
	async fn test_self_follow_rejected() {
		'_given: {
			let fixture = Fixture::new(10);
			let (alice, identity) = fixture.user("ext_alice").await;

			'_when: {
				let result = FollowHandler::follow(&fixture.state, &identity, &body("ext_alice")).await;

				assert!(matches!(result, Err(ServiceError::BadRequest(_))));
				assert_eq!(fixture.store.user_stats(alice.id).await.unwrap().following_count, 0);
			}
		}
	}

	#[tokio::test]
	async fn test_self_follow_rejected_before_caller_lookup() {
		let fixture = Fixture::new(10);
		let unsynced = Identity(Some("ext_newcomer".into()));

		let result = FollowHandler::follow(&fixture.state, &unsynced, &body("ext_newcomer")).await;
		assert!(matches!(result, Err(ServiceError::BadRequest(_))));
	}

	#[tokio::test]
	async fn test_duplicate_follow_is_idempotent() {
		let fixture = Fixture::new(10);
		let (alice, identity) = fixture.user("ext_alice").await;
		let (bob, _) = fixture.user("ext_bob").await;

		let (created, first) = FollowHandler::follow(&fixture.state, &identity, &body("ext_bob")).await.unwrap();
		assert!(created);
		assert_eq!(first.follow.map(|f| f.following_id), Some(bob.id));

		let (created, second) = FollowHandler::follow(&fixture.state, &identity, &body("ext_bob")).await.unwrap();
		assert!(!created);
		assert!(second.success && second.follow.is_none());
		assert!(fixture.store.is_following(alice.id, bob.id).await.unwrap());
	}

	#[tokio::test]
	async fn test_unfollow_and_unknown_target() {
		let fixture = Fixture::new(10);
		let (alice, identity) = fixture.user("ext_alice").await;
		let (bob, _) = fixture.user("ext_bob").await;

		FollowHandler::follow(&fixture.state, &identity, &body("ext_bob")).await.unwrap();
		FollowHandler::unfollow(&fixture.state, &identity, &body("ext_bob")).await.unwrap();
		assert!(!fixture.store.is_following(alice.id, bob.id).await.unwrap());

		let missing = FollowHandler::follow(&fixture.state, &identity, &body("ext_nobody")).await;
		assert!(matches!(missing, Err(ServiceError::NotFound(_))));

		let blank = FollowHandler::follow(&fixture.state, &identity, &body("  ")).await;
		assert!(matches!(blank, Err(ServiceError::BadRequest(_))));
	}
}
