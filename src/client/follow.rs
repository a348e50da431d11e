use std::sync::Arc;

use async_trait::async_trait;

use super::{ClientError, FeedClient, OptimisticToggle, RelationRequest};

/// `POST /follows` when following, `DELETE /follows` when unfollowing.
/// The target is addressed by external identity.
pub struct FollowRequest {
	client: Arc<FeedClient>,
	following_id: String,
}

#[async_trait]
impl RelationRequest for FollowRequest {
	async fn apply(
		&self,
		active: bool,
	) -> Result<(), ClientError> {
		if active {
			self.client.follow(&self.following_id).await?;
		} else {
			self.client.unfollow(&self.following_id).await?;
		}
		Ok(())
	}
}

/// Follow button state on a profile; the counter is the follower count.
pub fn follow_toggle(
	client: Arc<FeedClient>,
	following_id: impl Into<String>,
	is_following: bool,
	followers_count: i64,
) -> OptimisticToggle<FollowRequest> {
	OptimisticToggle::new(
		FollowRequest {
			client,
			following_id: following_id.into(),
		},
		is_following,
		followers_count,
	)
}
