use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use super::{ClientError, FeedClient, OptimisticToggle, RelationRequest};

/// `POST /likes` when liking, `DELETE /likes` when unliking.
pub struct LikeRequest {
	client: Arc<FeedClient>,
	post_id: Uuid,
}

#[async_trait]
impl RelationRequest for LikeRequest {
	async fn apply(
		&self,
		active: bool,
	) -> Result<(), ClientError> {
		if active {
			self.client.like(self.post_id).await?;
		} else {
			self.client.unlike(self.post_id).await?;
		}
		Ok(())
	}
}

/// Like button state for one post, seeded from the feed item.
pub fn like_toggle(
	client: Arc<FeedClient>,
	post_id: Uuid,
	is_liked: bool,
	likes_count: i64,
) -> OptimisticToggle<LikeRequest> {
	OptimisticToggle::new(LikeRequest { client, post_id }, is_liked, likes_count)
}
