use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::services::response::ServiceError;

#[derive(Clone, PartialEq, Eq, Debug, Hash, Serialize, Deserialize, sqlx::FromRow)]
pub struct Follow {
	pub id: Uuid,
	pub follower_id: Uuid,
	pub following_id: Uuid,
	pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FollowRequest {
	/// External identity of the user to (un)follow.
	#[serde(rename = "followingId")]
	pub following_id: Option<String>,
}

impl FollowRequest {
	pub fn validate(self) -> Result<String, ServiceError> {
		self.following_id
			.map(|id| id.trim().to_string())
			.filter(|id| !id.is_empty())
			.ok_or_else(|| ServiceError::BadRequest("followingId is required".into()))
	}
}

/// Works on internal ids and on external subjects alike.
pub fn ensure_not_self<T: PartialEq>(
	follower_id: T,
	following_id: T,
) -> Result<(), ServiceError> {
	if follower_id == following_id {
		return Err(ServiceError::BadRequest("you cannot follow yourself".into()));
	}
	Ok(())
}

#[test]
fn test_self_follow_rejected() {
	let id = Uuid::new_v4();
	assert!(matches!(ensure_not_self(id, id), Err(ServiceError::BadRequest(_))));
	assert!(ensure_not_self(id, Uuid::new_v4()).is_ok());
	assert!(ensure_not_self("user_1", "user_1").is_err());
}
