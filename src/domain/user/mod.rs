use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::services::response::ServiceError;

pub const MAX_NAME_CHARS: usize = 100;

#[derive(Clone, PartialEq, Eq, Debug, Hash, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
	pub id: Uuid,
	/// Subject asserted by the identity provider.
	pub external_id: String,
	pub name: String,
	pub created_at: DateTime<Utc>,
}

/// Author block nested into posts and comments.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct UserSummary {
	pub id: Uuid,
	pub external_id: String,
	pub name: String,
}

impl From<&User> for UserSummary {
	fn from(value: &User) -> Self {
		Self {
			id: value.id,
			external_id: value.external_id.clone(),
			name: value.name.clone(),
		}
	}
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
pub struct UserStats {
	pub posts_count: i64,
	pub followers_count: i64,
	pub following_count: i64,
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct UserProfile {
	#[serde(flatten)]
	pub user: User,
	#[serde(flatten)]
	pub stats: UserStats,
	#[serde(rename = "isFollowing")]
	pub is_following: bool,
	#[serde(rename = "isOwnProfile")]
	pub is_own_profile: bool,
}

#[derive(Debug, Deserialize)]
pub struct SyncUserRequest {
	pub name: Option<String>,
}

impl SyncUserRequest {
	pub fn validate(self) -> Result<String, ServiceError> {
		let name = self.name.as_deref().map(str::trim).unwrap_or_default();
		if name.is_empty() {
			return Err(ServiceError::BadRequest("name is required".into()));
		}
		if name.chars().count() > MAX_NAME_CHARS {
			return Err(ServiceError::BadRequest(format!("name must be at most {MAX_NAME_CHARS} characters")));
		}
		Ok(name.to_string())
	}
}
