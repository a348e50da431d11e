use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::parse_id;
use crate::services::response::ServiceError;

#[derive(Clone, PartialEq, Eq, Debug, Hash, Serialize, Deserialize, sqlx::FromRow)]
pub struct Like {
	pub id: Uuid,
	pub post_id: Uuid,
	pub user_id: Uuid,
	pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LikeRequest {
	#[serde(rename = "postId")]
	pub post_id: Option<String>,
}

impl LikeRequest {
	pub fn validate(self) -> Result<Uuid, ServiceError> {
		parse_id(self.post_id.as_deref(), "postId")
	}
}
