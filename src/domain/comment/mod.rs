use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{parse_id, user::UserSummary, MAX_TEXT_CHARS};
use crate::services::response::ServiceError;

#[derive(Clone, PartialEq, Eq, Debug, Hash, Serialize, Deserialize, sqlx::FromRow)]
pub struct Comment {
	pub id: Uuid,
	pub post_id: Uuid,
	pub user_id: Uuid,
	pub content: String,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct CommentWithUser {
	#[serde(flatten)]
	pub comment: Comment,
	pub user: UserSummary,
}

#[derive(Debug, Deserialize)]
pub struct CreateCommentRequest {
	#[serde(rename = "postId")]
	pub post_id: Option<String>,
	pub content: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewComment {
	pub post_id: Uuid,
	/// Trimmed content.
	pub content: String,
}

impl CreateCommentRequest {
	pub fn validate(self) -> Result<NewComment, ServiceError> {
		let post_id = parse_id(self.post_id.as_deref(), "postId")?;
		let content = self.content.unwrap_or_default();
		if content.trim().is_empty() {
			return Err(ServiceError::BadRequest("content is required".into()));
		}
		if content.chars().count() > MAX_TEXT_CHARS {
			return Err(ServiceError::BadRequest(format!("comment must be at most {MAX_TEXT_CHARS} characters")));
		}
		Ok(NewComment {
			post_id,
			content: content.trim().to_string(),
		})
	}
}
