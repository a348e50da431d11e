use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{comment::CommentWithUser, user::UserSummary};

#[derive(Clone, PartialEq, Eq, Debug, Hash, Serialize, Deserialize, sqlx::FromRow)]
pub struct Post {
	pub id: Uuid,
	pub user_id: Uuid,
	pub image_url: String,
	pub caption: Option<String>,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

/// A post joined with its author, as the store returns it for listings.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct PostWithUser {
	#[serde(flatten)]
	pub post: Post,
	pub user: UserSummary,
}

/// Denormalized post as served to clients.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct PostWithStats {
	#[serde(flatten)]
	pub post: Post,
	pub user: UserSummary,
	pub likes_count: i64,
	pub comments_count: i64,
	#[serde(default)]
	pub comments: Vec<CommentWithUser>,
	#[serde(rename = "isLiked", default)]
	pub is_liked: bool,
}

/// Row shape the store inserts for a new post.
#[derive(Clone, Debug)]
pub struct NewPost {
	pub user_id: Uuid,
	pub image_url: String,
	pub caption: Option<String>,
}
