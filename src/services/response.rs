use axum::{
	http::StatusCode,
	response::{IntoResponse, Response},
	Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::adapters::{repositories::StoreError, storage::StorageError};
use crate::domain::{
	comment::CommentWithUser,
	follow::Follow,
	post::entity::{Post, PostWithStats},
	user::User,
};

#[derive(Debug, Error)]
pub enum ServiceError {
	#[error("authentication required")]
	Unauthenticated,

	#[error("{0}")]
	BadRequest(String),

	#[error("{0}")]
	NotFound(String),

	#[error("{0}")]
	Forbidden(String),

	#[error("store error: {0}")]
	Store(#[from] StoreError),

	#[error("storage error: {0}")]
	Storage(#[from] StorageError),

	#[error("configuration error: {0}")]
	Config(String),

	#[error("internal error: {0}")]
	Internal(String),
}

impl ServiceError {
	pub fn status(&self) -> StatusCode {
		match self {
			ServiceError::Unauthenticated => StatusCode::UNAUTHORIZED,
			ServiceError::BadRequest(_) => StatusCode::BAD_REQUEST,
			ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
			ServiceError::Forbidden(_) => StatusCode::FORBIDDEN,
			ServiceError::Store(StoreError::UniqueViolation) => StatusCode::CONFLICT,
			ServiceError::Store(StoreError::ForeignKeyViolation) => StatusCode::NOT_FOUND,
			ServiceError::Store(StoreError::CheckViolation) => StatusCode::BAD_REQUEST,
			ServiceError::Store(_) | ServiceError::Storage(_) | ServiceError::Config(_) | ServiceError::Internal(_) => {
				StatusCode::INTERNAL_SERVER_ERROR
			}
		}
	}
}

/// Body of every non-2xx response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
	pub error: String,
}

impl IntoResponse for ServiceError {
	fn into_response(self) -> Response {
		let status = self.status();
		let error = if status.is_server_error() {
			tracing::error!(error = %self, "request failed");
			"internal server error".to_string()
		} else {
			self.to_string()
		};
		(status, Json(ErrorBody { error })).into_response()
	}
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PostsResponse {
	pub posts: Vec<PostWithStats>,
	#[serde(rename = "hasMore")]
	pub has_more: bool,
	pub page: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreatePostResponse {
	pub post: Post,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeletePostResponse {
	pub success: bool,
	pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateCommentResponse {
	pub comment: CommentWithUser,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteCommentResponse {
	pub success: bool,
	#[serde(rename = "commentId")]
	pub comment_id: Uuid,
	#[serde(rename = "postId")]
	pub post_id: Uuid,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LikeResponse {
	pub success: bool,
	pub liked: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FollowResponse {
	pub success: bool,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub follow: Option<Follow>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserResponse {
	pub user: User,
}
