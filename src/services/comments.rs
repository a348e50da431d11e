use super::{parse_body, parse_path_id, resolve_caller};
use crate::common::middleware_identity::Identity;
use crate::domain::{
	comment::{CommentWithUser, CreateCommentRequest},
	user::UserSummary,
};
use crate::services::response::{DeleteCommentResponse, ServiceError};
use crate::state::AppState;

pub struct CommentHandler;
impl CommentHandler {
	pub async fn create(
		state: &AppState,
		identity: &Identity,
		body: &[u8],
	) -> Result<CommentWithUser, ServiceError> {
		let subject = identity.require()?;
		let new_comment = parse_body::<CreateCommentRequest>(body)?.validate()?;
		let author = resolve_caller(state, subject).await?;

		if state.store.find_post(new_comment.post_id).await?.is_none() {
			return Err(ServiceError::NotFound("post not found".into()));
		}

		let comment = state.store.insert_comment(new_comment.post_id, author.id, &new_comment.content).await?;
		tracing::info!(comment_id = %comment.id, post_id = %comment.post_id, "Comment created");

		Ok(CommentWithUser {
			comment,
			user: UserSummary::from(&author),
		})
	}

	pub async fn delete(
		state: &AppState,
		identity: &Identity,
		comment_id: &str,
	) -> Result<DeleteCommentResponse, ServiceError> {
		let subject = identity.require()?;
		let comment_id = parse_path_id(comment_id, "comment")?;
		let caller = resolve_caller(state, subject).await?;

		let comment = state
			.store
			.find_comment(comment_id)
			.await?
			.ok_or_else(|| ServiceError::NotFound("comment not found".into()))?;
		if comment.user_id != caller.id {
			return Err(ServiceError::Forbidden("you can only delete your own comments".into()));
		}

		if !state.store.delete_comment(comment_id).await? {
			return Err(ServiceError::NotFound("comment not found".into()));
		}

		Ok(DeleteCommentResponse {
			success: true,
			comment_id,
			post_id: comment.post_id,
		})
	}
}
