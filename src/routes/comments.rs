use axum::{
	body::Bytes,
	extract::{Path, State},
	http::StatusCode,
	Extension, Json,
};

use crate::common::middleware_identity::Identity;
use crate::services::{
	response::{CreateCommentResponse, DeleteCommentResponse, ServiceError},
	CommentHandler,
};
use crate::state::AppState;

pub async fn create_comment(
	State(state): State<AppState>,
	Extension(identity): Extension<Identity>,
	body: Bytes,
) -> Result<(StatusCode, Json<CreateCommentResponse>), ServiceError> {
	let comment = CommentHandler::create(&state, &identity, &body).await?;
	Ok((StatusCode::CREATED, Json(CreateCommentResponse { comment })))
}

pub async fn delete_comment(
	State(state): State<AppState>,
	Extension(identity): Extension<Identity>,
	Path(id): Path<String>,
) -> Result<Json<DeleteCommentResponse>, ServiceError> {
	Ok(Json(CommentHandler::delete(&state, &identity, &id).await?))
}
