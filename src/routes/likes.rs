use axum::{body::Bytes, extract::State, Extension, Json};

use crate::common::middleware_identity::Identity;
use crate::services::{
	response::{LikeResponse, ServiceError},
	LikeHandler,
};
use crate::state::AppState;

pub async fn like_post(
	State(state): State<AppState>,
	Extension(identity): Extension<Identity>,
	body: Bytes,
) -> Result<Json<LikeResponse>, ServiceError> {
	Ok(Json(LikeHandler::like(&state, &identity, &body).await?))
}

pub async fn unlike_post(
	State(state): State<AppState>,
	Extension(identity): Extension<Identity>,
	body: Bytes,
) -> Result<Json<LikeResponse>, ServiceError> {
	Ok(Json(LikeHandler::unlike(&state, &identity, &body).await?))
}
