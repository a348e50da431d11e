use axum::{body::Bytes, extract::State, http::StatusCode, Extension, Json};
use axum_macros::debug_handler;

use crate::common::middleware_identity::Identity;
use crate::services::{
	response::{FollowResponse, ServiceError},
	FollowHandler,
};
use crate::state::AppState;

#[debug_handler]
pub async fn follow_user(
	State(state): State<AppState>,
	Extension(identity): Extension<Identity>,
	body: Bytes,
) -> Result<(StatusCode, Json<FollowResponse>), ServiceError> {
	let (created, response) = FollowHandler::follow(&state, &identity, &body).await?;
	let status = if created { StatusCode::CREATED } else { StatusCode::OK };
	Ok((status, Json(response)))
}

pub async fn unfollow_user(
	State(state): State<AppState>,
	Extension(identity): Extension<Identity>,
	body: Bytes,
) -> Result<Json<FollowResponse>, ServiceError> {
	Ok(Json(FollowHandler::unfollow(&state, &identity, &body).await?))
}
