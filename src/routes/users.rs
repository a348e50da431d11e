use axum::{
	body::Bytes,
	extract::{Path, State},
	Extension, Json,
};

use crate::common::middleware_identity::Identity;
use crate::domain::user::UserProfile;
use crate::services::{
	response::{ServiceError, UserResponse},
	UserHandler,
};
use crate::state::AppState;

pub async fn get_user(
	State(state): State<AppState>,
	Extension(identity): Extension<Identity>,
	Path(external_id): Path<String>,
) -> Result<Json<UserProfile>, ServiceError> {
	Ok(Json(UserHandler::profile(&state, &identity, &external_id).await?))
}

pub async fn sync_user(
	State(state): State<AppState>,
	Extension(identity): Extension<Identity>,
	body: Bytes,
) -> Result<Json<UserResponse>, ServiceError> {
	let user = UserHandler::sync(&state, &identity, &body).await?;
	Ok(Json(UserResponse { user }))
}
