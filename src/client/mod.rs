//! Client-side state for a feed UI: an HTTP client for the REST API and the
//! optimistic state holders a view renders from.

pub mod feed;
pub mod follow;
pub mod http;
pub mod like;
pub mod toggle;

use thiserror::Error;

pub use feed::{CommentThread, FeedPager};
pub use follow::{follow_toggle, FollowRequest};
pub use http::FeedClient;
pub use like::{like_toggle, LikeRequest};
pub use toggle::{OptimisticToggle, RelationRequest, ToggleState};

#[derive(Debug, Error)]
pub enum ClientError {
	#[error("request failed: {0}")]
	Http(#[from] reqwest::Error),

	/// Non-2xx answer; `message` is the server's `error` field when present.
	#[error("{message}")]
	Api { status: u16, message: String },

	#[error("another update is still in flight")]
	InFlight,

	#[error("invalid base url: {0}")]
	InvalidBaseUrl(String),
}

impl ClientError {
	pub fn status(&self) -> Option<u16> {
		match self {
			ClientError::Api { status, .. } => Some(*status),
			ClientError::Http(err) => err.status().map(|status| status.as_u16()),
			ClientError::InFlight | ClientError::InvalidBaseUrl(_) => None,
		}
	}
}
