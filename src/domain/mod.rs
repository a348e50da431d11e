pub mod comment;
pub mod follow;
pub mod like;
pub mod pagination;
pub mod post;
pub mod user;

use uuid::Uuid;

use crate::services::response::ServiceError;

/// Upper bound shared by captions and comments, counted in chars.
pub const MAX_TEXT_CHARS: usize = 2200;

/// Parses a required identifier field, reporting `field` on failure.
pub fn parse_id(
	raw: Option<&str>,
	field: &str,
) -> Result<Uuid, ServiceError> {
	let raw = raw
		.map(str::trim)
		.filter(|raw| !raw.is_empty())
		.ok_or_else(|| ServiceError::BadRequest(format!("{field} is required")))?;
	Uuid::parse_str(raw).map_err(|_| ServiceError::BadRequest(format!("{field} is not a valid id")))
}

#[cfg(test)]
mod test {
	use super::parse_id;

	#[test]
	fn test_parse_id() {
		let id = uuid::Uuid::new_v4();
		assert_eq!(parse_id(Some(&id.to_string()), "postId").unwrap(), id);
		assert!(parse_id(None, "postId").is_err());
		assert!(parse_id(Some("  "), "postId").is_err());
		assert!(parse_id(Some("42"), "postId").is_err());
	}
}
