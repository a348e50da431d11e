use bytes::Bytes;

use crate::domain::MAX_TEXT_CHARS;
use crate::services::response::ServiceError;

pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

const ALLOWED_IMAGE_TYPES: [(&str, &str); 4] = [
	("image/jpeg", "jpg"),
	("image/jpg", "jpg"),
	("image/png", "png"),
	("image/webp", "webp"),
];

/// Multipart fields of a post upload, before validation.
#[derive(Debug, Default)]
pub struct CreatePost {
	pub image: Option<ImageUpload>,
	pub caption: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ImageUpload {
	pub content_type: String,
	pub bytes: Bytes,
}

/// An upload that passed validation; `extension` is derived from the content type.
#[derive(Debug, Clone)]
pub struct ValidatedPost {
	pub content_type: String,
	pub extension: &'static str,
	pub bytes: Bytes,
	pub caption: Option<String>,
}

impl CreatePost {
	pub fn validate(self) -> Result<ValidatedPost, ServiceError> {
		let image = self.image.ok_or_else(|| ServiceError::BadRequest("image is required".into()))?;
		if image.bytes.is_empty() {
			return Err(ServiceError::BadRequest("image is empty".into()));
		}
		if image.bytes.len() > MAX_IMAGE_BYTES {
			return Err(ServiceError::BadRequest("image must be at most 5MB".into()));
		}
		let content_type = image.content_type.to_ascii_lowercase();
		let extension = ALLOWED_IMAGE_TYPES
			.iter()
			.find(|(mime, _)| *mime == content_type)
			.map(|(_, ext)| *ext)
			.ok_or_else(|| ServiceError::BadRequest("only JPEG, PNG and WebP images are allowed".into()))?;

		let caption = match self.caption {
			Some(caption) if caption.chars().count() > MAX_TEXT_CHARS => {
				return Err(ServiceError::BadRequest(format!("caption must be at most {MAX_TEXT_CHARS} characters")))
			}
			Some(caption) if caption.trim().is_empty() => None,
			other => other,
		};

		Ok(ValidatedPost {
			content_type,
			extension,
			bytes: image.bytes,
			caption,
		})
	}
}
