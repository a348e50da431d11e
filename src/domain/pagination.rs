use serde::Deserialize;

use crate::services::response::ServiceError;

/// Query string of the feed listing. `page` is kept raw so malformed values
/// surface as a 400 rather than an extractor rejection.
#[derive(Debug, Default, Deserialize)]
pub struct ListPostsQuery {
	pub page: Option<String>,
	#[serde(rename = "userId")]
	pub user_id: Option<String>,
}

/// Offset window of one 1-based page.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageWindow {
	pub page: i64,
	pub offset: i64,
	pub limit: i64,
}

impl PageWindow {
	pub fn new(
		page: i64,
		page_size: i64,
	) -> Result<Self, ServiceError> {
		if page < 1 {
			return Err(ServiceError::BadRequest("page must be a positive integer".into()));
		}
		let offset = (page - 1)
			.checked_mul(page_size)
			.filter(|offset| offset.checked_add(page_size).is_some())
			.ok_or_else(|| ServiceError::BadRequest("page is out of range".into()))?;
		Ok(Self {
			page,
			offset,
			limit: page_size,
		})
	}

	pub fn parse(
		raw: Option<&str>,
		page_size: i64,
	) -> Result<Self, ServiceError> {
		let page = match raw.map(str::trim) {
			None | Some("") => 1,
			Some(raw) => raw
				.parse::<i64>()
				.map_err(|_| ServiceError::BadRequest("page must be a positive integer".into()))?,
		};
		Self::new(page, page_size)
	}

	/// True while rows remain past this page.
	pub fn has_more(
		&self,
		total: i64,
	) -> bool {
		self.offset.saturating_add(self.limit) < total
	}
}

#[cfg(test)]
mod test {
	use super::PageWindow;

	#[test]
	fn test_offsets() {
		assert_eq!(PageWindow::parse(None, 10).unwrap().offset, 0);
		let second = PageWindow::parse(Some("2"), 10).unwrap();
		assert_eq!((second.page, second.offset, second.limit), (2, 10, 10));
	}

	#[test]
	fn test_has_more_boundary() {
		let second = PageWindow::new(2, 10).unwrap();
		assert!(second.has_more(21));
		assert!(!second.has_more(20));
		assert!(!second.has_more(15));
	}

	#[test]
	fn test_rejects_invalid_pages() {
		assert!(PageWindow::parse(Some("0"), 10).is_err());
		assert!(PageWindow::parse(Some("-3"), 10).is_err());
		assert!(PageWindow::parse(Some("two"), 10).is_err());
		assert!(PageWindow::parse(Some(&i64::MAX.to_string()), 10).is_err());
		// offset fits but offset + page size does not
		assert!(PageWindow::parse(Some("922337203685477581"), 10).is_err());
	}
}
