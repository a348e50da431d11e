//! Object storage for uploaded images.
//!
//! Objects are addressed by a bucket-relative path such as
//! `"<user id>/<uuid>.png"`; the store hands back a public URL for it.

use std::{
	collections::HashMap,
	sync::{
		atomic::{AtomicBool, Ordering},
		Mutex,
	},
	time::Duration,
};

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client;
use serde_json::json;
use thiserror::Error;

const PUBLIC_OBJECT_PREFIX: &str = "/storage/v1/object/public/";

#[derive(Debug, Error)]
pub enum StorageError {
	#[error("storage request failed: {0}")]
	Http(#[from] reqwest::Error),
	#[error("storage rejected the request with status {status}: {message}")]
	Rejected { status: u16, message: String },
	#[error("object not found: {0}")]
	NotFound(String),
}

#[async_trait]
pub trait ObjectStorage: Send + Sync {
	/// Stores `bytes` at `path` and returns the object's public URL.
	async fn upload(
		&self,
		path: &str,
		content_type: &str,
		bytes: Bytes,
	) -> Result<String, StorageError>;

	async fn remove(
		&self,
		path: &str,
	) -> Result<(), StorageError>;

	/// Inverse of the URL returned by [`ObjectStorage::upload`].
	fn path_from_public_url(
		&self,
		url: &str,
	) -> Option<String>;
}

/// Extracts the bucket-relative path from a public object URL of the form
/// `.../storage/v1/object/public/<bucket>/<path>`.
pub fn object_path(
	url: &str,
	bucket: &str,
) -> Option<String> {
	let start = url.find(PUBLIC_OBJECT_PREFIX)? + PUBLIC_OBJECT_PREFIX.len();
	let rest = url[start..].split(['?', '#']).next()?;
	let path = rest.strip_prefix(bucket)?.strip_prefix('/')?;
	(!path.is_empty()).then(|| path.to_string())
}

/// Client for the storage REST API (`/storage/v1/object/...`).
pub struct HttpObjectStorage {
	http_client: Client,
	base_url: String,
	service_key: String,
	bucket: String,
}

impl HttpObjectStorage {
	pub fn new(
		base_url: &str,
		service_key: &str,
		bucket: &str,
	) -> Result<Self, StorageError> {
		let http_client = Client::builder().timeout(Duration::from_secs(30)).build()?;
		tracing::info!(bucket = %bucket, "object storage client initialized");
		Ok(Self {
			http_client,
			base_url: base_url.trim_end_matches('/').to_string(),
			service_key: service_key.to_string(),
			bucket: bucket.to_string(),
		})
	}

	pub fn public_url(
		&self,
		path: &str,
	) -> String {
		format!("{}{}{}/{}", self.base_url, PUBLIC_OBJECT_PREFIX, self.bucket, path)
	}

	async fn check(response: reqwest::Response) -> Result<(), StorageError> {
		let status = response.status();
		if status.is_success() {
			return Ok(());
		}
		let message = response.text().await.unwrap_or_default();
		Err(StorageError::Rejected {
			status: status.as_u16(),
			message,
		})
	}
}

#[async_trait]
impl ObjectStorage for HttpObjectStorage {
	async fn upload(
		&self,
		path: &str,
		content_type: &str,
		bytes: Bytes,
	) -> Result<String, StorageError> {
		let url = format!("{}/storage/v1/object/{}/{}", self.base_url, self.bucket, path);
		let response = self
			.http_client
			.post(&url)
			.bearer_auth(&self.service_key)
			.header("apikey", &self.service_key)
			.header(reqwest::header::CONTENT_TYPE, content_type)
			.header("x-upsert", "false")
			.body(bytes)
			.send()
			.await?;
		Self::check(response).await?;
		tracing::debug!(path = %path, "object uploaded");
		Ok(self.public_url(path))
	}

	async fn remove(
		&self,
		path: &str,
	) -> Result<(), StorageError> {
		let url = format!("{}/storage/v1/object/{}", self.base_url, self.bucket);
		let response = self
			.http_client
			.delete(&url)
			.bearer_auth(&self.service_key)
			.header("apikey", &self.service_key)
			.json(&json!({ "prefixes": [path] }))
			.send()
			.await?;
		Self::check(response).await?;
		tracing::debug!(path = %path, "object removed");
		Ok(())
	}

	fn path_from_public_url(
		&self,
		url: &str,
	) -> Option<String> {
		object_path(url, &self.bucket)
	}
}

/// Keeps objects in memory. `set_failing(true)` makes every call fail.
pub struct InMemoryObjectStorage {
	base_url: String,
	bucket: String,
	objects: Mutex<HashMap<String, (String, Bytes)>>,
	failing: AtomicBool,
}

impl Default for InMemoryObjectStorage {
	fn default() -> Self {
		Self {
			base_url: "http://storage.local".into(),
			bucket: "uploads".into(),
			objects: Default::default(),
			failing: AtomicBool::new(false),
		}
	}
}

impl InMemoryObjectStorage {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn set_failing(
		&self,
		failing: bool,
	) {
		self.failing.store(failing, Ordering::SeqCst);
	}

	pub fn contains(
		&self,
		path: &str,
	) -> bool {
		self.objects.lock().map(|objects| objects.contains_key(path)).unwrap_or(false)
	}

	pub fn len(&self) -> usize {
		self.objects.lock().map(|objects| objects.len()).unwrap_or(0)
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	fn fail_if_requested(&self) -> Result<(), StorageError> {
		if self.failing.load(Ordering::SeqCst) {
			return Err(StorageError::Rejected {
				status: 503,
				message: "storage unavailable".into(),
			});
		}
		Ok(())
	}
}

#[async_trait]
impl ObjectStorage for InMemoryObjectStorage {
	async fn upload(
		&self,
		path: &str,
		content_type: &str,
		bytes: Bytes,
	) -> Result<String, StorageError> {
		self.fail_if_requested()?;
		if let Ok(mut objects) = self.objects.lock() {
			objects.insert(path.to_string(), (content_type.to_string(), bytes));
		}
		Ok(format!("{}{}{}/{}", self.base_url, PUBLIC_OBJECT_PREFIX, self.bucket, path))
	}

	async fn remove(
		&self,
		path: &str,
	) -> Result<(), StorageError> {
		self.fail_if_requested()?;
		let removed = self.objects.lock().map(|mut objects| objects.remove(path).is_some()).unwrap_or(false);
		if !removed {
			return Err(StorageError::NotFound(path.to_string()));
		}
		Ok(())
	}

	fn path_from_public_url(
		&self,
		url: &str,
	) -> Option<String> {
		object_path(url, &self.bucket)
	}
}
