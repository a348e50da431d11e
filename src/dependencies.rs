use std::sync::{Arc, OnceLock};

use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::adapters::{
	identity::{IdentityVerifier, JwtVerifier},
	storage::HttpObjectStorage,
};
use crate::config::Config;
use crate::services::response::ServiceError;

pub fn config() -> Result<&'static Config, ServiceError> {
	static CONFIG: OnceLock<Config> = OnceLock::new();
	let config = match CONFIG.get() {
		None => {
			let config = Config::new()?;

			CONFIG.get_or_init(|| config)
		}
		Some(config) => config,
	};
	Ok(config)
}

pub async fn connection_pool() -> Result<&'static PgPool, ServiceError> {
	static POOL: OnceLock<PgPool> = OnceLock::new();

	let p = match POOL.get() {
		None => {
			let config = config()?;
			let pool = PgPoolOptions::new()
				.max_connections(config.db_max_connections)
				.connect(&config.database_url)
				.await
				.map_err(|err| ServiceError::Store(err.into()))?;
			POOL.get_or_init(|| pool)
		}
		Some(pool) => pool,
	};
	Ok(p)
}

pub fn object_storage() -> Result<Arc<HttpObjectStorage>, ServiceError> {
	let storage = &config()?.storage;
	Ok(Arc::new(HttpObjectStorage::new(&storage.url, &storage.service_key, &storage.bucket)?))
}

pub fn identity_verifier() -> Result<Arc<dyn IdentityVerifier>, ServiceError> {
	let auth = &config()?.auth;
	let issuer = auth.issuer.as_deref();
	let verifier = match (&auth.jwt_public_key, &auth.jwt_secret) {
		(Some(pem), _) => JwtVerifier::rs256_pem(pem.as_bytes(), issuer)
			.map_err(|err| ServiceError::Config(format!("AUTH_JWT_PUBLIC_KEY: {err}")))?,
		(None, Some(secret)) => JwtVerifier::hs256(secret.as_bytes(), issuer),
		(None, None) => return Err(ServiceError::Config("no token verification key configured".into())),
	};
	Ok(Arc::new(verifier))
}
