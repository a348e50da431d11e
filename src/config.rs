use crate::services::response::ServiceError;

pub struct Config {
	/// Which errors we want to log
	pub log_level: String,

	/// Port server is listening to
	pub server_ip_port: String,
	pub database_url: String,
	pub db_max_connections: u32,
	pub allow_origins: String,
	pub storage: StorageConfig,
	pub auth: AuthConfig,
	pub posts_per_page: i64,
	pub run_migrations: bool,
}

pub struct StorageConfig {
	pub url: String,
	pub service_key: String,
	pub bucket: String,
}

/// Exactly one of `jwt_secret` (HS256) and `jwt_public_key` (RS256 PEM) is used;
/// the public key wins when both are set.
pub struct AuthConfig {
	pub jwt_secret: Option<String>,
	pub jwt_public_key: Option<String>,
	pub issuer: Option<String>,
}

impl Config {
	pub fn new() -> Result<Config, ServiceError> {
		dotenv::dotenv().ok();
		Self::from_lookup(|key| std::env::var(key).ok())
	}

	pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Config, ServiceError> {
		let required = |key: &str| lookup(key).filter(|v| !v.is_empty()).ok_or_else(|| ServiceError::Config(format!("{key} must be set")));
		let optional = |key: &str| lookup(key).filter(|v| !v.is_empty());

		let log_level = optional("LOG_LEVEL").unwrap_or("info".to_string());
		let server_ip_port = optional("SERVER_IP_PORT").unwrap_or("0.0.0.0:80".into());
		let database_url = required("DATABASE_URL")?;
		let db_max_connections = parse_or("DB_MAX_CONNECTIONS", optional("DB_MAX_CONNECTIONS"), 30)?;
		let allow_origins = optional("ALLOW_ORIGINS").unwrap_or("http://localhost:3000,http://localhost:3001".to_string());

		let storage = StorageConfig {
			url: required("STORAGE_URL")?,
			service_key: required("STORAGE_SERVICE_KEY")?,
			bucket: optional("STORAGE_BUCKET").unwrap_or("uploads".into()),
		};

		let auth = AuthConfig {
			jwt_secret: optional("AUTH_JWT_SECRET"),
			jwt_public_key: optional("AUTH_JWT_PUBLIC_KEY"),
			issuer: optional("AUTH_JWT_ISSUER"),
		};
		if auth.jwt_secret.is_none() && auth.jwt_public_key.is_none() {
			return Err(ServiceError::Config("AUTH_JWT_SECRET or AUTH_JWT_PUBLIC_KEY must be set".into()));
		}

		let posts_per_page = parse_or("POSTS_PER_PAGE", optional("POSTS_PER_PAGE"), 10)?;
		if posts_per_page < 1 {
			return Err(ServiceError::Config("POSTS_PER_PAGE must be positive".into()));
		}
		let run_migrations = parse_or("RUN_MIGRATIONS", optional("RUN_MIGRATIONS"), false)?;

		Ok(Config {
			log_level,
			server_ip_port,
			database_url,
			db_max_connections,
			allow_origins,
			storage,
			auth,
			posts_per_page,
			run_migrations,
		})
	}
}

fn parse_or<T: std::str::FromStr>(
	key: &str,
	raw: Option<String>,
	default: T,
) -> Result<T, ServiceError> {
	match raw {
		None => Ok(default),
		Some(raw) => raw.parse().map_err(|_| ServiceError::Config(format!("{key} has an invalid value: {raw}"))),
	}
}

#[cfg(test)]
mod test {
	use std::collections::HashMap;

	use super::Config;

	fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
		let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
		move |key| map.get(key).cloned()
	}

	const BASE: [(&str, &str); 4] = [
		("DATABASE_URL", "postgres://localhost/feed"),
		("STORAGE_URL", "https://x.supabase.co"),
		("STORAGE_SERVICE_KEY", "service"),
		("AUTH_JWT_SECRET", "secret"),
	];

	#[test]
	fn test_default_values() {
		let config = Config::from_lookup(lookup(&BASE)).unwrap();
		assert_eq!(config.log_level, "info");
		assert_eq!(config.server_ip_port, "0.0.0.0:80");
		assert_eq!(config.db_max_connections, 30);
		assert_eq!(config.storage.bucket, "uploads");
		assert_eq!(config.posts_per_page, 10);
		assert!(!config.run_migrations);
	}

	#[test]
	fn test_missing_required_values() {
		assert!(Config::from_lookup(lookup(&BASE[..3])).is_err());
		assert!(Config::from_lookup(lookup(&BASE[1..])).is_err());
	}

	#[test]
	fn test_overrides() {
		let mut pairs = BASE.to_vec();
		pairs.extend([("POSTS_PER_PAGE", "25"), ("RUN_MIGRATIONS", "true"), ("STORAGE_BUCKET", "media")]);
		let config = Config::from_lookup(lookup(&pairs)).unwrap();
		assert_eq!(config.posts_per_page, 25);
		assert!(config.run_migrations);
		assert_eq!(config.storage.bucket, "media");

		pairs.push(("POSTS_PER_PAGE", "zero"));
		assert!(Config::from_lookup(lookup(&pairs)).is_err());
	}
}
