use jsonwebtoken::{decode, errors::Error as JwtError, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IdentityError {
	#[error("invalid session token: {0}")]
	InvalidToken(#[from] JwtError),
	#[error("session token carries no subject")]
	MissingSubject,
}

/// Claims of a session token issued by the identity provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
	pub sub: String,
	pub exp: i64,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub iss: Option<String>,
}

/// Turns a bearer token into the external identity subject it asserts.
pub trait IdentityVerifier: Send + Sync {
	fn verify(
		&self,
		token: &str,
	) -> Result<String, IdentityError>;
}

pub struct JwtVerifier {
	key: DecodingKey,
	validation: Validation,
}

impl JwtVerifier {
	pub fn hs256(
		secret: &[u8],
		issuer: Option<&str>,
	) -> Self {
		Self::with_key(DecodingKey::from_secret(secret), Algorithm::HS256, issuer)
	}

	pub fn rs256_pem(
		public_key_pem: &[u8],
		issuer: Option<&str>,
	) -> Result<Self, IdentityError> {
		Ok(Self::with_key(DecodingKey::from_rsa_pem(public_key_pem)?, Algorithm::RS256, issuer))
	}

	fn with_key(
		key: DecodingKey,
		algorithm: Algorithm,
		issuer: Option<&str>,
	) -> Self {
		let mut validation = Validation::new(algorithm);
		if let Some(issuer) = issuer {
			validation.set_issuer(&[issuer]);
		}
		Self { key, validation }
	}
}

impl IdentityVerifier for JwtVerifier {
	fn verify(
		&self,
		token: &str,
	) -> Result<String, IdentityError> {
		let data = decode::<SessionClaims>(token, &self.key, &self.validation)?;
		let subject = data.claims.sub.trim();
		if subject.is_empty() {
			return Err(IdentityError::MissingSubject);
		}
		Ok(subject.to_string())
	}
}
