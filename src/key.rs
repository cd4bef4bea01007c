//! Application-level client key loading and validation.

// std
use std::{fs::File, io::Read, path::Path};
// self
use crate::{_prelude::*, credential::Secret, error::ConfigError};

/// Application client identifier + secret pair, immutable once loaded.
#[derive(Clone, Debug)]
pub struct ClientKey {
	client_id: String,
	client_secret: Secret,
}
impl ClientKey {
	/// Validates and assembles a key from its two parts.
	pub fn new(
		client_id: impl Into<String>,
		client_secret: impl Into<String>,
	) -> Result<Self, ConfigError> {
		let client_id = client_id.into();
		let client_secret = client_secret.into();

		if client_id.is_empty() {
			return Err(ConfigError::EmptyKeyField { field: "client_id" });
		}
		if client_secret.is_empty() {
			return Err(ConfigError::EmptyKeyField { field: "client_secret" });
		}

		Ok(Self { client_id, client_secret: Secret::new(client_secret) })
	}

	/// Reads exactly two whitespace- or line-separated tokens from the source.
	///
	/// Any other token count is a fatal configuration error; there is no partial or
	/// defaulted key.
	pub fn load(mut source: impl Read) -> Result<Self, ConfigError> {
		let mut raw = String::new();

		source.read_to_string(&mut raw)?;

		let tokens: Vec<_> = raw.split_whitespace().collect();

		match tokens.as_slice() {
			[client_id, client_secret] => Self::new(*client_id, *client_secret),
			other => Err(ConfigError::KeyTokenCount { found: other.len() }),
		}
	}

	/// Convenience helper that loads the key from a file path.
	pub fn load_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
		Self::load(File::open(path)?)
	}

	/// Application client identifier.
	pub fn client_id(&self) -> &str {
		&self.client_id
	}

	/// Application client secret. Callers must avoid logging it.
	pub fn client_secret(&self) -> &Secret {
		&self.client_secret
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn load_accepts_exactly_two_tokens() {
		let key = ClientKey::load("consumer-id consumer-secret".as_bytes())
			.expect("Two-token key source should load successfully.");

		assert_eq!(key.client_id(), "consumer-id");
		assert_eq!(key.client_secret().expose(), "consumer-secret");

		let newline_separated = ClientKey::load("consumer-id\nconsumer-secret\n".as_bytes())
			.expect("Line-separated key source should load successfully.");

		assert_eq!(newline_separated.client_id(), "consumer-id");
		assert_eq!(newline_separated.client_secret().expose(), "consumer-secret");
	}

	#[test]
	fn load_rejects_wrong_token_counts() {
		let err = ClientKey::load("only-one".as_bytes())
			.expect_err("Single-token key source must be rejected.");

		assert!(matches!(err, ConfigError::KeyTokenCount { found: 1 }));

		let err = ClientKey::load("one two three".as_bytes())
			.expect_err("Three-token key source must be rejected.");

		assert!(matches!(err, ConfigError::KeyTokenCount { found: 3 }));

		let err =
			ClientKey::load("".as_bytes()).expect_err("Empty key source must be rejected.");

		assert!(matches!(err, ConfigError::KeyTokenCount { found: 0 }));
	}

	#[test]
	fn new_rejects_empty_fields() {
		let err = ClientKey::new("", "secret").expect_err("Empty client id must be rejected.");

		assert!(matches!(err, ConfigError::EmptyKeyField { field: "client_id" }));

		let err = ClientKey::new("id", "").expect_err("Empty client secret must be rejected.");

		assert!(matches!(err, ConfigError::EmptyKeyField { field: "client_secret" }));
	}

	#[test]
	fn debug_redacts_the_secret() {
		let key = ClientKey::new("consumer-id", "consumer-secret")
			.expect("Key fixture should be valid.");
		let rendered = format!("{key:?}");

		assert!(rendered.contains("consumer-id"));
		assert!(!rendered.contains("consumer-secret"));
	}
}
