//! Redacted wrapper keeping grant material out of logs.

// self
use crate::_prelude::*;

/// Redacted wrapper for access tokens, refresh tokens, client secrets, and session
/// handles.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Secret(String);
impl Secret {
	/// Wraps a new secret string.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the inner value. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.0
	}
}
impl AsRef<str> for Secret {
	fn as_ref(&self) -> &str {
		self.expose()
	}
}
impl Debug for Secret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("Secret").field(&"<redacted>").finish()
	}
}
impl Display for Secret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn secret_formatters_redact() {
		let secret = Secret::new("super-secret");

		assert_eq!(format!("{secret:?}"), "Secret(\"<redacted>\")");
		assert_eq!(format!("{secret}"), "<redacted>");
		assert_eq!(secret.expose(), "super-secret");
	}

	#[test]
	fn serde_round_trip_preserves_the_value() {
		let secret = Secret::new("round-trip");
		let payload =
			serde_json::to_string(&secret).expect("Secret should serialize to JSON.");

		assert_eq!(payload, "\"round-trip\"");

		let restored: Secret =
			serde_json::from_str(&payload).expect("Secret should deserialize from JSON.");

		assert_eq!(restored, secret);
	}
}
