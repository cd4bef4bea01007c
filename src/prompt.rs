//! Interactive authorization collaborators supplying user-entered verification codes.

// std
use std::io::{self, BufRead, Write};
// self
use crate::{_prelude::*, error::AuthError};

/// Supplies the user-entered verification code for a provider sign-in URL.
///
/// The boundary stays pluggable so automated tests can substitute a pre-recorded
/// code for the blocking console prompt.
pub trait CodeProvider
where
	Self: Send + Sync,
{
	/// Produces the verification code for the provider sign-in URL.
	fn provide(&self, authorize_url: &Url) -> Result<String, AuthError>;
}
impl<F> CodeProvider for F
where
	F: Send + Sync + Fn(&Url) -> Result<String, AuthError>,
{
	fn provide(&self, authorize_url: &Url) -> Result<String, AuthError> {
		self(authorize_url)
	}
}

/// Pre-recorded verification code for automated tests and replayed flows.
#[derive(Clone, Debug)]
pub struct StaticCode(String);
impl StaticCode {
	/// Wraps the code handed to every authorization attempt.
	pub fn new(code: impl Into<String>) -> Self {
		Self(code.into())
	}
}
impl CodeProvider for StaticCode {
	fn provide(&self, _: &Url) -> Result<String, AuthError> {
		Ok(self.0.clone())
	}
}

/// Blocking console prompt that prints the sign-in URL and reads the code from stdin.
#[derive(Clone, Copy, Debug, Default)]
pub struct StdinCodePrompt;
impl CodeProvider for StdinCodePrompt {
	fn provide(&self, authorize_url: &Url) -> Result<String, AuthError> {
		let mut stdout = io::stdout();

		writeln!(stdout, "Sign in here: {authorize_url}")
			.and_then(|_| write!(stdout, "Enter code: "))
			.and_then(|_| stdout.flush())
			.map_err(|e| AuthError::Aborted { reason: format!("console prompt failed: {e}") })?;

		let mut line = String::new();

		io::stdin()
			.lock()
			.read_line(&mut line)
			.map_err(|e| AuthError::Aborted { reason: format!("failed to read the code: {e}") })?;

		let code = line.trim();

		if code.is_empty() {
			return Err(AuthError::Aborted { reason: "no code was entered".into() });
		}

		Ok(code.to_owned())
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn authorize_url() -> Url {
		Url::parse("https://provider.example.com/authorize?token=abc")
			.expect("Authorize URL fixture should parse successfully.")
	}

	#[test]
	fn static_codes_ignore_the_url() {
		let provider = StaticCode::new("verifier-123");
		let code = provider
			.provide(&authorize_url())
			.expect("Static code provider should always succeed.");

		assert_eq!(code, "verifier-123");
	}

	#[test]
	fn closures_serve_as_code_providers() {
		let provider = |url: &Url| {
			if url.domain() == Some("provider.example.com") {
				Ok("closure-code".to_owned())
			} else {
				Err(AuthError::Aborted { reason: "unexpected provider".into() })
			}
		};
		let code = provider
			.provide(&authorize_url())
			.expect("Closure code provider should accept the fixture URL.");

		assert_eq!(code, "closure-code");
	}
}
