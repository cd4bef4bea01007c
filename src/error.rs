//! Client-level error types shared across the credential lifecycle, stores, and transports.

// self
use crate::_prelude::*;

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical client error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem; fatal at construction and never retried.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Provider rejected an authorization or refresh exchange.
	#[error(transparent)]
	Auth(#[from] AuthError),
	/// Storage-backend failure while loading or replacing persisted state.
	#[error("{0}")]
	Storage(#[source] crate::store::StoreError),
	/// Transport failure unrelated to authentication (DNS, TCP, TLS, unexpected responses).
	#[error(transparent)]
	Transport(#[from] TransportError),
}
impl From<crate::store::StoreError> for Error {
	fn from(e: crate::store::StoreError) -> Self {
		match e {
			// Format violations keep their fatal configuration classification; only
			// genuine backend failures surface as storage errors.
			crate::store::StoreError::Malformed { message } =>
				ConfigError::MalformedCredentialRecord { message }.into(),
			other => Self::Storage(other),
		}
	}
}

/// Configuration and validation failures raised during construction.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// Key source did not contain exactly two tokens.
	#[error("Key source must contain exactly two tokens, found {found}.")]
	KeyTokenCount {
		/// Number of whitespace-separated tokens actually present.
		found: usize,
	},
	/// A key field was empty.
	#[error("Key field `{field}` cannot be empty.")]
	EmptyKeyField {
		/// Offending field name.
		field: &'static str,
	},
	/// Key source could not be read.
	#[error("Key source could not be read.")]
	KeySourceRead(#[from] std::io::Error),
	/// Persisted credential state violates both accepted layouts.
	#[error("Persisted credential record is malformed: {message}.")]
	MalformedCredentialRecord {
		/// Human-readable description of the violation.
		message: String,
	},
	/// No interactive code provider is configured for a first-time authorization.
	#[error("Credential requires interactive authorization but no code provider is configured.")]
	MissingCodeProvider,
	/// Refresh was requested on a credential with no refresh capability.
	#[error("Credential has no refresh capability; interactive authorization is required.")]
	MissingRefreshCapability,
	/// Session binding was requested on a credential holding no access token.
	#[error("Credential holds no access token to bind.")]
	MissingAccessToken,
	/// Token grant reported a non-positive lifetime.
	#[error("The grant lifetime must be positive.")]
	NonPositiveGrantTtl,
}

/// Authorization and refresh exchange rejections surfaced by the transport.
///
/// None of these are retried automatically: a rejected refresh cannot succeed without
/// new interactive input, so the decision belongs to the caller.
#[derive(Debug, ThisError)]
pub enum AuthError {
	/// Provider rejected the user-supplied verification code.
	#[error("Provider rejected the verification code: {reason}.")]
	CodeRejected {
		/// Provider- or transport-supplied reason string.
		reason: String,
	},
	/// Provider rejected the refresh exchange (expired or revoked grant).
	#[error("Provider rejected the refresh exchange: {reason}.")]
	RefreshRejected {
		/// Provider- or transport-supplied reason string.
		reason: String,
	},
	/// Grant has been revoked and must not be reused.
	#[error("Grant has been revoked.")]
	Revoked,
	/// Interactive authorization was aborted before a code was produced.
	#[error("Interactive authorization was aborted: {reason}.")]
	Aborted {
		/// Reason supplied by the code provider.
		reason: String,
	},
}

/// Transport-level failures (network, IO, unexpected endpoint responses).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the provider.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the provider.")]
	Io(#[from] std::io::Error),
	/// Provider endpoint returned an unexpected response.
	#[error("Provider returned an unexpected response: {message}.")]
	Endpoint {
		/// Human-readable summary of the response.
		message: String,
		/// HTTP status code, when available.
		status: Option<u16>,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
