//! Token-bound send handle, rebuilt whenever the credential rotates its access token.

// self
use crate::{
	_prelude::*,
	credential::{Credential, Secret},
	error::ConfigError,
	key::ClientKey,
	transport::{ApiResponse, OAuthTransport, RequestDescriptor},
};

/// Binds the credential's current access token to the transport used for signed
/// dispatch.
///
/// Sessions are rebuilt, never mutated: the binding is tied to one token value at
/// construction, so whenever the access token changes the owner constructs a fresh
/// session via [`AuthSession::bind`].
#[derive(Clone)]
pub struct AuthSession {
	client_id: String,
	token: Secret,
	transport: Arc<dyn OAuthTransport>,
}
impl AuthSession {
	/// Constructs a transport binding carrying the credential's current access token.
	///
	/// Pure rebuild; neither input is mutated.
	pub fn bind(
		key: &ClientKey,
		credential: &Credential,
		transport: Arc<dyn OAuthTransport>,
	) -> Result<Self> {
		let token = credential.access_token().cloned().ok_or(ConfigError::MissingAccessToken)?;

		Ok(Self { client_id: key.client_id().to_owned(), token, transport })
	}

	/// Application client identifier the session was bound for.
	pub fn client_id(&self) -> &str {
		&self.client_id
	}

	/// Access token currently bound to this session.
	pub fn token(&self) -> &Secret {
		&self.token
	}

	/// Dispatches a request through the bound transport with the bound token.
	///
	/// No retry logic lives here; refresh-and-rebind on auth failure is the owner's
	/// responsibility.
	pub async fn send(&self, request: &RequestDescriptor) -> Result<ApiResponse> {
		self.transport.send(&self.token, request).await
	}
}
impl Debug for AuthSession {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("AuthSession")
			.field("client_id", &self.client_id)
			.field("token", &self.token)
			.finish()
	}
}
