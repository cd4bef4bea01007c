//! Capability contracts for the external OAuth transport.
//!
//! The handshake wire protocol and request signing live behind [`OAuthTransport`];
//! this crate only drives the credential lifecycle and paced dispatch on top of it.
//! Implementations own endpoint URLs, wire formats, and signing for either provider
//! style, surfacing rejected exchanges as [`AuthError`](crate::error::AuthError)
//! values and everything else as [`TransportError`](crate::error::TransportError).

// self
use crate::{
	_prelude::*,
	credential::{RefreshCapability, Secret, TokenGrant},
};

/// Boxed future returned by [`OAuthTransport`] operations.
pub type TransportFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + 'a + Send>>;

/// External OAuth transport capability: raw handshake exchanges plus signed dispatch.
pub trait OAuthTransport
where
	Self: Send + Sync,
{
	/// Produces the provider sign-in URL for the interactive authorization flow.
	fn authorize_url(&self) -> TransportFuture<'_, Url>;

	/// Exchanges a user-entered verification code for the initial grant.
	fn exchange_code<'a>(&'a self, code: &'a str) -> TransportFuture<'a, TokenGrant>;

	/// Exchanges the stored refresh capability for a fresh grant.
	///
	/// Session-handle transports also receive the current access token, since that
	/// exchange presents it alongside the paired token secret.
	fn refresh_grant<'a>(
		&'a self,
		access_token: Option<&'a Secret>,
		capability: &'a RefreshCapability,
	) -> TransportFuture<'a, TokenGrant>;

	/// Dispatches a signed request with the provided access token, returning the raw
	/// response untouched.
	fn send<'a>(
		&'a self,
		access_token: &'a Secret,
		request: &'a RequestDescriptor,
	) -> TransportFuture<'a, ApiResponse>;
}

/// Identifies a target resource plus optional query parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RequestDescriptor {
	resource: String,
	params: BTreeMap<String, String>,
}
impl RequestDescriptor {
	/// Creates a descriptor for the provided resource path.
	pub fn new(resource: impl Into<String>) -> Self {
		Self { resource: resource.into(), params: BTreeMap::new() }
	}

	/// Appends a query parameter.
	pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.params.insert(key.into(), value.into());

		self
	}

	/// Target resource path, relative to the transport's base API URL.
	pub fn resource(&self) -> &str {
		&self.resource
	}

	/// Query parameters in deterministic (sorted) order.
	pub fn params(&self) -> impl Iterator<Item = (&str, &str)> {
		self.params.iter().map(|(key, value)| (key.as_str(), value.as_str()))
	}

	/// Resolves the descriptor against a base API URL, encoding the query pairs.
	pub fn to_url(&self, base: &Url) -> Result<Url, url::ParseError> {
		let mut url = base.join(&self.resource)?;

		if !self.params.is_empty() {
			let mut pairs = url.query_pairs_mut();

			for (key, value) in &self.params {
				pairs.append_pair(key, value);
			}

			drop(pairs);
		}

		Ok(url)
	}
}

/// Raw response handed back by the transport, untouched by this layer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiResponse {
	/// HTTP status code reported by the transport.
	pub status: u16,
	/// Raw response body bytes.
	pub body: Vec<u8>,
}
impl ApiResponse {
	/// Returns `true` for 2xx statuses.
	pub fn is_success(&self) -> bool {
		(200..300).contains(&self.status)
	}
}
