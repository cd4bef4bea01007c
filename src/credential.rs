//! Delegated-access credential model: one grant lineage, its expiry, and its
//! refresh-or-authorize lifecycle.
//!
//! A [`Credential`] mutates in place across refreshes (new access token + new expiry)
//! while its refresh capability survives every transition, so once a grant is
//! refresh-capable no lifecycle step ever needs interactive input again, barring
//! provider-side revocation.

pub mod secret;

pub use secret::Secret;

// self
use crate::{_prelude::*, error::ConfigError, prompt::CodeProvider, transport::OAuthTransport};

/// Long-lived capability used to obtain a new access token without user interaction.
///
/// The two provider styles are variants of one capability, so the client logic is
/// written once against this type instead of per style.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RefreshCapability {
	/// Refresh-token style: the token alone drives the exchange.
	RefreshToken(Secret),
	/// Session-handle style: the exchange presents the current access token together
	/// with its paired token secret and the provider-issued handle.
	SessionHandle {
		/// Secret paired with the current access token.
		token_secret: Secret,
		/// Provider-issued session handle.
		handle: Secret,
	},
}

/// Lifecycle states of a [`Credential`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CredentialState {
	/// No grant material at all; interactive authorization is required.
	Uninitialized,
	/// Interactive authorization is in flight.
	PendingAuthorization,
	/// Grant material is present and usable, possibly past its expiry.
	Active,
	/// A refresh exchange is in flight.
	Refreshing,
}

/// Grant material returned by the transport from a code or refresh exchange.
#[derive(Clone, Debug)]
pub struct TokenGrant {
	/// Freshly issued access token.
	pub access_token: Secret,
	/// Replacement refresh capability, present only when the provider rotates it.
	pub refresh: Option<RefreshCapability>,
	/// Provider-reported access token lifetime.
	pub expires_in: Duration,
}

/// One user's delegated-access grant and its lifecycle.
#[derive(Clone, Debug)]
pub struct Credential {
	access_token: Option<Secret>,
	refresh: Option<RefreshCapability>,
	expires_at: OffsetDateTime,
	state: CredentialState,
}
impl Credential {
	/// Creates a virgin credential that requires interactive authorization.
	pub fn uninitialized() -> Self {
		Self {
			access_token: None,
			refresh: None,
			expires_at: OffsetDateTime::UNIX_EPOCH,
			state: CredentialState::Uninitialized,
		}
	}

	/// Creates a credential from a bare refresh capability with no known expiry.
	///
	/// The credential reports itself expired until the first refresh completes.
	pub fn from_refresh_capability(refresh: RefreshCapability) -> Self {
		Self {
			access_token: None,
			refresh: Some(refresh),
			expires_at: OffsetDateTime::UNIX_EPOCH,
			state: CredentialState::Active,
		}
	}

	/// Current lifecycle state.
	pub fn state(&self) -> CredentialState {
		self.state
	}

	/// Currently held access token, if any.
	pub fn access_token(&self) -> Option<&Secret> {
		self.access_token.as_ref()
	}

	/// Currently held refresh capability, if any.
	pub fn refresh_capability(&self) -> Option<&RefreshCapability> {
		self.refresh.as_ref()
	}

	/// Instant at which the access token becomes invalid.
	pub fn expires_at(&self) -> OffsetDateTime {
		self.expires_at
	}

	/// Returns `true` iff no refresh mechanism is present, so interactive
	/// authorization is the only way to obtain a usable access token.
	pub fn needs_authorization(&self) -> bool {
		self.refresh.is_none()
	}

	/// Checks whether the access token is due for refresh at `instant`.
	///
	/// The boundary is inclusive: exactly `expires_at - skew` counts as expired. A
	/// credential holding no access token is always due.
	pub fn is_expired_at(&self, instant: OffsetDateTime, skew: Duration) -> bool {
		if self.access_token.is_none() {
			return true;
		}

		instant >= self.expires_at - skew
	}

	/// Convenience helper that checks expiry against the current UTC instant.
	pub fn is_expired(&self, skew: Duration) -> bool {
		self.is_expired_at(OffsetDateTime::now_utc(), skew)
	}

	/// Runs the interactive authorization flow through the transport.
	///
	/// Obtains the provider sign-in URL, asks `codes` for the user-entered
	/// verification code, exchanges the code for the initial grant, and stamps
	/// `expires_at = now + ttl`. On success the credential transitions to
	/// [`CredentialState::Active`]; on failure it returns to
	/// [`CredentialState::Uninitialized`] untouched.
	pub async fn authorize(
		&mut self,
		transport: &dyn OAuthTransport,
		codes: &dyn CodeProvider,
		now: OffsetDateTime,
	) -> Result<()> {
		self.state = CredentialState::PendingAuthorization;

		let outcome = self.authorize_inner(transport, codes, now).await;

		self.state = match &outcome {
			Ok(()) => CredentialState::Active,
			Err(_) => CredentialState::Uninitialized,
		};

		outcome
	}

	async fn authorize_inner(
		&mut self,
		transport: &dyn OAuthTransport,
		codes: &dyn CodeProvider,
		now: OffsetDateTime,
	) -> Result<()> {
		let authorize_url = transport.authorize_url().await?;
		let code = codes.provide(&authorize_url)?;
		let grant = transport.exchange_code(&code).await?;

		self.apply_grant(grant, now)
	}

	/// Exchanges the stored refresh capability for a fresh access token.
	///
	/// The capability is preserved unless the provider issues a replacement. A
	/// rejected exchange propagates as [`AuthError`](crate::error::AuthError) and is
	/// never retried here, since retrying without new interactive input cannot
	/// succeed.
	pub async fn refresh(
		&mut self,
		transport: &dyn OAuthTransport,
		now: OffsetDateTime,
	) -> Result<()> {
		let previous = self.state;

		self.state = CredentialState::Refreshing;

		let exchanged = match &self.refresh {
			Some(capability) =>
				transport.refresh_grant(self.access_token.as_ref(), capability).await,
			None => Err(ConfigError::MissingRefreshCapability.into()),
		};
		let outcome = match exchanged {
			Ok(grant) => self.apply_grant(grant, now),
			Err(e) => Err(e),
		};

		self.state = match &outcome {
			Ok(()) => CredentialState::Active,
			Err(_) => previous,
		};

		outcome
	}

	/// Snapshot of the credential in its persisted form.
	pub fn to_record(&self) -> CredentialRecord {
		let (refresh_token, token_secret, session_handle) = match &self.refresh {
			Some(RefreshCapability::RefreshToken(token)) => (Some(token.clone()), None, None),
			Some(RefreshCapability::SessionHandle { token_secret, handle }) =>
				(None, Some(token_secret.clone()), Some(handle.clone())),
			None => (None, None, None),
		};

		CredentialRecord {
			access_token: self.access_token.clone(),
			refresh_token,
			token_secret,
			session_handle,
			expires_at: self.expires_at,
		}
	}

	fn apply_grant(&mut self, grant: TokenGrant, now: OffsetDateTime) -> Result<()> {
		if !grant.expires_in.is_positive() {
			return Err(ConfigError::NonPositiveGrantTtl.into());
		}

		self.access_token = Some(grant.access_token);
		self.expires_at = now + grant.expires_in;

		if let Some(capability) = grant.refresh {
			self.refresh = Some(capability);
		}

		Ok(())
	}
}
impl Default for Credential {
	fn default() -> Self {
		Self::uninitialized()
	}
}

/// Persisted form of a [`Credential`].
///
/// The expiry instant persists verbatim and is restored as-is; the loader never
/// recomputes the lifetime.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialRecord {
	/// Access token, when one had been issued at save time.
	pub access_token: Option<Secret>,
	/// Refresh-token-style capability.
	pub refresh_token: Option<Secret>,
	/// Session-handle-style token secret paired with the access token.
	pub token_secret: Option<Secret>,
	/// Session-handle-style provider handle.
	pub session_handle: Option<Secret>,
	/// Expiry instant persisted verbatim.
	pub expires_at: OffsetDateTime,
}
impl CredentialRecord {
	/// Builds the record form of a bare refresh-token-only layout.
	///
	/// The resulting credential is immediately due for refresh, since the bare
	/// layout carries no expiry.
	pub fn bare_refresh_token(token: impl Into<String>) -> Self {
		Self {
			access_token: None,
			refresh_token: Some(Secret::new(token)),
			token_secret: None,
			session_handle: None,
			expires_at: OffsetDateTime::UNIX_EPOCH,
		}
	}

	/// Reconstructs a credential, deriving the refresh capability from the stored
	/// fields. A refresh token wins over session-handle fields when both exist.
	pub fn into_credential(self) -> Result<Credential, ConfigError> {
		let refresh = match (self.refresh_token, self.token_secret, self.session_handle) {
			(Some(token), _, _) => Some(RefreshCapability::RefreshToken(token)),
			(None, Some(token_secret), Some(handle)) =>
				Some(RefreshCapability::SessionHandle { token_secret, handle }),
			(None, Some(_), None) | (None, None, Some(_)) =>
				return Err(ConfigError::MalformedCredentialRecord {
					message: "a session-handle record requires both token_secret and \
					          session_handle"
						.into(),
				}),
			(None, None, None) => None,
		};
		let state = if refresh.is_some() || self.access_token.is_some() {
			CredentialState::Active
		} else {
			CredentialState::Uninitialized
		};

		Ok(Credential { access_token: self.access_token, refresh, expires_at: self.expires_at, state })
	}
}
