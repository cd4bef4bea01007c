//! Public client: paced dispatch with proactive credential refresh.
//!
//! [`RateLimitedClient`] owns one [`Credential`] and its bound
//! [`AuthSession`] for its whole lifetime. Every
//! [`request`](RateLimitedClient::request) passes through the pacing gate, then a
//! pre-flight expiry check that may refresh and rebind, then the bound session.
//! The pacing-check, refresh, and send steps run as one critical section, so
//! concurrent callers sharing a client never observe a stale token as "not yet
//! due" and never sleep redundantly. Independent clients share nothing.

// self
use crate::{
	_prelude::*,
	clock::{Clock, SystemClock},
	credential::{Credential, CredentialState},
	error::ConfigError,
	key::ClientKey,
	obs::{self, LifecycleKind, LifecycleOutcome, LifecycleSpan},
	prompt::CodeProvider,
	session::AuthSession,
	store::{CredentialStore, MemoryStore},
	transport::{ApiResponse, OAuthTransport, RequestDescriptor},
};

/// Minimum spacing between outbound requests unless overridden.
pub const DEFAULT_MIN_INTERVAL: Duration = Duration::seconds(2);
/// Proactive-refresh margin subtracted from the credential expiry unless overridden.
pub const DEFAULT_REFRESH_SKEW: Duration = Duration::seconds(60);

/// Builder assembling a [`RateLimitedClient`] and its collaborators.
pub struct RateLimitedClientBuilder {
	key: ClientKey,
	transport: Arc<dyn OAuthTransport>,
	store: Arc<dyn CredentialStore>,
	clock: Arc<dyn Clock>,
	code_provider: Option<Arc<dyn CodeProvider>>,
	min_interval: Duration,
	refresh_skew: Duration,
}
impl RateLimitedClientBuilder {
	fn new(key: ClientKey, transport: Arc<dyn OAuthTransport>) -> Self {
		Self {
			key,
			transport,
			store: Arc::new(MemoryStore::default()),
			clock: Arc::new(SystemClock),
			code_provider: None,
			min_interval: DEFAULT_MIN_INTERVAL,
			refresh_skew: DEFAULT_REFRESH_SKEW,
		}
	}

	/// Sets the persistence adapter for the credential.
	///
	/// Defaults to an in-process [`MemoryStore`], i.e. no durable persistence.
	pub fn with_store(mut self, store: Arc<dyn CredentialStore>) -> Self {
		self.store = store;

		self
	}

	/// Sets the interactive collaborator supplying verification codes.
	///
	/// Required only when the persisted state cannot avoid a first-time
	/// authorization.
	pub fn with_code_provider(mut self, provider: Arc<dyn CodeProvider>) -> Self {
		self.code_provider = Some(provider);

		self
	}

	/// Replaces the wall clock used for pacing and expiry checks.
	pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
		self.clock = clock;

		self
	}

	/// Overrides the minimum spacing between requests; zero disables the gate.
	pub fn with_min_interval(mut self, interval: Duration) -> Self {
		self.min_interval = if interval.is_negative() { Duration::ZERO } else { interval };

		self
	}

	/// Overrides the proactive-refresh margin.
	pub fn with_refresh_skew(mut self, skew: Duration) -> Self {
		self.refresh_skew = if skew.is_negative() { Duration::ZERO } else { skew };

		self
	}

	/// Loads or interactively obtains the credential, binds the session, and
	/// produces a ready client.
	///
	/// A loaded credential already inside the refresh window is refreshed eagerly
	/// here, so startup failures surface immediately instead of on the first
	/// request. Both the initial authorization and the eager refresh persist the
	/// credential best-effort.
	pub async fn connect(self) -> Result<RateLimitedClient> {
		let Self { key, transport, store, clock, code_provider, min_interval, refresh_skew } =
			self;
		let mut credential = match store.load().await? {
			Some(record) => record.into_credential()?,
			None => Credential::uninitialized(),
		};
		let now = clock.now();

		if credential.needs_authorization() {
			const KIND: LifecycleKind = LifecycleKind::Authorize;

			let codes = code_provider.ok_or(ConfigError::MissingCodeProvider)?;
			let span = LifecycleSpan::new(KIND, "connect");

			obs::record_lifecycle_outcome(KIND, LifecycleOutcome::Attempt);

			let outcome = span
				.instrument(credential.authorize(transport.as_ref(), codes.as_ref(), now))
				.await;

			record_outcome(KIND, &outcome);
			outcome?;
			persist_best_effort(store.as_ref(), &credential, "authorize").await;
		} else if credential.is_expired_at(now, refresh_skew) {
			refresh_and_persist(transport.as_ref(), store.as_ref(), &mut credential, now, "connect")
				.await?;
		}

		let session = AuthSession::bind(&key, &credential, Arc::clone(&transport))?;
		let last_request_at = clock.now();

		Ok(RateLimitedClient {
			key,
			transport,
			store,
			clock,
			min_interval,
			refresh_skew,
			inner: AsyncMutex::new(ClientInner { credential, session, last_request_at }),
		})
	}
}

/// Public-facing client wrapping an [`AuthSession`] behind the pacing gate and the
/// proactive refresh gate.
pub struct RateLimitedClient {
	key: ClientKey,
	transport: Arc<dyn OAuthTransport>,
	store: Arc<dyn CredentialStore>,
	clock: Arc<dyn Clock>,
	min_interval: Duration,
	refresh_skew: Duration,
	inner: AsyncMutex<ClientInner>,
}
struct ClientInner {
	credential: Credential,
	session: AuthSession,
	last_request_at: OffsetDateTime,
}
impl RateLimitedClient {
	/// Starts a builder for the provided key + transport pair.
	pub fn builder(
		key: ClientKey,
		transport: Arc<dyn OAuthTransport>,
	) -> RateLimitedClientBuilder {
		RateLimitedClientBuilder::new(key, transport)
	}

	/// Minimum spacing enforced between outbound requests.
	pub fn min_interval(&self) -> Duration {
		self.min_interval
	}

	/// Proactive-refresh margin subtracted from the credential expiry.
	pub fn refresh_skew(&self) -> Duration {
		self.refresh_skew
	}

	/// Snapshot of the owned credential.
	pub async fn credential(&self) -> Credential {
		self.inner.lock().await.credential.clone()
	}

	/// Lifecycle state of the owned credential.
	pub async fn credential_state(&self) -> CredentialState {
		self.inner.lock().await.credential.state()
	}

	/// Instant stamped by the previous request cycle, consumed by the pacing gate.
	pub async fn last_request_at(&self) -> OffsetDateTime {
		self.inner.lock().await.last_request_at
	}

	/// Dispatches one request through the pacing gate, the pre-flight expiry check,
	/// and the bound session. The response comes back verbatim: no caching and no
	/// retries at this layer.
	pub async fn request(&self, request: &RequestDescriptor) -> Result<ApiResponse> {
		const KIND: LifecycleKind = LifecycleKind::Request;

		let span = LifecycleSpan::new(KIND, "request");

		obs::record_lifecycle_outcome(KIND, LifecycleOutcome::Attempt);

		let result = span.instrument(self.request_paced(request)).await;

		record_outcome(KIND, &result);

		result
	}

	async fn request_paced(&self, request: &RequestDescriptor) -> Result<ApiResponse> {
		let mut inner = self.inner.lock().await;
		let elapsed = self.clock.now() - inner.last_request_at;

		// A backward clock step yields a negative elapsed value; that must never be
		// misread as "due", so only 0 <= elapsed < min_interval blocks.
		if !self.min_interval.is_zero() && !elapsed.is_negative() && elapsed < self.min_interval
		{
			self.clock.sleep(self.min_interval - elapsed).await;
		}

		// One post-wait instant feeds both the pacing stamp and the expiry check.
		let now = self.clock.now();

		inner.last_request_at = now;

		if inner.credential.is_expired_at(now, self.refresh_skew) {
			refresh_and_persist(
				self.transport.as_ref(),
				self.store.as_ref(),
				&mut inner.credential,
				now,
				"request",
			)
			.await?;

			inner.session =
				AuthSession::bind(&self.key, &inner.credential, Arc::clone(&self.transport))?;
		}

		inner.session.send(request).await
	}
}
impl Debug for RateLimitedClient {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("RateLimitedClient")
			.field("key", &self.key)
			.field("min_interval", &self.min_interval)
			.field("refresh_skew", &self.refresh_skew)
			.finish()
	}
}

async fn refresh_and_persist(
	transport: &dyn OAuthTransport,
	store: &dyn CredentialStore,
	credential: &mut Credential,
	now: OffsetDateTime,
	stage: &'static str,
) -> Result<()> {
	const KIND: LifecycleKind = LifecycleKind::Refresh;

	let span = LifecycleSpan::new(KIND, stage);

	obs::record_lifecycle_outcome(KIND, LifecycleOutcome::Attempt);

	let outcome = span.instrument(credential.refresh(transport, now)).await;

	record_outcome(KIND, &outcome);
	outcome?;
	persist_best_effort(store, credential, stage).await;

	Ok(())
}

async fn persist_best_effort(
	store: &dyn CredentialStore,
	credential: &Credential,
	stage: &'static str,
) {
	let record = credential.to_record();

	if let Err(e) = store.save(&record).await {
		obs::record_persistence_warning(stage, &e);
	}
}

fn record_outcome<T>(kind: LifecycleKind, outcome: &Result<T>) {
	match outcome {
		Ok(_) => obs::record_lifecycle_outcome(kind, LifecycleOutcome::Success),
		Err(_) => obs::record_lifecycle_outcome(kind, LifecycleOutcome::Failure),
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use time::macros;
	// self
	use super::*;
	use crate::{
		credential::{RefreshCapability, Secret, TokenGrant},
		transport::TransportFuture,
	};

	struct IdleTransport;
	impl OAuthTransport for IdleTransport {
		fn authorize_url(&self) -> TransportFuture<'_, Url> {
			Box::pin(async {
				Ok(Url::parse("https://provider.example.com/authorize")
					.expect("Static authorize URL fixture should parse successfully."))
			})
		}

		fn exchange_code<'a>(&'a self, _: &'a str) -> TransportFuture<'a, TokenGrant> {
			Box::pin(async {
				Ok(TokenGrant {
					access_token: Secret::new("access"),
					refresh: Some(RefreshCapability::RefreshToken(Secret::new("refresh"))),
					expires_in: Duration::hours(1),
				})
			})
		}

		fn refresh_grant<'a>(
			&'a self,
			_: Option<&'a Secret>,
			_: &'a RefreshCapability,
		) -> TransportFuture<'a, TokenGrant> {
			Box::pin(async {
				Ok(TokenGrant {
					access_token: Secret::new("access-refreshed"),
					refresh: None,
					expires_in: Duration::hours(1),
				})
			})
		}

		fn send<'a>(
			&'a self,
			_: &'a Secret,
			_: &'a RequestDescriptor,
		) -> TransportFuture<'a, ApiResponse> {
			Box::pin(async { Ok(ApiResponse { status: 200, body: Vec::new() }) })
		}
	}

	fn build_key() -> ClientKey {
		ClientKey::new("consumer-id", "consumer-secret").expect("Key fixture should be valid.")
	}

	#[test]
	fn builder_clamps_negative_knobs_to_zero() {
		let builder = RateLimitedClient::builder(build_key(), Arc::new(IdleTransport))
			.with_min_interval(Duration::seconds(-3))
			.with_refresh_skew(Duration::seconds(-1));

		assert_eq!(builder.min_interval, Duration::ZERO);
		assert_eq!(builder.refresh_skew, Duration::ZERO);
	}

	#[test]
	fn builder_defaults_match_the_reference_values() {
		let builder = RateLimitedClient::builder(build_key(), Arc::new(IdleTransport));

		assert_eq!(builder.min_interval, DEFAULT_MIN_INTERVAL);
		assert_eq!(builder.refresh_skew, DEFAULT_REFRESH_SKEW);
		assert_eq!(builder.min_interval, Duration::seconds(2));
		assert_eq!(builder.refresh_skew, Duration::seconds(60));
	}

	#[tokio::test]
	async fn connect_without_state_or_provider_is_a_config_error() {
		let err = RateLimitedClient::builder(build_key(), Arc::new(IdleTransport))
			.with_clock(Arc::new(crate::clock::ManualClock::starting_at(macros::datetime!(
				2026-08-07 12:00 UTC
			))))
			.connect()
			.await
			.expect_err("Connecting a virgin client without a code provider must fail.");

		assert!(matches!(err, Error::Config(ConfigError::MissingCodeProvider)));
	}
}
