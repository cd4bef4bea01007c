//! Optional observability helpers for credential lifecycle flows.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `oauth_pacer.lifecycle` with the
//!   `flow` (lifecycle) and `stage` (call site) fields, plus warnings for swallowed
//!   persistence failures.
//! - Enable `metrics` to increment the `oauth_pacer_lifecycle_total` counter for every
//!   attempt/success/failure, labeled by `flow` + `outcome`, and the
//!   `oauth_pacer_persistence_warning_total` counter for best-effort save failures.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::{_prelude::*, store::StoreError};

/// Credential lifecycle flows observed by the client.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LifecycleKind {
	/// Interactive authorization flow.
	Authorize,
	/// Refresh exchange.
	Refresh,
	/// Paced outbound request.
	Request,
}
impl LifecycleKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			LifecycleKind::Authorize => "authorize",
			LifecycleKind::Refresh => "refresh",
			LifecycleKind::Request => "request",
		}
	}
}
impl Display for LifecycleKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LifecycleOutcome {
	/// Entry to a client flow.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl LifecycleOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			LifecycleOutcome::Attempt => "attempt",
			LifecycleOutcome::Success => "success",
			LifecycleOutcome::Failure => "failure",
		}
	}
}
impl Display for LifecycleOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Surfaces a swallowed best-effort persistence failure to the warning hooks.
///
/// Losing the persisted copy never aborts an otherwise-successful refresh; this is
/// the observable trace it leaves behind.
pub fn record_persistence_warning(stage: &'static str, error: &StoreError) {
	#[cfg(feature = "tracing")]
	::tracing::warn!(target: "oauth_pacer", stage, %error, "Failed to persist the credential.");

	#[cfg(feature = "metrics")]
	::metrics::counter!("oauth_pacer_persistence_warning_total", "stage" => stage).increment(1);

	#[cfg(not(feature = "tracing"))]
	let _ = error;
	#[cfg(not(any(feature = "tracing", feature = "metrics")))]
	let _ = stage;
}
