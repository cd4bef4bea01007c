//! Persistence contracts and built-in credential stores.

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

// self
use crate::{_prelude::*, credential::CredentialRecord};

/// Boxed future returned by [`CredentialStore`] operations.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + 'a + Send>>;

/// Persistence contract for the single credential owned by a client.
///
/// Absence of persisted state is not an error: `load` yields `None` and the client
/// falls back to interactive authorization. Save failures after a successful refresh
/// are the caller's to swallow; the in-memory credential stays usable either way.
pub trait CredentialStore
where
	Self: Send + Sync,
{
	/// Fetches the persisted credential record, if present.
	fn load(&self) -> StoreFuture<'_, Option<CredentialRecord>>;

	/// Persists or replaces the credential record.
	fn save<'a>(&'a self, record: &'a CredentialRecord) -> StoreFuture<'a, ()>;
}

/// Error type produced by [`CredentialStore`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum StoreError {
	/// Persisted state violates both accepted layouts.
	#[error("Malformed persisted state: {message}.")]
	Malformed {
		/// Human-readable error payload.
		message: String,
	},
	/// Serialization failure surfaced by the backend.
	#[error("Serialization error: {message}.")]
	Serialization {
		/// Human-readable error payload.
		message: String,
	},
	/// Backend-level failure for the storage engine.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn store_errors_serialize_for_diagnostics() {
		let payload = serde_json::to_string(&StoreError::Backend { message: "offline".into() })
			.expect("StoreError should serialize to JSON.");
		let round_trip: StoreError = serde_json::from_str(&payload)
			.expect("Serialized store error should deserialize from JSON.");

		assert_eq!(round_trip, StoreError::Backend { message: "offline".into() });
	}
}
