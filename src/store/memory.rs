//! Thread-safe in-memory [`CredentialStore`] for local development and tests.

// self
use crate::{
	_prelude::*,
	credential::CredentialRecord,
	store::{CredentialStore, StoreFuture},
};

type StoreSlot = Arc<RwLock<Option<CredentialRecord>>>;

/// Keeps the credential record in-process; contents die with the owning client.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore(StoreSlot);
impl MemoryStore {
	/// Seeds the store with an existing record.
	pub fn with_record(record: CredentialRecord) -> Self {
		Self(Arc::new(RwLock::new(Some(record))))
	}

	/// Snapshot of the stored record, if any.
	pub fn record(&self) -> Option<CredentialRecord> {
		self.0.read().clone()
	}
}
impl CredentialStore for MemoryStore {
	fn load(&self) -> StoreFuture<'_, Option<CredentialRecord>> {
		let slot = self.0.clone();

		Box::pin(async move { Ok(slot.read().clone()) })
	}

	fn save<'a>(&'a self, record: &'a CredentialRecord) -> StoreFuture<'a, ()> {
		let slot = self.0.clone();
		let record = record.clone();

		Box::pin(async move {
			*slot.write() = Some(record);

			Ok(())
		})
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::credential::Secret;

	#[tokio::test]
	async fn save_and_load_round_trip() {
		let store = MemoryStore::default();

		assert!(store.load().await.expect("Empty store should load successfully.").is_none());

		let record = CredentialRecord::bare_refresh_token("refresh-memory");

		store.save(&record).await.expect("Saving into the memory store should succeed.");

		let fetched = store
			.load()
			.await
			.expect("Loading from the memory store should succeed.")
			.expect("Saved record should be present.");

		assert_eq!(fetched.refresh_token, Some(Secret::new("refresh-memory")));
		assert_eq!(store.record(), Some(record));
	}
}
