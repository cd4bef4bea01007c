//! File-backed [`CredentialStore`] accepting both persisted layouts.

// std
use std::{
	fs::{self, File},
	io::Write,
	path::{Path, PathBuf},
};
// self
use crate::{
	_prelude::*,
	credential::CredentialRecord,
	store::{CredentialStore, StoreError, StoreFuture},
};

/// Persists the credential to a single file, rewriting it after each mutation.
///
/// Two layouts are accepted when loading: a JSON [`CredentialRecord`], or a bare
/// record holding exactly one non-empty line with a refresh token. Saves always
/// write the full JSON layout, atomically (temp file + fsync + rename), so a crash
/// mid-save never corrupts the previous state.
#[derive(Clone, Debug)]
pub struct FileStore {
	path: PathBuf,
}
impl FileStore {
	/// Creates a store rooted at the provided path.
	///
	/// The file itself may not exist yet; a missing file loads as `None` and the
	/// owning client falls back to interactive authorization.
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}

	fn load_now(path: &Path) -> Result<Option<CredentialRecord>, StoreError> {
		if !path.exists() {
			return Ok(None);
		}

		let bytes = fs::read(path).map_err(|e| StoreError::Backend {
			message: format!("Failed to read {}: {e}", path.display()),
		})?;

		Self::parse(path, &bytes).map(Some)
	}

	fn parse(path: &Path, bytes: &[u8]) -> Result<CredentialRecord, StoreError> {
		let text = std::str::from_utf8(bytes).map_err(|e| StoreError::Malformed {
			message: format!("{} is not valid UTF-8: {e}", path.display()),
		})?;

		if text.trim_start().starts_with('{') {
			return Self::parse_full(path, text);
		}

		Self::parse_bare(path, text)
	}

	fn parse_full(path: &Path, text: &str) -> Result<CredentialRecord, StoreError> {
		let mut deserializer = serde_json::Deserializer::from_str(text);

		serde_path_to_error::deserialize(&mut deserializer).map_err(|e| StoreError::Malformed {
			message: format!("Failed to parse {} at {}: {}", path.display(), e.path(), e.inner()),
		})
	}

	fn parse_bare(path: &Path, text: &str) -> Result<CredentialRecord, StoreError> {
		let lines: Vec<_> =
			text.lines().map(str::trim).filter(|line| !line.is_empty()).collect();

		match lines.as_slice() {
			[token] => Ok(CredentialRecord::bare_refresh_token(*token)),
			other => Err(StoreError::Malformed {
				message: format!(
					"{} must hold exactly one refresh-token line, found {} lines",
					path.display(),
					other.len(),
				),
			}),
		}
	}

	fn ensure_parent_exists(path: &Path) -> Result<(), StoreError> {
		if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
			fs::create_dir_all(parent).map_err(|e| StoreError::Backend {
				message: format!("Failed to create store directory {}: {e}", parent.display()),
			})?;
		}

		Ok(())
	}

	fn save_now(&self, record: &CredentialRecord) -> Result<(), StoreError> {
		Self::ensure_parent_exists(&self.path)?;

		let serialized =
			serde_json::to_vec_pretty(record).map_err(|e| StoreError::Serialization {
				message: format!("Failed to serialize credential record: {e}"),
			})?;
		let mut tmp_path = self.path.clone();

		tmp_path.set_extension("tmp");

		{
			let mut file = File::create(&tmp_path).map_err(|e| StoreError::Backend {
				message: format!("Failed to create {}: {e}", tmp_path.display()),
			})?;

			file.write_all(&serialized).map_err(|e| StoreError::Backend {
				message: format!("Failed to write {}: {e}", tmp_path.display()),
			})?;
			file.sync_all().map_err(|e| StoreError::Backend {
				message: format!("Failed to sync {}: {e}", tmp_path.display()),
			})?;
		}

		fs::rename(&tmp_path, &self.path).map_err(|e| StoreError::Backend {
			message: format!("Failed to replace {}: {e}", self.path.display()),
		})
	}
}
impl CredentialStore for FileStore {
	fn load(&self) -> StoreFuture<'_, Option<CredentialRecord>> {
		Box::pin(async move { Self::load_now(&self.path) })
	}

	fn save<'a>(&'a self, record: &'a CredentialRecord) -> StoreFuture<'a, ()> {
		Box::pin(async move { self.save_now(record) })
	}
}

#[cfg(test)]
mod tests {
	// std
	use std::{env, process};
	// crates.io
	use time::macros;
	// self
	use super::*;
	use crate::credential::Secret;

	fn temp_path(tag: &str) -> PathBuf {
		let unique = format!(
			"oauth_pacer_file_store_{tag}_{}_{}.json",
			process::id(),
			OffsetDateTime::now_utc().unix_timestamp_nanos(),
		);

		env::temp_dir().join(unique)
	}

	fn full_record() -> CredentialRecord {
		CredentialRecord {
			access_token: Some(Secret::new("access-token")),
			refresh_token: Some(Secret::new("refresh-token")),
			token_secret: None,
			session_handle: None,
			expires_at: macros::datetime!(2026-08-07 12:00 UTC),
		}
	}

	fn remove(path: &Path) {
		fs::remove_file(path).unwrap_or_else(|e| {
			panic!("Failed to remove temporary store file {}: {e}", path.display())
		});
	}

	#[tokio::test]
	async fn save_and_reload_round_trip() {
		let path = temp_path("round_trip");
		let store = FileStore::new(&path);
		let record = full_record();

		store.save(&record).await.expect("Saving fixture record should succeed.");

		let reopened = FileStore::new(&path);
		let fetched = reopened
			.load()
			.await
			.expect("Loading the persisted record should succeed.")
			.expect("Persisted record should be present after save.");

		assert_eq!(fetched, record);

		remove(&path);
	}

	#[tokio::test]
	async fn missing_file_is_not_an_error() {
		let store = FileStore::new(temp_path("missing"));
		let fetched = store.load().await.expect("Loading a missing file should succeed.");

		assert!(fetched.is_none());
	}

	#[tokio::test]
	async fn bare_layout_holds_one_refresh_token_line() {
		let path = temp_path("bare");

		fs::write(&path, "refresh-persisted\n").expect("Writing bare fixture should succeed.");

		let fetched = FileStore::new(&path)
			.load()
			.await
			.expect("Loading the bare layout should succeed.")
			.expect("Bare layout should yield a record.");

		assert_eq!(fetched.refresh_token, Some(Secret::new("refresh-persisted")));
		assert_eq!(fetched.access_token, None);
		assert_eq!(fetched.expires_at, OffsetDateTime::UNIX_EPOCH);

		remove(&path);
	}

	#[tokio::test]
	async fn wrong_line_counts_are_malformed() {
		let path = temp_path("lines");

		fs::write(&path, "line-one\nline-two\n")
			.expect("Writing two-line fixture should succeed.");

		let err = FileStore::new(&path)
			.load()
			.await
			.expect_err("A two-line bare layout must be rejected.");

		assert!(matches!(err, StoreError::Malformed { .. }));

		fs::write(&path, "").expect("Truncating fixture should succeed.");

		let err = FileStore::new(&path)
			.load()
			.await
			.expect_err("An empty file must be rejected.");

		assert!(matches!(err, StoreError::Malformed { .. }));

		remove(&path);
	}

	#[tokio::test]
	async fn corrupt_json_is_malformed() {
		let path = temp_path("corrupt");

		fs::write(&path, "{\"access_token\": [1, 2]}")
			.expect("Writing corrupt fixture should succeed.");

		let err = FileStore::new(&path)
			.load()
			.await
			.expect_err("Corrupt JSON must be rejected.");

		assert!(matches!(err, StoreError::Malformed { .. }));
		assert!(err.to_string().contains("access_token"));

		remove(&path);
	}

	#[tokio::test]
	async fn saves_replace_previous_state() {
		let path = temp_path("replace");
		let store = FileStore::new(&path);
		let mut record = full_record();

		store.save(&record).await.expect("Saving initial record should succeed.");

		record.access_token = Some(Secret::new("access-rotated"));

		store.save(&record).await.expect("Saving replacement record should succeed.");

		let fetched = store
			.load()
			.await
			.expect("Loading the replaced record should succeed.")
			.expect("Replaced record should be present.");

		assert_eq!(fetched.access_token, Some(Secret::new("access-rotated")));

		remove(&path);
	}
}
