//! Credential lifecycle and request pacing for a single OAuth-protected API: interactive
//! authorization, proactive refresh, and paced dispatch behind one rate-limited client.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod client;
pub mod clock;
pub mod credential;
pub mod error;
pub mod key;
pub mod obs;
pub mod prompt;
pub mod session;
pub mod store;
pub mod transport;

mod _prelude {
	pub use std::{
		collections::BTreeMap,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		sync::Arc,
	};

	pub use async_lock::Mutex as AsyncMutex;
	pub use parking_lot::{Mutex, RwLock};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

pub use url;
