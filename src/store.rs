//! Storage contract and the built-in in-memory store for the cached credential.

pub mod memory;

pub use memory::MemoryStore;

// self
use crate::{_prelude::*, auth::Credential};

/// Boxed future returned by [`TokenStore`] operations.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + 'a + Send>>;

/// Holder of at most one cached [`Credential`].
///
/// Operations must be linearizable with respect to each other: no caller may observe a
/// partially written credential. A shared backend (for example a key-value cache) can be
/// substituted behind this trait without changing the token provider.
pub trait TokenStore
where
	Self: Send + Sync,
{
	/// Returns the cached credential, if any. Expired credentials are returned as-is.
	fn fetch(&self) -> StoreFuture<'_, Option<Credential>>;

	/// Replaces the cached credential and returns what was written; `None` clears the store.
	fn write(&self, credential: Option<Credential>) -> StoreFuture<'_, Option<Credential>>;

	/// Drops the cached credential.
	fn clear(&self) -> StoreFuture<'_, ()> {
		Box::pin(async move {
			self.write(None).await?;

			Ok(())
		})
	}
}

/// Error type produced by [`TokenStore`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum StoreError {
	/// Serialization failures surfaced by the backend.
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

	/// Store that only implements `fetch`/`write`, relying on the default `clear`.
	#[derive(Default)]
	struct SlotStore(Mutex<Option<Credential>>);
	impl TokenStore for SlotStore {
		fn fetch(&self) -> StoreFuture<'_, Option<Credential>> {
			Box::pin(async move { Ok(self.0.lock().clone()) })
		}

		fn write(&self, credential: Option<Credential>) -> StoreFuture<'_, Option<Credential>> {
			Box::pin(async move {
				*self.0.lock() = credential.clone();

				Ok(credential)
			})
		}
	}

	#[tokio::test]
	async fn default_clear_writes_none() {
		let store = SlotStore::default();
		let credential =
			Credential::new("abc", "Bearer", OffsetDateTime::now_utc(), Duration::hours(1));

		store.write(Some(credential.clone())).await.expect("Write should succeed.");

		assert_eq!(store.fetch().await.expect("Fetch should succeed."), Some(credential));

		store.clear().await.expect("Clear should succeed.");

		assert_eq!(store.fetch().await.expect("Fetch should succeed."), None);
	}

	#[test]
	fn store_error_can_be_serialized() {
		let payload = serde_json::to_string(&StoreError::Backend { message: "down".into() })
			.expect("StoreError should serialize to JSON.");

		assert_eq!(payload, "{\"Backend\":{\"message\":\"down\"}}");
	}
}
