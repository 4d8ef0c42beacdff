//! Thread-safe in-memory [`TokenStore`] implementation.

// self
use crate::{
	_prelude::*,
	auth::Credential,
	store::{StoreError, StoreFuture, TokenStore},
};

type Slot = Arc<Mutex<Option<Credential>>>;

/// Process-local store guarding a single credential with a mutex.
///
/// Nothing is persisted and nothing is shared across processes; use a custom [`TokenStore`]
/// when several processes should reuse one credential.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore(Slot);
impl MemoryStore {
	fn fetch_now(slot: &Slot) -> Option<Credential> {
		slot.lock().clone()
	}

	fn write_now(
		slot: &Slot,
		credential: Option<Credential>,
	) -> Result<Option<Credential>, StoreError> {
		*slot.lock() = credential.clone();

		Ok(credential)
	}
}
impl TokenStore for MemoryStore {
	fn fetch(&self) -> StoreFuture<'_, Option<Credential>> {
		let slot = self.0.clone();

		Box::pin(async move { Ok(Self::fetch_now(&slot)) })
	}

	fn write(&self, credential: Option<Credential>) -> StoreFuture<'_, Option<Credential>> {
		let slot = self.0.clone();

		Box::pin(async move { Self::write_now(&slot, credential) })
	}

	fn clear(&self) -> StoreFuture<'_, ()> {
		let slot = self.0.clone();

		Box::pin(async move {
			slot.lock().take();

			Ok(())
		})
	}
}
