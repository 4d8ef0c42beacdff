//! Credential lifecycle: cached lookups, single-flight acquisition, forced refresh, and clearing.
//!
//! [`TokenProvider::bearer_token`] uses double-checked locking. The common path reads the store
//! without taking the acquisition guard; only callers that find no usable credential queue on the
//! guard, re-check the store once they hold it, and at most one of them performs the network
//! exchange. The remaining callers wake up to the freshly written credential, so N simultaneous
//! expirations cost exactly one round trip.

mod acquire;

pub use acquire::GRANT_TYPE;

// self
use crate::{
	_prelude::*,
	auth::{Credential, TokenSecret},
	config::{Config, EndpointRole, endpoints},
	error::ConfigError,
	http::HttpClient,
	store::{MemoryStore, TokenStore},
};

/// Acquires, caches, and refreshes the client-credentials bearer token.
///
/// Construct one provider at startup and share it (behind an [`Arc`]) with every
/// [`Client`](crate::client::Client) that should reuse the same credential.
pub struct TokenProvider {
	store: Arc<dyn TokenStore>,
	http: HttpClient,
	token_url: Url,
	client_id: String,
	client_secret: TokenSecret,
	scope: String,
	acquire_guard: AsyncMutex<()>,
}
impl TokenProvider {
	/// Creates a provider backed by a fresh [`MemoryStore`].
	pub fn new(config: &Config) -> Result<Self> {
		let token_url = endpoints::join_path(config.base_url(EndpointRole::Auth), &config.token_path)
			.map_err(|source| ConfigError::InvalidEndpoint {
				role: EndpointRole::Auth.as_str(),
				source,
			})?;

		Ok(Self {
			store: Arc::new(MemoryStore::default()),
			http: HttpClient::new(config.timeouts),
			token_url,
			client_id: config.client_id.clone(),
			client_secret: config.client_secret.clone(),
			scope: config.scope.clone(),
			acquire_guard: AsyncMutex::new(()),
		})
	}

	/// Replaces the token store (for example with a cache shared across processes).
	pub fn with_store(mut self, store: Arc<dyn TokenStore>) -> Self {
		self.store = store;

		self
	}

	/// Replaces the transport used for token acquisition.
	pub fn with_http_client(mut self, http: HttpClient) -> Self {
		self.http = http;

		self
	}

	/// Returns the token endpoint URL.
	pub fn token_url(&self) -> &Url {
		&self.token_url
	}

	/// Returns `"<type> <value>"` for a usable credential, acquiring one when needed.
	pub async fn bearer_token(&self) -> Result<String> {
		let credential = self.usable_credential().await?;

		Ok(format_bearer(&credential))
	}

	/// Drops the cached credential and acquires a new one, even if the old one was still valid.
	pub async fn refresh_token(&self) -> Result<String> {
		self.store.clear().await?;

		#[cfg(feature = "tracing")]
		tracing::debug!("cached credential cleared for forced refresh");

		self.bearer_token().await
	}

	/// Drops the cached credential without acquiring a new one.
	pub async fn clear_token(&self) -> Result<()> {
		self.store.clear().await?;

		Ok(())
	}

	/// Returns the expiry of the cached credential, if any.
	pub async fn token_expiry(&self) -> Result<Option<OffsetDateTime>> {
		Ok(self.store.fetch().await?.map(|credential| credential.expires_at))
	}

	/// Returns the scheme label of the cached credential, if any.
	pub async fn token_type(&self) -> Result<Option<String>> {
		Ok(self.store.fetch().await?.map(|credential| credential.token_type))
	}

	/// Returns the cached credential, if any, without checking its validity.
	pub async fn credential(&self) -> Result<Option<Credential>> {
		Ok(self.store.fetch().await?)
	}

	async fn usable_credential(&self) -> Result<Credential> {
		if let Some(credential) = self.cached_valid().await? {
			#[cfg(feature = "tracing")]
			tracing::debug!(expires_at = %credential.expires_at, "cached credential reused");

			return Ok(credential);
		}

		let _singleflight = self.acquire_guard.lock().await;

		// Another caller may have published a credential while this one waited.
		if let Some(credential) = self.cached_valid().await? {
			return Ok(credential);
		}

		let credential = self.acquire().await?;

		self.store.write(Some(credential.clone())).await?;

		Ok(credential)
	}

	async fn cached_valid(&self) -> Result<Option<Credential>> {
		let now = OffsetDateTime::now_utc();

		Ok(self.store.fetch().await?.filter(|credential| credential.is_valid_at(now)))
	}
}
impl Debug for TokenProvider {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenProvider")
			.field("token_url", &self.token_url.as_str())
			.field("client_id", &self.client_id)
			.field("scope", &self.scope)
			.finish()
	}
}

/// Renders the `Authorization` header value for `credential`.
pub fn format_bearer(credential: &Credential) -> String {
	format!("{} {}", credential.token_type, credential.value.expose())
}
